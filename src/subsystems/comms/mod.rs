//! Comms subsystem: external I/O channels.
//!
//! The only channel is the axum HTTP server. It implements
//! [`Component`] and is spawned by [`start`] via [`spawn_components`], so a
//! bind failure or server error cancels the shared shutdown token.
//!
//! [`start`] is synchronous; it returns a [`SubsystemHandle`] as soon as the
//! tasks are spawned.

pub mod axum_channel;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::core::config::Config;
use crate::subsystems::chat::ChatService;
use crate::subsystems::runtime::{Component, SubsystemHandle, spawn_components};
use crate::subsystems::ui::UiServeHandle;

/// Spawn the HTTP channel and return a handle that resolves once it exits.
pub fn start(
    config: &Config,
    chat: ChatService,
    ui_handle: Option<UiServeHandle>,
    shutdown: CancellationToken,
) -> SubsystemHandle {
    info!(bind = %config.server.bind, "loading axum channel");
    let components: Vec<Box<dyn Component>> = vec![Box::new(axum_channel::AxumChannel::new(
        "http0",
        config.server.bind.clone(),
        config.server.cors_origins.clone(),
        chat,
        ui_handle,
    ))];

    spawn_components(components, shutdown)
}

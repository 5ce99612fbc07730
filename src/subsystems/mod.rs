//! Subsystem modules for the YVI bot.

pub mod admin;
pub mod chat;
pub mod comms;
pub mod runtime;
pub mod ui;

//! YVI assistant backend: canned replies from a knowledge table, an admin
//! dashboard, and hosting for the single-page frontend.

pub mod bootstrap;
pub mod core;
pub mod knowledge;
pub mod subsystems;

pub use crate::core::{config, error};

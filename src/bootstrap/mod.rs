//! Process bootstrap helpers run before any subsystem starts.

pub mod logger;

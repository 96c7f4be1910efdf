//! Subcommand implementations

pub mod config;
pub mod control;
pub mod inventory;
pub mod logs;
pub mod scheduler;
pub mod status;

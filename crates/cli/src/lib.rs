//! testdeck CLI
//!
//! Command-line console for managing test cases, test plans, script
//! batches and run history.

pub mod commands;
pub mod config;
pub mod output;

//! Configuration and output plumbing for the `rebound` command.

pub mod config;
pub mod console;

//! Command implementations for the photoprep CLI.

pub mod config;
pub mod process;

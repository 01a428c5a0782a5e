//! Command line interface for scour.

pub mod args;
pub mod commands;

pub use args::ScourArgs;
pub use commands::execute_command;

//! Command-line interface
//!
//! This module contains the CLI commands and argument parsing, the session
//! that keeps ledger and durable state in step, and the interactive shell.

pub mod commands;
pub mod output;
pub mod session;
pub mod shell;

pub use commands::{Command, Opt};
pub use output::{write_block, write_chain};
pub use session::Session;
pub use shell::run_shell;

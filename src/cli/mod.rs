//! CLI module for gameshelf
//!
//! Provides command-line interface for:
//! - add / get / delete: single games
//! - list / search: browsing
//! - stats / rebuild: hash index maintenance
//! - import / export: whole-inventory restore and dump

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, SearchArgs};
pub use commands::{run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};

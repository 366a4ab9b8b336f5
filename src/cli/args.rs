//! CLI argument definitions using clap
//!
//! Commands:
//! - gameshelf add --name <n> --price <p> --stock <s> --company <c> --date <d> --cover <file>
//! - gameshelf get <id>
//! - gameshelf delete <id>
//! - gameshelf list
//! - gameshelf search (--name <n> | --company <c>)
//! - gameshelf stats
//! - gameshelf rebuild
//! - gameshelf import <file>
//! - gameshelf export <file>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// gameshelf - videogame inventory with a persisted hash index
#[derive(Parser, Debug)]
#[command(name = "gameshelf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./gameshelf.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new game with its cover image
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        price: f64,
        #[arg(long, allow_negative_numbers = true)]
        stock: i64,
        #[arg(long)]
        company: String,
        /// Release date, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Cover image file (png, jpg, jpeg)
        #[arg(long)]
        cover: PathBuf,
    },

    /// Show one game by id
    Get { id: String },

    /// Delete one game by id
    Delete { id: String },

    /// List every game in inventory order
    List,

    /// Search by exact name or company fragment
    Search(SearchArgs),

    /// Show hash index statistics
    Stats,

    /// Rebuild the hash index from the inventory
    Rebuild,

    /// Replace the inventory with a JSON array file
    Import { file: PathBuf },

    /// Write the inventory to a JSON array file
    Export { file: PathBuf },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SearchArgs {
    /// Name to match, ignoring case
    #[arg(long)]
    pub name: Option<String>,

    /// Company fragment to match, ignoring case
    #[arg(long)]
    pub company: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

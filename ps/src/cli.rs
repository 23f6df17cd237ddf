//! CLI argument parsing for profilestore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ps")]
#[command(author, version, about = "Inspect and maintain planbot profile records", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the store document (overrides config)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List users with a stored record
    List,

    /// Show a user's profile and last goals
    Show {
        /// User identifier
        #[arg(required = true)]
        user: String,
    },

    /// Delete everything stored for a user
    Delete {
        /// User identifier
        #[arg(required = true)]
        user: String,
    },
}

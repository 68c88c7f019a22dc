use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "threatlens", author, version, about = "Threat report analysis", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyse a report and print the view your role is cleared for
    Analyze {
        /// Observer, Analyst, Commander or Operative (anything else acts as Observer)
        #[arg(long)]
        role: String,
        /// UTF-8 text file, or `-` for stdin
        file: PathBuf,
    },
    /// Show recent logged analyses
    History {
        #[arg(long)]
        role: String,
        /// Defaults to storage.history_limit
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Delete one log entry (Operative only)
    Delete {
        #[arg(long)]
        role: String,
        id: i64,
    },
    /// Delete every log entry (Operative only)
    Clear {
        #[arg(long)]
        role: String,
    },
}

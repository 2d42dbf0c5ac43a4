//! Command-line schema.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "supply", version, about = "Construction-site supply orders and inventory")]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// SQLite file overriding the configured `db_path`.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    /// Absolute directory for rolling logs.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every view.
    Show(ShowArgs),
    /// Create a supplier order.
    Create(CreateArgs),
    /// Mark an order delivered today.
    Deliver { id: u64 },
    /// Change an order's ETA (YYYY-MM-DD).
    Eta { id: u64, eta: String },
    /// Report a delay with an optional reason and new ETA.
    Delay {
        id: u64,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long)]
        eta: Option<String>,
    },
    /// Increase an item's quantity by one.
    Inc { name: String },
    /// Decrease an item's quantity by one (never below zero).
    Dec { name: String },
    /// Write a dated JSON export.
    Export {
        /// Target directory; defaults to the current directory.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Replace all data with a JSON export.
    Import { path: PathBuf },
    /// Replace all data with the demo seed.
    Reset,
    /// Re-read storage on the sync interval and print KPIs.
    Watch {
        /// Stop after this many refreshes.
        #[arg(long)]
        ticks: Option<u64>,
    },
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Free-text order filter.
    #[arg(long)]
    pub filter: Option<String>,
    /// Sort field (id, material, supplier, eta, status, ...).
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending.
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub material: String,
    #[arg(long)]
    pub supplier: String,
    #[arg(long)]
    pub eta: String,
    #[arg(long, default_value = "Scheduled")]
    pub status: String,
}

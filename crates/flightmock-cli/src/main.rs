//! Flightmock CLI - offline access to the mock flight table.
//!
//! Answers the same lookups as the HTTP server without starting it, and
//! lists the table with the payout outcome each flight would produce.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use flightmock_core::FlightTable;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI arguments structure.
#[derive(Parser)]
#[command(name = "flightmock", version, about = "Inspect the mock flight status table", long_about = None)]
struct Cli {
    /// JSON file with the flight table (defaults to the built-in demo table).
    #[arg(long, global = true, env = "FLIGHTMOCK_TABLE")]
    table: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Print the status record the server would return for a flight.
    Status {
        /// Flight identifier (case-insensitive).
        flight_id: String,
    },
    /// List every flight in the table with its payout outcome.
    List {
        /// Print the table as JSON, in the format accepted by `--table`.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let table = match &cli.table {
        Some(path) => {
            debug!("loading flight table from {}", path.display());
            FlightTable::from_path(path)
                .with_context(|| format!("failed to load flight table {}", path.display()))?
        }
        None => FlightTable::reference(),
    };

    match cli.command {
        Commands::Status { flight_id } => {
            let record = table.get_status(&flight_id);
            println!("{}", serde_json::to_string(&record)?);
        }
        Commands::List { json: true } => {
            let records: Vec<_> = table.iter().collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::List { json: false } => print_listing(&table),
    }

    Ok(())
}

fn print_listing(table: &FlightTable) {
    println!("{:<10} {:<10} {:>6}  OUTCOME", "FLIGHT", "STATUS", "DELAY");
    for record in table.iter() {
        let outcome = if record.is_payout_eligible() {
            "PAYOUT"
        } else {
            "REJECT"
        };
        println!(
            "{:<10} {:<10} {:>5}m  {}",
            record.flight_id, record.status, record.delay_minutes, outcome
        );
    }
    println!("--- {} flight(s) ---", table.len());
}

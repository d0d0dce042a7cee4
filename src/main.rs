use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, error, info};

use avg_ticket::config::{Config, DataPaths};
use avg_ticket::logging;
use avg_ticket::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "avg_ticket")]
#[command(about = "Per-store average ticket pipeline over sales and transaction CSVs")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write the augmented dataset
    Run {
        /// Directory holding the input CSVs
        #[arg(long)]
        data_dir: Option<String>,
        /// Sales file name within the data directory
        #[arg(long)]
        sales: Option<String>,
        /// Transactions file name within the data directory
        #[arg(long)]
        transactions: Option<String>,
        /// Output file (a bare name lands in the data directory)
        #[arg(long)]
        output: Option<String>,
    },
    /// Compute and print the per-store average ticket table only
    Tickets {
        /// Directory holding the input CSVs
        #[arg(long)]
        data_dir: Option<String>,
        /// Sales file name within the data directory
        #[arg(long)]
        sales: Option<String>,
        /// Transactions file name within the data directory
        #[arg(long)]
        transactions: Option<String>,
        /// Also write the ticket table to this JSON file
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    if let Ok(cwd) = std::env::current_dir() {
        debug!("Current working directory: {}", cwd.display());
    }

    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    match cli.command {
        Commands::Run {
            data_dir,
            sales,
            transactions,
            output,
        } => {
            println!("🔄 Running average ticket pipeline...");
            let paths = DataPaths::resolve(&config, data_dir, sales, transactions, output);

            match Pipeline::run(&paths) {
                Ok(result) => {
                    info!("Pipeline finished");
                    println!("\n📊 Pipeline Results:");
                    println!("   Total rows: {}", result.total_rows);
                    println!("   Matched rows: {}", result.matched_rows);
                    println!("   Unmatched rows: {}", result.unmatched_rows);
                    println!("   Stores: {}", result.stores);
                    println!("   Output file: {}", result.output_file);
                }
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    println!("❌ Pipeline failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Tickets {
            data_dir,
            sales,
            transactions,
            json,
        } => {
            println!("🧮 Computing per-store average tickets...");
            let paths = DataPaths::resolve(&config, data_dir, sales, transactions, None);

            match Pipeline::tickets(&paths) {
                Ok(tickets) => {
                    println!("\n📊 Average ticket per store:");
                    for t in &tickets {
                        println!("   store {:>3}: {:.2}", t.store_nbr, t.avg_ticket);
                    }
                    if let Some(json_path) = json {
                        Pipeline::persist_tickets_json(&tickets, &json_path)?;
                        info!("Saved ticket table to {}", json_path.display());
                        println!("💾 Saved ticket table to '{}'", json_path.display());
                    }
                }
                Err(e) => {
                    error!("Ticket computation failed: {}", e);
                    println!("❌ Ticket computation failed: {}", e);
                    return Err(e.into());
                }
            }
        }
    }
    Ok(())
}

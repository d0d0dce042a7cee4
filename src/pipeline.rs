use crate::config::DataPaths;
use crate::dataset;
use crate::error::Result;
use crate::ticket;
use crate::types::StoreTicket;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

/// Result of a complete pipeline run
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub total_rows: usize,
    pub matched_rows: usize,
    pub unmatched_rows: usize,
    pub stores: usize,
    pub output_file: String,
}

pub struct Pipeline;

impl Pipeline {
    /// Run the complete pipeline: load both tables, join, compute the
    /// per-store average ticket, attach it, and write the augmented CSV.
    #[instrument(skip(paths))]
    pub fn run(paths: &DataPaths) -> Result<PipelineResult> {
        let t_pipeline = std::time::Instant::now();

        // Step 1: Load both input tables
        info!("Loading data...");
        println!("Loading data...");
        let sales = dataset::load_sales(&paths.sales)?;
        let transactions = dataset::load_transactions(&paths.transactions)?;
        info!(
            "Loaded {} sales rows and {} transaction rows",
            sales.rows.len(),
            transactions.len()
        );
        println!(
            "Loaded {} sales rows and {} transaction rows",
            sales.rows.len(),
            transactions.len()
        );

        // Step 2: Left join on (date, store_nbr)
        info!("Merging data...");
        println!("Merging data...");
        let headers = sales.headers;
        let merged = ticket::merge_transactions(sales.rows, &transactions);
        let matched = merged.iter().filter(|r| r.transactions.is_some()).count();

        // Step 3: Per-store average ticket
        info!("Computing ticket average...");
        println!("Computing ticket average...");
        let tickets = ticket::compute_store_tickets(&merged);
        Self::print_ticket_preview(&tickets);

        // Step 4: Attach each store's ticket back onto its rows
        let total_rows = merged.len();
        let augmented = ticket::attach_tickets(merged, &tickets);

        // Step 5: Persist the augmented table
        dataset::write_output(&paths.output, &headers, &augmented)?;
        let output_file = paths.output.display().to_string();
        info!("Saved augmented dataset to {}", output_file);
        println!("Saved augmented dataset to '{}'", output_file);

        info!(
            "Pipeline finished in {:.2}s",
            t_pipeline.elapsed().as_secs_f64()
        );

        Ok(PipelineResult {
            total_rows,
            matched_rows: matched,
            unmatched_rows: total_rows - matched,
            stores: tickets.len(),
            output_file,
        })
    }

    /// Load, join and aggregate only: the per-store ticket table.
    #[instrument(skip(paths))]
    pub fn tickets(paths: &DataPaths) -> Result<Vec<StoreTicket>> {
        info!("Loading data...");
        println!("Loading data...");
        let sales = dataset::load_sales(&paths.sales)?;
        let transactions = dataset::load_transactions(&paths.transactions)?;

        info!("Merging data...");
        let merged = ticket::merge_transactions(sales.rows, &transactions);

        info!("Computing ticket average...");
        Ok(ticket::compute_store_tickets(&merged))
    }

    /// Persist a ticket table to JSON
    pub fn persist_tickets_json(tickets: &[StoreTicket], path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json_content = serde_json::to_string_pretty(tickets)?;
        fs::write(path, json_content)?;
        Ok(())
    }

    fn print_ticket_preview(tickets: &[StoreTicket]) {
        println!("Average ticket per store (first 5):");
        for t in tickets.iter().take(5) {
            println!("   store {:>3}: {:.2}", t.store_nbr, t.avg_ticket);
        }
    }
}

use crate::types::{AugmentedRow, MergedRow, SalesRow, StoreTicket, TransactionRow};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Left-joins sales rows with transaction counts on `(date, store_nbr)`.
///
/// Every sales row appears exactly once in the result; rows with no matching
/// transaction record carry `None`.
pub fn merge_transactions(
    sales: Vec<SalesRow>,
    transactions: &[TransactionRow],
) -> Vec<MergedRow> {
    let mut by_key: HashMap<(NaiveDate, u32), u32> = HashMap::with_capacity(transactions.len());
    for row in transactions {
        if let Some(previous) = by_key.insert((row.date, row.store_nbr), row.transactions) {
            warn!(
                "Duplicate transaction record for store {} on {} ({} replaced by {})",
                row.store_nbr, row.date, previous, row.transactions
            );
        }
    }

    sales
        .into_iter()
        .map(|row| {
            let transactions = by_key.get(&(row.date, row.store_nbr)).copied();
            MergedRow {
                sales: row,
                transactions,
            }
        })
        .collect()
}

/// Computes the average ticket for each store over the merged rows.
///
/// Average ticket = sum(sales) / sum(transactions), or 0 when the transaction
/// sum is 0. Rows without a transaction count still contribute their sales.
pub fn compute_store_tickets(rows: &[MergedRow]) -> Vec<StoreTicket> {
    let mut totals: BTreeMap<u32, (f64, u64)> = BTreeMap::new();
    for row in rows {
        let entry = totals.entry(row.sales.store_nbr).or_insert((0.0, 0));
        entry.0 += row.sales.sales;
        entry.1 += u64::from(row.transactions.unwrap_or(0));
    }

    totals
        .into_iter()
        .map(|(store_nbr, (sales_sum, transaction_sum))| StoreTicket {
            store_nbr,
            avg_ticket: if transaction_sum == 0 {
                0.0
            } else {
                sales_sum / transaction_sum as f64
            },
        })
        .collect()
}

/// Attaches each store's average ticket back onto its merged rows.
pub fn attach_tickets(rows: Vec<MergedRow>, tickets: &[StoreTicket]) -> Vec<AugmentedRow> {
    let by_store: HashMap<u32, f64> = tickets
        .iter()
        .map(|t| (t.store_nbr, t.avg_ticket))
        .collect();

    rows.into_iter()
        .map(|row| {
            // Every store in the rows has a ticket entry by construction
            let avg_ticket = by_store
                .get(&row.sales.store_nbr)
                .copied()
                .unwrap_or_default();
            AugmentedRow { row, avg_ticket }
        })
        .collect()
}

use chrono::NaiveDate;
use csv::StringRecord;
use serde::{Deserialize, Serialize};

/// One row of the sales table with its join keys parsed out.
///
/// The full original record is kept so every input column can be carried
/// through to the output untouched.
#[derive(Debug, Clone)]
pub struct SalesRow {
    pub date: NaiveDate,
    pub store_nbr: u32,
    pub sales: f64,
    pub record: StringRecord,
}

/// One row of the transactions table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRow {
    pub date: NaiveDate,
    pub store_nbr: u32,
    pub transactions: u32,
}

/// A sales row after the left join with transactions.
///
/// `transactions` is `None` when no transaction record exists for the row's
/// `(date, store_nbr)` key.
#[derive(Debug, Clone)]
pub struct MergedRow {
    pub sales: SalesRow,
    pub transactions: Option<u32>,
}

/// A merged row with its store's average ticket attached
#[derive(Debug, Clone)]
pub struct AugmentedRow {
    pub row: MergedRow,
    pub avg_ticket: f64,
}

/// Per-store average ticket: total sales divided by total transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreTicket {
    pub store_nbr: u32,
    pub avg_ticket: f64,
}

use crate::constants;
use crate::error::{Result, TicketError};
use crate::types::{AugmentedRow, SalesRow, TransactionRow};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A loaded sales table: the original header row plus parsed rows.
#[derive(Debug, Clone)]
pub struct SalesTable {
    pub headers: StringRecord,
    pub rows: Vec<SalesRow>,
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| TicketError::MissingColumn(name.to_string()))
}

fn parse_field<T: std::str::FromStr>(value: &str, row: usize, column: &str) -> Result<T> {
    value.trim().parse().map_err(|_| TicketError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    })
}

fn parse_date(value: &str, row: usize) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| TicketError::InvalidValue {
        row,
        column: constants::DATE_COLUMN.to_string(),
        value: value.to_string(),
    })
}

/// Loads the sales table, parsing out the join keys and the sales value.
///
/// Every original column is preserved in `SalesRow::record` so the output can
/// carry the full input row through unchanged.
pub fn load_sales(path: &Path) -> Result<SalesTable> {
    let mut reader = ReaderBuilder::new().from_path(path)?;
    let headers = reader.headers()?.clone();

    let date_idx = find_column(&headers, constants::DATE_COLUMN)?;
    let store_idx = find_column(&headers, constants::STORE_COLUMN)?;
    let sales_idx = find_column(&headers, constants::SALES_COLUMN)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Data rows start on line 2, after the header
        let line = i + 2;
        rows.push(SalesRow {
            date: parse_date(&record[date_idx], line)?,
            store_nbr: parse_field(&record[store_idx], line, constants::STORE_COLUMN)?,
            sales: parse_field(&record[sales_idx], line, constants::SALES_COLUMN)?,
            record,
        });
    }

    debug!("Loaded {} sales rows from {}", rows.len(), path.display());
    Ok(SalesTable { headers, rows })
}

/// Loads the transactions table.
///
/// The count column may be named `num_transactions` or `transactions`; the
/// candidates are checked in that order.
pub fn load_transactions(path: &Path) -> Result<Vec<TransactionRow>> {
    let mut reader = ReaderBuilder::new().from_path(path)?;
    let headers = reader.headers()?.clone();

    let date_idx = find_column(&headers, constants::DATE_COLUMN)?;
    let store_idx = find_column(&headers, constants::STORE_COLUMN)?;
    let trans_idx = constants::TRANSACTION_COLUMNS
        .iter()
        .find_map(|name| headers.iter().position(|h| h == *name))
        .ok_or_else(|| TicketError::MissingColumn(constants::TRANSACTION_COLUMNS.join(" or ")))?;
    let trans_column = headers[trans_idx].to_string();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let line = i + 2;
        rows.push(TransactionRow {
            date: parse_date(&record[date_idx], line)?,
            store_nbr: parse_field(&record[store_idx], line, constants::STORE_COLUMN)?,
            transactions: parse_field(&record[trans_idx], line, &trans_column)?,
        });
    }

    debug!(
        "Loaded {} transaction rows from {}",
        rows.len(),
        path.display()
    );
    Ok(rows)
}

/// Writes the augmented table: every original sales column, then the joined
/// transaction count, then the per-store average ticket.
pub fn write_output(path: &Path, headers: &StringRecord, rows: &[AugmentedRow]) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            if dir.exists() {
                debug!("Output directory '{}' already exists", dir.display());
            } else {
                fs::create_dir_all(dir)?;
                info!("Created output directory '{}'", dir.display());
                println!("Created output directory '{}'", dir.display());
            }
        }
    }

    let mut writer = WriterBuilder::new().from_path(path)?;

    let mut out_headers = headers.clone();
    out_headers.push_field(constants::TRANSACTIONS_OUT_COLUMN);
    out_headers.push_field(constants::AVG_TICKET_COLUMN);
    writer.write_record(&out_headers)?;

    for row in rows {
        let mut record = row.row.sales.record.clone();
        // Unmatched rows serialize the transaction count as an empty field
        match row.row.transactions {
            Some(t) => record.push_field(&t.to_string()),
            None => record.push_field(""),
        }
        record.push_field(&row.avg_ticket.to_string());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_sales_and_preserves_extra_columns() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "train.csv",
            "id,date,store_nbr,family,sales,onpromotion\n\
             0,2013-01-01,1,AUTOMOTIVE,12.5,0\n\
             1,2013-01-02,2,GROCERY I,3.0,1\n",
        );

        let table = load_sales(&path).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].store_nbr, 1);
        assert_eq!(table.rows[0].sales, 12.5);
        assert_eq!(
            table.rows[0].date,
            NaiveDate::from_ymd_opt(2013, 1, 1).unwrap()
        );
        // Full original record is retained, extra columns included
        assert_eq!(&table.rows[1].record[3], "GROCERY I");
        assert_eq!(table.headers.len(), 6);
    }

    #[test]
    fn missing_sales_column_is_a_lookup_error() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "train.csv",
            "date,store_nbr,amount\n2013-01-01,1,12.5\n",
        );

        let err = load_sales(&path).unwrap_err();
        assert!(matches!(err, TicketError::MissingColumn(c) if c == "sales"));
    }

    #[test]
    fn invalid_value_names_row_and_column() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "train.csv",
            "date,store_nbr,sales\n2013-01-01,1,12.5\n2013-01-02,one,3.0\n",
        );

        let err = load_sales(&path).unwrap_err();
        match err {
            TicketError::InvalidValue { row, column, value } => {
                assert_eq!(row, 3);
                assert_eq!(column, "store_nbr");
                assert_eq!(value, "one");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn transaction_column_fallback_order() {
        let dir = tempdir().unwrap();

        let preferred = write_file(
            dir.path(),
            "preferred.csv",
            "date,store_nbr,num_transactions,transactions\n2013-01-01,1,10,99\n",
        );
        let rows = load_transactions(&preferred).unwrap();
        assert_eq!(rows[0].transactions, 10);

        let fallback = write_file(
            dir.path(),
            "fallback.csv",
            "date,store_nbr,transactions\n2013-01-01,1,99\n",
        );
        let rows = load_transactions(&fallback).unwrap();
        assert_eq!(rows[0].transactions, 99);

        let neither = write_file(dir.path(), "neither.csv", "date,store_nbr,count\n2013-01-01,1,5\n");
        let err = load_transactions(&neither).unwrap_err();
        assert!(matches!(err, TicketError::MissingColumn(_)));
    }
}

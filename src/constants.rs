/// Column name and default path constants to ensure consistency across the codebase

// Key columns shared by both input tables
pub const DATE_COLUMN: &str = "date";
pub const STORE_COLUMN: &str = "store_nbr";

// Sales table value column
pub const SALES_COLUMN: &str = "sales";

// Transaction-count column candidates, checked in order
pub const TRANSACTION_COLUMNS: [&str; 2] = ["num_transactions", "transactions"];

// Output columns appended to the sales table
pub const TRANSACTIONS_OUT_COLUMN: &str = "transactions";
pub const AVG_TICKET_COLUMN: &str = "avg_ticket";

// Default file locations, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "raw_data";
pub const DEFAULT_SALES_FILE: &str = "train.csv";
pub const DEFAULT_TRANSACTIONS_FILE: &str = "transactions.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "train_with_avg_ticket.csv";

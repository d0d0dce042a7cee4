use crate::constants;
use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct PathsConfig {
    pub data_dir: Option<String>,
    pub sales_file: Option<String>,
    pub transactions_file: Option<String>,
    pub output_file: Option<String>,
}

impl Config {
    /// Loads `config.toml` from the working directory. A missing file yields
    /// the defaults; a malformed file is an error.
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        if !Path::new(config_path).exists() {
            debug!("No config file at '{}', using defaults", config_path);
            return Ok(Config::default());
        }
        let config_content = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}

/// Resolved input/output locations for a pipeline run.
///
/// Precedence: CLI flag > config file > built-in default.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub sales: PathBuf,
    pub transactions: PathBuf,
    pub output: PathBuf,
}

impl DataPaths {
    pub fn resolve(
        config: &Config,
        data_dir: Option<String>,
        sales: Option<String>,
        transactions: Option<String>,
        output: Option<String>,
    ) -> Self {
        let paths = &config.paths;
        let data_dir = PathBuf::from(
            data_dir
                .or_else(|| paths.data_dir.clone())
                .unwrap_or_else(|| constants::DEFAULT_DATA_DIR.to_string()),
        );
        let sales_file = sales
            .or_else(|| paths.sales_file.clone())
            .unwrap_or_else(|| constants::DEFAULT_SALES_FILE.to_string());
        let transactions_file = transactions
            .or_else(|| paths.transactions_file.clone())
            .unwrap_or_else(|| constants::DEFAULT_TRANSACTIONS_FILE.to_string());
        let output_file = output
            .or_else(|| paths.output_file.clone())
            .unwrap_or_else(|| constants::DEFAULT_OUTPUT_FILE.to_string());

        DataPaths {
            sales: data_dir.join(sales_file),
            transactions: data_dir.join(transactions_file),
            // An absolute or path-qualified --output is honored as given
            output: if Path::new(&output_file).components().count() > 1 {
                PathBuf::from(output_file)
            } else {
                data_dir.join(output_file)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_fixed_relative_paths() {
        let paths = DataPaths::resolve(&Config::default(), None, None, None, None);
        assert_eq!(paths.sales, PathBuf::from("raw_data/train.csv"));
        assert_eq!(paths.transactions, PathBuf::from("raw_data/transactions.csv"));
        assert_eq!(paths.output, PathBuf::from("raw_data/train_with_avg_ticket.csv"));
    }

    #[test]
    fn cli_flags_override_config_values() {
        let config = Config {
            paths: PathsConfig {
                data_dir: Some("from_config".to_string()),
                sales_file: None,
                transactions_file: None,
                output_file: Some("out.csv".to_string()),
            },
        };
        let paths = DataPaths::resolve(&config, Some("from_cli".to_string()), None, None, None);
        assert_eq!(paths.sales, PathBuf::from("from_cli/train.csv"));
        assert_eq!(paths.output, PathBuf::from("from_cli/out.csv"));
    }

    #[test]
    fn qualified_output_path_is_used_as_given() {
        let paths = DataPaths::resolve(
            &Config::default(),
            None,
            None,
            None,
            Some("elsewhere/result.csv".to_string()),
        );
        assert_eq!(paths.output, PathBuf::from("elsewhere/result.csv"));
    }
}

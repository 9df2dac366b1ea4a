//! Record store configuration.

use std::path::{Path, PathBuf};

/// Environment variable naming the directory the record files live in.
pub const DATA_DIR_ENV: &str = "CARLOT_DATA_DIR";

/// Where the two record files live.
///
/// Defaults to the current working directory with `cars.jsonl` and
/// `sales.jsonl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub cars_file: String,
    pub sales_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            cars_file: "cars.jsonl".to_string(),
            sales_file: "sales.jsonl".to_string(),
        }
    }
}

impl StoreConfig {
    /// Default file names inside `data_dir`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Defaults, with the data directory overridden by `CARLOT_DATA_DIR` when set.
    pub fn from_env() -> Self {
        match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Self::in_dir(dir),
            _ => Self::default(),
        }
    }

    pub fn cars_path(&self) -> PathBuf {
        self.data_dir.join(&self.cars_file)
    }

    pub fn sales_path(&self) -> PathBuf {
        self.data_dir.join(&self.sales_file)
    }
}

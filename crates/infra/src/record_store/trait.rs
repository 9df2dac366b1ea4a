use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use carlot_inventory::CarRecord;
use carlot_sales::SaleRecord;

/// Record store operation error.
///
/// These are **infrastructure errors** (unreadable/unwritable medium, corrupt
/// contents) as opposed to domain errors (validation, lifecycle rules). Callers
/// treat every variant as "store unavailable" for the current operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store unavailable at {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("record store corrupt at {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("record store unavailable: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Unavailable {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Durable home of the car collection and the append-only sales log.
///
/// ## Contract
///
/// - `load_cars` returns cars in persisted order.
/// - `replace_cars` overwrites the whole car collection atomically: after a
///   failure the previous collection is still intact.
/// - `load_sales` returns sales in append order.
/// - `append_sale` adds one entry and never rewrites earlier ones.
///
/// Implementations assume a single writer; they do not coordinate between
/// processes.
pub trait RecordStore: Send + Sync {
    fn load_cars(&self) -> Result<Vec<CarRecord>, StoreError>;

    fn replace_cars(&self, records: &[CarRecord]) -> Result<(), StoreError>;

    fn load_sales(&self) -> Result<Vec<SaleRecord>, StoreError>;

    fn append_sale(&self, record: &SaleRecord) -> Result<(), StoreError>;
}

impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    fn load_cars(&self) -> Result<Vec<CarRecord>, StoreError> {
        (**self).load_cars()
    }

    fn replace_cars(&self, records: &[CarRecord]) -> Result<(), StoreError> {
        (**self).replace_cars(records)
    }

    fn load_sales(&self) -> Result<Vec<SaleRecord>, StoreError> {
        (**self).load_sales()
    }

    fn append_sale(&self, record: &SaleRecord) -> Result<(), StoreError> {
        (**self).append_sale(record)
    }
}

//! Infrastructure layer: record persistence, configuration and the inventory
//! service that enforces business rules over the stores.

pub mod config;
pub mod inventory_service;
pub mod record_store;


pub use config::StoreConfig;
pub use inventory_service::{InventoryError, InventoryService};
pub use record_store::{InMemoryRecordStore, JsonLinesStore, RecordStore, StoreError};

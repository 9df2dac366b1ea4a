//! Record store abstractions + implementations.

pub mod in_memory;
pub mod jsonl;
pub mod r#trait;

pub use in_memory::InMemoryRecordStore;
pub use jsonl::JsonLinesStore;
pub use r#trait::{RecordStore, StoreError};

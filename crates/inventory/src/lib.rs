//! Inventory domain module.
//!
//! This crate contains the business rules for car listings, implemented purely
//! as deterministic domain logic (no IO, no storage).

pub mod car;
pub mod search;

pub use car::{locate, locate_mut, CarDraft, CarField, CarRecord, CarStatus, CAR_HEADERS};
pub use search::{filter_matching, search, search_positions, sort_by_field};

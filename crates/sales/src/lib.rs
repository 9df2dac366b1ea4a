//! Sales history domain module.
//!
//! Sale records are immutable log entries created when a car is purchased.
//! This crate only builds them; appending is the record store's job.

pub mod sale;

pub use sale::{Buyer, SaleId, SaleRecord, SALE_HEADERS};

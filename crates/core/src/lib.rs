//! `carlot-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the inventory and
//! sales modules (no infrastructure concerns).

pub mod clock;
pub mod entity;
pub mod error;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};

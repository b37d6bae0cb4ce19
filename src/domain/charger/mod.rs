//! Charger aggregate
//!
//! Contains the charger entity, create/update inputs, the query filter and
//! the repository interface.

pub mod model;
pub mod repository;

pub use model::{ChargerChanges, ChargerFilter, ChargerRecord, ChargerStatus, NewCharger};
pub use repository::ChargerRepository;

//! Charger registry use-cases

pub mod service;

pub use service::ChargerService;

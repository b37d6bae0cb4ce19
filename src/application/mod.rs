//! Application layer: use-case orchestration over the domain

pub mod chargers;
pub mod identity;

pub use chargers::ChargerService;
pub use identity::{AuthResult, UserService};

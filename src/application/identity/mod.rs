//! Identity module: registration, login and the default admin account

pub mod service;

pub use service::{AuthResult, UserService};

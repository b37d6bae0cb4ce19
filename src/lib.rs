//! # Charger Registry
//!
//! Registry of EV charging stations with owner/admin access control and
//! a Haversine "nearby" search.
//!
//! ## Architecture
//!
//! - **domain**: records, access policy, proximity filter, repository traits
//! - **application**: use-case services over the domain
//! - **infrastructure**: SeaORM and in-memory storage, JWT and password hashing
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: process lifecycle (database, HTTP listener, shutdown)

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, CONFIG_ENV_VAR};
pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};
pub use interfaces::http::{create_api_router, RouterDeps};

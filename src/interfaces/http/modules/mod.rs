pub mod auth;
pub mod chargers;
pub mod health;
pub mod metrics;
pub mod request_id;

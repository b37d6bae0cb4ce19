//! Database entities module

pub mod charger;
pub mod user;

pub use charger::Entity as Charger;
pub use user::Entity as User;

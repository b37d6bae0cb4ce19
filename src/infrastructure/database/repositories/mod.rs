//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod charger_repository;
pub mod repository_provider;
pub mod user_repository;

pub use charger_repository::SeaOrmChargerRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::SeaOrmUserRepository;

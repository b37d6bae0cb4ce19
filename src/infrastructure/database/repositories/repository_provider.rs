//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

use crate::domain::repositories::RepositoryProvider;
use crate::domain::{ChargerRepository, DomainError, DomainResult, UserRepository};

use super::charger_repository::SeaOrmChargerRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let charger = repos.chargers().find_by_id("c1").await?;
/// let owner = repos.users().find_by_id(&charger.owner_id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    chargers: SeaOrmChargerRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            chargers: SeaOrmChargerRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db.clone()),
            db,
        }
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn chargers(&self) -> &dyn ChargerRepository {
        &self.chargers
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    async fn ping(&self) -> DomainResult<()> {
        let backend = self.db.get_database_backend();
        self.db
            .execute(Statement::from_string(backend, "SELECT 1"))
            .await
            .map(|_| ())
            .map_err(|e| DomainError::Store(format!("Database error: {}", e)))
    }
}

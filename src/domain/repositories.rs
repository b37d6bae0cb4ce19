//! Repository provider for the domain layer

use async_trait::async_trait;

use super::charger::ChargerRepository;
use super::user::UserRepository;
use crate::shared::errors::DomainResult;

/// Provides access to all domain repositories.
///
/// Injected into services and handlers as `Arc<dyn RepositoryProvider>`:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let charger = repos.chargers().find_by_id("c1").await?;
///     let owner = repos.users().find_by_id(&charger.owner_id).await?;
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn chargers(&self) -> &dyn ChargerRepository;
    fn users(&self) -> &dyn UserRepository;

    /// Round-trip to the backing store, used by the health check.
    async fn ping(&self) -> DomainResult<()>;
}

//! Charger repository interface

use async_trait::async_trait;

use super::model::{ChargerChanges, ChargerFilter, ChargerRecord, NewCharger};
use crate::shared::errors::DomainResult;

/// Persistence for charger records.
///
/// Implementations validate incoming fields and report failures as
/// `DomainError::Validation`. A record that disappears between lookup and
/// `update`/`delete` is reported as `DomainError::NotFound`.
#[async_trait]
pub trait ChargerRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ChargerRecord>>;
    async fn find_all(&self, filter: &ChargerFilter) -> DomainResult<Vec<ChargerRecord>>;
    /// Insert a record owned by `owner_id`; `fields.owner_id` is ignored.
    async fn create(&self, owner_id: &str, fields: NewCharger) -> DomainResult<ChargerRecord>;
    async fn update(
        &self,
        record: &ChargerRecord,
        changes: ChargerChanges,
    ) -> DomainResult<ChargerRecord>;
    async fn delete(&self, record: &ChargerRecord) -> DomainResult<()>;
}

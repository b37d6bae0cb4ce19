//! Charger service: applies the access policy around every repository
//! call and runs proximity searches.
//!
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    AccessPolicy, Caller, ChargerChanges, ChargerFilter, ChargerRecord, ChargerStatus,
    DomainError, DomainResult, NewCharger, ProximityFilter, RecordAction, RepositoryProvider,
};
use crate::interfaces::http::modules::metrics::NEARBY_SKIPPED_TOTAL;

pub struct ChargerService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ChargerService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Chargers visible to the caller: everything for admins, own
    /// records otherwise.
    pub async fn list(&self, caller: &Caller) -> DomainResult<Vec<ChargerRecord>> {
        let filter = AccessPolicy::scope_filter(caller);
        self.repos.chargers().find_all(&filter).await
    }

    /// Unscoped listing, admin only.
    pub async fn list_all(&self, caller: &Caller) -> DomainResult<Vec<ChargerRecord>> {
        if !caller.is_admin() {
            return Err(DomainError::Forbidden("Admin access required".to_string()));
        }
        self.repos.chargers().find_all(&ChargerFilter::all()).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> DomainResult<ChargerRecord> {
        self.load_authorized(caller, id, RecordAction::Read).await
    }

    /// Active chargers within the filter's radius, in storage order.
    ///
    /// Open to anonymous callers.
    pub async fn nearby(&self, filter: &ProximityFilter) -> DomainResult<Vec<ChargerRecord>> {
        let candidates = self
            .repos
            .chargers()
            .find_all(&ChargerFilter::all().with_status(ChargerStatus::Active))
            .await?;

        let matches = filter.within(candidates);
        if matches.skipped > 0 {
            record_skipped(matches.skipped);
        }
        Ok(matches.records)
    }

    // ── Commands ────────────────────────────────────────────────

    pub async fn create(&self, caller: &Caller, fields: NewCharger) -> DomainResult<ChargerRecord> {
        if !AccessPolicy::can_create(caller) {
            return Err(DomainError::Forbidden("Not authorized to create chargers".to_string()));
        }

        let owner_id = AccessPolicy::owner_for_new(caller, &fields);
        if let Some(claimed) = fields.owner_id.as_deref() {
            if claimed != owner_id {
                warn!(
                    caller = %caller.id,
                    claimed_owner = %claimed,
                    "Ignoring client-supplied owner on charger create"
                );
            }
        }

        let record = self.repos.chargers().create(owner_id, fields).await?;
        info!(charger_id = %record.id, owner_id = %record.owner_id, "Charger registered");
        Ok(record)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        changes: ChargerChanges,
    ) -> DomainResult<ChargerRecord> {
        let record = self.load_authorized(caller, id, RecordAction::Update).await?;
        let updated = self.repos.chargers().update(&record, changes).await?;
        info!(charger_id = %updated.id, caller = %caller.id, "Charger updated");
        Ok(updated)
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> DomainResult<()> {
        let record = self.load_authorized(caller, id, RecordAction::Delete).await?;
        self.repos.chargers().delete(&record).await?;
        info!(charger_id = %record.id, caller = %caller.id, "Charger deleted");
        Ok(())
    }

    // Missing records are reported before ownership is checked.
    async fn load_authorized(
        &self,
        caller: &Caller,
        id: &str,
        action: RecordAction,
    ) -> DomainResult<ChargerRecord> {
        let record = self
            .repos
            .chargers()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Charger", id))?;

        if let Err(e) = AccessPolicy::authorize(caller, &record, action) {
            warn!(charger_id = %id, caller = %caller.id, action = %action, "Charger access denied");
            return Err(e);
        }
        Ok(record)
    }
}

fn record_skipped(skipped: usize) {
    warn!(skipped, "Skipped chargers with unusable coordinates during nearby search");
    metrics::counter!(NEARBY_SKIPPED_TOTAL).increment(skipped as u64);
}

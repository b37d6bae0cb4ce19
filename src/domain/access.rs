//! Ownership / role authorization for charger records
//!
//! Every endpoint goes through [`AccessPolicy`]; the rule is:
//! admins see and touch everything, users only their own records.
//! Reads of a single record use the same ownership-or-admin rule as
//! updates and deletes.

use super::caller::Caller;
use super::charger::{ChargerFilter, ChargerRecord, NewCharger};
use crate::shared::errors::{DomainError, DomainResult};

/// Operation that targets one existing record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordAction {
    Read,
    Update,
    Delete,
}

impl RecordAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for RecordAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless authorization rules.
pub struct AccessPolicy;

impl AccessPolicy {
    /// Implicit filter for list queries.
    pub fn scope_filter(caller: &Caller) -> ChargerFilter {
        if caller.is_admin() {
            ChargerFilter::all()
        } else {
            ChargerFilter::owned_by(caller.id.clone())
        }
    }

    /// Ownership-or-admin; identical for every [`RecordAction`].
    pub fn can_access(caller: &Caller, record: &ChargerRecord, _action: RecordAction) -> bool {
        caller.is_admin() || record.owner_id == caller.id
    }

    /// Any authenticated caller may register chargers.
    pub fn can_create(_caller: &Caller) -> bool {
        true
    }

    /// Owner of a record the caller is creating. Always the caller,
    /// whatever `fields.owner_id` claims.
    pub fn owner_for_new<'a>(caller: &'a Caller, _fields: &NewCharger) -> &'a str {
        &caller.id
    }

    /// [`can_access`](Self::can_access) as a `Result`.
    pub fn authorize(
        caller: &Caller,
        record: &ChargerRecord,
        action: RecordAction,
    ) -> DomainResult<()> {
        if Self::can_access(caller, record, action) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "Not authorized to {} this charger",
                action
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::charger::ChargerStatus;

    const ACTIONS: [RecordAction; 3] = [
        RecordAction::Read,
        RecordAction::Update,
        RecordAction::Delete,
    ];

    fn fields() -> NewCharger {
        NewCharger {
            name: "Station".into(),
            location: None,
            latitude: 0.0,
            longitude: 0.0,
            status: ChargerStatus::Active,
            power_output_kw: None,
            connector_type: None,
            owner_id: None,
        }
    }

    fn record_owned_by(owner: &str) -> ChargerRecord {
        ChargerRecord::new(owner, fields())
    }

    #[test]
    fn admin_scope_matches_every_owner() {
        let admin = Caller::admin("a1");
        let filter = AccessPolicy::scope_filter(&admin);
        for owner in ["u1", "u2", "a1", ""] {
            assert!(filter.matches(&record_owned_by(owner)));
        }
    }

    #[test]
    fn user_scope_matches_only_own_records() {
        let caller = Caller::user("u1");
        let filter = AccessPolicy::scope_filter(&caller);
        let records: Vec<_> = ["u1", "u2", "u3", "u1"]
            .into_iter()
            .map(record_owned_by)
            .collect();

        let visible: Vec<_> = records.iter().filter(|r| filter.matches(r)).collect();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|r| r.owner_id == "u1"));
    }

    #[test]
    fn can_access_truth_table() {
        let cases = [
            (Caller::admin("x"), "x", true),
            (Caller::admin("x"), "y", true),
            (Caller::user("x"), "x", true),
            (Caller::user("x"), "y", false),
        ];
        for (caller, owner, expected) in cases {
            let record = record_owned_by(owner);
            for action in ACTIONS {
                assert_eq!(
                    AccessPolicy::can_access(&caller, &record, action),
                    expected,
                    "{:?} on record owned by {} ({})",
                    caller,
                    owner,
                    action
                );
            }
        }
    }

    #[test]
    fn non_owner_user_is_forbidden_for_every_action() {
        let caller = Caller::user("u1");
        let mut record = record_owned_by("u2");
        record.id = "c1".into();
        for action in ACTIONS {
            assert!(matches!(
                AccessPolicy::authorize(&caller, &record, action),
                Err(DomainError::Forbidden(_))
            ));
        }
    }

    #[test]
    fn admin_is_allowed_for_every_action() {
        let admin = Caller::admin("a1");
        let record = record_owned_by("u2");
        for action in ACTIONS {
            assert_eq!(AccessPolicy::authorize(&admin, &record, action), Ok(()));
        }
    }

    #[test]
    fn create_is_open_and_owner_is_forced() {
        let mut spoofed = fields();
        spoofed.owner_id = Some("u2".into());
        for caller in [Caller::user("u1"), Caller::admin("a1")] {
            assert!(AccessPolicy::can_create(&caller));
            assert_eq!(AccessPolicy::owner_for_new(&caller, &spoofed), caller.id);
        }
    }
}

//! In-memory repositories for development and testing

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    ChargerChanges, ChargerFilter, ChargerRecord, ChargerRepository, DomainError, DomainResult,
    NewCharger, NewUser, RepositoryProvider, User, UserRepository,
};

/// Chargers keyed by id. The sequence number keeps listings in
/// insertion order, like the `created_at` ordering of the SQL backend.
#[derive(Default)]
pub struct InMemoryChargerRepository {
    chargers: DashMap<String, (u64, ChargerRecord)>,
    sequence: AtomicU64,
}

#[async_trait]
impl ChargerRepository for InMemoryChargerRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ChargerRecord>> {
        Ok(self.chargers.get(id).map(|entry| entry.1.clone()))
    }

    async fn find_all(&self, filter: &ChargerFilter) -> DomainResult<Vec<ChargerRecord>> {
        let mut found: Vec<(u64, ChargerRecord)> = self
            .chargers
            .iter()
            .filter(|entry| filter.matches(&entry.1))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by_key(|(seq, _)| *seq);
        Ok(found.into_iter().map(|(_, record)| record).collect())
    }

    async fn create(&self, owner_id: &str, fields: NewCharger) -> DomainResult<ChargerRecord> {
        fields.validate()?;
        let record = ChargerRecord::new(owner_id, fields);
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.chargers.insert(record.id.clone(), (seq, record.clone()));
        Ok(record)
    }

    async fn update(
        &self,
        record: &ChargerRecord,
        changes: ChargerChanges,
    ) -> DomainResult<ChargerRecord> {
        changes.validate()?;
        let mut entry = self
            .chargers
            .get_mut(&record.id)
            .ok_or_else(|| DomainError::not_found("Charger", &record.id))?;
        changes.apply_to(&mut entry.1);
        Ok(entry.1.clone())
    }

    async fn delete(&self, record: &ChargerRecord) -> DomainResult<()> {
        self.chargers
            .remove(&record.id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Charger", &record.id))
    }
}

/// Users keyed by id, with an email index for uniqueness.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
    emails: DashMap<String, String>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> DomainResult<User> {
        let id = uuid::Uuid::new_v4().to_string();
        match self.emails.entry(new_user.email.clone()) {
            Entry::Occupied(_) => {
                return Err(DomainError::Conflict("Email already registered".to_string()))
            }
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }

        let now = Utc::now();
        let user = User {
            id: id.clone(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let Some(id) = self.emails.get(email).map(|id| id.clone()) else {
            return Ok(None);
        };
        self.find_by_id(&id).await
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }
}

/// Repository provider that keeps everything in process memory.
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    chargers: InMemoryChargerRepository,
    users: InMemoryUserRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
    fn chargers(&self) -> &dyn ChargerRepository {
        &self.chargers
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChargerStatus, Role};

    fn fields(name: &str) -> NewCharger {
        NewCharger {
            name: name.to_string(),
            latitude: 41.31,
            longitude: 69.28,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn listing_keeps_insertion_order_and_filters() {
        let repos = InMemoryRepositoryProvider::new();
        for (owner, name) in [("u1", "a"), ("u2", "b"), ("u1", "c")] {
            repos.chargers().create(owner, fields(name)).await.unwrap();
        }

        let all = repos.chargers().find_all(&ChargerFilter::all()).await.unwrap();
        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);

        let mine = repos
            .chargers()
            .find_all(&ChargerFilter::owned_by("u1"))
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|c| c.owner_id == "u1"));
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_records() {
        let repos = InMemoryRepositoryProvider::new();
        let record = repos.chargers().create("u1", fields("a")).await.unwrap();
        repos.chargers().delete(&record).await.unwrap();

        let err = repos
            .chargers()
            .update(
                &record,
                ChargerChanges {
                    status: Some(ChargerStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let err = repos.chargers().delete(&record).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn emails_are_unique() {
        let repos = InMemoryRepositoryProvider::new();
        let new_user = NewUser {
            email: "a@example.com".to_string(),
            password_hash: "h".to_string(),
            role: Role::User,
        };

        let created = repos.users().create(new_user.clone()).await.unwrap();
        let err = repos.users().create(new_user).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let found = repos.users().find_by_email("a@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(created.id));
        assert_eq!(repos.users().count().await.unwrap(), 1);
    }
}

use async_trait::async_trait;

use super::model::{NewUser, User};
use crate::shared::errors::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with `DomainError::Conflict` when the
    /// email is taken.
    async fn create(&self, user: NewUser) -> DomainResult<User>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn count(&self) -> DomainResult<u64>;
}

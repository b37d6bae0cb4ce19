//! User domain entity

use chrono::{DateTime, Utc};

use crate::domain::caller::{Caller, Role};

/// Registered account
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn as_caller(&self) -> Caller {
        Caller::new(self.id.clone(), self.role)
    }
}

/// Input for creating an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

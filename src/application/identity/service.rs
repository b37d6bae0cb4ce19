//! User service: application-layer orchestration for accounts
//!
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{DomainError, DomainResult, NewUser, RepositoryProvider, Role, User};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Authentication result returned after register or login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        jwt_config: JwtConfig,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            repos,
            jwt_config,
            bcrypt_cost,
        }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Check email + password and issue a JWT.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.repos.users().find_by_email(email.trim()).await? else {
            warn!(email = %email, "Login attempt for unknown email");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !verify_password(password, &user.password_hash) {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        info!(user_id = %user.id, "User logged in");
        self.issue(user)
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new account with role `user`.
    pub async fn register(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let email = email.trim();
        let mut errors = Vec::new();
        if email.is_empty() || !email.contains('@') {
            errors.push("Invalid email address".to_string());
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(format!("Password must be at least {} characters", MIN_PASSWORD_LEN));
        }
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        if self.repos.users().find_by_email(email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".into()));
        }

        let user = self.create_user(email, password, Role::User).await?;
        info!(user_id = %user.id, email = %user.email, "New user registered");
        self.issue(user)
    }

    /// Create the configured admin account when the store has no users.
    ///
    /// Returns `true` when an account was created.
    pub async fn ensure_default_admin(&self, email: &str, password: &str) -> DomainResult<bool> {
        if self.repos.users().count().await? > 0 {
            return Ok(false);
        }

        let admin = self.create_user(email, password, Role::Admin).await?;
        warn!(
            user_id = %admin.id,
            email = %admin.email,
            "Default admin created; change its password"
        );
        Ok(true)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn profile(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            })
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn create_user(&self, email: &str, password: &str, role: Role) -> DomainResult<User> {
        let password_hash = hash_password(password, self.bcrypt_cost)
            .map_err(|e| DomainError::Store(format!("Failed to hash password: {}", e)))?;

        self.repos
            .users()
            .create(NewUser {
                email: email.to_string(),
                password_hash,
                role,
            })
            .await
    }

    fn issue(&self, user: User) -> DomainResult<AuthResult> {
        let token = create_token(&user, &self.jwt_config)
            .map_err(|e| DomainError::Store(format!("Failed to create token: {}", e)))?;

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expires_in_seconds(),
            user,
        })
    }
}

//! Authentication middleware for Axum
//!
//! Verifies the bearer JWT, re-loads the user it names and stores the
//! resulting [`Caller`] in request extensions. Handlers extract it with
//! `Extension<Caller>`.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::{Caller, RepositoryProvider};
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig};
use crate::interfaces::http::common::ApiResponse;

/// Authentication error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    UserGone,
    AdminRequired,
    StoreUnavailable,
}

/// Authentication state containing JWT config and repositories
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub repos: Arc<dyn RepositoryProvider>,
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve the caller for a raw `Authorization` header value.
async fn resolve_caller(auth_header: &str, state: &AuthState) -> Result<Caller, AuthError> {
    let token = extract_token(auth_header).ok_or(AuthError::InvalidToken)?;
    let claims =
        verify_token(token, &state.jwt_config).map_err(|_| AuthError::InvalidToken)?;

    // Role comes from the stored user, not from the token.
    match state.repos.users().find_by_id(&claims.sub).await {
        Ok(Some(user)) => Ok(user.as_caller()),
        Ok(None) => Err(AuthError::UserGone),
        Err(e) => {
            tracing::error!(error = %e, "User lookup failed during authentication");
            Err(AuthError::StoreUnavailable)
        }
    }
}

/// JWT authentication middleware. Rejects the request with 401 unless a
/// valid token for an existing user is present.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return auth_error_response(AuthError::MissingToken);
    };

    match resolve_caller(&auth_header, &auth_state).await {
        Ok(caller) => {
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        Err(e) => auth_error_response(e),
    }
}

/// Optional authentication middleware
///
/// Attaches a [`Caller`] when the request carries a usable token and
/// passes anonymous or badly authenticated requests through untouched.
pub async fn optional_auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);

    if let Some(auth_header) = auth_header {
        if let Ok(caller) = resolve_caller(&auth_header, &auth_state).await {
            request.extensions_mut().insert(caller);
        }
    }

    next.run(request).await
}

/// Admin gate. Must run inside [`auth_middleware`].
pub async fn admin_middleware(request: Request<Body>, next: Next) -> Response {
    let is_admin = request
        .extensions()
        .get::<Caller>()
        .is_some_and(Caller::is_admin);

    if !is_admin {
        return auth_error_response(AuthError::AdminRequired);
    }
    next.run(request).await
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
        AuthError::UserGone => (StatusCode::UNAUTHORIZED, "User no longer exists"),
        AuthError::AdminRequired => (StatusCode::FORBIDDEN, "Admin access required"),
        AuthError::StoreUnavailable => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    };

    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

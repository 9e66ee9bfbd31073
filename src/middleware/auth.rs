//! Session authentication and tenant context extractors
//!
//! - `AuthUser`: a verified, unrevoked session (Bearer header or session cookie)
//! - `OptionalAuth`: the same, but a missing or invalid session is `None`
//! - `TenantContext`: `AuthUser` of an active user plus the dealer scope resolved for this request

use crate::cache::CacheOperations;
use crate::domain::UserId;
use crate::error::AppError;
use crate::jwt::SessionClaims;
use crate::policy::TenantScope;
use crate::state::HasServices;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use axum_extra::extract::CookieJar;
use tracing::{debug, warn};

/// Authenticated session extracted from a verified token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub username: String,
    pub session_id: String,
    /// Token expiry (Unix timestamp)
    pub expires_at: i64,
}

impl AuthUser {
    fn from_claims(claims: SessionClaims) -> Result<Self, AppError> {
        Ok(Self {
            user_id: claims.user_id()?,
            username: claims.username,
            session_id: claims.sid,
            expires_at: claims.exp,
        })
    }

    /// Seconds until the token expires, floored at zero
    pub fn remaining_secs(&self) -> u64 {
        (self.expires_at - chrono::Utc::now().timestamp()).max(0) as u64
    }
}

/// Bearer token from the `Authorization` header, falling back to the session cookie.
pub(crate) fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

async fn authenticate<S: HasServices>(parts: &Parts, state: &S) -> Result<AuthUser, AppError> {
    let token = extract_token(&parts.headers, &state.config().session.cookie_name)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let claims = state
        .jwt_manager()
        .verify_session_token(&token)
        .map_err(|e| {
            debug!("Session token rejected: {}", e);
            AppError::Unauthorized("Invalid or expired session".to_string())
        })?;

    let revoked = state
        .cache()
        .is_session_revoked(&claims.sid)
        .await
        .map_err(|e| {
            warn!("Session store unavailable: {}", e);
            AppError::RepositoryUnavailable("Session store unavailable".to_string())
        })?;
    if revoked {
        return Err(AppError::Unauthorized("Session has been revoked".to_string()));
    }

    AuthUser::from_claims(claims)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: HasServices + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).await
    }
}

/// `Some(AuthUser)` when a valid session is present, `None` when the session
/// is missing or invalid.
///
/// A revocation store failure is still a rejection: the caller cannot tell
/// whether the session was revoked.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: HasServices + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state).await {
            Ok(user) => Ok(OptionalAuth(Some(user))),
            Err(err @ AppError::RepositoryUnavailable(_)) => Err(err),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}

/// Per-request tenant context.
///
/// The dealer is resolved exactly once, when the extractor runs, and the scope
/// is handed to every service call of the handler. A deactivated user is
/// rejected here even while their token is still live.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub user: AuthUser,
    pub scope: TenantScope,
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: HasServices + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        state.identity_service().current_user(user.user_id).await?;
        let scope = state.tenant_resolver().resolve(user.user_id).await?;
        Ok(TenantContext { user, scope })
    }
}

//! Session API handlers: login, logout, current user, password change

use crate::api::{MessageResponse, SuccessResponse};
use crate::cache::CacheOperations;
use crate::domain::{ChangePasswordInput, Dealer, LoginInput, User};
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, OptionalAuth, TenantContext};
use crate::state::HasServices;
use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub display_name: String,
    pub user: User,
    pub dealer: Dealer,
}

/// POST /api/v1.0/auth/login
pub async fn login<S: HasServices>(
    State(state): State<S>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse> {
    let user = state.identity_service().authenticate(input).await?;
    let issued = state
        .jwt_manager()
        .create_session_token(user.id, &user.username)?;

    let session = &state.config().session;
    let cookie = Cookie::build((session.cookie_name.clone(), issued.token.clone()))
        .path("/")
        .http_only(true)
        .secure(session.cookie_secure)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Json(SuccessResponse::new(LoginResponse {
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
        })),
    ))
}

/// GET|POST /api/v1.0/logout
///
/// Succeeds with or without a valid session. Fails with 503, leaving the
/// cookie in place, when the session cannot be revoked.
pub async fn logout<S: HasServices>(
    State(state): State<S>,
    OptionalAuth(auth): OptionalAuth,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    if let Some(user) = auth {
        state
            .cache()
            .revoke_session(&user.session_id, Duration::from_secs(user.remaining_secs()))
            .await
            .map_err(|e| {
                warn!(user_id = %user.user_id, "Session revocation failed: {}", e);
                AppError::RepositoryUnavailable("Session store unavailable".to_string())
            })?;
        info!(user_id = %user.user_id, "Session revoked");
    }

    let cookie_name = state.config().session.cookie_name.clone();
    let jar = jar.remove(Cookie::build((cookie_name, "")).path("/"));
    Ok((jar, Json(MessageResponse::new("Logged out"))))
}

/// GET /api/v1.0/auth/me
pub async fn me<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
) -> Result<impl IntoResponse> {
    let user = state.identity_service().current_user(ctx.user.user_id).await?;
    let dealer = state.tenant_resolver().dealer(&ctx.scope).await?;
    Ok(Json(SuccessResponse::new(MeResponse {
        display_name: user.display_name(),
        user,
        dealer,
    })))
}

/// PUT /api/v1.0/auth/password
pub async fn change_password<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Json(input): Json<ChangePasswordInput>,
) -> Result<impl IntoResponse> {
    state
        .identity_service()
        .change_password(auth.user_id, input)
        .await?;
    Ok(Json(MessageResponse::new("Password changed")))
}

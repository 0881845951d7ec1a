//! Per-request session context. Resolved explicitly at the top of each
//! authenticated handler and passed into the orchestrator and gate
//! functions; there is no ambient session state.

use axum::http::{header, HeaderMap};

use crate::auth::provision;
use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub profile: Profile,
}

/// Resolves the bearer token against the auth service and loads (or lazily
/// provisions) the caller's profile.
pub async fn resolve(state: &AppState, headers: &HeaderMap) -> Result<SessionContext, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;
    let account = state.auth.user_from_token(token).await?;
    let profile =
        provision::ensure_profile(state.store.as_ref(), &account, &state.config.admin_email)
            .await?;
    Ok(SessionContext { profile })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

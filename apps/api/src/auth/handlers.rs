use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::provision::{self, registration_defaults};
use crate::errors::AppError;
use crate::models::correction::CorrectionResult;
use crate::models::profile::{Profile, Tier};
use crate::session::{self, SessionContext};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub profile: Profile,
    pub history: Vec<CorrectionResult>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub profile: Profile,
    pub history: Vec<CorrectionResult>,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub tier: Option<Tier>,
}

#[derive(Deserialize)]
pub struct RecoverRequest {
    pub email: String,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let auth_session = state.auth.sign_in(&req.email, &req.password).await?;
    let profile = provision::ensure_profile(
        state.store.as_ref(),
        &auth_session.user,
        &state.config.admin_email,
    )
    .await?;
    let history = state.store.corrections_for_user(profile.id).await?;
    Ok(Json(LoginResponse {
        access_token: auth_session.access_token,
        profile,
        history,
    }))
}

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "name, email and password are required".to_string(),
        ));
    }

    let is_admin = req.email == state.config.admin_email;
    let requested_tier = req.tier.unwrap_or(Tier::Gratuito);
    let (role, tier, credits) = registration_defaults(is_admin, requested_tier);

    // Metadata mirrors the profile row so the lazy provisioning path can
    // rebuild it if this insert is lost.
    let metadata = json!({
        "name": req.name.clone(),
        "instagram": req.instagram.clone(),
        "tier": tier.as_str(),
        "role": role.as_str(),
    });
    let account = state.auth.sign_up(&req.email, &req.password, metadata).await?;

    let profile = Profile {
        id: account.id,
        email: req.email,
        name: req.name,
        instagram: req.instagram.filter(|s| !s.is_empty()),
        role,
        tier,
        credits,
        created_at: chrono::Utc::now(),
    };
    state.store.insert_profile(&profile).await?;
    info!(
        "Registered {} ({}, {} credits)",
        profile.email,
        profile.tier.as_str(),
        profile.credits
    );

    Ok((StatusCode::CREATED, Json(profile)))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    if let Some(token) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        state.auth.sign_out(token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/recover
pub async fn handle_recover(
    State(state): State<AppState>,
    Json(req): Json<RecoverRequest>,
) -> Result<StatusCode, AppError> {
    state.auth.recover(&req.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/me — session bootstrap: profile plus history, newest first.
pub async fn handle_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, AppError> {
    let SessionContext { profile } = session::resolve(&state, &headers).await?;
    let history = state.store.corrections_for_user(profile.id).await?;
    Ok(Json(SessionResponse { profile, history }))
}

//! Mentor administration: student roster, profile edits and explicit hard
//! deletes. Every handler re-checks the mentor role against the resolved
//! session.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{Profile, ProfileUpdate, Role, Tier};
use crate::session::{self, SessionContext};
use crate::state::AppState;

fn require_mentor(ctx: &SessionContext) -> Result<(), AppError> {
    if ctx.profile.role == Role::Mentor {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// GET /api/v1/admin/users — student profiles, no history.
pub async fn handle_list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Profile>>, AppError> {
    let ctx = session::resolve(&state, &headers).await?;
    require_mentor(&ctx)?;
    let students = state.store.list_student_profiles().await?;
    Ok(Json(students))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub credits: Option<i32>,
}

/// A tier change without an explicit credit amount resets credits to the
/// new tier's base allotment, the same table registration and the webhook
/// consume.
fn to_profile_update(req: UpdateUserRequest) -> ProfileUpdate {
    let credits = req
        .credits
        .or_else(|| req.tier.map(Tier::base_credits));
    ProfileUpdate {
        name: req.name,
        instagram: req.instagram,
        tier: req.tier,
        credits,
    }
}

/// PATCH /api/v1/admin/users/:id
pub async fn handle_update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<Profile>, AppError> {
    let ctx = session::resolve(&state, &headers).await?;
    require_mentor(&ctx)?;

    if let Some(credits) = req.credits {
        if credits < 0 {
            return Err(AppError::Validation("credits cannot be negative".to_string()));
        }
    }

    state
        .store
        .update_profile(id, &to_profile_update(req))
        .await?;
    let updated = state
        .store
        .profile_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {id} not found")))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/admin/users/:id — the only hard-delete path.
pub async fn handle_delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let ctx = session::resolve(&state, &headers).await?;
    require_mentor(&ctx)?;
    state.store.delete_profile(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

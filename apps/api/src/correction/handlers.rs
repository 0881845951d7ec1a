use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::orchestrator::{self, SubmitEssayRequest};
use crate::entitlement::{self, Capability};
use crate::errors::AppError;
use crate::models::correction::CorrectionResult;
use crate::session;
use crate::state::AppState;

/// POST /api/v1/corrections
pub async fn handle_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SubmitEssayRequest>,
) -> Result<Json<CorrectionResult>, AppError> {
    let ctx = session::resolve(&state, &headers).await?;
    let result =
        orchestrator::submit_essay(state.store.as_ref(), state.grader.as_ref(), &ctx, req).await?;
    Ok(Json(result))
}

/// GET /api/v1/corrections — the caller's history, newest first.
pub async fn handle_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<CorrectionResult>>, AppError> {
    let ctx = session::resolve(&state, &headers).await?;
    let history = state.store.corrections_for_user(ctx.profile.id).await?;
    Ok(Json(history))
}

/// GET /api/v1/corrections/:id
pub async fn handle_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<CorrectionResult>, AppError> {
    let ctx = session::resolve(&state, &headers).await?;
    let correction = state
        .store
        .correction_by_id(ctx.profile.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Correction {id} not found")))?;
    Ok(Json(correction))
}

#[derive(Serialize)]
pub struct IdealVersionResponse {
    #[serde(rename = "versao_ideal")]
    pub ideal_version: String,
}

/// GET /api/v1/corrections/:id/ideal — gated comparison view.
pub async fn handle_ideal_version(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<IdealVersionResponse>, AppError> {
    let ctx = session::resolve(&state, &headers).await?;
    entitlement::require(ctx.profile.tier, Capability::IdealVersion)?;

    let correction = state
        .store
        .correction_by_id(ctx.profile.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Correction {id} not found")))?;
    Ok(Json(IdealVersionResponse {
        ideal_version: correction.graded.ideal_version,
    }))
}

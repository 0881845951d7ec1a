//! Theme catalog: writing-prompt inspiration, suggestion gated by tier,
//! managed by mentors. When the store holds no themes the built-in fallback
//! catalog is served so the feature never comes up empty.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::entitlement::{self, Capability};
use crate::errors::AppError;
use crate::models::profile::Role;
use crate::models::theme::{Difficulty, Theme, ThemeCategory};
use crate::session;
use crate::state::AppState;

fn fallback_themes() -> Vec<Theme> {
    let entries = [
        (
            ThemeCategory::Seguranca,
            "O uso de câmeras corporais na atividade policial",
            "Impactos na transparência e segurança jurídica.",
            Difficulty::Medio,
        ),
        (
            ThemeCategory::Sociedade,
            "A violência doméstica e o papel da Polícia Militar",
            "Eficácia das medidas protetivas e a atuação da PPVD.",
            Difficulty::Facil,
        ),
        (
            ThemeCategory::Tecnologia,
            "Crimes cibernéticos e os desafios da investigação",
            "Adaptação das forças de segurança aos delitos virtuais.",
            Difficulty::Medio,
        ),
        (
            ThemeCategory::Policia,
            "A militarização da segurança pública: necessidade ou excesso?",
            "O modelo de policiamento ostensivo no contexto atual.",
            Difficulty::Dificil,
        ),
        (
            ThemeCategory::Sociedade,
            "O impacto das Fake News na democracia",
            "Desinformação como vetor de instabilidade social.",
            Difficulty::Medio,
        ),
        (
            ThemeCategory::Direito,
            "Abuso de autoridade x Estrito cumprimento do dever legal",
            "Limites da ação policial vigorosa.",
            Difficulty::Dificil,
        ),
        (
            ThemeCategory::Policia,
            "Polícia Comunitária: aproximação Estado e sociedade",
            "Confiança mútua para prevenção criminal.",
            Difficulty::Facil,
        ),
        (
            ThemeCategory::Direito,
            "A redução da maioridade penal: solução ou ilusão?",
            "Impactos na segurança pública e no sistema socioeducativo.",
            Difficulty::Dificil,
        ),
        (
            ThemeCategory::Tecnologia,
            "Reconhecimento facial na segurança pública",
            "Eficácia na captura de foragidos vs. privacidade.",
            Difficulty::Medio,
        ),
        (
            ThemeCategory::Policia,
            "A importância da hierarquia e disciplina na PMMG",
            "Pilares institucionais em uma sociedade moderna.",
            Difficulty::Facil,
        ),
    ];

    entries
        .into_iter()
        .map(|(category, title, description, difficulty)| Theme {
            id: None,
            category,
            title: title.to_string(),
            description: description.to_string(),
            difficulty,
        })
        .collect()
}

/// GET /api/v1/themes — the theme-suggestion feature, blocked for the free
/// tier.
pub async fn handle_list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Theme>>, AppError> {
    let ctx = session::resolve(&state, &headers).await?;
    entitlement::require(ctx.profile.tier, Capability::ThemeSuggestion)?;

    let themes = match state.store.list_themes().await {
        Ok(themes) if !themes.is_empty() => themes,
        Ok(_) => fallback_themes(),
        Err(e) => {
            warn!("Theme catalog unavailable, serving fallback: {e}");
            fallback_themes()
        }
    };
    Ok(Json(themes))
}

#[derive(Deserialize)]
pub struct CreateThemeRequest {
    pub category: ThemeCategory,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
}

/// POST /api/v1/themes — mentor only.
pub async fn handle_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateThemeRequest>,
) -> Result<(StatusCode, Json<Theme>), AppError> {
    let ctx = session::resolve(&state, &headers).await?;
    if ctx.profile.role != Role::Mentor {
        return Err(AppError::Forbidden);
    }
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("theme title is required".to_string()));
    }

    let theme = Theme {
        id: Some(Uuid::new_v4()),
        category: req.category,
        title: req.title,
        description: req.description,
        difficulty: req.difficulty,
    };
    state.store.insert_theme(&theme).await?;
    Ok((StatusCode::CREATED, Json(theme)))
}

/// DELETE /api/v1/themes/:id — mentor only.
pub async fn handle_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let ctx = session::resolve(&state, &headers).await?;
    if ctx.profile.role != Role::Mentor {
        return Err(AppError::Forbidden);
    }
    state.store.delete_theme(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

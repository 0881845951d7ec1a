//! Correction lifecycle: validate the submission, gate it, call the grading
//! function, enrich and persist the result, and settle credits.

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::entitlement::{self, Capability};
use crate::errors::AppError;
use crate::grading::{EssayFile, EssayGrader, GradingRequest};
use crate::models::correction::CorrectionResult;
use crate::session::SessionContext;
use crate::store::ProfileStore;

/// Theme stamped onto a correction when the student entered none.
pub const FREE_THEME: &str = "Tema Livre";

#[derive(Debug, Deserialize)]
pub struct SubmitEssayRequest {
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub essay_text: String,
    #[serde(default)]
    pub file: Option<EssayFile>,
    #[serde(default)]
    pub api_key_override: Option<String>,
}

/// Whitespace word count; the empty string counts zero words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Runs one grading pass for the session user.
///
/// Failures before persistence leave no partial record and never touch
/// credits. Mentors grade for free; everyone else pays one credit, floored
/// at zero.
pub async fn submit_essay(
    store: &dyn ProfileStore,
    grader: &dyn EssayGrader,
    session: &SessionContext,
    req: SubmitEssayRequest,
) -> Result<CorrectionResult, AppError> {
    let profile = &session.profile;

    match &req.file {
        Some(file) => {
            if file.base64.trim().is_empty() {
                return Err(AppError::Validation(
                    "attach a photo or PDF of your essay".to_string(),
                ));
            }
        }
        None => {
            if req.essay_text.trim().is_empty() {
                return Err(AppError::Validation(
                    "type your essay before submitting".to_string(),
                ));
            }
            debug!(
                "Text submission from {} ({} words locally)",
                profile.email,
                word_count(&req.essay_text)
            );
        }
    }

    // Credits gate first: a student with nothing left is sent to the store
    // before any upsell decision.
    if profile.consumes_credits() && profile.credits <= 0 {
        return Err(AppError::CreditsExhausted);
    }

    if req.file.is_some() {
        entitlement::require(profile.tier, Capability::PhotoSubmission)?;
    }

    let graded = grader
        .grade(&GradingRequest {
            theme: req.theme.clone(),
            title: req.title,
            essay_text: req.essay_text,
            file: req.file,
            api_key_override: req.api_key_override,
        })
        .await?;

    let theme = if req.theme.trim().is_empty() {
        FREE_THEME.to_string()
    } else {
        req.theme
    };
    let result = CorrectionResult {
        id: Uuid::new_v4(),
        date: Utc::now(),
        theme,
        graded,
    };

    store.insert_correction(profile.id, &result).await?;
    if profile.consumes_credits() {
        store.consume_credit(profile.id).await?;
    }

    info!(
        "Correction {} persisted for {} (score {})",
        result.id, profile.email, result.graded.final_score
    );
    Ok(result)
}

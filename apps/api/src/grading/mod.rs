//! Essay grading — the single point of entry for all Gemini API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! All grading interactions MUST go through the [`EssayGrader`] trait.

pub mod gemini;
pub mod prompts;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::models::correction::GradedEssay;

#[derive(Debug, Error)]
pub enum GradingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no grading API key configured")]
    MissingCredential,

    #[error("grader returned empty content")]
    EmptyContent,

    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },
}

/// Attached file for photo/PDF submissions; bytes travel base64-encoded
/// end to end, the grader never decodes them.
#[derive(Debug, Clone, Deserialize)]
pub struct EssayFile {
    pub base64: String,
    pub mime_type: String,
}

/// One grading request. `api_key_override` is the client-held credential
/// from the original system; it is honored only when no server-side key is
/// configured.
#[derive(Debug, Clone)]
pub struct GradingRequest {
    pub theme: String,
    pub title: String,
    pub essay_text: String,
    pub file: Option<EssayFile>,
    pub api_key_override: Option<String>,
}

/// Opaque grading function: essay in, structured score out.
#[async_trait]
pub trait EssayGrader: Send + Sync {
    async fn grade(&self, request: &GradingRequest) -> Result<GradedEssay, GradingError>;
}

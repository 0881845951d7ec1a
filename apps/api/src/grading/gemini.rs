use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::prompts;
use super::{EssayGrader, GradingError, GradingRequest};
use crate::models::correction::GradedEssay;

/// The model used for all grading calls.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.5-flash";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MAX_RETRIES: u32 = 3;
/// Lower temperature for more consistent grading.
const TEMPERATURE: f32 = 0.4;

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiResponse {
    fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.iter().find_map(|p| p.text.as_deref()))
    }
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The production [`EssayGrader`]. Wraps the Gemini `generateContent`
/// endpoint with a fixed JSON response schema and retry with exponential
/// backoff on 429/5xx.
#[derive(Clone)]
pub struct GeminiGrader {
    client: Client,
    api_key: Option<String>,
}

impl GeminiGrader {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Server key wins; the client-held override is only a fallback for
    /// deployments without a configured credential.
    fn resolve_key<'a>(&'a self, request: &'a GradingRequest) -> Result<&'a str, GradingError> {
        self.api_key
            .as_deref()
            .or(request.api_key_override.as_deref())
            .ok_or(GradingError::MissingCredential)
    }

    fn build_parts<'a>(request: &'a GradingRequest) -> Vec<Part<'a>> {
        let mut parts = Vec::new();
        if let Some(file) = &request.file {
            parts.push(Part::Text {
                text: prompts::FILE_INSTRUCTION.to_string(),
            });
            parts.push(Part::Inline {
                inline_data: InlineData {
                    mime_type: &file.mime_type,
                    data: &file.base64,
                },
            });
        } else {
            parts.push(Part::Text {
                text: prompts::typed_instruction(&request.essay_text),
            });
        }
        parts.push(Part::Text {
            text: prompts::system_prompt(&request.theme, &request.title),
        });
        parts
    }

    async fn call(&self, request: &GradingRequest) -> Result<String, GradingError> {
        let key = self.resolve_key(request)?;
        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent?key={key}");

        let body = GeminiRequest {
            contents: vec![Content {
                role: "user",
                parts: Self::build_parts(request),
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: correction_schema(),
                temperature: TEMPERATURE,
            },
        };

        let mut last_error: Option<GradingError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Grading call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&url).json(&body).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(GradingError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let text = response.text().await.unwrap_or_default();
                warn!("Gemini API returned {}: {}", status, text);
                last_error = Some(GradingError::Api {
                    status: status.as_u16(),
                    message: text,
                });
                continue;
            }

            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiErrorEnvelope>(&text)
                    .map(|e| e.error.message)
                    .unwrap_or(text);
                return Err(GradingError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: GeminiResponse = response.json().await?;
            let text = parsed.text().ok_or(GradingError::EmptyContent)?;
            debug!("Grading call succeeded ({} bytes of JSON)", text.len());
            return Ok(text.to_string());
        }

        Err(last_error.unwrap_or(GradingError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl EssayGrader for GeminiGrader {
    async fn grade(&self, request: &GradingRequest) -> Result<GradedEssay, GradingError> {
        let text = self.call(request).await?;
        // The schema pins the output, but the model still occasionally wraps
        // JSON in markdown fences.
        let cleaned = strip_json_fences(&text);
        serde_json::from_str(cleaned).map_err(GradingError::Parse)
    }
}

/// Response schema sent with every grading call, pinning the CorrectionResult
/// field set.
fn correction_schema() -> Value {
    let criterion = json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "NUMBER" },
            "errors": { "type": "ARRAY", "items": { "type": "STRING" } }
        }
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "transcricao": { "type": "STRING" },
            "contagem_palavras_ia": { "type": "INTEGER" },
            "ortografia": criterion.clone(),
            "morfossintaxe": criterion.clone(),
            "pontuacao": criterion,
            "conteudo": {
                "type": "OBJECT",
                "properties": {
                    "score": { "type": "NUMBER" },
                    "feedback": { "type": "STRING" }
                }
            },
            "penalidades": {
                "type": "OBJECT",
                "properties": {
                    "titulo_ausente": { "type": "BOOLEAN" },
                    "palavras_faltantes": { "type": "NUMBER" },
                    "total_deducao": { "type": "NUMBER" }
                }
            },
            "legibilidade": {
                "type": "OBJECT",
                "nullable": true,
                "properties": {
                    "nota": { "type": "NUMBER" },
                    "feedback": { "type": "STRING" }
                }
            },
            "nota_final": { "type": "NUMBER" },
            "dica_pestana": { "type": "STRING" },
            "versao_ideal": { "type": "STRING" }
        }
    })
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire field names follow the Gemini JSON contract (Portuguese); Rust
/// field names stay English. The stored `result` JSONB column uses the same
/// shape, so a correction round-trips through the store unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriterionScore {
    pub score: f32,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentFeedback {
    pub score: f32,
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Penalties {
    #[serde(rename = "titulo_ausente")]
    pub missing_title: bool,
    #[serde(rename = "palavras_faltantes")]
    pub missing_words: i32,
    #[serde(rename = "total_deducao")]
    pub total_deduction: f32,
}

/// Present only when the submission was a photo or PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandwritingAnalysis {
    #[serde(rename = "nota")]
    pub score: f32,
    pub feedback: String,
}

/// The structured result returned by the grading function, before the
/// orchestrator stamps identity, date and theme onto it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedEssay {
    #[serde(rename = "transcricao")]
    pub transcription: String,
    #[serde(rename = "contagem_palavras_ia")]
    pub word_count: i32,
    #[serde(rename = "ortografia")]
    pub orthography: CriterionScore,
    #[serde(rename = "morfossintaxe")]
    pub morphosyntax: CriterionScore,
    #[serde(rename = "pontuacao")]
    pub punctuation: CriterionScore,
    #[serde(rename = "conteudo")]
    pub content: ContentFeedback,
    #[serde(rename = "penalidades")]
    pub penalties: Penalties,
    #[serde(rename = "legibilidade", skip_serializing_if = "Option::is_none")]
    pub legibility: Option<HandwritingAnalysis>,
    #[serde(rename = "nota_final")]
    pub final_score: f32,
    #[serde(rename = "dica_pestana")]
    pub mentoring_tip: String,
    #[serde(rename = "versao_ideal")]
    pub ideal_version: String,
}

/// One completed grading pass. Immutable once persisted; owned by the user
/// who submitted it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub theme: String,
    #[serde(flatten)]
    pub graded: GradedEssay,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graded() -> GradedEssay {
        GradedEssay {
            transcription: "Texto da redação.".to_string(),
            word_count: 3,
            orthography: CriterionScore {
                score: 19.0,
                errors: vec!["acentuação em 'redacao'".to_string()],
            },
            morphosyntax: CriterionScore {
                score: 20.0,
                errors: vec![],
            },
            punctuation: CriterionScore {
                score: 18.0,
                errors: vec![],
            },
            content: ContentFeedback {
                score: 35.0,
                feedback: "Boa argumentação.".to_string(),
            },
            penalties: Penalties {
                missing_title: false,
                missing_words: 0,
                total_deduction: 0.0,
            },
            legibility: None,
            final_score: 92.0,
            mentoring_tip: "Revise o uso da crase.".to_string(),
            ideal_version: "Versão reescrita.".to_string(),
        }
    }

    #[test]
    fn test_graded_essay_uses_portuguese_wire_names() {
        let value = serde_json::to_value(sample_graded()).unwrap();
        assert!(value.get("transcricao").is_some());
        assert!(value.get("contagem_palavras_ia").is_some());
        assert!(value.get("ortografia").is_some());
        assert!(value.get("nota_final").is_some());
        assert!(value.get("versao_ideal").is_some());
        // optional field is omitted entirely when absent
        assert!(value.get("legibilidade").is_none());
    }

    #[test]
    fn test_correction_result_flattens_graded_fields() {
        let result = CorrectionResult {
            id: Uuid::new_v4(),
            date: Utc::now(),
            theme: "Tema Livre".to_string(),
            graded: sample_graded(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("id").is_some());
        assert!(value.get("theme").is_some());
        assert!(value.get("nota_final").is_some());

        let back: CorrectionResult = serde_json::from_value(value).unwrap();
        assert_eq!(back.id, result.id);
        assert_eq!(back.graded.word_count, 3);
    }

    #[test]
    fn test_parses_grader_payload_with_legibility() {
        let raw = serde_json::json!({
            "transcricao": "texto",
            "contagem_palavras_ia": 130,
            "ortografia": {"score": 18.0, "errors": []},
            "morfossintaxe": {"score": 17.0, "errors": ["regência"]},
            "pontuacao": {"score": 20.0, "errors": []},
            "conteudo": {"score": 32.0, "feedback": "ok"},
            "penalidades": {"titulo_ausente": true, "palavras_faltantes": 0, "total_deducao": 1.0},
            "legibilidade": {"nota": 8.0, "feedback": "letra firme"},
            "nota_final": 86.0,
            "dica_pestana": "dica",
            "versao_ideal": "reescrita"
        });
        let graded: GradedEssay = serde_json::from_value(raw).unwrap();
        assert_eq!(graded.legibility.as_ref().map(|l| l.score), Some(8.0));
        assert!(graded.penalties.missing_title);
    }
}

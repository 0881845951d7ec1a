use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeCategory {
    #[serde(rename = "Segurança")]
    Seguranca,
    #[serde(rename = "Sociedade")]
    Sociedade,
    #[serde(rename = "Direito")]
    Direito,
    #[serde(rename = "Tecnologia")]
    Tecnologia,
    #[serde(rename = "Polícia")]
    Policia,
}

impl ThemeCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            ThemeCategory::Seguranca => "Segurança",
            ThemeCategory::Sociedade => "Sociedade",
            ThemeCategory::Direito => "Direito",
            ThemeCategory::Tecnologia => "Tecnologia",
            ThemeCategory::Policia => "Polícia",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Segurança" => Some(ThemeCategory::Seguranca),
            "Sociedade" => Some(ThemeCategory::Sociedade),
            "Direito" => Some(ThemeCategory::Direito),
            "Tecnologia" => Some(ThemeCategory::Tecnologia),
            "Polícia" => Some(ThemeCategory::Policia),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "Fácil")]
    Facil,
    #[serde(rename = "Médio")]
    Medio,
    #[serde(rename = "Difícil")]
    Dificil,
}

impl Difficulty {
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Facil => "Fácil",
            Difficulty::Medio => "Médio",
            Difficulty::Dificil => "Difícil",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Fácil" => Some(Difficulty::Facil),
            "Médio" => Some(Difficulty::Medio),
            "Difícil" => Some(Difficulty::Dificil),
            _ => None,
        }
    }
}

/// Writing-prompt catalog entry. Fallback catalog entries carry no id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub category: ThemeCategory,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serde_keeps_accents() {
        let json = serde_json::to_string(&ThemeCategory::Seguranca).unwrap();
        assert_eq!(json, "\"Segurança\"");
        let cat: ThemeCategory = serde_json::from_str("\"Polícia\"").unwrap();
        assert_eq!(cat, ThemeCategory::Policia);
    }

    #[test]
    fn test_difficulty_round_trip() {
        for d in [Difficulty::Facil, Difficulty::Medio, Difficulty::Dificil] {
            assert_eq!(Difficulty::parse(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::parse("Impossível"), None);
    }
}

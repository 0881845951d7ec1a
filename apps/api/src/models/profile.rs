use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription tier. Stored and serialized as the uppercase token the
/// payment provider and the front end use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Gratuito,
    Iron,
    Platinum,
    Gold,
    Mentor,
}

impl Tier {
    /// Single source of truth for the tier → base credits table.
    /// Consumed by registration, admin edits and the payment webhook.
    pub const fn base_credits(self) -> i32 {
        match self {
            Tier::Gratuito => 2,
            Tier::Iron => 10,
            Tier::Platinum => 20,
            Tier::Gold => 40,
            Tier::Mentor => 9999,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Tier::Gratuito => "GRATUITO",
            Tier::Iron => "IRON",
            Tier::Platinum => "PLATINUM",
            Tier::Gold => "GOLD",
            Tier::Mentor => "MENTOR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "GRATUITO" => Some(Tier::Gratuito),
            "IRON" => Some(Tier::Iron),
            "PLATINUM" => Some(Tier::Platinum),
            "GOLD" => Some(Tier::Gold),
            "MENTOR" => Some(Tier::Mentor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Mentor,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Mentor => "mentor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "mentor" => Some(Role::Mentor),
            _ => None,
        }
    }
}

/// A user profile row. Corrections are stored separately and joined in
/// per-session responses, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub instagram: Option<String>,
    pub role: Role,
    pub tier: Tier,
    pub credits: i32,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Mentors are exempt from credit consumption.
    pub fn consumes_credits(&self) -> bool {
        self.role != Role::Mentor
    }
}

/// Partial profile update applied by admin edits. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub instagram: Option<String>,
    pub tier: Option<Tier>,
    pub credits: Option<i32>,
}

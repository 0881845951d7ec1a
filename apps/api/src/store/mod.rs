pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::correction::CorrectionResult;
use crate::models::profile::{Profile, ProfileUpdate, Tier};
use crate::models::theme::Theme;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored row could not be decoded: {0}")]
    Decode(String),
}

/// Persistence seam for profiles, corrections and themes.
///
/// The production implementation is [`postgres::PgStore`]; tests run
/// against an in-memory store so orchestrator and webhook behavior can be
/// exercised without a database.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn profile_by_id(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;
    async fn profile_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError>;
    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError>;
    async fn update_profile(&self, id: Uuid, changes: &ProfileUpdate) -> Result<(), StoreError>;
    async fn delete_profile(&self, id: Uuid) -> Result<(), StoreError>;
    /// Student profiles only, newest first. History is not loaded here.
    async fn list_student_profiles(&self) -> Result<Vec<Profile>, StoreError>;

    /// Additive credit grant plus unconditional tier overwrite
    /// (last-purchased-wins).
    async fn apply_purchase(
        &self,
        id: Uuid,
        tier: Tier,
        credits_to_add: i32,
    ) -> Result<(), StoreError>;

    /// Decrements credits by one, floored at zero.
    async fn consume_credit(&self, id: Uuid) -> Result<(), StoreError>;

    async fn insert_correction(
        &self,
        user_id: Uuid,
        result: &CorrectionResult,
    ) -> Result<(), StoreError>;
    async fn correction_by_id(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<CorrectionResult>, StoreError>;
    /// Full history for a user, newest first.
    async fn corrections_for_user(&self, user_id: Uuid) -> Result<Vec<CorrectionResult>, StoreError>;

    /// All themes, newest first.
    async fn list_themes(&self) -> Result<Vec<Theme>, StoreError>;
    async fn insert_theme(&self, theme: &Theme) -> Result<(), StoreError>;
    async fn delete_theme(&self, id: Uuid) -> Result<(), StoreError>;
}

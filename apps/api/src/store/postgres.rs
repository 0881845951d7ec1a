use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{ProfileStore, StoreError};
use crate::models::correction::CorrectionResult;
use crate::models::profile::{Profile, ProfileUpdate, Role, Tier};
use crate::models::theme::{Difficulty, Theme, ThemeCategory};

/// PostgreSQL-backed store. Tables mirror the original hosted schema:
/// `profiles`, `corrections` (append-only, result stored as JSONB) and
/// `themes`. Role, tier, category and difficulty are TEXT columns holding
/// the wire tokens.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    email: String,
    name: String,
    instagram: Option<String>,
    role: String,
    tier: String,
    credits: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = StoreError;

    fn try_from(row: ProfileRow) -> Result<Self, StoreError> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| StoreError::Decode(format!("unknown role '{}'", row.role)))?;
        let tier = Tier::parse(&row.tier)
            .ok_or_else(|| StoreError::Decode(format!("unknown tier '{}'", row.tier)))?;
        Ok(Profile {
            id: row.id,
            email: row.email,
            name: row.name,
            instagram: row.instagram,
            role,
            tier,
            credits: row.credits,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct CorrectionRow {
    result: serde_json::Value,
}

impl TryFrom<CorrectionRow> for CorrectionResult {
    type Error = StoreError;

    fn try_from(row: CorrectionRow) -> Result<Self, StoreError> {
        serde_json::from_value(row.result).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[derive(Debug, FromRow)]
struct ThemeRow {
    id: Uuid,
    category: String,
    title: String,
    description: String,
    difficulty: String,
}

impl TryFrom<ThemeRow> for Theme {
    type Error = StoreError;

    fn try_from(row: ThemeRow) -> Result<Self, StoreError> {
        let category = ThemeCategory::parse(&row.category)
            .ok_or_else(|| StoreError::Decode(format!("unknown category '{}'", row.category)))?;
        let difficulty = Difficulty::parse(&row.difficulty)
            .ok_or_else(|| StoreError::Decode(format!("unknown difficulty '{}'", row.difficulty)))?;
        Ok(Theme {
            id: Some(row.id),
            category,
            title: row.title,
            description: row.description,
            difficulty,
        })
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn profile_by_id(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let row: Option<ProfileRow> = sqlx::query_as("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Profile::try_from).transpose()
    }

    async fn profile_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError> {
        let row: Option<ProfileRow> = sqlx::query_as("SELECT * FROM profiles WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Profile::try_from).transpose()
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, email, name, instagram, role, tier, credits, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(profile.id)
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(&profile.instagram)
        .bind(profile.role.as_str())
        .bind(profile.tier.as_str())
        .bind(profile.credits)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_profile(&self, id: Uuid, changes: &ProfileUpdate) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE profiles
            SET name = COALESCE($2, name),
                instagram = COALESCE($3, instagram),
                tier = COALESCE($4, tier),
                credits = COALESCE($5, credits)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.instagram)
        .bind(changes.tier.map(Tier::as_str))
        .bind(changes.credits)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_profile(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_student_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let rows: Vec<ProfileRow> =
            sqlx::query_as("SELECT * FROM profiles WHERE role = 'student' ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(Profile::try_from).collect()
    }

    async fn apply_purchase(
        &self,
        id: Uuid,
        tier: Tier,
        credits_to_add: i32,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE profiles SET credits = credits + $2, tier = $3 WHERE id = $1")
            .bind(id)
            .bind(credits_to_add)
            .bind(tier.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn consume_credit(&self, id: Uuid) -> Result<(), StoreError> {
        // Floored at zero in the database, not in application code, so a
        // concurrent decrement can never drive the counter negative.
        sqlx::query("UPDATE profiles SET credits = GREATEST(credits - 1, 0) WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_correction(
        &self,
        user_id: Uuid,
        result: &CorrectionResult,
    ) -> Result<(), StoreError> {
        let payload =
            serde_json::to_value(result).map_err(|e| StoreError::Decode(e.to_string()))?;
        sqlx::query(
            "INSERT INTO corrections (id, user_id, result, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(result.id)
        .bind(user_id)
        .bind(payload)
        .bind(result.date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn correction_by_id(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<CorrectionResult>, StoreError> {
        let row: Option<CorrectionRow> =
            sqlx::query_as("SELECT result FROM corrections WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(CorrectionResult::try_from).transpose()
    }

    async fn corrections_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CorrectionResult>, StoreError> {
        let rows: Vec<CorrectionRow> = sqlx::query_as(
            "SELECT result FROM corrections WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(CorrectionResult::try_from).collect()
    }

    async fn list_themes(&self) -> Result<Vec<Theme>, StoreError> {
        let rows: Vec<ThemeRow> = sqlx::query_as(
            "SELECT id, category, title, description, difficulty FROM themes ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Theme::try_from).collect()
    }

    async fn insert_theme(&self, theme: &Theme) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO themes (id, category, title, description, difficulty, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(theme.id.unwrap_or_else(Uuid::new_v4))
        .bind(theme.category.as_str())
        .bind(&theme.title)
        .bind(&theme.description)
        .bind(theme.difficulty.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_theme(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM themes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

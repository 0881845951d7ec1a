//! In-memory [`ProfileStore`] used by orchestrator and webhook tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ProfileStore, StoreError};
use crate::models::correction::CorrectionResult;
use crate::models::profile::{Profile, ProfileUpdate, Role, Tier};
use crate::models::theme::Theme;

#[derive(Default)]
struct Inner {
    profiles: HashMap<Uuid, Profile>,
    corrections: Vec<(Uuid, CorrectionResult)>,
    themes: Vec<Theme>,
    fail_writes: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: Profile) -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().profiles.insert(profile.id, profile);
        store
    }

    pub fn add_profile(&self, profile: Profile) {
        self.inner.lock().unwrap().profiles.insert(profile.id, profile);
    }

    /// Makes every subsequent write fail, to exercise persistence-failure
    /// paths.
    pub fn fail_writes(&self) {
        self.inner.lock().unwrap().fail_writes = true;
    }

    pub fn profile(&self, id: Uuid) -> Option<Profile> {
        self.inner.lock().unwrap().profiles.get(&id).cloned()
    }

    pub fn correction_count(&self) -> usize {
        self.inner.lock().unwrap().corrections.len()
    }

    fn write_guard(inner: &Inner) -> Result<(), StoreError> {
        if inner.fail_writes {
            return Err(StoreError::Decode("simulated write failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn profile_by_id(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.inner.lock().unwrap().profiles.get(&id).cloned())
    }

    async fn profile_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .profiles
            .values()
            .find(|p| p.email == email)
            .cloned())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::write_guard(&inner)?;
        inner.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn update_profile(&self, id: Uuid, changes: &ProfileUpdate) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::write_guard(&inner)?;
        if let Some(profile) = inner.profiles.get_mut(&id) {
            if let Some(name) = &changes.name {
                profile.name = name.clone();
            }
            if let Some(instagram) = &changes.instagram {
                profile.instagram = Some(instagram.clone());
            }
            if let Some(tier) = changes.tier {
                profile.tier = tier;
            }
            if let Some(credits) = changes.credits {
                profile.credits = credits;
            }
        }
        Ok(())
    }

    async fn delete_profile(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::write_guard(&inner)?;
        inner.profiles.remove(&id);
        Ok(())
    }

    async fn list_student_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut students: Vec<Profile> = inner
            .profiles
            .values()
            .filter(|p| p.role == Role::Student)
            .cloned()
            .collect();
        students.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(students)
    }

    async fn apply_purchase(
        &self,
        id: Uuid,
        tier: Tier,
        credits_to_add: i32,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::write_guard(&inner)?;
        let profile = inner
            .profiles
            .get_mut(&id)
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;
        profile.credits += credits_to_add;
        profile.tier = tier;
        Ok(())
    }

    async fn consume_credit(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::write_guard(&inner)?;
        if let Some(profile) = inner.profiles.get_mut(&id) {
            profile.credits = (profile.credits - 1).max(0);
        }
        Ok(())
    }

    async fn insert_correction(
        &self,
        user_id: Uuid,
        result: &CorrectionResult,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::write_guard(&inner)?;
        inner.corrections.push((user_id, result.clone()));
        Ok(())
    }

    async fn correction_by_id(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<CorrectionResult>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .corrections
            .iter()
            .find(|(owner, c)| *owner == user_id && c.id == id)
            .map(|(_, c)| c.clone()))
    }

    async fn corrections_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CorrectionResult>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut history: Vec<CorrectionResult> = inner
            .corrections
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, c)| c.clone())
            .collect();
        history.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(history)
    }

    async fn list_themes(&self) -> Result<Vec<Theme>, StoreError> {
        // Newest first, like the SQL store's created_at ordering.
        let mut themes = self.inner.lock().unwrap().themes.clone();
        themes.reverse();
        Ok(themes)
    }

    async fn insert_theme(&self, theme: &Theme) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::write_guard(&inner)?;
        let mut theme = theme.clone();
        theme.id.get_or_insert_with(Uuid::new_v4);
        inner.themes.push(theme);
        Ok(())
    }

    async fn delete_theme(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::write_guard(&inner)?;
        inner.themes.retain(|t| t.id != Some(id));
        Ok(())
    }
}

/// Builds a student profile for tests.
pub fn test_profile(tier: Tier, credits: i32) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", Uuid::new_v4()),
        name: "Aluno Teste".to_string(),
        instagram: None,
        role: Role::Student,
        tier,
        credits,
        created_at: chrono::Utc::now(),
    }
}

/// Builds a mentor profile for tests.
pub fn test_mentor() -> Profile {
    Profile {
        role: Role::Mentor,
        ..test_profile(Tier::Mentor, Tier::Mentor.base_credits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::theme::{Difficulty, Theme, ThemeCategory};

    fn theme(title: &str) -> Theme {
        Theme {
            id: None,
            category: ThemeCategory::Sociedade,
            title: title.to_string(),
            description: String::new(),
            difficulty: Difficulty::Medio,
        }
    }

    #[tokio::test]
    async fn test_list_themes_newest_first() {
        let store = MemoryStore::new();
        store.insert_theme(&theme("primeiro")).await.unwrap();
        store.insert_theme(&theme("segundo")).await.unwrap();

        let themes = store.list_themes().await.unwrap();
        assert_eq!(themes[0].title, "segundo");
        assert_eq!(themes[1].title, "primeiro");
    }
}

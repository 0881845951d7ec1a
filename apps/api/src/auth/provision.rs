//! Profile provisioning. Registration and the lazy self-healing path both
//! funnel through the same defaults so the admin rule and the base-credit
//! table cannot drift apart.

use chrono::Utc;
use tracing::info;

use super::AuthAccount;
use crate::errors::AppError;
use crate::models::profile::{Profile, Role, Tier};
use crate::store::ProfileStore;

/// Fallback student name when registration metadata carries none.
const DEFAULT_NAME: &str = "Imbatível";

/// Role, tier and starting credits for a new account. The fixed admin
/// address receives the elevated mentor treatment regardless of the
/// requested tier.
pub fn registration_defaults(is_admin: bool, requested_tier: Tier) -> (Role, Tier, i32) {
    if is_admin {
        (Role::Mentor, Tier::Mentor, Tier::Mentor.base_credits())
    } else {
        (Role::Student, requested_tier, requested_tier.base_credits())
    }
}

/// Builds the profile row for an authenticated account that has none yet,
/// reading registration hints from the auth metadata.
pub fn profile_from_account(account: &AuthAccount, admin_email: &str) -> Profile {
    let meta = &account.user_metadata;
    let requested_tier = meta
        .get("tier")
        .and_then(|v| v.as_str())
        .and_then(Tier::parse)
        .unwrap_or(Tier::Gratuito);
    let is_admin = account.email == admin_email;
    let (role, tier, credits) = registration_defaults(is_admin, requested_tier);

    Profile {
        id: account.id,
        email: account.email.clone(),
        name: meta
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_NAME)
            .to_string(),
        instagram: meta
            .get("instagram")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        role,
        tier,
        credits,
        created_at: Utc::now(),
    }
}

/// Idempotent "ensure profile exists" step run after authentication. If the
/// profile row is missing (registration raced, or the insert failed back
/// then), it is recreated from the auth metadata.
pub async fn ensure_profile(
    store: &dyn ProfileStore,
    account: &AuthAccount,
    admin_email: &str,
) -> Result<Profile, AppError> {
    if let Some(profile) = store.profile_by_id(account.id).await? {
        return Ok(profile);
    }

    let profile = profile_from_account(account, admin_email);
    store.insert_profile(&profile).await?;
    info!(
        "Provisioned missing profile for {} (tier {})",
        profile.email,
        profile.tier.as_str()
    );
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use serde_json::json;
    use uuid::Uuid;

    const ADMIN: &str = "gugakgb@hotmail.com";

    fn account(email: &str, metadata: serde_json::Value) -> AuthAccount {
        AuthAccount {
            id: Uuid::new_v4(),
            email: email.to_string(),
            user_metadata: metadata,
        }
    }

    #[test]
    fn test_registration_defaults_student() {
        assert_eq!(
            registration_defaults(false, Tier::Gratuito),
            (Role::Student, Tier::Gratuito, 2)
        );
        assert_eq!(
            registration_defaults(false, Tier::Gold),
            (Role::Student, Tier::Gold, 40)
        );
    }

    #[test]
    fn test_registration_defaults_admin_overrides_request() {
        assert_eq!(
            registration_defaults(true, Tier::Iron),
            (Role::Mentor, Tier::Mentor, 9999)
        );
    }

    #[test]
    fn test_profile_from_account_reads_metadata() {
        let acc = account(
            "aluno@example.com",
            json!({ "name": "Maria", "instagram": "@maria", "tier": "PLATINUM" }),
        );
        let profile = profile_from_account(&acc, ADMIN);
        assert_eq!(profile.name, "Maria");
        assert_eq!(profile.instagram.as_deref(), Some("@maria"));
        assert_eq!(profile.tier, Tier::Platinum);
        assert_eq!(profile.credits, 20);
        assert_eq!(profile.role, Role::Student);
    }

    #[test]
    fn test_profile_from_account_defaults() {
        let acc = account("aluno@example.com", json!({}));
        let profile = profile_from_account(&acc, ADMIN);
        assert_eq!(profile.name, DEFAULT_NAME);
        assert_eq!(profile.instagram, None);
        assert_eq!(profile.tier, Tier::Gratuito);
        assert_eq!(profile.credits, 2);
    }

    #[test]
    fn test_admin_email_gets_elevated_profile() {
        let acc = account(ADMIN, json!({ "tier": "IRON" }));
        let profile = profile_from_account(&acc, ADMIN);
        assert_eq!(profile.role, Role::Mentor);
        assert_eq!(profile.tier, Tier::Mentor);
        assert_eq!(profile.credits, 9999);
    }

    #[tokio::test]
    async fn test_ensure_profile_creates_then_reuses() {
        let store = MemoryStore::new();
        let acc = account("aluno@example.com", json!({ "name": "João" }));

        let created = ensure_profile(&store, &acc, ADMIN).await.unwrap();
        assert_eq!(created.name, "João");

        // Second call must not re-provision or reset anything.
        store
            .consume_credit(created.id)
            .await
            .expect("consume credit");
        let reloaded = ensure_profile(&store, &acc, ADMIN).await.unwrap();
        assert_eq!(reloaded.credits, created.credits - 1);
    }
}

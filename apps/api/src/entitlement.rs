//! Tier entitlement gate. Pure decisions, re-evaluated on every gated
//! action; a blocked outcome only signals the upsell, it never performs the
//! underlying action.

use crate::errors::AppError;
use crate::models::profile::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Submitting a photographed or PDF essay instead of typed text.
    PhotoSubmission,
    /// The theme-suggestion catalog.
    ThemeSuggestion,
    /// The rewritten "ideal version" comparison view.
    IdealVersion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Blocked for this tier; show the upsell prompt.
    Upsell,
}

pub fn check(tier: Tier, capability: Capability) -> Access {
    let granted = match capability {
        Capability::PhotoSubmission | Capability::ThemeSuggestion => tier != Tier::Gratuito,
        Capability::IdealVersion => {
            matches!(tier, Tier::Mentor | Tier::Gold | Tier::Platinum)
        }
    };
    if granted {
        Access::Granted
    } else {
        Access::Upsell
    }
}

/// Handler-side convenience: turns a blocked decision into the upsell error.
pub fn require(tier: Tier, capability: Capability) -> Result<(), AppError> {
    match check(tier, capability) {
        Access::Granted => Ok(()),
        Access::Upsell => Err(AppError::UpgradeRequired),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TIERS: [Tier; 5] = [
        Tier::Gratuito,
        Tier::Iron,
        Tier::Platinum,
        Tier::Gold,
        Tier::Mentor,
    ];

    #[test]
    fn test_photo_submission_blocked_only_for_free_tier() {
        for tier in ALL_TIERS {
            let expected = if tier == Tier::Gratuito {
                Access::Upsell
            } else {
                Access::Granted
            };
            assert_eq!(check(tier, Capability::PhotoSubmission), expected, "{tier:?}");
        }
    }

    #[test]
    fn test_theme_suggestion_blocked_only_for_free_tier() {
        assert_eq!(check(Tier::Gratuito, Capability::ThemeSuggestion), Access::Upsell);
        for tier in [Tier::Iron, Tier::Platinum, Tier::Gold, Tier::Mentor] {
            assert_eq!(check(tier, Capability::ThemeSuggestion), Access::Granted);
        }
    }

    #[test]
    fn test_ideal_version_needs_upper_tiers() {
        assert_eq!(check(Tier::Mentor, Capability::IdealVersion), Access::Granted);
        assert_eq!(check(Tier::Gold, Capability::IdealVersion), Access::Granted);
        assert_eq!(check(Tier::Platinum, Capability::IdealVersion), Access::Granted);
        assert_eq!(check(Tier::Gratuito, Capability::IdealVersion), Access::Upsell);
        assert_eq!(check(Tier::Iron, Capability::IdealVersion), Access::Upsell);
    }

    #[test]
    fn test_require_maps_upsell_to_upgrade_required() {
        assert!(require(Tier::Iron, Capability::PhotoSubmission).is_ok());
        assert!(matches!(
            require(Tier::Gratuito, Capability::PhotoSubmission),
            Err(AppError::UpgradeRequired)
        ));
    }
}

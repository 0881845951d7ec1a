//! Purchased-product → plan resolution. Explicit product-id lookup first,
//! then a case-insensitive substring match against the product name.

use crate::models::profile::Tier;

/// Product ids as configured on the payment provider's dashboard.
const PRODUCT_IDS: &[(&str, Tier)] = &[
    ("t5Ap7Mg", Tier::Iron),
    ("MlhtpJj", Tier::Platinum),
    ("yUzcFtx", Tier::Gold),
];

const NAME_MATCHES: &[(&str, Tier)] = &[
    ("IRON", Tier::Iron),
    ("PLATINUM", Tier::Platinum),
    ("GOLD", Tier::Gold),
];

/// Resolves the purchased plan. Credits to add come from the central
/// base-credit table, so the store and the webhook can never disagree.
pub fn resolve_plan(product_id: Option<&str>, product_name: Option<&str>) -> Option<(Tier, i32)> {
    if let Some(id) = product_id {
        if let Some((_, tier)) = PRODUCT_IDS.iter().find(|(known, _)| *known == id) {
            return Some((*tier, tier.base_credits()));
        }
    }

    let name = product_name?.to_uppercase();
    NAME_MATCHES
        .iter()
        .find(|(token, _)| name.contains(token))
        .map(|(_, tier)| (*tier, tier.base_credits()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_product_id() {
        assert_eq!(resolve_plan(Some("t5Ap7Mg"), None), Some((Tier::Iron, 10)));
        assert_eq!(
            resolve_plan(Some("MlhtpJj"), None),
            Some((Tier::Platinum, 20))
        );
        assert_eq!(resolve_plan(Some("yUzcFtx"), None), Some((Tier::Gold, 40)));
    }

    #[test]
    fn test_resolve_by_name_substring_case_insensitive() {
        assert_eq!(
            resolve_plan(None, Some("Plano Gold Anual")),
            Some((Tier::Gold, 40))
        );
        assert_eq!(
            resolve_plan(Some("unknown-id"), Some("mag platinum")),
            Some((Tier::Platinum, 20))
        );
        assert_eq!(
            resolve_plan(None, Some("IRON mensal")),
            Some((Tier::Iron, 10))
        );
    }

    #[test]
    fn test_unrecognized_product_resolves_to_none() {
        assert_eq!(resolve_plan(None, None), None);
        assert_eq!(resolve_plan(Some("xxx"), Some("Plano Bronze")), None);
    }
}

//! Secondary symptom counter.
//!
//! Counts submitted flags against the fixed 10-item catalog with set
//! semantics: ordering and duplicates are irrelevant, unknown names are
//! ignored rather than rejected.

use std::collections::BTreeSet;

/// The full secondary symptom catalog. The normalized score divides by its
/// length, so the count and the catalog must move together.
pub const SECONDARY_CATALOG: [&str; 10] = [
    "headache",
    "paresthesia",
    "allodynia",
    "ibs",
    "depression",
    "sweating",
    "sensory_sensitivity",
    "menstrual_pain",
    "morning_stiffness",
    "jaw_pain",
];

/// Number of submitted flags that name a catalog item.
pub fn recognized_count(flags: &[String]) -> u32 {
    let submitted: BTreeSet<&str> = flags.iter().map(String::as_str).collect();
    SECONDARY_CATALOG
        .iter()
        .filter(|item| submitted.contains(**item))
        .count() as u32
}

/// Normalized secondary sub-score in [0, 1].
pub fn secondary_score_norm(flags: &[String]) -> f64 {
    f64::from(recognized_count(flags)) / SECONDARY_CATALOG.len() as f64
}

/// Whether a given catalog item was ticked (for the audit row).
pub fn has_flag(flags: &[String], item: &str) -> bool {
    flags.iter().any(|f| f == item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(secondary_score_norm(&[]), 0.0);
    }

    #[test]
    fn test_three_items_score_point_three() {
        let f = flags(&["headache", "ibs", "jaw_pain"]);
        assert_eq!(recognized_count(&f), 3);
        assert!((secondary_score_norm(&f) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_full_catalog_scores_one() {
        let f = flags(&SECONDARY_CATALOG);
        assert_eq!(secondary_score_norm(&f), 1.0);
    }

    #[test]
    fn test_unknown_names_ignored() {
        let f = flags(&["headache", "tinnitus", "vertigo"]);
        assert_eq!(recognized_count(&f), 1);
    }

    #[test]
    fn test_order_invariant() {
        let a = flags(&["ibs", "headache", "sweating"]);
        let b = flags(&["sweating", "ibs", "headache"]);
        assert_eq!(secondary_score_norm(&a), secondary_score_norm(&b));
    }

    #[test]
    fn test_duplicates_counted_once() {
        let f = flags(&["headache", "headache", "headache"]);
        assert_eq!(recognized_count(&f), 1);
        assert!((secondary_score_norm(&f) - 0.1).abs() < 1e-12);
    }
}

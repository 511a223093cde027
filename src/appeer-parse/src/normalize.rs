//! Similarity-threshold normalization of raw publisher/journal strings
//! against the compiled-in name registries.

use crate::{registry::NameRegistry, similarity};

/// Minimum [`similarity::ratio`] for a raw publisher string to be
/// considered a match against a registry entry's `normalized_name`.
pub const PUBLISHER_SIMILARITY_THRESHOLD: f64 = 0.9;

/// Minimum [`similarity::ratio`] for a raw journal string to be
/// considered a match against a registry entry's `normalized_name`.
pub const JOURNAL_SIMILARITY_THRESHOLD: f64 = 0.97;

/// The registry entry whose `normalized_name` or any `name_variants`
/// member scores the highest similarity against `raw`, as long as that
/// score clears `threshold`. `None` if nothing clears the bar. Ties are
/// broken by `normalized_name` so the result doesn't depend on the
/// registry's (hash-map) iteration order.
#[must_use]
pub fn best_match<'a>(raw: &str, registry: &'a NameRegistry, threshold: f64) -> Option<&'a str> {
    registry
        .entries()
        .filter_map(|entry| {
            let score = std::iter::once(entry.normalized_name.as_str())
                .chain(entry.name_variants.iter().map(String::as_str))
                .map(|variant| similarity::ratio(raw, variant))
                .fold(f64::MIN, f64::max);
            (score >= threshold).then_some((score, entry.normalized_name.as_str()))
        })
        .max_by(|(a_score, a_name), (b_score, b_name)| {
            a_score.total_cmp(b_score).then_with(|| a_name.cmp(b_name))
        })
        .map(|(_, name)| name)
}

/// Normalize a raw publisher string against [`crate::registry::publishers_index`].
#[must_use]
pub fn normalized_publisher(raw: &str) -> Option<String> {
    best_match(raw, crate::registry::publishers_index(), PUBLISHER_SIMILARITY_THRESHOLD)
        .map(str::to_string)
}

/// Normalize a raw journal string against the journal registry for
/// `publisher_code` (`None` if the publisher code has no journal
/// registry, or nothing matches).
#[must_use]
pub fn normalized_journal(publisher_code: &str, raw: &str) -> Option<String> {
    let registry = crate::registry::journals_index(publisher_code)?;
    best_match(raw, registry, JOURNAL_SIMILARITY_THRESHOLD).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_variant_matches_publisher() {
        assert_eq!(
            normalized_publisher("RSC").as_deref(),
            Some("Royal Society of Chemistry")
        );
    }

    #[test]
    fn near_variant_matches_journal() {
        assert_eq!(
            normalized_journal("RSC", "Chem. Sci.").as_deref(),
            Some("Chemical Science")
        );
    }

    #[test]
    fn unrelated_string_matches_nothing() {
        assert_eq!(normalized_publisher("Completely Unrelated Org"), None);
        assert_eq!(normalized_journal("RSC", "Completely Unrelated Journal"), None);
    }

    #[test]
    fn unknown_publisher_code_has_no_journal_registry() {
        assert_eq!(normalized_journal("ACME", "Chemical Science"), None);
    }

    #[test]
    fn picks_the_highest_scoring_entry_when_several_clear_the_bar() {
        let registry = NameRegistry::from_json(
            r#"{
                "a": {"normalized_name": "Chemical Science", "name_variants": ["Chemical Science"]},
                "b": {"normalized_name": "Chemical Sciences", "name_variants": ["Chemical Sciences"]}
            }"#,
        )
        .unwrap();

        assert_eq!(
            best_match("Chemical Science", &registry, 0.5),
            Some("Chemical Science")
        );
    }
}

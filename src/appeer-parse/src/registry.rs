//! Compiled-in parser/publisher/journal registries.
//!
//! `implemented_parsers.json` lists the `(publisher_code, journal_code,
//! data_type)` triples a caller's `publishers`/`journals`/`data_types`
//! filters narrow down to candidates; `publishers_index.json` and
//! `<PUB>_journals.json` supply the normalized-name/variant lists that
//! [`crate::normalize`] matches against. All three are embedded with
//! `include_str!` so the crate works without an external data directory;
//! a caller that needs additional publishers constructs its own
//! [`NameRegistry`] instead of relying on the compiled-in one.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// One entry of `implemented_parsers.json`: which journal code and data
/// type a publisher code supports.
#[derive(Debug, Clone, Deserialize)]
pub struct ParserEntry {
    pub journal: String,
    pub dtype: String,
}

#[derive(Debug, Deserialize)]
struct ImplementedParsers {
    implemented_parsers: HashMap<String, ParserEntry>,
}

/// A candidate `(publisher_code, journal_code, data_type)` triple,
/// filtered from the registry by the caller's constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub publisher_code: String,
    pub journal_code: String,
    pub data_type: String,
}

const IMPLEMENTED_PARSERS_JSON: &str = include_str!("../assets/implemented_parsers.json");

fn implemented_parsers() -> &'static HashMap<String, ParserEntry> {
    static REGISTRY: OnceLock<HashMap<String, ParserEntry>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        serde_json::from_str::<ImplementedParsers>(IMPLEMENTED_PARSERS_JSON)
            .expect("implemented_parsers.json is valid")
            .implemented_parsers
    })
}

/// Candidates matching `publishers`/`journals`/`data_types` (an empty
/// slice means "no constraint on this axis"), in the registry's
/// insertion order.
#[must_use]
pub fn candidates(publishers: &[String], journals: &[String], data_types: &[String]) -> Vec<Candidate> {
    implemented_parsers()
        .iter()
        .filter(|(code, _)| publishers.is_empty() || publishers.iter().any(|p| p == *code))
        .filter(|(_, entry)| journals.is_empty() || journals.iter().any(|j| j == &entry.journal))
        .filter(|(_, entry)| data_types.is_empty() || data_types.iter().any(|d| d == &entry.dtype))
        .map(|(code, entry)| Candidate {
            publisher_code: code.clone(),
            journal_code: entry.journal.clone(),
            data_type: entry.dtype.clone(),
        })
        .collect()
}

/// One registry entry: a normalized name plus the surface-form variants
/// that should all similarity-match it.
#[derive(Debug, Clone, Deserialize)]
pub struct NameEntry {
    pub normalized_name: String,
    pub name_variants: Vec<String>,
}

/// A publisher or per-publisher journal name registry, keyed by an
/// internal code the value itself doesn't need.
#[derive(Debug, Clone, Deserialize)]
pub struct NameRegistry(HashMap<String, NameEntry>);

impl NameRegistry {
    /// Parse a registry from its JSON text (the same shape as
    /// `publishers_index.json`/`<PUB>_journals.json`).
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error on malformed input.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        Ok(Self(serde_json::from_str(text)?))
    }

    #[must_use]
    pub fn entries(&self) -> impl Iterator<Item = &NameEntry> {
        self.0.values()
    }
}

const PUBLISHERS_INDEX_JSON: &str = include_str!("../assets/publishers_index.json");
const RSC_JOURNALS_JSON: &str = include_str!("../assets/RSC_journals.json");
const NAT_JOURNALS_JSON: &str = include_str!("../assets/NAT_journals.json");

/// The compiled-in publisher registry.
#[must_use]
pub fn publishers_index() -> &'static NameRegistry {
    static REGISTRY: OnceLock<NameRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        NameRegistry::from_json(PUBLISHERS_INDEX_JSON).expect("publishers_index.json is valid")
    })
}

/// The compiled-in journal registry for publisher code `publisher_code`
/// (currently `RSC` and `NAT`); `None` for an unknown code.
#[must_use]
pub fn journals_index(publisher_code: &str) -> Option<&'static NameRegistry> {
    static RSC: OnceLock<NameRegistry> = OnceLock::new();
    static NAT: OnceLock<NameRegistry> = OnceLock::new();

    match publisher_code {
        "RSC" => Some(RSC.get_or_init(|| {
            NameRegistry::from_json(RSC_JOURNALS_JSON).expect("RSC_journals.json is valid")
        })),
        "NAT" => Some(NAT.get_or_init(|| {
            NameRegistry::from_json(NAT_JOURNALS_JSON).expect("NAT_journals.json is valid")
        })),
        _ => None,
    }
}

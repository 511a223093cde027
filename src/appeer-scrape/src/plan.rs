//! Domain→strategy planning.
//!
//! `DOMAIN_SCRAPE_MAP` is the static map from a registered domain prefix to
//! a `(journal_code, strategy)` pair; `Strategy::method_name` names the
//! scraping function for each strategy. Domain extraction strips the scheme and
//! matches the *longest* registered prefix, so a more specific entry (were
//! one ever added, e.g. a sub-path) wins over a shorter one.

/// How a planned action is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// A single HTTP GET, body written verbatim to disk.
    HtmlSimple,
    /// A HEAD request following redirects to resolve a DOI, then
    /// re-planning and fetching the resolved URL.
    Doi,
    /// No I/O — the action is marked `success=F` immediately.
    Skip,
}

impl Strategy {
    /// The method name persisted on the action row.
    #[must_use]
    pub const fn method_name(self) -> &'static str {
        match self {
            Self::HtmlSimple => "html_simple",
            Self::Doi => "doi",
            Self::Skip => "skip",
        }
    }
}

/// The outcome of planning one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub journal: String,
    pub strategy: Strategy,
    pub method: String,
}

/// Registered domain prefix → `(journal_code, strategy)`.
const DOMAIN_SCRAPE_MAP: &[(&str, &str, Strategy)] = &[
    ("doi.org", "DOI", Strategy::Doi),
    ("dx.doi.org", "DOI", Strategy::Doi),
    ("pubs.rsc.org", "RSC", Strategy::HtmlSimple),
    ("pubs.acs.org", "ACS", Strategy::HtmlSimple),
    ("www.nature.com", "NAT", Strategy::HtmlSimple),
];

/// Plan a single URL: not-`https://` gets `invalid_url`/`skip`; a
/// registered domain gets its mapped journal/strategy; anything else
/// reachable over `https://` gets `unknown`/`html_simple`.
#[must_use]
pub fn plan(url: &str) -> PlanEntry {
    if !url.starts_with("https://") {
        return PlanEntry {
            journal: "invalid_url".to_string(),
            strategy: Strategy::Skip,
            method: Strategy::Skip.method_name().to_string(),
        };
    }

    let domain = extract_domain(url);
    let matched = DOMAIN_SCRAPE_MAP
        .iter()
        .filter(|(prefix, _, _)| domain == *prefix || domain.ends_with(&format!(".{prefix}")))
        .max_by_key(|(prefix, _, _)| prefix.len());

    let (journal, strategy) = matched.map_or(("unknown", Strategy::HtmlSimple), |(_, j, s)| (*j, *s));

    PlanEntry {
        journal: journal.to_string(),
        strategy,
        method: strategy.method_name().to_string(),
    }
}

fn extract_domain(url: &str) -> &str {
    let rest = url.trim_start_matches("https://");
    rest.split('/').next().unwrap_or(rest)
}

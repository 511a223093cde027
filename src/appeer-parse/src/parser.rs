//! The `Parser` trait: a publisher/journal-specific metadata extractor
//! operating on a parsed HTML document, plus the shared
//! normalization/success logic every concrete parser gets for free.

use crate::{dates, normalize};
use regex::Regex;
use scraper::{Html, Selector};
use std::cell::OnceCell;
use std::sync::OnceLock;

/// The content of the first `meta` tag whose `name` attribute is
/// `name`, or `None` if there's no such tag or it has no `content`.
/// This crate's reference parsers only ever need the first value.
#[must_use]
pub fn meta_content(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[name="{name}"]"#)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::to_string)
}

/// The text of the first element matching `selector`.
#[must_use]
pub fn element_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next().map(|el| {
        el.text().collect::<Vec<_>>().join("").trim().to_string()
    })
}

/// The text of every element matching `selector`, joined with `"; "`.
/// `None` if nothing matched.
#[must_use]
pub fn joined_element_texts(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let texts: Vec<String> = document
        .select(&selector)
        .map(|el| el.text().collect::<Vec<_>>().join("").trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.join("; "))
    }
}

fn doi_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"10\.\d{4,9}/[^\s"'<>]+"#).expect("valid DOI regex"))
}

/// The first DOI-shaped substring in `text`, e.g. pulled out of a page
/// title like `"Some Title - 10.1039/D0CP01234A - RSC Publishing"`.
#[must_use]
pub fn doi_substring(text: &str) -> Option<String> {
    doi_regex().find(text).map(|m| m.as_str().to_string())
}

/// A publisher/journal-specific metadata extractor over a single parsed
/// document.
///
/// Every metadata accessor is memoized per instance via a `OnceCell`
/// (the `functools.cached_property` equivalent) inside the concrete
/// parser struct — this trait only describes the read surface and the
/// derived normalization/success logic.
pub trait Parser {
    const PUBLISHER_CODE: &'static str;
    const JOURNAL_CODE: &'static str;
    const DATA_TYPE: &'static str;
    /// The concrete type's name, stored in `parses.parser`.
    const NAME: &'static str;

    /// `true` (plus no error) if `document` looks like it was produced
    /// by this publisher/journal. Called before a parser instance is
    /// constructed, so it takes the document directly rather than
    /// `&self`.
    fn check_publisher_journal(document: &Html) -> bool;

    fn new(document: Html) -> Self;

    fn doi(&self) -> Option<String>;
    fn publisher(&self) -> Option<String>;
    fn journal(&self) -> Option<String>;
    fn title(&self) -> Option<String>;
    fn publication_type(&self) -> Option<String>;
    fn affiliations(&self) -> Option<String>;
    fn received(&self) -> Option<String>;
    fn accepted(&self) -> Option<String>;
    fn published(&self) -> Option<String>;

    /// `publisher()` matched against the compiled-in publisher registry
    /// at [`normalize::PUBLISHER_SIMILARITY_THRESHOLD`].
    fn normalized_publisher(&self) -> Option<String> {
        normalize::normalized_publisher(&self.publisher()?)
    }

    /// `journal()` matched against `Self::PUBLISHER_CODE`'s journal
    /// registry at [`normalize::JOURNAL_SIMILARITY_THRESHOLD`].
    fn normalized_journal(&self) -> Option<String> {
        normalize::normalized_journal(Self::PUBLISHER_CODE, &self.journal()?)
    }

    fn normalized_received(&self) -> Option<String> {
        dates::normalize_d_m_y(&self.received()?)
    }

    fn normalized_accepted(&self) -> Option<String> {
        dates::normalize_d_m_y(&self.accepted()?)
    }

    fn normalized_published(&self) -> Option<String> {
        dates::normalize_d_m_y(&self.published()?)
    }

    /// `true` only if every metadata field in the canonical list
    /// (`doi`, `publisher`, `journal`, `title`, `publication_type`,
    /// `affiliations`, `received`, `accepted`, `published`) resolved.
    fn success(&self) -> bool {
        self.doi().is_some()
            && self.publisher().is_some()
            && self.journal().is_some()
            && self.title().is_some()
            && self.publication_type().is_some()
            && self.affiliations().is_some()
            && self.received().is_some()
            && self.accepted().is_some()
            && self.published().is_some()
    }
}

/// Object-safe view over a [`Parser`], so the registry can hand back a
/// `Box<dyn DynParser>` without callers needing to know which concrete
/// publisher/journal type matched.
pub trait DynParser {
    fn name(&self) -> &'static str;
    fn doi(&self) -> Option<String>;
    fn publisher(&self) -> Option<String>;
    fn journal(&self) -> Option<String>;
    fn title(&self) -> Option<String>;
    fn publication_type(&self) -> Option<String>;
    fn affiliations(&self) -> Option<String>;
    fn received(&self) -> Option<String>;
    fn accepted(&self) -> Option<String>;
    fn published(&self) -> Option<String>;
    fn normalized_publisher(&self) -> Option<String>;
    fn normalized_journal(&self) -> Option<String>;
    fn normalized_received(&self) -> Option<String>;
    fn normalized_accepted(&self) -> Option<String>;
    fn normalized_published(&self) -> Option<String>;
    fn success(&self) -> bool;
}

impl<T: Parser> DynParser for T {
    fn name(&self) -> &'static str {
        T::NAME
    }
    fn doi(&self) -> Option<String> {
        Parser::doi(self)
    }
    fn publisher(&self) -> Option<String> {
        Parser::publisher(self)
    }
    fn journal(&self) -> Option<String> {
        Parser::journal(self)
    }
    fn title(&self) -> Option<String> {
        Parser::title(self)
    }
    fn publication_type(&self) -> Option<String> {
        Parser::publication_type(self)
    }
    fn affiliations(&self) -> Option<String> {
        Parser::affiliations(self)
    }
    fn received(&self) -> Option<String> {
        Parser::received(self)
    }
    fn accepted(&self) -> Option<String> {
        Parser::accepted(self)
    }
    fn published(&self) -> Option<String> {
        Parser::published(self)
    }
    fn normalized_publisher(&self) -> Option<String> {
        Parser::normalized_publisher(self)
    }
    fn normalized_journal(&self) -> Option<String> {
        Parser::normalized_journal(self)
    }
    fn normalized_received(&self) -> Option<String> {
        Parser::normalized_received(self)
    }
    fn normalized_accepted(&self) -> Option<String> {
        Parser::normalized_accepted(self)
    }
    fn normalized_published(&self) -> Option<String> {
        Parser::normalized_published(self)
    }
    fn success(&self) -> bool {
        Parser::success(self)
    }
}

/// A memoized `Option<String>` field, computed at most once.
#[derive(Debug, Default)]
pub struct Cached(OnceCell<Option<String>>);

impl Cached {
    #[must_use]
    pub const fn new() -> Self {
        Self(OnceCell::new())
    }

    pub fn get_or_compute(&self, f: impl FnOnce() -> Option<String>) -> Option<String> {
        self.0.get_or_init(f).clone()
    }
}

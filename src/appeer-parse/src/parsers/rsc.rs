//! Reference parser for Royal Society of Chemistry (RSC) articles.
//!
//! Two RSC page layouts are encountered in the wild for every field; this
//! parser tries the primary (inline `span`/`p`) layout first and falls
//! back to the secondary (`dt`/`dd` definition-list) layout, via plain
//! `Option` chaining.

use crate::{
    dates,
    parser::{self, Cached, Parser},
};
use scraper::{Html, Selector};

#[derive(Debug)]
pub struct RscAnyTxtParser {
    document: Html,
    doi: Cached,
    publisher: Cached,
    journal: Cached,
    title: Cached,
    publication_type: Cached,
    affiliations: Cached,
    received: Cached,
    accepted: Cached,
    published: Cached,
}

impl RscAnyTxtParser {
    fn title_text(&self) -> Option<String> {
        parser::element_text(&self.document, "title")
    }

    fn fixpad_date(&self, keyword: &str) -> Option<String> {
        let div_sel = Selector::parse("div.c.fixpadt--l").ok()?;
        let dt_sel = Selector::parse("dt").expect("valid selector");
        let dd_sel = Selector::parse("dd").expect("valid selector");

        for div in self.document.select(&div_sel) {
            let Some(dt) = div.select(&dt_sel).next() else {
                continue;
            };
            let dt_text: String = dt.text().collect();
            if dt_text.contains(keyword) {
                let Some(dd) = div.select(&dd_sel).next() else {
                    continue;
                };
                let dd_text: String = dd.text().collect();
                if let Some(date) = dates::first_d_m_y(&dd_text) {
                    return Some(date);
                }
            }
        }
        None
    }

    fn inline_date(&self, selector: &str, keyword: &str) -> Option<String> {
        let text = parser::element_text(&self.document, selector)?;
        if text.contains(keyword) {
            dates::first_d_m_y(&text)
        } else {
            None
        }
    }
}

impl Parser for RscAnyTxtParser {
    const PUBLISHER_CODE: &'static str = "RSC";
    const JOURNAL_CODE: &'static str = "ANY";
    const DATA_TYPE: &'static str = "txt";
    const NAME: &'static str = "RscAnyTxtParser";

    fn check_publisher_journal(document: &Html) -> bool {
        parser::element_text(document, "title")
            .is_some_and(|text| text.contains("RSC Publishing"))
    }

    fn new(document: Html) -> Self {
        Self {
            document,
            doi: Cached::new(),
            publisher: Cached::new(),
            journal: Cached::new(),
            title: Cached::new(),
            publication_type: Cached::new(),
            affiliations: Cached::new(),
            received: Cached::new(),
            accepted: Cached::new(),
            published: Cached::new(),
        }
    }

    fn doi(&self) -> Option<String> {
        self.doi.get_or_compute(|| {
            self.title_text()
                .as_deref()
                .and_then(parser::doi_substring)
                .or_else(|| {
                    parser::meta_content(&self.document, "citation_doi")
                        .as_deref()
                        .and_then(parser::doi_substring)
                })
        })
    }

    fn publisher(&self) -> Option<String> {
        self.publisher
            .get_or_compute(|| parser::meta_content(&self.document, "DC.publisher"))
    }

    fn journal(&self) -> Option<String> {
        self.journal
            .get_or_compute(|| parser::meta_content(&self.document, "citation_journal_title"))
    }

    fn title(&self) -> Option<String> {
        self.title
            .get_or_compute(|| parser::meta_content(&self.document, "DC.title"))
    }

    fn publication_type(&self) -> Option<String> {
        self.publication_type.get_or_compute(|| {
            parser::element_text(&self.document, "dd.c__14")
        })
    }

    fn affiliations(&self) -> Option<String> {
        self.affiliations.get_or_compute(|| {
            parser::joined_element_texts(&self.document, "p.article__author-affiliation span")
        })
    }

    fn received(&self) -> Option<String> {
        self.received.get_or_compute(|| {
            self.inline_date("span.italic.bold", "Received")
                .or_else(|| self.fixpad_date("Submitted"))
        })
    }

    fn accepted(&self) -> Option<String> {
        self.accepted.get_or_compute(|| {
            self.inline_date("span.bold.italic", "Accepted")
                .or_else(|| self.fixpad_date("Accepted"))
        })
    }

    fn published(&self) -> Option<String> {
        self.published.get_or_compute(|| {
            self.inline_date("p.bold.italic", "First published")
                .or_else(|| self.fixpad_date("First published"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn recognizes_rsc_publishing_title() {
        let html = doc("<html><head><title>Some paper - RSC Publishing</title></head></html>");
        assert!(RscAnyTxtParser::check_publisher_journal(&html));

        let other = doc("<html><head><title>Some paper</title></head></html>");
        assert!(!RscAnyTxtParser::check_publisher_journal(&other));
    }

    #[test]
    fn extracts_doi_from_title() {
        let html = doc(
            "<html><head><title>A study - 10.1039/D0CP01234A - RSC Publishing</title></head></html>",
        );
        let parser = RscAnyTxtParser::new(html);
        assert_eq!(parser.doi().as_deref(), Some("10.1039/D0CP01234A"));
    }

    #[test]
    fn fixpad_fallback_skips_a_div_with_no_dt_before_the_matching_one() {
        let html = doc(concat!(
            r#"<html><head><title>A study - RSC Publishing</title></head><body>"#,
            r#"<div class="c fixpadt--l"><dd>no dt sibling here</dd></div>"#,
            r#"<div class="c fixpadt--l"><dt>Submitted</dt><dd>03 Mar 2021</dd></div>"#,
            r#"</body></html>"#,
        ));
        let parser = RscAnyTxtParser::new(html);
        assert_eq!(parser.received().as_deref(), Some("03 Mar 2021"));
    }

    #[test]
    fn extracts_doi_from_citation_meta_fallback() {
        let html = doc(
            r#"<html><head><title>A study - RSC Publishing</title>
            <meta name="citation_doi" content="10.1039/D0CP05678B"/></head></html>"#,
        );
        let parser = RscAnyTxtParser::new(html);
        assert_eq!(parser.doi().as_deref(), Some("10.1039/D0CP05678B"));
    }

    #[test]
    fn full_metadata_round_trip_marks_success() {
        let html = doc(concat!(
            r#"<html><head><title>A study - 10.1039/D0CP01234A - RSC Publishing</title>"#,
            r#"<meta name="DC.publisher" content="Royal Society of Chemistry"/>"#,
            r#"<meta name="citation_journal_title" content="Chemical Science"/>"#,
            r#"<meta name="DC.title" content="A study"/>"#,
            r#"</head><body>"#,
            r#"<dd class="c__14">Research Article</dd>"#,
            r#"<p class="article__author-affiliation"><span>Author</span><span>University of Somewhere</span></p>"#,
            r#"<span class="italic bold">Received 18th October 2022</span>"#,
            r#"<span class="bold italic">Accepted 2nd January 2023</span>"#,
            r#"<p class="bold italic">First published 5th January 2023</p>"#,
            r#"</body></html>"#,
        ));
        let parser = RscAnyTxtParser::new(html);

        assert_eq!(parser.publisher().as_deref(), Some("Royal Society of Chemistry"));
        assert_eq!(parser.journal().as_deref(), Some("Chemical Science"));
        assert_eq!(parser.received().as_deref(), Some("18th October 2022"));
        assert_eq!(parser.accepted().as_deref(), Some("2nd January 2023"));
        assert_eq!(parser.published().as_deref(), Some("5th January 2023"));
        assert_eq!(parser.normalized_received().as_deref(), Some("2022-10-18"));
        assert!(parser.success());
        assert_eq!(
            parser.normalized_publisher().as_deref(),
            Some("Royal Society of Chemistry")
        );
        assert_eq!(
            parser.normalized_journal().as_deref(),
            Some("Chemical Science")
        );
    }
}

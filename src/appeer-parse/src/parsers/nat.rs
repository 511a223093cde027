//! Reference parser for Nature-family journal articles.
//!
//! Affiliations are not extracted from this page layout; the accessor is
//! an explicit stub returning `None`.

use crate::{
    dates,
    parser::{self, Cached, Parser},
};
use scraper::{Html, Selector};

#[derive(Debug)]
pub struct NatAnyTxtParser {
    document: Html,
    doi: Cached,
    publisher: Cached,
    journal: Cached,
    title: Cached,
    publication_type: Cached,
    received: Cached,
    accepted: Cached,
    published: Cached,
}

impl NatAnyTxtParser {
    fn bibliographic_date(&self, date_type: &str) -> Option<String> {
        let li_sel = Selector::parse("li.c-bibliographic-information__list-item").ok()?;
        let p_sel = Selector::parse("p").expect("valid selector");

        for li in self.document.select(&li_sel) {
            let Some(p) = li.select(&p_sel).next() else {
                continue;
            };
            let text: String = p.text().collect();
            if text.contains(date_type) {
                if let Some(date) = dates::first_d_m_y(&text) {
                    return Some(date);
                }
            }
        }
        None
    }
}

impl Parser for NatAnyTxtParser {
    const PUBLISHER_CODE: &'static str = "NAT";
    const JOURNAL_CODE: &'static str = "ANY";
    const DATA_TYPE: &'static str = "txt";
    const NAME: &'static str = "NatAnyTxtParser";

    fn check_publisher_journal(document: &Html) -> bool {
        parser::meta_content(document, "dc.publisher")
            .is_some_and(|publisher| publisher.contains("Nature"))
    }

    fn new(document: Html) -> Self {
        Self {
            document,
            doi: Cached::new(),
            publisher: Cached::new(),
            journal: Cached::new(),
            title: Cached::new(),
            publication_type: Cached::new(),
            received: Cached::new(),
            accepted: Cached::new(),
            published: Cached::new(),
        }
    }

    fn doi(&self) -> Option<String> {
        self.doi.get_or_compute(|| parser::meta_content(&self.document, "DOI"))
    }

    fn publisher(&self) -> Option<String> {
        self.publisher
            .get_or_compute(|| parser::meta_content(&self.document, "dc.publisher"))
    }

    fn journal(&self) -> Option<String> {
        self.journal
            .get_or_compute(|| parser::meta_content(&self.document, "citation_journal_title"))
    }

    fn title(&self) -> Option<String> {
        self.title
            .get_or_compute(|| parser::meta_content(&self.document, "dc.title"))
    }

    fn publication_type(&self) -> Option<String> {
        self.publication_type
            .get_or_compute(|| parser::meta_content(&self.document, "citation_article_type"))
    }

    fn affiliations(&self) -> Option<String> {
        None
    }

    fn received(&self) -> Option<String> {
        self.received.get_or_compute(|| self.bibliographic_date("Received"))
    }

    fn accepted(&self) -> Option<String> {
        self.accepted.get_or_compute(|| self.bibliographic_date("Accepted"))
    }

    fn published(&self) -> Option<String> {
        self.published.get_or_compute(|| self.bibliographic_date("Published"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn recognizes_nature_publisher_meta() {
        let html = doc(r#"<html><head><meta name="dc.publisher" content="Nature Publishing Group"/></head></html>"#);
        assert!(NatAnyTxtParser::check_publisher_journal(&html));

        let other = doc(r#"<html><head><meta name="dc.publisher" content="Elsevier"/></head></html>"#);
        assert!(!NatAnyTxtParser::check_publisher_journal(&other));
    }

    #[test]
    fn affiliations_is_always_none() {
        let parser = NatAnyTxtParser::new(doc("<html></html>"));
        assert_eq!(parser.affiliations(), None);
        assert!(!parser.success());
    }

    #[test]
    fn extracts_bibliographic_dates() {
        let html = doc(concat!(
            r#"<html><head>"#,
            r#"<meta name="DOI" content="10.1038/s41557-023-01234-5"/>"#,
            r#"<meta name="dc.publisher" content="Nature Publishing Group"/>"#,
            r#"<meta name="citation_journal_title" content="Nature Chemistry"/>"#,
            r#"<meta name="dc.title" content="A paper"/>"#,
            r#"<meta name="citation_article_type" content="Article"/>"#,
            r#"</head><body>"#,
            r#"<ul>"#,
            r#"<li class="c-bibliographic-information__list-item"><p>Received 03 March 2023</p></li>"#,
            r#"<li class="c-bibliographic-information__list-item"><p>Accepted 10 June 2023</p></li>"#,
            r#"<li class="c-bibliographic-information__list-item"><p>Published 01 July 2023</p></li>"#,
            r#"</ul></body></html>"#,
        ));
        let parser = NatAnyTxtParser::new(html);

        assert_eq!(parser.doi().as_deref(), Some("10.1038/s41557-023-01234-5"));
        assert_eq!(parser.received().as_deref(), Some("03 March 2023"));
        assert_eq!(parser.normalized_received().as_deref(), Some("2023-03-03"));
        assert_eq!(parser.accepted().as_deref(), Some("10 June 2023"));
        assert_eq!(parser.published().as_deref(), Some("01 July 2023"));
        assert_eq!(
            parser.normalized_publisher().as_deref(),
            Some("Nature Publishing Group")
        );
        assert_eq!(parser.normalized_journal().as_deref(), Some("Nature Chemistry"));
    }
}

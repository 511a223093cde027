//! Reference parser implementations exercising the parser registry and
//! normalization pipeline end to end.

pub mod nat;
pub mod rsc;

pub use nat::NatAnyTxtParser;
pub use rsc::RscAnyTxtParser;

use crate::parser::{DynParser, Parser};
use scraper::Html;

/// One entry of the concrete-parser dispatch table: the
/// `(publisher_code, journal_code, data_type)` it's registered under in
/// `implemented_parsers.json`, its `Parser::NAME` (stored on the parse
/// action's `parser` column), its static `check_publisher_journal`, and
/// a constructor producing a boxed [`DynParser`].
pub struct Implementation {
    pub name: &'static str,
    pub publisher_code: &'static str,
    pub journal_code: &'static str,
    pub data_type: &'static str,
    pub check: fn(&Html) -> bool,
    pub construct: fn(Html) -> Box<dyn DynParser>,
}

/// Every concrete parser this crate ships, in the order they're tried.
pub const IMPLEMENTATIONS: &[Implementation] = &[
    Implementation {
        name: RscAnyTxtParser::NAME,
        publisher_code: RscAnyTxtParser::PUBLISHER_CODE,
        journal_code: RscAnyTxtParser::JOURNAL_CODE,
        data_type: RscAnyTxtParser::DATA_TYPE,
        check: RscAnyTxtParser::check_publisher_journal,
        construct: |doc| Box::new(RscAnyTxtParser::new(doc)),
    },
    Implementation {
        name: NatAnyTxtParser::NAME,
        publisher_code: NatAnyTxtParser::PUBLISHER_CODE,
        journal_code: NatAnyTxtParser::JOURNAL_CODE,
        data_type: NatAnyTxtParser::DATA_TYPE,
        check: NatAnyTxtParser::check_publisher_journal,
        construct: |doc| Box::new(NatAnyTxtParser::new(doc)),
    },
];

/// Look up the dispatch entry for `publisher_code`, the only part of the
/// registry candidate this module needs once the journal/data-type
/// filter has already narrowed things down.
#[must_use]
pub fn implementation_for(publisher_code: &str) -> Option<&'static Implementation> {
    IMPLEMENTATIONS
        .iter()
        .find(|implementation| implementation.publisher_code == publisher_code)
}

/// Look up the dispatch entry by `Parser::NAME` (the value stored in a
/// parse action's `parser` column), so a later stage can recover the
/// `publisher_code` a raw `publisher`/`journal` pair was extracted under
/// without re-running `check_publisher_journal`.
#[must_use]
pub fn implementation_for_name(name: &str) -> Option<&'static Implementation> {
    IMPLEMENTATIONS.iter().find(|implementation| implementation.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_implemented_parser_has_a_dispatch_entry() {
        for candidate in crate::registry::candidates(&[], &[], &[]) {
            assert!(
                implementation_for(&candidate.publisher_code).is_some(),
                "missing dispatch entry for {}",
                candidate.publisher_code
            );
        }
    }
}

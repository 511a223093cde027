//! The parse engine: builds a [`ParseJob`] and its actions from a packed
//! entry list, selects a parser for each action's input file, extracts
//! and normalizes metadata, and back-propagates `parsed`/`job_parsed` to
//! the originating scrape stage.

use crate::{
    action::{ParseAction, ParseActionExt, ParseActionWriteExt},
    backend::{DocumentCache, HTML5EVER_BACKEND},
    error::Error,
    job::{ParseJob, ParseJobExt, ParseJobWriteExt},
    packer::{self, ParseEntry},
    parser::DynParser,
    parsers,
};
use appeer_core::JobLogger;
use appeer_db::{rows::ParseActionRow, Store};
use appeer_jobs::{ActionRunner, ParseKind, Status, Write};
use appeer_scrape::{ScrapeAction, ScrapeActionExt, ScrapeActionWriteExt, ScrapeJob, ScrapeJobWriteExt};
use std::{fs, path::Path};

fn build(
    store: Store,
    label: Option<String>,
    description: &str,
    data_directory: &Path,
    mode: &str,
    entries: Vec<ParseEntry>,
) -> Result<ParseJob<Write>, Error> {
    let label = label.unwrap_or_else(|| {
        let suffix: u32 = rand::random();
        format!("parse_{}_{:08x}", appeer_core::compact_timestamp(), suffix)
    });

    let parse_directory = data_directory.join("parse").join(&label);
    let log_path = data_directory.join("parse_logs").join(format!("{label}.log"));

    fs::create_dir_all(&parse_directory).map_err(appeer_core::Error::from)?;
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).map_err(appeer_core::Error::from)?;
    }

    let parse_directory_str = parse_directory.to_string_lossy().to_string();

    let job = ParseJob::<Write>::create(
        store,
        Some(label),
        description,
        &log_path,
        &[
            ("mode", &mode),
            ("parse_directory", &parse_directory_str),
            ("job_committed", &"F"),
        ],
    )?;

    for entry in &entries {
        ParseAction::<Write>::append(
            job.store().clone(),
            job.label(),
            &[
                ("scrape_label", &entry.scrape_label),
                ("scrape_action_index", &entry.scrape_action_index),
                ("input_file", &entry.filepath.as_str()),
                ("committed", &"F"),
            ],
        )?;
    }

    job.mark_waiting(entries.len() as i64)?;
    Ok(job)
}

/// Mode `A`.
///
/// # Errors
///
/// Returns [`Error::Db`]/[`Error::Job`] on a lower-level failure.
pub fn build_auto(
    store: Store,
    label: Option<String>,
    description: &str,
    data_directory: &Path,
) -> Result<ParseJob<Write>, Error> {
    let entries = packer::pack_auto(&store)?;
    build(store, label, description, data_directory, "A", entries)
}

/// Mode `E`.
///
/// # Errors
///
/// Returns [`Error::Db`]/[`Error::Job`] on a lower-level failure.
pub fn build_everything(
    store: Store,
    label: Option<String>,
    description: &str,
    data_directory: &Path,
) -> Result<ParseJob<Write>, Error> {
    let entries = packer::pack_everything(&store)?;
    build(store, label, description, data_directory, "E", entries)
}

/// Mode `S`.
///
/// # Errors
///
/// Returns [`Error::BadInput`] if a label is unknown or not executed, or
/// [`Error::Db`]/[`Error::Job`] on a lower-level failure.
pub fn build_from_scrape_jobs(
    store: Store,
    label: Option<String>,
    description: &str,
    data_directory: &Path,
    scrape_labels: &[String],
) -> Result<ParseJob<Write>, Error> {
    let entries = packer::pack_scrape_jobs(&store, scrape_labels)?;
    build(store, label, description, data_directory, "S", entries)
}

/// Mode `F`.
///
/// # Errors
///
/// Returns [`Error::BadInput`] if none of the files are readable, or
/// [`Error::Db`]/[`Error::Job`] on a lower-level failure.
pub fn build_from_file_list(
    store: Store,
    label: Option<String>,
    description: &str,
    data_directory: &Path,
    paths: &[String],
) -> Result<ParseJob<Write>, Error> {
    let (entries, _report) = packer::pack_file_list(paths)?;
    build(store, label, description, data_directory, "F", entries)
}

/// Select and construct the first matching parser for `path`, trying the
/// registry candidates narrowed by `publishers`/`journals`/`data_types`
/// (empty slices mean "no constraint").
///
/// # Errors
///
/// Returns [`Error::NoParserMatched`] if no candidate's
/// `check_publisher_journal` matches, or [`Error::Io`] if `path` cannot
/// be read.
pub fn select_parser(
    path: &Path,
    publishers: &[String],
    journals: &[String],
    data_types: &[String],
) -> Result<Box<dyn DynParser>, Error> {
    let cache = DocumentCache::new(path);

    for candidate in crate::registry::candidates(publishers, journals, data_types) {
        let Some(implementation) = parsers::implementation_for(&candidate.publisher_code) else {
            continue;
        };

        let matched = cache
            .with_document(&candidate.data_type, HTML5EVER_BACKEND, implementation.check)
            .map_err(appeer_core::Error::from)?;

        if matched {
            let text = std::fs::read_to_string(path).map_err(appeer_core::Error::from)?;
            let document = scraper::Html::parse_document(&text);
            return Ok((implementation.construct)(document));
        }
    }

    Err(Error::NoParserMatched)
}

/// Drives parse actions: parser selection, metadata extraction, and
/// back-propagation of `parsed`/`job_parsed`.
#[derive(Debug, Clone)]
pub struct ParseEngine {
    pub publishers: Vec<String>,
    pub journals: Vec<String>,
    pub data_types: Vec<String>,
    pub no_scrape_mark: bool,
}

impl Default for ParseEngine {
    fn default() -> Self {
        Self {
            publishers: Vec::new(),
            journals: Vec::new(),
            data_types: vec!["txt".to_string()],
            no_scrape_mark: false,
        }
    }
}

impl ParseEngine {
    fn mark_scrape_back_propagation(&self, store: &Store, scrape_label: &str, scrape_action_index: i64) -> Result<(), Error> {
        if self.no_scrape_mark {
            return Ok(());
        }

        let scrape_action = ScrapeAction::<Write>::bind(store.clone(), scrape_label, scrape_action_index);
        scrape_action.set_parsed(true)?;

        let conn = store.connect()?;
        let actions = appeer_db::actions::by_label::<appeer_db::rows::ScrapeActionRow>(&conn, scrape_label)?;
        drop(conn);

        let all_parsed = actions
            .iter()
            .filter(|a| a.success == "T")
            .all(|a| a.parsed == "T");

        if all_parsed {
            ScrapeJob::<Write>::bind(store.clone(), scrape_label).set_job_parsed(true)?;
        }

        Ok(())
    }
}

impl ActionRunner<ParseKind> for ParseEngine {
    type Error = Error;

    fn run_action(&mut self, action: &ParseAction<Write>, logger: &JobLogger) -> Result<(), Error> {
        let row: ParseActionRow = action
            .row()?
            .ok_or_else(|| Error::Job(appeer_jobs::Error::NotFound {
                kind: "parse action",
                label: format!("{}#{}", action.label(), action.action_index()),
            }))?;

        let Some(input_file) = row.input_file.clone() else {
            logger.log(format!("action {} has no input file", action.action_index()));
            action.set_success(false)?;
            action.set_status(Status::Executed)?;
            return Ok(());
        };

        match select_parser(Path::new(&input_file), &self.publishers, &self.journals, &self.data_types) {
            Ok(parser) => {
                action.set_parser(parser.name())?;
                // Raw fields only: `normalized_publisher`/`normalized_journal`/
                // `normalized_*` dates are derived later, at commit time, from
                // these raw columns (see `appeer_commit::engine`) — storing
                // them here instead would leave `success()` (computed from
                // the raw fields below) out of sync with what's persisted.
                action.set_metadata(&[
                    ("doi", parser.doi().as_deref()),
                    ("publisher", parser.publisher().as_deref()),
                    ("journal", parser.journal().as_deref()),
                    ("title", parser.title().as_deref()),
                    ("publication_type", parser.publication_type().as_deref()),
                    ("affiliations", parser.affiliations().as_deref()),
                    ("received", parser.received().as_deref()),
                    ("accepted", parser.accepted().as_deref()),
                    ("published", parser.published().as_deref()),
                ])?;

                let success = parser.success();
                action.set_success(success)?;

                if success {
                    if let (Some(scrape_label), Some(scrape_action_index)) =
                        (action.scrape_label()?, action.scrape_action_index()?)
                    {
                        self.mark_scrape_back_propagation(action.store(), &scrape_label, scrape_action_index)?;
                    }
                }
            }
            Err(Error::NoParserMatched) => {
                logger.log(format!(
                    "action {} found no matching parser for `{input_file}`",
                    action.action_index()
                ));
                action.set_success(false)?;
            }
            Err(err) => {
                logger.log(format!(
                    "action {} failed to parse `{input_file}`: {err}",
                    action.action_index()
                ));
                action.set_success(false)?;
            }
        }

        action.set_status(Status::Executed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appeer_jobs::RestartMode;
    use std::time::Duration;
    use tempfile::tempdir;

    const RSC_HTML: &str = concat!(
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
    );

    #[test]
    fn select_parser_matches_rsc_reference_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("0.html");
        std::fs::write(&path, RSC_HTML).unwrap();

        let parser = select_parser(&path, &[], &[], &["txt".to_string()]).unwrap();
        assert_eq!(parser.name(), "RscAnyTxtParser");
        assert!(parser.success());
    }

    #[test]
    fn select_parser_errors_when_nothing_matches() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("0.html");
        std::fs::write(&path, "<html><body>nothing relevant</body></html>").unwrap();

        let err = select_parser(&path, &[], &[], &["txt".to_string()]).unwrap_err();
        assert!(matches!(err, Error::NoParserMatched));
    }

    #[test]
    fn run_action_extracts_metadata_and_marks_success() {
        let dir = tempdir().unwrap();
        let store = Store::jobs(dir.path()).unwrap();
        let path = dir.path().join("paper.html");
        std::fs::write(&path, RSC_HTML).unwrap();

        let entries = vec![ParseEntry {
            scrape_label: None,
            scrape_action_index: None,
            filepath: path.to_string_lossy().to_string(),
        }];
        let job = build(
            store,
            Some("parse1".to_string()),
            "d",
            dir.path(),
            "F",
            entries,
        )
        .unwrap();

        let mut engine = ParseEngine::default();
        let summary = job
            .run::<ParseKind, _>(RestartMode::FromScratch, Duration::from_millis(0), &mut engine)
            .unwrap();

        assert_eq!(summary.successes, 1);
        assert_eq!(summary.status, appeer_jobs::Status::Executed);

        let conn = job.store().connect().unwrap();
        let row: ParseActionRow = appeer_db::actions::find(&conn, "parse1", 0).unwrap().unwrap();
        assert_eq!(row.doi.as_deref(), Some("10.1039/D0CP01234A"));
        assert_eq!(row.publisher.as_deref(), Some("Royal Society of Chemistry"));
    }
}

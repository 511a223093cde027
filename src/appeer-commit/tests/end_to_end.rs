//! Drives a publication through all three stages against one data
//! directory: scrape (mocked HTTP) -> parse -> commit, checking the
//! back-propagation and duplicate-policy scenarios described for the
//! pipeline as a whole rather than any single crate in isolation.

use appeer_commit::{build_from_parse_jobs, CommitEngine};
use appeer_db::Store;
use appeer_jobs::RestartMode;
use appeer_parse::{build_from_scrape_jobs, ParseEngine, ParseJobExt};
use appeer_scrape::{build_from_list, RetryPolicy, ScrapeEngine, ScrapeJobExt};
use std::path::PathBuf;
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

fn retry_policy() -> RetryPolicy {
    RetryPolicy {
        max_tries: 2,
        retry_sleep_time: Duration::from_millis(1),
        retry_429_sleep_time: Duration::from_millis(1),
    }
}

/// A scrape job with one reachable article, followed through parse (mode
/// `S`) and commit (mode `P`), checking that both `parsed`/`job_parsed`
/// and `committed`/`job_committed` back-propagate once the action
/// succeeds at each downstream stage.
#[test]
fn scrape_parse_commit_back_propagates_through_every_stage() {
    let _mock = mockito::mock("GET", "/article-a").with_status(200).with_body(RSC_HTML).create();
    let data_dir = tempdir().unwrap();
    let jobs_store = Store::jobs(data_dir.path()).unwrap();
    let pubs_store = Store::pubs(data_dir.path()).unwrap();

    let url = format!("{}/article-a", mockito::server_url());
    let scrape_job = build_from_list(
        jobs_store.clone(),
        Some("scrape1".to_string()),
        "e2e",
        data_dir.path(),
        &[url],
    )
    .unwrap();

    let download_dir = PathBuf::from(scrape_job.download_directory().unwrap().unwrap());
    let mut scrape_engine = ScrapeEngine::new(retry_policy(), download_dir);
    let scrape_summary = scrape_job
        .run::<appeer_jobs::ScrapeKind, _>(RestartMode::FromScratch, Duration::from_millis(0), &mut scrape_engine)
        .unwrap();
    assert_eq!(scrape_summary.successes, 1);
    assert_eq!(scrape_summary.status, appeer_jobs::Status::Executed);

    let parse_job = build_from_scrape_jobs(
        jobs_store.clone(),
        Some("parse1".to_string()),
        "e2e",
        data_dir.path(),
        &["scrape1".to_string()],
    )
    .unwrap();
    let mut parse_engine = ParseEngine::default();
    let parse_summary = parse_job
        .run::<appeer_jobs::ParseKind, _>(RestartMode::FromScratch, Duration::from_millis(0), &mut parse_engine)
        .unwrap();
    assert_eq!(parse_summary.successes, 1);

    // Back-propagation from parse to scrape: the only action is now
    // `parsed=T` and the scrape job itself is fully `job_parsed`.
    assert!(scrape_job.job_parsed().unwrap());

    let commit_job = build_from_parse_jobs(
        jobs_store,
        Some("commit1".to_string()),
        "e2e",
        data_dir.path(),
        &["parse1".to_string()],
    )
    .unwrap();
    let mut commit_engine = CommitEngine::new(pubs_store.clone(), false, false);
    let commit_summary = commit_job
        .run::<appeer_jobs::CommitKind, _>(RestartMode::FromScratch, Duration::from_millis(0), &mut commit_engine)
        .unwrap();
    assert_eq!(commit_summary.successes, 1);

    // Back-propagation from commit to parse.
    assert!(parse_job.job_committed().unwrap());

    let conn = pubs_store.connect().unwrap();
    let row = appeer_db::pub_table::find_by_doi(&conn, "10.1039/D0CP01234A").unwrap();
    assert!(row.is_some());
}

/// Committing the same parse job's output twice: the replay with
/// `overwrite=false` must not grow the `pub` table, and the commit
/// action must still record `success=T` (it correctly refused, it did
/// not fail).
#[test]
fn duplicate_commit_replay_is_a_no_op_without_overwrite() {
    let _mock = mockito::mock("GET", "/article-b").with_status(200).with_body(RSC_HTML).create();
    let data_dir = tempdir().unwrap();
    let jobs_store = Store::jobs(data_dir.path()).unwrap();
    let pubs_store = Store::pubs(data_dir.path()).unwrap();

    let url = format!("{}/article-b", mockito::server_url());
    let scrape_job = build_from_list(
        jobs_store.clone(),
        Some("scrape1".to_string()),
        "e2e",
        data_dir.path(),
        &[url],
    )
    .unwrap();
    let download_dir = PathBuf::from(scrape_job.download_directory().unwrap().unwrap());
    let mut scrape_engine = ScrapeEngine::new(retry_policy(), download_dir);
    scrape_job
        .run::<appeer_jobs::ScrapeKind, _>(RestartMode::FromScratch, Duration::from_millis(0), &mut scrape_engine)
        .unwrap();

    let parse_job = build_from_scrape_jobs(
        jobs_store.clone(),
        Some("parse1".to_string()),
        "e2e",
        data_dir.path(),
        &["scrape1".to_string()],
    )
    .unwrap();
    let mut parse_engine = ParseEngine::default();
    parse_job
        .run::<appeer_jobs::ParseKind, _>(RestartMode::FromScratch, Duration::from_millis(0), &mut parse_engine)
        .unwrap();

    let mut commit_engine = CommitEngine::new(pubs_store.clone(), false, false);

    let first = build_from_parse_jobs(
        jobs_store.clone(),
        Some("commit1".to_string()),
        "e2e",
        data_dir.path(),
        &["parse1".to_string()],
    )
    .unwrap();
    first
        .run::<appeer_jobs::CommitKind, _>(RestartMode::FromScratch, Duration::from_millis(0), &mut commit_engine)
        .unwrap();

    let conn = pubs_store.connect().unwrap();
    let count_after_first: i64 = conn.query_row("SELECT COUNT(*) FROM pub", rusqlite::params![], |r| r.get(0)).unwrap();
    drop(conn);

    // A second commit job replaying the same parse job's (still
    // uncommitted-by-nothing, since mode P ignores `committed`) output.
    let second = build_from_parse_jobs(
        jobs_store,
        Some("commit2".to_string()),
        "e2e",
        data_dir.path(),
        &["parse1".to_string()],
    )
    .unwrap();
    let summary = second
        .run::<appeer_jobs::CommitKind, _>(RestartMode::FromScratch, Duration::from_millis(0), &mut commit_engine)
        .unwrap();
    assert_eq!(summary.successes, 1);

    let conn = pubs_store.connect().unwrap();
    let count_after_second: i64 = conn.query_row("SELECT COUNT(*) FROM pub", rusqlite::params![], |r| r.get(0)).unwrap();
    assert_eq!(count_after_first, count_after_second);

    let action_row: appeer_db::rows::CommitActionRow =
        appeer_db::actions::find(&conn, "commit2", 0).unwrap().unwrap();
    assert_eq!(action_row.duplicate, "T");
    assert_eq!(action_row.passed, "F");
    assert_eq!(action_row.success, "T");
}

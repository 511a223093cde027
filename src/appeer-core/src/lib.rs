//! # appeer-core
//!
//! Shared building blocks for the `appeer` publication-acquisition pipeline:
//! the error taxonomy every other crate hangs its own errors off of, the
//! `RuntimeConfig` contract that callers fill in to override scrape
//! defaults, small datetime/DOI utilities, zip archival, and the bounded
//! per-job logger used by the scrape/parse/commit job runtimes.
//!
//! This crate does not read a config file from disk, does not talk to a
//! database, and does not know about jobs, actions or publications — those
//! concerns live in `appeer-db`, `appeer-jobs`, and the three stage crates.
//! It only provides the things all of them need.

#![deny(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    rust_2018_idioms,
    warnings
)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

mod archive;
pub mod config;
mod doi;
mod error;
pub mod logger;
mod time;

pub use archive::{archive_directory, archive_list_of_files, extract_archive};
pub use config::RuntimeConfig;
pub use doi::{check_doi_format, looks_like_url};
pub use error::Error;
pub use logger::JobLogger;
pub use time::{compact_timestamp, current_datetime, human_datetime, runtime_since};

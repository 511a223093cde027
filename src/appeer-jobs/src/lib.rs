//! # appeer-jobs
//!
//! The abstract Job/Action runtime shared by the scrape, parse, and commit
//! stages: read/write-mode handles over `appeer-db` rows, the `I/W/R/X/E`
//! status lifecycle, and the run-job loop (resume protocol, per-action
//! delegation, end-of-job status).
//!
//! This crate does not know how to fetch a URL, parse a document, or
//! insert a publication — it only knows how to drive *some* per-action
//! work function, one action at a time, with durable progress. The actual
//! work lives in `appeer-scrape`, `appeer-parse`, and `appeer-commit`,
//! each implementing [`run::ActionRunner`] for their stage marker.

#![deny(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    rust_2018_idioms,
    warnings
)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

pub mod action;
mod error;
pub mod job;
pub mod kinds;
pub mod mode;
pub mod run;
pub mod status;

pub use action::Action;
pub use error::Error;
pub use job::Job;
pub use kinds::{ActionKind, CommitKind, JobKind, ParseKind, ScrapeKind};
pub use mode::{Read, Write};
pub use run::{ActionRunner, RestartMode, RunSummary};
pub use status::{Status, TriBool};

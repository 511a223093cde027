#![deny(clippy::all, clippy::cargo, clippy::nursery, clippy::pedantic, rust_2018_idioms, warnings)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

//! The scrape stage: turn a list of URLs/DOIs into downloaded publication
//! pages, one action per input.

pub mod action;
mod error;
pub mod engine;
pub mod input;
pub mod job;
pub mod plan;
pub mod request;

pub use action::{ScrapeAction, ScrapeActionExt, ScrapeActionWriteExt};
pub use engine::{archive_job, build_from_list, build_from_path, ScrapeEngine};
pub use error::Error;
pub use input::DataSourceType;
pub use job::{ScrapeJob, ScrapeJobExt, ScrapeJobWriteExt};
pub use plan::{plan, PlanEntry, Strategy};
pub use request::{FetchError, RetryPolicy};

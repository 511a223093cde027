//! # appeer-db
//!
//! The registry-gated sqlite persistence layer for the appeer acquisition
//! pipeline: two on-disk stores (`jobs.db` holding the six job/action
//! tables, `pubs.db` holding the single `pub` table), a static table/column
//! whitelist every dynamic query is checked against, and generic,
//! registry-gated CRUD primitives shared by every table.
//!
//! This crate knows nothing about the job/action *runtime* (status
//! lifecycles, resume, back-propagation) — it only gives the runtime crates
//! a safe way to read and write rows. That layer lives in `appeer-jobs` and
//! the three stage crates.

#![deny(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    rust_2018_idioms,
    warnings
)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

pub mod actions;
pub mod connection;
mod error;
pub mod jobs;
pub mod parses;
pub mod pub_table;
pub mod registry;
pub mod rows;
pub mod scrapes;
pub mod table;

pub use connection::Store;
pub use error::Error;
pub use registry::Table;

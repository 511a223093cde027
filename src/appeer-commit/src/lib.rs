#![deny(clippy::all, clippy::cargo, clippy::nursery, clippy::pedantic, rust_2018_idioms, warnings)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

//! The commit stage: insert parsed metadata into the `pub` store under a
//! duplicate-DOI policy, and back-propagate `committed`/`job_committed`
//! to the originating parse stage.

pub mod action;
pub mod engine;
mod error;
pub mod job;
pub mod packer;

pub use action::{CommitAction, CommitActionExt, CommitActionWriteExt};
pub use engine::{build_auto, build_everything, build_from_parse_jobs, CommitEngine};
pub use error::Error;
pub use job::CommitJob;
pub use packer::{CommitEntry, ParsedMetadata};

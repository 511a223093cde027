#![deny(clippy::all, clippy::cargo, clippy::nursery, clippy::pedantic, rust_2018_idioms, warnings)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

//! The parse stage: turn a downloaded publication page into structured
//! metadata, one action per input file.

pub mod action;
pub mod backend;
pub mod dates;
pub mod engine;
mod error;
pub mod job;
pub mod normalize;
pub mod packer;
pub mod parser;
pub mod parsers;
pub mod registry;
pub mod similarity;

pub use action::{ParseAction, ParseActionExt, ParseActionWriteExt};
pub use backend::{DocumentCache, HTML5EVER_BACKEND};
pub use engine::{
    build_auto, build_everything, build_from_file_list, build_from_scrape_jobs, select_parser,
    ParseEngine,
};
pub use error::Error;
pub use job::{ParseJob, ParseJobExt, ParseJobWriteExt};
pub use parser::{DynParser, Parser};
pub use registry::Candidate;

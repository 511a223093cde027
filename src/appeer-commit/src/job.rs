//! `CommitJob`: the generic [`appeer_jobs::Job`] specialized for the
//! commit stage. Adds nothing beyond the shared shape.

use appeer_jobs::{CommitKind, Job};

/// A commit job handle, bound in mode `M`.
pub type CommitJob<M> = Job<M, CommitKind>;

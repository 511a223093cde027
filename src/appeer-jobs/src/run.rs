//! The run-job contract: drives a job's actions to completion, one per
//! iteration, delegating the actual work to a stage-specific
//! [`ActionRunner`].

use crate::{
    action::Action,
    job::Job,
    kinds::{ActionKind, JobKind, JobRow},
    mode::Write,
    status::Status,
    Error,
};
use appeer_core::JobLogger;
use std::{path::PathBuf, time::Duration};

/// Whether a job run starts over or continues from its persisted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartMode {
    /// Zero `job_step`, `job_successes`, `job_fails` before running.
    FromScratch,
    /// Keep the persisted counters and continue from `job_step`.
    Resume,
}

/// The outcome of a completed (or cooperatively interrupted) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub successes: i64,
    pub fails: i64,
    pub step: i64,
    pub status: Status,
}

/// Executes one action of a job. Implemented by each stage crate
/// (`appeer-scrape`, `appeer-parse`, `appeer-commit`).
///
/// On `Ok(())`, the implementation is expected to have already left the
/// action in a terminal status (`X`) with `success` set appropriately —
/// a business-level failure (an unreachable URL, an unparseable file) is
/// not an error, it's a successfully-handled failure. Returning `Err`
/// means something unexpected happened (an `InvariantViolation` or an
/// uncaught exception); the runtime marks the action `status=E,
/// success=F` itself and continues to the next one.
pub trait ActionRunner<K: ActionKind> {
    type Error: std::error::Error;

    fn run_action(&mut self, action: &Action<Write, K>, logger: &JobLogger) -> Result<(), Self::Error>;
}

impl<K: JobKind> Job<Write, K> {
    /// Run this job to completion (or until it is cooperatively cancelled
    /// by an external status write), delegating each action to `runner`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvariantViolation`] if the job is already
    /// `Running` and `restart_mode` is [`RestartMode::FromScratch`], or
    /// [`Error::Db`] if a job-level state write fails (the job is left in
    /// `Running` in that case, so a later `resume` is well-defined).
    pub fn run<A, R>(
        &self,
        restart_mode: RestartMode,
        sleep_time: Duration,
        runner: &mut R,
    ) -> Result<RunSummary, Error>
    where
        A: ActionKind<Job = K>,
        R: ActionRunner<A>,
    {
        let row = self.row()?.ok_or_else(|| Error::NotFound {
            kind: K::STAGE,
            label: self.label().to_string(),
        })?;

        if Status::from_code(row.job_status()) == Status::Running
            && restart_mode == RestartMode::FromScratch
        {
            return Err(Error::InvariantViolation(format!(
                "job `{}` is already running; call with RestartMode::Resume or stop it first",
                self.label()
            )));
        }

        let log_path = row
            .log()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("{}.log", self.label())));
        let logger = JobLogger::new(log_path).map_err(|err| {
            Error::InvariantViolation(format!("could not open job log: {err}"))
        })?;

        let no_of_publications = row.no_of_publications();

        if no_of_publications == 0 {
            logger.log(format!(
                "[{}] job `{}` has no actions; nothing to run",
                appeer_core::current_datetime(),
                self.label()
            ));
            self.set_status(Status::Error)?;
            return Ok(RunSummary {
                successes: 0,
                fails: 0,
                step: 0,
                status: Status::Error,
            });
        }

        let (mut step, mut successes, mut fails) = match restart_mode {
            RestartMode::FromScratch => {
                self.set_step(0)?;
                self.set_successes(0)?;
                self.set_fails(0)?;
                (0, 0, 0)
            }
            RestartMode::Resume => (row.job_step(), row.job_successes(), row.job_fails()),
        };

        self.set_status(Status::Running)?;
        logger.log(format!(
            "[{}] job `{}` running from step {step}/{no_of_publications}",
            appeer_core::current_datetime(),
            self.label()
        ));

        while step < no_of_publications {
            if self.status()? != Some(Status::Running) {
                break;
            }

            let action = Action::<Write, A>::bind(self.store().clone(), self.label(), step);
            match runner.run_action(&action, &logger) {
                Ok(()) => {
                    if action.success()?.unwrap_or(false) {
                        successes += 1;
                    } else {
                        fails += 1;
                    }
                }
                Err(err) => {
                    logger.log(format!(
                        "[{}] action {step} of `{}` errored: {err}",
                        appeer_core::current_datetime(),
                        self.label()
                    ));
                    action.set_status(Status::Error)?;
                    action.set_success(false)?;
                    fails += 1;
                }
            }

            step += 1;
            self.set_step(step)?;
            self.set_successes(successes)?;
            self.set_fails(fails)?;

            if step < no_of_publications {
                std::thread::sleep(sleep_time);
            }
        }

        if self.status()? == Some(Status::Running) {
            self.set_status(Status::Executed)?;
        }

        let final_status = self.status()?.unwrap_or(Status::Error);
        logger.log(format!(
            "[{}] job `{}` finished: {successes} succeeded, {fails} failed, status {final_status}",
            appeer_core::current_datetime(),
            self.label()
        ));

        Ok(RunSummary {
            successes,
            fails,
            step,
            status: final_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{ActionKind, ActionRow, JobKind};
    use appeer_db::{Store, Table};
    use std::time::Duration;
    use tempfile::tempdir;

    struct FakeKind;
    impl JobKind for FakeKind {
        type Row = appeer_db::rows::ScrapeJobRow;
        const TABLE: Table = Table::ScrapeJobs;
        const STAGE: &'static str = "scrape";
    }
    impl ActionKind for FakeKind {
        type Row = appeer_db::rows::ScrapeActionRow;
        type Job = FakeKind;
        const TABLE: Table = Table::Scrapes;
    }

    struct AlwaysSucceeds;
    impl ActionRunner<FakeKind> for AlwaysSucceeds {
        type Error = std::convert::Infallible;

        fn run_action(
            &mut self,
            action: &Action<Write, FakeKind>,
            _logger: &JobLogger,
        ) -> Result<(), Self::Error> {
            action.set_status(Status::Executed).unwrap();
            action.set_success(true).unwrap();
            Ok(())
        }
    }

    struct OddsFail;
    impl ActionRunner<FakeKind> for OddsFail {
        type Error = std::convert::Infallible;

        fn run_action(
            &mut self,
            action: &Action<Write, FakeKind>,
            _logger: &JobLogger,
        ) -> Result<(), Self::Error> {
            let ok = action.action_index() % 2 == 0;
            action.set_status(Status::Executed).unwrap();
            action.set_success(ok).unwrap();
            Ok(())
        }
    }

    fn job_with_actions(n: i64) -> (tempfile::TempDir, Job<Write, FakeKind>) {
        let dir = tempdir().unwrap();
        let store = Store::jobs(dir.path()).unwrap();
        let log_path = dir.path().join("job.log");
        let job = Job::<Write, FakeKind>::create(
            store.clone(),
            Some("job1".to_string()),
            "d",
            &log_path,
            &[("job_parsed", &"F")],
        )
        .unwrap();

        for _ in 0..n {
            Action::<Write, FakeKind>::append(store.clone(), "job1", &[]).unwrap();
        }
        job.mark_waiting(n).unwrap();
        (dir, job)
    }

    #[test]
    fn empty_job_finishes_in_error() {
        let (_dir, job) = job_with_actions(0);
        let summary = job
            .run::<FakeKind, _>(RestartMode::FromScratch, Duration::from_millis(0), &mut AlwaysSucceeds)
            .unwrap();
        assert_eq!(summary.status, Status::Error);
        assert_eq!(job.status().unwrap(), Some(Status::Error));
    }

    #[test]
    fn all_successes_finish_in_executed() {
        let (_dir, job) = job_with_actions(3);
        let summary = job
            .run::<FakeKind, _>(RestartMode::FromScratch, Duration::from_millis(0), &mut AlwaysSucceeds)
            .unwrap();
        assert_eq!(summary.successes, 3);
        assert_eq!(summary.fails, 0);
        assert_eq!(summary.status, Status::Executed);
    }

    #[test]
    fn partial_failures_still_finish_executed() {
        let (_dir, job) = job_with_actions(4);
        let summary = job
            .run::<FakeKind, _>(RestartMode::FromScratch, Duration::from_millis(0), &mut OddsFail)
            .unwrap();
        assert_eq!(summary.successes, 2);
        assert_eq!(summary.fails, 2);
        assert_eq!(summary.status, Status::Executed);
        assert!(summary.successes + summary.fails <= 4);
    }

    #[test]
    fn resume_preserves_counters_and_continues_from_step() {
        let (_dir, job) = job_with_actions(4);

        job.set_step(2).unwrap();
        job.set_successes(2).unwrap();
        job.set_status(Status::Running).unwrap();

        // Seed actions 0,1 as already executed so a from-scratch re-run
        // would be distinguishable from resume.
        let a0 = Action::<Write, FakeKind>::bind(job.store().clone(), "job1", 0);
        a0.set_status(Status::Executed).unwrap();
        a0.set_success(true).unwrap();
        let a1 = Action::<Write, FakeKind>::bind(job.store().clone(), "job1", 1);
        a1.set_status(Status::Executed).unwrap();
        a1.set_success(true).unwrap();

        let summary = job
            .run::<FakeKind, _>(RestartMode::Resume, Duration::from_millis(0), &mut AlwaysSucceeds)
            .unwrap();

        assert_eq!(summary.successes, 4);
        assert_eq!(summary.step, 4);
        assert_eq!(summary.status, Status::Executed);
    }

    #[test]
    fn running_job_rejects_from_scratch() {
        let (_dir, job) = job_with_actions(1);
        job.set_status(Status::Running).unwrap();

        let err = job
            .run::<FakeKind, _>(RestartMode::FromScratch, Duration::from_millis(0), &mut AlwaysSucceeds)
            .unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }
}

//! The release check run state machine.
//!
//! A run walks `Start → Checking(Owner) → Checking(Repo) → Checking(Release) →
//! Completed`. At each checking state a missing resource either ends the run
//! with a fatal failure or is reported as `release-exists=false`, depending on
//! [`ActionInputs::fail_when_not_found`]. Later stages are never evaluated once
//! an earlier one comes back empty.

use std::fmt;

use crate::existence::{Existence, ExistenceService};
use crate::github::Transport;

use super::error::ActionError;
use super::inputs::ActionInputs;
use super::output::OutputSink;

/// Name of the workflow output carrying the result.
pub const RELEASE_EXISTS_OUTPUT: &str = "release-exists";

/// Banner written once at the start of every run.
pub const WELCOME_MESSAGE: &str = "Welcome To Release Checker GitHub Action!!";

/// One of the three dependent checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Owner,
    Repo,
    Release,
}

impl Stage {
    /// How the checked resource is named in messages.
    pub fn entity(self) -> &'static str {
        match self {
            Stage::Owner => "repository owner",
            Stage::Repo => "repository",
            Stage::Release => "release",
        }
    }

    /// The stage checked after this one succeeds.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Owner => Some(Stage::Repo),
            Stage::Repo => Some(Stage::Release),
            Stage::Release => None,
        }
    }

    /// The input this stage looks up.
    fn subject(self, inputs: &ActionInputs) -> &str {
        match self {
            Stage::Owner => &inputs.repo_owner,
            Stage::Repo => &inputs.repo_name,
            Stage::Release => &inputs.release_name,
        }
    }

    fn progress_message(self, inputs: &ActionInputs) -> String {
        format!(
            "Checking if the {} '{}' exists . . .",
            self.entity(),
            self.subject(inputs)
        )
    }

    fn exists_message(self) -> String {
        format!(" the {} exists.", self.entity())
    }

    /// The message reported when this stage's resource is missing.
    pub fn not_found_message(self, inputs: &ActionInputs) -> String {
        format!(
            "The {} '{}' does not exist.",
            self.entity(),
            self.subject(inputs)
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Owner => write!(f, "owner"),
            Stage::Repo => write!(f, "repo"),
            Stage::Release => write!(f, "release"),
        }
    }
}

/// State of a run in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Start,
    Checking(Stage),
    /// Every stage found its resource.
    Completed,
    /// A stage came back empty and the run reports `false`.
    NotFoundReported { stage: Stage },
    /// A stage came back empty and the run fails.
    FatalFailure { stage: Stage, reason: String },
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run succeeded and reported whether the release exists.
    Completed { release_exists: bool },

    /// A resource was missing and the run was configured to fail.
    FailedFatal { stage: Stage, reason: String },
}

impl RunOutcome {
    /// Converts to a Result, turning a fatal failure into the stage's
    /// not-found error.
    pub fn into_result(self) -> Result<bool, ActionError> {
        match self {
            RunOutcome::Completed { release_exists } => Ok(release_exists),
            RunOutcome::FailedFatal { stage, reason } => Err(ActionError::not_found(stage, reason)),
        }
    }
}

/// Sequences the owner, repository and release checks for one run.
///
/// Holds no state of its own; memoization lives in the borrowed service, so
/// repeated runs against the same service reuse earlier answers.
pub struct ReleaseCheck<'a, T: Transport, O: OutputSink> {
    service: &'a ExistenceService<T>,
    output: &'a O,
}

impl<'a, T: Transport, O: OutputSink> ReleaseCheck<'a, T, O> {
    pub fn new(service: &'a ExistenceService<T>, output: &'a O) -> Self {
        Self { service, output }
    }

    /// Runs all checks for `inputs`.
    ///
    /// Errors from the service or the output sink are returned as-is; a
    /// missing resource is never an `Err` here, see [`RunOutcome`].
    pub async fn run(&self, inputs: &ActionInputs) -> Result<RunOutcome, ActionError> {
        self.output.write_line(WELCOME_MESSAGE, false, true);

        let mut state = RunState::Start;
        loop {
            state = match state {
                RunState::Start => RunState::Checking(Stage::Owner),
                RunState::Checking(stage) => self.check_stage(stage, inputs).await?,
                RunState::Completed => {
                    self.output.set_output(RELEASE_EXISTS_OUTPUT, "true")?;
                    return Ok(self.finished(RunOutcome::Completed {
                        release_exists: true,
                    }));
                }
                RunState::NotFoundReported { stage } => {
                    self.output
                        .write_line(&stage.not_found_message(inputs), true, true);
                    self.output.set_output(RELEASE_EXISTS_OUTPUT, "false")?;
                    return Ok(self.finished(RunOutcome::Completed {
                        release_exists: false,
                    }));
                }
                RunState::FatalFailure { stage, reason } => {
                    return Ok(self.finished(RunOutcome::FailedFatal { stage, reason }));
                }
            };
        }
    }

    /// Checks one stage and picks the next state.
    async fn check_stage(
        &self,
        stage: Stage,
        inputs: &ActionInputs,
    ) -> Result<RunState, ActionError> {
        self.output.write(&stage.progress_message(inputs));
        let existence = self.check(stage, inputs).await?;
        tracing::info!(stage = %stage, result = %existence, "check finished");

        let next = match existence {
            Existence::Found => {
                self.output.write_line(&stage.exists_message(), false, true);
                match stage.next() {
                    Some(next) => RunState::Checking(next),
                    None => RunState::Completed,
                }
            }
            Existence::NotFound if inputs.fail_when_not_found => RunState::FatalFailure {
                stage,
                reason: stage.not_found_message(inputs),
            },
            Existence::NotFound => RunState::NotFoundReported { stage },
        };

        Ok(next)
    }

    async fn check(&self, stage: Stage, inputs: &ActionInputs) -> Result<Existence, ActionError> {
        let existence = match stage {
            Stage::Owner => self.service.owner_exists(&inputs.repo_owner).await?,
            Stage::Repo => {
                self.service
                    .repo_exists(&inputs.repo_owner, &inputs.repo_name)
                    .await?
            }
            Stage::Release => {
                self.service
                    .release_exists(
                        &inputs.repo_owner,
                        &inputs.repo_name,
                        &inputs.release_name,
                        inputs.check_pre_releases,
                    )
                    .await?
            }
        };
        Ok(existence)
    }

    fn finished(&self, outcome: RunOutcome) -> RunOutcome {
        tracing::info!(outcome = ?outcome, "release check finished");
        outcome
    }
}

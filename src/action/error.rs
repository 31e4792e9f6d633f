//! Errors that end a release check run.

use thiserror::Error;

use crate::existence::CheckError;

use super::output::OutputError;
use super::run::Stage;

/// A failure that ends a run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The repository owner does not exist and the run fails when not found.
    #[error("{0}")]
    OwnerNotFound(String),

    /// The repository does not exist and the run fails when not found.
    #[error("{0}")]
    RepoNotFound(String),

    /// The release does not exist and the run fails when not found.
    #[error("{0}")]
    ReleaseNotFound(String),

    /// An existence check could not be answered.
    #[error(transparent)]
    Check(#[from] CheckError),

    /// The result could not be recorded.
    #[error(transparent)]
    Output(#[from] OutputError),
}

impl ActionError {
    /// Creates the not-found failure for `stage`.
    pub fn not_found(stage: Stage, message: impl Into<String>) -> Self {
        let message = message.into();
        match stage {
            Stage::Owner => ActionError::OwnerNotFound(message),
            Stage::Repo => ActionError::RepoNotFound(message),
            Stage::Release => ActionError::ReleaseNotFound(message),
        }
    }

    /// Process exit code for this failure.
    ///
    /// Invalid inputs exit with 2, like a command-line usage error. Every other
    /// failure exits with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            ActionError::Check(CheckError::InvalidArgument { .. }) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_stage_to_variant() {
        assert!(matches!(
            ActionError::not_found(Stage::Owner, "gone"),
            ActionError::OwnerNotFound(_)
        ));
        assert!(matches!(
            ActionError::not_found(Stage::Repo, "gone"),
            ActionError::RepoNotFound(_)
        ));
        assert!(matches!(
            ActionError::not_found(Stage::Release, "gone"),
            ActionError::ReleaseNotFound(_)
        ));

        let err = ActionError::not_found(Stage::Release, "The release 'v9' does not exist.");
        assert_eq!(err.to_string(), "The release 'v9' does not exist.");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn invalid_argument_exits_with_usage_code() {
        let err = ActionError::from(CheckError::InvalidArgument { param: "repo_name" });
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "the 'repo_name' value cannot be empty");
    }

    #[test]
    fn output_failures_exit_with_one() {
        let err = ActionError::from(OutputError::EmptyName);
        assert_eq!(err.exit_code(), 1);
    }
}

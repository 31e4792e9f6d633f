//! Inputs of a release check run.

/// The values a run checks, as passed to the action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInputs {
    /// The owner of the repository. May be an organization.
    pub repo_owner: String,

    /// The name of the repository.
    pub repo_name: String,

    /// The name of the release.
    pub release_name: String,

    /// Fail the run, rather than report `false`, when anything is missing.
    pub fail_when_not_found: bool,

    /// Only count the release if it is flagged as a pre-release.
    pub check_pre_releases: bool,
}

impl ActionInputs {
    /// Creates inputs that fail when not found and ignore the pre-release flag.
    pub fn new(
        repo_owner: impl Into<String>,
        repo_name: impl Into<String>,
        release_name: impl Into<String>,
    ) -> Self {
        ActionInputs {
            repo_owner: repo_owner.into(),
            repo_name: repo_name.into(),
            release_name: release_name.into(),
            fail_when_not_found: true,
            check_pre_releases: false,
        }
    }

    pub fn with_fail_when_not_found(mut self, fail: bool) -> Self {
        self.fail_when_not_found = fail;
        self
    }

    pub fn with_pre_releases(mut self, check: bool) -> Self {
        self.check_pre_releases = check;
        self
    }
}

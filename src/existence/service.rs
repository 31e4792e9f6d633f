//! The GitHub data service: owner, repository and release existence checks.
//!
//! Each check is memoized per service instance. The checks depend on each
//! other (a repository cannot exist without its owner, a release without its
//! repository), and every check re-validates its prerequisites through the
//! same cache-or-fetch helpers, so a missing owner short-circuits the later
//! checks without issuing their requests.

use crate::github::{Transport, owner_path, releases_path, repo_path};
use crate::types::{OwnerInfo, ReleaseId, ReleaseInfo, RepoId, RepoInfo};

use super::cache::ExistenceCache;
use super::{CheckError, Existence, Result, require_non_empty};

/// Answers existence questions against the GitHub REST API.
///
/// Construct one per process run and reuse it for every check in that run to
/// benefit from memoization.
#[derive(Debug)]
pub struct ExistenceService<T: Transport> {
    /// `None` once disposed.
    transport: Option<T>,
    owners: ExistenceCache<String>,
    repos: ExistenceCache<RepoId>,
    releases: ExistenceCache<ReleaseId>,
}

impl<T: Transport> ExistenceService<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Some(transport),
            owners: ExistenceCache::new("owner"),
            repos: ExistenceCache::new("repo"),
            releases: ExistenceCache::new("release"),
        }
    }

    /// Checks whether a user or organization named `owner` exists.
    pub async fn owner_exists(&self, owner: &str) -> Result<Existence> {
        require_non_empty("repo_owner", owner)?;
        self.transport()?;

        self.resolve_owner(owner).await
    }

    /// Checks whether the repository `owner/name` exists.
    ///
    /// Returns `NotFound` without querying the repository if the owner does
    /// not exist.
    pub async fn repo_exists(&self, owner: &str, name: &str) -> Result<Existence> {
        require_non_empty("repo_owner", owner)?;
        require_non_empty("repo_name", name)?;
        self.transport()?;

        self.resolve_repo(&RepoId::new(owner, name)).await
    }

    /// Checks whether `owner/name` has a release titled `release_name`.
    ///
    /// With `include_pre_releases` set, only a release that is also flagged as
    /// a pre-release counts. The cached answer is keyed by the release name
    /// alone, so the first lookup for a name decides later lookups regardless
    /// of the flag they pass.
    pub async fn release_exists(
        &self,
        owner: &str,
        name: &str,
        release_name: &str,
        include_pre_releases: bool,
    ) -> Result<Existence> {
        require_non_empty("repo_owner", owner)?;
        require_non_empty("repo_name", name)?;
        require_non_empty("release_name", release_name)?;
        self.transport()?;

        let release = ReleaseId::new(RepoId::new(owner, name), release_name);
        if !self.resolve_repo(&release.repo).await?.is_found() {
            return Ok(Existence::NotFound);
        }

        self.releases
            .get_or_try_insert_with(release.clone(), || {
                self.fetch_release(&release, include_pre_releases)
            })
            .await
    }

    /// Releases the transport. Calling this more than once has no effect.
    pub fn dispose(&mut self) {
        if let Some(transport) = self.transport.take() {
            transport.close();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.transport.is_none()
    }

    fn transport(&self) -> Result<&T> {
        self.transport.as_ref().ok_or(CheckError::Disposed)
    }

    async fn resolve_owner(&self, owner: &str) -> Result<Existence> {
        self.owners
            .get_or_try_insert_with(owner.to_string(), || self.fetch_owner(owner))
            .await
    }

    async fn resolve_repo(&self, repo: &RepoId) -> Result<Existence> {
        if !self.resolve_owner(&repo.owner).await?.is_found() {
            return Ok(Existence::NotFound);
        }

        self.repos
            .get_or_try_insert_with(repo.clone(), || self.fetch_repo(repo))
            .await
    }

    async fn fetch_owner(&self, owner: &str) -> Result<Existence> {
        let response = self
            .transport()?
            .get::<OwnerInfo>(&owner_path(owner))
            .await?;
        let status = response.status;

        let found = response
            .into_ok_data()
            .is_some_and(|info| info.is_named(owner));

        tracing::debug!(owner, status, found, "fetched owner");
        Ok(found.into())
    }

    async fn fetch_repo(&self, repo: &RepoId) -> Result<Existence> {
        let response = self
            .transport()?
            .get::<RepoInfo>(&repo_path(&repo.owner, &repo.repo))
            .await?;
        let status = response.status;

        let found = response
            .into_ok_data()
            .is_some_and(|info| info.is_named(&repo.owner, &repo.repo));

        tracing::debug!(repo = %repo, status, found, "fetched repository");
        Ok(found.into())
    }

    async fn fetch_release(
        &self,
        release: &ReleaseId,
        include_pre_releases: bool,
    ) -> Result<Existence> {
        let response = self
            .transport()?
            .get::<Vec<ReleaseInfo>>(&releases_path(&release.repo.owner, &release.repo.repo))
            .await?;
        let status = response.status;

        let found = response.into_ok_data().is_some_and(|releases| {
            releases
                .iter()
                .any(|r| r.matches(&release.name, include_pre_releases))
        });

        tracing::debug!(
            release = %release,
            include_pre_releases,
            status,
            found,
            "fetched releases"
        );
        Ok(found.into())
    }
}

impl<T: Transport> Drop for ExistenceService<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

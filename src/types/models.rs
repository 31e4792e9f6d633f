//! Response bodies consumed from the GitHub REST API.
//!
//! Only the fields the existence checks read are modelled; serde ignores the
//! rest of each payload.

use serde::Deserialize;

/// Body of `GET /users/{owner}`.
///
/// The same endpoint answers for organizations, so `login` may be an
/// organization name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OwnerInfo {
    pub login: String,
}

impl OwnerInfo {
    /// Returns true if this owner's login matches `owner`, ignoring case.
    pub fn is_named(&self, owner: &str) -> bool {
        eq_ignore_case(&self.login, owner)
    }
}

/// Body of `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    pub owner: OwnerInfo,
}

impl RepoInfo {
    /// Returns true if both the owner login and repository name match.
    pub fn is_named(&self, owner: &str, name: &str) -> bool {
        self.owner.is_named(owner) && eq_ignore_case(&self.name, name)
    }
}

/// One entry of `GET /repos/{owner}/{repo}/releases`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseInfo {
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub tag_name: String,
    /// GitHub returns `null` for releases created without a title.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
}

impl ReleaseInfo {
    /// Returns true if this release satisfies a lookup for `release_name`.
    ///
    /// With `include_pre_releases` set, a name match only counts when the
    /// release is also flagged as a pre-release.
    pub fn matches(&self, release_name: &str, include_pre_releases: bool) -> bool {
        let name_matches = self
            .name
            .as_deref()
            .is_some_and(|name| eq_ignore_case(name, release_name));

        if include_pre_releases {
            name_matches && self.prerelease
        } else {
            name_matches
        }
    }
}

/// Case-insensitive comparison that also folds non-ASCII letters.
fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

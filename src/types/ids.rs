//! Identifiers for the GitHub resources whose existence is checked.
//!
//! These types double as memoization keys: equality and hashing cover every
//! component, so two repositories with the same name under different owners
//! are distinct keys.

use std::fmt;

/// A repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepoId {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A release of a specific repository, identified by its release name.
///
/// Whether pre-releases are considered is a property of the lookup, not of the
/// identifier, so it is not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseId {
    pub repo: RepoId,
    pub name: String,
}

impl ReleaseId {
    pub fn new(repo: RepoId, name: impl Into<String>) -> Self {
        ReleaseId {
            repo,
            name: name.into(),
        }
    }
}

impl fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.repo, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn repo_displays_as_owner_slash_repo() {
        let repo = RepoId::new("KinsonDigital", "Velaptor");
        assert_eq!(repo.to_string(), "KinsonDigital/Velaptor");
    }

    #[test]
    fn release_displays_with_repo() {
        let release = ReleaseId::new(RepoId::new("owner", "repo"), "v1.0.0");
        assert_eq!(release.to_string(), "owner/repo@v1.0.0");
    }

    #[test]
    fn same_release_name_in_different_repos_is_distinct() {
        let mut keys = HashSet::new();
        keys.insert(ReleaseId::new(RepoId::new("owner", "app"), "v1.0.0"));
        keys.insert(ReleaseId::new(RepoId::new("owner", "lib"), "v1.0.0"));
        keys.insert(ReleaseId::new(RepoId::new("owner", "lib"), "v1.0.0"));
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn same_repo_name_under_different_owners_is_distinct() {
        let mut keys = HashSet::new();
        keys.insert(RepoId::new("alice", "tools"));
        keys.insert(RepoId::new("bob", "tools"));
        assert_eq!(keys.len(), 2);
    }

    proptest! {
        #[test]
        fn repo_ids_equal_iff_both_parts_equal(
            a in "[a-z]{1,8}",
            b in "[a-z]{1,8}",
            c in "[a-z]{1,8}",
            d in "[a-z]{1,8}",
        ) {
            let left = RepoId::new(a.clone(), b.clone());
            let right = RepoId::new(c.clone(), d.clone());
            prop_assert_eq!(left == right, a == c && b == d);
        }
    }
}

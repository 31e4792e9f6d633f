//! Core domain types for the release checker.
//!
//! Identifiers used as memoization keys and the GitHub response bodies the
//! existence checks read.

pub mod ids;
pub mod models;

// Re-export commonly used types at the module level
pub use ids::{ReleaseId, RepoId};
pub use models::{OwnerInfo, ReleaseInfo, RepoInfo};

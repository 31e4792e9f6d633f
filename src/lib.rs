//! Release Checker - a GitHub Action step that checks whether a named release exists.
//!
//! This library provides memoized owner, repository and release existence
//! checks against the GitHub REST API, and the run state machine that turns
//! their answers into the `release-exists` workflow output.

pub mod action;
pub mod existence;
pub mod github;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

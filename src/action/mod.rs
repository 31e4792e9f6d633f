//! The release check action: inputs, run state machine, failures and output.
//!
//! The existence checks only answer questions; this module decides what a
//! missing resource means for the run and reports the result to the workflow.

pub mod error;
pub mod inputs;
pub mod output;
pub mod run;

pub use error::ActionError;
pub use inputs::ActionInputs;
pub use output::{ConsoleConfig, GitHubConsole, OutputError, OutputSink};
pub use run::{RELEASE_EXISTS_OUTPUT, ReleaseCheck, RunOutcome, RunState, Stage, WELCOME_MESSAGE};

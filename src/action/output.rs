//! Console and workflow-output sink.
//!
//! The run state machine only talks to an [`OutputSink`]; [`GitHubConsole`] is
//! the implementation used when running as a GitHub Actions step. It writes
//! progress text to stdout and records named outputs either in the file named
//! by `GITHUB_OUTPUT` or, outside a runner that provides one, with the legacy
//! `::set-output` workflow command.

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while recording a named output.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The output name was empty.
    #[error("the output name must not be empty")]
    EmptyName,

    /// Writing the output file failed.
    #[error("failed to write workflow output: {0}")]
    Io(#[from] io::Error),
}

/// Where run progress and results are reported.
pub trait OutputSink {
    /// Writes `text` without a trailing newline.
    fn write(&self, text: &str);

    /// Writes `text` followed by a newline.
    fn write_line(&self, text: &str, is_error: bool, force_flush: bool);

    /// Records the named output `name` with `value`.
    fn set_output(&self, name: &str, value: &str) -> Result<(), OutputError>;

    /// Reports a failure that ends the run.
    fn write_error(&self, text: &str) {
        self.write_line(text, true, true);
    }
}

/// Runner environment the console adapts to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Whether we are running inside GitHub Actions (`GITHUB_ACTIONS=true`).
    pub github_actions: bool,

    /// File that receives `name=value` output lines (`GITHUB_OUTPUT`).
    pub output_file: Option<PathBuf>,
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        Self {
            github_actions: env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true"),
            output_file: env::var_os("GITHUB_OUTPUT")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Console sink for a GitHub Actions step.
#[derive(Debug, Clone, Default)]
pub struct GitHubConsole {
    config: ConsoleConfig,
}

impl GitHubConsole {
    pub fn new(config: ConsoleConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(ConsoleConfig::from_env())
    }

    /// How a fatal error is reported: a workflow annotation inside Actions,
    /// a plain stderr line elsewhere.
    fn error_report(&self, text: &str) -> ErrorReport {
        if self.config.github_actions {
            ErrorReport::Annotation(format!("::error::{}", escape_command_data(text)))
        } else {
            ErrorReport::Plain(text.to_string())
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ErrorReport {
    /// A `::error::` workflow command, printed to stdout.
    Annotation(String),
    Plain(String),
}

/// Escapes workflow command data. An unescaped line break ends the command,
/// which would cut a multi-line message short.
fn escape_command_data(text: &str) -> String {
    text.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

impl OutputSink for GitHubConsole {
    fn write(&self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
    }

    fn write_line(&self, text: &str, is_error: bool, force_flush: bool) {
        if is_error {
            // Finish any partial progress line before switching streams.
            let _ = io::stdout().lock().flush();
            let mut stderr = io::stderr().lock();
            let _ = writeln!(stderr, "{text}");
            return;
        }

        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{text}");
        if force_flush {
            let _ = stdout.flush();
        }
    }

    fn set_output(&self, name: &str, value: &str) -> Result<(), OutputError> {
        if name.is_empty() {
            return Err(OutputError::EmptyName);
        }

        match &self.config.output_file {
            Some(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                writeln!(file, "{name}={value}")?;
            }
            None => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "::set-output name={name}::{value}")?;
                stdout.flush()?;
            }
        }

        tracing::debug!(name, value, "set workflow output");
        Ok(())
    }

    fn write_error(&self, text: &str) {
        match self.error_report(text) {
            ErrorReport::Annotation(command) => {
                let mut stdout = io::stdout().lock();
                let _ = writeln!(stdout, "{command}");
                let _ = stdout.flush();
            }
            ErrorReport::Plain(line) => self.write_line(&line, true, true),
        }
    }
}

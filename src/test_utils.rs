//! Shared test utilities: a scripted transport, a recording output sink and
//! arbitrary generators for property-based testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::action::{OutputError, OutputSink};
use crate::github::{
    GitHubApiError, GitHubErrorKind, Transport, TransportResponse, owner_path, releases_path, repo_path,
};

// ─── Mock Transport ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Reply {
    Json(u16, Value),
    Status(u16),
    Fault(String),
}

#[derive(Debug, Default)]
struct MockState {
    /// Keyed by lowercased path; GitHub paths are case-insensitive.
    replies: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<String>>,
    closes: AtomicU32,
}

/// A transport answering from scripted replies. Unscripted paths answer 404.
///
/// Clones share the script and the request log, so a test can keep one clone
/// for assertions after handing another to the service.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(self, path: &str, reply: Reply) -> Self {
        self.state
            .replies
            .lock()
            .unwrap()
            .insert(path.to_lowercase(), reply);
        self
    }

    pub fn with_json(self, path: &str, status: u16, body: Value) -> Self {
        self.script(path, Reply::Json(status, body))
    }

    pub fn with_status(self, path: &str, status: u16) -> Self {
        self.script(path, Reply::Status(status))
    }

    pub fn with_fault(self, path: &str, message: &str) -> Self {
        self.script(path, Reply::Fault(message.to_string()))
    }

    pub fn with_owner(self, login: &str) -> Self {
        self.with_json(&owner_path(login), 200, json!({ "login": login, "type": "User" }))
    }

    pub fn with_repo(self, owner: &str, name: &str) -> Self {
        self.with_json(
            &repo_path(owner, name),
            200,
            json!({
                "name": name,
                "full_name": format!("{owner}/{name}"),
                "owner": { "login": owner },
            }),
        )
    }

    pub fn with_releases(self, owner: &str, name: &str, releases: Vec<Value>) -> Self {
        self.with_json(&releases_path(owner, name), 200, Value::Array(releases))
    }

    /// Every path requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, path: &str) -> usize {
        self.requests().iter().filter(|p| *p == path).count()
    }

    pub fn close_count(&self) -> u32 {
        self.state.closes.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    async fn get<T>(&self, path: &str) -> Result<TransportResponse<T>, GitHubApiError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.state.requests.lock().unwrap().push(path.to_string());
        let reply = self
            .state
            .replies
            .lock()
            .unwrap()
            .get(&path.to_lowercase())
            .cloned();

        match reply {
            None => Ok(TransportResponse::status_only(404)),
            Some(Reply::Status(status)) => Ok(TransportResponse::status_only(status)),
            Some(Reply::Json(status, body)) => {
                let data = serde_json::from_value(body)
                    .map_err(|e| GitHubApiError::undecodable(path, &e))?;
                Ok(TransportResponse {
                    status,
                    data: Some(data),
                })
            }
            Some(Reply::Fault(message)) => Err(GitHubApiError {
                kind: GitHubErrorKind::Transient,
                status_code: None,
                message,
                source: None,
            }),
        }
    }

    fn close(self) {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// A release list entry as GitHub returns it.
pub fn release_json(name: &str, prerelease: bool) -> Value {
    json!({
        "html_url": format!("https://github.com/owner/repo/releases/tag/{name}"),
        "tag_name": name,
        "name": name,
        "draft": false,
        "prerelease": prerelease,
    })
}

// ─── Recording Output ─────────────────────────────────────────────────────────

/// One call made on a [`RecordingOutput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    Write(String),
    Line {
        text: String,
        is_error: bool,
        force_flush: bool,
    },
    Output {
        name: String,
        value: String,
    },
}

impl OutputEvent {
    /// A flushed line, as every line written by a run is.
    pub fn line(text: &str, is_error: bool) -> Self {
        OutputEvent::Line {
            text: text.to_string(),
            is_error,
            force_flush: true,
        }
    }

    pub fn output(name: &str, value: &str) -> Self {
        OutputEvent::Output {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// An output sink that records every call.
#[derive(Debug, Default)]
pub struct RecordingOutput {
    events: Mutex<Vec<OutputEvent>>,
    fail_outputs: bool,
}

impl RecordingOutput {
    /// A sink whose `set_output` always fails.
    pub fn failing() -> Self {
        Self {
            events: Mutex::default(),
            fail_outputs: true,
        }
    }

    pub fn events(&self) -> Vec<OutputEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Recorded `(name, value)` output assignments.
    pub fn outputs(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                OutputEvent::Output { name, value } => Some((name, value)),
                _ => None,
            })
            .collect()
    }
}

impl OutputSink for RecordingOutput {
    fn write(&self, text: &str) {
        self.events
            .lock()
            .unwrap()
            .push(OutputEvent::Write(text.to_string()));
    }

    fn write_line(&self, text: &str, is_error: bool, force_flush: bool) {
        self.events.lock().unwrap().push(OutputEvent::Line {
            text: text.to_string(),
            is_error,
            force_flush,
        });
    }

    fn set_output(&self, name: &str, value: &str) -> Result<(), OutputError> {
        if self.fail_outputs {
            return Err(OutputError::Io(std::io::Error::other("output file unavailable")));
        }
        self.events
            .lock()
            .unwrap()
            .push(OutputEvent::output(name, value));
        Ok(())
    }
}

// ─── Generators ───────────────────────────────────────────────────────────────

/// A lowercase login paired with the same login in arbitrary casing.
pub fn arb_login_casing() -> impl Strategy<Value = (String, String)> {
    "[a-z][a-z0-9-]{0,15}".prop_flat_map(|login| {
        let len = login.len();
        (
            Just(login),
            prop::collection::vec(any::<bool>(), len..=len),
        )
            .prop_map(|(login, upper)| {
                let requested: String = login
                    .chars()
                    .zip(upper)
                    .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                    .collect();
                (login, requested)
            })
    })
}

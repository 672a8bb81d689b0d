//! Registration client and submission controller.
//!
//! [`RegistrationClient`] wraps the single POST to the registration endpoint;
//! [`RegistrationController`] owns the form and the submission state machine
//! the screen renders. At most one submission is in flight at a time — the
//! UI disables its trigger while the state is
//! [`SubmissionState::Submitting`]; the controller does not queue or lock.

use reqwest::{Client, StatusCode};
use shared::protocol::{ErrorBody, RegistrationAck, RegistrationRequest, REGISTER_PATH};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use url::Url;

mod state;

pub use state::{RegistrationForm, StatusSeverity, SubmissionState};

/// Shown when either field is blank after trimming.
pub const FILL_ALL_FIELDS_MESSAGE: &str = "Please fill in all fields: username and email.";
/// Shown when the server replied 2xx but the body carried no usable message.
pub const AMBIGUOUS_RESPONSE_MESSAGE: &str =
    "Connected, but the server response format was unclear.";
/// Fallback when a failure carries no message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Unknown network or server error.";

/// Outcome of a POST that reached the server and came back 2xx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationReceipt {
    /// The response body carried a non-empty `message`.
    Confirmed { message: String },
    /// HTTP success, but no usable `message` field in the body.
    Ambiguous,
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("registration rejected by server ({status})")]
    Rejected {
        status: StatusCode,
        /// Non-empty `message` extracted from the error body, when present.
        message: Option<String>,
    },
    #[error("failed to reach registration endpoint: {0}")]
    Unreachable(#[from] reqwest::Error),
}

/// Thin wrapper around the registration endpoint.
pub struct RegistrationClient {
    http: Client,
    endpoint: Url,
}

impl RegistrationClient {
    /// `server_url` is the server root; the `/register` path is appended.
    pub fn new(server_url: &str) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(server_url)?.join(REGISTER_PATH)?;
        Ok(Self {
            http: Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Issue the registration POST: exactly one request per call, no retries,
    /// no timeout beyond the transport default.
    pub async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        debug!(endpoint = %self.endpoint, "registration: posting request");
        let response = self.http.post(self.endpoint.clone()).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.is_empty());
            return Err(RegistrationError::Rejected { status, message });
        }

        // An empty message is treated the same as a missing one, so a bare
        // `{}` or `{"message":""}` lands in the ambiguous branch.
        let message = response
            .json::<RegistrationAck>()
            .await
            .ok()
            .and_then(|ack| ack.message)
            .filter(|message| !message.is_empty());

        match message {
            Some(message) => Ok(RegistrationReceipt::Confirmed { message }),
            None => Ok(RegistrationReceipt::Ambiguous),
        }
    }
}

/// Owns the form and the submission state machine for the registration
/// screen.
pub struct RegistrationController {
    client: RegistrationClient,
    form: RegistrationForm,
    state: SubmissionState,
    events: broadcast::Sender<SubmissionState>,
}

impl RegistrationController {
    pub fn new(client: RegistrationClient) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            client,
            form: RegistrationForm::default(),
            state: SubmissionState::Idle,
            events,
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Observe every state transition, including `Submitting` while the
    /// network call is pending.
    pub fn subscribe(&self) -> broadcast::Receiver<SubmissionState> {
        self.events.subscribe()
    }

    /// Editing a field ends the previous attempt: terminal feedback is
    /// dropped and the machine returns to `Idle`.
    pub fn note_fields_edited(&mut self) {
        if self.state.is_terminal() {
            self.transition(SubmissionState::Idle);
        }
    }

    /// Run one registration attempt with the current values of the two text
    /// fields and return the resulting terminal state.
    pub async fn submit(&mut self, username: &str, email: &str) -> SubmissionState {
        self.form = RegistrationForm::new(username, email);

        if !self.form.is_complete() {
            let next = SubmissionState::Failed {
                message: FILL_ALL_FIELDS_MESSAGE.to_string(),
            };
            self.transition(next.clone());
            return next;
        }

        self.transition(SubmissionState::Submitting);
        let request = RegistrationRequest {
            username: username.to_string(),
            email: email.to_string(),
        };
        let outcome = self.client.register(&request).await;

        // Every branch replaces `Submitting` with a terminal state, so the
        // in-flight flag is cleared no matter how the request ended.
        let next = match outcome {
            Ok(RegistrationReceipt::Confirmed { message }) => {
                info!(username = %request.username, "registration: accepted by server");
                self.form.clear();
                SubmissionState::Succeeded { message }
            }
            Ok(RegistrationReceipt::Ambiguous) => {
                warn!("registration: server replied 2xx without a usable message");
                SubmissionState::AmbiguousSuccess {
                    message: AMBIGUOUS_RESPONSE_MESSAGE.to_string(),
                }
            }
            Err(RegistrationError::Rejected { status, message }) => {
                error!(%status, "registration: rejected by server");
                SubmissionState::Failed {
                    message: message.unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
                }
            }
            Err(RegistrationError::Unreachable(err)) => {
                error!("registration: transport failure: {err}");
                SubmissionState::Failed {
                    message: GENERIC_FAILURE_MESSAGE.to_string(),
                }
            }
        };
        self.transition(next.clone());
        next
    }

    fn transition(&mut self, next: SubmissionState) {
        debug!(
            from = self.state.name(),
            to = next.name(),
            "registration: state transition"
        );
        self.state = next;
        let _ = self.events.send(self.state.clone());
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

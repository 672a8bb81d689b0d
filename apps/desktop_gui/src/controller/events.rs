//! Events flowing from the backend runtime to the UI thread.

use registration_core::SubmissionState;

pub enum UiEvent {
    /// The submission state machine moved; the screen re-renders from this.
    Submission(SubmissionState),
    /// The backend bridge itself failed (runtime startup, bad endpoint).
    BackendFailed(String),
}

//! Commands flowing from the UI thread to the backend runtime.

pub enum BackendCommand {
    SubmitRegistration { username: String, email: String },
}

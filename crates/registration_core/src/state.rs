//! Form and submission state for the registration screen.

/// The two user-editable fields of the registration form.
///
/// Trimmed-non-empty is the only validity constraint; email format is
/// deliberately not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
}

impl RegistrationForm {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }

    /// Both fields must be non-empty after trimming.
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.email.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.username.clear();
        self.email.clear();
    }
}

/// Rendering hint for a [`SubmissionState`] message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSeverity {
    Neutral,
    Success,
    Warning,
    Error,
}

/// Lifecycle of one registration attempt.
///
/// `Idle → Submitting → {Succeeded | AmbiguousSuccess | Failed}`. Editing a
/// field returns the machine to `Idle`; a retry may also move a terminal
/// state straight back to `Submitting`. The form is reusable indefinitely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded {
        message: String,
    },
    AmbiguousSuccess {
        message: String,
    },
    Failed {
        message: String,
    },
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// True once an attempt has finished, whichever way it went.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded { .. } | Self::AmbiguousSuccess { .. } | Self::Failed { .. }
        )
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Idle | Self::Submitting => None,
            Self::Succeeded { message }
            | Self::AmbiguousSuccess { message }
            | Self::Failed { message } => Some(message),
        }
    }

    pub fn severity(&self) -> StatusSeverity {
        match self {
            Self::Idle | Self::Submitting => StatusSeverity::Neutral,
            Self::Succeeded { .. } => StatusSeverity::Success,
            Self::AmbiguousSuccess { .. } => StatusSeverity::Warning,
            Self::Failed { .. } => StatusSeverity::Error,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Succeeded { .. } => "succeeded",
            Self::AmbiguousSuccess { .. } => "ambiguous_success",
            Self::Failed { .. } => "failed",
        }
    }
}

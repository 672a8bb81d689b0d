use serde::{Deserialize, Serialize};

/// Path of the registration endpoint, relative to the server root.
pub const REGISTER_PATH: &str = "/register";

/// Body of the registration POST.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
}

/// Success-path response body.
///
/// Servers are expected to answer `{"message": ...}`, but decoding is
/// lenient: an absent or null `message` maps to `None` instead of a decode
/// failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationAck {
    #[serde(default)]
    pub message: Option<String>,
}

/// Best-effort shape of a non-2xx response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

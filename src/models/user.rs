//! Authenticated users and the login exchange.

use serde::{Deserialize, Serialize};

/// Profile of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Login name
    pub username: String,
    /// Contact address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Name shown in greetings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Account creation timestamp as sent by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl User {
    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Entry of the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Unique identifier
    pub id: i64,
    /// Login name
    pub username: String,
}

/// Username/password pair sent to the login and register endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Plain password, only ever sent over the wire
    pub password: String,
}

/// Bearer token issued at login.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The token to attach to later requests
    pub access_token: String,
    /// Always "bearer"
    #[serde(default)]
    pub token_type: String,
}

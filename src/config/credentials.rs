//! Bearer credential handling.
//!
//! Keeps the access token out of logs and builds the
//! `Authorization` header value for API requests.

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone, PartialEq, Eq)]
pub struct SecureString(String);

impl SecureString {
    /// Create a new secure string.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the inner value.
    ///
    /// Use sparingly and only when actually sending to APIs
    /// or writing to the token store.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// Opaque bearer token issued by the OAuth exchange.
///
/// The format is not validated; whatever the server returns is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    token: SecureString,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecureString::new(token.into()),
        }
    }

    pub fn token(&self) -> &SecureString {
        &self.token
    }

    /// Value for the `Authorization` header.
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.token.expose())
    }
}

//! Error taxonomy for service-level operations.

use thiserror::Error;

use crate::token::TokenStoreError;

/// Errors returned by the auth, feed and profile services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No credential is stored, or the server rejected it.
    #[error("Not authorized")]
    Unauthorized,

    /// Transport failure before any response arrived.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decoding(#[source] serde_json::Error),

    /// The authorization code was already used or is being exchanged.
    #[error("Authorization code was already submitted")]
    DuplicateRequest,

    /// URL or parameters could not be built. Indicates a construction bug
    /// or a misconfigured endpoint.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A newer call for the same operation replaced this one.
    #[error("Request was superseded by a newer one")]
    Cancelled,

    #[error("Token storage error: {0}")]
    Storage(#[from] TokenStoreError),
}

impl ServiceError {
    /// Stable tag for logs and CLI output.
    pub fn error_type(&self) -> &'static str {
        match self {
            ServiceError::Unauthorized => "unauthorized",
            ServiceError::Network(_) => "network_error",
            ServiceError::HttpStatus { .. } => "http_status",
            ServiceError::Decoding(_) => "decoding_error",
            ServiceError::DuplicateRequest => "duplicate_request",
            ServiceError::InvalidRequest(_) => "invalid_request",
            ServiceError::Cancelled => "cancelled",
            ServiceError::Storage(_) => "storage_error",
        }
    }

    /// Transport failures and error statuses.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ServiceError::Network(_) | ServiceError::HttpStatus { .. }
        )
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

//! Error types for the users API client.
//!
//! Every transport failure lands in one of three buckets: the request never
//! completed, the server answered non-2xx, or the body could not be decoded.

use thiserror::Error;

/// Errors that can occur while talking to the users API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, DNS, TLS, or timeout failure
    #[error("Network error during {operation}: {source}")]
    Network {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("HTTP {status} during {operation}: {message}")]
    HttpStatus {
        operation: &'static str,
        status: u16,
        message: String,
    },

    /// Body was not the JSON we expected
    #[error("Malformed response during {operation}: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Base URL and path could not form a valid URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP client itself could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    /// Short machine-readable category, stable for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Network { .. } => "network_error",
            ApiError::HttpStatus { .. } => "http_status_error",
            ApiError::Decode { .. } => "decode_error",
            ApiError::InvalidUrl { .. } => "invalid_url",
            ApiError::Client(_) => "client_error",
        }
    }

    /// Text suitable for showing to a person.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network { .. } => "Could not reach the server. Check your connection.".to_string(),
            ApiError::HttpStatus { status, .. } => format!("The server rejected the request ({status})."),
            ApiError::Decode { .. } => "The server sent an unexpected response.".to_string(),
            ApiError::InvalidUrl { .. } | ApiError::Client(_) => {
                "The client is misconfigured.".to_string()
            }
        }
    }
}

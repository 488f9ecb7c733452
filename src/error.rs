// src/error.rs
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,
    #[error("{message} (HTTP {status})")]
    Server {
        status: StatusCode,
        message: String,
        details: Value,
    },
    #[error("No response received: {0}")]
    NoResponse(String),
    #[error("Request could not be built: {0}")]
    Request(String),
    #[error("Unexpected response body: {0}")]
    Decode(String),
    #[error("Invalid access token: {0}")]
    Token(String),
    #[error("Session storage error: {0}")]
    Session(#[from] std::io::Error),
    #[error("Not logged in")]
    NotLoggedIn,
}

impl ApiError {
    /// Sorts a transport error into the "never answered" and "never sent" buckets.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::Request(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::NoResponse(err.to_string())
        }
    }

    /// Builds the generic server error, keeping whatever the backend sent back.
    pub fn server(status: StatusCode, body: &str) -> Self {
        let details = serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()));
        ApiError::Server {
            status,
            message: "An error occurred".to_string(),
            details,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::Decode(value.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        ApiError::Token(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },
    #[error("{name} is not a valid log level: {value:?}")]
    InvalidLogLevel { name: &'static str, value: String },
}

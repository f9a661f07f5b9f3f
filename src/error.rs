//! Error types for the beverage client and provider.
//!
//! [`ClientError`] describes a failed call against the Beverage API, and
//! [`ProviderError`] is what the provider operations return. Both convert into
//! a user-facing [`Diagnostic`] via [`ProviderError::to_diagnostic`].

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use crate::schema::Diagnostic;

/// Longest slice of a response body kept on a decode error.
pub const MAX_BODY_SNIPPET: usize = 512;

/// A Beverage API operation, used to label errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `POST /beverages`
    Create,
    /// `GET /beverages/{id}`
    Get,
    /// `GET /beverages`
    List,
    /// `PUT /beverages/{id}`
    Update,
    /// `DELETE /beverages/{id}`
    Delete,
}

impl Operation {
    /// The status code the API returns when the operation succeeds.
    pub fn expected_status(self) -> StatusCode {
        match self {
            Self::Create => StatusCode::CREATED,
            Self::Get | Self::List | Self::Update | Self::Delete => StatusCode::OK,
        }
    }

    /// Summary line used when reporting a failure of this operation.
    pub fn summary(self) -> &'static str {
        match self {
            Self::Create => "Error creating beverage",
            Self::Get => "Error fetching beverage",
            Self::List => "Error fetching beverages",
            Self::Update => "Error updating beverage",
            Self::Delete => "Error deleting beverage",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            Self::Create => "create beverage",
            Self::Get => "fetch beverage",
            Self::List => "fetch beverages",
            Self::Update => "update beverage",
            Self::Delete => "delete beverage",
        };
        f.write_str(action)
    }
}

/// Errors returned by [`BeverageClient`](crate::client::BeverageClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL cannot be used.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The underlying HTTP transport could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The request could not be built or its body serialized.
    #[error("Failed to build {operation} request: {source}")]
    Request {
        /// The operation being attempted.
        operation: Operation,
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP exchange itself failed (connection, DNS, TLS, timeout).
    #[error("Failed to {operation}: transport error: {source}")]
    Transport {
        /// The operation being attempted.
        operation: Operation,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a status other than the expected success code.
    #[error("Failed to {operation}: unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// The operation being attempted.
        operation: Operation,
        /// The status the API returned.
        status: StatusCode,
        /// The raw response body.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("Failed to {operation}: error decoding response: {source} (body: {body})")]
    Decode {
        /// The operation being attempted.
        operation: Operation,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// The start of the offending body.
        body: String,
    },
}

impl ClientError {
    /// The operation that failed, if the error came from a request.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::InvalidBaseUrl { .. } | Self::HttpClient(_) => None,
            Self::Request { operation, .. }
            | Self::Transport { operation, .. }
            | Self::UnexpectedStatus { operation, .. }
            | Self::Decode { operation, .. } => Some(*operation),
        }
    }

    /// The HTTP status, for unexpected-status errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the API reported that the beverage does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub(crate) fn decode(operation: Operation, source: serde_json::Error, body: &str) -> Self {
        Self::Decode {
            operation,
            source,
            body: snippet(body),
        }
    }
}

fn snippet(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_SNIPPET) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// Errors that can occur in provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested resource was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A validation error occurred.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource or data source type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A call against the Beverage API failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl ProviderError {
    /// Get the error message as a string.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Configuration(msg)
            | Self::UnknownResource(msg) => msg.clone(),
            Self::Serialization(err) => err.to_string(),
            Self::Client(err) => err.to_string(),
        }
    }

    /// Convert the error into an error diagnostic for the user.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let summary = match self {
            Self::NotFound(_) => "Resource not found",
            Self::Validation(_) => "Invalid configuration",
            Self::Configuration(_) => "Missing Configuration",
            Self::UnknownResource(_) => "Unknown resource type",
            Self::Serialization(_) => "Invalid state",
            Self::Client(ClientError::InvalidBaseUrl { .. }) => "Invalid base URL",
            Self::Client(ClientError::HttpClient(_)) => "Invalid transport settings",
            Self::Client(err) => err
                .operation()
                .map(Operation::summary)
                .unwrap_or("Beverage API error"),
        };
        Diagnostic::error(summary).with_detail(self.message())
    }
}

// Error Types Module
// Failure categories for fetching, decoding, rendering and persistence.

use thiserror::Error;

/// A failed request to one of the stats endpoints.
///
/// Covers transport failures (connection refused, timeouts, non-success
/// status) and bodies that do not decode into the expected shape.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Reqwest error, typically a network issue or a timeout.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP error with status {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    /// The body was not valid JSON of the expected shape.
    #[error("Malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The fetch capability could not produce a response.
    #[error("Endpoint unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while writing into the dashboard document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// The host page has no element with this id.
    #[error("Missing element: #{0}")]
    MissingElement(String),

    /// The element exists but is not the expected kind.
    #[error("Element #{id} is not a {expected}")]
    WrongElementKind { id: String, expected: &'static str },

    /// A refresh task panicked or was cancelled.
    #[error("Refresh task failed: {0}")]
    Task(String),
}

/// Errors from the persistent key/value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access storage file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse storage file: {0}")]
    Parse(#[from] serde_json::Error),
}

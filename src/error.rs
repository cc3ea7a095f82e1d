//! Failure taxonomy for dataset loads.
//!
//! Transport and shape failures travel the same path to the caller (the slot
//! is cleared and the panel shows a generic message), but they stay distinct
//! types so tests and logs can tell them apart.

use thiserror::Error;

/// A 2xx response whose body does not have the minimal shape a dataset needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The body is not a JSON object.
    #[error("payload for {dataset} is not a JSON object")]
    NotAnObject { dataset: &'static str },

    /// A required top-level field is absent or null.
    #[error("required field '{field}' is missing")]
    MissingField { field: &'static str },

    /// A field that must be an array has another JSON type.
    #[error("field '{field}' is not an array")]
    NotAnArray { field: &'static str },

    /// The rows array exists but holds no usable row.
    #[error("{dataset} has no usable rows")]
    NoRows { dataset: &'static str },

    /// A required logical column matched none of its candidate headers.
    #[error("{dataset}: no column matches the '{field}' field")]
    UnresolvedColumn {
        dataset: &'static str,
        field: &'static str,
    },
}

/// Everything that can make a dataset load fail.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The endpoint path could not be joined onto the base URL.
    #[error("cannot build the URL for {endpoint}: {source}")]
    InvalidUrl {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// Connection, TLS or body read failure.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx HTTP status.
    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// The body is not valid JSON.
    #[error("could not decode JSON from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body is JSON but not the shape the dataset needs.
    #[error("unexpected payload from {endpoint}: {source}")]
    Shape {
        endpoint: String,
        #[source]
        source: ShapeError,
    },
}

impl LoadError {
    pub fn shape(endpoint: impl Into<String>, source: ShapeError) -> Self {
        LoadError::Shape {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// True for failures that happened before a body was read.
    pub fn is_transport(&self) -> bool {
        matches!(self, LoadError::Transport { .. } | LoadError::Status { .. })
    }
}

//! Error types for the objects API client and the collection store.
//!
//! # Design
//! `ApiError` describes what went wrong talking to the REST collection.
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the object does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `RequestFailed` with the raw
//! status code and body. Transport and decode failures carry status 0.
//!
//! `StoreError` adds the client-side rules enforced by `CollectionStore`
//! before any request is issued.

use thiserror::Error;

/// Errors returned by `ObjectClient` parse methods and `ObjectsApi` calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (no connectivity, DNS,
    /// connection reset).
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The response body could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The server returned 404.
    #[error("object not found")]
    NotFound,

    /// The server returned a non-success status other than 404.
    #[error("HTTP {status}: {body}")]
    RequestFailed { status: u16, body: String },
}

impl ApiError {
    /// HTTP status associated with the failure, 0 when no usable response
    /// was received.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::NetworkUnavailable(_) | ApiError::MalformedResponse(_) => 0,
            ApiError::NotFound => 404,
            ApiError::RequestFailed { status, .. } => *status,
        }
    }

    /// Short message suitable for showing to a user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NetworkUnavailable(_) => {
                "No connection. Check your network and try again.".to_string()
            }
            ApiError::MalformedResponse(_) => {
                "The server sent a response that could not be read.".to_string()
            }
            ApiError::NotFound => "The object no longer exists.".to_string(),
            ApiError::RequestFailed { status, .. } => {
                format!("Request failed (HTTP {status}).")
            }
        }
    }
}

/// Errors reported by `CollectionStore` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Reserved objects are seeded by the server and cannot be modified.
    #[error("object {id} is reserved and read-only")]
    PolicyViolation { id: String },

    /// A delete targeted an id that is not in the merged list.
    #[error("object {id} is not in the collection")]
    MissingRecord { id: String },

    /// The record was rejected before reaching the network.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl StoreError {
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Api(err) => err.user_message(),
            StoreError::PolicyViolation { .. } => "Reserved objects are read-only.".to_string(),
            StoreError::MissingRecord { .. } => {
                "The object is no longer in the list. Refresh and try again.".to_string()
            }
            StoreError::InvalidRecord(reason) => reason.clone(),
        }
    }
}

//! Error types for the inventory API client.
//!
//! # Design
//! One enum covers the three failure families the UI distinguishes: local
//! pre-checks that never reach the network, transport failures, and failures
//! the server reported. Every variant renders as a message that can be shown
//! to the user verbatim.

use thiserror::Error;
use validator::ValidationErrors;

/// Message used when a failed response carries no readable `message`.
pub const GENERIC_SERVER_ERROR: &str = "Server error";

#[derive(Debug, Error)]
pub enum ApiError {
    /// A by-id operation was called with an empty id. No request was built.
    #[error("product id is required")]
    MissingId,

    /// A by-category lookup was called with an empty category.
    #[error("category is required")]
    MissingCategory,

    /// Client-side validation rejected the payload. No request was built.
    #[error("invalid product data: {0}")]
    InvalidProduct(#[from] ValidationErrors),

    /// The request did not complete within the configured timeout.
    #[error("the request took too long")]
    Timeout,

    /// The backend could not be reached at all.
    #[error("cannot connect to the server, check that the API is running")]
    Unreachable,

    /// Any other transport failure, with the transport's own message.
    #[error("{0}")]
    Transport(String),

    /// Non-2xx status. `message` comes from the error body when it has one.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// 2xx response whose envelope reported `success: false`.
    #[error("{0}")]
    Rejected(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// True for failures the user can fix by changing their input: local
    /// validation, and server messages about validation or duplicates.
    pub fn is_user_correctable(&self) -> bool {
        match self {
            ApiError::InvalidProduct(_) => true,
            ApiError::Server { message, .. } | ApiError::Rejected(message) => {
                mentions_validation(message)
            }
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

fn mentions_validation(message: &str) -> bool {
    let lower = message.to_lowercase();
    ["validation", "validación", "already exists", "ya existe", "duplicate"]
        .iter()
        .any(|needle| lower.contains(needle))
}

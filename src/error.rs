//! Error types for the campaign client library.

use crate::models::CampaignId;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, CampaignError>;

/// All errors that can occur when talking to the campaign service or
/// editing a campaign draft.
#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    /// The HTTP request could not be sent or its body could not be read.
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The campaign list endpoint answered with a non-success status.
    #[error("unexpected HTTP status {status} while fetching campaigns")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
    },

    /// The server rejected a create or update request.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The server refused to delete a campaign.
    #[error("failed to delete campaign (HTTP {status})")]
    Delete {
        /// HTTP status code.
        status: u16,
    },

    /// A numeric draft field does not hold a finite number.
    #[error("{field} must be a number, got {value:?}")]
    InvalidNumber {
        /// Wire name of the offending field.
        field: &'static str,
        /// Raw text that failed to parse.
        value: String,
    },

    /// A form field name is not part of the campaign form.
    #[error("unknown form field: {0}")]
    UnknownField(String),

    /// A field received an input of the wrong shape (e.g. a checkbox
    /// toggle on a text field, or an unknown status literal).
    #[error("field {field} does not accept this input")]
    FieldInput {
        /// Wire name of the field.
        field: &'static str,
    },

    /// The requested campaign is not in the current list.
    #[error("campaign {0} not found")]
    NotFound(CampaignId),

    /// Configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Coarse classification of a [`CampaignError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport failure, unexpected status or malformed body.
    Network,
    /// The server rejected a mutation and explained why.
    Validation,
    /// A delete was refused (no message is extracted).
    Delete,
    /// Local input or configuration problem; nothing was sent.
    Input,
    /// The referenced campaign is not known locally.
    NotFound,
}

impl CampaignError {
    /// Returns the failure class of this error.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match *self {
            #[cfg(any(feature = "async", feature = "blocking"))]
            Self::Http(_) => ErrorKind::Network,
            Self::Serialization(_) | Self::UnexpectedStatus { .. } => ErrorKind::Network,
            Self::Api { .. } => ErrorKind::Validation,
            Self::Delete { .. } => ErrorKind::Delete,
            Self::InvalidNumber { .. }
            | Self::UnknownField(_)
            | Self::FieldInput { .. }
            | Self::Config(_) => ErrorKind::Input,
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

// ABOUTME: Error types for URL building, fetching, and feed parsing.
// ABOUTME: Provides FeedError with InvalidSpecification, Transport, MalformedFeed, and MalformedEntry variants.

use std::fmt;
use thiserror::Error;

/// Errors surfaced by the URL builder, the client, and the feed parser.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The search request cannot be turned into a feed URL.
    #[error("invalid search specification: {0}")]
    InvalidSpecification(String),

    /// The fetch failed or the service answered with a non-success status.
    /// `status` is `None` when no HTTP response was received.
    #[error("transport error for {url}: {message}")]
    Transport {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// The document is not well-formed XML or lacks required feed-level fields.
    #[error("malformed feed: {0}")]
    MalformedFeed(String),

    /// A single entry is missing a required field or holds an unparseable value.
    #[error("malformed entry: {field}: {reason}")]
    MalformedEntry { field: String, reason: String },
}

impl FeedError {
    /// Creates an InvalidSpecification error with a custom message.
    pub fn invalid_spec(msg: impl Into<String>) -> Self {
        FeedError::InvalidSpecification(msg.into())
    }

    /// Creates a Transport error from an underlying failure.
    pub fn transport(url: impl Into<String>, status: Option<u16>, err: impl fmt::Display) -> Self {
        FeedError::Transport {
            url: url.into(),
            status,
            message: err.to_string(),
        }
    }

    /// Creates a MalformedFeed error from an underlying failure or message.
    pub fn malformed_feed(err: impl fmt::Display) -> Self {
        FeedError::MalformedFeed(err.to_string())
    }

    /// Creates a MalformedEntry error naming the offending field.
    pub fn malformed_entry(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FeedError::MalformedEntry {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is an InvalidSpecification error.
    pub fn is_invalid_spec(&self) -> bool {
        matches!(self, FeedError::InvalidSpecification(_))
    }

    /// Returns true if this is a Transport error.
    pub fn is_transport(&self) -> bool {
        matches!(self, FeedError::Transport { .. })
    }

    /// Returns true if this is a MalformedFeed error.
    pub fn is_malformed_feed(&self) -> bool {
        matches!(self, FeedError::MalformedFeed(_))
    }

    /// Returns true if this is a MalformedEntry error.
    pub fn is_malformed_entry(&self) -> bool {
        matches!(self, FeedError::MalformedEntry { .. })
    }

    /// HTTP status attached to a Transport error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FeedError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_entry_display_names_field() {
        let err = FeedError::malformed_entry("title", "missing");
        assert_eq!(err.to_string(), "malformed entry: title: missing");
        assert!(err.is_malformed_entry());
        assert!(!err.is_malformed_feed());
    }

    #[test]
    fn transport_status_is_exposed() {
        let err = FeedError::transport("http://example.com/feed", Some(503), "unexpected HTTP status");
        assert!(err.is_transport());
        assert_eq!(err.status(), Some(503));
        assert_eq!(FeedError::invalid_spec("empty").status(), None);
    }
}

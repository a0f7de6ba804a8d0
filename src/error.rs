// src/error.rs
// =============================================================================
// Error types for the whole library.
//
// There are two levels of failure:
// - Per-link failures (LinkError) are recovered into a LinkResult. They never
//   stop the session or affect other links.
// - Session-level failures (SessionError) end the session and are reported
//   once, through the completion signal.
//
// A failing HTTP status (404, 500, ...) is NOT an error: the request itself
// worked, so the status is stored on the result and the link is marked broken.
//
// Rust concepts:
// - thiserror derives Display and std::error::Error from attributes
// - #[from] lets `?` convert lower-level errors automatically
// - A hand-written Serialize when the wire shape differs from the enum shape
// =============================================================================

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure classification for a single link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The raw reference is empty or unparsable and there is no usable base.
    /// No network request is ever made for these.
    #[error("invalid url")]
    InvalidUrl {
        /// Why the reference was rejected (e.g. "relative URL without a base")
        detail: String,
    },

    /// Name resolution, connection, TLS, timeout or redirect-limit failure.
    #[error("{detail}")]
    Network {
        code: NetworkErrorCode,
        detail: String,
    },
}

impl LinkError {
    /// The system-style error code, for network failures only.
    pub fn code(&self) -> Option<NetworkErrorCode> {
        match self {
            LinkError::Network { code, .. } => Some(*code),
            LinkError::InvalidUrl { .. } => None,
        }
    }

    /// The underlying cause, as reported by the parser or the HTTP stack
    pub fn detail(&self) -> &str {
        match self {
            LinkError::InvalidUrl { detail } | LinkError::Network { detail, .. } => detail,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            LinkError::InvalidUrl { .. } => "invalid_url",
            LinkError::Network { .. } => "network",
        }
    }
}

// Wire form: {"kind", "message", "code", "detail"}. `message` is the Display
// text, `code` is null for anything but network failures.
impl Serialize for LinkError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LinkError", 4)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("code", &self.code())?;
        state.serialize_field("detail", self.detail())?;
        state.end()
    }
}

// Codes are named after the errno-style codes people already know from
// other HTTP tooling (ENOTFOUND for DNS failures, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NetworkErrorCode {
    #[serde(rename = "ENOTFOUND")]
    HostNotFound,
    #[serde(rename = "ECONNREFUSED")]
    ConnectionRefused,
    #[serde(rename = "ECONNRESET")]
    ConnectionReset,
    #[serde(rename = "ETIMEDOUT")]
    TimedOut,
    #[serde(rename = "EMAXREDIRECTS")]
    TooManyRedirects,
    #[serde(rename = "ETLS")]
    Tls,
    #[serde(rename = "ECONNECT")]
    Connect,
    #[serde(rename = "EREQUEST")]
    Request,
}

impl NetworkErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkErrorCode::HostNotFound => "ENOTFOUND",
            NetworkErrorCode::ConnectionRefused => "ECONNREFUSED",
            NetworkErrorCode::ConnectionReset => "ECONNRESET",
            NetworkErrorCode::TimedOut => "ETIMEDOUT",
            NetworkErrorCode::TooManyRedirects => "EMAXREDIRECTS",
            NetworkErrorCode::Tls => "ETLS",
            NetworkErrorCode::Connect => "ECONNECT",
            NetworkErrorCode::Request => "EREQUEST",
        }
    }
}

impl fmt::Display for NetworkErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw reference could not be turned into an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid url")]
pub struct ResolveError {
    /// The literal string that failed to resolve
    pub raw: String,
    /// Why the url crate rejected it
    pub reason: url::ParseError,
}

impl From<ResolveError> for LinkError {
    fn from(err: ResolveError) -> Self {
        LinkError::InvalidUrl {
            detail: err.reason.to_string(),
        }
    }
}

/// The document itself could not be obtained or parsed.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid document url: {0}")]
    InvalidUrl(String),

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("document parser stopped before producing a base context")]
    Parser,
}

/// Session-level failure, surfaced once through the completion signal.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not extract links: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("session aborted")]
    Aborted,
}

/// Rejected checker configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid site url '{site}': {source}")]
    InvalidSite {
        site: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

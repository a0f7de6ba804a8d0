// src/checker/link.rs
// =============================================================================
// The two value types that flow through the pipeline:
//
//   LinkCandidate  - a link found in a document (or given directly), unchecked
//   LinkResult     - the final verdict for one candidate
//
// Results keep every candidate field, so a consumer can rebuild document
// order from `index` no matter which order results arrive in.
// =============================================================================

use crate::checker::cache::CheckOutcome;
use crate::error::LinkError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCandidate {
    /// Position in document order (0 for a single URL)
    pub index: usize,
    /// The literal attribute value, before any resolution
    pub url: String,
    pub tag_name: Option<String>,
    pub attr_name: Option<String>,
    /// Serialized opening tag of the owning element
    pub tag: Option<String>,
    /// Text inside the owning element; None when it has no text at all
    pub text: Option<String>,
}

impl LinkCandidate {
    /// A directly supplied URL with no markup around it
    pub fn bare(url: impl Into<String>) -> Self {
        Self {
            index: 0,
            url: url.into(),
            tag_name: None,
            attr_name: None,
            tag: None,
            text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResult {
    pub index: usize,
    pub url: String,
    /// Absolute form of `url`; written as-is when `url` was already absolute
    pub resolved_url: Option<String>,
    pub tag_name: Option<String>,
    pub attr_name: Option<String>,
    pub tag: Option<String>,
    pub text: Option<String>,
    pub error: Option<LinkError>,
    /// Status of the final response, when a response was received
    pub http_status: Option<u16>,
    /// The scheme isn't checked (mailto:, tel:, ...)
    pub excluded: bool,
    // Derived in the constructors only
    broken: bool,
}

impl LinkResult {
    /// Resolution failed: no resolved URL, always broken
    pub fn unresolved(candidate: LinkCandidate, error: LinkError) -> Self {
        Self::build(candidate, None, Some(error), None, false)
    }

    /// Resolved, but the scheme is outside the accepted set
    pub fn excluded(candidate: LinkCandidate, resolved: impl Into<String>) -> Self {
        Self::build(candidate, Some(resolved.into()), None, None, true)
    }

    /// Resolved and checked over the network (or via the cache)
    pub fn checked(
        candidate: LinkCandidate,
        resolved: impl Into<String>,
        outcome: CheckOutcome,
    ) -> Self {
        Self::build(
            candidate,
            Some(resolved.into()),
            outcome.error,
            outcome.http_status,
            false,
        )
    }

    fn build(
        candidate: LinkCandidate,
        resolved: Option<String>,
        error: Option<LinkError>,
        http_status: Option<u16>,
        excluded: bool,
    ) -> Self {
        let broken = error.is_some() || http_status.is_some_and(is_failure_status);
        Self {
            index: candidate.index,
            url: candidate.url,
            resolved_url: resolved,
            tag_name: candidate.tag_name,
            attr_name: candidate.attr_name,
            tag: candidate.tag,
            text: candidate.text,
            error,
            http_status,
            excluded,
            broken,
        }
    }

    /// True when the link couldn't be confirmed reachable
    pub fn broken(&self) -> bool {
        self.broken
    }
}

// 4xx and 5xx
pub(crate) fn is_failure_status(status: u16) -> bool {
    (400..600).contains(&status)
}

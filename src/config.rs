// src/config.rs
// =============================================================================
// Options recognized by the link checker.
//
// Every field has a default, so callers only set what they care about:
//
//   let options = CheckerOptions::with_site("https://example.com");
//
// The struct is serde-enabled so a host application can embed it in its own
// configuration file; loading that file is the host's job.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerOptions {
    /// Base URL used to resolve relative (and empty) references
    pub site: Option<String>,

    /// Maximum number of network checks running at once
    pub max_concurrency: usize,

    /// How many redirect hops a check may follow
    pub max_redirects: usize,

    /// Per-request timeout, in seconds
    pub timeout_secs: u64,

    /// HTTP method used for link checks
    pub request_method: RequestMethod,

    /// Schemes that get a network check; anything else is reported as excluded
    pub accepted_schemes: Vec<String>,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestMethod {
    /// HEAD first (no body download), GET if the server answers 405
    Head,
    /// Always GET
    Get,
}

impl RequestMethod {
    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            RequestMethod::Head => reqwest::Method::HEAD,
            RequestMethod::Get => reqwest::Method::GET,
        }
    }
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            site: None,
            max_concurrency: default_max_concurrency(),
            max_redirects: 5,
            timeout_secs: 10,
            request_method: RequestMethod::Head,
            accepted_schemes: vec!["http".to_string(), "https".to_string()],
            user_agent: concat!("link-inspector/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

fn default_max_concurrency() -> usize {
    10
}

impl CheckerOptions {
    /// Default options with an explicit base URL
    pub fn with_site(site: impl Into<String>) -> Self {
        Self {
            site: Some(site.into()),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    // A zero bound would stall every check forever
    pub(crate) fn concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }
}

// src/checker/http.rs
// =============================================================================
// This module checks if links are alive by making HTTP requests.
//
// Key functionality:
// - Resolves each candidate against the session's base URL
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Falls back to GET if the server answers HEAD with 405
// - Detects the various failure modes (DNS, refused, timeout, TLS, ...)
// - Shares one request between all links pointing at the same URL
// - Caps how many requests are in flight with a semaphore
//
// Only the request itself holds a semaphore permit. Resolving a link or
// waiting on somebody else's check never takes a slot.
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - Atomics: Counters shared between tasks without a lock
// - Error chains: Walking .source() to find the real cause
// =============================================================================

use crate::checker::cache::{Acquired, CheckOutcome, VerificationCache};
use crate::checker::link::{LinkCandidate, LinkResult};
use crate::checker::resolve::{resolved_text, ResolutionContext};
use crate::config::{CheckerOptions, RequestMethod};
use crate::error::{ConfigError, LinkError, NetworkErrorCode};
use reqwest::{Client, StatusCode};
use std::error::Error as StdError;
use std::io::ErrorKind;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use tracing::debug;
use url::Url;

// Substrings that identify a name resolution failure somewhere in the
// error chain (hyper's resolver, getaddrinfo, Windows)
const DNS_MARKERS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "no such host",
];

const TLS_MARKERS: &[&str] = &["certificate", "tls", "ssl", "handshake"];

// Builds the HTTP client shared by every session of a LinkChecker.
// Cloning a Client is cheap (it's a reference counter internally), and
// reusing it gives us connection pooling.
pub fn build_client(options: &CheckerOptions) -> Result<Client, ConfigError> {
    let client = Client::builder()
        .timeout(options.timeout())
        .redirect(reqwest::redirect::Policy::limited(options.max_redirects))
        .user_agent(options.user_agent.clone())
        .build()?;
    Ok(client)
}

pub struct Verifier {
    client: Client,
    cache: VerificationCache,
    gate: Semaphore,
    method: RequestMethod,
    accepted_schemes: Vec<String>,
    network_checks: AtomicUsize,
    cache_hits: AtomicUsize,
}

impl Verifier {
    // One verifier per session: the cache must not outlive the session
    pub fn new(client: Client, options: &CheckerOptions) -> Self {
        Self {
            client,
            cache: VerificationCache::new(),
            gate: Semaphore::new(options.concurrency()),
            method: options.request_method,
            accepted_schemes: options.accepted_schemes.clone(),
            network_checks: AtomicUsize::new(0),
            cache_hits: AtomicUsize::new(0),
        }
    }

    /// Turns one candidate into its terminal result
    pub async fn verify(&self, candidate: LinkCandidate, context: &ResolutionContext) -> LinkResult {
        let resolved = match context.resolve(&candidate.url) {
            Ok(url) => url,
            Err(e) => {
                debug!(index = candidate.index, url = %candidate.url, reason = %e.reason, "unresolvable link");
                return LinkResult::unresolved(candidate, e.into());
            }
        };

        // Requests and the cache use the parsed URL; callers see their own spelling
        let shown = resolved_text(&candidate.url, &resolved);

        if !self.accepts(&resolved) {
            debug!(index = candidate.index, url = %resolved, "scheme not checked");
            return LinkResult::excluded(candidate, shown);
        }

        let outcome = self.check_cached(&resolved).await;
        LinkResult::checked(candidate, shown, outcome)
    }

    /// How many requests this session actually sent out
    pub fn network_checks(&self) -> usize {
        self.network_checks.load(Ordering::Relaxed)
    }

    /// How many links reused another link's check
    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache(&self) -> &VerificationCache {
        &self.cache
    }

    fn accepts(&self, url: &Url) -> bool {
        self.accepted_schemes
            .iter()
            .any(|scheme| scheme.eq_ignore_ascii_case(url.scheme()))
    }

    async fn check_cached(&self, url: &Url) -> CheckOutcome {
        loop {
            match self.cache.acquire(url.as_str()) {
                Acquired::New(pending) => {
                    let outcome = self.check_network(url).await;
                    pending.complete(outcome.clone());
                    return outcome;
                }
                Acquired::Existing(handle) => {
                    if let Some(outcome) = handle.wait().await {
                        self.cache_hits.fetch_add(1, Ordering::Relaxed);
                        return outcome;
                    }
                    // The owner was dropped mid-check; try to become the owner
                    debug!(url = %url, "cached check abandoned, retrying");
                }
            }
        }
    }

    async fn check_network(&self, url: &Url) -> CheckOutcome {
        let _permit = match self.gate.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                return CheckOutcome {
                    http_status: None,
                    error: Some(LinkError::Network {
                        code: NetworkErrorCode::Request,
                        detail: "verification gate closed".to_string(),
                    }),
                }
            }
        };

        self.network_checks.fetch_add(1, Ordering::Relaxed);
        debug!(url = %url, method = ?self.method, "checking link");

        match self.request(url).await {
            Ok(status) => analyze_status(status),
            Err(e) => {
                let error = categorize_error(&e);
                debug!(url = %url, error = %error, "link check failed");
                CheckOutcome {
                    http_status: None,
                    error: Some(error),
                }
            }
        }
    }

    // Sends the request and returns the status of the final response
    // (redirects are followed by the client up to the configured limit)
    async fn request(&self, url: &Url) -> Result<StatusCode, reqwest::Error> {
        let response = self
            .client
            .request(self.method.as_reqwest(), url.clone())
            .send()
            .await?;

        let status = response.status();
        if self.method == RequestMethod::Head && status == StatusCode::METHOD_NOT_ALLOWED {
            debug!(url = %url, "HEAD not allowed, retrying with GET");
            let response = self.client.get(url.clone()).send().await?;
            return Ok(response.status());
        }
        Ok(status)
    }
}

// Got a response: whatever the status, the request itself worked, so there's
// no error. 4xx/5xx make the link broken through its status.
fn analyze_status(status: StatusCode) -> CheckOutcome {
    CheckOutcome {
        http_status: Some(status.as_u16()),
        error: None,
    }
}

// Categorizes reqwest errors into network error codes
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - Connection refused / reset
// - SSL certificate issues
// - Too many redirects
//
// Markers are only looked for in the causes. reqwest's own message contains
// the request URL, and a path like /docs/openssl-setup must not read as TLS.
fn categorize_error(error: &reqwest::Error) -> LinkError {
    let causes = causes(error).join(": ").to_lowercase();
    LinkError::Network {
        code: network_code(error, &causes),
        detail: error_chain(error),
    }
}

fn network_code(error: &reqwest::Error, causes: &str) -> NetworkErrorCode {
    if error.is_timeout() {
        return NetworkErrorCode::TimedOut;
    }
    if error.is_redirect() {
        return NetworkErrorCode::TooManyRedirects;
    }
    if DNS_MARKERS.iter().any(|m| causes.contains(m)) {
        return NetworkErrorCode::HostNotFound;
    }
    match io_error_kind(error) {
        Some(ErrorKind::ConnectionRefused) => return NetworkErrorCode::ConnectionRefused,
        Some(ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe) => {
            return NetworkErrorCode::ConnectionReset
        }
        Some(ErrorKind::TimedOut) => return NetworkErrorCode::TimedOut,
        _ => {}
    }
    if TLS_MARKERS.iter().any(|m| causes.contains(m)) {
        NetworkErrorCode::Tls
    } else if error.is_connect() {
        NetworkErrorCode::Connect
    } else {
        NetworkErrorCode::Request
    }
}

// Full message including every cause, without repeating causes that the
// outer message already printed
fn error_chain(error: &reqwest::Error) -> String {
    let mut detail = error.to_string();
    for message in causes(error) {
        if !detail.contains(&message) {
            detail.push_str(": ");
            detail.push_str(&message);
        }
    }
    detail
}

// Messages of everything below the reqwest error itself, outermost first
fn causes(error: &reqwest::Error) -> Vec<String> {
    let mut messages = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        messages.push(cause.to_string());
        source = cause.source();
    }
    messages
}

fn io_error_kind(error: &reqwest::Error) -> Option<ErrorKind> {
    let mut source = error.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            return Some(io.kind());
        }
        source = cause.source();
    }
    None
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a Semaphore?
//    - A counter of "permits"; acquire() waits until one is free
//    - The permit is given back when `_permit` is dropped
//    - Here it caps how many requests are in flight at once
//
// 2. Why AtomicUsize instead of a plain usize?
//    - verify() takes &self and runs on many futures at the same time
//    - Atomics can be updated through a shared reference, no Mutex needed
//    - Ordering::Relaxed is enough for counters nobody synchronizes on
//
// 3. What is error.source()?
//    - Errors can wrap other errors (reqwest -> hyper -> io::Error)
//    - source() returns the wrapped one, so we loop until it's None
//    - downcast_ref::<T>() checks if a cause is a specific type
// -----------------------------------------------------------------------------

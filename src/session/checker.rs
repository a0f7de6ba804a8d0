// src/session/checker.rs
// =============================================================================
// LinkChecker: the entry point that wires the pipeline together.
//
//   document --extract--> candidates --verify--> results --> Session
//
// Each check_* call starts one session on the tokio runtime and returns its
// Session right away. Inside the session:
// 1. The document is parsed and walked on a blocking thread. Candidates are
//    pushed into a bounded queue as they're found, so checking starts before
//    a large document is fully walked.
// 2. Candidates are verified concurrently (buffer_unordered), sharing one
//    cache and one concurrency gate for the whole session.
// 3. Every result is sent as soon as it's final; completion is sent last.
//
// Rust concepts:
// - Channels: mpsc for streams of values, oneshot for a single value
// - tokio::select!: wait on whichever of several futures finishes first
// - spawn_blocking: run CPU-bound work off the async threads
// =============================================================================

use crate::checker::{
    build_client, document_base, LinkCandidate, LinkExtractor, LinkResult, ResolutionContext,
    TagAttributeMap, Verifier,
};
use crate::config::CheckerOptions;
use crate::error::{ConfigError, ExtractionError, SessionError};
use crate::session::fetch::fetch_document;
use crate::session::handle::{Completion, Session, SessionStats};
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::Client;
use scraper::Html;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

// How far extraction may run ahead of verification
const CANDIDATE_QUEUE: usize = 256;

// How many links may be between "picked up" and "reported" at once. The
// number of simultaneous requests is bounded separately by max_concurrency.
const MAX_PENDING_CHECKS: usize = 256;

pub struct LinkChecker {
    options: CheckerOptions,
    client: Client,
    tags: Arc<TagAttributeMap>,
    context: ResolutionContext,
}

enum Source {
    Url(String),
    Markup(String),
    Remote(String),
}

impl LinkChecker {
    pub fn new(options: CheckerOptions) -> Result<Self, ConfigError> {
        Self::with_tags(options, TagAttributeMap::standard())
    }

    /// Same as new(), but looks for links in a custom set of elements
    pub fn with_tags(options: CheckerOptions, tags: TagAttributeMap) -> Result<Self, ConfigError> {
        let context = match &options.site {
            Some(site) => {
                let base = Url::parse(site).map_err(|source| ConfigError::InvalidSite {
                    site: site.clone(),
                    source,
                })?;
                ResolutionContext::with_base(base)
            }
            None => ResolutionContext::none(),
        };
        let client = build_client(&options)?;

        Ok(Self {
            options,
            client,
            tags: Arc::new(tags),
            context,
        })
    }

    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    /// Checks a single URL (index 0, no markup fields), resolved against
    /// the `site` option. Must be called within a tokio runtime.
    pub fn check_url(&self, url: impl Into<String>) -> Session {
        self.start(Source::Url(url.into()))
    }

    /// Checks every link in an HTML string
    pub fn check_html(&self, markup: impl Into<String>) -> Session {
        self.start(Source::Markup(markup.into()))
    }

    /// Downloads a page and checks every link in it. Relative links resolve
    /// against the page's final URL (after redirects).
    pub fn check_html_url(&self, url: impl Into<String>) -> Session {
        self.start(Source::Remote(url.into()))
    }

    fn start(&self, source: Source) -> Session {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = oneshot::channel();
        let cancel = CancellationToken::new();

        let run = SessionRun {
            source,
            verifier: Verifier::new(self.client.clone(), &self.options),
            client: self.client.clone(),
            context: self.context.clone(),
            tags: Arc::clone(&self.tags),
        };
        let token = cancel.clone();

        tokio::spawn(async move {
            let outcome: Completion = tokio::select! {
                biased;
                _ = token.cancelled() => Err(SessionError::Aborted),
                outcome = run.drive(&results_tx) => outcome,
            };

            // Close the result stream before completion becomes visible
            drop(results_tx);

            match &outcome {
                Ok(stats) => info!(
                    links = stats.links,
                    network_checks = stats.network_checks,
                    cache_hits = stats.cache_hits,
                    "session complete"
                ),
                Err(e) => warn!(error = %e, "session ended early"),
            }
            let _ = completion_tx.send(outcome);
        });

        Session::new(results_rx, completion_rx, cancel)
    }
}

struct SessionRun {
    source: Source,
    verifier: Verifier,
    client: Client,
    context: ResolutionContext,
    tags: Arc<TagAttributeMap>,
}

impl SessionRun {
    async fn drive(self, results: &mpsc::UnboundedSender<LinkResult>) -> Completion {
        let SessionRun {
            source,
            verifier,
            client,
            context,
            tags,
        } = self;

        let (context, candidates) = match source {
            Source::Url(url) => (context, stream::iter([LinkCandidate::bare(url)]).boxed()),
            Source::Markup(markup) => extract_in_background(markup, tags, context).await?,
            Source::Remote(url) => {
                let url = context
                    .resolve(&url)
                    .map_err(|e| ExtractionError::InvalidUrl(e.raw))?;
                let document = fetch_document(&client, &url).await?;
                debug!(requested = %url, fetched = %document.url, "fetched document");
                let context = ResolutionContext::with_base(document.url);
                extract_in_background(document.body, tags, context).await?
            }
        };

        let verifier = &verifier;
        let context = &context;
        let mut checks = candidates
            .map(move |candidate| verifier.verify(candidate, context))
            .buffer_unordered(MAX_PENDING_CHECKS);

        let mut delivered = 0;
        while let Some(result) = checks.next().await {
            debug!(index = result.index, broken = result.broken(), "link verified");
            delivered += 1;
            // A consumer that stopped listening doesn't stop the session;
            // completion must still fire
            let _ = results.send(result);
        }

        Ok(SessionStats {
            links: delivered,
            network_checks: verifier.network_checks(),
            cache_hits: verifier.cache_hits(),
        })
    }
}

// Parses and walks the document on a blocking thread (scraper's Html isn't
// Send, so both happen there) and streams candidates back through a bounded
// queue. The document's <base href> is applied before any link is seen.
async fn extract_in_background(
    markup: String,
    tags: Arc<TagAttributeMap>,
    context: ResolutionContext,
) -> Result<(ResolutionContext, BoxStream<'static, LinkCandidate>), ExtractionError> {
    let (context_tx, context_rx) = oneshot::channel();
    let (candidate_tx, mut candidate_rx) = mpsc::channel(CANDIDATE_QUEUE);

    tokio::task::spawn_blocking(move || {
        let document = Html::parse_document(&markup);
        let context = match document_base(&document) {
            Some(href) => context.refine(&href),
            None => context,
        };
        if context_tx.send(context).is_err() {
            return;
        }

        for candidate in LinkExtractor::new(&tags).candidates(&document) {
            // Receiver gone means the session was aborted
            if candidate_tx.blocking_send(candidate).is_err() {
                break;
            }
        }
    });

    let context = context_rx.await.map_err(|_| ExtractionError::Parser)?;
    let candidates = stream::poll_fn(move |cx| candidate_rx.poll_recv(cx)).boxed();
    Ok((context, candidates))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why spawn_blocking for parsing?
//    - Parsing and walking HTML never awaits, so it would hold an async
//      worker thread for the whole document
//    - scraper's Html isn't Send, so it has to live on one thread anyway
//
// 2. Why a bounded channel between extraction and verification?
//    - blocking_send() waits when the queue is full
//    - A huge document can't pile up candidates faster than we check them
//
// 3. What does `biased;` do in select!?
//    - Branches are polled top to bottom instead of randomly
//    - Cancellation is looked at first, so abort wins over new work
// -----------------------------------------------------------------------------

// src/session/handle.rs
// =============================================================================
// The caller's side of a running session.
//
// A session reports through two channels:
// - results: one LinkResult per link, in the order checks FINISH
//   (use `index` to put them back in document order)
// - completion: fires exactly once, after the last result was sent
//
// Consumers can pull results one by one (next_result / Stream), collect them
// all, or hand a SessionHandler to run() for callback-style delivery.
// Dropping a Session aborts it.
// =============================================================================

use crate::checker::LinkResult;
use crate::error::SessionError;
use futures::Stream;
use serde::Serialize;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// Counters reported on successful completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Results delivered
    pub links: usize,
    /// Requests actually sent
    pub network_checks: usize,
    /// Links answered by another link's request
    pub cache_hits: usize,
}

pub type Completion = Result<SessionStats, SessionError>;

/// Callback-style consumer for Session::run
pub trait SessionHandler {
    /// Called once per link, as soon as its result is final
    fn link(&mut self, result: LinkResult);

    /// Called exactly once, after the last link
    fn complete(&mut self, outcome: Completion);
}

pub struct Session {
    results: mpsc::UnboundedReceiver<LinkResult>,
    completion: oneshot::Receiver<Completion>,
    cancel: CancellationToken,
}

impl Session {
    pub(crate) fn new(
        results: mpsc::UnboundedReceiver<LinkResult>,
        completion: oneshot::Receiver<Completion>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            results,
            completion,
            cancel,
        }
    }

    /// Next finished result, or None once every link has been reported
    pub async fn next_result(&mut self) -> Option<LinkResult> {
        self.results.recv().await
    }

    /// Drains the remaining results and waits for completion
    pub async fn finish(mut self) -> Completion {
        while self.results.recv().await.is_some() {}
        self.wait_completion().await
    }

    /// All results, sorted back into document order
    pub async fn collect(mut self) -> Result<Vec<LinkResult>, SessionError> {
        let mut results = Vec::new();
        while let Some(result) = self.results.recv().await {
            results.push(result);
        }
        self.wait_completion().await?;
        results.sort_by_key(|r| r.index);
        Ok(results)
    }

    pub async fn run<H: SessionHandler + ?Sized>(mut self, handler: &mut H) {
        while let Some(result) = self.results.recv().await {
            handler.link(result);
        }
        let outcome = self.wait_completion().await;
        handler.complete(outcome);
    }

    /// Stops the session: queued links are dropped, in-flight checks abandoned
    pub fn abort(&self) {
        self.cancel.cancel();
    }

    /// Aborts the session from somewhere that doesn't own it
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle(self.cancel.clone())
    }

    async fn wait_completion(&mut self) -> Completion {
        // The driver task only disappears without reporting if it was torn
        // down with the runtime
        (&mut self.completion)
            .await
            .unwrap_or_else(|_| Err(SessionError::Aborted))
    }
}

impl Stream for Session {
    type Item = LinkResult;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<LinkResult>> {
        self.get_mut().results.poll_recv(cx)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[derive(Debug, Clone)]
pub struct AbortHandle(CancellationToken);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.cancel();
    }
}

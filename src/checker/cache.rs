// src/checker/cache.rs
// =============================================================================
// Session-scoped cache of network checks, keyed by resolved URL.
//
// The first caller for a URL gets a PendingCheck and must do the request.
// Everybody else gets a CacheHandle and waits for that same outcome, so a
// page linking to the same URL ten times only hits the network once.
//
// acquire() is a single atomic step per key (the dashmap entry API holds the
// shard lock while checking and inserting), so two workers can never both
// believe they are first.
//
// The shared "slot" for each URL is a tokio watch channel:
// - the PendingCheck owns the sender and publishes the outcome once
// - every CacheHandle owns a receiver and waits for Some(outcome)
//
// Rust concepts:
// - Drop: cleanup code that runs when a value goes out of scope
// - Arc: shared ownership across tasks
// - Enums carrying data (Acquired::New / Acquired::Existing)
// =============================================================================

use crate::error::LinkError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// What a network check concluded, shared by every link with the same URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub http_status: Option<u16>,
    pub error: Option<LinkError>,
}

type Slot = watch::Receiver<Option<CheckOutcome>>;

#[derive(Debug, Clone, Default)]
pub struct VerificationCache {
    entries: Arc<DashMap<String, Slot>>,
}

pub enum Acquired {
    /// Caller is first and must perform the check
    New(PendingCheck),
    /// A check exists (running or finished); wait on it
    Existing(CacheHandle),
}

impl Acquired {
    pub fn is_new(&self) -> bool {
        matches!(self, Acquired::New(_))
    }
}

impl VerificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, url: &str) -> Acquired {
        match self.entries.entry(url.to_string()) {
            Entry::Occupied(entry) => Acquired::Existing(CacheHandle {
                slot: entry.get().clone(),
            }),
            Entry::Vacant(entry) => {
                let (sender, receiver) = watch::channel(None);
                entry.insert(receiver);
                Acquired::New(PendingCheck {
                    url: url.to_string(),
                    sender,
                    entries: Arc::clone(&self.entries),
                    completed: false,
                })
            }
        }
    }

    /// Completed outcome for a URL, if its check has finished
    pub fn get(&self, url: &str) -> Option<CheckOutcome> {
        let slot = self.entries.get(url)?;
        let outcome = slot.borrow().clone();
        outcome
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The obligation to run the check for one URL.
pub struct PendingCheck {
    url: String,
    sender: watch::Sender<Option<CheckOutcome>>,
    entries: Arc<DashMap<String, Slot>>,
    completed: bool,
}

impl PendingCheck {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Publishes the outcome to every current and future waiter
    pub fn complete(mut self, outcome: CheckOutcome) {
        self.sender.send_replace(Some(outcome));
        self.completed = true;
    }
}

impl Drop for PendingCheck {
    // An abandoned check (its future was dropped) must not leave waiters
    // stuck on a slot nobody will fill. Only the owner ever removes its key.
    fn drop(&mut self) {
        if !self.completed {
            self.entries.remove(&self.url);
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheHandle {
    slot: Slot,
}

impl CacheHandle {
    /// Waits for the owner's outcome. None if the owner was abandoned before
    /// finishing, in which case the caller should acquire again.
    pub async fn wait(mut self) -> Option<CheckOutcome> {
        match self.slot.wait_for(Option::is_some).await {
            Ok(outcome) => (*outcome).clone(),
            Err(_) => None,
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a watch channel?
//    - A single value that many receivers can read and wait on
//    - The sender replaces the value; receivers see the latest one
//    - wait_for() sleeps until the value matches a condition
//
// 2. Why implement Drop for PendingCheck?
//    - If the owner's future is cancelled, complete() never runs
//    - Drop still runs, so the entry is removed instead of hanging forever
//    - Waiters then see the sender closed and try again
//
// 3. What is the dashmap entry API?
//    - entry(key) locks the key's shard until the entry is dropped
//    - Occupied / Vacant tells us whether somebody got there first
// -----------------------------------------------------------------------------

// src/session/mod.rs
// =============================================================================
// One "session" = checking the links of one document (or one URL).
//
// - checker: LinkChecker, which starts sessions and drives them
// - handle: Session, the caller's end (results + completion + abort)
// - fetch: downloads the page for check_html_url
// =============================================================================

mod checker;
mod fetch;
mod handle;

pub use checker::LinkChecker;
pub use fetch::{fetch_document, FetchedDocument};
pub use handle::{AbortHandle, Completion, Session, SessionHandler, SessionStats};

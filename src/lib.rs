// src/lib.rs
// =============================================================================
// link-inspector: find the links in an HTML document and check that each one
// is reachable.
//
// Quick tour:
//
//   let checker = LinkChecker::new(CheckerOptions::default())?;
//   let results = checker.check_html(r#"<a href="https://example.com">x</a>"#)
//       .collect()
//       .await?;
//
// Results arrive as soon as each check finishes; `index` gives the position
// of the link in the document.
// =============================================================================

pub mod checker;
pub mod config;
pub mod error;
pub mod session;

pub use checker::{LinkCandidate, LinkResult, ResolutionContext, TagAttributeMap};
pub use config::{CheckerOptions, RequestMethod};
pub use error::{ConfigError, ExtractionError, LinkError, NetworkErrorCode, ResolveError, SessionError};
pub use session::{AbortHandle, LinkChecker, Session, SessionHandler, SessionStats};

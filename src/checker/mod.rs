// src/checker/mod.rs
// =============================================================================
// This module contains all link finding and link checking logic.
//
// Submodules:
// - tags: Which elements/attributes carry links
// - resolve: Turns raw link strings into absolute URLs
// - html: Finds link candidates in HTML documents
// - link: The candidate and result types
// - cache: Shares one network check between links to the same URL
// - http: Verifies candidates over the network
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of the crate can use.
//
// Rust concepts:
// - Modules: Organize code into namespaces
// - pub use: Re-export items to simplify imports for users of this module
// =============================================================================

mod cache;
mod html;
mod http;
mod link;
mod resolve;
mod tags;

pub use cache::{Acquired, CacheHandle, CheckOutcome, PendingCheck, VerificationCache};
pub use html::{document_base, extract_links, LinkExtractor};
pub use http::{build_client, Verifier};
pub use link::{LinkCandidate, LinkResult};
pub use resolve::{resolve, resolved_text, ResolutionContext};
pub use tags::TagAttributeMap;

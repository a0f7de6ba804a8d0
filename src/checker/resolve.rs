// src/checker/resolve.rs
// =============================================================================
// Turns raw link strings into absolute URLs.
//
// Rules:
// - Has a scheme ("https://...", "mailto:...") -> parsed as-is. The parsed
//   (normalized) URL is what gets requested and cached, but it is reported
//   exactly as written
// - Relative ("/docs", "../x", "//cdn.example.com/a.js") -> joined with the base
// - Empty string -> the base itself (without its fragment)
// - Anything that can't be made absolute -> ResolveError ("invalid url")
//
// This is pure: no network, no I/O.
// =============================================================================

use crate::error::ResolveError;
use url::Url;

/// Base URL information for one session. Cloned into every verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionContext {
    base: Option<Url>,
}

impl ResolutionContext {
    /// No base: only absolute references resolve
    pub fn none() -> Self {
        Self { base: None }
    }

    pub fn with_base(base: Url) -> Self {
        Self { base: Some(base) }
    }

    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    pub fn resolve(&self, raw: &str) -> Result<Url, ResolveError> {
        resolve(raw, self.base.as_ref())
    }

    // A document's <base href> refines the context. Values that don't
    // resolve leave the context unchanged, like browsers do.
    pub fn refine(&self, base_href: &str) -> Self {
        match self.resolve(base_href) {
            Ok(base) => Self::with_base(base),
            Err(_) => self.clone(),
        }
    }
}

pub fn resolve(raw: &str, base: Option<&Url>) -> Result<Url, ResolveError> {
    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => match base {
            Some(base) => base.join(raw).map_err(|reason| ResolveError {
                raw: raw.to_string(),
                reason,
            }),
            None => Err(ResolveError {
                raw: raw.to_string(),
                reason: url::ParseError::RelativeUrlWithoutBase,
            }),
        },
        Err(reason) => Err(ResolveError {
            raw: raw.to_string(),
            reason,
        }),
    }
}

// The resolved URL as shown to callers. References that were already absolute
// keep their own spelling ("http://host" stays without a trailing slash);
// anything joined with a base uses the joined URL's serialization.
pub fn resolved_text(raw: &str, resolved: &Url) -> String {
    if Url::parse(raw).is_ok() {
        // Url::parse ignores surrounding whitespace and control characters
        raw.trim_matches(|c: char| c <= ' ').to_string()
    } else {
        resolved.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn empty_without_base_is_invalid() {
        let err = resolve("", None).unwrap_err();
        assert_eq!(err.to_string(), "invalid url");
        assert_eq!(err.reason, url::ParseError::RelativeUrlWithoutBase);
    }

    #[test]
    fn empty_with_base_is_the_base() {
        let url = resolve("", Some(&base("http://google.com"))).unwrap();
        assert_eq!(url.as_str(), "http://google.com/");
    }

    #[test]
    fn empty_with_base_drops_fragment() {
        let url = resolve("", Some(&base("https://example.com/page?q=1#top"))).unwrap();
        assert_eq!(url.as_str(), "https://example.com/page?q=1");
    }

    #[test]
    fn absolute_is_normalized_only() {
        let url = resolve("HTTPS://Example.COM", Some(&base("http://other.org/"))).unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn absolute_is_reported_as_written() {
        let raw = "http://asdf1234.asdf1234";
        let url = resolve(raw, None).unwrap();
        assert_eq!(url.as_str(), "http://asdf1234.asdf1234/");
        assert_eq!(resolved_text(raw, &url), "http://asdf1234.asdf1234");
        assert_eq!(resolved_text(" HTTPS://Example.COM/a \n", &url), "HTTPS://Example.COM/a");
    }

    #[test]
    fn joined_references_report_the_joined_url() {
        let b = base("http://google.com");
        let url = resolve("", Some(&b)).unwrap();
        assert_eq!(resolved_text("", &url), "http://google.com/");

        let url = resolve("/docs", Some(&b)).unwrap();
        assert_eq!(resolved_text("/docs", &url), "http://google.com/docs");
    }

    #[test]
    fn relative_paths_merge_with_base() {
        let b = base("https://example.com/docs/guide/intro.html");
        assert_eq!(
            resolve("setup.html", Some(&b)).unwrap().as_str(),
            "https://example.com/docs/guide/setup.html"
        );
        assert_eq!(
            resolve("../../about", Some(&b)).unwrap().as_str(),
            "https://example.com/about"
        );
        assert_eq!(
            resolve("?page=2#list", Some(&b)).unwrap().as_str(),
            "https://example.com/docs/guide/intro.html?page=2#list"
        );
    }

    #[test]
    fn protocol_relative_takes_base_scheme() {
        let url = resolve("//cdn.example.com/app.js", Some(&base("https://example.com/"))).unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/app.js");
    }

    #[test]
    fn relative_without_base_is_invalid() {
        assert!(resolve("/docs", None).is_err());
        assert!(ResolutionContext::none().resolve("page.html").is_err());
    }

    #[test]
    fn unparsable_absolute_is_invalid() {
        let err = resolve("http://", Some(&base("https://example.com/"))).unwrap_err();
        assert_eq!(err.reason, url::ParseError::EmptyHost);
    }

    #[test]
    fn resolving_twice_is_identical() {
        let ctx = ResolutionContext::with_base(base("https://example.com/a/"));
        assert_eq!(ctx.resolve("b/../c").unwrap(), ctx.resolve("b/../c").unwrap());
    }

    #[test]
    fn refine_follows_usable_base_href() {
        let ctx = ResolutionContext::with_base(base("https://example.com/a/page.html"));
        let refined = ctx.refine("/assets/");
        assert_eq!(refined.base().unwrap().as_str(), "https://example.com/assets/");

        let unchanged = ResolutionContext::none().refine("relative/");
        assert_eq!(unchanged.base(), None);
    }
}

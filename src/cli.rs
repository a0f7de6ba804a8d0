// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Three subcommands, one per way of feeding the checker:
//   url   - check one URL
//   html  - check every link in a local HTML file
//   page  - download a web page and check every link in it
// =============================================================================

use clap::{Args, Parser, Subcommand};
use link_inspector::CheckerOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "link-inspector",
    version,
    about = "Finds the links in an HTML document and checks that each one is reachable",
    long_about = "link-inspector extracts links from HTML (anchors, images, media sources, \
                  citations, ...), resolves them against a base URL and checks them \
                  concurrently. Exit code 0 = no broken links, 1 = broken links, 2 = error."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a single URL
    ///
    /// Example: link-inspector url https://example.com
    Url {
        /// URL to check (relative URLs need --site)
        url: String,

        #[command(flatten)]
        check: CheckArgs,
    },

    /// Check every link in a local HTML file
    ///
    /// Example: link-inspector html index.html --site https://example.com/
    Html {
        /// Path to the HTML file
        file: PathBuf,

        #[command(flatten)]
        check: CheckArgs,
    },

    /// Download a web page and check every link in it
    ///
    /// Example: link-inspector page https://example.com/docs/
    Page {
        /// URL of the page; its final URL (after redirects) is the base
        url: String,

        #[command(flatten)]
        check: CheckArgs,
    },
}

// Flags shared by every subcommand
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Base URL for resolving relative links
    #[arg(long)]
    pub site: Option<String>,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Maximum number of requests in flight
    #[arg(long, default_value_t = 10)]
    pub concurrency: usize,

    /// Maximum redirects followed per link
    #[arg(long, default_value_t = 5)]
    pub max_redirects: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
}

impl CheckArgs {
    pub fn options(&self) -> CheckerOptions {
        CheckerOptions {
            site: self.site.clone(),
            max_concurrency: self.concurrency,
            max_redirects: self.max_redirects,
            timeout_secs: self.timeout,
            ..CheckerOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_command() {
        let cli = Cli::parse_from([
            "link-inspector",
            "page",
            "https://example.com",
            "--json",
            "--concurrency",
            "3",
        ]);
        let Commands::Page { url, check } = cli.command else {
            panic!("expected the page subcommand");
        };
        assert_eq!(url, "https://example.com");
        assert!(check.json);
        let options = check.options();
        assert_eq!(options.max_concurrency, 3);
        assert_eq!(options.max_redirects, 5);
        assert_eq!(options.site, None);
    }

    #[test]
    fn test_parse_url_with_site() {
        let cli = Cli::parse_from(["link-inspector", "url", "", "--site", "http://google.com"]);
        let Commands::Url { url, check } = cli.command else {
            panic!("expected the url subcommand");
        };
        assert_eq!(url, "");
        assert_eq!(check.options().site.as_deref(), Some("http://google.com"));
    }
}

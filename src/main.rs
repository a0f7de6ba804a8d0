// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (RUST_LOG controls the level, output goes to stderr)
// 2. Parse command-line arguments using clap
// 3. Start a checking session for the chosen input
// 4. Collect results and print them in document order
// 5. Exit with proper code (0 = success, 1 = broken links, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{CheckArgs, Cli, Commands};
use link_inspector::{LinkChecker, LinkResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so --json output on stdout stays machine-readable
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,link_inspector=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Err = the session itself failed (bad options, page not reachable, ...)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Url { url, check } => {
            let checker = checker(&check)?;
            report(checker.check_url(url), check.json).await
        }
        Commands::Html { file, check } => {
            let markup = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let checker = checker(&check)?;
            report(checker.check_html(markup), check.json).await
        }
        Commands::Page { url, check } => {
            let checker = checker(&check)?;
            report(checker.check_html_url(url), check.json).await
        }
    }
}

fn checker(check: &CheckArgs) -> Result<LinkChecker> {
    LinkChecker::new(check.options()).context("invalid checker options")
}

async fn report(session: link_inspector::Session, json: bool) -> Result<i32> {
    let results = session.collect().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_table(&results);
    }

    let broken_count = results.iter().filter(|r| r.broken()).count();
    Ok(if broken_count > 0 { 1 } else { 0 })
}

// Prints results as a human-readable table in the terminal
fn print_table(results: &[LinkResult]) {
    if results.is_empty() {
        println!("✅ No links found to check");
        return;
    }

    println!("{:<6} {:<60} {:<12} {:<30}", "#", "URL", "STATUS", "MESSAGE");
    println!("{}", "=".repeat(110));

    for result in results {
        let shown = result.resolved_url.as_deref().unwrap_or(&result.url);
        let url_display = if shown.chars().count() > 57 {
            format!("{}...", shown.chars().take(57).collect::<String>())
        } else {
            shown.to_string()
        };

        println!(
            "{:<6} {:<60} {:<12} {:<30}",
            result.index,
            url_display,
            format_status(result),
            format_message(result)
        );
    }

    println!();

    let broken_count = results.iter().filter(|r| r.broken()).count();
    let excluded_count = results.iter().filter(|r| r.excluded).count();
    println!("📊 Summary:");
    println!("   ✅ OK: {}", results.len() - broken_count - excluded_count);
    println!("   ❌ Broken: {}", broken_count);
    println!("   ⏭️  Excluded: {}", excluded_count);
    println!("   📋 Total: {}", results.len());
}

fn format_status(result: &LinkResult) -> String {
    if result.excluded {
        "⏭️  SKIPPED".to_string()
    } else if result.broken() {
        "❌ BROKEN".to_string()
    } else {
        "✅ OK".to_string()
    }
}

fn format_message(result: &LinkResult) -> String {
    match (&result.error, result.http_status) {
        (Some(error), _) => match error.code() {
            Some(code) => format!("{}: {}", code, error),
            None => format!("{} ({})", error, error.detail()),
        },
        (None, Some(status)) => format!("HTTP {}", status),
        (None, None) => String::new(),
    }
}

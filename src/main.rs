//! # article_mirror
//!
//! A one-shot batch converter that mirrors a JSON export of articles into
//! per-article directories: the raw record, a Markdown document with media
//! references rewritten to local copies, and the downloaded media itself.
//!
//! ## Usage
//!
//! ```sh
//! article_mirror -i articles.json -o ./archive
//! ```
//!
//! ## Architecture
//!
//! The application is a strictly sequential pipeline, one article at a time:
//! 1. **Materialize**: create the article's directory, write `article.json`
//! 2. **Discover**: collect cover, social, and body-embedded media URLs
//! 3. **Fetch**: download each asset once, skipping files already on disk
//! 4. **Render**: write `article.md` with a frontmatter header and the body's
//!    image references rewritten to local filenames
//!
//! Only an unparsable input aborts the run; every other failure is collected
//! into a structured run report and surfaced in the exit status.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod assets;
mod cli;
mod error;
mod fetch;
mod models;
mod outputs;
mod pipeline;
mod utils;

use cli::Cli;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("article_mirror starting up");

    let args = Cli::parse();
    debug!(?args.input, ?args.output_root, "Parsed CLI arguments");

    // Early check: ensure the output root is writable
    if let Err(e) = ensure_writable_dir(&args.output_root).await {
        error!(
            path = %args.output_root.display(),
            error = %e,
            "Output root is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let report = pipeline::run(&args.input, &args.output_root).await?;

    let elapsed = start_time.elapsed();
    info!(
        articles = report.articles.len(),
        skipped = report.skipped,
        failed = report.failed_articles(),
        downloaded = report.assets_downloaded(),
        already_present = report.assets_already_present(),
        assets_failed = report.assets_failed(),
        ?elapsed,
        "Execution complete"
    );

    let failed = report.failed_articles();
    if failed > 0 {
        for article in report.articles.iter().filter(|a| a.failed()) {
            error!(path = %article.path, error = %article.error.as_deref().unwrap_or(""), "Article failed");
        }
        return Err(format!("{failed} article(s) failed").into());
    }

    Ok(())
}

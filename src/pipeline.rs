//! The per-article mirroring pipeline.
//!
//! One pass over the export, strictly sequential: each article is
//! materialized, its media references discovered and fetched one at a time,
//! and its document rendered, before the next article is touched. Failures
//! are folded into the outcome types — a dead image URL or an unwritable
//! article directory never stops the run, only the initial input parse does.

use crate::assets;
use crate::error::{MirrorError, Result};
use crate::fetch::{self, FetchOutcome};
use crate::models::{
    ArticleRecord, ArticleReport, AssetReport, AssetStatus, RunReport,
};
use crate::outputs;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Run the full pipeline: read the export at `input_path` and mirror every
/// article with a usable `path` into a directory under `output_root`.
///
/// # Errors
///
/// Only an unreadable or unparsable input file is fatal. Everything
/// downstream is captured in the returned [`RunReport`].
#[instrument(level = "info", skip_all, fields(input = %input_path.display(), output_root = %output_root.display()))]
pub async fn run(input_path: &Path, output_root: &Path) -> Result<RunReport> {
    let raw = fs::read_to_string(input_path)
        .await
        .map_err(|e| MirrorError::filesystem(input_path, e))?;
    let records: Vec<ArticleRecord> =
        serde_json::from_str(&raw).map_err(|e| MirrorError::InputParse {
            path: input_path.display().to_string(),
            source: e,
        })?;
    info!(count = records.len(), "Loaded article records");

    let mut report = RunReport::default();
    for record in &records {
        match record.output_path() {
            Some(path) => {
                let outcome = process_article(record, path, output_root).await;
                report.articles.push(outcome);
            }
            None => {
                debug!("Skipping record without a path");
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

/// Mirror a single article: directory + raw record, then media, then the
/// rendered document.
///
/// A filesystem failure aborts the remaining steps for this article and is
/// recorded on the report; asset failures are recorded per asset and the
/// article carries on.
#[instrument(level = "info", skip_all, fields(%path))]
async fn process_article(record: &ArticleRecord, path: &str, output_root: &Path) -> ArticleReport {
    let mut article = ArticleReport::new(path);
    let dir = output_root.join(path);

    if let Err(e) = outputs::json::write_record(record, &dir).await {
        warn!(%path, error = %e, "Failed to materialize article directory");
        article.error = Some(e.to_string());
        return article;
    }

    // Local filenames are only mapped once the file is confirmed on disk, so
    // a failed download renders as its original remote URL instead of a
    // dangling local reference.
    let mut media: HashMap<String, String> = HashMap::new();
    for url in assets::extract_media_urls(record) {
        let filename = match assets::local_filename(&url) {
            Ok(filename) => filename,
            Err(e) => {
                warn!(%url, error = %e, "Skipping malformed media URL");
                article.assets.push(AssetReport {
                    url,
                    filename: None,
                    status: AssetStatus::Failed(e.to_string()),
                });
                continue;
            }
        };

        let status = match fetch::fetch_to_path(&url, &dir.join(&filename)).await {
            Ok(FetchOutcome::Downloaded) => {
                media.insert(url.clone(), filename.clone());
                AssetStatus::Downloaded
            }
            Ok(FetchOutcome::AlreadyPresent) => {
                media.insert(url.clone(), filename.clone());
                AssetStatus::AlreadyPresent
            }
            Err(e) => {
                warn!(%url, error = %e, "Failed to download media");
                AssetStatus::Failed(e.to_string())
            }
        };
        article.assets.push(AssetReport {
            url,
            filename: Some(filename),
            status,
        });
    }

    if let Some(doc) = outputs::markdown::render_document(record, &media) {
        match outputs::markdown::write_document(&doc, &dir).await {
            Ok(()) => article.document_written = true,
            Err(e) => {
                warn!(%path, error = %e, "Failed to write rendered document");
                article.error = Some(e.to_string());
            }
        }
    }

    info!(
        assets = article.assets.len(),
        document = article.document_written,
        "Mirrored article"
    );
    article
}

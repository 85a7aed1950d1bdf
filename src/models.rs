//! Data models for article records and run outcomes.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleRecord`]: One article from the JSON export, with its recognized
//!   metadata fields and any unrecognized fields preserved verbatim
//! - [`Tags`]: The two shapes the export uses for article tags
//! - Outcome types: [`AssetReport`], [`ArticleReport`], and [`RunReport`],
//!   the structured results the pipeline accumulates instead of relying on
//!   interleaved log output

use serde::{Deserialize, Serialize};

/// One article from the JSON export.
///
/// Every recognized field is optional; exports in the wild omit most of them.
/// A record without a non-empty `path` is deliberately skipped by the
/// pipeline — it has no output directory to land in.
///
/// Unrecognized fields are captured in `extra` so that the record written to
/// `article.json` is the full original record, not just the fields this tool
/// understands.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// Relative output directory for this article.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// The article title/headline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Markdown body, possibly containing embedded `![alt](url)` image tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_markdown: Option<String>,
    /// URL of the article's cover image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// URL of the article's social/preview image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_image: Option<String>,
    /// Topic tags, either a list or a comma-delimited string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    /// Publication date/time as it appears in the export.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Canonical URL of the published article.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    /// Any fields of the export this tool does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ArticleRecord {
    /// The output directory identifier, if this record has a usable one.
    ///
    /// Returns `None` for a missing or empty `path`, which marks the record
    /// as skipped rather than erroneous.
    pub fn output_path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }
}

/// Article tags as found in exports: either a proper list or a single
/// comma-delimited string. Serialized back out in whatever shape it arrived.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Tags {
    List(Vec<String>),
    Csv(String),
}

/// Outcome of handling a single media asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    /// Fetched over the network during this run.
    Downloaded,
    /// Destination file already existed; no request was made.
    AlreadyPresent,
    /// Malformed URL, non-success response, or transport failure.
    Failed(String),
}

/// Outcome of one media reference within one article.
#[derive(Debug, Clone)]
pub struct AssetReport {
    /// The media URL exactly as it appeared in the record.
    pub url: String,
    /// Derived local filename; `None` when the URL never yielded one.
    pub filename: Option<String>,
    pub status: AssetStatus,
}

/// Outcome of processing one article with a usable `path`.
#[derive(Debug, Clone)]
pub struct ArticleReport {
    /// The record's `path` (relative output directory).
    pub path: String,
    /// Per-asset outcomes, in discovery order.
    pub assets: Vec<AssetReport>,
    /// Whether `article.md` was written (requires a non-empty body).
    pub document_written: bool,
    /// A fatal-for-this-article error (directory creation or file write).
    pub error: Option<String>,
}

impl ArticleReport {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            assets: Vec::new(),
            document_written: false,
            error: None,
        }
    }

    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Aggregated outcome of a full run, one entry per processed article.
///
/// Console output and the process exit signal are both derived from this,
/// so the run's success/failure story is a pure function of accumulated
/// results.
#[derive(Debug, Default)]
pub struct RunReport {
    pub articles: Vec<ArticleReport>,
    /// Records skipped for lacking a `path`.
    pub skipped: usize,
}

impl RunReport {
    pub fn failed_articles(&self) -> usize {
        self.articles.iter().filter(|a| a.failed()).count()
    }

    fn count_assets(&self, pred: impl Fn(&AssetStatus) -> bool) -> usize {
        self.articles
            .iter()
            .flat_map(|a| a.assets.iter())
            .filter(|a| pred(&a.status))
            .count()
    }

    pub fn assets_downloaded(&self) -> usize {
        self.count_assets(|s| matches!(s, AssetStatus::Downloaded))
    }

    pub fn assets_already_present(&self) -> usize {
        self.count_assets(|s| matches!(s, AssetStatus::AlreadyPresent))
    }

    pub fn assets_failed(&self) -> usize {
        self.count_assets(|s| matches!(s, AssetStatus::Failed(_)))
    }
}

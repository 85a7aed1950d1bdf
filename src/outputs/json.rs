//! Per-article directory materialization and raw record output.
//!
//! Each processed article gets a directory under the output root named by its
//! `path`, created parents-and-all before any other write for that article.
//! The full original record lands in `article.json`, pretty-printed with the
//! standard 2-space indentation, so a mirrored directory is self-describing
//! even for fields this tool does not interpret.

use crate::error::{MirrorError, Result};
use crate::models::ArticleRecord;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Fixed filename for the raw record inside an article's directory.
pub const RECORD_FILENAME: &str = "article.json";

/// Create `dir` (idempotent) and write the record to `article.json` in it.
///
/// The record file is unconditionally overwritten; directory creation is a
/// no-op when the directory already exists. Filesystem failures propagate to
/// the caller, which treats them as fatal for this article only.
#[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
pub async fn write_record(record: &ArticleRecord, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| MirrorError::filesystem(dir, e))?;

    let json =
        serde_json::to_string_pretty(record).map_err(|e| MirrorError::RecordSerialize {
            path: dir.display().to_string(),
            source: e,
        })?;

    let record_path = dir.join(RECORD_FILENAME);
    fs::write(&record_path, json)
        .await
        .map_err(|e| MirrorError::filesystem(&record_path, e))?;

    debug!(path = %record_path.display(), "Wrote raw record");
    Ok(())
}

//! Markdown document rendering with localized media references.
//!
//! The rendered document is a frontmatter header followed directly by the
//! article body. Every header value is JSON-string-encoded, so embedded
//! quotes and newlines survive and downstream tools can parse each line as a
//! quoted scalar. Image URLs in the body are rewritten to their local
//! filenames where a local copy exists; unresolved references keep their
//! original URL.
//!
//! # Example Output
//!
//! ```text
//! ---
//! title: "My First Post"
//! date: "2024-03-01T09:00:00Z"
//! tags: ["rust","cli"]
//! cover_image: "cover.png"
//! path: "posts/my-first-post"
//! ---
//! Body text with ![a diagram](diagram.png) inline.
//! ```

use crate::assets::IMAGE_TOKEN_RE;
use crate::error::{MirrorError, Result};
use crate::models::ArticleRecord;
use std::collections::HashMap;
use std::fmt::Write;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Fixed filename for the rendered document inside an article's directory.
pub const DOCUMENT_FILENAME: &str = "article.md";

/// Render the frontmatter header plus rewritten body for an article.
///
/// Returns `None` when the record has no body — no document is produced at
/// all in that case, not even a bare header.
pub fn render_document(
    record: &ArticleRecord,
    media: &HashMap<String, String>,
) -> Option<String> {
    let body = record.body_markdown.as_deref().filter(|b| !b.is_empty())?;

    let mut doc = String::new();
    writeln!(doc, "---").unwrap();
    // The title line is always present, even for untitled records.
    writeln!(doc, "title: {}", quoted(record.title.as_deref().unwrap_or(""))).unwrap();
    if let Some(date) = non_empty(&record.published_at) {
        writeln!(doc, "date: {}", quoted(date)).unwrap();
    }
    if let Some(tags) = &record.tags {
        // Encoded as-is: a list stays a list, a comma string stays a string.
        writeln!(doc, "tags: {}", serde_json::to_string(tags).unwrap()).unwrap();
    }
    if let Some(cover) = non_empty(&record.cover_image) {
        writeln!(doc, "cover_image: {}", quoted(resolve(cover, media))).unwrap();
    }
    if let Some(social) = non_empty(&record.social_image) {
        writeln!(doc, "social_image: {}", quoted(resolve(social, media))).unwrap();
    }
    if let Some(canonical) = non_empty(&record.canonical_url) {
        writeln!(doc, "canonical_url: {}", quoted(canonical)).unwrap();
    }
    if let Some(path) = non_empty(&record.path) {
        writeln!(doc, "path: {}", quoted(path)).unwrap();
    }
    writeln!(doc, "---").unwrap();

    doc.push_str(&rewrite_body(body, media));
    Some(doc)
}

/// Write a rendered document to `article.md` in `dir`, overwriting any prior
/// version.
#[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
pub async fn write_document(doc: &str, dir: &Path) -> Result<()> {
    let doc_path = dir.join(DOCUMENT_FILENAME);
    fs::write(&doc_path, doc)
        .await
        .map_err(|e| MirrorError::filesystem(&doc_path, e))?;
    debug!(path = %doc_path.display(), "Wrote rendered document");
    Ok(())
}

/// Replace the URL inside each image token with its local filename, where one
/// is known.
///
/// The substitution is scoped to the matched token: alt text is carried over
/// untouched even when it happens to contain the URL or filename, and text
/// outside tokens is never altered.
fn rewrite_body(body: &str, media: &HashMap<String, String>) -> String {
    IMAGE_TOKEN_RE
        .replace_all(body, |caps: &regex::Captures| match media.get(&caps[2]) {
            Some(local) => format!("![{}]({})", &caps[1], local),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// JSON string-literal encoding for header scalars.
fn quoted(value: &str) -> String {
    serde_json::to_string(value).unwrap()
}

/// Present-and-non-empty filter for optional record fields.
fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

/// Header image fields fall back to the original URL when no local copy
/// exists.
fn resolve<'a>(url: &'a str, media: &'a HashMap<String, String>) -> &'a str {
    media.get(url).map(String::as_str).unwrap_or(url)
}

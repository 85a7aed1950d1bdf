//! Media reference discovery and local filename derivation.
//!
//! An article references media in up to three places: its `cover_image`
//! field, its `social_image` field, and `![alt](url)` image tokens embedded
//! in the Markdown body. Discovery order is fixed (cover, social, then body
//! tokens left-to-right) and duplicates are kept — they all resolve to the
//! same local filename, so the second occurrence finds the file already on
//! disk.

use crate::error::{MirrorError, Result};
use crate::models::ArticleRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

/// Markdown image token: `![alt](url)`.
///
/// Group 1 is the alt text (anything but `]`), group 2 the URL (anything but
/// `)`). Shared between discovery here and body rewriting in the renderer so
/// both sides agree on what counts as an image token.
pub static IMAGE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").unwrap());

/// Collect every media URL an article references, in discovery order.
///
/// Empty field values are filtered out; absence of fields just yields fewer
/// URLs. No deduplication happens here.
pub fn extract_media_urls(record: &ArticleRecord) -> Vec<String> {
    let mut urls = Vec::new();

    for field in [&record.cover_image, &record.social_image] {
        if let Some(url) = field.as_deref().filter(|u| !u.is_empty()) {
            urls.push(url.to_string());
        }
    }

    if let Some(body) = record.body_markdown.as_deref() {
        for caps in IMAGE_TOKEN_RE.captures_iter(body) {
            let url = &caps[2];
            if !url.is_empty() {
                urls.push(url.to_string());
            }
        }
    }

    debug!(count = urls.len(), "Extracted media URLs");
    urls
}

/// Derive the on-disk filename for a media URL: the final segment of the
/// URL's path component.
///
/// Fails with [`MirrorError::MalformedUrl`] when the URL does not parse or
/// its path has no final segment to use (e.g. a bare host or a trailing
/// slash).
pub fn local_filename(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| MirrorError::MalformedUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let basename = parsed
        .path()
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| MirrorError::MalformedUrl {
            url: url.to_string(),
            reason: "URL path has no filename segment".to_string(),
        })?;

    Ok(basename.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(
        cover: Option<&str>,
        social: Option<&str>,
        body: Option<&str>,
    ) -> ArticleRecord {
        ArticleRecord {
            path: Some("posts/test".into()),
            title: None,
            body_markdown: body.map(String::from),
            cover_image: cover.map(String::from),
            social_image: social.map(String::from),
            tags: None,
            published_at: None,
            canonical_url: None,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_discovery_order_cover_social_then_body() {
        let record = record_with(
            Some("https://c.dn/cover.png"),
            Some("https://c.dn/social.png"),
            Some("start ![one](https://c.dn/one.gif) mid ![two](https://c.dn/two.jpg) end"),
        );

        assert_eq!(
            extract_media_urls(&record),
            vec![
                "https://c.dn/cover.png",
                "https://c.dn/social.png",
                "https://c.dn/one.gif",
                "https://c.dn/two.jpg",
            ]
        );
    }

    #[test]
    fn test_empty_fields_are_filtered() {
        let record = record_with(Some(""), None, Some("no images here"));
        assert!(extract_media_urls(&record).is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let record = record_with(
            Some("https://c.dn/a.png"),
            None,
            Some("![inline](https://c.dn/a.png)"),
        );
        assert_eq!(extract_media_urls(&record).len(), 2);
    }

    #[test]
    fn test_no_fields_yields_no_urls() {
        let record = record_with(None, None, None);
        assert!(extract_media_urls(&record).is_empty());
    }

    #[test]
    fn test_local_filename_is_final_path_segment() {
        assert_eq!(
            local_filename("https://example.com/images/abc.png").unwrap(),
            "abc.png"
        );
        assert_eq!(
            local_filename("https://example.com/a.png?w=800").unwrap(),
            "a.png"
        );
    }

    #[test]
    fn test_local_filename_rejects_malformed_and_bare_urls() {
        assert!(matches!(
            local_filename("not a url"),
            Err(MirrorError::MalformedUrl { .. })
        ));
        assert!(matches!(
            local_filename("https://example.com/"),
            Err(MirrorError::MalformedUrl { .. })
        ));
        assert!(matches!(
            local_filename("https://example.com/dir/"),
            Err(MirrorError::MalformedUrl { .. })
        ));
    }
}

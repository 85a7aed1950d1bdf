//! Single-attempt media retrieval.
//!
//! One URL, one destination file, one GET. A destination that already exists
//! satisfies the fetch without any network traffic, which is what makes
//! re-runs cheap and duplicate references within an article harmless. There
//! are no retries and no resumption; a failed attempt removes whatever
//! partial file it created and reports why.

use crate::error::{MirrorError, Result};
use futures::StreamExt;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

/// How a fetch was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded,
    AlreadyPresent,
}

/// Ensure `dest` contains the content of `url`.
///
/// The existence probe looks only at the path, never at content; a stale or
/// truncated file from outside this tool counts as present.
///
/// # Errors
///
/// - [`MirrorError::FetchHttp`] on a non-success response status
/// - [`MirrorError::FetchTransport`] on DNS/connection/stream failures
/// - [`MirrorError::Filesystem`] when the destination cannot be written
///
/// On every failure path, a partially written destination file is removed
/// before the error is returned.
#[instrument(level = "debug", skip_all, fields(%url))]
pub async fn fetch_to_path(url: &str, dest: &Path) -> Result<FetchOutcome> {
    if fs::try_exists(dest)
        .await
        .map_err(|e| MirrorError::filesystem(dest, e))?
    {
        info!(path = %dest.display(), "Already downloaded");
        return Ok(FetchOutcome::AlreadyPresent);
    }

    info!(%url, path = %dest.display(), "Downloading");

    // reqwest picks plain or TLS transport from the URL scheme.
    let response = reqwest::get(url)
        .await
        .map_err(|e| MirrorError::FetchTransport {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        discard_partial(dest).await;
        return Err(MirrorError::FetchHttp {
            url: url.to_string(),
            status,
        });
    }

    let mut file = fs::File::create(dest)
        .await
        .map_err(|e| MirrorError::filesystem(dest, e))?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                drop(file);
                discard_partial(dest).await;
                return Err(MirrorError::FetchTransport {
                    url: url.to_string(),
                    source: e,
                });
            }
        };
        if let Err(e) = file.write_all(&bytes).await {
            drop(file);
            discard_partial(dest).await;
            return Err(MirrorError::filesystem(dest, e));
        }
    }

    if let Err(e) = file.flush().await {
        drop(file);
        discard_partial(dest).await;
        return Err(MirrorError::filesystem(dest, e));
    }

    debug!(path = %dest.display(), "Download complete");
    Ok(FetchOutcome::Downloaded)
}

/// Best-effort removal of a partial destination file.
async fn discard_partial(dest: &Path) {
    let _ = fs::remove_file(dest).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::path::PathBuf;

    /// Serve exactly one connection with a canned raw response, then close.
    fn serve_one(response: &'static [u8]) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response);
            }
        });
        format!("http://{addr}")
    }

    fn temp_file(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "article_mirror_fetch_{}_{}_{}",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    #[tokio::test]
    async fn test_existing_destination_is_a_noop() {
        let dest = temp_file("existing");
        fs::write(&dest, b"already here").await.unwrap();

        // The URL is unroutable; if the probe failed we would hit the network.
        let outcome = fetch_to_path("http://127.0.0.1:1/x.png", &dest)
            .await
            .unwrap();
        assert_eq!(outcome, FetchOutcome::AlreadyPresent);
        assert_eq!(fs::read(&dest).await.unwrap(), b"already here");

        fs::remove_file(&dest).await.unwrap();
    }

    #[tokio::test]
    async fn test_successful_download_writes_destination() {
        let base = serve_one(b"HTTP/1.1 200 OK\r\nContent-Length: 9\r\nConnection: close\r\n\r\nimg-bytes");
        let dest = temp_file("success");

        let outcome = fetch_to_path(&format!("{base}/a.png"), &dest).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Downloaded);
        assert_eq!(fs::read(&dest).await.unwrap(), b"img-bytes");

        fs::remove_file(&dest).await.unwrap();
    }

    #[tokio::test]
    async fn test_http_error_yields_fetch_http_and_no_file() {
        let base = serve_one(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let dest = temp_file("not_found");

        let err = fetch_to_path(&format!("{base}/gone.png"), &dest)
            .await
            .unwrap_err();
        match err {
            MirrorError::FetchHttp { status, .. } => assert_eq!(status.as_u16(), 404),
            other => panic!("expected FetchHttp, got {other:?}"),
        }
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_truncated_body_removes_partial_file() {
        // Content-Length promises more bytes than the connection delivers,
        // so the body stream fails mid-transfer after a partial write.
        let base = serve_one(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\npartial");
        let dest = temp_file("truncated");

        let err = fetch_to_path(&format!("{base}/cut.png"), &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, MirrorError::FetchTransport { .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_no_file_behind() {
        let dest = temp_file("refused");

        let err = fetch_to_path("http://127.0.0.1:1/x.png", &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, MirrorError::FetchTransport { .. }));
        assert!(!dest.exists());
    }
}

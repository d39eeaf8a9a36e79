use crate::media::{DownloadTarget, RequestError};
use anyhow::{Context, Result};
use futures::StreamExt;
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

const CHUNK_SIZE: usize = 8 * 1024;

/// Picks the file extension from the URL alone.
///
/// Anything mentioning `video` is saved as `mp4`. Otherwise the suffix after
/// the last dot of the final path segment is used, ignoring any query string
/// or fragment, and `bin` when there is none.
pub fn derive_extension(url: &str) -> String {
    if url.contains("video") {
        return "mp4".to_string();
    }

    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(&['?', '#'][..]).next().unwrap_or(url).to_string(),
    };

    let segment = path.rsplit('/').next().unwrap_or_default();
    match segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_string(),
        _ => "bin".to_string(),
    }
}

impl DownloadTarget {
    /// `{output}/{query}_{position}.{ext}`; `position` is 1-based.
    pub fn new(url: &str, output: &Path, query: &str, position: usize) -> Self {
        let extension = derive_extension(url);
        let path = output.join(format!("{}_{}.{}", query, position, extension));
        Self {
            url: url.to_string(),
            path,
            extension,
        }
    }
}

/// Streams `target.url` into `target.path`, returning the number of bytes
/// written. A partially written file is removed when the body fails midway.
pub async fn fetch_to_file(http: &reqwest::Client, target: &DownloadTarget) -> Result<u64> {
    debug!("Fetching {} as .{}", target.url, target.extension);

    let response = http
        .get(&target.url)
        .send()
        .await
        .map_err(|source| RequestError::Transport {
            url: target.url.clone(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(RequestError::from_status(&target.url, response).await.into());
    }

    let file = tokio::fs::File::create(&target.path)
        .await
        .with_context(|| format!("Failed to create {}", target.path.display()))?;
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);

    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;
    let outcome = async {
        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|source| RequestError::Transport {
                url: target.url.clone(),
                source,
            })?;
            writer.write_all(&bytes).await?;
            written += bytes.len() as u64;
        }
        writer.flush().await?;
        Ok::<(), anyhow::Error>(())
    }
    .await;

    if let Err(e) = outcome {
        drop(writer);
        let _ = tokio::fs::remove_file(&target.path).await;
        return Err(e.context(format!("Failed to write {}", target.path.display())));
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_extension_for_video_links() {
        assert_eq!(
            derive_extension("https://videos.pexels.com/video-files/123/hd_1920_1080_25fps.mp4"),
            "mp4"
        );
        // The substring wins even over a different suffix.
        assert_eq!(derive_extension("http://cdn/video/poster.png"), "mp4");
    }

    #[test]
    fn test_extension_from_path_suffix() {
        assert_eq!(derive_extension("http://x/img.jpg"), "jpg");
        assert_eq!(
            derive_extension(
                "https://images.pexels.com/photos/2014422/pexels-photo-2014422.jpeg?auto=compress&cs=tinysrgb&h=350"
            ),
            "jpeg"
        );
        assert_eq!(derive_extension("http://x/archive.tar.gz#frag"), "gz");
    }

    #[test]
    fn test_extension_without_suffix() {
        assert_eq!(derive_extension("http://x.example/img"), "bin");
        assert_eq!(derive_extension("http://x/dir/"), "bin");
        assert_eq!(derive_extension("not a url.png"), "png");
    }

    #[test]
    fn test_target_filename_is_one_based() {
        let target = DownloadTarget::new("http://x/img.jpg", Path::new("downloads"), "sunset", 1);
        assert_eq!(target.path, Path::new("downloads").join("sunset_1.jpg"));
        assert_eq!(target.extension, "jpg");

        let target = DownloadTarget::new(
            "https://videos.pexels.com/video-files/1/a.mp4",
            Path::new("out"),
            "sunset",
            2,
        );
        assert_eq!(target.path, Path::new("out").join("sunset_2.mp4"));
    }

    #[tokio::test]
    async fn test_fetch_to_file_streams_body() {
        let mock_server = MockServer::start().await;
        let body = vec![b'a'; 100_000];

        Mock::given(method("GET"))
            .and(path("/big.bin"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&mock_server)
            .await;

        let dir = tempdir().unwrap();
        let url = format!("{}/big.bin", mock_server.uri());
        let target = DownloadTarget::new(&url, dir.path(), "big", 1);

        let written = fetch_to_file(&reqwest::Client::new(), &target).await.unwrap();

        assert_eq!(written, body.len() as u64);
        assert_eq!(tokio::fs::read(&target.path).await.unwrap(), body);
    }

    #[tokio::test]
    async fn test_fetch_to_file_rejects_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/gone.jpg"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such photo"))
            .mount(&mock_server)
            .await;

        let dir = tempdir().unwrap();
        let url = format!("{}/gone.jpg", mock_server.uri());
        let target = DownloadTarget::new(&url, dir.path(), "gone", 1);

        let err = fetch_to_file(&reqwest::Client::new(), &target)
            .await
            .unwrap_err();

        match err.downcast_ref::<RequestError>() {
            Some(RequestError::Status { status, body, .. }) => {
                assert_eq!(*status, reqwest::StatusCode::NOT_FOUND);
                assert_eq!(body, "no such photo");
            }
            other => panic!("Expected status error, got {:?}", other),
        }
        assert!(!target.path.exists());
    }
}

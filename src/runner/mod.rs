mod download;
mod queries;

pub use queries::resolve_queries;

use download::fetch_to_file;

use crate::media::{
    DownloadTarget, MediaSource, MediaType, Orientation, SearchRequest, SearchResults,
};
use anyhow::{Context, Result};
use std::{path::PathBuf, time::Duration};
use tracing::{debug, error, info};

/// 200 requests per hour.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(18);

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub media_type: MediaType,
    pub quality: String,
    pub orientation: Orientation,
    /// Maximum number of items downloaded per query.
    pub number: usize,
    pub output: PathBuf,
    /// Pause after every attempted download.
    pub request_delay: Duration,
}

pub struct QueryRunner {
    source: Box<dyn MediaSource>,
    http: reqwest::Client,
    config: RunConfig,
}

impl QueryRunner {
    pub fn new(source: Box<dyn MediaSource>, config: RunConfig) -> Self {
        Self {
            source,
            http: reqwest::Client::new(),
            config,
        }
    }

    pub async fn run(&self, queries: &[String]) -> Result<()> {
        info!(
            "Processing {} queries against {}",
            queries.len(),
            self.source.name()
        );

        for query in queries {
            self.process_query(query).await?;
        }

        Ok(())
    }

    async fn process_query(&self, query: &str) -> Result<()> {
        info!("Searching: {}", query);

        let request = SearchRequest {
            query: query.to_string(),
            media_type: self.config.media_type,
            orientation: self.config.orientation,
            quality: self.config.quality.clone(),
            per_page: u32::try_from(self.config.number).unwrap_or(u32::MAX),
        };

        // The source has already logged the failure.
        let Ok(results) = self.source.search(&request).await else {
            return Ok(());
        };

        if results.is_empty() {
            info!("No results for: {}", query);
            return Ok(());
        }

        self.download_items(results, query).await.map(|_| ())
    }

    /// Downloads up to `number` items and returns how many were written.
    pub async fn download_items(&self, results: SearchResults, query: &str) -> Result<usize> {
        tokio::fs::create_dir_all(&self.config.output)
            .await
            .with_context(|| {
                format!(
                    "Failed to create output directory {}",
                    self.config.output.display()
                )
            })?;

        let mut downloaded = 0;
        for (index, url) in select_urls(results, &self.config.quality, self.config.number)
            .into_iter()
            .enumerate()
        {
            let Some(url) = url else {
                debug!(
                    "No {:?} variant for {} item {}",
                    self.config.quality,
                    query,
                    index + 1
                );
                continue;
            };

            let target = DownloadTarget::new(&url, &self.config.output, query, index + 1);
            match fetch_to_file(&self.http, &target).await {
                Ok(size) => {
                    downloaded += 1;
                    info!(
                        "Downloaded: {} ({})",
                        target.path.display(),
                        crate::utils::format_size(size)
                    );
                }
                Err(e) => error!("Download failed: {:#}", e),
            }

            tokio::time::sleep(self.config.request_delay).await;
        }

        Ok(downloaded)
    }
}

/// Truncates to `limit` and resolves one URL per item. Videos without a
/// variant labelled exactly `quality` yield `None`.
fn select_urls(results: SearchResults, quality: &str, limit: usize) -> Vec<Option<String>> {
    match results {
        SearchResults::Videos(videos) => videos
            .into_iter()
            .take(limit)
            .map(|files| {
                files
                    .into_iter()
                    .find(|file| file.quality == quality)
                    .map(|file| file.link)
            })
            .collect(),
        SearchResults::Images(urls) => urls.into_iter().take(limit).map(Some).collect(),
    }
}

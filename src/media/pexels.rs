use super::{
    error::RequestError,
    source::MediaSource,
    types::{
        MediaType, PhotoSearchResponse, SearchRequest, SearchResults, VideoFile,
        VideoSearchResponse,
    },
    user_agent::random_user_agent,
};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://api.pexels.com/v1";

pub struct PexelsClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl PexelsClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: &str) -> Self {
        // A missing key is only noticed when the provider rejects the request.
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, media_type: MediaType) -> String {
        match media_type {
            MediaType::Videos => format!("{}/videos/search", self.base_url),
            MediaType::Images => format!("{}/search", self.base_url),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        request: &SearchRequest,
    ) -> Result<T, RequestError> {
        let per_page = request.per_page.to_string();
        let endpoint = url::Url::parse_with_params(
            url,
            [
                ("query", request.query.as_str()),
                ("orientation", request.orientation.as_str()),
                ("per_page", per_page.as_str()),
            ],
        )
        .map_err(|source| RequestError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .http
            .get(endpoint)
            .header(AUTHORIZATION, &self.api_key)
            .header(USER_AGENT, random_user_agent())
            .send()
            .await
            .map_err(|source| RequestError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(RequestError::from_status(url, response).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| RequestError::Transport {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| RequestError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn fetch(&self, request: &SearchRequest) -> Result<SearchResults, RequestError> {
        let url = self.endpoint(request.media_type);
        debug!("Searching {} for {:?}", url, request.query);

        match request.media_type {
            MediaType::Videos => {
                let response: VideoSearchResponse = self.get_json(&url, request).await?;
                Ok(SearchResults::Videos(
                    response
                        .videos
                        .into_iter()
                        .map(|video| video.video_files.into_iter().map(VideoFile::from).collect())
                        .collect(),
                ))
            }
            MediaType::Images => {
                let response: PhotoSearchResponse = self.get_json(&url, request).await?;
                let urls = response
                    .photos
                    .iter()
                    .filter_map(|photo| {
                        let url = photo.url_for(&request.quality);
                        if url.is_none() {
                            debug!("Photo has neither {:?} nor original size", request.quality);
                        }
                        url.map(str::to_string)
                    })
                    .collect();
                Ok(SearchResults::Images(urls))
            }
        }
    }
}

#[async_trait]
impl MediaSource for PexelsClient {
    fn name(&self) -> &'static str {
        "pexels"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResults, RequestError> {
        self.fetch(request).await.inspect_err(|e| {
            error!("Request failed: {}", e);
        })
    }
}

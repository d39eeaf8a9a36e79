use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single HTTP exchange with the provider or a media host.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("invalid request url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status} {body}")]
    Status {
        url: String,
        status: StatusCode,
        /// Leading part of the response body, usually the provider's error message.
        body: String,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

const MAX_BODY_CHARS: usize = 512;

impl RequestError {
    /// Builds a `Status` error from a non-2xx response, keeping the start of
    /// its body.
    pub async fn from_status(url: &str, response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::Status {
            url: url.to_string(),
            status,
            body: body.trim().chars().take(MAX_BODY_CHARS).collect(),
        }
    }
}

use super::{
    error::RequestError,
    types::{SearchRequest, SearchResults},
};
use async_trait::async_trait;

#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Human-readable name of the provider
    fn name(&self) -> &'static str;

    /// Fetch the first page of results for a request
    async fn search(&self, request: &SearchRequest) -> Result<SearchResults, RequestError>;
}

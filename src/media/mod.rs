mod error;
mod pexels;
mod source;
mod types;
mod user_agent;

pub use error::RequestError;
pub use pexels::PexelsClient;
pub use source::MediaSource;
pub use types::{DownloadTarget, MediaType, Orientation, SearchRequest, SearchResults};

#[cfg(test)]
pub use types::VideoFile;

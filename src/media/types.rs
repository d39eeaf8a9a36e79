use clap::ValueEnum;
use serde::Deserialize;
use std::{collections::HashMap, fmt, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MediaType {
    Images,
    Videos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Square => "square",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single search call against the provider.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub media_type: MediaType,
    pub orientation: Orientation,
    /// Only used to pick the image size label; never sent to the provider.
    pub quality: String,
    pub per_page: u32,
}

/// One quality variant of a video result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    pub quality: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResults {
    /// Per result, every quality variant in provider order.
    Videos(Vec<Vec<VideoFile>>),
    /// Per result, the URL for the requested size (or the original).
    Images(Vec<String>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            SearchResults::Videos(videos) => videos.len(),
            SearchResults::Images(photos) => photos.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: String,
    pub path: PathBuf,
    pub extension: String,
}

// Wire shapes. Only the fields we read are declared.

#[derive(Debug, Deserialize)]
pub(crate) struct VideoSearchResponse {
    #[serde(default)]
    pub videos: Vec<Video>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Video {
    #[serde(default)]
    pub video_files: Vec<WireVideoFile>,
}

// Pexels sends `"quality": null` for some streaming variants.
#[derive(Debug, Deserialize)]
pub(crate) struct WireVideoFile {
    #[serde(default)]
    pub quality: Option<String>,
    pub link: String,
}

impl From<WireVideoFile> for VideoFile {
    fn from(file: WireVideoFile) -> Self {
        Self {
            quality: file.quality.unwrap_or_default(),
            link: file.link,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhotoSearchResponse {
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Photo {
    #[serde(default)]
    pub src: HashMap<String, String>,
}

impl Photo {
    /// URL for `quality`, falling back to the `original` size.
    pub fn url_for(&self, quality: &str) -> Option<&str> {
        self.src
            .get(quality)
            .or_else(|| self.src.get("original"))
            .map(String::as_str)
    }
}

use serde::{Deserialize, Serialize};

use super::bookmark::BookmarkType;

/// Normalized metadata for an image resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub title: String,
    pub author: String,
    pub width: u32,
    pub height: u32,
    #[serde(rename = "thumbURL")]
    pub thumb_url: String,
}

/// Normalized metadata for a video resource. `duration` is in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    pub author: String,
    pub width: u32,
    pub height: u32,
    pub duration: u32,
    #[serde(rename = "thumbURL")]
    pub thumb_url: String,
}

/// Connector output for either media kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MediaInfo {
    Image(ImageInfo),
    Video(VideoInfo),
}

impl MediaInfo {
    pub fn kind(&self) -> BookmarkType {
        match self {
            MediaInfo::Image(_) => BookmarkType::Image,
            MediaInfo::Video(_) => BookmarkType::Video,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tag::Tag;

/// Discriminator of the two bookmark variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookmarkType {
    Image,
    Video,
}

/// Type-specific part of a bookmark.
///
/// Serialized internally tagged (`"type": "Image" | "Video"`) and flattened
/// into the surrounding record, so a stored bookmark is one flat JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BookmarkMedia {
    Image { width: u32, height: u32 },
    Video { width: u32, height: u32, duration: u32 },
}

impl BookmarkMedia {
    pub fn kind(&self) -> BookmarkType {
        match self {
            BookmarkMedia::Image { .. } => BookmarkType::Image,
            BookmarkMedia::Video { .. } => BookmarkType::Video,
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            BookmarkMedia::Image { width, .. } | BookmarkMedia::Video { width, .. } => *width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            BookmarkMedia::Image { height, .. } | BookmarkMedia::Video { height, .. } => *height,
        }
    }

    /// Duration in seconds; images have none.
    pub fn duration(&self) -> Option<u32> {
        match self {
            BookmarkMedia::Image { .. } => None,
            BookmarkMedia::Video { duration, .. } => Some(*duration),
        }
    }

    /// Updates width and height in place without changing the variant.
    pub fn set_dimensions(&mut self, new_width: u32, new_height: u32) {
        match self {
            BookmarkMedia::Image { width, height } | BookmarkMedia::Video { width, height, .. } => {
                *width = new_width;
                *height = new_height;
            }
        }
    }

    /// Updates the duration of a video. Returns `false` for images.
    pub fn set_duration(&mut self, seconds: u32) -> bool {
        match self {
            BookmarkMedia::Image { .. } => false,
            BookmarkMedia::Video { duration, .. } => {
                *duration = seconds;
                true
            }
        }
    }
}

/// A saved reference to a remote image or video, with resolved tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    #[serde(rename = "thumbURL")]
    pub thumb_url: String,
    pub title: String,
    pub author_name: String,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(flatten)]
    pub media: BookmarkMedia,
}

impl Bookmark {
    pub fn bookmark_type(&self) -> BookmarkType {
        self.media.kind()
    }

    /// Returns `true` if one of the attached tags has the given id.
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags
            .as_ref()
            .map(|tags| tags.iter().any(|t| t.id == tag_id))
            .unwrap_or(false)
    }
}

/// Persisted shape of a bookmark: tags are stored as an ordered list of ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRecord {
    pub id: String,
    pub url: String,
    #[serde(rename = "thumbURL")]
    pub thumb_url: String,
    pub title: String,
    pub author_name: String,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub media: BookmarkMedia,
}

impl From<&Bookmark> for BookmarkRecord {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            id: bookmark.id.clone(),
            url: bookmark.url.clone(),
            thumb_url: bookmark.thumb_url.clone(),
            title: bookmark.title.clone(),
            author_name: bookmark.author_name.clone(),
            added_at: bookmark.added_at,
            tags: bookmark
                .tags
                .as_ref()
                .map(|tags| tags.iter().map(|t| t.id.clone()).collect()),
            media: bookmark.media.clone(),
        }
    }
}

impl BookmarkRecord {
    /// Builds the in-memory bookmark once the referenced tags are resolved.
    pub fn into_bookmark(self, tags: Option<Vec<Tag>>) -> Bookmark {
        Bookmark {
            id: self.id,
            url: self.url,
            thumb_url: self.thumb_url,
            title: self.title,
            author_name: self.author_name,
            added_at: self.added_at,
            tags,
            media: self.media,
        }
    }
}

/// Input for creating an image bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewImageBookmark {
    pub url: String,
    #[serde(rename = "thumbURL")]
    pub thumb_url: String,
    pub title: String,
    pub author_name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
}

/// Input for creating a video bookmark. `duration` is in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVideoBookmark {
    pub url: String,
    #[serde(rename = "thumbURL")]
    pub thumb_url: String,
    pub title: String,
    pub author_name: String,
    pub width: u32,
    pub height: u32,
    pub duration: u32,
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
}

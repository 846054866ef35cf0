//! Flickr connector for Mediamarks.
//!
//! Resolves `https://www.flickr.com/photos/<user>/<photo id>...` URLs into
//! [`ImageInfo`] using two REST calls: `flickr.photos.getInfo` for the title
//! and owner, then `flickr.photos.getSizes` for the thumbnail.

use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::media_connector::{
    lenient_u32, read_json, select_thumbnail, MediaConnectorTrait, ThumbnailCandidate,
};
use crate::types::errors::ConnectorError;
use crate::types::media::{ImageInfo, MediaInfo};
use crate::types::settings::FlickrSettings;

const PHOTO_URL_PATTERN: &str = r"^https?://www\.flickr\.com/photos/.*/([0-9]+)";

#[derive(Debug, Deserialize)]
struct InfoResponse {
    photo: PhotoInfo,
}

#[derive(Debug, Deserialize)]
struct PhotoInfo {
    title: Content,
    owner: Owner,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(rename = "_content")]
    content: String,
}

#[derive(Debug, Deserialize)]
struct Owner {
    #[serde(default)]
    username: String,
    #[serde(default)]
    realname: String,
}

#[derive(Debug, Deserialize)]
struct SizesResponse {
    sizes: SizeList,
}

#[derive(Debug, Deserialize)]
struct SizeList {
    size: Vec<Size>,
}

#[derive(Debug, Deserialize)]
struct Size {
    #[serde(deserialize_with = "lenient_u32")]
    width: u32,
    #[serde(deserialize_with = "lenient_u32")]
    height: u32,
    source: String,
}

/// Image metadata connector for Flickr.
pub struct FlickrConnector {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    min_thumb_width: u32,
    photo_url: Regex,
}

impl FlickrConnector {
    pub fn new(settings: &FlickrSettings) -> Self {
        Self::with_client(reqwest::Client::new(), settings)
    }

    pub fn with_client(client: reqwest::Client, settings: &FlickrSettings) -> Self {
        Self {
            client,
            api_base: settings.api_base.clone(),
            api_key: settings.api_key.clone(),
            min_thumb_width: settings.min_thumb_width,
            photo_url: Regex::new(PHOTO_URL_PATTERN).expect("photo URL pattern is valid"),
        }
    }

    /// Extracts the numeric photo id from a Flickr photo page URL.
    pub fn photo_id(&self, url: &str) -> Option<String> {
        self.photo_url
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Returns title, author, largest dimensions and thumbnail for the photo
    /// behind `url`. Rejects non-photo URLs without any request.
    pub async fn find_image_info_for_url(&self, url: &str) -> Result<ImageInfo, ConnectorError> {
        let photo_id = self
            .photo_id(url)
            .ok_or_else(|| ConnectorError::UnsupportedUrl(url.to_string()))?;
        debug!(photo_id = %photo_id, "fetching flickr photo info");

        let info: InfoResponse = self.call("flickr.photos.getInfo", &photo_id).await?;
        let sizes: SizesResponse = self.call("flickr.photos.getSizes", &photo_id).await?;

        let candidates: Vec<ThumbnailCandidate> = sizes
            .sizes
            .size
            .into_iter()
            .map(|s| ThumbnailCandidate {
                url: s.source,
                width: s.width,
                height: s.height,
            })
            .collect();
        let choice = select_thumbnail(&candidates, self.min_thumb_width).ok_or_else(|| {
            ConnectorError::MalformedResponse(format!("no sizes listed for photo {}", photo_id))
        })?;

        let owner = info.photo.owner;
        let author = if owner.realname.is_empty() {
            owner.username
        } else {
            owner.realname
        };

        Ok(ImageInfo {
            title: info.photo.title.content,
            author,
            width: choice.width,
            height: choice.height,
            thumb_url: choice.thumb_url,
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, photo_id: &str) -> Result<T, ConnectorError> {
        let response = self
            .client
            .get(&self.api_base)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("photo_id", photo_id),
                ("format", "json"),
                ("nojsoncallback", "1"),
                ("method", method),
            ])
            .send()
            .await?;

        let body: Value = read_json(response).await?;
        if body.get("stat").and_then(Value::as_str) == Some("fail") {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown failure");
            return Err(ConnectorError::Provider(format!("{}: {}", method, message)));
        }
        serde_json::from_value(body)
            .map_err(|e| ConnectorError::MalformedResponse(format!("{}: {}", method, e)))
    }
}

#[async_trait]
impl MediaConnectorTrait for FlickrConnector {
    fn provider(&self) -> &'static str {
        "flickr"
    }

    async fn find_media_info(&self, url: &str) -> Result<MediaInfo, ConnectorError> {
        self.find_image_info_for_url(url).await.map(MediaInfo::Image)
    }
}

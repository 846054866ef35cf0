//! Vimeo connector for Mediamarks.
//!
//! Resolves `https://vimeo.com/<video id>` URLs into [`VideoInfo`]. Requests
//! are authorized with a client-credentials token obtained once per connector
//! and reused for its lifetime.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::media_connector::{lenient_u32, read_json, MediaConnectorTrait};
use crate::types::errors::ConnectorError;
use crate::types::media::{MediaInfo, VideoInfo};
use crate::types::settings::VimeoSettings;

const VIDEO_URL_PATTERN: &str = r"^https?://vimeo\.com/([0-9]+)$";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct VideoResponse {
    name: String,
    #[serde(deserialize_with = "lenient_u32")]
    duration: u32,
    #[serde(deserialize_with = "lenient_u32")]
    width: u32,
    #[serde(deserialize_with = "lenient_u32")]
    height: u32,
    user: VideoUser,
    pictures: Pictures,
}

#[derive(Debug, Deserialize)]
struct VideoUser {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Pictures {
    sizes: Vec<Picture>,
}

#[derive(Debug, Deserialize)]
struct Picture {
    link: String,
}

/// Video metadata connector for Vimeo.
pub struct VimeoConnector {
    client: reqwest::Client,
    api_base: String,
    client_id: String,
    client_secret: String,
    access_token: OnceCell<String>,
    video_url: Regex,
}

impl VimeoConnector {
    pub fn new(settings: &VimeoSettings) -> Self {
        Self::with_client(reqwest::Client::new(), settings)
    }

    pub fn with_client(client: reqwest::Client, settings: &VimeoSettings) -> Self {
        Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            access_token: OnceCell::new(),
            video_url: Regex::new(VIDEO_URL_PATTERN).expect("video URL pattern is valid"),
        }
    }

    /// Extracts the numeric video id from a Vimeo video page URL.
    pub fn video_id(&self, url: &str) -> Option<String> {
        self.video_url
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Returns the cached access token, requesting one on first use.
    /// A failed request leaves the cache empty so the next call retries.
    pub async fn access_token(&self) -> Result<&str, ConnectorError> {
        let token = self
            .access_token
            .get_or_try_init(|| self.request_access_token())
            .await?;
        Ok(token.as_str())
    }

    async fn request_access_token(&self) -> Result<String, ConnectorError> {
        let response = self
            .client
            .post(format!("{}/oauth/authorize/client", self.api_base))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        let token: TokenResponse = read_json(response).await?;
        info!("obtained vimeo access token");
        Ok(token.access_token)
    }

    /// Returns title, author, dimensions, duration and thumbnail for the video
    /// behind `url`. Rejects non-video URLs without any request.
    pub async fn find_video_info_for_url(&self, url: &str) -> Result<VideoInfo, ConnectorError> {
        let video_id = self
            .video_id(url)
            .ok_or_else(|| ConnectorError::UnsupportedUrl(url.to_string()))?;
        let token = self.access_token().await?;
        debug!(video_id = %video_id, "fetching vimeo video info");

        let response = self
            .client
            .get(format!("{}/videos/{}", self.api_base, video_id))
            .bearer_auth(token)
            .send()
            .await?;
        let video: VideoResponse = read_json(response).await?;

        let thumb_url = video
            .pictures
            .sizes
            .last()
            .map(|picture| picture.link.clone())
            .ok_or_else(|| {
                ConnectorError::MalformedResponse(format!("no pictures listed for video {}", video_id))
            })?;

        Ok(VideoInfo {
            title: video.name,
            author: video.user.name,
            width: video.width,
            height: video.height,
            duration: video.duration,
            thumb_url,
        })
    }
}

#[async_trait]
impl MediaConnectorTrait for VimeoConnector {
    fn provider(&self) -> &'static str {
        "vimeo"
    }

    async fn find_media_info(&self, url: &str) -> Result<MediaInfo, ConnectorError> {
        self.find_video_info_for_url(url).await.map(MediaInfo::Video)
    }
}

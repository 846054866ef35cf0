//! Shared plumbing for media metadata connectors.
//!
//! A connector turns a provider URL into a normalized [`MediaInfo`]. This
//! module holds the trait they implement, the JSON response reader they share,
//! and the thumbnail selection policy.

use async_trait::async_trait;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use tracing::trace;

use crate::types::errors::ConnectorError;
use crate::types::media::MediaInfo;

/// Trait implemented by every media metadata connector.
#[async_trait]
pub trait MediaConnectorTrait: Send + Sync {
    /// Short provider name, also the keyword used to route URLs.
    fn provider(&self) -> &'static str;

    /// Whether a URL looks like it belongs to this provider. A routed URL can
    /// still be rejected as unsupported by the connector itself.
    fn handles(&self, url: &str) -> bool {
        url.contains(self.provider())
    }

    async fn find_media_info(&self, url: &str) -> Result<MediaInfo, ConnectorError>;
}

/// Reads a provider response body as JSON.
///
/// Non-success statuses become [`ConnectorError::Provider`], undecodable
/// bodies [`ConnectorError::MalformedResponse`].
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ConnectorError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ConnectorError::Provider(format!(
            "request to {} failed with status {}",
            response.url(),
            status
        )));
    }
    let text = response.text().await?;
    trace!(response = %text, "provider response");
    serde_json::from_str(&text).map_err(|e| ConnectorError::MalformedResponse(e.to_string()))
}

/// One size a provider offers for an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailCandidate {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Outcome of [`select_thumbnail`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailChoice {
    pub thumb_url: String,
    pub width: u32,
    pub height: u32,
}

/// Picks the thumbnail among sizes listed smallest first.
///
/// The URL is the first size at least `min_width` wide, or the last size when
/// none is. The reported dimensions are always those of the last (largest)
/// size, even when a smaller one supplied the URL.
pub fn select_thumbnail(sizes: &[ThumbnailCandidate], min_width: u32) -> Option<ThumbnailChoice> {
    let largest = sizes.last()?;
    let thumb = sizes
        .iter()
        .find(|size| size.width >= min_width)
        .unwrap_or(largest);
    Some(ThumbnailChoice {
        thumb_url: thumb.url.clone(),
        width: largest.width,
        height: largest.height,
    })
}

/// Accepts a dimension encoded as a JSON number or a numeric string.
pub(crate) fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        Float(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => u32::try_from(n).map_err(de::Error::custom),
        NumberOrString::Float(f) if f >= 0.0 && f <= u32::MAX as f64 => Ok(f as u32),
        NumberOrString::Float(f) => Err(de::Error::custom(format!("dimension out of range: {}", f))),
        NumberOrString::Text(s) => s.trim().parse::<u32>().map_err(de::Error::custom),
    }
}

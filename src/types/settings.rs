use serde::{Deserialize, Serialize};

/// Top-level application settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppSettings {
    pub storage: StorageSettings,
    pub vimeo: VimeoSettings,
    pub flickr: FlickrSettings,
}

/// Which key-value backend holds bookmarks and tags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

/// Storage settings. An empty `path` means `<data dir>/mediamarks.db`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: String::new(),
        }
    }
}

/// Vimeo API access.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VimeoSettings {
    pub api_base: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Default for VimeoSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.vimeo.com".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
        }
    }
}

/// Flickr API access and thumbnail policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlickrSettings {
    pub api_base: String,
    pub api_key: String,
    /// Smallest width, in pixels, accepted for the thumbnail.
    pub min_thumb_width: u32,
}

impl Default for FlickrSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.flickr.com/services/rest/".to_string(),
            api_key: String::new(),
            min_thumb_width: 500,
        }
    }
}

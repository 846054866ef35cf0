//! App Core for Mediamarks.
//!
//! `App` is the context object handed to every caller: it owns the tag and
//! bookmark repositories bound to one storage adapter, plus the media
//! connectors used to enrich URLs. There is no global instance; tests build
//! as many isolated `App`s as they need.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use crate::managers::tag_manager::{TagManager, TagManagerTrait};
use crate::services::flickr_connector::FlickrConnector;
use crate::services::media_connector::MediaConnectorTrait;
use crate::services::vimeo_connector::VimeoConnector;
use crate::storage::{InMemoryStorage, KeyValueStorage, SqliteStorage};
use crate::types::bookmark::{Bookmark, NewImageBookmark, NewVideoBookmark};
use crate::types::errors::{AppError, ConnectorError};
use crate::types::media::MediaInfo;
use crate::types::settings::{AppSettings, StorageBackend};
use crate::types::tag::Tag;

/// Default database file name inside the data directory.
pub const DATABASE_FILE: &str = "mediamarks.db";

/// The repository pair bound to one storage adapter.
struct Repositories {
    storage: Arc<dyn KeyValueStorage>,
    tags: Arc<TagManager>,
    bookmarks: Arc<BookmarkManager>,
}

impl Repositories {
    fn bind(storage: Arc<dyn KeyValueStorage>) -> Self {
        let tags = Arc::new(TagManager::new(storage.clone()));
        let bookmarks = Arc::new(BookmarkManager::new(storage.clone(), tags.clone()));
        Self {
            storage,
            tags,
            bookmarks,
        }
    }
}

/// Central application context.
pub struct App {
    settings: AppSettings,
    repositories: Repositories,
    connectors: Vec<Arc<dyn MediaConnectorTrait>>,
}

impl App {
    /// Binds both repositories to `storage` and builds the connectors from
    /// `settings`.
    pub fn new(storage: Arc<dyn KeyValueStorage>, settings: AppSettings) -> Self {
        let connectors: Vec<Arc<dyn MediaConnectorTrait>> = vec![
            Arc::new(VimeoConnector::new(&settings.vimeo)),
            Arc::new(FlickrConnector::new(&settings.flickr)),
        ];
        Self {
            repositories: Repositories::bind(storage),
            settings,
            connectors,
        }
    }

    /// An app over a fresh in-memory store with default settings.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStorage::new()), AppSettings::default())
    }

    /// Opens the storage backend selected by `settings`. An empty SQLite
    /// path means `<data_dir>/mediamarks.db`.
    pub fn open(settings: AppSettings, data_dir: &Path) -> Result<Self, AppError> {
        let storage: Arc<dyn KeyValueStorage> = match settings.storage.backend {
            StorageBackend::Memory => Arc::new(InMemoryStorage::new()),
            StorageBackend::Sqlite => {
                let path = if settings.storage.path.is_empty() {
                    data_dir.join(DATABASE_FILE)
                } else {
                    settings.storage.path.clone().into()
                };
                info!(path = %path.display(), "opening bookmark database");
                Arc::new(SqliteStorage::open(&path)?)
            }
        };
        Ok(Self::new(storage, settings))
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// The storage adapter both repositories are bound to.
    pub fn storage(&self) -> Arc<dyn KeyValueStorage> {
        self.repositories.storage.clone()
    }

    pub fn tag_manager(&self) -> Arc<dyn TagManagerTrait> {
        self.repositories.tags.clone()
    }

    pub fn bookmark_manager(&self) -> Arc<dyn BookmarkManagerTrait> {
        self.repositories.bookmarks.clone()
    }

    /// Replaces both repositories with a pair bound to `storage`. Handles
    /// obtained earlier keep working against the previous storage.
    pub fn rebind(&mut self, storage: Arc<dyn KeyValueStorage>) {
        self.repositories = Repositories::bind(storage);
        debug!("rebound repositories to new storage");
    }

    /// Looks up media metadata for `url` with the connector whose provider
    /// name appears in it. Unrouted URLs fail without any request.
    pub async fn find_media_info(&self, url: &str) -> Result<MediaInfo, ConnectorError> {
        let connector = self
            .connectors
            .iter()
            .find(|c| c.handles(url))
            .ok_or_else(|| ConnectorError::UnsupportedUrl(url.to_string()))?;
        debug!(provider = connector.provider(), url = %url, "routing media lookup");
        connector.find_media_info(url).await
    }

    /// Enriches `url` and stores the matching image or video bookmark.
    pub async fn new_bookmark_from_url(
        &self,
        url: &str,
        tags: Option<Vec<Tag>>,
    ) -> Result<Bookmark, AppError> {
        let bookmarks = self.bookmark_manager();
        let bookmark = match self.find_media_info(url).await? {
            MediaInfo::Image(info) => {
                bookmarks
                    .new_image_bookmark(NewImageBookmark {
                        url: url.to_string(),
                        thumb_url: info.thumb_url,
                        title: info.title,
                        author_name: info.author,
                        width: info.width,
                        height: info.height,
                        tags,
                    })
                    .await?
            }
            MediaInfo::Video(info) => {
                bookmarks
                    .new_video_bookmark(NewVideoBookmark {
                        url: url.to_string(),
                        thumb_url: info.thumb_url,
                        title: info.title,
                        author_name: info.author,
                        width: info.width,
                        height: info.height,
                        duration: info.duration,
                        tags,
                    })
                    .await?
            }
        };
        Ok(bookmark)
    }
}

//! Bookmark Manager for Mediamarks.
//!
//! Implements `BookmarkManagerTrait`: creation of image/video bookmarks,
//! CRUD, and paginated/tag-filtered queries. Each bookmark record is stored
//! under its id with tags reduced to their ids; the `"bookmarks"` index lists
//! bookmark ids in creation order.
//!
//! Tag ids are resolved through an injected [`TagResolver`], normally the tag
//! manager bound to the same storage by [`crate::app::App`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::try_join_all;
use tracing::debug;
use uuid::Uuid;

use super::tag_manager::TagManagerTrait;
use super::{page, read_record, write_record, IdIndex, DEFAULT_QUERY_LIMIT};
use crate::storage::KeyValueStorage;
use crate::types::bookmark::{
    Bookmark, BookmarkMedia, BookmarkRecord, NewImageBookmark, NewVideoBookmark,
};
use crate::types::errors::RepositoryError;
use crate::types::tag::Tag;

/// Storage key of the bookmark id index.
pub const BOOKMARKS_KEY: &str = "bookmarks";

/// Narrow lookup used to turn stored tag ids back into tags.
#[async_trait]
pub trait TagResolver: Send + Sync {
    async fn resolve_tag(&self, id: &str) -> Result<Tag, RepositoryError>;
}

#[async_trait]
impl<T: TagManagerTrait + ?Sized> TagResolver for T {
    async fn resolve_tag(&self, id: &str) -> Result<Tag, RepositoryError> {
        self.get_by_id(id).await
    }
}

/// Trait defining bookmark management operations.
#[async_trait]
pub trait BookmarkManagerTrait: Send + Sync {
    /// Starts a query over all bookmarks (offset 0, limit 10, no tag filter).
    fn new_query_builder(&self) -> BookmarkQueryBuilder<'_>;
    async fn new_image_bookmark(&self, data: NewImageBookmark) -> Result<Bookmark, RepositoryError>;
    async fn new_video_bookmark(&self, data: NewVideoBookmark) -> Result<Bookmark, RepositoryError>;
    /// Persists a bookmark. For an id already stored, the stored `added_at` is
    /// kept and a change of media type is rejected as a malformed record.
    async fn save(&self, bookmark: &Bookmark) -> Result<Bookmark, RepositoryError>;
    /// Loads a bookmark and resolves all of its tags; any dangling tag fails the call.
    async fn get_by_id(&self, id: &str) -> Result<Bookmark, RepositoryError>;
    /// Removes the record and its index entry. Deleting twice is a no-op.
    async fn delete(&self, bookmark: &Bookmark) -> Result<(), RepositoryError>;
    /// All bookmark ids in creation order.
    async fn bookmark_ids(&self) -> Result<Vec<String>, RepositoryError>;
}

/// Bookmark manager backed by a key-value storage adapter.
pub struct BookmarkManager {
    storage: Arc<dyn KeyValueStorage>,
    tags: Arc<dyn TagResolver>,
}

impl BookmarkManager {
    pub fn new(storage: Arc<dyn KeyValueStorage>, tags: Arc<dyn TagResolver>) -> Self {
        Self { storage, tags }
    }

    fn index(&self) -> IdIndex<'_> {
        IdIndex::new(self.storage.as_ref(), BOOKMARKS_KEY)
    }

    /// Writes the record, then indexes the id if the index lacks it.
    fn persist(&self, bookmark: &Bookmark) -> Result<(), RepositoryError> {
        let record = BookmarkRecord::from(bookmark);
        write_record(self.storage.as_ref(), &bookmark.id, &record)?;
        self.index().append_if_absent(&bookmark.id)?;
        Ok(())
    }

    /// The record currently stored under `id`, if any.
    fn stored(&self, id: &str) -> Result<Option<BookmarkRecord>, RepositoryError> {
        match read_record(self.storage.as_ref(), "Bookmark", id) {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn create(&self, bookmark: Bookmark) -> Result<Bookmark, RepositoryError> {
        self.persist(&bookmark)?;
        debug!(
            bookmark_id = %bookmark.id,
            kind = ?bookmark.bookmark_type(),
            "created bookmark"
        );
        Ok(bookmark)
    }
}

#[async_trait]
impl BookmarkManagerTrait for BookmarkManager {
    fn new_query_builder(&self) -> BookmarkQueryBuilder<'_> {
        BookmarkQueryBuilder::new(self)
    }

    async fn new_image_bookmark(&self, data: NewImageBookmark) -> Result<Bookmark, RepositoryError> {
        self.create(Bookmark {
            id: Uuid::new_v4().to_string(),
            url: data.url,
            thumb_url: data.thumb_url,
            title: data.title,
            author_name: data.author_name,
            added_at: Utc::now(),
            tags: data.tags,
            media: BookmarkMedia::Image {
                width: data.width,
                height: data.height,
            },
        })
    }

    async fn new_video_bookmark(&self, data: NewVideoBookmark) -> Result<Bookmark, RepositoryError> {
        self.create(Bookmark {
            id: Uuid::new_v4().to_string(),
            url: data.url,
            thumb_url: data.thumb_url,
            title: data.title,
            author_name: data.author_name,
            added_at: Utc::now(),
            tags: data.tags,
            media: BookmarkMedia::Video {
                width: data.width,
                height: data.height,
                duration: data.duration,
            },
        })
    }

    async fn save(&self, bookmark: &Bookmark) -> Result<Bookmark, RepositoryError> {
        let mut saved = bookmark.clone();
        if let Some(stored) = self.stored(&bookmark.id)? {
            if stored.media.kind() != bookmark.media.kind() {
                return Err(RepositoryError::MalformedRecord(format!(
                    "Bookmark {}: type cannot change from {:?} to {:?}",
                    bookmark.id,
                    stored.media.kind(),
                    bookmark.media.kind()
                )));
            }
            saved.added_at = stored.added_at;
        }
        self.persist(&saved)?;
        debug!(bookmark_id = %saved.id, "saved bookmark");
        Ok(saved)
    }

    async fn get_by_id(&self, id: &str) -> Result<Bookmark, RepositoryError> {
        let record: BookmarkRecord = read_record(self.storage.as_ref(), "Bookmark", id)?;
        let tags = match &record.tags {
            Some(tag_ids) => {
                let lookups = tag_ids.iter().map(|tag_id| self.tags.resolve_tag(tag_id));
                Some(try_join_all(lookups).await?)
            }
            None => None,
        };
        Ok(record.into_bookmark(tags))
    }

    async fn delete(&self, bookmark: &Bookmark) -> Result<(), RepositoryError> {
        self.storage.remove_item(&bookmark.id)?;
        self.index().remove(&bookmark.id)?;
        debug!(bookmark_id = %bookmark.id, "deleted bookmark");
        Ok(())
    }

    async fn bookmark_ids(&self) -> Result<Vec<String>, RepositoryError> {
        self.index().load()
    }
}

/// Fluent query over bookmarks. Nothing is read until `query` or `count` runs.
///
/// Without a tag filter only the requested page is resolved. With one, every
/// indexed bookmark is resolved first; results keep creation order.
pub struct BookmarkQueryBuilder<'a> {
    manager: &'a dyn BookmarkManagerTrait,
    offset: usize,
    limit: usize,
    tag_id: Option<String>,
}

impl<'a> BookmarkQueryBuilder<'a> {
    pub fn new(manager: &'a dyn BookmarkManagerTrait) -> Self {
        Self {
            manager,
            offset: 0,
            limit: DEFAULT_QUERY_LIMIT,
            tag_id: None,
        }
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Keeps only bookmarks carrying `tag` (matched by id).
    pub fn with_tag(self, tag: &Tag) -> Self {
        self.with_tag_id(tag.id.clone())
    }

    pub fn with_tag_id(mut self, tag_id: impl Into<String>) -> Self {
        self.tag_id = Some(tag_id.into());
        self
    }

    async fn resolve(&self, ids: &[String]) -> Result<Vec<Bookmark>, RepositoryError> {
        try_join_all(ids.iter().map(|id| self.manager.get_by_id(id))).await
    }

    async fn tagged(&self, tag_id: &str) -> Result<Vec<Bookmark>, RepositoryError> {
        let ids = self.manager.bookmark_ids().await?;
        let bookmarks = self.resolve(&ids).await?;
        Ok(bookmarks.into_iter().filter(|b| b.has_tag(tag_id)).collect())
    }

    /// Returns the requested window of bookmarks in creation order.
    pub async fn query(&self) -> Result<Vec<Bookmark>, RepositoryError> {
        match self.tag_id.as_deref() {
            Some(tag_id) => Ok(page(self.tagged(tag_id).await?, self.offset, self.limit)),
            None => {
                let ids = page(self.manager.bookmark_ids().await?, self.offset, self.limit);
                self.resolve(&ids).await
            }
        }
    }

    /// Counts every matching bookmark, ignoring offset and limit.
    pub async fn count(&self) -> Result<usize, RepositoryError> {
        match self.tag_id.as_deref() {
            Some(tag_id) => Ok(self.tagged(tag_id).await?.len()),
            None => Ok(self.manager.bookmark_ids().await?.len()),
        }
    }
}

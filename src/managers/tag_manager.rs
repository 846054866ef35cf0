//! Tag Manager for Mediamarks.
//!
//! Implements `TagManagerTrait`: CRUD and paginated/label-filtered queries
//! over tags, each stored under its own id and listed by the `"tags"` index.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::debug;
use uuid::Uuid;

use super::{page, read_record, write_record, IdIndex, DEFAULT_QUERY_LIMIT};
use crate::storage::KeyValueStorage;
use crate::types::errors::RepositoryError;
use crate::types::tag::Tag;

/// Storage key of the tag id index.
pub const TAGS_KEY: &str = "tags";

/// Trait defining tag management operations.
#[async_trait]
pub trait TagManagerTrait: Send + Sync {
    /// Starts a query over all tags (offset 0, limit 10, no label filter).
    fn new_query_builder(&self) -> TagQueryBuilder<'_>;
    /// Creates and persists a tag with a fresh id.
    async fn new_tag(&self, label: &str) -> Result<Tag, RepositoryError>;
    /// Overwrites the stored tag, indexing its id if the index lacks it.
    async fn save(&self, tag: &Tag) -> Result<Tag, RepositoryError>;
    async fn get_by_id(&self, id: &str) -> Result<Tag, RepositoryError>;
    /// Removes the tag record and its index entry. Deleting twice is a no-op.
    async fn delete(&self, tag: &Tag) -> Result<(), RepositoryError>;
    /// All tag ids in insertion order.
    async fn tag_ids(&self) -> Result<Vec<String>, RepositoryError>;

    /// Returns the first tag labelled exactly `label`, creating it if none exists.
    async fn find_or_create(&self, label: &str) -> Result<Tag, RepositoryError> {
        let existing = self.new_query_builder().label(label).limit(1).query().await?;
        match existing.into_iter().next() {
            Some(tag) => Ok(tag),
            None => self.new_tag(label).await,
        }
    }
}

/// Tag manager backed by a key-value storage adapter.
pub struct TagManager {
    storage: Arc<dyn KeyValueStorage>,
}

impl TagManager {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    fn index(&self) -> IdIndex<'_> {
        IdIndex::new(self.storage.as_ref(), TAGS_KEY)
    }

    fn persist(&self, tag: &Tag) -> Result<(), RepositoryError> {
        write_record(self.storage.as_ref(), &tag.id, tag)?;
        self.index().append_if_absent(&tag.id)?;
        Ok(())
    }
}

#[async_trait]
impl TagManagerTrait for TagManager {
    fn new_query_builder(&self) -> TagQueryBuilder<'_> {
        TagQueryBuilder::new(self)
    }

    async fn new_tag(&self, label: &str) -> Result<Tag, RepositoryError> {
        let tag = Tag {
            id: Uuid::new_v4().to_string(),
            label: label.to_string(),
        };
        self.persist(&tag)?;
        debug!(tag_id = %tag.id, "created tag");
        Ok(tag)
    }

    async fn save(&self, tag: &Tag) -> Result<Tag, RepositoryError> {
        self.persist(tag)?;
        debug!(tag_id = %tag.id, "saved tag");
        Ok(tag.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Tag, RepositoryError> {
        read_record(self.storage.as_ref(), "Tag", id)
    }

    async fn delete(&self, tag: &Tag) -> Result<(), RepositoryError> {
        self.storage.remove_item(&tag.id)?;
        self.index().remove(&tag.id)?;
        debug!(tag_id = %tag.id, "deleted tag");
        Ok(())
    }

    async fn tag_ids(&self) -> Result<Vec<String>, RepositoryError> {
        self.index().load()
    }
}

/// Fluent query over tags. Nothing is read until `query` or `count` runs.
///
/// With a label filter every indexed tag is resolved before filtering, so the
/// cost grows with the index size regardless of the window.
pub struct TagQueryBuilder<'a> {
    manager: &'a dyn TagManagerTrait,
    offset: usize,
    limit: usize,
    label: Option<String>,
}

impl<'a> TagQueryBuilder<'a> {
    pub fn new(manager: &'a dyn TagManagerTrait) -> Self {
        Self {
            manager,
            offset: 0,
            limit: DEFAULT_QUERY_LIMIT,
            label: None,
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

    /// Keeps only tags whose label equals `label` exactly. An empty label
    /// disables the filter.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn label_filter(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.is_empty())
    }

    async fn resolve(&self, ids: &[String]) -> Result<Vec<Tag>, RepositoryError> {
        try_join_all(ids.iter().map(|id| self.manager.get_by_id(id))).await
    }

    async fn matching(&self, label: &str) -> Result<Vec<Tag>, RepositoryError> {
        let ids = self.manager.tag_ids().await?;
        let tags = self.resolve(&ids).await?;
        Ok(tags.into_iter().filter(|tag| tag.label == label).collect())
    }

    /// Returns the requested window of tags in insertion order.
    pub async fn query(&self) -> Result<Vec<Tag>, RepositoryError> {
        match self.label_filter() {
            Some(label) => Ok(page(self.matching(label).await?, self.offset, self.limit)),
            None => {
                let ids = page(self.manager.tag_ids().await?, self.offset, self.limit);
                self.resolve(&ids).await
            }
        }
    }

    /// Counts every matching tag, ignoring offset and limit.
    pub async fn count(&self) -> Result<usize, RepositoryError> {
        match self.label_filter() {
            Some(label) => Ok(self.matching(label).await?.len()),
            None => Ok(self.manager.tag_ids().await?.len()),
        }
    }
}

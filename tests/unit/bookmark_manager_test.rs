//! Unit tests for the BookmarkManager public API.
//!
//! These tests exercise bookmark creation, CRUD, tag resolution and the
//! tag-filtered query builder through `BookmarkManagerTrait`, with the tag
//! manager and bookmark manager sharing one in-memory store.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use mediamarks::managers::bookmark_manager::{
    BookmarkManager, BookmarkManagerTrait, BOOKMARKS_KEY,
};
use mediamarks::managers::tag_manager::{TagManager, TagManagerTrait};
use mediamarks::storage::{InMemoryStorage, KeyValueStorage};
use mediamarks::types::bookmark::{
    Bookmark, BookmarkMedia, BookmarkType, NewImageBookmark, NewVideoBookmark,
};
use mediamarks::types::errors::RepositoryError;
use mediamarks::types::tag::Tag;

struct Fixture {
    storage: Arc<InMemoryStorage>,
    tags: Arc<TagManager>,
    bookmarks: BookmarkManager,
}

/// Helper: both managers bound to one fresh store.
fn setup() -> Fixture {
    let storage = Arc::new(InMemoryStorage::new());
    let tags = Arc::new(TagManager::new(storage.clone()));
    let bookmarks = BookmarkManager::new(storage.clone(), tags.clone());
    Fixture {
        storage,
        tags,
        bookmarks,
    }
}

fn image(title: &str, tags: Option<Vec<Tag>>) -> NewImageBookmark {
    NewImageBookmark {
        url: "https://www.flickr.com/photos/moimarye/8320736073".to_string(),
        thumb_url: "https://live.staticflickr.com/8320736073_m.jpg".to_string(),
        title: title.to_string(),
        author_name: "Marye".to_string(),
        width: 4928,
        height: 3264,
        tags,
    }
}

fn video(title: &str, tags: Option<Vec<Tag>>) -> NewVideoBookmark {
    NewVideoBookmark {
        url: "https://vimeo.com/259405501".to_string(),
        thumb_url: "https://i.vimeocdn.com/video/1280x720.jpg".to_string(),
        title: title.to_string(),
        author_name: "Studio".to_string(),
        width: 1280,
        height: 720,
        duration: 146,
        tags,
    }
}

/// Helper: creates image bookmarks `label#0..` in order.
async fn seed(fx: &Fixture, n: usize) -> Vec<Bookmark> {
    let mut created = Vec::with_capacity(n);
    for i in 0..n {
        let title = format!("label#{}", i);
        created.push(fx.bookmarks.new_image_bookmark(image(&title, None)).await.unwrap());
    }
    created
}

fn titles(bookmarks: &[Bookmark]) -> Vec<String> {
    bookmarks.iter().map(|b| b.title.clone()).collect()
}

/// A new image bookmark reads back equal, including its timestamp.
#[tokio::test]
async fn test_image_bookmark_round_trip() {
    let fx = setup();
    let created = fx.bookmarks.new_image_bookmark(image("Rennes", None)).await.unwrap();

    assert_eq!(created.bookmark_type(), BookmarkType::Image);
    let loaded = fx.bookmarks.get_by_id(&created.id).await.unwrap();
    assert_eq!(loaded, created);
}

/// A new video bookmark keeps its duration and tags.
#[tokio::test]
async fn test_video_bookmark_with_tags_round_trip() {
    let fx = setup();
    let t1 = fx.tags.new_tag("tag1").await.unwrap();
    let t2 = fx.tags.new_tag("tag2").await.unwrap();
    let created = fx
        .bookmarks
        .new_video_bookmark(video("Short film", Some(vec![t1.clone(), t2.clone()])))
        .await
        .unwrap();

    let loaded = fx.bookmarks.get_by_id(&created.id).await.unwrap();
    assert_eq!(loaded.media.duration(), Some(146));
    assert_eq!(loaded.tags, Some(vec![t1, t2]));
    assert_eq!(loaded, created);
}

/// Stored records hold tag ids, and the index lists bookmark ids.
#[tokio::test]
async fn test_persisted_layout() {
    let fx = setup();
    let tag = fx.tags.new_tag("sea").await.unwrap();
    let created = fx
        .bookmarks
        .new_image_bookmark(image("Coast", Some(vec![tag.clone()])))
        .await
        .unwrap();

    let index = fx.storage.get_item(BOOKMARKS_KEY).unwrap().unwrap();
    assert_eq!(index, format!(r#"["{}"]"#, created.id));

    let record: serde_json::Value =
        serde_json::from_str(&fx.storage.get_item(&created.id).unwrap().unwrap()).unwrap();
    assert_eq!(record["tags"], serde_json::json!([tag.id]));
    assert_eq!(record["type"], "Image");
    assert_eq!(record["width"], 4928);
}

/// Save reflects mutated fields and leaves id, type and addedAt alone.
#[tokio::test]
async fn test_save_updates_existing() {
    let fx = setup();
    let created = fx.bookmarks.new_image_bookmark(image("Draft", None)).await.unwrap();
    let mut edited = created.clone();
    edited.url = "https://www.flickr.com/photos/moimarye/8320736074".to_string();
    edited.title = "Final".to_string();
    edited.media.set_dimensions(1920, 1080);
    fx.bookmarks.save(&edited).await.unwrap();

    let loaded = fx.bookmarks.get_by_id(&created.id).await.unwrap();
    assert_eq!(loaded.url, "https://www.flickr.com/photos/moimarye/8320736074");
    assert_eq!(loaded.title, "Final");
    assert_eq!(loaded.media.width(), 1920);
    assert_eq!(loaded.media.height(), 1080);
    assert_eq!(loaded.id, created.id);
    assert_eq!(loaded.bookmark_type(), created.bookmark_type());
    assert_eq!(loaded.added_at, created.added_at);
    assert_eq!(fx.bookmarks.bookmark_ids().await.unwrap().len(), 1);
}

/// A video keeps its duration edits and never has its creation time moved.
#[tokio::test]
async fn test_save_keeps_stored_added_at() {
    let fx = setup();
    let created = fx.bookmarks.new_video_bookmark(video("Draft", None)).await.unwrap();
    let mut edited = created.clone();
    assert!(edited.media.set_duration(300));
    edited.added_at = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();

    let saved = fx.bookmarks.save(&edited).await.unwrap();
    assert_eq!(saved.added_at, created.added_at);

    let loaded = fx.bookmarks.get_by_id(&created.id).await.unwrap();
    assert_eq!(
        loaded.media,
        BookmarkMedia::Video { width: 1280, height: 720, duration: 300 }
    );
    assert_eq!(loaded.added_at, created.added_at);
}

/// Swapping a stored video for an image under the same id is rejected.
#[tokio::test]
async fn test_save_rejects_type_change() {
    let fx = setup();
    let created = fx.bookmarks.new_video_bookmark(video("Clip", None)).await.unwrap();
    let mut edited = created.clone();
    edited.media = BookmarkMedia::Image { width: 10, height: 10 };

    let err = fx.bookmarks.save(&edited).await.unwrap_err();
    assert!(matches!(err, RepositoryError::MalformedRecord(_)));

    let loaded = fx.bookmarks.get_by_id(&created.id).await.unwrap();
    assert_eq!(loaded.bookmark_type(), BookmarkType::Video);
    assert_eq!(loaded, created);
}

/// Saving a bookmark that was never stored indexes it like a creation.
#[tokio::test]
async fn test_save_unknown_id_is_indexed() {
    let fx = setup();
    let created = fx.bookmarks.new_image_bookmark(image("Original", None)).await.unwrap();
    let mut copy = created.clone();
    copy.id = "imported-1".to_string();
    copy.added_at = Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap();

    let saved = fx.bookmarks.save(&copy).await.unwrap();
    assert_eq!(saved.added_at, copy.added_at);
    assert_eq!(
        fx.bookmarks.bookmark_ids().await.unwrap(),
        vec![created.id.clone(), "imported-1".to_string()]
    );
}

/// Delete removes the bookmark; a second delete is a no-op.
#[tokio::test]
async fn test_delete_is_idempotent() {
    let fx = setup();
    let created = seed(&fx, 2).await;
    fx.bookmarks.delete(&created[0]).await.unwrap();
    fx.bookmarks.delete(&created[0]).await.unwrap();

    assert!(fx.bookmarks.get_by_id(&created[0].id).await.unwrap_err().is_not_found());
    assert_eq!(fx.bookmarks.bookmark_ids().await.unwrap(), vec![created[1].id.clone()]);
}

/// Looking up a missing id is Not-Found.
#[tokio::test]
async fn test_get_missing_is_not_found() {
    let fx = setup();
    assert!(fx.bookmarks.get_by_id("missing").await.unwrap_err().is_not_found());
}

/// A bookmark referencing a deleted tag can no longer be loaded.
#[tokio::test]
async fn test_dangling_tag_fails_lookup() {
    let fx = setup();
    let tag = fx.tags.new_tag("gone").await.unwrap();
    let created = fx
        .bookmarks
        .new_image_bookmark(image("Tagged", Some(vec![tag.clone()])))
        .await
        .unwrap();
    fx.tags.delete(&tag).await.unwrap();

    assert!(fx.bookmarks.get_by_id(&created.id).await.unwrap_err().is_not_found());
}

/// The default window is the first ten bookmarks in creation order.
#[tokio::test]
async fn test_default_query_window() {
    let fx = setup();
    seed(&fx, 30).await;
    let found = fx.bookmarks.new_query_builder().query().await.unwrap();
    let expected: Vec<String> = (0..10).map(|i| format!("label#{}", i)).collect();
    assert_eq!(titles(&found), expected);
}

/// Offset 2 and limit 6 return label#2..label#7.
#[tokio::test]
async fn test_offset_and_limit() {
    let fx = setup();
    seed(&fx, 30).await;
    let found = fx
        .bookmarks
        .new_query_builder()
        .offset(2)
        .limit(6)
        .query()
        .await
        .unwrap();
    let expected: Vec<String> = (2..8).map(|i| format!("label#{}", i)).collect();
    assert_eq!(titles(&found), expected);
}

/// Tag filtering windows after filtering; count ignores the window.
#[tokio::test]
async fn test_tag_filter() {
    let fx = setup();
    let wanted = fx.tags.new_tag("wanted").await.unwrap();
    let other = fx.tags.new_tag("other").await.unwrap();
    for i in 0..9 {
        let tags = if i % 3 == 0 {
            Some(vec![other.clone(), wanted.clone()])
        } else {
            Some(vec![other.clone()])
        };
        fx.bookmarks
            .new_image_bookmark(image(&format!("label#{}", i), tags))
            .await
            .unwrap();
    }

    let all = fx.bookmarks.new_query_builder().with_tag(&wanted).query().await.unwrap();
    assert_eq!(titles(&all), vec!["label#0", "label#3", "label#6"]);

    let page = fx
        .bookmarks
        .new_query_builder()
        .with_tag(&wanted)
        .offset(1)
        .limit(1)
        .query()
        .await
        .unwrap();
    assert_eq!(titles(&page), vec!["label#3"]);

    let count = fx
        .bookmarks
        .new_query_builder()
        .with_tag_id(wanted.id.clone())
        .offset(2)
        .limit(1)
        .count()
        .await
        .unwrap();
    assert_eq!(count, 3);
    assert_eq!(fx.bookmarks.new_query_builder().limit(2).count().await.unwrap(), 9);
}

/// Filtering by an unused tag matches nothing.
#[tokio::test]
async fn test_unknown_tag_filter_is_empty() {
    let fx = setup();
    seed(&fx, 3).await;
    let q = fx.bookmarks.new_query_builder().with_tag_id("no-such-tag");
    assert!(q.query().await.unwrap().is_empty());
    assert_eq!(q.count().await.unwrap(), 0);
}

/// Without a filter only the requested window is resolved, so a dangling
/// bookmark outside it does not fail the query.
#[tokio::test]
async fn test_unfiltered_query_resolves_only_window() {
    let fx = setup();
    let created = seed(&fx, 5).await;
    fx.storage.remove_item(&created[4].id).unwrap();

    let first = fx.bookmarks.new_query_builder().limit(2).query().await.unwrap();
    assert_eq!(titles(&first), vec!["label#0", "label#1"]);
    assert!(fx.bookmarks.new_query_builder().query().await.unwrap_err().is_not_found());
}

//! Property-based tests for Bookmark Manager operations.
//!
//! These tests verify that image and video bookmarks round-trip through the
//! key-value store with their tags, and that tag-filtered queries agree with
//! a plain in-memory model regardless of offset and limit.

use std::sync::Arc;

use mediamarks::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use mediamarks::managers::tag_manager::{TagManager, TagManagerTrait};
use mediamarks::storage::{InMemoryStorage, SqliteStorage, KeyValueStorage};
use mediamarks::types::bookmark::{NewImageBookmark, NewVideoBookmark};
use mediamarks::types::tag::Tag;
use proptest::prelude::*;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime")
}

fn managers(storage: Arc<dyn KeyValueStorage>) -> (Arc<TagManager>, BookmarkManager) {
    let tags = Arc::new(TagManager::new(storage.clone()));
    let bookmarks = BookmarkManager::new(storage, tags.clone());
    (tags, bookmarks)
}

/// Strategy for generating valid URL strings.
fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        "[a-z][a-z0-9]{2,15}",
        prop_oneof![Just(".com"), Just(".org"), Just(".net")],
        proptest::option::of("/[a-z0-9]{1,10}"),
    )
        .prop_map(|(scheme, host, tld, path)| {
            format!("{}://{}{}{}", scheme, host, tld, path.unwrap_or_default())
        })
}

/// Strategy for free-form text fields.
fn arb_text() -> impl Strategy<Value = String> {
    "\\PC{0,24}"
}

// **Property: image bookmark round-trip**
//
// *For any* image bookmark data and any subset of existing tags, creating a
// bookmark and reading it back SHALL yield an equal bookmark, on both
// storage adapters.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn image_bookmark_round_trips(
        url in arb_url(),
        title in arb_text(),
        author in arb_text(),
        width in 0u32..10_000,
        height in 0u32..10_000,
        tag_labels in proptest::option::of(proptest::collection::vec("[a-z]{1,6}", 0..4)),
        use_sqlite in any::<bool>(),
    ) {
        let storage: Arc<dyn KeyValueStorage> = if use_sqlite {
            Arc::new(SqliteStorage::open_in_memory().expect("Failed to open in-memory database"))
        } else {
            Arc::new(InMemoryStorage::new())
        };
        let (tags, bookmarks) = managers(storage);
        let rt = runtime();
        rt.block_on(async {
            let attached: Option<Vec<Tag>> = match tag_labels {
                Some(labels) => {
                    let mut created = Vec::new();
                    for label in labels {
                        created.push(tags.new_tag(&label).await.unwrap());
                    }
                    Some(created)
                }
                None => None,
            };
            let bookmark = bookmarks
                .new_image_bookmark(NewImageBookmark {
                    url,
                    thumb_url: "https://cdn.example.com/t.jpg".to_string(),
                    title,
                    author_name: author,
                    width,
                    height,
                    tags: attached,
                })
                .await
                .unwrap();

            let loaded = bookmarks.get_by_id(&bookmark.id).await.unwrap();
            prop_assert_eq!(loaded, bookmark);
            Ok(())
        })?;
    }
}

// **Property: video bookmark round-trip**
//
// *For any* video data, the duration and dimensions SHALL survive storage.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn video_bookmark_round_trips(
        url in arb_url(),
        title in arb_text(),
        width in 0u32..8_000,
        height in 0u32..8_000,
        duration in 0u32..100_000,
    ) {
        let (_, bookmarks) = managers(Arc::new(InMemoryStorage::new()));
        let rt = runtime();
        rt.block_on(async {
            let bookmark = bookmarks
                .new_video_bookmark(NewVideoBookmark {
                    url,
                    thumb_url: "https://cdn.example.com/v.jpg".to_string(),
                    title,
                    author_name: "author".to_string(),
                    width,
                    height,
                    duration,
                    tags: None,
                })
                .await
                .unwrap();

            let loaded = bookmarks.get_by_id(&bookmark.id).await.unwrap();
            prop_assert_eq!(loaded.media.duration(), Some(duration));
            prop_assert_eq!(loaded, bookmark);
            Ok(())
        })?;
    }
}

// **Property: tag filter is independent of the window for count**
//
// *For any* assignment of a tag to bookmarks, the filtered query SHALL return
// the tagged bookmarks in creation order windowed by offset/limit, and the
// filtered count SHALL equal the number of tagged bookmarks whatever the
// offset and limit.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn tag_filter_matches_model(
        tagged in proptest::collection::vec(any::<bool>(), 0..15),
        offset in 0usize..10,
        limit in 0usize..10,
    ) {
        let (tags, bookmarks) = managers(Arc::new(InMemoryStorage::new()));
        let rt = runtime();
        rt.block_on(async {
            let wanted = tags.new_tag("wanted").await.unwrap();
            let mut model = Vec::new();
            for (i, is_tagged) in tagged.iter().enumerate() {
                let bookmark = bookmarks
                    .new_image_bookmark(NewImageBookmark {
                        url: format!("https://www.flickr.com/photos/a/{}", i),
                        thumb_url: "t.jpg".to_string(),
                        title: format!("label#{}", i),
                        author_name: "a".to_string(),
                        width: 1,
                        height: 1,
                        tags: if *is_tagged { Some(vec![wanted.clone()]) } else { None },
                    })
                    .await
                    .unwrap();
                if *is_tagged {
                    model.push(bookmark);
                }
            }

            let found = bookmarks
                .new_query_builder()
                .with_tag(&wanted)
                .offset(offset)
                .limit(limit)
                .query()
                .await
                .unwrap();
            let expected: Vec<_> = model.iter().skip(offset).take(limit).cloned().collect();
            prop_assert_eq!(found, expected);

            let count = bookmarks
                .new_query_builder()
                .with_tag(&wanted)
                .offset(offset)
                .limit(limit)
                .count()
                .await
                .unwrap();
            prop_assert_eq!(count, model.len());
            Ok(())
        })?;
    }
}

// **Property: delete is idempotent**
//
// *For any* number of bookmarks and any one of them, deleting it twice SHALL
// leave exactly the other ids in the index, in order.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn delete_twice_leaves_others(n in 1usize..10, victim in 0usize..10) {
        let victim = victim % n;
        let (_, bookmarks) = managers(Arc::new(InMemoryStorage::new()));
        let rt = runtime();
        rt.block_on(async {
            let mut created = Vec::new();
            for i in 0..n {
                created.push(
                    bookmarks
                        .new_video_bookmark(NewVideoBookmark {
                            url: format!("https://vimeo.com/{}", i),
                            thumb_url: "t.jpg".to_string(),
                            title: format!("v{}", i),
                            author_name: "a".to_string(),
                            width: 1,
                            height: 1,
                            duration: 1,
                            tags: None,
                        })
                        .await
                        .unwrap(),
                );
            }

            bookmarks.delete(&created[victim]).await.unwrap();
            bookmarks.delete(&created[victim]).await.unwrap();

            let expected: Vec<String> = created
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != victim)
                .map(|(_, b)| b.id.clone())
                .collect();
            prop_assert_eq!(bookmarks.bookmark_ids().await.unwrap(), expected);
            prop_assert!(bookmarks.get_by_id(&created[victim].id).await.unwrap_err().is_not_found());
            Ok(())
        })?;
    }
}

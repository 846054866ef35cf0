//! RPC method handler for the Mediamarks JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be tested without stdin/stdout.
//! `handle_line` turns one request line into its response envelope;
//! `handle_method` dispatches the call to the repositories and connectors held
//! by an [`App`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::app::App;
use crate::types::bookmark::{Bookmark, NewImageBookmark, NewVideoBookmark};
use crate::types::tag::Tag;

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn usize_param(params: &Value, name: &str) -> Result<Option<usize>, String> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| format!("invalid {}: expected a non-negative integer", name)),
    }
}

fn object_param<T: DeserializeOwned>(params: &Value, name: &str) -> Result<T, String> {
    let raw = params.get(name).ok_or_else(|| format!("missing {}", name))?;
    serde_json::from_value(raw.clone()).map_err(|e| format!("invalid {}: {}", name, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Answer one newline-delimited request.
///
/// Returns `{"id", "result"}` or `{"id", "error"}`; a line that is not JSON
/// gets an error with a null id.
pub async fn handle_line(app: &App, line: &str) -> Value {
    let req = match serde_json::from_str::<Value>(line) {
        Ok(req) => req,
        Err(e) => return json!({"id": null, "error": format!("parse error: {}", e)}),
    };
    let id = req.get("id").cloned().unwrap_or(Value::Null);
    let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
    let params = req.get("params").cloned().unwrap_or_else(|| json!({}));
    debug!(method = %method, "rpc request");
    match handle_method(app, method, &params).await {
        Ok(val) => json!({"id": id, "result": val}),
        Err(err) => json!({"id": id, "error": err}),
    }
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // Tags
        "tag.new" => {
            let label = str_param(params, "label")?;
            let tag = app.tag_manager().new_tag(label).await.map_err(|e| e.to_string())?;
            to_json(&tag)
        }
        "tag.save" => {
            let tag: Tag = object_param(params, "tag")?;
            let saved = app.tag_manager().save(&tag).await.map_err(|e| e.to_string())?;
            to_json(&saved)
        }
        "tag.get" => {
            let id = str_param(params, "id")?;
            let tag = app.tag_manager().get_by_id(id).await.map_err(|e| e.to_string())?;
            to_json(&tag)
        }
        "tag.delete" => {
            let tag: Tag = object_param(params, "tag")?;
            app.tag_manager().delete(&tag).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tag.query" | "tag.count" => {
            let tags = app.tag_manager();
            let mut query = tags.new_query_builder();
            if let Some(offset) = usize_param(params, "offset")? {
                query = query.offset(offset);
            }
            if let Some(limit) = usize_param(params, "limit")? {
                query = query.limit(limit);
            }
            if let Some(label) = params.get("label").and_then(|v| v.as_str()) {
                query = query.label(label);
            }
            if method == "tag.count" {
                let count = query.count().await.map_err(|e| e.to_string())?;
                Ok(json!(count))
            } else {
                let found = query.query().await.map_err(|e| e.to_string())?;
                to_json(&found)
            }
        }
        "tag.find_or_create" => {
            let label = str_param(params, "label")?;
            let tag = app
                .tag_manager()
                .find_or_create(label)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&tag)
        }

        // Bookmarks
        "bookmark.new_image" => {
            let data: NewImageBookmark =
                serde_json::from_value(params.clone()).map_err(|e| format!("invalid params: {}", e))?;
            let bookmark = app
                .bookmark_manager()
                .new_image_bookmark(data)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&bookmark)
        }
        "bookmark.new_video" => {
            let data: NewVideoBookmark =
                serde_json::from_value(params.clone()).map_err(|e| format!("invalid params: {}", e))?;
            let bookmark = app
                .bookmark_manager()
                .new_video_bookmark(data)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&bookmark)
        }
        "bookmark.save" => {
            let bookmark: Bookmark = object_param(params, "bookmark")?;
            let saved = app
                .bookmark_manager()
                .save(&bookmark)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&saved)
        }
        "bookmark.get" => {
            let id = str_param(params, "id")?;
            let bookmark = app
                .bookmark_manager()
                .get_by_id(id)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&bookmark)
        }
        "bookmark.delete" => {
            let bookmark: Bookmark = object_param(params, "bookmark")?;
            app.bookmark_manager()
                .delete(&bookmark)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmark.query" | "bookmark.count" => {
            let bookmarks = app.bookmark_manager();
            let mut query = bookmarks.new_query_builder();
            if let Some(offset) = usize_param(params, "offset")? {
                query = query.offset(offset);
            }
            if let Some(limit) = usize_param(params, "limit")? {
                query = query.limit(limit);
            }
            if let Some(tag_id) = params.get("tag_id").and_then(|v| v.as_str()) {
                query = query.with_tag_id(tag_id);
            }
            if method == "bookmark.count" {
                let count = query.count().await.map_err(|e| e.to_string())?;
                Ok(json!(count))
            } else {
                let found = query.query().await.map_err(|e| e.to_string())?;
                to_json(&found)
            }
        }

        // Enrichment
        "media.info" => {
            let url = str_param(params, "url")?;
            let info = app.find_media_info(url).await.map_err(|e| e.to_string())?;
            to_json(&info)
        }
        "bookmark.from_url" => {
            let url = str_param(params, "url")?;
            let tags: Option<Vec<Tag>> = match params.get("tags") {
                None | Some(Value::Null) => None,
                Some(_) => Some(object_param(params, "tags")?),
            };
            let bookmark = app
                .new_bookmark_from_url(url, tags)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&bookmark)
        }

        // Settings
        "settings.get" => to_json(app.settings()),

        _ => Err(format!("unknown method: {}", method)),
    }
}

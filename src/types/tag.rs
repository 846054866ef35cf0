use serde::{Deserialize, Serialize};

/// A user-defined label attachable to bookmarks.
///
/// The `id` is assigned by the tag manager at creation and never changes;
/// `label` may be edited and saved again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub label: String,
}

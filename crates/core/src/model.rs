//! Todo item model and list request types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A single todo row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Item {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tables keyed by `bigint identity` hand back numbers; uuid tables hand back strings.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// Fields supplied by the caller when creating an item.
///
/// Everything else is assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NewItem {
    pub title: String,
    pub content: String,
}

impl NewItem {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { title: title.into(), content: content.into() }
    }

    /// Reject empty required fields before anything goes over the wire.
    pub fn validate(&self) -> Result<(), Error> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)
    }
}

/// Partial update. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

impl ItemPatch {
    /// The patch sent by "mark done".
    pub fn done() -> Self {
        Self { done: Some(true), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.done.is_none()
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.is_empty() {
            return Err(Error::InvalidInput("patch must set at least one field".into()));
        }
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(content) = &self.content {
            require_text("content", content)?;
        }
        Ok(())
    }

    /// Apply to a local copy. `updated_at` is left to the server.
    pub fn apply(&self, item: &mut Item) {
        if let Some(title) = &self.title {
            item.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            item.content.clone_from(content);
        }
        if let Some(done) = self.done {
            item.done = done;
        }
    }
}

impl From<NewItem> for ItemPatch {
    fn from(item: NewItem) -> Self {
        Self { title: Some(item.title), content: Some(item.content), done: None }
    }
}

fn require_text(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Which items a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Done,
    Undone,
}

impl Filter {
    /// Equality predicate on `done`, if the filter applies one.
    pub fn done_value(self) -> Option<bool> {
        match self {
            Filter::All => None,
            Filter::Done => Some(true),
            Filter::Undone => Some(false),
        }
    }

    pub fn matches(self, item: &Item) -> bool {
        self.done_value().is_none_or(|done| item.done == done)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Done => "done",
            Filter::Undone => "undone",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Filter::All),
            "done" => Ok(Filter::Done),
            "undone" => Ok(Filter::Undone),
            other => Err(Error::InvalidInput(format!("unknown filter: {other}"))),
        }
    }
}

/// Ordering over `updated_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn is_ascending(self) -> bool {
        self == SortDirection::Ascending
    }
}

/// Parameters of one `list` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequest {
    pub limit: u32,
    pub offset: u32,
    pub sort: SortDirection,
    pub filter: Filter,
}

impl ListRequest {
    pub fn new(limit: u32, offset: u32, sort: SortDirection, filter: Filter) -> Self {
        Self { limit, offset, sort, filter }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.limit == 0 {
            return Err(Error::InvalidInput("limit must be greater than 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(done: bool) -> Item {
        let now = Utc::now();
        Item {
            id: "1".into(),
            title: "A".into(),
            content: "B".into(),
            done,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_new_item_validation() {
        assert!(NewItem::new("A", "B").validate().is_ok());
        assert!(matches!(NewItem::new("", "B").validate(), Err(Error::InvalidInput(msg)) if msg.contains("title")));
        assert!(matches!(NewItem::new("A", "   ").validate(), Err(Error::InvalidInput(msg)) if msg.contains("content")));
    }

    #[test]
    fn test_patch_validation() {
        assert!(ItemPatch::default().validate().is_err());
        assert!(ItemPatch::done().validate().is_ok());
        let patch = ItemPatch { title: Some(String::new()), ..Default::default() };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_patch_apply() {
        let mut it = item(false);
        let patch = ItemPatch { title: Some("C".into()), done: Some(true), ..Default::default() };
        patch.apply(&mut it);
        assert_eq!(it.title, "C");
        assert_eq!(it.content, "B");
        assert!(it.done);
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let json = serde_json::to_string(&ItemPatch::done()).unwrap();
        assert_eq!(json, r#"{"done":true}"#);
    }

    #[test]
    fn test_filter_matches() {
        assert!(Filter::All.matches(&item(true)));
        assert!(Filter::Done.matches(&item(true)));
        assert!(!Filter::Done.matches(&item(false)));
        assert!(Filter::Undone.matches(&item(false)));
        assert!(!Filter::Undone.matches(&item(true)));
    }

    #[test]
    fn test_filter_parse() {
        for filter in [Filter::All, Filter::Done, Filter::Undone] {
            assert_eq!(filter.as_str().parse::<Filter>().unwrap(), filter);
        }
        assert!("finished".parse::<Filter>().is_err());
    }

    #[test]
    fn test_list_request_rejects_zero_limit() {
        assert!(ListRequest::new(10, 20, SortDirection::Descending, Filter::All).validate().is_ok());
        assert!(ListRequest::new(0, 0, SortDirection::Ascending, Filter::All).validate().is_err());
    }

    #[test]
    fn test_item_deserialize_defaults_done() {
        let json = r#"{
            "id": "7f1c",
            "title": "A",
            "content": "B",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00+00:00"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!(!item.done);
        assert_eq!(item.id, "7f1c");
    }

    #[test]
    fn test_item_numeric_id() {
        let json = r#"{"id": 42, "title": "A", "content": "B", "done": true,
            "created_at": "2024-05-01T10:00:00Z", "updated_at": "2024-05-02T10:00:00.123456+00:00"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "42");
        assert!(item.done);
    }
}

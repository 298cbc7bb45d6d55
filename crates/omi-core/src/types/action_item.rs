//! Action items (tasks).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Lifecycle state of an action item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActionItemStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

/// A task tracked by the remote service.
///
/// Only `id` is required. Everything else is kept as the server sent it,
/// including fields this crate does not know about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw status string. See [`ActionItem::known_status`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// ISO 8601 due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActionItem {
    /// The status, if the server sent one this crate recognizes.
    pub fn known_status(&self) -> Option<ActionItemStatus> {
        self.status.as_deref()?.parse().ok()
    }
}

/// Body of `POST /user/action-items`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateActionItemRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

impl CreateActionItemRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Body of `PATCH /user/action-items/:id`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateActionItemRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActionItemStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

impl UpdateActionItemRequest {
    /// Patch that only moves the item to `status`.
    pub fn status(status: ActionItemStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(ActionItemStatus::Cancelled).unwrap(),
            serde_json::json!("cancelled")
        );
        assert_eq!(ActionItemStatus::Completed.to_string(), "completed");
        assert_eq!(
            ActionItemStatus::from_str("pending").unwrap(),
            ActionItemStatus::Pending
        );
    }

    #[test]
    fn test_unknown_status_is_kept_but_not_recognized() {
        let item: ActionItem = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "title": "x",
            "status": "archived",
        }))
        .unwrap();
        assert_eq!(item.status.as_deref(), Some("archived"));
        assert_eq!(item.known_status(), None);
    }

    #[test]
    fn test_missing_fields_are_not_invented() {
        let item: ActionItem =
            serde_json::from_value(serde_json::json!({ "id": "a1", "title": "Pay rent" })).unwrap();
        assert_eq!(item.known_status(), None);
        assert_eq!(item.created_at, None);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            serde_json::json!({ "id": "a1", "title": "Pay rent" })
        );
    }

    #[test]
    fn test_unmodelled_fields_survive() {
        let raw = serde_json::json!({
            "id": "a1",
            "title": "Pay rent",
            "status": "completed",
            "category": "finance",
            "completed_at": "2024-02-01",
        });
        let item: ActionItem = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(item.known_status(), Some(ActionItemStatus::Completed));
        assert_eq!(item.extra["category"], "finance");
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn test_status_patch_sends_only_status() {
        let patch = UpdateActionItemRequest::status(ActionItemStatus::Completed);
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({ "status": "completed" })
        );
    }
}

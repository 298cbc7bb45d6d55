//! Core types for the Omi API bridge.

mod action_item;
mod conversation;
mod list;
mod memory;

pub use action_item::{
    ActionItem, ActionItemStatus, CreateActionItemRequest, UpdateActionItemRequest,
};
pub use conversation::{
    Conversation, CreateConversationRequest, CreateMessageRequest, Message, MessageRole,
    UpdateConversationRequest,
};
pub use list::{normalize_list, ListParams, ListResult, SortOrder};
pub use memory::{CreateMemoryRequest, Memory, UpdateMemoryRequest};

use serde::{Deserialize, Serialize};

/// Snapshot of the server-reported rate-limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStatus {
    /// Requests left in the current window.
    pub remaining: i64,
    /// Unix time (seconds) at which the window resets; 0 when unknown.
    pub reset_at: i64,
}

//! MCP tool input/output type definitions.
//!
//! These types are used with `schemars::JsonSchema` to generate the JSON Schema
//! that MCP clients use to understand tool parameters. Required arguments are
//! plain fields, so a call that omits one never reaches the dispatcher.

use std::collections::HashMap;

use omi_core::{
    ActionItemStatus, CreateActionItemRequest, CreateConversationRequest, CreateMemoryRequest,
    CreateMessageRequest, ListParams, MessageRole, OmiError, OmiResult, SortOrder,
    UpdateActionItemRequest, UpdateConversationRequest, UpdateMemoryRequest,
};
use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

type Metadata = HashMap<String, Value>;

/// Sort order for list tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListOrder {
    Asc,
    Desc,
}

impl From<ListOrder> for SortOrder {
    fn from(order: ListOrder) -> Self {
        match order {
            ListOrder::Asc => SortOrder::Asc,
            ListOrder::Desc => SortOrder::Desc,
        }
    }
}

/// Action item status accepted by `update-action-item`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusInput {
    Pending,
    Completed,
    Cancelled,
}

impl From<StatusInput> for ActionItemStatus {
    fn from(status: StatusInput) -> Self {
        match status {
            StatusInput::Pending => ActionItemStatus::Pending,
            StatusInput::Completed => ActionItemStatus::Completed,
            StatusInput::Cancelled => ActionItemStatus::Cancelled,
        }
    }
}

/// Message author accepted by `add-message`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleInput {
    #[default]
    User,
    Assistant,
    System,
}

impl From<RoleInput> for MessageRole {
    fn from(role: RoleInput) -> Self {
        match role {
            RoleInput::User => MessageRole::User,
            RoleInput::Assistant => MessageRole::Assistant,
            RoleInput::System => MessageRole::System,
        }
    }
}

/// Paging input shared by list tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListInput {
    /// Maximum number of results.
    #[serde(default)]
    pub limit: Option<u32>,

    /// Number of results to skip.
    #[serde(default)]
    pub offset: Option<u32>,

    /// Sort order.
    #[serde(default)]
    pub order: Option<ListOrder>,
}

impl From<ListInput> for ListParams {
    fn from(input: ListInput) -> Self {
        ListParams {
            limit: input.limit,
            offset: input.offset,
            order: input.order.map(Into::into),
        }
    }
}

/// Input for tools addressing one entity by ID.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IdInput {
    /// The entity ID.
    pub id: String,
}

/// Input for no-argument tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct EmptyInput {}

/// Input for create-memory tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateMemoryInput {
    /// The memory content.
    pub content: String,

    /// Memory type (e.g., "fact", "preference").
    #[serde(rename = "type", default)]
    pub memory_type: Option<String>,

    /// Additional metadata.
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Input for update-memory tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateMemoryInput {
    /// The memory ID to update.
    pub id: String,

    /// New content.
    #[serde(default)]
    pub content: Option<String>,

    /// New memory type.
    #[serde(rename = "type", default)]
    pub memory_type: Option<String>,

    /// Replacement metadata.
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Input for search tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchInput {
    /// Text to look for (case-insensitive).
    pub query: String,
}

/// Input for get-memories-by-type tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MemoriesByTypeInput {
    /// Exact memory type to keep.
    #[serde(rename = "type")]
    pub memory_type: String,

    #[serde(flatten)]
    pub page: ListInput,
}

/// Input for create-action-item tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateActionItemInput {
    /// Task title.
    pub title: String,

    /// Task description.
    #[serde(default)]
    pub description: Option<String>,

    /// Due date (ISO 8601 format).
    #[serde(default)]
    pub due_date: Option<String>,

    /// Additional metadata.
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Input for update-action-item tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateActionItemInput {
    /// The action item ID to update.
    pub id: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<StatusInput>,

    /// Due date (ISO 8601 format).
    #[serde(default)]
    pub due_date: Option<String>,

    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Input for create-conversation tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateConversationInput {
    /// Conversation title.
    #[serde(default)]
    pub title: Option<String>,

    /// List of participant identifiers.
    pub participants: Vec<String>,

    /// Initial message content.
    #[serde(default)]
    pub initial_message: Option<String>,

    /// Additional metadata.
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Input for update-conversation tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateConversationInput {
    /// The conversation ID to update.
    pub id: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub participants: Option<Vec<String>>,

    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Input for search-conversations tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchConversationsInput {
    /// Text to look for in titles and participants (case-insensitive).
    pub query: String,

    #[serde(flatten)]
    pub page: ListInput,
}

/// Input for add-message tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddMessageInput {
    /// Conversation to append to.
    pub conversation_id: String,

    /// Message author. Defaults to "user".
    #[serde(default)]
    pub role: RoleInput,

    /// Message text.
    pub content: String,

    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Result of a delete tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteResult {
    /// The ID of the deleted entity.
    pub deleted: String,
}

/// One tool invocation, tagged by tool name.
///
/// Deserializes from `{"name": "<tool>", "arguments": {...}}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "kebab-case")]
pub enum ToolRequest {
    GetMemories(ListInput),
    GetMemory(IdInput),
    CreateMemory(CreateMemoryInput),
    UpdateMemory(UpdateMemoryInput),
    DeleteMemory(IdInput),
    SearchMemories(SearchInput),
    GetMemoriesByType(MemoriesByTypeInput),
    GetActionItems(ListInput),
    GetActionItem(IdInput),
    CreateActionItem(CreateActionItemInput),
    UpdateActionItem(UpdateActionItemInput),
    DeleteActionItem(IdInput),
    GetPendingActionItems(ListInput),
    GetCompletedActionItems(ListInput),
    CompleteActionItem(IdInput),
    ReopenActionItem(IdInput),
    GetConversations(ListInput),
    GetConversation(IdInput),
    CreateConversation(CreateConversationInput),
    UpdateConversation(UpdateConversationInput),
    DeleteConversation(IdInput),
    GetConversationMessages(IdInput),
    SearchConversations(SearchConversationsInput),
    AddMessage(AddMessageInput),
    GetRateLimitStatus(EmptyInput),
}

impl ToolRequest {
    /// Parse a named tool call.
    ///
    /// A missing required argument becomes [`OmiError::MissingField`]; any
    /// other shape problem, including an unknown tool, becomes
    /// [`OmiError::InvalidArguments`].
    pub fn parse(name: &str, arguments: Value) -> OmiResult<Self> {
        let arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        let call = serde_json::json!({ "name": name, "arguments": arguments });
        serde_json::from_value(call).map_err(|e| {
            let message = e.to_string();
            match missing_field_name(&message) {
                Some(field) => OmiError::missing_field(field),
                None => OmiError::InvalidArguments(message),
            }
        })
    }

    /// The MCP tool name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetMemories(_) => "get-memories",
            Self::GetMemory(_) => "get-memory",
            Self::CreateMemory(_) => "create-memory",
            Self::UpdateMemory(_) => "update-memory",
            Self::DeleteMemory(_) => "delete-memory",
            Self::SearchMemories(_) => "search-memories",
            Self::GetMemoriesByType(_) => "get-memories-by-type",
            Self::GetActionItems(_) => "get-action-items",
            Self::GetActionItem(_) => "get-action-item",
            Self::CreateActionItem(_) => "create-action-item",
            Self::UpdateActionItem(_) => "update-action-item",
            Self::DeleteActionItem(_) => "delete-action-item",
            Self::GetPendingActionItems(_) => "get-pending-action-items",
            Self::GetCompletedActionItems(_) => "get-completed-action-items",
            Self::CompleteActionItem(_) => "complete-action-item",
            Self::ReopenActionItem(_) => "reopen-action-item",
            Self::GetConversations(_) => "get-conversations",
            Self::GetConversation(_) => "get-conversation",
            Self::CreateConversation(_) => "create-conversation",
            Self::UpdateConversation(_) => "update-conversation",
            Self::DeleteConversation(_) => "delete-conversation",
            Self::GetConversationMessages(_) => "get-conversation-messages",
            Self::SearchConversations(_) => "search-conversations",
            Self::AddMessage(_) => "add-message",
            Self::GetRateLimitStatus(_) => "get-rate-limit-status",
        }
    }

    /// Reject blank required strings and updates that change nothing.
    ///
    /// Presence of required fields is already guaranteed by the input types.
    pub fn validate(&self) -> OmiResult<()> {
        match self {
            Self::GetMemory(input)
            | Self::DeleteMemory(input)
            | Self::GetActionItem(input)
            | Self::DeleteActionItem(input)
            | Self::CompleteActionItem(input)
            | Self::ReopenActionItem(input)
            | Self::GetConversation(input)
            | Self::DeleteConversation(input)
            | Self::GetConversationMessages(input) => require("id", &input.id),
            Self::CreateMemory(input) => require("content", &input.content),
            Self::UpdateMemory(input) => {
                require("id", &input.id)?;
                require_change(
                    input.content.is_some() || input.memory_type.is_some() || input.metadata.is_some(),
                )
            }
            Self::SearchMemories(input) => require("query", &input.query),
            Self::GetMemoriesByType(input) => require("type", &input.memory_type),
            Self::CreateActionItem(input) => require("title", &input.title),
            Self::UpdateActionItem(input) => {
                require("id", &input.id)?;
                require_change(
                    input.title.is_some()
                        || input.description.is_some()
                        || input.status.is_some()
                        || input.due_date.is_some()
                        || input.metadata.is_some(),
                )
            }
            Self::UpdateConversation(input) => {
                require("id", &input.id)?;
                require_change(
                    input.title.is_some() || input.participants.is_some() || input.metadata.is_some(),
                )
            }
            Self::SearchConversations(input) => require("query", &input.query),
            Self::AddMessage(input) => {
                require("conversation_id", &input.conversation_id)?;
                require("content", &input.content)
            }
            Self::GetMemories(_)
            | Self::GetActionItems(_)
            | Self::GetPendingActionItems(_)
            | Self::GetCompletedActionItems(_)
            | Self::GetConversations(_)
            | Self::CreateConversation(_)
            | Self::GetRateLimitStatus(_) => Ok(()),
        }
    }
}

/// Extract `x` from serde's "missing field `x`" message.
///
/// Relies on the text of `serde::de::Error::missing_field` as rendered by
/// `serde_json::Error`'s `Display`, which carries no position for
/// `from_value`. If that text changes the error degrades to
/// `InvalidArguments`; `test_parse_missing_argument_names_field` pins it.
fn missing_field_name(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

fn require(field: &str, value: &str) -> OmiResult<()> {
    if value.trim().is_empty() {
        return Err(OmiError::missing_field(field));
    }
    Ok(())
}

fn require_change(any_field_set: bool) -> OmiResult<()> {
    if !any_field_set {
        return Err(OmiError::InvalidArguments(
            "at least one field to update must be provided".to_string(),
        ));
    }
    Ok(())
}

impl From<CreateMemoryInput> for CreateMemoryRequest {
    fn from(input: CreateMemoryInput) -> Self {
        Self {
            content: input.content,
            memory_type: input.memory_type,
            metadata: input.metadata,
        }
    }
}

impl From<UpdateMemoryInput> for UpdateMemoryRequest {
    fn from(input: UpdateMemoryInput) -> Self {
        Self {
            content: input.content,
            memory_type: input.memory_type,
            metadata: input.metadata,
        }
    }
}

impl From<CreateActionItemInput> for CreateActionItemRequest {
    fn from(input: CreateActionItemInput) -> Self {
        Self {
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            metadata: input.metadata,
        }
    }
}

impl From<UpdateActionItemInput> for UpdateActionItemRequest {
    fn from(input: UpdateActionItemInput) -> Self {
        Self {
            title: input.title,
            description: input.description,
            status: input.status.map(Into::into),
            due_date: input.due_date,
            metadata: input.metadata,
        }
    }
}

impl From<CreateConversationInput> for CreateConversationRequest {
    fn from(input: CreateConversationInput) -> Self {
        Self {
            title: input.title,
            participants: input.participants,
            initial_message: input.initial_message,
            metadata: input.metadata,
        }
    }
}

impl From<UpdateConversationInput> for UpdateConversationRequest {
    fn from(input: UpdateConversationInput) -> Self {
        Self {
            title: input.title,
            participants: input.participants,
            metadata: input.metadata,
        }
    }
}

impl From<AddMessageInput> for CreateMessageRequest {
    fn from(input: AddMessageInput) -> Self {
        Self {
            conversation_id: input.conversation_id,
            role: input.role.into(),
            content: input.content,
            metadata: input.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_action_item_input_schema() {
        let schema = rmcp::schemars::schema_for!(CreateActionItemInput);
        let json = serde_json::to_string_pretty(&schema).unwrap();
        assert!(json.contains("title"));
        assert!(json.contains("due_date"));
        assert!(json.contains("required"));
    }

    #[test]
    fn test_missing_required_field_is_rejected_by_type() {
        let result = serde_json::from_str::<CreateActionItemInput>(r#"{"description": "x"}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("title"));
    }

    #[test]
    fn test_list_input_converts_to_params() {
        let input: ListInput =
            serde_json::from_str(r#"{"limit": 5, "order": "desc"}"#).unwrap();
        let params: ListParams = input.into();
        assert_eq!(params.limit, Some(5));
        assert_eq!(params.offset, None);
        assert_eq!(params.order, Some(SortOrder::Desc));
    }

    #[test]
    fn test_memories_by_type_input_flattens_paging() {
        let input: MemoriesByTypeInput =
            serde_json::from_str(r#"{"type": "fact", "limit": 3}"#).unwrap();
        assert_eq!(input.memory_type, "fact");
        assert_eq!(input.page.limit, Some(3));
    }

    #[test]
    fn test_add_message_role_defaults_to_user() {
        let input: AddMessageInput =
            serde_json::from_str(r#"{"conversation_id": "c1", "content": "hi"}"#).unwrap();
        let request: CreateMessageRequest = input.into();
        assert_eq!(request.role, MessageRole::User);
    }

    #[test]
    fn test_blank_required_string_fails_validation() {
        let request = ToolRequest::CreateActionItem(CreateActionItemInput {
            title: "   ".to_string(),
            description: None,
            due_date: None,
            metadata: None,
        });
        let err = request.validate().unwrap_err();
        assert!(matches!(err, OmiError::MissingField { ref field } if field == "title"));
    }

    #[test]
    fn test_empty_update_fails_validation() {
        let request = ToolRequest::UpdateMemory(UpdateMemoryInput {
            id: "m1".to_string(),
            content: None,
            memory_type: None,
            metadata: None,
        });
        assert!(matches!(
            request.validate(),
            Err(OmiError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_update_status_maps_to_core() {
        let input: UpdateActionItemInput =
            serde_json::from_str(r#"{"id": "a1", "status": "cancelled"}"#).unwrap();
        let request: UpdateActionItemRequest = input.into();
        assert_eq!(request.status, Some(ActionItemStatus::Cancelled));
        assert_eq!(request.title, None);
    }

    #[test]
    fn test_parse_named_call() {
        let request = ToolRequest::parse(
            "create-action-item",
            serde_json::json!({ "title": "Pay rent" }),
        )
        .unwrap();
        match request {
            ToolRequest::CreateActionItem(input) => assert_eq!(input.title, "Pay rent"),
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn test_parse_missing_argument_names_field() {
        let err = ToolRequest::parse("get-memory", serde_json::json!({})).unwrap_err();
        assert!(matches!(err, OmiError::MissingField { ref field } if field == "id"));
        assert_eq!(err.to_string(), "Missing required field: id");
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = ToolRequest::parse("drop-tables", serde_json::json!({})).unwrap_err();
        assert!(matches!(err, OmiError::InvalidArguments(_)));
    }

    #[test]
    fn test_parse_wrong_type_is_invalid_arguments() {
        let err = ToolRequest::parse("get-memories", serde_json::json!({ "limit": "ten" }))
            .unwrap_err();
        assert!(matches!(err, OmiError::InvalidArguments(_)));
    }

    #[test]
    fn test_parse_round_trips_name() {
        let request =
            ToolRequest::parse("get-memories-by-type", serde_json::json!({ "type": "fact" }))
                .unwrap();
        assert_eq!(request.name(), "get-memories-by-type");
    }

    #[test]
    fn test_tool_names_are_kebab_case() {
        assert_eq!(ToolRequest::GetRateLimitStatus(EmptyInput {}).name(), "get-rate-limit-status");
        assert_eq!(
            ToolRequest::SearchMemories(SearchInput {
                query: "x".to_string()
            })
            .name(),
            "search-memories"
        );
    }
}

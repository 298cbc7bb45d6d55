//! MCP server exposing the Omi API as tools.
//!
//! Uses the rmcp SDK's macro-based approach for defining tools. Every tool
//! method builds a [`ToolRequest`] and hands it to [`OmiServer::dispatch`],
//! which is the only place API failures are turned into tool results.

use std::sync::Arc;

use omi_client::OmiClient;
use omi_core::{OmiError, OmiResult};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::Serialize;
use serde_json::Value;

use crate::resources::{ActionItemsResource, ConversationsResource, MemoriesResource};
use crate::tools::*;

/// MCP server for Omi memories, action items and conversations.
#[derive(Clone)]
pub struct OmiServer {
    client: Arc<OmiClient>,
    memories: MemoriesResource,
    action_items: ActionItemsResource,
    conversations: ConversationsResource,
    tool_router: ToolRouter<OmiServer>,
}

impl OmiServer {
    /// Run one tool request and render its outcome.
    ///
    /// Success is pretty-printed JSON. Any failure, including argument
    /// validation, becomes an error-flagged result prefixed with `Error: `.
    pub async fn dispatch(&self, request: ToolRequest) -> CallToolResult {
        let tool = request.name();
        tracing::debug!(tool, "Dispatching tool call");

        let outcome = match request.validate() {
            Ok(()) => self.execute(request).await,
            Err(e) => Err(e),
        };
        render(tool, outcome)
    }

    /// Parse a named call with loosely-typed arguments and dispatch it.
    pub async fn call(&self, name: &str, arguments: Value) -> CallToolResult {
        match ToolRequest::parse(name, arguments) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => render::<Value>(name, Err(e)),
        }
    }

    async fn execute(&self, request: ToolRequest) -> OmiResult<Value> {
        match request {
            ToolRequest::GetMemories(input) => {
                to_output(self.memories.get_memories(Some(&input.into())).await?)
            }
            ToolRequest::GetMemory(input) => to_output(self.memories.get_memory(&input.id).await?),
            ToolRequest::CreateMemory(input) => {
                to_output(self.memories.create_memory(&input.into()).await?)
            }
            ToolRequest::UpdateMemory(input) => {
                let id = input.id.clone();
                to_output(self.memories.update_memory(&id, &input.into()).await?)
            }
            ToolRequest::DeleteMemory(input) => {
                self.memories.delete_memory(&input.id).await?;
                deleted(input.id)
            }
            ToolRequest::SearchMemories(input) => {
                to_output(self.memories.search_memories(&input.query).await?)
            }
            ToolRequest::GetMemoriesByType(input) => to_output(
                self.memories
                    .get_memories_by_type(&input.memory_type, Some(&input.page.into()))
                    .await?,
            ),
            ToolRequest::GetActionItems(input) => {
                to_output(self.action_items.get_action_items(Some(&input.into())).await?)
            }
            ToolRequest::GetActionItem(input) => {
                to_output(self.action_items.get_action_item(&input.id).await?)
            }
            ToolRequest::CreateActionItem(input) => {
                to_output(self.action_items.create_action_item(&input.into()).await?)
            }
            ToolRequest::UpdateActionItem(input) => {
                let id = input.id.clone();
                to_output(self.action_items.update_action_item(&id, &input.into()).await?)
            }
            ToolRequest::DeleteActionItem(input) => {
                self.action_items.delete_action_item(&input.id).await?;
                deleted(input.id)
            }
            ToolRequest::GetPendingActionItems(input) => to_output(
                self.action_items
                    .get_pending_action_items(Some(&input.into()))
                    .await?,
            ),
            ToolRequest::GetCompletedActionItems(input) => to_output(
                self.action_items
                    .get_completed_action_items(Some(&input.into()))
                    .await?,
            ),
            ToolRequest::CompleteActionItem(input) => {
                to_output(self.action_items.mark_action_item_complete(&input.id).await?)
            }
            ToolRequest::ReopenActionItem(input) => {
                to_output(self.action_items.mark_action_item_pending(&input.id).await?)
            }
            ToolRequest::GetConversations(input) => {
                to_output(self.conversations.get_conversations(Some(&input.into())).await?)
            }
            ToolRequest::GetConversation(input) => {
                to_output(self.conversations.get_conversation(&input.id).await?)
            }
            ToolRequest::CreateConversation(input) => {
                to_output(self.conversations.create_conversation(&input.into()).await?)
            }
            ToolRequest::UpdateConversation(input) => {
                let id = input.id.clone();
                to_output(self.conversations.update_conversation(&id, &input.into()).await?)
            }
            ToolRequest::DeleteConversation(input) => {
                self.conversations.delete_conversation(&input.id).await?;
                deleted(input.id)
            }
            ToolRequest::GetConversationMessages(input) => {
                to_output(self.conversations.get_conversation_messages(&input.id).await?)
            }
            ToolRequest::SearchConversations(input) => to_output(
                self.conversations
                    .search_conversations(&input.query, Some(&input.page.into()))
                    .await?,
            ),
            ToolRequest::AddMessage(input) => to_output(
                self.conversations
                    .add_message_to_conversation(&input.into())
                    .await?,
            ),
            ToolRequest::GetRateLimitStatus(_) => to_output(self.client.rate_limit_status()),
        }
    }
}

/// Pretty-print a successful outcome, or flag the failure as `Error: ...`.
fn render<T: Serialize>(tool: &str, outcome: OmiResult<T>) -> CallToolResult {
    let text = outcome.and_then(|output| {
        serde_json::to_string_pretty(&output).map_err(OmiError::from)
    });

    match text {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => {
            tracing::warn!(tool, code = e.code().as_str(), error = %e, "Tool call failed");
            CallToolResult::error(vec![Content::text(format!("Error: {e}"))])
        }
    }
}

fn to_output<T: Serialize>(value: T) -> OmiResult<Value> {
    serde_json::to_value(value).map_err(OmiError::from)
}

fn deleted(id: String) -> OmiResult<Value> {
    to_output(DeleteResult { deleted: id })
}

#[tool_router]
impl OmiServer {
    /// Create a server whose facades share `client`.
    pub fn new(client: Arc<OmiClient>) -> Self {
        Self {
            memories: MemoriesResource::new(Arc::clone(&client)),
            action_items: ActionItemsResource::new(Arc::clone(&client)),
            conversations: ConversationsResource::new(Arc::clone(&client)),
            client,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "get-memories",
        description = "List memories with optional limit, offset and sort order. Returns the memories and their count."
    )]
    async fn get_memories(
        &self,
        Parameters(input): Parameters<ListInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::GetMemories(input)).await)
    }

    #[tool(name = "get-memory", description = "Get a single memory by ID.")]
    async fn get_memory(
        &self,
        Parameters(input): Parameters<IdInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::GetMemory(input)).await)
    }

    #[tool(
        name = "create-memory",
        description = "Create a memory with content and an optional type such as \"fact\" or \"preference\"."
    )]
    async fn create_memory(
        &self,
        Parameters(input): Parameters<CreateMemoryInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::CreateMemory(input)).await)
    }

    #[tool(
        name = "update-memory",
        description = "Update the content, type or metadata of a memory. Only the given fields change."
    )]
    async fn update_memory(
        &self,
        Parameters(input): Parameters<UpdateMemoryInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::UpdateMemory(input)).await)
    }

    #[tool(name = "delete-memory", description = "Delete a memory by ID.")]
    async fn delete_memory(
        &self,
        Parameters(input): Parameters<IdInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::DeleteMemory(input)).await)
    }

    #[tool(
        name = "search-memories",
        description = "Case-insensitive text search over the content and type of the 50 most recent memories."
    )]
    async fn search_memories(
        &self,
        Parameters(input): Parameters<SearchInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::SearchMemories(input)).await)
    }

    #[tool(
        name = "get-memories-by-type",
        description = "List memories of one exact type from a single page of results."
    )]
    async fn get_memories_by_type(
        &self,
        Parameters(input): Parameters<MemoriesByTypeInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::GetMemoriesByType(input)).await)
    }

    #[tool(
        name = "get-action-items",
        description = "List action items with optional limit, offset and sort order. Returns the items and their count."
    )]
    async fn get_action_items(
        &self,
        Parameters(input): Parameters<ListInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::GetActionItems(input)).await)
    }

    #[tool(name = "get-action-item", description = "Get a single action item by ID.")]
    async fn get_action_item(
        &self,
        Parameters(input): Parameters<IdInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::GetActionItem(input)).await)
    }

    #[tool(
        name = "create-action-item",
        description = "Create a task with a title and optional description and due date (ISO 8601). New items start as pending."
    )]
    async fn create_action_item(
        &self,
        Parameters(input): Parameters<CreateActionItemInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::CreateActionItem(input)).await)
    }

    #[tool(
        name = "update-action-item",
        description = "Update an action item's title, description, status, due date or metadata. Only the given fields change."
    )]
    async fn update_action_item(
        &self,
        Parameters(input): Parameters<UpdateActionItemInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::UpdateActionItem(input)).await)
    }

    #[tool(name = "delete-action-item", description = "Delete an action item by ID.")]
    async fn delete_action_item(
        &self,
        Parameters(input): Parameters<IdInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::DeleteActionItem(input)).await)
    }

    #[tool(
        name = "get-pending-action-items",
        description = "List the pending action items from a single page of results."
    )]
    async fn get_pending_action_items(
        &self,
        Parameters(input): Parameters<ListInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::GetPendingActionItems(input)).await)
    }

    #[tool(
        name = "get-completed-action-items",
        description = "List the completed action items from a single page of results."
    )]
    async fn get_completed_action_items(
        &self,
        Parameters(input): Parameters<ListInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::GetCompletedActionItems(input)).await)
    }

    #[tool(name = "complete-action-item", description = "Mark an action item as completed.")]
    async fn complete_action_item(
        &self,
        Parameters(input): Parameters<IdInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::CompleteActionItem(input)).await)
    }

    #[tool(name = "reopen-action-item", description = "Mark an action item as pending again.")]
    async fn reopen_action_item(
        &self,
        Parameters(input): Parameters<IdInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::ReopenActionItem(input)).await)
    }

    #[tool(
        name = "get-conversations",
        description = "List conversations with optional limit, offset and sort order. Returns the conversations and their count."
    )]
    async fn get_conversations(
        &self,
        Parameters(input): Parameters<ListInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::GetConversations(input)).await)
    }

    #[tool(
        name = "get-conversation",
        description = "Get a single conversation, including its messages, by ID."
    )]
    async fn get_conversation(
        &self,
        Parameters(input): Parameters<IdInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::GetConversation(input)).await)
    }

    #[tool(
        name = "create-conversation",
        description = "Start a conversation between participants, optionally with a title and an initial message."
    )]
    async fn create_conversation(
        &self,
        Parameters(input): Parameters<CreateConversationInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::CreateConversation(input)).await)
    }

    #[tool(
        name = "update-conversation",
        description = "Update a conversation's title, participants or metadata. Only the given fields change."
    )]
    async fn update_conversation(
        &self,
        Parameters(input): Parameters<UpdateConversationInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::UpdateConversation(input)).await)
    }

    #[tool(name = "delete-conversation", description = "Delete a conversation by ID.")]
    async fn delete_conversation(
        &self,
        Parameters(input): Parameters<IdInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::DeleteConversation(input)).await)
    }

    #[tool(
        name = "get-conversation-messages",
        description = "Get the messages of a conversation in order."
    )]
    async fn get_conversation_messages(
        &self,
        Parameters(input): Parameters<IdInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::GetConversationMessages(input)).await)
    }

    #[tool(
        name = "search-conversations",
        description = "Case-insensitive search over conversation titles and participants on a single page of results."
    )]
    async fn search_conversations(
        &self,
        Parameters(input): Parameters<SearchConversationsInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::SearchConversations(input)).await)
    }

    #[tool(
        name = "add-message",
        description = "Append a message to a conversation. The role defaults to \"user\"."
    )]
    async fn add_message(
        &self,
        Parameters(input): Parameters<AddMessageInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolRequest::AddMessage(input)).await)
    }

    #[tool(
        name = "get-rate-limit-status",
        description = "Show the last rate-limit state reported by the Omi API: remaining requests and the reset time (Unix seconds)."
    )]
    async fn get_rate_limit_status(&self) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(ToolRequest::GetRateLimitStatus(EmptyInput {}))
            .await)
    }
}

#[tool_handler]
impl ServerHandler for OmiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Omi Server - Access to the user's Omi memories, action items and \
                 conversations. Use get-memories or search-memories to recall facts, \
                 create-action-item and complete-action-item to manage tasks, and \
                 get-conversation-messages or add-message to work with conversations. \
                 Failed calls return text starting with \"Error: \"."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cannot render"))
        }
    }

    fn text(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.raw.as_text().map(|t| t.text.clone()))
            .collect()
    }

    #[test]
    fn test_render_success_is_pretty_json() {
        let result = render("get-memory", Ok(serde_json::json!({ "id": "m1" })));
        assert_ne!(result.is_error, Some(true));
        assert_eq!(text(&result), "{\n  \"id\": \"m1\"\n}");
    }

    #[test]
    fn test_render_serialization_failure_is_error_result() {
        let result = render("get-memory", Ok(Unserializable));
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text(&result), "Error: Failed to parse response: cannot render");
    }

    #[test]
    fn test_render_error_is_prefixed() {
        let result = render::<Value>("get-memory", Err(OmiError::ServerError));
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text(&result), "Error: Internal server error");
    }
}

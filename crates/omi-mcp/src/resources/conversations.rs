//! Conversation facade.

use std::sync::Arc;

use omi_client::OmiClient;
use omi_core::{
    Conversation, CreateConversationRequest, CreateMessageRequest, ListParams, Message, OmiResult,
    UpdateConversationRequest,
};
use serde::{Deserialize, Serialize};

/// A page of conversations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationsPage {
    pub conversations: Vec<Conversation>,
    pub total: usize,
}

/// Conversation and message operations over a shared client.
#[derive(Debug, Clone)]
pub struct ConversationsResource {
    client: Arc<OmiClient>,
}

impl ConversationsResource {
    pub fn new(client: Arc<OmiClient>) -> Self {
        Self { client }
    }

    pub async fn get_conversations(
        &self,
        params: Option<&ListParams>,
    ) -> OmiResult<ConversationsPage> {
        let result = self.client.get_conversations(params).await?;
        Ok(ConversationsPage {
            conversations: result.data,
            total: result.total,
        })
    }

    pub async fn get_conversation(&self, id: &str) -> OmiResult<Conversation> {
        self.client.get_conversation(id).await
    }

    pub async fn create_conversation(
        &self,
        request: &CreateConversationRequest,
    ) -> OmiResult<Conversation> {
        self.client.create_conversation(request).await
    }

    pub async fn update_conversation(
        &self,
        id: &str,
        request: &UpdateConversationRequest,
    ) -> OmiResult<Conversation> {
        self.client.update_conversation(id, request).await
    }

    pub async fn delete_conversation(&self, id: &str) -> OmiResult<()> {
        self.client.delete_conversation(id).await
    }

    /// Messages of one conversation, in order.
    pub async fn get_conversation_messages(&self, conversation_id: &str) -> OmiResult<Vec<Message>> {
        let conversation = self.client.get_conversation(conversation_id).await?;
        Ok(conversation.messages.unwrap_or_default())
    }

    pub async fn add_message_to_conversation(
        &self,
        request: &CreateMessageRequest,
    ) -> OmiResult<Message> {
        self.client.create_message(request).await
    }

    /// Case-insensitive search over titles and participants of one fetched
    /// page.
    pub async fn search_conversations(
        &self,
        query: &str,
        params: Option<&ListParams>,
    ) -> OmiResult<Vec<Conversation>> {
        let result = self.client.get_conversations(params).await?;

        let needle = query.to_lowercase();
        Ok(result
            .data
            .into_iter()
            .filter(|conversation| conversation.matches(&needle))
            .collect())
    }
}

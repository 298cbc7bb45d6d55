//! Action item facade.

use std::sync::Arc;

use omi_client::OmiClient;
use omi_core::{
    ActionItem, ActionItemStatus, CreateActionItemRequest, ListParams, OmiResult,
    UpdateActionItemRequest,
};
use serde::{Deserialize, Serialize};

/// A page of action items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItemsPage {
    pub action_items: Vec<ActionItem>,
    pub total: usize,
}

/// Action item operations over a shared client.
#[derive(Debug, Clone)]
pub struct ActionItemsResource {
    client: Arc<OmiClient>,
}

impl ActionItemsResource {
    pub fn new(client: Arc<OmiClient>) -> Self {
        Self { client }
    }

    pub async fn get_action_items(&self, params: Option<&ListParams>) -> OmiResult<ActionItemsPage> {
        let result = self.client.get_action_items(params).await?;
        Ok(ActionItemsPage {
            action_items: result.data,
            total: result.total,
        })
    }

    pub async fn get_action_item(&self, id: &str) -> OmiResult<ActionItem> {
        self.client.get_action_item(id).await
    }

    pub async fn create_action_item(
        &self,
        request: &CreateActionItemRequest,
    ) -> OmiResult<ActionItem> {
        self.client.create_action_item(request).await
    }

    pub async fn update_action_item(
        &self,
        id: &str,
        request: &UpdateActionItemRequest,
    ) -> OmiResult<ActionItem> {
        self.client.update_action_item(id, request).await
    }

    pub async fn delete_action_item(&self, id: &str) -> OmiResult<()> {
        self.client.delete_action_item(id).await
    }

    /// Pending items on one fetched page. Items without a recognized status
    /// are left out.
    pub async fn get_pending_action_items(
        &self,
        params: Option<&ListParams>,
    ) -> OmiResult<Vec<ActionItem>> {
        self.with_status(ActionItemStatus::Pending, params).await
    }

    /// Completed items on one fetched page.
    pub async fn get_completed_action_items(
        &self,
        params: Option<&ListParams>,
    ) -> OmiResult<Vec<ActionItem>> {
        self.with_status(ActionItemStatus::Completed, params).await
    }

    pub async fn mark_action_item_complete(&self, id: &str) -> OmiResult<ActionItem> {
        self.client
            .update_action_item(id, &UpdateActionItemRequest::status(ActionItemStatus::Completed))
            .await
    }

    pub async fn mark_action_item_pending(&self, id: &str) -> OmiResult<ActionItem> {
        self.client
            .update_action_item(id, &UpdateActionItemRequest::status(ActionItemStatus::Pending))
            .await
    }

    async fn with_status(
        &self,
        status: ActionItemStatus,
        params: Option<&ListParams>,
    ) -> OmiResult<Vec<ActionItem>> {
        let result = self.client.get_action_items(params).await?;
        Ok(result
            .data
            .into_iter()
            .filter(|item| item.known_status() == Some(status))
            .collect())
    }
}

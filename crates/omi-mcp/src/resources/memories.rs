//! Memory facade.

use std::sync::Arc;

use omi_client::OmiClient;
use omi_core::{CreateMemoryRequest, ListParams, Memory, OmiResult, UpdateMemoryRequest};
use serde::{Deserialize, Serialize};

/// Page size fetched by [`MemoriesResource::search_memories`].
pub const SEARCH_PAGE_SIZE: u32 = 50;

/// A page of memories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoriesPage {
    pub memories: Vec<Memory>,
    pub total: usize,
}

/// Memory operations over a shared client.
#[derive(Debug, Clone)]
pub struct MemoriesResource {
    client: Arc<OmiClient>,
}

impl MemoriesResource {
    pub fn new(client: Arc<OmiClient>) -> Self {
        Self { client }
    }

    pub async fn get_memories(&self, params: Option<&ListParams>) -> OmiResult<MemoriesPage> {
        let result = self.client.get_memories(params).await?;
        Ok(MemoriesPage {
            memories: result.data,
            total: result.total,
        })
    }

    pub async fn get_memory(&self, id: &str) -> OmiResult<Memory> {
        self.client.get_memory(id).await
    }

    pub async fn create_memory(&self, request: &CreateMemoryRequest) -> OmiResult<Memory> {
        self.client.create_memory(request).await
    }

    pub async fn update_memory(&self, id: &str, request: &UpdateMemoryRequest) -> OmiResult<Memory> {
        self.client.update_memory(id, request).await
    }

    pub async fn delete_memory(&self, id: &str) -> OmiResult<()> {
        self.client.delete_memory(id).await
    }

    /// Case-insensitive search over content and type.
    ///
    /// Only the first [`SEARCH_PAGE_SIZE`] memories are considered; the API
    /// has no server-side search.
    pub async fn search_memories(&self, query: &str) -> OmiResult<Vec<Memory>> {
        let params = ListParams::default().with_limit(SEARCH_PAGE_SIZE);
        let result = self.client.get_memories(Some(&params)).await?;

        let needle = query.to_lowercase();
        Ok(result
            .data
            .into_iter()
            .filter(|memory| memory.matches(&needle))
            .collect())
    }

    /// Memories on one fetched page whose type equals `memory_type` exactly.
    pub async fn get_memories_by_type(
        &self,
        memory_type: &str,
        params: Option<&ListParams>,
    ) -> OmiResult<Vec<Memory>> {
        let result = self.client.get_memories(params).await?;
        Ok(result
            .data
            .into_iter()
            .filter(|memory| memory.memory_type.as_deref() == Some(memory_type))
            .collect())
    }
}

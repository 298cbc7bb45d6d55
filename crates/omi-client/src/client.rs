//! Omi REST API client implementation.

use omi_core::error::{OmiError, OmiResult};
use omi_core::types::{
    normalize_list, ActionItem, Conversation, CreateActionItemRequest, CreateConversationRequest,
    CreateMemoryRequest, CreateMessageRequest, ListParams, ListResult, Memory, Message,
    RateLimitStatus, UpdateActionItemRequest, UpdateConversationRequest, UpdateMemoryRequest,
};
use omi_core::ClientConfig;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::rate_limit::{retry_after_secs, RateLimitTracker};

const MEMORIES: &[&str] = &["user", "memories"];
const ACTION_ITEMS: &[&str] = &["user", "action-items"];
const CONVERSATIONS: &[&str] = &["user", "conversations"];
const MESSAGES: &[&str] = &["messages"];

/// Client for the Omi REST API.
///
/// Holds one authenticated HTTP session and the advisory rate-limit state
/// for the lifetime of the process. Share it behind an `Arc`.
#[derive(Debug)]
pub struct OmiClient {
    client: Client,
    base_url: Url,
    rate_limit: RateLimitTracker,
}

impl OmiClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> OmiResult<Self> {
        config.validate()?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_token()))
            .map_err(|_| OmiError::configuration("API token is not a valid header value"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| OmiError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(config.base_url())
            .map_err(|e| OmiError::configuration(format!("Invalid base URL: {}", e)))?;

        tracing::debug!(
            base_url = %base_url,
            timeout_secs = config.timeout.as_secs(),
            rate_limit_requests = ?config.rate_limit_requests,
            rate_limit_window = ?config.rate_limit_window,
            "Created Omi client"
        );

        Ok(Self {
            client,
            base_url,
            rate_limit: RateLimitTracker::new(config.rate_limit_ceiling()),
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> OmiResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Last rate-limit state reported by the server.
    pub fn rate_limit_status(&self) -> RateLimitStatus {
        self.rate_limit.status()
    }

    // Memories

    /// List memories.
    pub async fn get_memories(&self, params: Option<&ListParams>) -> OmiResult<ListResult<Memory>> {
        self.list(MEMORIES, params).await
    }

    /// Get a memory by ID.
    pub async fn get_memory(&self, id: &str) -> OmiResult<Memory> {
        self.fetch(Method::GET, MEMORIES, Some(id), None::<&()>).await
    }

    /// Create a memory.
    pub async fn create_memory(&self, request: &CreateMemoryRequest) -> OmiResult<Memory> {
        self.fetch(Method::POST, MEMORIES, None, Some(request)).await
    }

    /// Update a memory. Only the fields set on `request` are sent.
    pub async fn update_memory(&self, id: &str, request: &UpdateMemoryRequest) -> OmiResult<Memory> {
        self.fetch(Method::PATCH, MEMORIES, Some(id), Some(request)).await
    }

    /// Delete a memory.
    pub async fn delete_memory(&self, id: &str) -> OmiResult<()> {
        self.delete(MEMORIES, id).await
    }

    // Action items

    /// List action items.
    pub async fn get_action_items(
        &self,
        params: Option<&ListParams>,
    ) -> OmiResult<ListResult<ActionItem>> {
        self.list(ACTION_ITEMS, params).await
    }

    /// Get an action item by ID.
    pub async fn get_action_item(&self, id: &str) -> OmiResult<ActionItem> {
        self.fetch(Method::GET, ACTION_ITEMS, Some(id), None::<&()>).await
    }

    /// Create an action item.
    pub async fn create_action_item(
        &self,
        request: &CreateActionItemRequest,
    ) -> OmiResult<ActionItem> {
        self.fetch(Method::POST, ACTION_ITEMS, None, Some(request)).await
    }

    /// Update an action item. Only the fields set on `request` are sent.
    pub async fn update_action_item(
        &self,
        id: &str,
        request: &UpdateActionItemRequest,
    ) -> OmiResult<ActionItem> {
        self.fetch(Method::PATCH, ACTION_ITEMS, Some(id), Some(request))
            .await
    }

    /// Delete an action item.
    pub async fn delete_action_item(&self, id: &str) -> OmiResult<()> {
        self.delete(ACTION_ITEMS, id).await
    }

    // Conversations

    /// List conversations.
    pub async fn get_conversations(
        &self,
        params: Option<&ListParams>,
    ) -> OmiResult<ListResult<Conversation>> {
        self.list(CONVERSATIONS, params).await
    }

    /// Get a conversation, including its messages.
    pub async fn get_conversation(&self, id: &str) -> OmiResult<Conversation> {
        self.fetch(Method::GET, CONVERSATIONS, Some(id), None::<&()>)
            .await
    }

    /// Create a conversation.
    pub async fn create_conversation(
        &self,
        request: &CreateConversationRequest,
    ) -> OmiResult<Conversation> {
        self.fetch(Method::POST, CONVERSATIONS, None, Some(request))
            .await
    }

    /// Update a conversation. Only the fields set on `request` are sent.
    pub async fn update_conversation(
        &self,
        id: &str,
        request: &UpdateConversationRequest,
    ) -> OmiResult<Conversation> {
        self.fetch(Method::PATCH, CONVERSATIONS, Some(id), Some(request))
            .await
    }

    /// Delete a conversation.
    pub async fn delete_conversation(&self, id: &str) -> OmiResult<()> {
        self.delete(CONVERSATIONS, id).await
    }

    // Messages

    /// Post a message to a conversation.
    pub async fn create_message(&self, request: &CreateMessageRequest) -> OmiResult<Message> {
        self.fetch(Method::POST, MESSAGES, None, Some(request)).await
    }

    /// Build `<base>/<segments>[/<id>]`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str], id: Option<&str>) -> OmiResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| OmiError::configuration("Base URL cannot carry a path"))?;
            path.pop_if_empty().extend(segments);
            if let Some(id) = id {
                path.push(id);
            }
        }
        Ok(url)
    }

    async fn list<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: Option<&ListParams>,
    ) -> OmiResult<ListResult<T>> {
        let mut request = self.client.get(self.endpoint(segments, None)?);
        if let Some(params) = params {
            request = request.query(params);
        }

        let response = self.send(request).await?;
        let body: serde_json::Value = read_json(response).await?;
        normalize_list(body)
    }

    async fn fetch<T, B>(
        &self,
        method: Method,
        segments: &[&str],
        id: Option<&str>,
        body: Option<&B>,
    ) -> OmiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.client.request(method, self.endpoint(segments, id)?);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.send(request).await?;
        read_json(response).await
    }

    async fn delete(&self, segments: &[&str], id: &str) -> OmiResult<()> {
        let request = self.client.delete(self.endpoint(segments, Some(id))?);
        self.send(request).await?;
        Ok(())
    }

    /// Send one request through the rate-limit hooks and map failures.
    ///
    /// Every operation funnels through here. No retries.
    async fn send(&self, request: reqwest::RequestBuilder) -> OmiResult<Response> {
        let request = request.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        self.rate_limit
            .check_before_request(chrono::Utc::now().timestamp());

        tracing::debug!(%method, %path, "Sending Omi API request");

        let response = self.client.execute(request).await.inspect_err(|e| {
            tracing::debug!(%method, %path, error = %e, "Omi API request failed without a response");
        })?;

        self.record_response(&response);

        let status = response.status();
        if status.is_success() {
            tracing::debug!(%method, %path, status = status.as_u16(), "Omi API request succeeded");
            return Ok(response);
        }

        let error = OmiError::from_status(status.as_u16(), retry_after_secs(response.headers()));
        match &error {
            OmiError::RateLimited { retry_after } => {
                tracing::warn!(%method, %path, retry_after, "Rate limited. Retry after {}s", retry_after);
            }
            _ => {
                tracing::debug!(%method, %path, status = status.as_u16(), "Omi API returned an error");
            }
        }
        Err(error)
    }

    /// Post-call state update from the response headers.
    fn record_response(&self, response: &Response) {
        if response.status().is_success() {
            self.rate_limit.record_success(response.headers());
        } else {
            self.rate_limit.record_failure(response.headers());
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> OmiResult<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> OmiClient {
        OmiClient::new(ClientConfig::new("token").with_base_url(base_url)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let client = client("https://api.omi.me/v1");
        assert_eq!(
            client.endpoint(MEMORIES, None).unwrap().as_str(),
            "https://api.omi.me/v1/user/memories"
        );
        assert_eq!(
            client.endpoint(ACTION_ITEMS, Some("a1")).unwrap().as_str(),
            "https://api.omi.me/v1/user/action-items/a1"
        );
        assert_eq!(
            client.endpoint(MESSAGES, None).unwrap().as_str(),
            "https://api.omi.me/v1/messages"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash_base() {
        let client = client("http://localhost:8080/v1/");
        assert_eq!(
            client.endpoint(CONVERSATIONS, Some("c1")).unwrap().as_str(),
            "http://localhost:8080/v1/user/conversations/c1"
        );
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let client = client("https://api.omi.me/v1");
        assert_eq!(
            client.endpoint(MEMORIES, Some("a/b c")).unwrap().as_str(),
            "https://api.omi.me/v1/user/memories/a%2Fb%20c"
        );
    }

    #[test]
    fn test_new_client_starts_with_default_rate_limit() {
        let client = client("https://api.omi.me/v1");
        assert_eq!(
            client.rate_limit_status(),
            RateLimitStatus {
                remaining: 100,
                reset_at: 0
            }
        );
    }

    #[test]
    fn test_empty_token_rejected() {
        let result = OmiClient::new(ClientConfig::new(""));
        assert!(matches!(result, Err(OmiError::Configuration(_))));
    }
}

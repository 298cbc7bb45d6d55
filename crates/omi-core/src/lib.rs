//! omi-core - Core types for the Omi API bridge.
//!
//! This crate provides the entity types, request bodies, list normalization,
//! error taxonomy and client configuration shared by `omi-client` and
//! `omi-mcp`. It performs no I/O.
//!
//! # Example
//!
//! ```ignore
//! use omi_core::{normalize_list, ListResult, Memory};
//!
//! let page: ListResult<Memory> = normalize_list(serde_json::json!({ "data": [] }))?;
//! assert_eq!(page.total, 0);
//! ```

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ErrorCode, OmiError, OmiResult};
pub use types::{
    normalize_list, ActionItem, ActionItemStatus, Conversation, CreateActionItemRequest,
    CreateConversationRequest, CreateMemoryRequest, CreateMessageRequest, ListParams, ListResult,
    Memory, Message, MessageRole, RateLimitStatus, SortOrder, UpdateActionItemRequest,
    UpdateConversationRequest, UpdateMemoryRequest,
};

//! MCP server for the Omi API.
//!
//! Exposes Omi memories, action items and conversations as MCP tools so that
//! MCP clients can read and update them.
//!
//! # Tools
//!
//! - `get-memories`, `get-memory`, `create-memory`, `update-memory`,
//!   `delete-memory`, `search-memories`, `get-memories-by-type`
//! - `get-action-items`, `get-action-item`, `create-action-item`,
//!   `update-action-item`, `delete-action-item`, `get-pending-action-items`,
//!   `get-completed-action-items`, `complete-action-item`,
//!   `reopen-action-item`
//! - `get-conversations`, `get-conversation`, `create-conversation`,
//!   `update-conversation`, `delete-conversation`,
//!   `get-conversation-messages`, `search-conversations`, `add-message`
//! - `get-rate-limit-status`
//!
//! # Configuration
//!
//! The server reads configuration from environment variables (a `.env` file
//! in the working directory is loaded first):
//!
//! - `OMI_API_TOKEN` - Required bearer token for the Omi API
//! - `OMI_API_URL` - Optional, defaults to `https://api.omi.me/v1`
//!
//! # Usage
//!
//! Register the binary in the host's MCP server configuration:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "omi": {
//!       "command": "/path/to/omi-mcp",
//!       "env": { "OMI_API_TOKEN": "your-token" }
//!     }
//!   }
//! }
//! ```

pub mod resources;
pub mod server;
pub mod tools;

pub use server::OmiServer;

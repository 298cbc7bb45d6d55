//! omi-client - Client library for the Omi REST API.
//!
//! This crate provides [`OmiClient`], the only component that talks to the
//! network. It tracks the server's rate-limit headers, normalizes list
//! responses and maps HTTP failures onto [`OmiError`].
//!
//! # Example
//!
//! ```ignore
//! use omi_client::{ClientConfig, OmiClient};
//! use omi_core::CreateActionItemRequest;
//!
//! let client = OmiClient::new(ClientConfig::new("your-api-token"))?;
//!
//! // Create a task
//! let item = client.create_action_item(&CreateActionItemRequest::new("Pay rent")).await?;
//!
//! // Inspect the advisory rate-limit state
//! let status = client.rate_limit_status();
//! ```

mod client;
pub mod rate_limit;

pub use client::OmiClient;
pub use omi_core::{ClientConfig, OmiError, OmiResult, RateLimitStatus};
pub use rate_limit::RateLimitTracker;

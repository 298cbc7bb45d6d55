//! Per-entity facades over [`OmiClient`](omi_client::OmiClient).
//!
//! Each call delegates to exactly one client call, optionally followed by a
//! local filter over the page it fetched. Errors pass through untouched.

mod action_items;
mod conversations;
mod memories;

pub use action_items::{ActionItemsPage, ActionItemsResource};
pub use conversations::{ConversationsPage, ConversationsResource};
pub use memories::{MemoriesPage, MemoriesResource, SEARCH_PAGE_SIZE};

// src/notion/mod.rs
pub mod client;
pub mod types;

use serde_json::Value;

use crate::error::FetchError;

pub use client::{NotionClient, UpstreamReply, MAX_PAGE_SIZE};
pub use types::{Block, RichText, TableRow};

/// Notion ids are 32 hex digits, with or without dashes. Anything else never reaches the URL.
pub fn is_valid_block_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 64 && id.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

/// Clamp a requested page size into what the block-children endpoint accepts.
pub fn clamp_page_size(n: u32) -> u32 {
    n.clamp(1, MAX_PAGE_SIZE)
}

/// Where table blocks come from. `NotionClient` is the live implementation.
#[async_trait::async_trait]
pub trait TableSource: Send + Sync {
    /// One page of children of `block_id`, as the raw JSON body.
    async fn fetch_block_children(&self, block_id: &str, page_size: u32)
        -> Result<Value, FetchError>;

    fn name(&self) -> &'static str;
}

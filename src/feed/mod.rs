pub mod custom_search;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use types::SearchResult;

/// Runs one query and returns hits in provider rank order.
#[async_trait]
pub trait SearchFeed: Send + Sync {
    async fn search(&mut self, term: &str) -> Result<Vec<SearchResult>>;
}

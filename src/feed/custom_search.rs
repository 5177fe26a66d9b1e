use super::types::*;
use super::SearchFeed;
use crate::config::{Credentials, SearchConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct CustomSearch {
    client: Client,
    endpoint: String,
    api_key: String,
    engine_id: String,
    num_results: u8,
}

impl CustomSearch {
    pub fn new(config: &SearchConfig, credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("failed to build search HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: credentials.api_key.clone(),
            engine_id: credentials.engine_id.clone(),
            num_results: config.num_results,
        })
    }
}

/// Parse a Custom Search response body. Items without a link are dropped.
pub fn parse_search_response(json: &str) -> Result<Vec<SearchResult>> {
    let response: CustomSearchResponse = serde_json::from_str(json)
        .context("failed to parse custom search response")?;

    let results = response
        .items
        .into_iter()
        .filter_map(|item| {
            let link = item.link.filter(|l| !l.is_empty())?;
            Some(SearchResult {
                title: item.title,
                link,
                description: item.snippet,
            })
        })
        .collect();

    Ok(results)
}

#[async_trait]
impl SearchFeed for CustomSearch {
    async fn search(&mut self, term: &str) -> Result<Vec<SearchResult>> {
        let num = self.num_results.to_string();
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", term),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .context("custom search request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("custom search ({}): {}", status, body);
        }

        let text = resp.text().await.context("custom search response read failed")?;
        parse_search_response(&text)
    }
}

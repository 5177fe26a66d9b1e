use super::AlertSink;
use crate::config::WebhookConfig;
use crate::feed::types::SearchResult;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// Discord rejects message content longer than this.
pub const MAX_MESSAGE_CHARS: usize = 2000;
pub const MAX_DESCRIPTION_CHARS: usize = 200;
const ELLIPSIS: &str = "...";

/// A chat message body plus how many results made it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAlert {
    pub content: String,
    pub included: usize,
    pub omitted: usize,
}

/// Cut a description to `MAX_DESCRIPTION_CHARS` characters, marking the cut.
pub fn truncate_description(description: &str) -> String {
    match description.char_indices().nth(MAX_DESCRIPTION_CHARS) {
        Some((cut, _)) => format!("{}{}", &description[..cut], ELLIPSIS),
        None => description.to_string(),
    }
}

fn alert_header(term: &str) -> String {
    let header = format!("**New results found for search term: {}**\n\n", term);
    match header.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((cut, _)) => header[..cut].to_string(),
        None => header,
    }
}

fn alert_entry(rank: usize, result: &SearchResult) -> String {
    format!(
        "**{}. [{}]({})**\n{}\n\n",
        rank,
        result.display_title(),
        result.link,
        truncate_description(result.display_description()),
    )
}

/// Build the chat body: a header naming the term, then one entry per result
/// until the next entry would push the body past `MAX_MESSAGE_CHARS`.
pub fn format_alert(term: &str, results: &[SearchResult]) -> ChatAlert {
    let mut content = alert_header(term);
    let mut len = content.chars().count();
    let mut included = 0;

    for (idx, result) in results.iter().enumerate() {
        let entry = alert_entry(idx + 1, result);
        let entry_len = entry.chars().count();
        if len + entry_len > MAX_MESSAGE_CHARS {
            break;
        }
        content.push_str(&entry);
        len += entry_len;
        included += 1;
    }

    ChatAlert {
        content,
        included,
        omitted: results.len() - included,
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

pub struct DiscordWebhook {
    client: Client,
    url: String,
}

impl DiscordWebhook {
    pub fn new(url: &str, config: &WebhookConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("failed to build webhook HTTP client")?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl AlertSink for DiscordWebhook {
    async fn deliver(&self, content: &str) -> Result<()> {
        let resp = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { content })
            .send()
            .await
            .context("webhook request failed")?;

        let status = resp.status();
        if status != StatusCode::NO_CONTENT {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("webhook delivery failed ({}): {}", status, body);
        }
        Ok(())
    }
}

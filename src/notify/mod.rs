pub mod discord;
pub mod markdown_log;

use anyhow::Result;
use async_trait::async_trait;

/// Delivers a formatted chat alert somewhere a human will see it.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn deliver(&self, content: &str) -> Result<()>;
}

/// `--dry-run` sink: logs the alert instead of posting it.
pub struct LogOnlySink;

#[async_trait]
impl AlertSink for LogOnlySink {
    async fn deliver(&self, content: &str) -> Result<()> {
        tracing::info!(chars = content.chars().count(), "DRY RUN: would send alert:\n{}", content);
        Ok(())
    }
}

// Shared fakes for integration tests.
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use search_watch::feed::types::SearchResult;
use search_watch::feed::SearchFeed;
use search_watch::notify::AlertSink;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Replays queued batches; `None` simulates a failed request.
/// Once the queue runs dry every call returns no results.
#[derive(Clone, Default)]
pub struct ScriptedFeed {
    batches: Arc<Mutex<VecDeque<Option<Vec<SearchResult>>>>>,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedFeed {
    pub fn new(batches: Vec<Option<Vec<SearchResult>>>) -> Self {
        Self {
            batches: Arc::new(Mutex::new(batches.into())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchFeed for ScriptedFeed {
    async fn search(&mut self, _term: &str) -> Result<Vec<SearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(Some(results)) => Ok(results),
            Some(None) => anyhow::bail!("custom search (500 Internal Server Error): boom"),
            None => Ok(Vec::new()),
        }
    }
}

/// Records every delivered alert. Optionally fails, and optionally records
/// whether a file existed at delivery time.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub sent: Arc<Mutex<Vec<String>>>,
    fail: bool,
    watch_path: Option<PathBuf>,
    pub path_existed: Arc<AtomicBool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn watching(path: PathBuf) -> Self {
        Self {
            watch_path: Some(path),
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn deliver(&self, content: &str) -> Result<()> {
        if let Some(path) = &self.watch_path {
            self.path_existed.store(path.exists(), Ordering::SeqCst);
        }
        self.sent.lock().unwrap().push(content.to_string());
        if self.fail {
            anyhow::bail!("webhook delivery failed (400 Bad Request): nope");
        }
        Ok(())
    }
}

pub fn sample_results() -> Vec<SearchResult> {
    vec![
        SearchResult::new("https://example.com/one")
            .with_title("One")
            .with_description("first result"),
        SearchResult::new("https://example.com/two")
            .with_title("Two")
            .with_description("second result"),
        SearchResult::new("https://example.com/three")
            .with_title("Three")
            .with_description("third result"),
    ]
}

use crate::engine::{partition, SeenLinkStore, SeenSet};
use crate::feed::SearchFeed;
use crate::notify::discord::format_alert;
use crate::notify::markdown_log::MarkdownLog;
use crate::notify::AlertSink;
use anyhow::Result;

/// What one cycle did, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub new_results: usize,
    pub logged: bool,
    pub persisted: bool,
    pub alert_included: usize,
    pub alert_delivered: bool,
}

/// One search → filter → notify → persist pass, plus the seen-set it works
/// against. The seen-set lives here for the life of the process.
pub struct Pipeline {
    term: String,
    feed: Box<dyn SearchFeed>,
    sink: Box<dyn AlertSink>,
    store: SeenLinkStore,
    log: MarkdownLog,
    seen: SeenSet,
    /// In-memory set is ahead of the cache file.
    dirty: bool,
}

impl Pipeline {
    /// Loads the seen-set from `store`; a malformed cache is an error.
    pub fn new(
        term: impl Into<String>,
        feed: Box<dyn SearchFeed>,
        sink: Box<dyn AlertSink>,
        store: SeenLinkStore,
        log: MarkdownLog,
    ) -> Result<Self> {
        let seen = store.load()?;
        tracing::info!(
            cache = %store.path().display(),
            seen = seen.len(),
            "loaded seen links"
        );
        Ok(Self {
            term: term.into(),
            feed,
            sink,
            store,
            log,
            seen,
            dirty: false,
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub async fn run_cycle(&mut self) -> CycleReport {
        tracing::info!(term = %self.term, "checking for updates");

        let results = match self.feed.search(&self.term).await {
            Ok(results) => results,
            Err(e) => {
                tracing::error!("search failed, treating as no results: {:#}", e);
                Vec::new()
            }
        };

        let mut report = CycleReport {
            fetched: results.len(),
            ..CycleReport::default()
        };

        let (new_results, updated) = partition(results, std::mem::take(&mut self.seen));
        self.seen = updated;
        report.new_results = new_results.len();

        if new_results.is_empty() {
            tracing::info!(fetched = report.fetched, "no new content");
            if self.dirty {
                report.persisted = self.persist();
            }
            return report;
        }

        tracing::info!(count = new_results.len(), "new content found");
        self.dirty = true;

        let now = chrono::Local::now().naive_local();
        match self.log.append(&new_results, now) {
            Ok(()) => {
                report.logged = true;
                tracing::info!(
                    count = new_results.len(),
                    path = %self.log.path().display(),
                    "logged new results"
                );
            }
            Err(e) => tracing::error!("failed to write results log: {:#}", e),
        }

        // Persist before alerting so an interrupted cycle cannot re-alert.
        report.persisted = self.persist();

        let alert = format_alert(&self.term, &new_results);
        report.alert_included = alert.included;
        if alert.omitted > 0 {
            tracing::info!(
                included = alert.included,
                omitted = alert.omitted,
                "alert exceeds message limit, truncating"
            );
        }
        match self.sink.deliver(&alert.content).await {
            Ok(()) => {
                report.alert_delivered = true;
                tracing::info!("alert sent");
            }
            Err(e) => tracing::error!("failed to send alert: {:#}", e),
        }

        report
    }

    fn persist(&mut self) -> bool {
        match self.store.save(&self.seen) {
            Ok(()) => {
                self.dirty = false;
                true
            }
            Err(e) => {
                tracing::error!(
                    seen = self.seen.len(),
                    "failed to save seen links, will retry next cycle: {:#}",
                    e
                );
                false
            }
        }
    }
}

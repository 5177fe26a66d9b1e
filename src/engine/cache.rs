use super::novelty::SeenSet;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// On-disk form: `{"seen_links": [...]}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheSnapshot {
    #[serde(default)]
    seen_links: Vec<String>,
}

/// Durable home of the seen-set. Read once at startup, overwritten whole.
#[derive(Debug, Clone)]
pub struct SeenLinkStore {
    path: PathBuf,
}

impl SeenLinkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty set. A file that exists but does not parse
    /// is an error.
    pub fn load(&self) -> Result<SeenSet> {
        if !self.path.exists() {
            return Ok(SeenSet::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read cache file: {}", self.path.display()))?;
        let snapshot: CacheSnapshot = serde_json::from_str(&content).with_context(|| {
            format!(
                "Cache file {} is malformed; fix or remove it to continue",
                self.path.display()
            )
        })?;
        Ok(snapshot.seen_links.into_iter().collect())
    }

    /// Write to a sibling temp file, then rename over the target.
    pub fn save(&self, seen: &SeenSet) -> Result<()> {
        let snapshot = CacheSnapshot {
            seen_links: seen.links().to_vec(),
        };
        let json = serde_json::to_string(&snapshot).context("failed to serialize cache")?;

        let tmp = self.temp_path();
        let result = write_synced(&tmp, json.as_bytes())
            .with_context(|| format!("Failed to write cache temp file: {}", tmp.display()))
            .and_then(|()| {
                std::fs::rename(&tmp, &self.path).with_context(|| {
                    format!("Failed to move cache into place: {}", self.path.display())
                })
            });
        if result.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        result
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cache".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Contents are on disk before this returns.
fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

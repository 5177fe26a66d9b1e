use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const ENV_FILE: &str = ".env";

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Non-secret settings. Every field has a default so the file is optional.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_num_results")]
    pub num_results: u8,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_search_endpoint() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}
fn default_num_results() -> u8 { 10 }
fn default_timeout_ms() -> u64 { 10_000 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            num_results: default_num_results(),
            request_timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebhookConfig {
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_cache_path")]
    pub cache_path: String,
    #[serde(default = "default_log_path")]
    pub log_path: String,
}

fn default_cache_path() -> String { "poc_cache.json".to_string() }
fn default_log_path() -> String { "poc_monitor_log.md".to_string() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path(),
            log_path: default_log_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    #[serde(default = "default_check_interval")]
    pub check_interval_s: u64,
}

fn default_check_interval() -> u64 { 14_400 }

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval_s: default_check_interval(),
        }
    }
}

impl MonitorConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_s)
    }
}

/// Secrets and the search term. Only ever sourced from the environment.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub engine_id: String,
    pub webhook_url: Option<String>,
    pub search_term: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("engine_id", &self.engine_id)
            .field("webhook_url", &self.webhook_url.as_ref().map(|_| "<redacted>"))
            .field("search_term", &self.search_term)
            .finish()
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        config.search.num_results = config.search.num_results.clamp(1, 10);
        if config.monitor.check_interval_s == 0 {
            anyhow::bail!("monitor.check_interval_s must be greater than zero");
        }
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Apply `CHECK_INTERVAL` from the environment, if set.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(raw) = env_var("CHECK_INTERVAL") {
            self.monitor.check_interval_s = parse_interval(&raw)?;
        }
        Ok(())
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        Self::load_env_from(Path::new(ENV_FILE));
    }

    /// Returns false if the file is absent or unreadable.
    pub fn load_env_from(path: &Path) -> bool {
        match dotenvy::from_path(path) {
            Ok(()) => true,
            Err(e) if e.not_found() => false,
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to load env file: {}", e);
                false
            }
        }
    }

    /// Credentials come from environment variables only; a missing one is fatal.
    /// The webhook URL may be omitted when alerts are not being delivered.
    pub fn credentials(require_webhook: bool) -> Result<Credentials> {
        let webhook_url = env_var("DISCORD_WEBHOOK_URL");
        if require_webhook && webhook_url.is_none() {
            anyhow::bail!("DISCORD_WEBHOOK_URL is not set");
        }
        Ok(Credentials {
            api_key: required_env("GOOGLE_API_KEY")?,
            engine_id: required_env("SEARCH_ENGINE_ID")?,
            webhook_url,
            search_term: required_env("SEARCH_TERM")?,
        })
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| sanitize_key(&v))
        .filter(|v| !v.is_empty())
}

fn required_env(key: &str) -> Result<String> {
    env_var(key).with_context(|| format!("{} is not set", key))
}

fn parse_interval(raw: &str) -> Result<u64> {
    let secs: u64 = raw
        .parse()
        .with_context(|| format!("CHECK_INTERVAL must be a whole number of seconds, got {:?}", raw))?;
    if secs == 0 {
        anyhow::bail!("CHECK_INTERVAL must be greater than zero");
    }
    Ok(secs)
}

/// Strip carriage returns, BOM, and other invisible chars from a key/path value.
fn sanitize_key(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}

use anyhow::Result;
use clap::Parser;
use search_watch::config::{Config, DEFAULT_CONFIG_PATH};
use search_watch::engine::SeenLinkStore;
use search_watch::feed::custom_search::CustomSearch;
use search_watch::monitor::Monitor;
use search_watch::notify::discord::DiscordWebhook;
use search_watch::notify::markdown_log::MarkdownLog;
use search_watch::notify::{AlertSink, LogOnlySink};
use search_watch::pipeline::Pipeline;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "search-watch", about = "Alert on new web search results for a term")]
struct Cli {
    /// Run a single check and exit
    #[arg(long)]
    once: bool,
    /// Log alerts instead of posting them to the webhook
    #[arg(long)]
    dry_run: bool,
    /// Path to config TOML file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("search_watch=info")),
        )
        .init();

    let args = Cli::parse();

    // Load saved keys from .env (real env vars take precedence)
    Config::load_env_file();

    let mut config = Config::load_or_default(&args.config)?;
    config.apply_env_overrides()?;
    let credentials = Config::credentials(!args.dry_run)?;

    let feed = CustomSearch::new(&config.search, &credentials)?;
    let sink: Box<dyn AlertSink> = match (&credentials.webhook_url, args.dry_run) {
        (Some(url), false) => Box::new(DiscordWebhook::new(url, &config.webhook)?),
        _ => {
            tracing::warn!("dry run: alerts will be logged, not sent");
            Box::new(LogOnlySink)
        }
    };

    let pipeline = Pipeline::new(
        credentials.search_term.clone(),
        Box::new(feed),
        sink,
        SeenLinkStore::new(&config.storage.cache_path),
        MarkdownLog::new(&config.storage.log_path),
    )?;
    let mut monitor = Monitor::new(pipeline, config.monitor.check_interval());

    if args.once {
        let report = monitor.run_once().await;
        tracing::info!(?report, "single cycle complete");
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl-C: {:#}", e);
                // Keep the sender alive so the loop does not read a closed channel as shutdown.
                std::future::pending::<()>().await;
            }
        }
    });

    tracing::info!(
        term = %monitor.pipeline().term(),
        interval_s = config.monitor.check_interval_s,
        "monitoring started"
    );
    monitor.run(shutdown_rx).await;
    tracing::info!("Monitoring stopped by user.");

    Ok(())
}

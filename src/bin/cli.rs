//! Bibliography crawler CLI
//!
//! Local execution entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use bibcrawler::{
    browser::HttpSession,
    error::{AppError, Result},
    inspector::PdfInspector,
    models::{Config, CrawlResult, SearchLevel, parse_book_list},
    pipeline::Engine,
    services::{QueryPlanner, SeenRegistry, Validator},
    storage::DownloadStore,
    utils::report,
};

/// bibcrawler - Bibliography PDF Crawler
#[derive(Parser, Debug)]
#[command(
    name = "bibcrawler",
    version,
    about = "Finds and downloads full-text PDFs for a bibliography"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search and download a document for every entry of a list
    Crawl {
        /// Bibliography file, one entry per line
        #[arg(short, long, default_value = "data/bibliografia.txt")]
        list: PathBuf,

        /// Search depth: quick, moderate or thorough
        #[arg(long)]
        level: Option<SearchLevel>,

        /// Run a second pass over the terms that failed
        #[arg(long)]
        retry: bool,

        /// Write the final result as JSON to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Download directory (overrides the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum page count (overrides the config)
        #[arg(long)]
        min_pages: Option<usize>,

        /// Fraction of term words that must be found (overrides the config)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Show the queries planned for a term
    Plan {
        /// Bibliography entry
        term: String,
    },

    /// Validate an existing document
    Check {
        /// Document to inspect
        file: PathBuf,

        /// Entry the document should match
        #[arg(short, long)]
        term: Option<String>,
    },

    /// Validate the configuration file
    Validate,

    /// Delete the download directory
    Clean,
}

/// Initialize logging based on the configured level.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Load the config file, logging rather than failing when it is unusable.
fn load_config(path: &Path, verbose: bool) -> Config {
    let loaded = path.exists().then(|| Config::load(path));

    let level = match (&loaded, verbose) {
        (_, true) => "debug".to_string(),
        (Some(Ok(config)), false) => config.logging.level.clone(),
        _ => "info".to_string(),
    };
    init_logging(&level);

    match loaded {
        Some(Ok(config)) => {
            log::info!("Loaded configuration from {}", path.display());
            config
        }
        Some(Err(e)) => {
            log::warn!(
                "Config load failed from {}: {}. Using defaults.",
                path.display(),
                e
            );
            Config::default()
        }
        None => {
            log::info!("No config at {}, using defaults", path.display());
            Config::default()
        }
    }
}

/// Cancel `token` on Ctrl-C.
fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, stopping after the current step...");
            token.cancel();
        }
    });
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config, cli.verbose);

    match cli.command {
        Command::Crawl {
            list,
            level,
            retry,
            report: report_path,
            output,
            min_pages,
            threshold,
        } => {
            if let Some(dir) = output {
                config.paths.download_dir = dir;
            }
            if let Some(min_pages) = min_pages {
                config.validation.min_pages = min_pages;
            }
            if let Some(threshold) = threshold {
                config.validation.match_threshold = threshold;
            }
            config.validate()?;

            let text = tokio::fs::read_to_string(&list).await?;
            let terms = parse_book_list(&text);
            if terms.is_empty() {
                return Err(AppError::config(format!(
                    "No bibliography entries in {}",
                    list.display()
                )));
            }
            let level = level.unwrap_or(config.search.level);

            let config = Arc::new(config);
            let session = Arc::new(HttpSession::new(&config.crawler)?);
            let engine = Engine::new(Arc::clone(&config), session, Arc::new(PdfInspector::new()));

            let cancel = CancellationToken::new();
            cancel_on_interrupt(cancel.clone());

            report::header("Bibliography crawl");
            report::sub_item(&format!("Entries: {}", terms.len()));
            report::sub_item(&format!("Level: {}", level));
            report::sub_item(&format!(
                "Download directory: {}",
                config.paths.download_dir.display()
            ));

            let first = engine.run(&terms, level, &cancel).await;
            let result = if retry && !first.failures.is_empty() && !first.is_cancelled() {
                report::crawl_report("First pass", &first);
                report::separator();
                let second = engine.retry(&first.failures, level, &cancel).await;
                CrawlResult::after_retry(&first, &second)
            } else {
                first
            };

            report::separator();
            report::crawl_report("Crawl", &result);

            if let Some(path) = report_path {
                let json = serde_json::to_string_pretty(&result)?;
                tokio::fs::write(&path, json).await?;
                log::info!("Report saved to {}", path.display());
            }
        }

        Command::Plan { term } => {
            let queries = QueryPlanner::new(&config.search).plan(&term);
            report::header(&format!("{} queries", queries.len()));
            for (i, query) in queries.iter().enumerate() {
                report::sub_item(&format!("{:>2}. {}", i + 1, query));
            }
        }

        Command::Check { file, term } => {
            let validator = Validator::new(
                Arc::new(PdfInspector::new()),
                config.validation.clone(),
                Arc::new(SeenRegistry::new()),
            );
            let outcome = validator.validate(&file, term.as_deref()).await?;

            report::summary(
                &file.display().to_string(),
                &[
                    ("Accepted", outcome.accepted.to_string()),
                    ("Reason", outcome.reason.to_string()),
                    ("Pages", outcome.page_count.to_string()),
                    (
                        "Matched",
                        format!("{:.0}%", outcome.matched_fraction * 100.0),
                    ),
                ],
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }

        Command::Clean => {
            let store = DownloadStore::new(&config.paths.download_dir);
            store.clear().await?;
            log::info!("Removed {}", store.root().display());
        }
    }

    Ok(())
}

//! wtmdb - terminal movie browser backed by TMDB.

/// Application configuration (TOML).
mod config;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};
use wtmdb_api::tmdb::TmdbClient;
use wtmdb_tui::{BrowserOptions, SortMode, run_browser};

/// Environment variable holding the TMDB API key.
const API_KEY_ENV: &str = "TMDB_API_KEY";

/// CLI argument parser.
#[derive(Parser, Debug, Default)]
#[command(name = "wtmdb", about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Start with this search query instead of the popular list.
    #[arg(long)]
    query: Option<String>,

    /// Initial sort mode (title, rating, or date).
    #[arg(long)]
    sort: Option<SortMode>,

    /// TMDB response language (e.g. "en-US").
    #[arg(long)]
    language: Option<String>,

    /// Write logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Effective settings after merging CLI, environment, and config file.
#[derive(Debug, PartialEq, Eq)]
struct Settings {
    api_key: String,
    language: Option<String>,
    base_url: Option<Url>,
    log_file: Option<PathBuf>,
    browser: BrowserSettings,
}

/// Browser startup settings.
#[derive(Debug, PartialEq, Eq)]
struct BrowserSettings {
    initial_query: String,
    sort: SortMode,
    debounce: Duration,
}

impl From<BrowserSettings> for BrowserOptions {
    fn from(s: BrowserSettings) -> Self {
        Self {
            initial_query: s.initial_query,
            sort: s.sort,
            debounce: s.debounce,
        }
    }
}

/// Merges CLI flags, the API key environment value, and the config file.
///
/// CLI flags win over the file; a non-empty `env_key` wins over
/// `tmdb.api_key`.
///
/// # Errors
///
/// Returns an error if no API key is available, or if the configured sort
/// mode or base URL is invalid.
fn resolve_settings(
    cli: Cli,
    config: AppConfig,
    env_key: Option<String>,
    config_path: &Path,
) -> Result<Settings> {
    let Some(api_key) = env_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| config.tmdb.api_key.filter(|k| !k.trim().is_empty()))
    else {
        bail!(
            "TMDB API key not found: set {API_KEY_ENV} or tmdb.api_key in {}",
            config_path.display()
        );
    };

    let sort = match (cli.sort, config.browser.sort) {
        (Some(sort), _) => sort,
        (None, Some(name)) => name
            .parse()
            .with_context(|| format!("invalid browser.sort in {}", config_path.display()))?,
        (None, None) => SortMode::default(),
    };

    let base_url = config
        .tmdb
        .base_url
        .map(|u| Url::parse(&u).with_context(|| format!("invalid tmdb.base_url '{u}'")))
        .transpose()?;

    Ok(Settings {
        api_key,
        language: cli.language.or(config.tmdb.language),
        base_url,
        log_file: cli.log_file.or(config.log.file),
        browser: BrowserSettings {
            initial_query: cli.query.unwrap_or_default(),
            sort,
            debounce: Duration::from_millis(config.browser.debounce_ms),
        },
    })
}

/// Log sink: the log file when configured, otherwise discarded.
///
/// The browser owns the terminal, so nothing is written to stdout or stderr.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
fn log_writer(log_file: Option<&Path>) -> Result<BoxMakeWriter> {
    let Some(path) = log_file else {
        return Ok(BoxMakeWriter::new(std::io::sink));
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    Ok(BoxMakeWriter::new(Mutex::new(file)))
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let writer = log_writer(log_file)?;

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    Ok(())
}

/// Builds the TMDB client from resolved settings.
///
/// # Errors
///
/// Returns an error if the client fails to build.
fn build_tmdb_client(settings: &Settings) -> Result<TmdbClient> {
    let mut builder = TmdbClient::builder()
        .api_key(settings.api_key.as_str())
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
    if let Some(language) = &settings.language {
        builder = builder.language(language.as_str());
    }
    if let Some(url) = &settings.base_url {
        builder = builder.base_url(url.clone());
    }
    builder.build().context("failed to build TMDB client")
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the browser fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path =
        resolve_config_path(cli.dir.as_ref()).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    let settings = resolve_settings(cli, config, std::env::var(API_KEY_ENV).ok(), &config_path)?;

    init_tracing(settings.log_file.as_deref())?;
    tracing::info!(
        config = %config_path.display(),
        sort = %settings.browser.sort,
        language = settings.language.as_deref().unwrap_or("-"),
        "starting wtmdb"
    );

    let client = build_tmdb_client(&settings)?;
    let options = BrowserOptions::from(settings.browser);
    let result = run_browser(Arc::new(client), options).await;
    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "browser exited with error");
    }
    result
}

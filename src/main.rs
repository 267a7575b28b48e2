//! CLI entry point for the comments statistics pipeline.
//!
//! Runs fetch → persist → analyze → report with no arguments required.
//! Flags and environment variables only override the defaults.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use comment_stats::config::{
    Config, DEFAULT_CALENDAR_ANCHOR, DEFAULT_MOCK_COUNT, DEFAULT_SEED, DEFAULT_TIMEOUT_SECS,
};
use comment_stats::pipeline;
use comment_stats::source::DEFAULT_URL;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "comment_stats")]
#[command(about = "Fetch public comments, compute statistics and render charts", long_about = None)]
struct Cli {
    /// Endpoint returning a JSON array of comments
    #[arg(long, env = "COMMENTS_API_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Seconds before the live fetch gives up and synthetic data is used
    #[arg(long, env = "COMMENTS_FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Directory to write JSON, CSV and SVG files into
    #[arg(short, long, env = "COMMENTS_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Number of synthetic comments generated on fallback
    #[arg(long, env = "COMMENTS_MOCK_COUNT", default_value_t = DEFAULT_MOCK_COUNT)]
    mock_count: usize,

    /// Seed for synthetic comments and synthetic dates
    #[arg(long, env = "COMMENTS_MOCK_SEED", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// First day of the synthetic date window (YYYY-MM-DD)
    #[arg(long, env = "COMMENTS_CALENDAR_ANCHOR", default_value = DEFAULT_CALENDAR_ANCHOR)]
    calendar_anchor: NaiveDate,

    /// Skip synthetic dates and the weekly breakdown
    #[arg(long, default_value_t = false)]
    no_calendar: bool,

    /// Skip chart rendering
    #[arg(long, default_value_t = false)]
    no_charts: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            api_url: cli.url,
            timeout: Duration::from_secs(cli.timeout),
            output_dir: cli.output_dir,
            mock_count: cli.mock_count,
            seed: cli.seed,
            calendar_anchor: (!cli.no_calendar).then_some(cli.calendar_anchor),
            charts: !cli.no_charts,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/comment_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("comment_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let config = Config::from(Cli::parse());
    info!(
        url = %config.api_url,
        output_dir = %config.output_dir.display(),
        timeout_secs = config.timeout.as_secs(),
        "Starting comments pipeline"
    );

    let outcome = match pipeline::run(&config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "Pipeline aborted");
            return Err(e).context("comments pipeline failed");
        }
    };

    println!("{}", outcome.report);
    println!("Generated files:");
    for path in &outcome.files {
        println!("  {}", path.display());
    }

    info!(
        origin = %outcome.origin,
        records = outcome.records,
        "Finished"
    );
    Ok(())
}

//! The fixed fetch → persist → analyze → report sequence.

use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::analyzers::analyzer::analyze;
use crate::chart::{ChartSink, SvgChartSink};
use crate::config::{Config, RAW_JSON_FILE, RECORDS_CSV_FILE, SUMMARY_CSV_FILE};
use crate::enrich::{SyntheticCalendar, enrich_all};
use crate::error::{PipelineError, Result};
use crate::fetch::{BasicClient, HttpClient};
use crate::output::{print_pretty, write_groups_csv, write_json, write_records_csv, write_summary_csv};
use crate::report::{chart_series, format_report, summary_metrics};
use crate::source::{CommentSource, FetchedComments, Origin};

/// What a completed run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub origin: Origin,
    pub records: usize,
    /// Every file written, in write order.
    pub files: Vec<PathBuf>,
    /// Console report text.
    pub report: String,
}

/// Runs the whole pipeline against the configured endpoint.
pub async fn run(config: &Config) -> Result<RunOutcome> {
    let fetched = match BasicClient::with_timeout(config.timeout) {
        Ok(client) => fetch_with(config, client).await,
        Err(e) => {
            warn!(error = %e, "HTTP client unavailable, using synthetic comments");
            FetchedComments::synthetic(config.mock_count, config.seed)
        }
    };
    process(config, fetched)
}

/// Fetch stage with a caller-provided transport.
pub async fn fetch_with<C: HttpClient>(config: &Config, client: C) -> FetchedComments {
    CommentSource::new(client, &config.api_url, config.mock_count, config.seed)
        .fetch()
        .await
}

/// Every stage after the fetch. Stops at the first failing stage; files
/// already written stay on disk.
#[tracing::instrument(skip_all, fields(origin = %fetched.origin, records = fetched.comments.len()))]
pub fn process(config: &Config, fetched: FetchedComments) -> Result<RunOutcome> {
    let mut files = Vec::new();

    fs::create_dir_all(&config.output_dir)
        .map_err(|e| PipelineError::persistence(&config.output_dir, e))?;

    let raw_path = config.output_path(RAW_JSON_FILE);
    write_json(&raw_path, &fetched.comments)?;
    files.push(raw_path);

    let calendar = config
        .calendar_anchor
        .map(|anchor| SyntheticCalendar::new(anchor, config.seed))
        .transpose()?;
    let records = enrich_all(&fetched.comments, calendar.as_ref())?;

    let records_path = config.output_path(RECORDS_CSV_FILE);
    write_records_csv(&records_path, &records)?;
    files.push(records_path);

    let groupings = config.groupings();
    let analysis = analyze(&records, &groupings)?;
    print_pretty(&analysis.overview);

    for grouping in &analysis.groupings {
        let path = config.groups_path(grouping.by);
        write_groups_csv(&path, grouping)?;
        files.push(path);
    }

    let summary_path = config.output_path(SUMMARY_CSV_FILE);
    write_summary_csv(&summary_path, &summary_metrics(&analysis))?;
    files.push(summary_path);

    if config.charts {
        let mut sink = SvgChartSink::new(&config.output_dir);
        for series in chart_series(&analysis, &records) {
            sink.render(&series)?;
        }
        files.extend_from_slice(sink.written());
    }

    info!(files = files.len(), "Pipeline complete");

    Ok(RunOutcome {
        origin: fetched.origin,
        records: records.len(),
        files,
        report: format_report(&analysis, fetched.origin),
    })
}

//! Persistence of raw comments, enriched records and report tables.
//!
//! Every writer truncates its target. Failures surface as
//! [`PipelineError::Persistence`] carrying the offending path.

use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::Grouping;
use crate::error::{PersistenceCause, PipelineError, Result};
use crate::model::EnrichedComment;
use crate::report::Metric;
use crate::stats::Summary;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Writes `value` as indented UTF-8 JSON.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let fail = |e: PersistenceCause| PipelineError::persistence(path, e);

    let file = File::create(path).map_err(|e| fail(e.into()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| fail(e.into()))?;
    writer.flush().map_err(|e| fail(e.into()))?;

    info!(path = %path.display(), "JSON written");
    Ok(())
}

/// Serializes `rows` to a CSV file with a header row.
fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<usize> {
    let fail = |e: PersistenceCause| PipelineError::persistence(path, e);

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| fail(e.into()))?;

    let mut n = 0;
    for row in rows {
        writer.serialize(row).map_err(|e| fail(e.into()))?;
        n += 1;
    }
    writer.flush().map_err(|e| fail(e.into()))?;

    info!(path = %path.display(), rows = n, "CSV written");
    Ok(n)
}

/// One row per enriched comment.
pub fn write_records_csv(path: &Path, records: &[EnrichedComment]) -> Result<()> {
    write_rows(path, records).map(|_| ())
}

/// Reads back a file produced by [`write_records_csv`].
pub fn read_records_csv(path: &Path) -> Result<Vec<EnrichedComment>> {
    let fail = |e: csv::Error| PipelineError::persistence(path, e);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(fail)?;

    reader
        .deserialize()
        .map(|row| row.map_err(fail))
        .collect()
}

/// Flat CSV row for one group.
#[derive(Debug, Serialize)]
struct GroupRow<'a> {
    key: &'a str,
    count: usize,
    char_length_mean: f64,
    char_length_median: f64,
    char_length_std_dev: f64,
    char_length_min: f64,
    char_length_max: f64,
    word_count_mean: f64,
    word_count_median: f64,
    word_count_std_dev: f64,
    word_count_min: f64,
    word_count_max: f64,
}

impl<'a> GroupRow<'a> {
    fn new(key: &'a str, chars: &Summary, words: &Summary) -> Self {
        GroupRow {
            key,
            count: chars.count,
            char_length_mean: chars.mean,
            char_length_median: chars.median,
            char_length_std_dev: chars.std_dev,
            char_length_min: chars.min,
            char_length_max: chars.max,
            word_count_mean: words.mean,
            word_count_median: words.median,
            word_count_std_dev: words.std_dev,
            word_count_min: words.min,
            word_count_max: words.max,
        }
    }
}

/// One row per group of `grouping`.
pub fn write_groups_csv(path: &Path, grouping: &Grouping) -> Result<()> {
    let rows = grouping
        .groups
        .iter()
        .map(|g| GroupRow::new(&g.key, &g.summaries.char_length, &g.summaries.word_count));
    write_rows(path, rows).map(|_| ())
}

/// `(metric, value)` pairs.
pub fn write_summary_csv(path: &Path, metrics: &[Metric]) -> Result<()> {
    write_rows(path, metrics).map(|_| ())
}

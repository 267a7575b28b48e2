//! Shapes an [`Analysis`] for people: console text, flat metrics and chart
//! series. Nothing here computes new statistics.

use serde::Serialize;
use std::fmt::Write;

use crate::analyzers::types::{Analysis, FieldSummaries, GroupBy};
use crate::model::EnrichedComment;
use crate::source::Origin;
use crate::stats::Summary;

/// Bins used by the distribution charts.
pub const HISTOGRAM_BINS: usize = 20;

/// One row of `summary_statistics.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub metric: String,
    pub value: f64,
}

impl Metric {
    pub fn new(metric: impl Into<String>, value: f64) -> Self {
        Self {
            metric: metric.into(),
            value,
        }
    }
}

fn push_summary(out: &mut Vec<Metric>, prefix: &str, s: &Summary) {
    out.extend(
        s.metrics()
            .iter()
            .map(|(name, value)| Metric::new(format!("{prefix}_{name}"), *value)),
    );
}

/// Flattens the scalar parts of `analysis` into named values.
pub fn summary_metrics(analysis: &Analysis) -> Vec<Metric> {
    let o = &analysis.overview;
    let mut out = vec![
        Metric::new("total_comments", o.total_comments as f64),
        Metric::new("unique_users", o.unique_users as f64),
        Metric::new("unique_posts", o.unique_posts as f64),
    ];

    if let Some(weekly) = &o.comments_per_week {
        push_summary(&mut out, "comments_per_week", weekly);
    }
    push_summary(&mut out, "char_length", &analysis.global.char_length);
    push_summary(&mut out, "word_count", &analysis.global.word_count);

    out
}

fn heading(out: &mut String, title: &str) {
    let rule = "=".repeat(60);
    let _ = writeln!(out, "{rule}\n{title}\n{rule}");
}

fn summary_line(out: &mut String, label: &str, s: &Summary) {
    let _ = writeln!(
        out,
        "  {label:<14} mean {:>8.2}  median {:>8.2}  std {:>8.2}  min {:>6}  max {:>6}",
        s.mean, s.median, s.std_dev, s.min, s.max
    );
}

fn fields_lines(out: &mut String, f: &FieldSummaries) {
    summary_line(out, "characters", &f.char_length);
    summary_line(out, "words", &f.word_count);
}

/// Renders the console report.
pub fn format_report(analysis: &Analysis, origin: Origin) -> String {
    let o = &analysis.overview;
    let mut out = String::new();

    heading(&mut out, "COMMENTS ANALYSIS");
    let _ = writeln!(out, "  data source      {origin}");
    let _ = writeln!(out, "  total comments   {}", o.total_comments);
    let _ = writeln!(out, "  unique users     {}", o.unique_users);
    let _ = writeln!(out, "  unique posts     {}", o.unique_posts);
    if let Some(weekly) = &o.comments_per_week {
        let _ = writeln!(
            out,
            "  comments/week    mean {:.2}  median {:.2}  std {:.2}  (synthetic dates)",
            weekly.mean, weekly.median, weekly.std_dev
        );
    }
    out.push('\n');

    heading(&mut out, "FIELD STATISTICS");
    fields_lines(&mut out, &analysis.global);
    out.push('\n');

    heading(&mut out, "TOP EMAIL DOMAINS");
    for (domain, count) in &o.top_email_domains {
        let _ = writeln!(out, "  {domain:<24} {count}");
    }
    out.push('\n');

    heading(&mut out, "WORDS BY LENGTH CATEGORY");
    for (category, mean_words) in &o.word_count_by_length_category {
        let _ = writeln!(out, "  {:<10} {mean_words:.2}", category.as_str());
    }

    for grouping in &analysis.groupings {
        // per-user tables run to hundreds of rows
        if grouping.by == GroupBy::Email {
            continue;
        }
        out.push('\n');
        heading(&mut out, &format!("GROUPED BY {}", grouping.by.name().to_uppercase()));
        for g in &grouping.groups {
            let _ = writeln!(out, "  {} (n = {})", g.key, g.summaries.char_length.count);
            fields_lines(&mut out, &g.summaries);
        }
    }

    out
}

/// Labelled values handed to a [`ChartSink`](crate::chart::ChartSink).
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// File-name safe identifier.
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(String, f64)>,
}

impl ChartSeries {
    fn new(name: &str, title: &str, x_label: &str, y_label: &str, points: Vec<(String, f64)>) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            points,
        }
    }
}

/// Splits `values` into `bins` equal-width bins between their min and max.
///
/// Labels are `lo-hi` with bounds rounded down/up to integers. All values
/// equal collapses to a single bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<(String, f64)> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi == lo {
        return vec![(format!("{lo}"), values.len() as f64)];
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, n)| {
            let start = lo + width * i as f64;
            let end = start + width;
            (format!("{:.0}-{:.0}", start.floor(), end.ceil()), n as f64)
        })
        .collect()
}

/// Builds every chart the pipeline renders.
///
/// Grouped and per-post series come from `analysis`; the distribution charts
/// bin the already-enriched `records`.
pub fn chart_series(analysis: &Analysis, records: &[EnrichedComment]) -> Vec<ChartSeries> {
    let mut out = Vec::new();

    let grouping = move |by: GroupBy| analysis.groupings.iter().find(|g| g.by == by);

    if let Some(weeks) = grouping(GroupBy::Week) {
        out.push(ChartSeries::new(
            "comments_per_week",
            "Comments per Week (synthetic dates)",
            "Week",
            "Comments",
            weeks
                .groups
                .iter()
                .map(|g| (g.key.clone(), g.summaries.char_length.count as f64))
                .collect(),
        ));
    }

    if let Some(categories) = grouping(GroupBy::LengthCategory) {
        out.push(ChartSeries::new(
            "length_by_category",
            "Average Comment Length by Category",
            "Length category",
            "Average characters",
            categories
                .groups
                .iter()
                .map(|g| (g.key.clone(), g.summaries.char_length.mean))
                .collect(),
        ));
    }

    out.push(ChartSeries::new(
        "top_email_domains",
        "Top Email Domains",
        "Domain",
        "Comments",
        analysis
            .overview
            .top_email_domains
            .iter()
            .map(|(d, n)| (d.clone(), *n as f64))
            .collect(),
    ));

    out.push(ChartSeries::new(
        "comments_per_post",
        "Comments per Post",
        "postId",
        "Comments",
        analysis
            .overview
            .comments_per_post
            .iter()
            .map(|(post, n)| (post.to_string(), *n as f64))
            .collect(),
    ));

    let chars: Vec<f64> = records.iter().map(|r| r.char_length as f64).collect();
    out.push(ChartSeries::new(
        "char_length_distribution",
        "Comment Length Distribution",
        "Characters",
        "Frequency",
        histogram(&chars, HISTOGRAM_BINS),
    ));

    let words: Vec<f64> = records.iter().map(|r| r.word_count as f64).collect();
    out.push(ChartSeries::new(
        "word_count_distribution",
        "Words per Comment",
        "Words",
        "Frequency",
        histogram(&words, HISTOGRAM_BINS),
    ));

    out
}

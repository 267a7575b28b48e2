//! Run configuration.

use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

use crate::analyzers::types::GroupBy;
use crate::source::DEFAULT_URL;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MOCK_COUNT: usize = 500;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_CALENDAR_ANCHOR: &str = "2025-01-06";

pub const RAW_JSON_FILE: &str = "comments.json";
pub const RECORDS_CSV_FILE: &str = "comments_processed.csv";
pub const SUMMARY_CSV_FILE: &str = "summary_statistics.csv";

/// Everything a pipeline run needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub output_dir: PathBuf,
    /// Records generated when the live fetch fails.
    pub mock_count: usize,
    /// Seeds both the mock generator and the synthetic calendar.
    pub seed: u64,
    /// First day of the synthetic calendar; `None` disables dates entirely.
    pub calendar_anchor: Option<NaiveDate>,
    pub charts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            output_dir: PathBuf::from("."),
            mock_count: DEFAULT_MOCK_COUNT,
            seed: DEFAULT_SEED,
            calendar_anchor: NaiveDate::parse_from_str(DEFAULT_CALENDAR_ANCHOR, "%Y-%m-%d").ok(),
            charts: true,
        }
    }
}

impl Config {
    /// Groupings written to `groups_by_<key>.csv`. The week breakdown needs
    /// the synthetic calendar.
    pub fn groupings(&self) -> Vec<GroupBy> {
        let mut out = Vec::with_capacity(4);
        if self.calendar_anchor.is_some() {
            out.push(GroupBy::Week);
        }
        out.extend([GroupBy::LengthCategory, GroupBy::Email, GroupBy::EmailDomain]);
        out
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    pub fn groups_path(&self, by: GroupBy) -> PathBuf {
        self.output_path(&format!("groups_by_{}.csv", by.name()))
    }
}

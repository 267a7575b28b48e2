//! Descriptive statistics over a series of numeric values.
//!
//! Standard deviation uses the sample convention (divide by N - 1). A
//! single value has a standard deviation of 0.

use serde::Serialize;

use crate::error::{PipelineError, Result};

/// Count, location and spread of one numeric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarizes `values`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyDataset`] when `values` is empty.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(PipelineError::EmptyDataset);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let avg = mean(&sorted);

        Ok(Summary {
            count: sorted.len(),
            mean: avg,
            median: median_of_sorted(&sorted),
            std_dev: sample_std_dev(&sorted, avg),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }

    /// Summarizes integer counts, casting each to `f64` first.
    pub fn from_counts<I>(counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let values: Vec<f64> = counts.into_iter().map(|c| c as f64).collect();
        Self::from_values(&values)
    }

    /// `(metric, value)` pairs in a fixed order, used for flat reports.
    pub fn metrics(&self) -> [(&'static str, f64); 6] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("median", self.median),
            ("std_dev", self.std_dev),
            ("min", self.min),
            ("max", self.max),
        ]
    }
}

/// Arithmetic mean. Callers guarantee a non-empty slice.
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Middle value, or the average of the two middle values for even lengths.
fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation given a pre-computed mean.
fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    variance.sqrt()
}

use std::collections::BTreeMap;

use crate::analyzers::types::{Aggregate, FieldSummaries, GroupBy, GroupSummary, Grouping};
use crate::error::{PipelineError, Result};
use crate::model::EnrichedComment;
use crate::stats::Summary;

impl FieldSummaries {
    /// Summarizes `char_length` and `word_count` over `records`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyDataset`] when there are no records.
    pub fn from_records<'a, I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a EnrichedComment>,
    {
        let mut char_lengths = Vec::new();
        let mut word_counts = Vec::new();

        for r in records {
            char_lengths.push(r.char_length as f64);
            word_counts.push(r.word_count as f64);
        }

        Ok(FieldSummaries {
            char_length: Summary::from_values(&char_lengths)?,
            word_count: Summary::from_values(&word_counts)?,
        })
    }
}

/// Partitions `records` by `key` and summarizes each partition.
///
/// Records for which `key` returns `None` belong to no partition. Groups come
/// back in ascending key order, so an enum key keeps its declared order.
pub fn group_by<K, F>(records: &[EnrichedComment], key: F) -> Result<Vec<GroupSummary>>
where
    K: Ord + ToString,
    F: Fn(&EnrichedComment) -> Option<K>,
{
    let mut partitions: BTreeMap<K, Vec<&EnrichedComment>> = BTreeMap::new();

    for r in records {
        if let Some(k) = key(r) {
            partitions.entry(k).or_default().push(r);
        }
    }

    partitions
        .into_iter()
        .map(|(k, members)| {
            Ok(GroupSummary {
                key: k.to_string(),
                summaries: FieldSummaries::from_records(members)?,
            })
        })
        .collect()
}

/// Partitions `records` by one of the built-in keys.
pub fn group_by_key(records: &[EnrichedComment], by: GroupBy) -> Result<Grouping> {
    let groups = match by {
        GroupBy::Week => group_by(records, |r| r.week_bucket.clone())?,
        GroupBy::LengthCategory => group_by(records, |r| Some(r.length_category))?,
        GroupBy::Email => group_by(records, |r| Some(r.email.clone()))?,
        GroupBy::EmailDomain => group_by(records, |r| Some(r.email_domain.clone()))?,
    };

    Ok(Grouping {
        by,
        groups,
    })
}

/// Global summaries over `records`, optionally broken down by `by`.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyDataset`] for an empty input, whether or not
/// a grouping was requested.
pub fn aggregate(records: &[EnrichedComment], by: Option<GroupBy>) -> Result<Aggregate> {
    if records.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let global = FieldSummaries::from_records(records)?;
    let grouping = by.map(|by| group_by_key(records, by)).transpose()?;

    Ok(Aggregate { global, grouping })
}

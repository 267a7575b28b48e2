use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

use crate::analyzers::aggregate::group_by_key;
use crate::analyzers::types::{Analysis, DatasetOverview, FieldSummaries, GroupBy};
use crate::error::{PipelineError, Result};
use crate::model::{EnrichedComment, LengthCategory};
use crate::stats::Summary;

/// How many domains the overview ranks.
const TOP_DOMAINS: usize = 5;

/// Builds the dataset overview.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyDataset`] for an empty input.
pub fn overview(records: &[EnrichedComment]) -> Result<DatasetOverview> {
    if records.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let unique_users = records
        .iter()
        .map(|r| r.email.as_str())
        .collect::<HashSet<_>>()
        .len();
    let unique_posts = records
        .iter()
        .map(|r| r.post_id)
        .collect::<HashSet<_>>()
        .len();

    let mut per_week: HashMap<&str, usize> = HashMap::new();
    for bucket in records.iter().filter_map(|r| r.week_bucket.as_deref()) {
        *per_week.entry(bucket).or_default() += 1;
    }
    let comments_per_week = if per_week.is_empty() {
        None
    } else {
        Some(Summary::from_counts(per_week.into_values())?)
    };

    let mut domains: HashMap<&str, usize> = HashMap::new();
    for r in records {
        *domains.entry(r.email_domain.as_str()).or_default() += 1;
    }
    let mut top_email_domains: Vec<(String, usize)> = domains
        .into_iter()
        .map(|(d, n)| (d.to_string(), n))
        .collect();
    top_email_domains.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_email_domains.truncate(TOP_DOMAINS);

    let mut words_by_category: BTreeMap<LengthCategory, Vec<f64>> = BTreeMap::new();
    for r in records {
        words_by_category
            .entry(r.length_category)
            .or_default()
            .push(r.word_count as f64);
    }
    let word_count_by_length_category = words_by_category
        .into_iter()
        .map(|(category, words)| Ok((category, Summary::from_values(&words)?.mean)))
        .collect::<Result<Vec<_>>>()?;

    let mut per_post: BTreeMap<i64, usize> = BTreeMap::new();
    for r in records {
        *per_post.entry(r.post_id).or_default() += 1;
    }

    Ok(DatasetOverview {
        total_comments: records.len(),
        unique_users,
        unique_posts,
        comments_per_week,
        top_email_domains,
        word_count_by_length_category,
        comments_per_post: per_post.into_iter().collect(),
    })
}

/// Runs every aggregation the report needs over the enriched records.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyDataset`] for an empty input, before any
/// grouping is attempted.
#[tracing::instrument(skip(records), fields(records = records.len()))]
pub fn analyze(records: &[EnrichedComment], groupings: &[GroupBy]) -> Result<Analysis> {
    let overview = overview(records)?;
    let global = FieldSummaries::from_records(records)?;

    let groupings = groupings
        .iter()
        .map(|by| {
            let grouping = group_by_key(records, *by)?;
            debug!(by = %by, groups = grouping.groups.len(), "Grouping computed");
            Ok(grouping)
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        total = overview.total_comments,
        unique_users = overview.unique_users,
        unique_posts = overview.unique_posts,
        mean_chars = global.char_length.mean,
        mean_words = global.word_count.mean,
        "Statistics calculated"
    );

    Ok(Analysis {
        overview,
        global,
        groupings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::enrich_comment;
    use crate::model::Comment;

    fn record(post_id: i64, id: i64, email: &str, body: &str, week: Option<&str>) -> EnrichedComment {
        let mut r = enrich_comment(
            Comment {
                post_id,
                id,
                name: "n".to_string(),
                email: email.to_string(),
                body: body.to_string(),
            },
            None,
        );
        r.week_bucket = week.map(str::to_string);
        r
    }

    fn sample() -> Vec<EnrichedComment> {
        vec![
            record(1, 1, "a@one.com", "short", Some("2025-W01")),
            record(1, 2, "b@two.com", &"word ".repeat(12), Some("2025-W01")),
            record(2, 3, "a@one.com", "also short", Some("2025-W02")),
            record(3, 4, "c@one.com", &"longer ".repeat(20), Some("2025-W03")),
            record(3, 5, "d@three.org", "tiny", Some("2025-W03")),
        ]
    }

    #[test]
    fn test_overview_counts() {
        let o = overview(&sample()).unwrap();
        assert_eq!(o.total_comments, 5);
        assert_eq!(o.unique_users, 4);
        assert_eq!(o.unique_posts, 3);
    }

    #[test]
    fn test_overview_top_domains_ranked() {
        let o = overview(&sample()).unwrap();
        assert_eq!(o.top_email_domains[0], ("one.com".to_string(), 3));
        // ties broken alphabetically
        assert_eq!(o.top_email_domains[1], ("three.org".to_string(), 1));
        assert_eq!(o.top_email_domains[2], ("two.com".to_string(), 1));
    }

    #[test]
    fn test_overview_top_domains_truncated() {
        let records: Vec<_> = (0..8)
            .map(|i| record(1, i, &format!("u@d{i}.com"), "x", None))
            .collect();
        assert_eq!(overview(&records).unwrap().top_email_domains.len(), TOP_DOMAINS);
    }

    #[test]
    fn test_overview_comments_per_post_sorted_by_post() {
        let o = overview(&sample()).unwrap();
        assert_eq!(o.comments_per_post, [(1, 2), (2, 1), (3, 2)]);
        let total: usize = o.comments_per_post.iter().map(|(_, n)| n).sum();
        assert_eq!(total, o.total_comments);
    }

    #[test]
    fn test_overview_comments_per_week() {
        let weekly = overview(&sample()).unwrap().comments_per_week.unwrap();
        // weeks hold 2, 1, 2 comments
        assert_eq!(weekly.count, 3);
        assert_eq!(weekly.median, 2.0);
        assert_eq!(weekly.min, 1.0);
        assert_eq!(weekly.max, 2.0);
    }

    #[test]
    fn test_overview_without_calendar_has_no_weekly_stats() {
        let records = vec![record(1, 1, "a@b.c", "x", None)];
        assert!(overview(&records).unwrap().comments_per_week.is_none());
    }

    #[test]
    fn test_overview_word_count_by_category() {
        let o = overview(&sample()).unwrap();
        let categories: Vec<_> = o.word_count_by_length_category.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            categories,
            [LengthCategory::Short, LengthCategory::Medium, LengthCategory::Long]
        );
        // Short bodies: "short", "also short", "tiny" -> 1, 2, 1 words
        let short_mean = o.word_count_by_length_category[0].1;
        assert!((short_mean - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_analyze_empty_is_error() {
        assert!(matches!(
            analyze(&[], &[GroupBy::Email]),
            Err(PipelineError::EmptyDataset)
        ));
    }

    #[test]
    fn test_analyze_runs_each_grouping() {
        let analysis = analyze(&sample(), &[GroupBy::Week, GroupBy::EmailDomain]).unwrap();
        let keys: Vec<_> = analysis.groupings.iter().map(|g| g.by).collect();
        assert_eq!(keys, [GroupBy::Week, GroupBy::EmailDomain]);
        assert_eq!(analysis.groupings[0].groups.len(), 3);
        assert_eq!(analysis.global.char_length.count, 5);
    }
}

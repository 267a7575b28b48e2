//! Data types produced by the aggregation step.

use serde::Serialize;
use std::fmt;

use crate::model::LengthCategory;
use crate::stats::Summary;

/// Summaries of the two numeric fields of an enriched comment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSummaries {
    pub char_length: Summary,
    pub word_count: Summary,
}

/// Statistics for one partition of the records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub summaries: FieldSummaries,
}

/// Records partitioned by a named key, partitions in sorted-key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grouping {
    pub by: GroupBy,
    pub groups: Vec<GroupSummary>,
}

impl Grouping {
    pub fn get(&self, key: &str) -> Option<&GroupSummary> {
        self.groups.iter().find(|g| g.key == key)
    }
}

/// Global summaries plus an optional partitioned breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    pub global: FieldSummaries,
    pub grouping: Option<Grouping>,
}

/// Built-in partition keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// Synthetic week bucket. Records without a date are left out.
    Week,
    LengthCategory,
    /// Per user, keyed by email address.
    Email,
    EmailDomain,
}

impl GroupBy {
    pub fn name(&self) -> &'static str {
        match self {
            GroupBy::Week => "week",
            GroupBy::LengthCategory => "length_category",
            GroupBy::Email => "email",
            GroupBy::EmailDomain => "email_domain",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dataset-wide counts and rankings reported alongside the field summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub total_comments: usize,
    pub unique_users: usize,
    pub unique_posts: usize,
    /// Distribution of comments per synthetic week, when dates were assigned.
    pub comments_per_week: Option<Summary>,
    /// Up to five domains, most frequent first.
    pub top_email_domains: Vec<(String, usize)>,
    pub word_count_by_length_category: Vec<(LengthCategory, f64)>,
    /// Comment count per `postId`, ascending by post.
    pub comments_per_post: Vec<(i64, usize)>,
}

/// Everything the reporting step consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub overview: DatasetOverview,
    pub global: FieldSummaries,
    pub groupings: Vec<Grouping>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_serializes_as_its_name() {
        for by in [
            GroupBy::Week,
            GroupBy::LengthCategory,
            GroupBy::Email,
            GroupBy::EmailDomain,
        ] {
            assert_eq!(
                serde_json::to_value(by).unwrap(),
                serde_json::Value::String(by.name().to_string())
            );
        }
    }

    #[test]
    fn test_grouping_serializes_key_name() {
        let grouping = Grouping {
            by: GroupBy::EmailDomain,
            groups: Vec::new(),
        };
        let json = serde_json::to_string(&grouping).unwrap();
        assert_eq!(json, r#"{"by":"email_domain","groups":[]}"#);
    }
}

//! Record types flowing through the pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PipelineError, Result};

/// A comment as it appears on the wire. Every field is optional here so that
/// a malformed record can be reported by name instead of failing the whole
/// payload parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComment {
    #[serde(rename = "postId", skip_serializing_if = "Option::is_none")]
    pub post_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// A validated comment with the full fixed schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub post_id: i64,
    pub id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
}

impl TryFrom<&RawComment> for Comment {
    type Error = PipelineError;

    fn try_from(raw: &RawComment) -> Result<Self> {
        let record_id = raw
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "<no id>".to_string());

        let missing = |field: &'static str| PipelineError::MissingField {
            record_id: record_id.clone(),
            field,
        };

        Ok(Comment {
            post_id: raw.post_id.ok_or_else(|| missing("postId"))?,
            id: raw.id.ok_or_else(|| missing("id"))?,
            name: raw.name.clone().ok_or_else(|| missing("name"))?,
            email: raw.email.clone().ok_or_else(|| missing("email"))?,
            body: raw.body.clone().ok_or_else(|| missing("body"))?,
        })
    }
}

/// Comment length buckets, ordered from shortest to longest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LengthCategory {
    Short,
    Medium,
    Long,
    VeryLong,
}

impl LengthCategory {
    pub const ALL: [LengthCategory; 4] = [
        LengthCategory::Short,
        LengthCategory::Medium,
        LengthCategory::Long,
        LengthCategory::VeryLong,
    ];

    /// Maps a character count onto its bucket.
    ///
    /// | Range      | Bucket   |
    /// |------------|----------|
    /// | [0, 50)    | Short    |
    /// | [50, 100)  | Medium   |
    /// | [100, 200) | Long     |
    /// | >= 200     | VeryLong |
    pub fn from_char_length(n: usize) -> Self {
        match n {
            0..50 => LengthCategory::Short,
            50..100 => LengthCategory::Medium,
            100..200 => LengthCategory::Long,
            _ => LengthCategory::VeryLong,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LengthCategory::Short => "Short",
            LengthCategory::Medium => "Medium",
            LengthCategory::Long => "Long",
            LengthCategory::VeryLong => "VeryLong",
        }
    }
}

impl fmt::Display for LengthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comment plus its derived fields. One row of `comments_processed.csv`.
///
/// `synthetic_date` and `week_bucket` are generated, not sourced: the
/// upstream API carries no dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedComment {
    pub post_id: i64,
    pub id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
    pub char_length: usize,
    pub word_count: usize,
    pub email_domain: String,
    pub length_category: LengthCategory,
    pub synthetic_date: Option<NaiveDate>,
    pub week_bucket: Option<String>,
}

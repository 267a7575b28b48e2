//! Per-record derived fields.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::model::{Comment, EnrichedComment, LengthCategory, RawComment};

/// Length of the synthetic date window, in days (ten weeks).
pub const CALENDAR_SPAN_DAYS: i64 = 70;

/// Number of Unicode code points in `body`.
pub fn char_length(body: &str) -> usize {
    body.chars().count()
}

/// Number of maximal whitespace-delimited tokens in `body`.
pub fn word_count(body: &str) -> usize {
    body.split_whitespace().count()
}

/// Everything after the first `@`, or `"unknown"` when there is none.
pub fn email_domain(email: &str) -> &str {
    match email.split_once('@') {
        Some((_, domain)) => domain,
        None => "unknown",
    }
}

/// Assigns reproducible, made-up dates to records.
///
/// The source data has no timestamps, so weekly aggregation runs over these.
/// Dates fall in `[anchor, anchor + 70 days]` and depend only on the seed and
/// the record's position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticCalendar {
    anchor: NaiveDate,
    seed: u64,
}

impl SyntheticCalendar {
    /// # Errors
    ///
    /// Returns [`PipelineError::CalendarOutOfRange`] when the window would
    /// run past the last representable date.
    pub fn new(anchor: NaiveDate, seed: u64) -> Result<Self> {
        match anchor.checked_add_signed(Duration::days(CALENDAR_SPAN_DAYS)) {
            Some(_) => Ok(Self { anchor, seed }),
            None => Err(PipelineError::CalendarOutOfRange { anchor }),
        }
    }

    fn dates(self) -> impl Iterator<Item = Option<NaiveDate>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let anchor = self.anchor;
        std::iter::repeat_with(move || {
            anchor.checked_add_signed(Duration::days(rng.gen_range(0..=CALENDAR_SPAN_DAYS)))
        })
    }
}

/// Year plus Sunday-based week number, e.g. `2025-W01`.
pub fn week_bucket(date: NaiveDate) -> String {
    date.format("%Y-W%U").to_string()
}

/// Derives the enriched fields for one validated comment.
pub fn enrich_comment(comment: Comment, date: Option<NaiveDate>) -> EnrichedComment {
    let char_length = char_length(&comment.body);
    let word_count = word_count(&comment.body);
    let email_domain = email_domain(&comment.email).to_string();

    EnrichedComment {
        post_id: comment.post_id,
        id: comment.id,
        name: comment.name,
        email: comment.email,
        body: comment.body,
        char_length,
        word_count,
        email_domain,
        length_category: LengthCategory::from_char_length(char_length),
        synthetic_date: date,
        week_bucket: date.map(week_bucket),
    }
}

/// Validates and enriches every record, preserving order.
///
/// # Errors
///
/// Returns [`PipelineError::MissingField`](crate::error::PipelineError::MissingField)
/// for the first record lacking a schema field. Nothing is skipped.
pub fn enrich_all(
    records: &[RawComment],
    calendar: Option<&SyntheticCalendar>,
) -> Result<Vec<EnrichedComment>> {
    let mut dates: Box<dyn Iterator<Item = Option<NaiveDate>>> = match calendar {
        Some(cal) => Box::new(cal.dates()),
        None => Box::new(std::iter::repeat(None)),
    };

    let mut out = Vec::with_capacity(records.len());
    for raw in records {
        let comment = Comment::try_from(raw)?;
        out.push(enrich_comment(comment, dates.next().flatten()));
    }

    debug!(
        records = out.len(),
        calendar = calendar.is_some(),
        "Records enriched"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    fn raw(id: i64, email: &str, body: &str) -> RawComment {
        RawComment {
            post_id: Some(1),
            id: Some(id),
            name: Some(format!("name {id}")),
            email: Some(email.to_string()),
            body: Some(body.to_string()),
        }
    }

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("a b  c"), 3);
        assert_eq!(word_count("  leading and trailing  "), 3);
        assert_eq!(word_count("line\nbreaks\tand tabs"), 4);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn test_char_length_counts_code_points() {
        assert_eq!(char_length(""), 0);
        assert_eq!(char_length("abc"), 3);
        assert_eq!(char_length("não"), 3);
        assert_eq!(char_length("日本語"), 3);
    }

    #[test]
    fn test_email_domain() {
        assert_eq!(email_domain("a@b.com"), "b.com");
        assert_eq!(email_domain("noatsign"), "unknown");
        assert_eq!(email_domain("a@b@c.org"), "b@c.org");
        assert_eq!(email_domain("trailing@"), "");
    }

    #[test]
    fn test_week_bucket_format() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert_eq!(week_bucket(date), "2025-W01");
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(week_bucket(date), "2025-W00");
    }

    #[test]
    fn test_enrich_all_preserves_length_and_order() {
        let records = vec![
            raw(1, "x@a.com", "short one"),
            raw(2, "y@b.com", &"w ".repeat(40)),
            raw(3, "nope", &"z".repeat(250)),
        ];
        let enriched = enrich_all(&records, None).unwrap();

        assert_eq!(enriched.len(), 3);
        assert_eq!(
            enriched.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(enriched[0].length_category, LengthCategory::Short);
        assert_eq!(enriched[1].char_length, 80);
        assert_eq!(enriched[1].word_count, 40);
        assert_eq!(enriched[1].length_category, LengthCategory::Medium);
        assert_eq!(enriched[2].email_domain, "unknown");
        assert_eq!(enriched[2].length_category, LengthCategory::VeryLong);
        assert!(enriched.iter().all(|e| e.synthetic_date.is_none()));
        assert!(enriched.iter().all(|e| e.week_bucket.is_none()));
    }

    #[test]
    fn test_enrich_all_missing_email_aborts() {
        let mut bad = raw(2, "y@b.com", "body");
        bad.email = None;
        let records = vec![raw(1, "x@a.com", "ok"), bad];

        match enrich_all(&records, None) {
            Err(PipelineError::MissingField { record_id, field }) => {
                assert_eq!(record_id, "2");
                assert_eq!(field, "email");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_calendar_is_reproducible() {
        let records: Vec<_> = (1..=50).map(|i| raw(i, "a@b.c", "text")).collect();
        let cal = SyntheticCalendar::new(anchor(), 7).unwrap();

        let first = enrich_all(&records, Some(&cal)).unwrap();
        let second = enrich_all(&records, Some(&cal)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_calendar_dates_stay_in_window() {
        let records: Vec<_> = (1..=200).map(|i| raw(i, "a@b.c", "text")).collect();
        let cal = SyntheticCalendar::new(anchor(), 99).unwrap();
        let last = anchor() + Duration::days(CALENDAR_SPAN_DAYS);

        for e in enrich_all(&records, Some(&cal)).unwrap() {
            let date = e.synthetic_date.unwrap();
            assert!(date >= anchor() && date <= last, "{date} outside window");
            assert_eq!(e.week_bucket.as_deref(), Some(week_bucket(date).as_str()));
        }
    }

    #[test]
    fn test_calendar_seed_changes_dates() {
        let records: Vec<_> = (1..=50).map(|i| raw(i, "a@b.c", "text")).collect();
        let a = enrich_all(&records, Some(&SyntheticCalendar::new(anchor(), 1).unwrap())).unwrap();
        let b = enrich_all(&records, Some(&SyntheticCalendar::new(anchor(), 2).unwrap())).unwrap();

        assert_ne!(
            a.iter().map(|e| e.synthetic_date).collect::<Vec<_>>(),
            b.iter().map(|e| e.synthetic_date).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_calendar_anchor_near_max_date_is_rejected() {
        let anchor = NaiveDate::MAX - Duration::days(10);

        match SyntheticCalendar::new(anchor, 42) {
            Err(PipelineError::CalendarOutOfRange { anchor: got }) => assert_eq!(got, anchor),
            other => panic!("expected CalendarOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_calendar_anchor_with_exact_room_is_accepted() {
        let anchor = NaiveDate::MAX - Duration::days(CALENDAR_SPAN_DAYS);
        let cal = SyntheticCalendar::new(anchor, 42).unwrap();
        let records: Vec<_> = (1..=20).map(|i| raw(i, "a@b.c", "text")).collect();

        let enriched = enrich_all(&records, Some(&cal)).unwrap();

        assert!(enriched.iter().all(|e| e.synthetic_date.is_some()));
        assert_eq!(cal.anchor, anchor);
    }
}

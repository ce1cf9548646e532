//! Record selection: the inclusive date range every view is computed over,
//! and the rating filter used by the log table.

use crate::types::LogRecord;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

/// True when `date` has the `YYYY-MM-DD` shape.
pub fn is_date_shaped(date: &str) -> bool {
    DATE_SHAPE.is_match(date)
}

/// Inclusive `[start, end]` date window; an unset side is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: non_empty(start.into()),
            end: non_empty(end.into()),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Lexicographic containment; correct because dates are fixed-width.
    pub fn contains(&self, date: &str) -> bool {
        if let Some(start) = &self.start {
            if date < start.as_str() {
                return false;
            }
        }
        if let Some(end) = &self.end {
            if date > end.as_str() {
                return false;
            }
        }
        true
    }

    /// The tightest range covering every well-formed date in `records`, or
    /// `None` when no record carries one.
    pub fn detect(records: &[LogRecord]) -> Option<Self> {
        let mut dates = records.iter().map(|r| r.date.as_str()).filter(|d| is_date_shaped(d));
        let first = dates.next()?;
        let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self::new(min, max))
    }
}

fn non_empty(s: String) -> Option<String> {
    let s = s.trim().to_string();
    (!s.is_empty()).then_some(s)
}

/// Records inside `range`, most recent first: date descending, then time
/// descending.
///
/// Once either side of the range is set, only `YYYY-MM-DD` dates can match;
/// a malformed date such as `2025-12-18 10:00` would otherwise compare as
/// in range while never landing on a day of the daily series.
pub fn filter_range<'a>(records: &'a [LogRecord], range: &DateRange) -> Vec<&'a LogRecord> {
    let bounded = range.start.is_some() || range.end.is_some();
    let mut selected: Vec<&LogRecord> = records
        .iter()
        .filter(|r| (!bounded || is_date_shaped(&r.date)) && range.contains(&r.date))
        .collect();
    selected.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.time.cmp(&a.time)));
    selected
}

/// Rating selector for the log table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingFilter {
    #[default]
    All,
    Five,
    Four,
    /// Rated, with a score of 3 or less.
    OneToThree,
    Unrated,
}

impl RatingFilter {
    pub fn matches(self, record: &LogRecord) -> bool {
        match self {
            RatingFilter::All => true,
            RatingFilter::Five => record.feedback_score == Some(5),
            RatingFilter::Four => record.feedback_score == Some(4),
            RatingFilter::OneToThree => matches!(record.feedback_score, Some(s) if s <= 3),
            RatingFilter::Unrated => record.feedback_score.is_none(),
        }
    }
}

impl std::str::FromStr for RatingFilter {
    type Err = String;

    /// Accepts the dashboard's select tokens: `ALL`, `5`, `4`, `1-3`, `NULL`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(RatingFilter::All),
            "5" => Ok(RatingFilter::Five),
            "4" => Ok(RatingFilter::Four),
            "1-3" => Ok(RatingFilter::OneToThree),
            "NULL" | "NONE" => Ok(RatingFilter::Unrated),
            other => Err(format!("unknown rating filter: {other} (expected ALL, 5, 4, 1-3 or NULL)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn rec(id: &str, date: &str, time: &str) -> LogRecord {
        LogRecord {
            id: id.into(),
            date: date.into(),
            time: time.into(),
            ..LogRecord::default()
        }
    }

    fn rated(score: Option<u8>) -> LogRecord {
        LogRecord {
            feedback_score: score,
            ..LogRecord::default()
        }
    }

    #[test]
    fn range_is_inclusive() {
        let range = DateRange::new("2025-12-17", "2025-12-19");
        assert!(range.contains("2025-12-17"));
        assert!(range.contains("2025-12-19"));
        assert!(!range.contains("2025-12-16"));
        assert!(!range.contains("2025-12-20"));
    }

    #[test]
    fn unset_sides_are_unbounded() {
        assert!(DateRange::unbounded().contains("1999-01-01"));
        let from = DateRange::new("2025-12-18", "");
        assert_eq!(from.end, None);
        assert!(from.contains("2030-01-01"));
        assert!(!from.contains("2025-12-17"));
    }

    #[test]
    fn filtered_records_are_most_recent_first() {
        let records = vec![
            rec("a", "2025-12-17", "09:00:00"),
            rec("b", "2025-12-18", "08:00:00"),
            rec("c", "2025-12-18", "17:30:00"),
            rec("d", "2025-12-25", "12:00:00"),
        ];
        let out = filter_range(&records, &DateRange::new("2025-12-17", "2025-12-24"));
        let ids: Vec<_> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn bounded_range_skips_malformed_dates() {
        let records = vec![
            rec("a", "2025-12-18", "09:00:00"),
            rec("b", "2025-12-18 10:00", ""),
            rec("c", "2025-12-18T", ""),
            rec("d", "", ""),
        ];
        let ids: Vec<_> = filter_range(&records, &DateRange::new("2025-12-18", "2025-12-19"))
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a"]);

        let from: Vec<_> = filter_range(&records, &DateRange::new("2025-12-18", ""))
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(from, vec!["a"]);

        assert_eq!(filter_range(&records, &DateRange::unbounded()).len(), 4);
    }

    #[test]
    fn detect_ignores_malformed_dates() {
        let records = vec![
            rec("a", "2025-12-19", ""),
            rec("b", "12/17/2025", ""),
            rec("c", "2025-12-18", ""),
            rec("d", "", ""),
        ];
        assert_eq!(
            DateRange::detect(&records),
            Some(DateRange::new("2025-12-18", "2025-12-19"))
        );
        assert_eq!(DateRange::detect(&[rec("x", "soon", "")]), None);
    }

    #[rstest]
    #[case("ALL", RatingFilter::All)]
    #[case("5", RatingFilter::Five)]
    #[case("4", RatingFilter::Four)]
    #[case("1-3", RatingFilter::OneToThree)]
    #[case("null", RatingFilter::Unrated)]
    fn rating_tokens(#[case] token: &str, #[case] expected: RatingFilter) {
        assert_eq!(token.parse::<RatingFilter>(), Ok(expected));
    }

    #[test]
    fn rating_filter_semantics() {
        assert!(RatingFilter::Five.matches(&rated(Some(5))));
        assert!(!RatingFilter::Five.matches(&rated(Some(4))));
        assert!(RatingFilter::OneToThree.matches(&rated(Some(1))));
        assert!(RatingFilter::OneToThree.matches(&rated(Some(3))));
        assert!(!RatingFilter::OneToThree.matches(&rated(None)));
        assert!(RatingFilter::Unrated.matches(&rated(None)));
        assert!(RatingFilter::All.matches(&rated(None)));
        assert!("2-4".parse::<RatingFilter>().is_err());
    }
}

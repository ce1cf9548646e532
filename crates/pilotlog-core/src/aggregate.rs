//! Dashboard projections over a range-filtered record set.
//!
//! Each function is a single bounded pass (or a handful) over the records
//! and returns a plain serialisable value:
//!
//! | Function | View |
//! |----------|------|
//! | [`kpis`] | headline counts, model/retry breakdowns, mean rating |
//! | [`daily_series`] | one point per calendar day in the range |
//! | [`funnel`] | entered-count per pipeline stage |
//! | [`error_distribution`] | failure cause histogram |

use crate::filter::DateRange;
use crate::types::{LogRecord, PipelineStage, Status};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Retry counts with their own bucket; anything above is beyond the cap.
pub const RETRY_BUCKETS: [u32; 3] = [1, 2, 3];

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub unique_users: usize,
    pub unique_sessions: usize,
    pub total_requests: usize,
    pub model_breakdown: Vec<ModelShare>,
    pub retry_breakdown: RetryBreakdown,
    /// Mean rating rounded to one decimal; 0.0 when nothing is rated.
    pub avg_rating: f64,
    pub rated_count: usize,
}

impl Kpis {
    /// The rating as the dashboard shows it, e.g. `"4.2"`.
    pub fn avg_rating_display(&self) -> String {
        format!("{:.1}", self.avg_rating)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelShare {
    pub model: String,
    pub count: usize,
    /// Share of all requests, rounded to the nearest integer.
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryBreakdown {
    /// Records with at least one retry.
    pub total_retried: usize,
    /// Exact-match buckets for 1, 2 and 3 retries.
    pub buckets: Vec<RetryBucket>,
    /// Retried records with more than three retries; not in any bucket.
    pub beyond_cap: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryBucket {
    pub retries: u32,
    pub count: usize,
    /// Share of `total_retried`, rounded to the nearest integer.
    pub percentage: u32,
}

pub fn kpis(records: &[&LogRecord]) -> Kpis {
    let total = records.len();
    let unique_users = records.iter().map(|r| r.user.as_str()).collect::<HashSet<_>>().len();
    let unique_sessions = records.iter().map(|r| r.chat.as_str()).collect::<HashSet<_>>().len();

    let mut model_breakdown: Vec<ModelShare> = count_in_order(records.iter().map(|r| r.model.as_str()))
        .into_iter()
        .map(|(model, count)| ModelShare {
            model: model.to_string(),
            count,
            percentage: percent(count, total),
        })
        .collect();
    // stable: equal counts keep first-seen order
    model_breakdown.sort_by(|a, b| b.count.cmp(&a.count));

    let retried: Vec<u32> = records.iter().map(|r| r.retry_count).filter(|&n| n > 0).collect();
    let buckets = RETRY_BUCKETS
        .iter()
        .map(|&retries| {
            let count = retried.iter().filter(|&&n| n == retries).count();
            RetryBucket {
                retries,
                count,
                percentage: percent(count, retried.len()),
            }
        })
        .collect();
    let cap = RETRY_BUCKETS[RETRY_BUCKETS.len() - 1];
    let retry_breakdown = RetryBreakdown {
        total_retried: retried.len(),
        buckets,
        beyond_cap: retried.iter().filter(|&&n| n > cap).count(),
    };

    let ratings: Vec<u8> = records.iter().filter_map(|r| r.feedback_score).collect();
    let avg_rating = if ratings.is_empty() {
        0.0
    } else {
        let sum: u32 = ratings.iter().map(|&s| u32::from(s)).sum();
        round1(f64::from(sum) / ratings.len() as f64)
    };

    Kpis {
        unique_users,
        unique_sessions,
        total_requests: total,
        model_breakdown,
        retry_breakdown,
        avg_rating,
        rated_count: ratings.len(),
    }
}

// ---------------------------------------------------------------------------
// Daily series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub day: NaiveDate,
    /// Axis label, `MM.DD`.
    pub date: String,
    pub request: usize,
    pub success_rate: u32,
}

/// One point per day in `range`, chronologically, including empty days.
///
/// Both ends must be set and parse as dates; otherwise the series is empty.
pub fn daily_series(records: &[&LogRecord], range: &DateRange) -> Vec<DailyPoint> {
    let (Some(start), Some(end)) = (range.start.as_deref(), range.end.as_deref()) else {
        return Vec::new();
    };
    let (Ok(start), Ok(end)) = (parse_day(start), parse_day(end)) else {
        tracing::warn!(?range, "date range does not parse; daily series is empty");
        return Vec::new();
    };

    let mut per_day: HashMap<&str, (usize, usize)> = HashMap::new();
    for r in records {
        let entry = per_day.entry(r.date.as_str()).or_default();
        entry.0 += 1;
        if r.status == Status::Success {
            entry.1 += 1;
        }
    }

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| {
            let key = day.format("%Y-%m-%d").to_string();
            let (request, success) = per_day.get(key.as_str()).copied().unwrap_or_default();
            DailyPoint {
                day,
                date: day.format("%m.%d").to_string(),
                request,
                success_rate: percent(success, request),
            }
        })
        .collect()
}

fn parse_day(s: &str) -> chrono::ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
}

// ---------------------------------------------------------------------------
// Funnel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStep {
    pub stage: PipelineStage,
    pub label: &'static str,
    /// Records that reached at least this stage.
    pub entered: usize,
    /// `entered` here minus `entered` at the next stage; 0 for the last.
    pub drop_off: usize,
}

/// A record stopped at stage `i` entered stages `0..=i`. Records whose stage
/// label has no valid numeral are left out.
pub fn funnel(records: &[&LogRecord]) -> Vec<FunnelStep> {
    let mut entered = [0usize; PipelineStage::ALL.len()];
    for idx in records.iter().filter_map(|r| r.stage.index()) {
        for slot in &mut entered[..=idx] {
            *slot += 1;
        }
    }

    PipelineStage::ALL
        .iter()
        .enumerate()
        .map(|(i, &stage)| FunnelStep {
            stage,
            label: stage.label(),
            entered: entered[i],
            drop_off: entered.get(i + 1).map_or(0, |next| entered[i] - next),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Error distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCause {
    MetadataLookup,
    SqlGeneration,
    IntentAnalysis,
    ModelConnection,
    PolicyViolation,
    Other,
}

impl ErrorCause {
    /// First match wins, in this order: stage mentions 메타, SQL, 분석,
    /// 모델; then a blocked status; then [`ErrorCause::Other`].
    pub fn classify(record: &LogRecord) -> Self {
        let stage = &record.stage;
        if stage.contains("메타") {
            ErrorCause::MetadataLookup
        } else if stage.contains("SQL") {
            ErrorCause::SqlGeneration
        } else if stage.contains("분석") {
            ErrorCause::IntentAnalysis
        } else if stage.contains("모델") {
            ErrorCause::ModelConnection
        } else if record.status == Status::Blocked {
            ErrorCause::PolicyViolation
        } else {
            ErrorCause::Other
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorCause::MetadataLookup => "메타 조회 실패",
            ErrorCause::SqlGeneration => "SQL 생성/검증 오류",
            ErrorCause::IntentAnalysis => "의도 파악 불가",
            ErrorCause::ModelConnection => "모델 연결 실패",
            ErrorCause::PolicyViolation => "정책 위반/차단",
            ErrorCause::Other => "기타 오류",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSlice {
    pub cause: ErrorCause,
    pub label: &'static str,
    pub count: usize,
}

/// Failed, errored and blocked records grouped by cause, in the order each
/// cause is first seen.
pub fn error_distribution(records: &[&LogRecord]) -> Vec<ErrorSlice> {
    count_in_order(
        records
            .iter()
            .filter(|r| r.status.is_failure())
            .map(|r| ErrorCause::classify(r)),
    )
    .into_iter()
    .map(|(cause, count)| ErrorSlice {
        cause,
        label: cause.label(),
        count,
    })
    .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Occurrence counts keyed in first-seen order.
fn count_in_order<K: Eq + std::hash::Hash + Copy>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut out: Vec<(K, usize)> = Vec::new();
    for key in keys {
        let slot = *slots.entry(key).or_insert_with(|| {
            out.push((key, 0));
            out.len() - 1
        });
        out[slot].1 += 1;
    }
    out
}

/// `round(100 * part / whole)`, 0 when `whole` is 0.
fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

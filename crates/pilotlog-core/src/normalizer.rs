//! Normalizer — maps a parsed CSV grid onto [`LogRecord`] values.
//!
//! The first row is the header. Header tokens are matched case-insensitively
//! against [`HEADER_ALIASES`]; anything unrecognized is carried through under
//! its original name in [`LogRecord::extra`]. Every data row after that is
//! either turned into a record or skipped, and every skip or coercion
//! problem is reported as a [`RowIssue`] instead of failing the upload.

use crate::types::{LogRecord, Stage, Status};
use serde::Serialize;

/// Lower-cased header token → canonical field name.
pub static HEADER_ALIASES: phf::Map<&'static str, Field> = phf::phf_map! {
    "id" => Field::Id,
    "user" => Field::User,
    "chat" => Field::Chat,
    "query" => Field::Query,
    "model" => Field::Model,
    "stage" => Field::Stage,
    "status" => Field::Status,
    "feedbackscore" => Field::FeedbackScore,
    // legacy exports used a bare `feedback` column
    "feedback" => Field::FeedbackScore,
    "date" => Field::Date,
    "time" => Field::Time,
    "retrycount" => Field::RetryCount,
    "feedbackcomment" => Field::FeedbackComment,
};

/// A canonical [`LogRecord`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    User,
    Chat,
    Query,
    Model,
    Stage,
    Status,
    FeedbackScore,
    FeedbackComment,
    Date,
    Time,
    RetryCount,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::User => "user",
            Field::Chat => "chat",
            Field::Query => "query",
            Field::Model => "model",
            Field::Stage => "stage",
            Field::Status => "status",
            Field::FeedbackScore => "feedbackScore",
            Field::FeedbackComment => "feedbackComment",
            Field::Date => "date",
            Field::Time => "time",
            Field::RetryCount => "retryCount",
        }
    }
}

/// A resolved header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Known(Field),
    /// Unrecognized header, kept verbatim (after trimming).
    Passthrough(String),
}

impl Column {
    pub fn name(&self) -> &str {
        match self {
            Column::Known(field) => field.name(),
            Column::Passthrough(raw) => raw,
        }
    }
}

/// Resolve one raw header token.
pub fn normalize_header(raw: &str) -> Column {
    let trimmed = raw.trim();
    match HEADER_ALIASES.get(trimmed.to_lowercase().as_str()) {
        Some(field) => Column::Known(*field),
        None => Column::Passthrough(trimmed.to_string()),
    }
}

/// What to do with a row whose numeric cell cannot be coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericPolicy {
    /// Keep the row; an invalid rating becomes absent and an invalid retry
    /// count becomes 0.
    #[default]
    Lenient,
    /// Drop the row.
    Strict,
}

/// Why a row was skipped or a cell was coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// The row has fewer cells than the header.
    ShortRow { cells: usize, expected: usize },
    /// Neither `id` nor `date` is present.
    MissingIdentity,
    /// The rating is not an integer in 1..=5.
    InvalidFeedbackScore { value: String },
    /// The retry count is not a non-negative integer.
    InvalidRetryCount { value: String },
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueKind::ShortRow { cells, expected } => {
                write!(f, "row has {cells} cells, header has {expected}")
            }
            IssueKind::MissingIdentity => write!(f, "row has neither id nor date"),
            IssueKind::InvalidFeedbackScore { value } => {
                write!(f, "feedbackScore {value:?} is not an integer in 1..=5")
            }
            IssueKind::InvalidRetryCount { value } => {
                write!(f, "retryCount {value:?} is not a non-negative integer")
            }
        }
    }
}

/// A per-row problem found while building records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    /// 1-based line in the grid, header included (the first data row is 2).
    pub row: usize,
    /// Whether the row was dropped because of this issue.
    pub dropped: bool,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl std::fmt::Display for RowIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verdict = if self.dropped { "dropped" } else { "kept" };
        write!(f, "row {}: {} ({verdict})", self.row, self.kind)
    }
}

/// Result of normalising one upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ingest {
    /// Accepted records, in source row order.
    pub records: Vec<LogRecord>,
    pub issues: Vec<RowIssue>,
    /// Data rows examined (header excluded).
    pub rows_seen: usize,
}

/// Build records from a parsed grid.
pub fn build_records(grid: &[Vec<String>], policy: NumericPolicy) -> Ingest {
    let Some((header, rows)) = grid.split_first() else {
        return Ingest::default();
    };
    let columns: Vec<Column> = header.iter().map(|h| normalize_header(h)).collect();

    let mut ingest = Ingest {
        rows_seen: rows.len(),
        ..Ingest::default()
    };

    for (i, cells) in rows.iter().enumerate() {
        let line = i + 2;
        if cells.len() < columns.len() {
            ingest.issues.push(RowIssue {
                row: line,
                dropped: true,
                kind: IssueKind::ShortRow {
                    cells: cells.len(),
                    expected: columns.len(),
                },
            });
            continue;
        }

        let (record, mut issues) = build_row(&columns, cells);

        let numeric_failure = !issues.is_empty();
        let mut keep = !(numeric_failure && policy == NumericPolicy::Strict);
        if record.id.is_empty() && record.date.is_empty() {
            issues.push(IssueKind::MissingIdentity);
            keep = false;
        }

        ingest.issues.extend(issues.into_iter().map(|kind| RowIssue {
            row: line,
            dropped: !keep,
            kind,
        }));
        if keep {
            ingest.records.push(record);
        }
    }

    for issue in &ingest.issues {
        tracing::warn!(row = issue.row, dropped = issue.dropped, "{}", issue.kind);
    }
    tracing::debug!(
        rows = ingest.rows_seen,
        accepted = ingest.records.len(),
        issues = ingest.issues.len(),
        "normalised upload"
    );
    ingest
}

/// Parse and normalise CSV text in one step.
pub fn ingest_text(text: &str, policy: NumericPolicy) -> Ingest {
    build_records(&crate::csv::parse(text), policy)
}

fn build_row(columns: &[Column], cells: &[String]) -> (LogRecord, Vec<IssueKind>) {
    let mut record = LogRecord::default();
    // One slot per numeric field: when a field appears under two headers,
    // only the cell that ends up in the record can raise an issue.
    let mut score_issue = None;
    let mut retry_issue = None;

    // Cells beyond the header width are ignored.
    for (column, cell) in columns.iter().zip(cells) {
        let value = cell.trim();
        match column {
            Column::Known(Field::Id) => record.id = value.to_string(),
            Column::Known(Field::User) => record.user = value.to_string(),
            Column::Known(Field::Chat) => record.chat = value.to_string(),
            Column::Known(Field::Query) => record.query = value.to_string(),
            Column::Known(Field::Model) => record.model = value.to_string(),
            Column::Known(Field::Stage) => record.stage = Stage::new(value),
            Column::Known(Field::Status) => record.status = Status::parse(value),
            Column::Known(Field::Date) => record.date = value.to_string(),
            Column::Known(Field::Time) => record.time = value.to_string(),
            Column::Known(Field::FeedbackComment) => {
                record.feedback_comment = (!value.is_empty()).then(|| value.to_string());
            }
            Column::Known(Field::FeedbackScore) => match parse_feedback(value) {
                Ok(score) => {
                    record.feedback_score = score;
                    score_issue = None;
                }
                Err(()) => {
                    record.feedback_score = None;
                    score_issue = Some(IssueKind::InvalidFeedbackScore { value: value.to_string() });
                }
            },
            Column::Known(Field::RetryCount) => match parse_retry(value) {
                Ok(n) => {
                    record.retry_count = n;
                    retry_issue = None;
                }
                Err(()) => {
                    record.retry_count = 0;
                    retry_issue = Some(IssueKind::InvalidRetryCount { value: value.to_string() });
                }
            },
            Column::Passthrough(name) => {
                record.extra.insert(name.clone(), value.to_string());
            }
        }
    }

    let issues: Vec<IssueKind> = score_issue.into_iter().chain(retry_issue).collect();
    (record, issues)
}

/// Empty and `null` mean "not rated".
fn parse_feedback(value: &str) -> Result<Option<u8>, ()> {
    if value.is_empty() || value.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    match parse_whole(value) {
        Some(score @ 1..=5) => Ok(Some(score as u8)),
        _ => Err(()),
    }
}

/// An empty cell counts as no retries.
fn parse_retry(value: &str) -> Result<u32, ()> {
    if value.is_empty() {
        return Ok(0);
    }
    parse_whole(value).and_then(|n| u32::try_from(n).ok()).ok_or(())
}

/// A non-negative whole number, written either as an integer or as a
/// decimal with no fractional part (`"5"`, `"5.0"`).
fn parse_whole(value: &str) -> Option<u64> {
    if let Ok(n) = value.parse::<u64>() {
        return Some(n);
    }
    let x: f64 = value.parse().ok()?;
    (x.is_finite() && x.fract() == 0.0 && x >= 0.0 && x <= u64::MAX as f64).then(|| x as u64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

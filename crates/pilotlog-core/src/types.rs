//! Core types for pilotlog-core.
//!
//! This module defines the data structures shared across all pipeline
//! layers: the normalised [`LogRecord`], its [`Status`] and [`Stage`], and
//! the fixed five-step [`PipelineStage`] funnel.

use serde::Serialize;
use std::collections::BTreeMap;

/// One observed text-to-SQL query event, built from a single CSV data row.
///
/// `date` and `time` are kept as the raw strings from the upload: range
/// filtering compares them lexicographically, which is only meaningful for
/// the fixed-width `YYYY-MM-DD` / `HH:MM:SS` shapes.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub id: String,
    pub user: String,
    pub chat: String,
    pub query: String,
    pub model: String,
    pub stage: Stage,
    pub status: Status,
    /// User rating in 1..=5, absent when the user left no rating.
    pub feedback_score: Option<u8>,
    pub feedback_comment: Option<String>,
    pub date: String,
    pub time: String,
    pub retry_count: u32,
    /// Cells of columns whose header is not in the alias table, keyed by the
    /// header text as it appeared in the upload.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// Terminal outcome of a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Fail,
    Error,
    Blocked,
    Running,
    /// Any value the log producer emitted that is not one of the above,
    /// including an empty cell.
    Other(String),
}

impl Default for Status {
    /// A record from an upload without a status column.
    fn default() -> Self {
        Status::Other(String::new())
    }
}

impl Status {
    /// Parse a status cell. Matching is case-insensitive; unknown values are
    /// kept verbatim in [`Status::Other`].
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "SUCCESS" => Status::Success,
            "FAIL" => Status::Fail,
            "ERROR" => Status::Error,
            "BLOCKED" => Status::Blocked,
            "RUNNING" => Status::Running,
            _ => Status::Other(raw.to_string()),
        }
    }

    /// `FAIL`, `ERROR` and `BLOCKED` feed the error distribution.
    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Fail | Status::Error | Status::Blocked)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Success => "SUCCESS",
            Status::Fail => "FAIL",
            Status::Error => "ERROR",
            Status::Blocked => "BLOCKED",
            Status::Running => "RUNNING",
            Status::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Pipeline stage label as emitted by the log producer, e.g. `"3. 메타 조회"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Stage(pub String);

impl Stage {
    pub fn new(label: impl Into<String>) -> Self {
        Stage(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    /// Zero-based funnel index parsed from the label's leading numeral.
    ///
    /// The numeral is the text before the first `.`, with leading whitespace
    /// skipped and only the leading ASCII digits considered (`"3. x"` → 2,
    /// `" 4abc.x"` → 3). Returns `None` when there is no numeral or it falls
    /// outside 1..=5; such records never enter the funnel.
    pub fn index(&self) -> Option<usize> {
        let head = self.0.split('.').next().unwrap_or_default().trim_start();
        let digits_end = head
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(head.len());
        let n: usize = head[..digits_end].parse().ok()?;
        (1..=PipelineStage::ALL.len()).contains(&n).then(|| n - 1)
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The five fixed steps every query passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    ModelCheck,
    IntentAnalysis,
    MetadataLookup,
    SqlGeneration,
    ResultSummary,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::ModelCheck,
        PipelineStage::IntentAnalysis,
        PipelineStage::MetadataLookup,
        PipelineStage::SqlGeneration,
        PipelineStage::ResultSummary,
    ];

    /// Dashboard label for the funnel axis.
    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::ModelCheck => "1. 모델 상태 확인 (진입)",
            PipelineStage::IntentAnalysis => "2. 질문 분석 & 의도 파악",
            PipelineStage::MetadataLookup => "3. 메타 정보(RAG) 조회",
            PipelineStage::SqlGeneration => "4. SQL 생성 및 검증",
            PipelineStage::ResultSummary => "5. 결과 요약 (완료)",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

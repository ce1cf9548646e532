//! Test builders: ergonomic constructors for `LogRecord` and CSV uploads.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use pilotlog::{LogRecord, Stage, Status};

// ---------------------------------------------------------------------------
// LogRecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`LogRecord`] test fixtures.
///
/// # Example
///
/// ```rust
/// let record = LogRecordBuilder::new("Q-1")
///     .date("2025-12-18")
///     .status(Status::Fail)
///     .stage("3. 메타 조회")
///     .build();
/// ```
pub struct LogRecordBuilder {
    record: LogRecord,
}

impl LogRecordBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            record: LogRecord {
                id: id.into(),
                user: "user_01".to_string(),
                chat: "C-100".to_string(),
                query: "일별 매출 현황".to_string(),
                model: "GPT-4".to_string(),
                stage: Stage::new("5. 결과 요약"),
                status: Status::Success,
                date: "2025-12-18".to_string(),
                time: "09:00:00".to_string(),
                ..LogRecord::default()
            },
        }
    }

    pub fn user(mut self, user: &str) -> Self {
        self.record.user = user.to_string();
        self
    }

    pub fn chat(mut self, chat: &str) -> Self {
        self.record.chat = chat.to_string();
        self
    }

    pub fn model(mut self, model: &str) -> Self {
        self.record.model = model.to_string();
        self
    }

    pub fn stage(mut self, stage: &str) -> Self {
        self.record.stage = Stage::new(stage);
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.record.status = status;
        self
    }

    pub fn rating(mut self, score: u8) -> Self {
        self.record.feedback_score = Some(score);
        self
    }

    pub fn date(mut self, date: &str) -> Self {
        self.record.date = date.to_string();
        self
    }

    pub fn time(mut self, time: &str) -> Self {
        self.record.time = time.to_string();
        self
    }

    pub fn retries(mut self, n: u32) -> Self {
        self.record.retry_count = n;
        self
    }

    pub fn build(self) -> LogRecord {
        self.record
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// A successful query that finished the pipeline.
pub fn success(id: &str, date: &str) -> LogRecord {
    LogRecordBuilder::new(id).date(date).build()
}

/// A failed query stopped at `stage`.
pub fn failure(id: &str, date: &str, stage: &str) -> LogRecord {
    LogRecordBuilder::new(id).date(date).status(Status::Fail).stage(stage).build()
}

/// Borrow every record, the shape the aggregate functions take.
pub fn refs(records: &[LogRecord]) -> Vec<&LogRecord> {
    records.iter().collect()
}

// ---------------------------------------------------------------------------
// Upload helpers
// ---------------------------------------------------------------------------

/// Join `header` and `rows` into CSV text with `\n` line endings.
pub fn csv(header: &str, rows: &[&str]) -> String {
    std::iter::once(header).chain(rows.iter().copied()).collect::<Vec<_>>().join("\n")
}

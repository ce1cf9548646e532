//! Upload validation: everything the normalizer silently tolerates, listed.
//!
//! A file can load fine and still be unusable for some views: rows dropped
//! for being short, ratings that were defaulted, or records with no `time`
//! or `stage`. [`validate`] collects all of it into one report.

use pilotlog_core::normalizer::{ingest_text, Field, NumericPolicy, RowIssue};
use pilotlog_core::LogRecord;
use serde::Serialize;

/// Fields every record should carry for all views to be meaningful.
pub const REQUIRED: [Field; 5] = [Field::Id, Field::Date, Field::Time, Field::Status, Field::Stage];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingField {
    /// Position among accepted records, 0-based.
    pub record: usize,
    pub id: String,
    pub field: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub rows_seen: usize,
    pub accepted: usize,
    pub issues: Vec<RowIssue>,
    pub missing: Vec<MissingField>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.accepted > 0 && self.issues.is_empty() && self.missing.is_empty()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} of {} data rows accepted", self.accepted, self.rows_seen)?;
        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        for m in &self.missing {
            writeln!(f, "  record {} ({}): missing {}", m.record, m.id, m.field)?;
        }
        if self.is_clean() {
            writeln!(f, "all records have the required fields")?;
        }
        Ok(())
    }
}

pub fn validate(text: &str, policy: NumericPolicy) -> ValidationReport {
    let ingest = ingest_text(text, policy);
    let missing = ingest
        .records
        .iter()
        .enumerate()
        .flat_map(|(i, record)| {
            REQUIRED
                .into_iter()
                .filter(move |&field| is_blank(record, field))
                .map(move |field| MissingField {
                    record: i,
                    id: record.id.clone(),
                    field: field.name(),
                })
        })
        .collect();

    ValidationReport {
        rows_seen: ingest.rows_seen,
        accepted: ingest.records.len(),
        issues: ingest.issues,
        missing,
    }
}

fn is_blank(record: &LogRecord, field: Field) -> bool {
    match field {
        Field::Id => record.id.is_empty(),
        Field::Date => record.date.is_empty(),
        Field::Time => record.time.is_empty(),
        Field::Status => record.status.as_str().is_empty(),
        Field::Stage => record.stage.label().is_empty(),
        _ => false,
    }
}

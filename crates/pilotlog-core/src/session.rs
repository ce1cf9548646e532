//! Session — the single owner of the loaded records and the view filters.
//!
//! State lives in an immutable [`Snapshot`]. Every mutation (upload, range
//! change, rating change, paging, refresh) builds a new snapshot; derived
//! views are computed lazily once per snapshot and never patched in place.

use crate::aggregate::{self, DailyPoint, ErrorSlice, FunnelStep, Kpis};
use crate::config::Config;
use crate::filter::{filter_range, DateRange, RatingFilter};
use crate::normalizer::{self, Ingest, NumericPolicy, RowIssue};
use crate::types::LogRecord;
use serde::Serialize;
use std::sync::{Arc, OnceLock};

/// Upload rejected; the previously loaded records are still in place.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("upload contained no valid rows ({rows_seen} data rows examined, {issues} issues)")]
    NoValidRows { rows_seen: usize, issues: usize },
}

/// All aggregate views over the range-filtered records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    pub kpis: Kpis,
    pub daily: Vec<DailyPoint>,
    pub funnel: Vec<FunnelStep>,
    pub errors: Vec<ErrorSlice>,
}

impl DashboardViews {
    pub fn compute(records: &[LogRecord], range: &DateRange) -> Self {
        let in_range = filter_range(records, range);
        tracing::debug!(records = records.len(), in_range = in_range.len(), "recomputing views");
        Self {
            kpis: aggregate::kpis(&in_range),
            daily: aggregate::daily_series(&in_range, range),
            funnel: aggregate::funnel(&in_range),
            errors: aggregate::error_distribution(&in_range),
        }
    }
}

/// An immutable view of session state.
#[derive(Debug)]
pub struct Snapshot {
    records: Arc<[LogRecord]>,
    range: DateRange,
    rating: RatingFilter,
    display_count: usize,
    views: OnceLock<DashboardViews>,
}

impl Snapshot {
    fn new(records: Arc<[LogRecord]>, range: DateRange, rating: RatingFilter, display_count: usize) -> Self {
        Self {
            records,
            range,
            rating,
            display_count,
            views: OnceLock::new(),
        }
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn rating(&self) -> RatingFilter {
        self.rating
    }

    pub fn display_count(&self) -> usize {
        self.display_count
    }

    /// Aggregates for this snapshot, computed on first access.
    pub fn views(&self) -> &DashboardViews {
        self.views
            .get_or_init(|| DashboardViews::compute(&self.records, &self.range))
    }

    /// In-range records passing the rating filter, most recent first.
    pub fn table_logs(&self) -> Vec<&LogRecord> {
        filter_range(&self.records, &self.range)
            .into_iter()
            .filter(|r| self.rating.matches(r))
            .collect()
    }

    /// The first `display_count` rows of [`Snapshot::table_logs`].
    pub fn visible_logs(&self) -> Vec<&LogRecord> {
        let mut logs = self.table_logs();
        logs.truncate(self.display_count);
        logs
    }

    /// Whether [`Session::load_more`] would reveal more rows.
    pub fn has_more(&self) -> bool {
        self.table_logs().len() > self.display_count
    }
}

/// Outcome of an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    pub accepted: usize,
    pub rows_seen: usize,
    pub issues: Vec<RowIssue>,
    /// Range detected from the new records; `None` keeps the current range.
    pub detected_range: Option<DateRange>,
}

/// Dashboard session: current snapshot plus the settings it resets to.
#[derive(Debug)]
pub struct Session {
    current: Arc<Snapshot>,
    default_range: DateRange,
    page_size: usize,
    policy: NumericPolicy,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let default_range = config.dashboard.default_range();
        let page_size = config.dashboard.page_size.max(1);
        let policy = config.ingest.numeric_policy();
        Self {
            current: Arc::new(Snapshot::new(
                Arc::from(Vec::new()),
                default_range.clone(),
                RatingFilter::All,
                page_size,
            )),
            default_range,
            page_size,
            policy,
        }
    }

    /// Start from already-normalised records, keeping the default range.
    pub fn with_records(config: &Config, records: Vec<LogRecord>) -> Self {
        let mut session = Self::new(config);
        let range = session.current.range.clone();
        let page_size = session.page_size;
        session.replace(Snapshot::new(records.into(), range, RatingFilter::All, page_size));
        session
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Parse and load an uploaded CSV, replacing all records.
    ///
    /// On success the date range snaps to the span of valid dates in the
    /// upload (if any) and paging restarts. The rating filter is kept. When
    /// the upload yields no records the session is left untouched.
    pub fn upload(&mut self, text: &str) -> Result<UploadSummary, UploadError> {
        let Ingest { records, issues, rows_seen } = normalizer::ingest_text(text, self.policy);
        if records.is_empty() {
            tracing::warn!(rows_seen, issues = issues.len(), "upload rejected: no valid rows");
            return Err(UploadError::NoValidRows { rows_seen, issues: issues.len() });
        }

        let detected_range = DateRange::detect(&records);
        let range = detected_range.clone().unwrap_or_else(|| self.current.range.clone());
        let accepted = records.len();
        tracing::info!(accepted, rows_seen, ?range, "upload loaded");

        self.replace(Snapshot::new(records.into(), range, self.current.rating, self.page_size));
        Ok(UploadSummary {
            accepted,
            rows_seen,
            issues,
            detected_range,
        })
    }

    pub fn set_range(&mut self, range: DateRange) {
        let s = &self.current;
        let next = Snapshot::new(Arc::clone(&s.records), range, s.rating, self.page_size);
        self.replace(next);
    }

    pub fn set_rating(&mut self, rating: RatingFilter) {
        let s = &self.current;
        let next = Snapshot::new(Arc::clone(&s.records), s.range.clone(), rating, self.page_size);
        self.replace(next);
    }

    /// Reveal one more page of table rows.
    pub fn load_more(&mut self) {
        let s = &self.current;
        let next = Snapshot::new(
            Arc::clone(&s.records),
            s.range.clone(),
            s.rating,
            s.display_count + self.page_size,
        );
        self.replace(next);
    }

    /// Reset filters and paging to their defaults. Records are kept.
    pub fn refresh(&mut self) {
        let next = Snapshot::new(
            Arc::clone(&self.current.records),
            self.default_range.clone(),
            RatingFilter::All,
            self.page_size,
        );
        self.replace(next);
    }

    fn replace(&mut self, next: Snapshot) {
        self.current = Arc::new(next);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

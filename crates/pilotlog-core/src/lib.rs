//! pilotlog-core — ingestion and metrics for text-to-SQL pilot logs.
//!
//! This crate exposes the pipeline layers as public modules, plus the shared
//! types used across all layers.
//!
//! # Architecture
//!
//! ```text
//! text ──► csv ──► normalizer ──► filter ──► aggregate
//!                      │                        │
//!                      └──────► session ◄───────┘
//! ```
//!
//! Everything is synchronous and pure; [`session::Session`] is the only
//! holder of state and replaces it wholesale on every change.

pub mod aggregate;
pub mod config;
pub mod csv;
pub mod filter;
pub mod normalizer;
pub mod session;
pub mod types;

pub use filter::{DateRange, RatingFilter};
pub use normalizer::{Ingest, NumericPolicy, RowIssue};
pub use session::{DashboardViews, Session, Snapshot, UploadError, UploadSummary};
pub use types::{LogRecord, PipelineStage, Stage, Status};

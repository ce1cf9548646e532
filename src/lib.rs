//! pilotlog — analytics for text-to-SQL pilot service logs.
//!
//! Ingests CSV exports of per-query logs and derives the dashboard views:
//! headline KPIs, a daily request/success series, the five-stage pipeline
//! funnel and the failure-cause distribution. This crate re-exports the core
//! and feed layers so that integration tests and the CLI import them from
//! one place, and adds the sample generator and the validator.
//!
//! # Architecture
//!
//! ```text
//! feeds ──► Session ──► csv ──► normalizer ──► filter ──► aggregate
//!   │                                                        │
//!   └─ file / stdin                          DashboardViews ◄┘
//! ```

pub mod sample;
pub mod validate;

pub use pilotlog_core::*;
pub use pilotlog_feeds as feeds;

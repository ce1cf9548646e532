#![allow(dead_code, unused_imports)]
//! Shared test utilities for pilotlog integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file.

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;

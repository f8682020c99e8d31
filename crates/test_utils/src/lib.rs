//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! eligibility engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built configuration, dates, and the reference scenario
//! - `builders`: Builder patterns for fund rows and report requests
//! - `fakes`: In-memory rate providers and clocks
//! - `assertions`: Custom assertion helpers for report results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod fakes;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use fakes::*;
pub use assertions::*;
pub use generators::*;

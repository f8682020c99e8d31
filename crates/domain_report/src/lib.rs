//! Eligibility Report
//!
//! Brings the funds and surcharge calculations together into a single
//! report for one applicant:
//!
//! ```text
//!   ReportRequest ──► funds required ──┐
//!                 ──► funds available ─┼──► Report (+ gap)
//!                 ──► IHS ─────────────┘
//! ```
//!
//! The report holds raw numbers and ISO dates; formatting for display or
//! PDF is left to the consumer.

pub mod config;
pub mod request;
pub mod assembler;
pub mod error;

pub use config::{EligibilityConfig, IhsConfig, FeeDefaults, FxSettings};
pub use request::{ReportRequest, IhsOptions, ManualFx};
pub use assembler::{Report, ReportAssembler};
pub use error::ReportError;

//! Immigration Health Surcharge Domain
//!
//! Works out how long a student visa will run and what the surcharge for
//! that stay costs.
//!
//! # Steps
//!
//! 1. Classify the course by calendar-month length to get the wrap periods
//! 2. Project the grant date from the application date and service tier
//! 3. Settle the travel date and the visa start
//! 4. Extend the course end by the post-course wrap
//! 5. Bill the stay in 6-month units
//!
//! Missing or inverted course dates produce an empty, zero-cost result so a
//! quick estimate can be shown while the form is incomplete.

pub mod visa;
pub mod charge;
pub mod calculator;
pub mod error;

pub use visa::{CourseCategory, WrapLength, WrapPeriod, VisaServiceTier, ServiceDecisionDays, VisaWindow};
pub use charge::{IhsRates, IhsCharge, stay_months, UNIT_MONTHS};
pub use calculator::{IhsRequest, IhsResult, calculate_ihs};
pub use error::IhsError;

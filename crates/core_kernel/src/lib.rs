//! Core Kernel - Foundational types and utilities for the eligibility engine
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Money and ISO currency codes with precise decimal arithmetic
//! - Calendar arithmetic for course, statement, and visa periods
//! - Port infrastructure for external collaborators (exchange rates)
//! - Strongly-typed identifiers

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError, checked_sum, round_money, round_rate};
pub use temporal::{
    Timezone, TemporalError, DateRange, Clock, SystemClock, FixedClock,
    days_between, months_approx, calendar_months_elapsed, add_calendar_months,
    add_working_days, add_calendar_days, parse_date_lenient,
};
pub use identifiers::ReportId;
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};

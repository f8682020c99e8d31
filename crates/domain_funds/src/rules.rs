//! Evidence rules applied to submitted funds

use serde::{Deserialize, Serialize};

/// Thresholds for the available-funds checks, in days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundRules {
    /// Consecutive days the funds must have been held
    pub funds_hold_days: i64,
    /// Maximum age of the statement end at the application date
    pub statement_age_days: i64,
    /// Maximum age of a loan letter at the application date
    pub loan_letter_max_age_days: i64,
}

impl Default for FundRules {
    fn default() -> Self {
        Self {
            funds_hold_days: 28,
            statement_age_days: 31,
            loan_letter_max_age_days: 180,
        }
    }
}

//! FX and configuration DTOs

use domain_funds::ManualFxOverrides;
use domain_report::EligibilityConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decimal_from_value;

/// Query string of `GET /api/fx`
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FxQuery {
    pub from: String,
    pub to: String,
    pub manual_enabled: bool,
    pub manual_inr_per_gbp: Option<String>,
}

impl Default for FxQuery {
    fn default() -> Self {
        Self {
            from: "GBP".to_string(),
            to: "INR".to_string(),
            manual_enabled: false,
            manual_inr_per_gbp: None,
        }
    }
}

impl FxQuery {
    /// `configured` plus the legacy INR rate, when enabled and positive
    pub fn overrides(&self, configured: &ManualFxOverrides) -> ManualFxOverrides {
        let inr = self
            .manual_inr_per_gbp
            .as_deref()
            .and_then(|s| decimal_from_value(&Value::String(s.to_string())))
            .filter(|r| *r > Decimal::ZERO);

        match inr {
            Some(inr) if self.manual_enabled => configured.clone().with_inr_per_gbp(inr),
            _ => configured.clone(),
        }
    }
}

/// Body returned by `GET /api/config`
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config: EligibilityConfig,
    /// Where the configuration was loaded from
    pub source: String,
    /// Remote overlay merged over `source`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_url: Option<String>,
    pub timezone: String,
}

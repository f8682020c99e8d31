//! Visa routes and their maintenance rates
//!
//! Routes are configuration, not code: the rates change every April and are
//! loaded from the eligibility configuration at startup.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::FundsError;

/// Study location used to select maintenance rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    London,
    #[default]
    OutsideLondon,
}

impl Region {
    /// Normalises free-text location input
    ///
    /// Anything mentioning London is London unless it also says "outside",
    /// so "Inner London" is London and "Outside London" or "Manchester" is not.
    pub fn normalize(input: &str) -> Self {
        let lower = input.to_lowercase();
        if lower.contains("london") && !lower.contains("outside") {
            Region::London
        } else {
            Region::OutsideLondon
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::London => "london",
            Region::OutsideLondon => "outside_london",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A monthly GBP rate that differs between London and elsewhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalRates {
    pub london: Decimal,
    pub outside_london: Decimal,
}

impl RegionalRates {
    pub fn for_region(&self, region: Region) -> Decimal {
        match region {
            Region::London => self.london,
            Region::OutsideLondon => self.outside_london,
        }
    }
}

/// Maintenance rules for one visa route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRoute {
    /// Cap on the number of maintenance months counted
    pub max_months: u32,
    pub maintenance_monthly_gbp: RegionalRates,
    pub dependant_monthly_gbp: RegionalRates,
    #[serde(default)]
    pub dependants_allowed: bool,
}

/// All configured routes keyed by route identifier ("student", ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable(HashMap<String, EligibilityRoute>);

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, key: impl Into<String>, route: EligibilityRoute) -> Self {
        self.0.insert(key.into(), route);
        self
    }

    /// Looks up a route, failing on unknown keys
    pub fn get(&self, key: &str) -> Result<&EligibilityRoute, FundsError> {
        self.0
            .get(key)
            .ok_or_else(|| FundsError::UnknownRoute(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, EligibilityRoute)> for RouteTable {
    fn from_iter<T: IntoIterator<Item = (String, EligibilityRoute)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_region_normalize() {
        assert_eq!(Region::normalize("London"), Region::London);
        assert_eq!(Region::normalize("inner london"), Region::London);
        assert_eq!(Region::normalize("outside_london"), Region::OutsideLondon);
        assert_eq!(Region::normalize("Outside London"), Region::OutsideLondon);
        assert_eq!(Region::normalize("Manchester"), Region::OutsideLondon);
        assert_eq!(Region::normalize(""), Region::OutsideLondon);
    }

    #[test]
    fn test_unknown_route() {
        let table = RouteTable::new();
        assert_eq!(
            table.get("graduate"),
            Err(FundsError::UnknownRoute("graduate".to_string()))
        );
    }

    #[test]
    fn test_route_table_deserializes_as_map() {
        let json = r#"{
            "student": {
                "max_months": 9,
                "maintenance_monthly_gbp": {"london": 1483, "outside_london": 1136},
                "dependant_monthly_gbp": {"london": 845, "outside_london": 680},
                "dependants_allowed": true
            }
        }"#;
        let table: RouteTable = serde_json::from_str(json).unwrap();
        let route = table.get("student").unwrap();
        assert_eq!(route.max_months, 9);
        assert_eq!(route.maintenance_monthly_gbp.for_region(Region::London), dec!(1483));
        assert_eq!(route.dependant_monthly_gbp.for_region(Region::OutsideLondon), dec!(680));
    }
}

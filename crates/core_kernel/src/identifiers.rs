//! Strongly-typed identifiers
//!
//! Every assembled report gets its own identifier so renderers and logs can
//! correlate a PDF with the computation that produced it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const REPORT_PREFIX: &str = "RPT";

/// Identifier of one eligibility report computation
///
/// Time-ordered (UUID v7) so identifiers sort by generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(Uuid);

impl ReportId {
    /// Creates a new time-ordered identifier
    pub fn new_v7() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::new_v7()
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", REPORT_PREFIX, self.0)
    }
}

impl FromStr for ReportId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid_str = s
            .strip_prefix(REPORT_PREFIX)
            .and_then(|rest| rest.strip_prefix('-'))
            .unwrap_or(s);
        Ok(Self(Uuid::parse_str(uuid_str)?))
    }
}

impl From<Uuid> for ReportId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_id_display() {
        let id = ReportId::new_v7();
        assert!(id.to_string().starts_with("RPT-"));
    }

    #[test]
    fn test_report_id_parsing_strips_prefix() {
        let original = ReportId::new_v7();
        let parsed: ReportId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);

        let bare: ReportId = original.as_uuid().to_string().parse().unwrap();
        assert_eq!(original, bare);
    }

    #[test]
    fn test_reports_get_distinct_ids() {
        assert_ne!(ReportId::new_v7(), ReportId::new_v7());
    }
}

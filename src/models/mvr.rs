//! Motor vehicle record model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError, DefaultOnNull};

use super::de::{string_or_number, Folded};
use super::{resource_path, single_from_response, Accident, LicenseInfo, Resource, Violation};
use crate::client::{JsonMap, SambaSafetyClient};
use crate::error::Result;
use crate::pagination::Collection;
use crate::traits::{Get, List};

/// A motor vehicle record report for one driver and state.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MvrRecord {
    /// MVR record ID.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,

    /// Driver the report belongs to.
    #[serde(default, deserialize_with = "string_or_number")]
    pub driver_id: String,

    /// State the report was pulled from.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub state: String,

    /// License number the report was pulled for.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub license_number: String,

    /// Report status, e.g. `pending` or `completed`.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default = "default_status")]
    pub status: String,

    /// When the report was ordered.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub request_date: Option<DateTime<Utc>>,

    /// When the state returned the report.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub report_date: Option<DateTime<Utc>>,

    /// Violations in server order.
    #[serde_as(as = "DefaultOnNull<Vec<Folded>>")]
    #[serde(default)]
    pub violations: Vec<Violation>,

    /// Accidents in server order.
    #[serde_as(as = "DefaultOnNull<Vec<Folded>>")]
    #[serde(default)]
    pub accidents: Vec<Accident>,

    /// License as reported alongside the record.
    #[serde_as(as = "Option<Folded>")]
    #[serde(default)]
    pub license_info: Option<LicenseInfo>,

    /// Additional report fields.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub metadata: JsonMap,
}

fn default_status() -> String {
    "pending".to_string()
}

impl Resource for MvrRecord {
    const CAMEL_CASE_FIELDS: &'static [&'static str] = &[
        "driver_id",
        "license_number",
        "request_date",
        "report_date",
        "license_info",
    ];
}

impl MvrRecord {
    /// Status is exactly `completed`.
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }

    /// Status is exactly `pending`.
    pub fn is_pending(&self) -> bool {
        self.status == "pending"
    }

    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn has_accidents(&self) -> bool {
        !self.accidents.is_empty()
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn accident_count(&self) -> usize {
        self.accidents.len()
    }

    /// Violations with a major severity.
    pub fn major_violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.is_major())
    }
}

/// A page of MVR records.
pub type MvrCollection = Collection<MvrRecord>;

impl Collection<MvrRecord> {
    /// Completed records only.
    #[must_use]
    pub fn completed(self) -> Self {
        self.filter(MvrRecord::is_completed)
    }

    /// Pending records only.
    #[must_use]
    pub fn pending(self) -> Self {
        self.filter(MvrRecord::is_pending)
    }

    /// Records with at least one violation.
    #[must_use]
    pub fn with_violations(self) -> Self {
        self.filter(MvrRecord::has_violations)
    }

    /// Records with at least one accident.
    #[must_use]
    pub fn with_accidents(self) -> Self {
        self.filter(MvrRecord::has_accidents)
    }

    /// Records for a state (case-insensitive).
    #[must_use]
    pub fn for_state(self, state: &str) -> Self {
        self.filter(|r| r.state.eq_ignore_ascii_case(state))
    }

    /// Sum of violations across all records.
    pub fn total_violations(&self) -> usize {
        self.iter().map(MvrRecord::violation_count).sum()
    }

    /// Sum of accidents across all records.
    pub fn total_accidents(&self) -> usize {
        self.iter().map(MvrRecord::accident_count).sum()
    }
}

#[async_trait]
impl Get for MvrRecord {
    #[tracing::instrument(skip(client))]
    async fn get(client: &SambaSafetyClient, id: &str) -> Result<Self> {
        let response = client.get(&resource_path(Self::PATH, id)).await?;
        single_from_response(response)
    }
}

#[async_trait]
impl List for MvrRecord {
    const PATH: &'static str = "mvr-records";
}

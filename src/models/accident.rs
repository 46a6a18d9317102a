//! Accident entries of an MVR report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError, DefaultOnNull, DisplayFromStr, PickFirst};

use super::de::{string_or_number, LooseBool, LooseInt};
use super::violation::MAJOR_SEVERITIES;
use super::Resource;
use crate::client::JsonMap;

/// An accident recorded on a motor vehicle record.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accident {
    /// Accident ID.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,

    /// When the accident happened.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    /// Accident type, e.g. "collision".
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type", default = "default_type")]
    pub accident_type: String,

    /// Severity label, e.g. "minor", "injury" or "fatal".
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default = "default_severity")]
    pub severity: String,

    /// Where the accident happened.
    #[serde(default)]
    pub location: Option<String>,

    /// Number of people killed.
    #[serde_as(as = "DefaultOnError<Option<LooseInt>>")]
    #[serde(default)]
    pub fatalities: Option<u32>,

    /// Number of people injured.
    #[serde_as(as = "DefaultOnError<Option<LooseInt>>")]
    #[serde(default)]
    pub injuries: Option<u32>,

    /// Property damage in account currency.
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    pub damage_amount: Option<f64>,

    /// Whether the driver was found at fault.
    #[serde_as(as = "LooseBool")]
    #[serde(default)]
    pub at_fault: bool,

    /// Narrative from the report.
    #[serde(default)]
    pub description: Option<String>,

    /// Additional report fields; `preventable` is read from here.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub metadata: JsonMap,
}

fn default_type() -> String {
    "unknown".to_string()
}

fn default_severity() -> String {
    "minor".to_string()
}

impl Resource for Accident {
    const CAMEL_CASE_FIELDS: &'static [&'static str] = &["damage_amount", "at_fault"];
}

impl Accident {
    /// At least one fatality.
    pub fn is_fatal(&self) -> bool {
        self.fatalities.is_some_and(|n| n > 0)
    }

    /// At least one injury.
    pub fn has_injuries(&self) -> bool {
        self.injuries.is_some_and(|n| n > 0)
    }

    /// Flagged preventable in the metadata bag.
    pub fn is_preventable(&self) -> bool {
        self.metadata
            .get("preventable")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Severe by label, or involving injuries or fatalities.
    pub fn is_major(&self) -> bool {
        MAJOR_SEVERITIES.contains(&self.severity.to_lowercase().as_str())
            || self.is_fatal()
            || self.has_injuries()
    }
}

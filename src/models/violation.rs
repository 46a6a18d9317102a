//! Traffic violation entries of an MVR report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError, DefaultOnNull, DisplayFromStr, PickFirst};

use super::de::{string_or_number, LooseBool, LooseInt};
use super::Resource;
use crate::client::JsonMap;

/// Severities counted as major.
pub(crate) const MAJOR_SEVERITIES: [&str; 3] = ["major", "serious", "severe"];

/// Description keywords that mark a moving violation.
const MOVING_KEYWORDS: [&str; 4] = ["speeding", "reckless", "following", "lane"];

/// A violation recorded on a motor vehicle record.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Violation ID.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,

    /// State violation code.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub code: String,

    /// Human-readable description.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub description: String,

    /// Severity label, e.g. "minor" or "major".
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default = "default_severity")]
    pub severity: String,

    /// When the violation occurred.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    /// Where the violation occurred.
    #[serde(default)]
    pub location: Option<String>,

    /// Fine imposed, in account currency.
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    pub fine_amount: Option<f64>,

    /// Whether the violation resulted in a conviction.
    #[serde_as(as = "LooseBool")]
    #[serde(default)]
    pub conviction: bool,

    /// Points assessed against the license.
    #[serde_as(as = "DefaultOnError<Option<LooseInt>>")]
    #[serde(default)]
    pub points: Option<i64>,

    /// Additional state-specific fields.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub metadata: JsonMap,
}

fn default_severity() -> String {
    "minor".to_string()
}

impl Resource for Violation {
    const CAMEL_CASE_FIELDS: &'static [&'static str] = &["fine_amount"];
}

impl Violation {
    /// Severity is major, serious or severe.
    pub fn is_major(&self) -> bool {
        MAJOR_SEVERITIES.contains(&self.severity.to_lowercase().as_str())
    }

    /// Driving under the influence, judged from description or code.
    pub fn is_dui(&self) -> bool {
        let description = self.description.to_lowercase();
        description.contains("dui")
            || description.contains("dwi")
            || self.code.to_lowercase().contains("dui")
    }

    /// The description mentions a moving-violation keyword.
    pub fn is_moving_violation(&self) -> bool {
        let description = self.description.to_lowercase();
        MOVING_KEYWORDS.iter().any(|k| description.contains(k))
    }
}

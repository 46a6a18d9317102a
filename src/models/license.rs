//! Driver's license information and license-discovery result types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError, DefaultOnNull};

use super::de::{Folded, LooseBool};
use super::Resource;
use crate::client::JsonMap;

/// Statuses that count as suspended.
const SUSPENDED_STATUSES: [&str; 3] = ["suspended", "revoked", "cancelled"];

/// License classes that count as commercial, besides any `CDL*` class.
const COMMERCIAL_CLASSES: [&str; 3] = ["A", "B", "C"];

/// A driver's license as reported by a state.
///
/// Endorsements and restrictions keep server order; membership checks are
/// case-insensitive.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseInfo {
    /// License number.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub number: String,

    /// Issuing state code.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub state: String,

    /// License status, `active` unless the server says otherwise.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default = "default_status")]
    pub status: String,

    /// License class, e.g. "C" or "CDL-A".
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "class", default = "default_class")]
    pub license_class: String,

    /// When the license was issued.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub issue_date: Option<DateTime<Utc>>,

    /// When the license expires.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,

    /// Endorsement codes, e.g. "H" for hazardous materials.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub endorsements: Vec<String>,

    /// Restriction codes, e.g. "B" for corrective lenses.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub restrictions: Vec<String>,

    /// Additional state-specific fields.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub metadata: JsonMap,
}

fn default_status() -> String {
    "active".to_string()
}

fn default_class() -> String {
    "regular".to_string()
}

impl Resource for LicenseInfo {
    const CAMEL_CASE_FIELDS: &'static [&'static str] = &["issue_date", "expiration_date"];
}

impl LicenseInfo {
    /// Status is `active` (case-insensitive).
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }

    /// Status is suspended, revoked or cancelled.
    pub fn is_suspended(&self) -> bool {
        SUSPENDED_STATUSES.contains(&self.status.to_lowercase().as_str())
    }

    /// Expiration date lies in the past. No expiration date means not expired.
    pub fn is_expired(&self) -> bool {
        self.expiration_date.is_some_and(|exp| exp < Utc::now())
    }

    /// Expires within `days` from now (already expired licenses included).
    pub fn is_expiring_soon(&self, days: i64) -> bool {
        let warning = Utc::now() + Duration::days(days);
        self.expiration_date.is_some_and(|exp| exp <= warning)
    }

    pub fn has_endorsement(&self, endorsement: &str) -> bool {
        contains_ignore_case(&self.endorsements, endorsement)
    }

    pub fn has_restriction(&self, restriction: &str) -> bool {
        contains_ignore_case(&self.restrictions, restriction)
    }

    /// Commercial class: `CDL*`, `A`, `B` or `C`.
    pub fn is_commercial(&self) -> bool {
        let class = self.license_class.to_uppercase();
        class.starts_with("CDL") || COMMERCIAL_CLASSES.contains(&class.as_str())
    }
}

fn contains_ignore_case(values: &[String], needle: &str) -> bool {
    values.iter().any(|v| v.eq_ignore_ascii_case(needle))
}

/// A license to check in a bulk validation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseLookup {
    /// License number as issued.
    pub license_number: String,
    /// Two-letter issuing state.
    pub state: String,
}

impl LicenseLookup {
    /// Pair a license number with its issuing state.
    pub fn new(license_number: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            license_number: license_number.into(),
            state: state.into(),
        }
    }
}

/// Per-license outcome of a bulk validation, as reported by the server.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkValidationResult {
    /// License number that was checked.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub license_number: String,

    /// State the license was checked against.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub state: String,

    /// Whether the server accepted the license.
    #[serde_as(as = "LooseBool")]
    #[serde(default)]
    pub valid: bool,

    /// The matching license record, when found.
    #[serde_as(as = "Option<Folded>")]
    #[serde(default)]
    pub license_info: Option<LicenseInfo>,

    /// Server-supplied errors, passed through verbatim.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub errors: Vec<Value>,
}

impl Resource for BulkValidationResult {
    const CAMEL_CASE_FIELDS: &'static [&'static str] = &["license_number", "license_info"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expiring_in(days: i64) -> LicenseInfo {
        let expiration = (Utc::now() + Duration::days(days)).to_rfc3339();
        LicenseInfo::from_value(json!({
            "number": "D123",
            "state": "CA",
            "expiration_date": expiration
        }))
        .unwrap()
    }

    #[test]
    fn test_license_defaults() {
        let l = LicenseInfo::from_value(json!({})).unwrap();
        assert_eq!(l.status, "active");
        assert_eq!(l.license_class, "regular");
        assert!(l.is_active());
        assert!(!l.is_expired());
        assert!(!l.is_expiring_soon(30));
        assert!(!l.is_commercial());
    }

    #[test]
    fn test_is_expiring_soon() {
        assert!(expiring_in(10).is_expiring_soon(30));
        assert!(!expiring_in(40).is_expiring_soon(30));
        assert!(!expiring_in(10).is_expired());
    }

    #[test]
    fn test_is_expired() {
        let l = expiring_in(-1);
        assert!(l.is_expired());
        assert!(l.is_expiring_soon(30));
    }

    #[test]
    fn test_is_suspended() {
        for status in ["suspended", "Revoked", "CANCELLED"] {
            let l = LicenseInfo::from_value(json!({"status": status})).unwrap();
            assert!(l.is_suspended(), "{status} should be suspended");
            assert!(!l.is_active());
        }
        let l = LicenseInfo::from_value(json!({"status": "Active"})).unwrap();
        assert!(!l.is_suspended());
        assert!(l.is_active());
    }

    #[test]
    fn test_is_commercial() {
        for class in ["A", "b", "C", "CDL-A", "cdl"] {
            let l = LicenseInfo::from_value(json!({"class": class})).unwrap();
            assert!(l.is_commercial(), "{class} should be commercial");
        }
        let l = LicenseInfo::from_value(json!({"class": "D"})).unwrap();
        assert!(!l.is_commercial());
    }

    #[test]
    fn test_endorsements_and_restrictions() {
        let l = LicenseInfo::from_value(json!({
            "endorsements": ["H", "n"],
            "restrictions": ["B"]
        }))
        .unwrap();

        assert!(l.has_endorsement("h"));
        assert!(l.has_endorsement("N"));
        assert!(!l.has_endorsement("T"));
        assert!(l.has_restriction("b"));
    }

    #[test]
    fn test_both_date_spellings_prefers_snake_case() {
        let l = LicenseInfo::from_value(json!({
            "expiration_date": "2030-05-01T00:00:00Z",
            "expirationDate": "2001-01-01T00:00:00Z",
            "issueDate": "2020-05-01T00:00:00Z"
        }))
        .unwrap();

        assert!(!l.is_expired());
        assert!(l.issue_date.is_some());
    }

    #[test]
    fn test_bulk_result_loose_flags_and_nested_camel_case() {
        let r = BulkValidationResult::from_value(json!({
            "licenseNumber": "A1",
            "state": "CA",
            "valid": "1",
            "licenseInfo": {"number": "A1", "expirationDate": "2001-01-01T00:00:00Z"}
        }))
        .unwrap();

        assert_eq!(r.license_number, "A1");
        assert!(r.valid);
        assert!(r.license_info.unwrap().is_expired());
    }

    #[test]
    fn test_camel_case_dates() {
        let l = LicenseInfo::from_value(json!({
            "issueDate": "2019-01-01T00:00:00Z",
            "expirationDate": "not a date"
        }))
        .unwrap();
        assert!(l.issue_date.is_some());
        assert!(l.expiration_date.is_none());
    }

    #[test]
    fn test_license_round_trip() {
        let l = LicenseInfo::from_value(json!({
            "number": "D1234567",
            "state": "TX",
            "status": "active",
            "class": "CDL-A",
            "issue_date": "2018-02-03T00:00:00Z",
            "expiration_date": "2026-02-03T00:00:00Z",
            "endorsements": ["H", "T"],
            "restrictions": [],
            "metadata": {"source": "state-dmv"}
        }))
        .unwrap();

        let json = l.to_json();
        assert_eq!(json.get("class"), Some(&json!("CDL-A")));
        assert_eq!(LicenseInfo::from_json(json).unwrap(), l);
    }

    #[test]
    fn test_bulk_result_passes_errors_through() {
        let r = BulkValidationResult::from_value(json!({
            "license_number": "X1",
            "state": "NV",
            "valid": false,
            "errors": ["not found", {"code": 404}]
        }))
        .unwrap();

        assert!(!r.valid);
        assert!(r.license_info.is_none());
        assert_eq!(r.errors.len(), 2);
        assert_eq!(r.errors[1], json!({"code": 404}));
    }
}

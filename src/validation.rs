//! Pre-flight validation of driver payloads.
//!
//! Checks run before any network call and fail fast: only the first
//! violation is reported, as a [`SambaSafetyError::Validation`] with no
//! status code.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::client::JsonMap;
use crate::error::{Result, SambaSafetyError};

const REQUIRED_CREATE_FIELDS: [&str; 2] = ["first_name", "last_name"];
const DRIVER_STATUSES: [&str; 3] = ["active", "inactive", "suspended"];
const LICENSE_MIN_LEN: usize = 3;
const LICENSE_MAX_LEN: usize = 50;

/// Validation rules for driver create and update payloads.
pub struct DriverValidator;

impl DriverValidator {
    /// Validate a create payload.
    ///
    /// `first_name` and `last_name` are required; `email`, `license_number`
    /// and `date_of_birth` are checked when present.
    ///
    /// # Example
    ///
    /// ```
    /// use sambasafety::DriverValidator;
    /// use serde_json::json;
    ///
    /// let ok = json!({"first_name": "John", "last_name": "Doe"});
    /// assert!(DriverValidator::validate_create(ok.as_object().unwrap()).is_ok());
    ///
    /// let bad = json!({"first_name": "", "last_name": "Doe"});
    /// assert!(DriverValidator::validate_create(bad.as_object().unwrap()).is_err());
    /// ```
    pub fn validate_create(data: &JsonMap) -> Result<()> {
        for field in REQUIRED_CREATE_FIELDS {
            if data.get(field).map_or(true, is_empty_value) {
                return Err(SambaSafetyError::validation(format!(
                    "Field '{field}' is required"
                )));
            }
        }

        validate_common(data)
    }

    /// Validate a partial update payload.
    ///
    /// Every field is optional. `status`, when present, must be one of
    /// `active`, `inactive` or `suspended`.
    pub fn validate_update(data: &JsonMap) -> Result<()> {
        validate_common(data)?;

        if let Some(status) = present(data, "status") {
            let valid = status.as_str().is_some_and(|s| DRIVER_STATUSES.contains(&s));
            if !valid {
                return Err(SambaSafetyError::validation(
                    "Invalid status. Must be one of: active, inactive, suspended",
                ));
            }
        }

        Ok(())
    }
}

fn validate_common(data: &JsonMap) -> Result<()> {
    if let Some(email) = present(data, "email") {
        let valid = email.as_str().is_some_and(|e| validator::validate_email(e));
        if !valid {
            return Err(SambaSafetyError::validation("Invalid email format"));
        }
    }

    if let Some(license) = present(data, "license_number") {
        validate_license_number(license)?;
    }

    if let Some(dob) = present(data, "date_of_birth") {
        if !dob.as_str().is_some_and(is_valid_date) {
            return Err(SambaSafetyError::validation(
                "Invalid date_of_birth format. Use ISO 8601 format (YYYY-MM-DD)",
            ));
        }
    }

    Ok(())
}

fn validate_license_number(value: &Value) -> Result<()> {
    let Some(number) = value.as_str() else {
        return Err(SambaSafetyError::validation("License number must be a string"));
    };

    if number.trim().is_empty() {
        return Err(SambaSafetyError::validation("License number cannot be empty"));
    }

    let len = number.chars().count();
    if len < LICENSE_MIN_LEN {
        return Err(SambaSafetyError::validation(format!(
            "License number must be at least {LICENSE_MIN_LEN} characters long"
        )));
    }
    if len > LICENSE_MAX_LEN {
        return Err(SambaSafetyError::validation(format!(
            "License number cannot exceed {LICENSE_MAX_LEN} characters"
        )));
    }

    Ok(())
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339 with offset.
fn is_valid_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}

/// A field counts as present when it exists and is not `null`.
fn present<'a>(data: &'a JsonMap, field: &str) -> Option<&'a Value> {
    data.get(field).filter(|v| !v.is_null())
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> JsonMap {
        value.as_object().cloned().unwrap()
    }

    fn message(result: Result<()>) -> String {
        match result {
            Err(SambaSafetyError::Validation { message, status_code }) => {
                assert!(status_code.is_none());
                message
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_create_requires_names() {
        let err = DriverValidator::validate_create(&payload(json!({
            "first_name": "", "last_name": "Doe"
        })));
        assert_eq!(message(err), "Field 'first_name' is required");

        let err = DriverValidator::validate_create(&payload(json!({"first_name": "John"})));
        assert_eq!(message(err), "Field 'last_name' is required");

        let err = DriverValidator::validate_create(&payload(json!({
            "first_name": null, "last_name": "Doe"
        })));
        assert_eq!(message(err), "Field 'first_name' is required");
    }

    #[test]
    fn test_create_minimal_is_valid() {
        let ok = DriverValidator::validate_create(&payload(json!({
            "first_name": "John", "last_name": "Doe"
        })));
        assert!(ok.is_ok());
    }

    #[test]
    fn test_create_rejects_bad_email() {
        let err = DriverValidator::validate_create(&payload(json!({
            "first_name": "John", "last_name": "Doe", "email": "not-an-email"
        })));
        assert_eq!(message(err), "Invalid email format");

        let ok = DriverValidator::validate_create(&payload(json!({
            "first_name": "John", "last_name": "Doe", "email": "john.doe@example.com"
        })));
        assert!(ok.is_ok());
    }

    #[test]
    fn test_license_number_rules() {
        let base = |license: Value| {
            payload(json!({"first_name": "John", "last_name": "Doe", "license_number": license}))
        };

        assert_eq!(
            message(DriverValidator::validate_create(&base(json!("   ")))),
            "License number cannot be empty"
        );
        assert_eq!(
            message(DriverValidator::validate_create(&base(json!("AB")))),
            "License number must be at least 3 characters long"
        );
        assert_eq!(
            message(DriverValidator::validate_create(&base(json!("X".repeat(51))))),
            "License number cannot exceed 50 characters"
        );
        assert!(DriverValidator::validate_create(&base(json!("ABC123456"))).is_ok());
        assert!(DriverValidator::validate_create(&base(json!("X".repeat(50)))).is_ok());
    }

    #[test]
    fn test_date_of_birth_formats() {
        let with_dob = |dob: &str| {
            payload(json!({"first_name": "John", "last_name": "Doe", "date_of_birth": dob}))
        };

        assert!(DriverValidator::validate_create(&with_dob("1990-05-17")).is_ok());
        assert!(DriverValidator::validate_create(&with_dob("1990-05-17 08:30:00")).is_ok());
        assert!(DriverValidator::validate_create(&with_dob("1990-05-17T08:30:00+02:00")).is_ok());
        assert!(DriverValidator::validate_create(&with_dob("05/17/1990")).is_err());
        assert!(DriverValidator::validate_create(&with_dob("1990-13-45")).is_err());
    }

    #[test]
    fn test_update_all_optional() {
        assert!(DriverValidator::validate_update(&JsonMap::new()).is_ok());
        assert!(DriverValidator::validate_update(&payload(json!({"email": "a@b.co"}))).is_ok());
    }

    #[test]
    fn test_update_status_values() {
        for status in ["active", "inactive", "suspended"] {
            assert!(DriverValidator::validate_update(&payload(json!({"status": status}))).is_ok());
        }

        let err = DriverValidator::validate_update(&payload(json!({"status": "retired"})));
        assert_eq!(
            message(err),
            "Invalid status. Must be one of: active, inactive, suspended"
        );
    }

    #[test]
    fn test_first_violation_wins() {
        let err = DriverValidator::validate_update(&payload(json!({
            "email": "broken", "status": "retired"
        })));
        assert_eq!(message(err), "Invalid email format");
    }
}

//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Driver, Fleet, LicenseInfo, MvrRecord};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Driver {
    fn pretty_print(&self) -> String {
        let header = format!("Driver: {}", self.id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider, format!("Name:           {}", self.full_name())];

        if let Some(ref email) = self.email {
            lines.push(format!("Email:          {}", email));
        }

        if let Some(ref license) = self.license_number {
            lines.push(format!("License:        {}", license));
        }

        if let Some(status) = self.status() {
            lines.push(format!("Status:         {}", status));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Fleet {
    fn pretty_print(&self) -> String {
        let header = format!("Fleet: {}", self.id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("Name:           {}", self.name),
            format!("Status:         {}", self.status),
        ];

        if let Some(ref description) = self.description {
            lines.push(format!("Description:    {}", description));
        }

        if !self.settings.is_empty() {
            let keys: Vec<&str> = self.settings.keys().map(String::as_str).collect();
            lines.push(format!("Settings:       {}", keys.join(", ")));
        }

        if let Some(ref created) = self.created_at {
            lines.push(format!("Created:        {}", created.format(DATETIME_FORMAT)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for MvrRecord {
    fn pretty_print(&self) -> String {
        let header = format!("MVR: {}", self.id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("Driver:         {}", self.driver_id),
            format!("State:          {}", self.state),
            format!("Status:         {}", self.status),
        ];

        if let Some(ref reported) = self.report_date {
            lines.push(format!("Reported:       {}", reported.format(DATETIME_FORMAT)));
        }

        lines.push(format!(
            "Violations:     {} ({} major)",
            self.violation_count(),
            self.major_violations().count()
        ));
        lines.push(format!("Accidents:      {}", self.accident_count()));

        for violation in &self.violations {
            let date = violation
                .date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| "-".to_string());
            lines.push(format!(
                "  {} {:<10} {} [{}]",
                date, violation.code, violation.description, violation.severity
            ));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for LicenseInfo {
    fn pretty_print(&self) -> String {
        let header = format!("License: {} ({})", self.number, self.state);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("Status:         {}", self.status),
            format!(
                "Class:          {}{}",
                self.license_class,
                if self.is_commercial() { " (commercial)" } else { "" }
            ),
        ];

        if let Some(ref expires) = self.expiration_date {
            let note = if self.is_expired() { " (expired)" } else { "" };
            lines.push(format!("Expires:        {}{}", expires.format(DATE_FORMAT), note));
        }

        if !self.endorsements.is_empty() {
            lines.push(format!("Endorsements:   {}", self.endorsements.join(", ")));
        }

        if !self.restrictions.is_empty() {
            lines.push(format!("Restrictions:   {}", self.restrictions.join(", ")));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Resource;
    use serde_json::json;

    #[test]
    fn test_driver_pretty_print_format() {
        let driver = Driver::from_value(json!({
            "id": "d1",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "metadata": {"status": "active"}
        }))
        .unwrap();

        let output = driver.pretty_print();
        assert!(output.starts_with("Driver: d1"));
        assert!(output.contains("Ada Lovelace"));
        assert!(output.contains("Status:         active"));
        assert!(!output.contains("Email:"));
    }

    #[test]
    fn test_mvr_pretty_print_lists_violations() {
        let mvr = MvrRecord::from_value(json!({
            "id": "m1",
            "driver_id": "d1",
            "state": "CA",
            "status": "completed",
            "violations": [
                {"code": "S-15", "description": "Speeding", "severity": "minor", "date": "2023-06-01T00:00:00Z"},
                {"code": "DUI", "description": "DUI", "severity": "major"}
            ]
        }))
        .unwrap();

        let output = mvr.pretty_print();
        assert!(output.contains("Violations:     2 (1 major)"));
        assert!(output.contains("2023-06-01 S-15"));
        assert!(output.contains("- DUI"));
    }

    #[test]
    fn test_license_pretty_print_commercial() {
        let license = LicenseInfo::from_value(json!({
            "number": "D1",
            "state": "TX",
            "class": "CDL-A",
            "endorsements": ["H", "T"]
        }))
        .unwrap();

        let output = license.pretty_print();
        assert!(output.starts_with("License: D1 (TX)"));
        assert!(output.contains("CDL-A (commercial)"));
        assert!(output.contains("Endorsements:   H, T"));
    }
}

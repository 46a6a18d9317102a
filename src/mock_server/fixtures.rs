//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use crate::{Accident, Driver, Fleet, JsonMap, LicenseInfo, MvrRecord, Violation};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Driver Fixtures
    // =========================================================================

    /// Create a driver with a status in its metadata.
    pub fn driver(id: &str, first_name: &str, last_name: &str, status: &str) -> Driver {
        let mut metadata = JsonMap::new();
        metadata.insert("status".to_string(), json!(status));

        Driver {
            id: id.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            license_number: None,
            email: Some(format!(
                "{}.{}@example.com",
                first_name.to_lowercase(),
                last_name.to_lowercase()
            )),
            metadata,
        }
    }

    /// Create a driver holding a license.
    pub fn licensed_driver(id: &str, first_name: &str, last_name: &str, license_number: &str) -> Driver {
        let mut driver = Self::driver(id, first_name, last_name, "active");
        driver.license_number = Some(license_number.to_string());
        driver
    }

    // =========================================================================
    // Fleet Fixtures
    // =========================================================================

    /// Create an active fleet.
    pub fn fleet(id: &str, name: &str) -> Fleet {
        Fleet {
            id: id.to_string(),
            name: name.to_string(),
            created_at: Some(fixed_date(2024, 1, 15)),
            ..Fleet::default()
        }
    }

    // =========================================================================
    // MVR Fixtures
    // =========================================================================

    /// Create an MVR record without violations or accidents.
    pub fn mvr_record(id: &str, driver_id: &str, state: &str, status: &str) -> MvrRecord {
        MvrRecord {
            id: id.to_string(),
            driver_id: driver_id.to_string(),
            state: state.to_string(),
            license_number: String::new(),
            status: status.to_string(),
            request_date: Some(fixed_date(2024, 3, 1)),
            report_date: None,
            violations: Vec::new(),
            accidents: Vec::new(),
            license_info: None,
            metadata: JsonMap::new(),
        }
    }

    /// Create a completed MVR record with the given history.
    pub fn completed_mvr(
        id: &str,
        driver_id: &str,
        state: &str,
        violations: Vec<Violation>,
        accidents: Vec<Accident>,
    ) -> MvrRecord {
        let mut record = Self::mvr_record(id, driver_id, state, "completed");
        record.report_date = Some(fixed_date(2024, 3, 2));
        record.violations = violations;
        record.accidents = accidents;
        record
    }

    /// Create a violation.
    pub fn violation(code: &str, description: &str, severity: &str) -> Violation {
        Violation {
            id: format!("vio-{}", code.to_lowercase()),
            code: code.to_string(),
            description: description.to_string(),
            severity: severity.to_string(),
            date: Some(fixed_date(2023, 6, 1)),
            location: None,
            fine_amount: Some(150.0),
            conviction: true,
            points: Some(2),
            metadata: JsonMap::new(),
        }
    }

    /// Create an accident.
    pub fn accident(id: &str, injuries: u32, at_fault: bool) -> Accident {
        Accident {
            id: id.to_string(),
            date: Some(fixed_date(2023, 9, 12)),
            accident_type: "collision".to_string(),
            severity: "minor".to_string(),
            location: None,
            fatalities: Some(0),
            injuries: Some(injuries),
            damage_amount: Some(2500.0),
            at_fault,
            description: None,
            metadata: JsonMap::new(),
        }
    }

    // =========================================================================
    // License Fixtures
    // =========================================================================

    /// Create a license expiring in 2030.
    pub fn license(number: &str, state: &str, status: &str) -> LicenseInfo {
        LicenseInfo {
            number: number.to_string(),
            state: state.to_string(),
            status: status.to_string(),
            license_class: "C".to_string(),
            issue_date: Some(fixed_date(2020, 5, 1)),
            expiration_date: Some(fixed_date(2030, 5, 1)),
            endorsements: Vec::new(),
            restrictions: Vec::new(),
            metadata: JsonMap::new(),
        }
    }

    /// Create a default set of test data for common scenarios.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

fn fixed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A complete test scenario with related entities.
pub struct DefaultScenario {
    pub drivers: Vec<Driver>,
    pub fleets: Vec<Fleet>,
    pub rosters: Vec<(String, Vec<String>)>,
    pub mvr_records: Vec<MvrRecord>,
    pub licenses: Vec<LicenseInfo>,
    pub users: Vec<(String, String)>,
}

impl DefaultScenario {
    fn new() -> Self {
        let drivers = vec![
            Fixtures::licensed_driver("drv_1", "John", "Doe", "D1234567"),
            Fixtures::driver("drv_2", "Jane", "Smith", "active"),
            Fixtures::driver("drv_3", "Bob", "Jones", "inactive"),
        ];

        let fleets = vec![Fixtures::fleet("flt_1", "West Coast Delivery")];

        let rosters = vec![(
            "flt_1".to_string(),
            vec!["drv_1".to_string(), "drv_2".to_string()],
        )];

        let mvr_records = vec![
            Fixtures::completed_mvr(
                "mvr_1",
                "drv_1",
                "CA",
                vec![
                    Fixtures::violation("S-15", "Speeding 15 over", "minor"),
                    Fixtures::violation("DUI-1", "DUI first offense", "major"),
                ],
                vec![Fixtures::accident("acc_1", 1, true)],
            ),
            Fixtures::mvr_record("mvr_2", "drv_2", "NV", "pending"),
        ];

        let licenses = vec![
            Fixtures::license("D1234567", "CA", "active"),
            Fixtures::license("S7654321", "NV", "suspended"),
        ];

        let users = vec![("fleet-admin".to_string(), "correct-horse".to_string())];

        Self {
            drivers,
            fleets,
            rosters,
            mvr_records,
            licenses,
            users,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_fixture() {
        let driver = Fixtures::driver("d1", "Ada", "Lovelace", "active");
        assert_eq!(driver.full_name(), "Ada Lovelace");
        assert_eq!(driver.status(), Some("active"));
        assert_eq!(driver.email.as_deref(), Some("ada.lovelace@example.com"));
    }

    #[test]
    fn test_completed_mvr_fixture() {
        let record = Fixtures::completed_mvr(
            "m1",
            "d1",
            "CA",
            vec![Fixtures::violation("S-15", "Speeding", "minor")],
            vec![],
        );
        assert!(record.is_completed());
        assert_eq!(record.violation_count(), 1);
        assert!(!record.has_accidents());
    }

    #[test]
    fn test_license_fixture() {
        let license = Fixtures::license("D1", "CA", "active");
        assert!(license.is_active());
        assert!(!license.is_expired());
        assert!(license.is_commercial());
    }

    #[test]
    fn test_default_scenario() {
        let scenario = Fixtures::default_scenario();
        assert!(!scenario.drivers.is_empty());
        assert!(!scenario.fleets.is_empty());
        assert!(!scenario.rosters.is_empty());
        assert!(!scenario.mvr_records.is_empty());
        assert!(!scenario.licenses.is_empty());
        assert!(!scenario.users.is_empty());
    }
}

//! CLI output formatting tests.
//!
//! Covers JSON output with --json and pretty-print output as default.

use sambasafety::{Driver, LicenseInfo, MvrRecord, PrettyPrint, Resource};

// ============================================================================
// JSON Output Tests
// ============================================================================

#[test]
fn test_json_flag_outputs_valid_json() {
    // When --json is used, output must be valid parseable JSON
    let driver = make_test_driver();
    let json_output = serde_json::to_string_pretty(&driver).unwrap();

    // Verify it's valid JSON by parsing it back
    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
    assert!(parsed.is_object());
    assert_eq!(parsed["first_name"], "John");
}

#[test]
fn test_json_flag_for_list_outputs_array() {
    let drivers = vec![make_test_driver(), make_test_driver()];
    let json_output = serde_json::to_string_pretty(&drivers).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
    assert!(parsed.is_array());
    assert_eq!(parsed.as_array().unwrap().len(), 2);
}

#[test]
fn test_json_output_uses_snake_case_keys() {
    let record = make_test_mvr();
    let parsed = serde_json::to_value(&record).unwrap();

    assert!(parsed.get("driver_id").is_some());
    assert!(parsed.get("license_number").is_some());
    assert!(parsed.get("driverId").is_none());
    assert_eq!(parsed["violations"].as_array().unwrap().len(), 2);
}

// ============================================================================
// Pretty-Print Tests
// ============================================================================

#[test]
fn test_default_output_is_not_json() {
    let driver = make_test_driver();
    let pretty_output = driver.pretty_print();

    let parse_result: Result<serde_json::Value, _> = serde_json::from_str(&pretty_output);
    assert!(
        parse_result.is_err(),
        "Default output should NOT be valid JSON"
    );
}

#[test]
fn test_driver_pretty_print_shows_key_fields() {
    let output = make_test_driver().pretty_print();

    assert!(output.contains("drv_123"), "Should show id");
    assert!(output.contains("John Doe"), "Should show full name");
    assert!(output.contains("D1234567"), "Should show license");
    assert!(output.contains("Status"), "Should have Status label");
    assert!(output.contains("active"), "Should show status");
}

#[test]
fn test_mvr_pretty_print_lists_violations() {
    let output = make_test_mvr().pretty_print();

    assert!(output.contains("MVR: mvr_1"));
    assert!(output.contains("2 (1 major)"), "Should count major violations");
    assert!(output.contains("DUI-1"), "Should list violation codes");
    assert!(output.contains("2023-06-01"), "Should show violation dates");
}

#[test]
fn test_license_pretty_print_flags_commercial() {
    let license = LicenseInfo::from_value(serde_json::json!({
        "number": "C7654321",
        "state": "TX",
        "class": "CDL-A",
        "expiration_date": "2031-01-01T00:00:00Z",
        "endorsements": ["H", "N"]
    }))
    .unwrap();
    let output = license.pretty_print();

    assert!(output.contains("C7654321 (TX)"));
    assert!(output.contains("CDL-A (commercial)"));
    assert!(output.contains("H, N"));
    assert!(!output.contains("(expired)"));
}

#[test]
fn test_list_pretty_print_is_table() {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct TestRow {
        name: String,
        status: String,
    }

    let rows = vec![
        TestRow {
            name: "John Doe".to_string(),
            status: "active".to_string(),
        },
        TestRow {
            name: "Jane Smith".to_string(),
            status: "suspended".to_string(),
        },
    ];

    let table_output = Table::new(rows).to_string();

    assert!(table_output.contains("name"), "Should have column headers");
    assert!(table_output.contains("status"), "Should have column headers");
}

// ============================================================================
// Test Helpers
// ============================================================================

fn make_test_driver() -> Driver {
    Driver::from_value(serde_json::json!({
        "id": "drv_123",
        "first_name": "John",
        "last_name": "Doe",
        "email": "john@example.com",
        "license_number": "D1234567",
        "metadata": { "status": "active" }
    }))
    .unwrap()
}

fn make_test_mvr() -> MvrRecord {
    MvrRecord::from_value(serde_json::json!({
        "id": "mvr_1",
        "driverId": 42,
        "state": "CA",
        "license_number": "D1234567",
        "status": "completed",
        "violations": [
            {
                "code": "S-15",
                "description": "Speeding",
                "severity": "minor",
                "date": "2023-06-01T00:00:00Z"
            },
            {
                "code": "DUI-1",
                "description": "Driving under the influence",
                "severity": "major"
            }
        ]
    }))
    .unwrap()
}

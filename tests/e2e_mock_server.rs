//! E2E tests using the mock SambaSafety server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use sambasafety::mock_server::{Fixtures, MockServer, MockState};
use sambasafety::{
    Authenticator, JsonMap, LicenseLookup, QueryParams, SambaSafety, SambaSafetyError, SortDirection,
};
use serde_json::json;

fn map(value: serde_json::Value) -> JsonMap {
    value.as_object().cloned().unwrap()
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    // Both servers should have different URLs
    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    // After shutdown, server should not respond
    let client = reqwest::Client::new();
    let result = client.get(format!("{}/health", url)).send().await;

    assert!(result.is_err());
}

// =============================================================================
// Driver Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_driver_lifecycle_workflow() {
    let server = MockServer::start_empty().await;
    let sdk = SambaSafety::new("test-token", server.url()).unwrap();

    // Step 1: Create
    let created = sdk
        .drivers()
        .create(&map(json!({
            "first_name": "Grace",
            "last_name": "Hopper",
            "email": "grace@example.com",
            "license_number": "H1234567"
        })))
        .await
        .expect("Failed to create driver");
    assert!(!created.id.is_empty());

    // Step 2: Update
    let updated = sdk
        .drivers()
        .update(&created.id, &map(json!({"email": "admiral@example.com"})))
        .await
        .expect("Failed to update driver");
    assert_eq!(updated.email.as_deref(), Some("admiral@example.com"));
    assert_eq!(updated.first_name, "Grace");

    // Step 3: Suspend with a reason
    let suspended = sdk
        .drivers()
        .suspend(&created.id, Some("Failed drug test"))
        .await
        .expect("Failed to suspend driver");
    assert_eq!(suspended.status(), Some("suspended"));
    assert_eq!(
        suspended.meta("reason").and_then(|v| v.as_str()),
        Some("Failed drug test")
    );

    // Step 4: Reactivate
    let active = sdk.drivers().activate(&created.id).await.unwrap();
    assert_eq!(active.status(), Some("active"));

    // Step 5: Delete, then the driver is gone
    sdk.drivers().delete(&created.id).await.unwrap();
    let err = sdk.drivers().get(&created.id).await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));

    server.shutdown().await;
}

#[tokio::test]
async fn test_create_driver_validation_happens_before_request() {
    let server = MockServer::start_empty().await;
    let sdk = SambaSafety::new("test-token", server.url()).unwrap();

    let err = sdk
        .drivers()
        .create(&map(json!({"first_name": "Grace", "last_name": "Hopper", "email": "nope"})))
        .await
        .unwrap_err();
    assert!(matches!(err, SambaSafetyError::Validation { status_code: None, .. }));

    // Nothing reached the server
    assert!(server.state().read().await.drivers.is_empty());

    server.shutdown().await;
}

#[tokio::test]
async fn test_list_all_drivers_walks_pages() {
    let mut state = MockState::new();
    for i in 0..7 {
        let id = format!("d{i}");
        let last_name = format!("Driver{i}");
        state = state.with_driver(Fixtures::driver(&id, "Test", &last_name, "active"));
    }
    let server = MockServer::with_state(state).await;
    let sdk = SambaSafety::new("test-token", server.url()).unwrap();

    let first_page = sdk
        .drivers()
        .list(&QueryParams::from([("per_page".to_string(), "3".to_string())]))
        .await
        .unwrap();
    assert_eq!(first_page.len(), 3);
    assert_eq!(first_page.total(), Some(7));
    assert!(first_page.has_next_page());

    let all = sdk
        .drivers()
        .list_all(&QueryParams::from([("per_page".to_string(), "3".to_string())]))
        .await
        .unwrap();
    assert_eq!(all.len(), 7);

    server.shutdown().await;
}

#[tokio::test]
async fn test_driver_query_builder_against_server() {
    let server = MockServer::start().await;
    let sdk = SambaSafety::new("test-token", server.url()).unwrap();

    let active = sdk.drivers().query().where_active().get().await.unwrap();
    assert_eq!(active.len(), 2);
    assert!(active.iter().all(|d| d.status() == Some("active")));

    let count = sdk.drivers().query().where_inactive().count().await.unwrap();
    assert_eq!(count, 1);

    let first = sdk
        .drivers()
        .query()
        .sort_by_name(SortDirection::Asc)
        .first()
        .await
        .unwrap();
    assert_eq!(first.map(|d| d.last_name), Some("Doe".to_string()));

    server.shutdown().await;
}

// =============================================================================
// Fleet Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_fleet_roster_workflow() {
    let server = MockServer::start().await;
    let sdk = SambaSafety::new("test-token", server.url()).unwrap();

    let fleet = sdk
        .fleets()
        .create(&map(json!({"name": "Night Shift"})))
        .await
        .unwrap();
    assert!(fleet.is_active());

    sdk.fleets().add_driver(&fleet.id, "drv_1").await.unwrap();
    sdk.fleets().add_driver(&fleet.id, "drv_3").await.unwrap();

    let roster = sdk
        .fleets()
        .drivers(&fleet.id, &QueryParams::new())
        .await
        .unwrap();
    assert_eq!(roster.pluck(|d| d.id.clone()), vec!["drv_1", "drv_3"]);
    assert_eq!(roster.active_drivers().len(), 1);

    sdk.fleets().remove_driver(&fleet.id, "drv_1").await.unwrap();
    let roster = sdk
        .fleets()
        .drivers(&fleet.id, &QueryParams::new())
        .await
        .unwrap();
    assert_eq!(roster.len(), 1);

    server.shutdown().await;
}

// =============================================================================
// MVR Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_mvr_request_refresh_workflow() {
    let server = MockServer::start().await;
    let sdk = SambaSafety::new("test-token", server.url()).unwrap();

    let record = sdk
        .mvr()
        .request_for_driver("drv_2", &map(json!({"state": "NV"})))
        .await
        .expect("Failed to request MVR");
    assert!(record.is_pending());
    assert_eq!(record.driver_id, "drv_2");

    let refreshed = sdk.mvr().refresh(&record.id).await.unwrap();
    assert!(refreshed.is_completed());
    assert!(refreshed.report_date.is_some());

    // Completed records cannot be cancelled
    let err = sdk.mvr().cancel(&record.id).await.unwrap_err();
    assert_eq!(err.status_code(), Some(409));

    server.shutdown().await;
}

#[tokio::test]
async fn test_mvr_history_and_latest() {
    let server = MockServer::start().await;
    let sdk = SambaSafety::new("test-token", server.url()).unwrap();

    let latest = sdk
        .mvr()
        .latest_by_driver("drv_1")
        .await
        .unwrap()
        .expect("drv_1 has an MVR");
    assert_eq!(latest.id, "mvr_1");
    assert_eq!(latest.major_violations().count(), 1);

    let history = sdk.drivers().mvr_history("drv_1").await.unwrap();
    assert_eq!(history.total_violations(), 2);
    assert_eq!(history.total_accidents(), 1);

    let none = sdk.mvr().latest_by_driver("drv_3").await.unwrap();
    assert!(none.is_none());

    let pending = sdk.mvr().pending().await.unwrap();
    assert!(pending.iter().all(|r| r.is_pending()));

    server.shutdown().await;
}

// =============================================================================
// License Discovery Tests
// =============================================================================

#[tokio::test]
async fn test_license_validation_and_linking() {
    let server = MockServer::start().await;
    let sdk = SambaSafety::new("test-token", server.url()).unwrap();
    let discovery = sdk.license_discovery();

    let license = discovery
        .validate_license("D1234567", "ca")
        .await
        .unwrap()
        .expect("license on file");
    assert!(license.is_active());

    assert!(discovery.validate_license("X0000000", "CA").await.unwrap().is_none());

    let results = discovery
        .bulk_validation(&[
            LicenseLookup::new("D1234567", "CA"),
            LicenseLookup::new("S7654321", "NV"),
            LicenseLookup::new("X0000000", "TX"),
        ])
        .await
        .unwrap();
    let valid: Vec<bool> = results.iter().map(|r| r.valid).collect();
    assert_eq!(valid, vec![true, false, false]);
    assert!(results[2].license_info.is_none());

    let suspended = discovery.find_suspended(&QueryParams::new()).await.unwrap();
    assert_eq!(suspended.len(), 1);
    assert_eq!(suspended[0].number, "S7654321");

    let driver = discovery
        .link_license_to_driver("drv_2", "S7654321", "NV")
        .await
        .unwrap();
    assert_eq!(driver.license_number.as_deref(), Some("S7654321"));

    let found = discovery
        .discover_by_driver_info("jane", "smith", "1990-01-01", Some("NV"))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    discovery
        .unlink_license_from_driver("drv_2", "S7654321", "NV")
        .await
        .unwrap();
    let driver = sdk.drivers().get("drv_2").await.unwrap();
    assert!(driver.license_number.is_none());

    server.shutdown().await;
}

// =============================================================================
// Authentication Tests
// =============================================================================

#[tokio::test]
async fn test_required_token_is_enforced() {
    let state = MockState::new()
        .with_required_token("secret")
        .with_driver(Fixtures::driver("d1", "Ada", "Lovelace", "active"));
    let server = MockServer::with_state(state).await;

    let wrong = SambaSafety::new("wrong", server.url()).unwrap();
    let err = wrong.drivers().get("d1").await.unwrap_err();
    assert!(matches!(
        err,
        SambaSafetyError::Authentication {
            status_code: Some(401),
            ..
        }
    ));
    assert!(!wrong.auth().validate_token().await);

    let right = SambaSafety::new("secret", server.url()).unwrap();
    assert_eq!(right.drivers().get("d1").await.unwrap().first_name, "Ada");
    assert!(right.auth().validate_token().await);

    server.shutdown().await;
}

#[tokio::test]
async fn test_authenticator_login_and_refresh() {
    let state = MockState::new()
        .with_required_token("static")
        .with_user("fleet-admin", "correct-horse")
        .with_driver(Fixtures::driver("d1", "Ada", "Lovelace", "active"));
    let server = MockServer::with_state(state).await;

    let mut auth = Authenticator::new(server.url());

    let err = auth.login("fleet-admin", "wrong").await.unwrap_err();
    assert!(matches!(err, SambaSafetyError::Authentication { .. }));

    let sdk = auth.login("fleet-admin", "correct-horse").await.unwrap();
    assert!(!auth.is_token_expired());
    assert_eq!(sdk.drivers().get("d1").await.unwrap().id, "d1");

    let user = sdk.auth().current_user().await.unwrap();
    assert_eq!(user["username"], "fleet-admin");

    let refresh_token = auth
        .token()
        .and_then(|t| t.refresh_token.clone())
        .expect("refresh token issued");
    let refreshed = auth.refresh(&refresh_token).await.unwrap();
    assert!(refreshed.auth().validate_token().await);

    assert!(refreshed.auth().logout().await);
    assert!(!refreshed.auth().validate_token().await);

    server.shutdown().await;
}

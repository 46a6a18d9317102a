//! Mock server state management.
//!
//! Provides the in-memory data store for the mock SambaSafety API server.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Driver, Fleet, JsonMap, LicenseInfo, MvrRecord, Resource};

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access. Entities are
/// kept in ordered maps so list endpoints answer in ID order.
#[derive(Debug, Default)]
pub struct MockState {
    /// Drivers indexed by ID.
    pub drivers: BTreeMap<String, Driver>,

    /// Fleets indexed by ID.
    pub fleets: BTreeMap<String, Fleet>,

    /// Driver IDs per fleet ID.
    pub rosters: HashMap<String, BTreeSet<String>>,

    /// MVR records indexed by ID.
    pub mvr_records: BTreeMap<String, MvrRecord>,

    /// Licenses indexed by (upper-case state, number).
    pub licenses: HashMap<(String, String), LicenseInfo>,

    /// Login credentials: username to password.
    pub users: HashMap<String, String>,

    /// Access tokens handed out by the login and refresh endpoints,
    /// mapped to the user they were issued to.
    pub issued_tokens: BTreeMap<String, String>,

    /// Refresh tokens mapped to their user.
    pub refresh_tokens: BTreeMap<String, String>,

    /// Optional authentication token. If set, requests must include this
    /// token or one issued by the login endpoint.
    pub required_token: Option<String>,

    next_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a driver to the state.
    pub fn with_driver(mut self, driver: Driver) -> Self {
        self.drivers.insert(driver.id.clone(), driver);
        self
    }

    /// Add a fleet to the state.
    pub fn with_fleet(mut self, fleet: Fleet) -> Self {
        self.fleets.insert(fleet.id.clone(), fleet);
        self
    }

    /// Add a driver to a fleet's roster.
    pub fn with_fleet_member(mut self, fleet_id: &str, driver_id: &str) -> Self {
        self.add_fleet_member(fleet_id, driver_id);
        self
    }

    /// Add an MVR record to the state.
    pub fn with_mvr_record(mut self, record: MvrRecord) -> Self {
        self.mvr_records.insert(record.id.clone(), record);
        self
    }

    /// Add a license that the validation endpoint will recognise.
    pub fn with_license(mut self, license: LicenseInfo) -> Self {
        self.licenses.insert(
            (license.state.to_uppercase(), license.number.clone()),
            license,
        );
        self
    }

    /// Add login credentials.
    pub fn with_user(mut self, username: &str, password: &str) -> Self {
        self.users.insert(username.to_string(), password.to_string());
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Whether a bearer token may access protected routes.
    pub fn accepts_token(&self, token: &str) -> bool {
        self.token_owner(token).is_some()
    }

    /// The user a token belongs to. The static token belongs to `api-key`.
    pub fn token_owner(&self, token: &str) -> Option<&str> {
        if self.required_token.as_deref() == Some(token) {
            return Some("api-key");
        }
        self.issued_tokens.get(token).map(String::as_str)
    }

    /// Check login credentials.
    pub fn check_credentials(&self, username: &str, password: &str) -> bool {
        self.users.get(username).is_some_and(|p| p == password)
    }

    /// Hand out a fresh access and refresh token pair for `username`.
    pub fn issue_tokens(&mut self, username: &str) -> (String, String) {
        let access = self.next_id("mock-token");
        let refresh = self.next_id("mock-refresh");
        self.issued_tokens.insert(access.clone(), username.to_string());
        self.refresh_tokens.insert(refresh.clone(), username.to_string());
        (access, refresh)
    }

    /// Exchange a refresh token for a new pair. The old refresh token is spent.
    pub fn redeem_refresh_token(&mut self, refresh_token: &str) -> Option<(String, String)> {
        let username = self.refresh_tokens.remove(refresh_token)?;
        Some(self.issue_tokens(&username))
    }

    /// Invalidate an access token.
    pub fn revoke_token(&mut self, token: &str) -> bool {
        self.issued_tokens.remove(token).is_some()
    }

    /// Allocate an ID with the given prefix.
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}_{}", self.next_id)
    }

    /// List drivers, optionally filtered by metadata status.
    pub fn list_drivers(&self, status: Option<&str>) -> Vec<&Driver> {
        self.drivers
            .values()
            .filter(|d| status.map_or(true, |s| d.status() == Some(s)))
            .collect()
    }

    /// Create a driver from a payload, assigning a new ID.
    pub fn create_driver(&mut self, mut data: JsonMap) -> Option<&Driver> {
        let id = self.next_id("drv");
        data.insert("id".to_string(), id.clone().into());
        let driver = Driver::from_json(data).ok()?;
        self.drivers.insert(id.clone(), driver);
        self.drivers.get(&id)
    }

    /// Merge a payload into a driver. `status` lands in the metadata bag.
    pub fn update_driver(&mut self, id: &str, data: JsonMap) -> Option<&Driver> {
        let current = self.drivers.get(id)?;
        let mut merged = current.to_json();
        for (key, value) in data {
            if key == "status" || key == "reason" {
                if let Some(serde_json::Value::Object(meta)) = merged.get_mut("metadata") {
                    meta.insert(key, value);
                }
            } else if key != "id" {
                merged.insert(key, value);
            }
        }
        let updated = Driver::from_json(merged).ok()?;
        self.drivers.insert(id.to_string(), updated);
        self.drivers.get(id)
    }

    /// Remove a driver and its fleet memberships.
    pub fn delete_driver(&mut self, id: &str) -> bool {
        for members in self.rosters.values_mut() {
            members.remove(id);
        }
        self.drivers.remove(id).is_some()
    }

    /// List fleets, optionally filtered by status.
    pub fn list_fleets(&self, status: Option<&str>) -> Vec<&Fleet> {
        self.fleets
            .values()
            .filter(|f| status.map_or(true, |s| f.status.eq_ignore_ascii_case(s)))
            .collect()
    }

    /// Create a fleet from a payload, assigning a new ID.
    pub fn create_fleet(&mut self, mut data: JsonMap) -> Option<&Fleet> {
        let id = self.next_id("flt");
        data.insert("id".to_string(), id.clone().into());
        let fleet = Fleet::from_json(data).ok()?;
        self.fleets.insert(id.clone(), fleet);
        self.fleets.get(&id)
    }

    /// Merge a payload into a fleet.
    pub fn update_fleet(&mut self, id: &str, data: JsonMap) -> Option<&Fleet> {
        let mut merged = self.fleets.get(id)?.to_json();
        merged.extend(data.into_iter().filter(|(k, _)| k != "id"));
        let updated = Fleet::from_json(merged).ok()?;
        self.fleets.insert(id.to_string(), updated);
        self.fleets.get(id)
    }

    /// Remove a fleet and its roster.
    pub fn delete_fleet(&mut self, id: &str) -> bool {
        self.rosters.remove(id);
        self.fleets.remove(id).is_some()
    }

    /// Drivers in a fleet, in ID order.
    pub fn fleet_drivers(&self, fleet_id: &str) -> Vec<&Driver> {
        self.rosters
            .get(fleet_id)
            .map(|ids| ids.iter().filter_map(|id| self.drivers.get(id)).collect())
            .unwrap_or_default()
    }

    /// Add a driver to a fleet's roster.
    pub fn add_fleet_member(&mut self, fleet_id: &str, driver_id: &str) {
        self.rosters
            .entry(fleet_id.to_string())
            .or_default()
            .insert(driver_id.to_string());
    }

    /// Remove a driver from a fleet's roster.
    pub fn remove_fleet_member(&mut self, fleet_id: &str, driver_id: &str) -> bool {
        self.rosters
            .get_mut(fleet_id)
            .is_some_and(|members| members.remove(driver_id))
    }

    /// List MVR records, optionally filtered by driver and status.
    pub fn list_mvr_records(&self, driver_id: Option<&str>, status: Option<&str>) -> Vec<&MvrRecord> {
        self.mvr_records
            .values()
            .filter(|r| driver_id.map_or(true, |d| r.driver_id == d))
            .filter(|r| status.map_or(true, |s| r.status == s))
            .collect()
    }

    /// Create a pending MVR record from an order payload.
    pub fn create_mvr_record(&mut self, mut data: JsonMap) -> Option<&MvrRecord> {
        let id = self.next_id("mvr");
        data.insert("id".to_string(), id.clone().into());
        data.insert("status".to_string(), "pending".into());
        data.insert(
            "request_date".to_string(),
            chrono::Utc::now().to_rfc3339().into(),
        );
        let record = MvrRecord::from_json(data).ok()?;
        self.mvr_records.insert(id.clone(), record);
        self.mvr_records.get(&id)
    }

    /// Set the status of an MVR record.
    pub fn set_mvr_status(&mut self, id: &str, status: &str) -> Option<&MvrRecord> {
        let record = self.mvr_records.get_mut(id)?;
        record.status = status.to_string();
        Some(&*record)
    }

    /// The most recently requested MVR record for a driver.
    pub fn latest_mvr_record(&self, driver_id: &str) -> Option<&MvrRecord> {
        self.list_mvr_records(Some(driver_id), None)
            .into_iter()
            .max_by_key(|r| r.request_date)
    }

    /// Licenses on file for a driver's license number.
    pub fn licenses_for_driver(&self, driver: &Driver) -> Vec<&LicenseInfo> {
        let Some(number) = driver.license_number.as_deref() else {
            return Vec::new();
        };
        let mut found: Vec<&LicenseInfo> = self
            .licenses
            .values()
            .filter(|l| l.number == number)
            .collect();
        found.sort_by(|a, b| a.state.cmp(&b.state));
        found
    }

    /// Every license on file, ordered by state then number.
    pub fn all_licenses(&self) -> Vec<&LicenseInfo> {
        let mut all: Vec<&LicenseInfo> = self.licenses.values().collect();
        all.sort_by(|a, b| (&a.state, &a.number).cmp(&(&b.state, &b.number)));
        all
    }

    /// Look up a license by state (case-insensitive) and number.
    pub fn find_license(&self, state: &str, number: &str) -> Option<&LicenseInfo> {
        self.licenses
            .get(&(state.to_uppercase(), number.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;
    use serde_json::json;

    fn map(value: serde_json::Value) -> JsonMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_state_add_and_list_drivers() {
        let state = MockState::new()
            .with_driver(Fixtures::driver("d1", "Ada", "Lovelace", "active"))
            .with_driver(Fixtures::driver("d2", "Alan", "Turing", "inactive"));

        assert_eq!(state.list_drivers(None).len(), 2);
        let active = state.list_drivers(Some("active"));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "d1");
    }

    #[test]
    fn test_state_create_and_update_driver() {
        let mut state = MockState::new();
        let id = state
            .create_driver(map(json!({"first_name": "Grace", "last_name": "Hopper"})))
            .map(|d| d.id.clone())
            .unwrap();
        assert!(id.starts_with("drv_"));

        let updated = state
            .update_driver(&id, map(json!({"email": "grace@example.com", "status": "suspended"})))
            .unwrap();
        assert_eq!(updated.email.as_deref(), Some("grace@example.com"));
        assert_eq!(updated.status(), Some("suspended"));
        assert_eq!(updated.first_name, "Grace");
    }

    #[test]
    fn test_state_rosters() {
        let mut state = MockState::new()
            .with_driver(Fixtures::driver("d1", "Ada", "Lovelace", "active"))
            .with_driver(Fixtures::driver("d2", "Alan", "Turing", "active"))
            .with_fleet(Fixtures::fleet("f1", "West"))
            .with_fleet_member("f1", "d2")
            .with_fleet_member("f1", "d1");

        let ids: Vec<&str> = state.fleet_drivers("f1").iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2"]);

        assert!(state.remove_fleet_member("f1", "d1"));
        assert!(!state.remove_fleet_member("f1", "d1"));
        assert!(state.delete_driver("d2"));
        assert!(state.fleet_drivers("f1").is_empty());
    }

    #[test]
    fn test_state_license_lookup_ignores_state_case() {
        let state = MockState::new().with_license(Fixtures::license("D1234567", "ca", "active"));
        assert!(state.find_license("CA", "D1234567").is_some());
        assert!(state.find_license("ca", "D1234567").is_some());
        assert!(state.find_license("NV", "D1234567").is_none());
    }

    #[test]
    fn test_state_tokens() {
        let mut state = MockState::new()
            .with_required_token("static")
            .with_user("ada", "secret");
        assert!(state.accepts_token("static"));
        assert!(!state.accepts_token("other"));
        assert!(state.check_credentials("ada", "secret"));
        assert!(!state.check_credentials("ada", "wrong"));

        let (access, refresh) = state.issue_tokens("ada");
        assert_eq!(state.token_owner(&access), Some("ada"));

        let (new_access, _) = state.redeem_refresh_token(&refresh).unwrap();
        assert!(state.accepts_token(&new_access));
        assert!(state.redeem_refresh_token(&refresh).is_none());

        assert!(state.revoke_token(&access));
        assert!(!state.accepts_token(&access));
    }
}

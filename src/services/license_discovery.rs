//! License discovery and validation.
//!
//! Discovery endpoints answer with a `licenses` array; single-license
//! endpoints use a `license` object. Missing or `null` arrays decode to an
//! empty list.

use serde::Serialize;
use serde_json::{json, Value};

use crate::client::{JsonMap, QueryParams, SambaSafetyClient};
use crate::error::Result;
use crate::models::{
    list_from_key, resource_path, single_from_key, BulkValidationResult, Driver, LicenseInfo,
    LicenseLookup, Resource,
};
use crate::traits::List;

const BASE: &str = "license-discovery";

/// Locate, validate and link driver's licenses.
#[derive(Debug, Clone)]
pub struct LicenseDiscoveryService {
    client: SambaSafetyClient,
}

impl LicenseDiscoveryService {
    /// Wrap a client.
    pub fn new(client: SambaSafetyClient) -> Self {
        Self { client }
    }

    /// Find licenses matching arbitrary personal information.
    #[tracing::instrument(skip_all)]
    pub async fn discover_by_personal_info(&self, personal_info: &JsonMap) -> Result<Vec<LicenseInfo>> {
        self.post_for_licenses(&format!("{BASE}/personal"), personal_info)
            .await
    }

    /// Find licenses by name and date of birth, optionally in one state.
    pub async fn discover_by_driver_info(
        &self,
        first_name: &str,
        last_name: &str,
        date_of_birth: &str,
        state: Option<&str>,
    ) -> Result<Vec<LicenseInfo>> {
        let mut data = JsonMap::new();
        data.insert("first_name".to_string(), json!(first_name));
        data.insert("last_name".to_string(), json!(last_name));
        data.insert("date_of_birth".to_string(), json!(date_of_birth));
        if let Some(state) = state {
            data.insert("state".to_string(), json!(state));
        }
        self.discover_by_personal_info(&data).await
    }

    /// Find licenses by social security number, optionally in one state.
    #[tracing::instrument(skip(self, ssn))]
    pub async fn discover_by_ssn(&self, ssn: &str, state: Option<&str>) -> Result<Vec<LicenseInfo>> {
        let mut data = JsonMap::new();
        data.insert("ssn".to_string(), json!(ssn));
        if let Some(state) = state {
            data.insert("state".to_string(), json!(state));
        }
        self.post_for_licenses(&format!("{BASE}/ssn"), &data).await
    }

    /// Search the given states. `states` overrides any key of that name.
    #[tracing::instrument(skip(self, personal_info))]
    pub async fn discover_multiple_states(
        &self,
        personal_info: &JsonMap,
        states: &[&str],
    ) -> Result<Vec<LicenseInfo>> {
        let mut data = personal_info.clone();
        data.insert("states".to_string(), json!(states));
        self.post_for_licenses(&format!("{BASE}/multi-state"), &data)
            .await
    }

    /// Search every state for licenses matching the personal information.
    #[tracing::instrument(skip_all)]
    pub async fn search_all_states(&self, personal_info: &JsonMap) -> Result<Vec<LicenseInfo>> {
        self.post_for_licenses(&format!("{BASE}/all-states"), personal_info)
            .await
    }

    /// Validate one license. `None` when the server reports no license.
    #[tracing::instrument(skip(self))]
    pub async fn validate_license(&self, license_number: &str, state: &str) -> Result<Option<LicenseInfo>> {
        let mut response = self
            .client
            .post(
                &format!("{BASE}/validate"),
                &LicenseLookup::new(license_number, state),
            )
            .await?;

        match response.remove("license") {
            Some(license) if !is_blank(&license) => LicenseInfo::from_value(license).map(Some),
            _ => Ok(None),
        }
    }

    /// Past license records for a number in a state.
    #[tracing::instrument(skip(self))]
    pub async fn license_history(&self, license_number: &str, state: &str) -> Result<Vec<LicenseInfo>> {
        let path = resource_path(&resource_path(&format!("{BASE}/history"), state), license_number);
        let response = self.client.get(&path).await?;
        list_from_key(response, "history")
    }

    /// Expired licenses matching the filters.
    pub async fn find_expired(&self, filters: &QueryParams) -> Result<Vec<LicenseInfo>> {
        self.get_for_licenses(&format!("{BASE}/expired"), filters)
            .await
    }

    /// Licenses expiring within `days`.
    pub async fn find_expiring_soon(&self, days: u32) -> Result<Vec<LicenseInfo>> {
        let query = QueryParams::from([("days".to_string(), days.to_string())]);
        self.get_for_licenses(&format!("{BASE}/expiring-soon"), &query)
            .await
    }

    /// Suspended licenses matching the filters.
    pub async fn find_suspended(&self, filters: &QueryParams) -> Result<Vec<LicenseInfo>> {
        self.get_for_licenses(&format!("{BASE}/suspended"), filters)
            .await
    }

    /// Validate several licenses in one call. Per-license errors are
    /// returned as the server sent them.
    #[tracing::instrument(skip_all, fields(count = licenses.len()))]
    pub async fn bulk_validation(&self, licenses: &[LicenseLookup]) -> Result<Vec<BulkValidationResult>> {
        let response = self
            .client
            .post(&format!("{BASE}/bulk-validate"), &json!({"licenses": licenses}))
            .await?;
        list_from_key(response, "results")
    }

    /// Run discovery for a driver already on the account.
    #[tracing::instrument(skip(self))]
    pub async fn discover_for_existing_driver(&self, driver_id: &str) -> Result<Vec<LicenseInfo>> {
        let path = format!("{}/{BASE}", resource_path(Driver::PATH, driver_id));
        let response = self.client.post_empty(&path).await?;
        list_from_key(response, "licenses")
    }

    /// Attach a license to a driver and return the updated driver.
    #[tracing::instrument(skip(self))]
    pub async fn link_license_to_driver(
        &self,
        driver_id: &str,
        license_number: &str,
        state: &str,
    ) -> Result<Driver> {
        let response = self
            .client
            .post(
                &licenses_path(driver_id),
                &LicenseLookup::new(license_number, state),
            )
            .await?;
        single_from_key(response, "driver")
    }

    /// Detach a license from a driver.
    #[tracing::instrument(skip(self))]
    pub async fn unlink_license_from_driver(
        &self,
        driver_id: &str,
        license_number: &str,
        state: &str,
    ) -> Result<()> {
        let path = resource_path(&resource_path(&licenses_path(driver_id), state), license_number);
        self.client.delete(&path).await?;
        Ok(())
    }

    async fn post_for_licenses<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Vec<LicenseInfo>> {
        let response = self.client.post(path, body).await?;
        list_from_key(response, "licenses")
    }

    async fn get_for_licenses(&self, path: &str, query: &QueryParams) -> Result<Vec<LicenseInfo>> {
        let response = self.client.get_with_query(path, query).await?;
        list_from_key(response, "licenses")
    }
}

fn licenses_path(driver_id: &str) -> String {
    format!("{}/licenses", resource_path(Driver::PATH, driver_id))
}

/// Values treated as "no license": `null`, `false`, `""`, `[]`, `{}`.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) => false,
    }
}

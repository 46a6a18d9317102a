//! Driver operations.

use serde_json::json;

use crate::client::{JsonMap, QueryParams, SambaSafetyClient};
use crate::error::Result;
use crate::models::{
    resource_path, single_from_response, Driver, DriverCollection, MvrCollection, MvrRecord,
};
use crate::pagination::Collection;
use crate::query::DriverQuery;
use crate::traits::{Create, Delete, Get, List, Update};

/// Driver CRUD, status transitions and per-driver MVR access.
///
/// Create and update payloads are validated locally before any request is
/// sent; see [`DriverValidator`](crate::DriverValidator).
#[derive(Debug, Clone)]
pub struct DriverService {
    client: SambaSafetyClient,
}

impl DriverService {
    /// Wrap a client.
    pub fn new(client: SambaSafetyClient) -> Self {
        Self { client }
    }

    /// List drivers matching the filters.
    pub async fn list(&self, filters: &QueryParams) -> Result<DriverCollection> {
        Driver::list(&self.client, filters).await
    }

    /// Every driver matching the filters, across all pages.
    pub async fn list_all(&self, filters: &QueryParams) -> Result<Vec<Driver>> {
        Driver::list_all(&self.client, filters).await
    }

    /// Fetch one driver by id.
    pub async fn get(&self, driver_id: &str) -> Result<Driver> {
        Driver::get(&self.client, driver_id).await
    }

    /// Validate and create a driver.
    pub async fn create(&self, data: &JsonMap) -> Result<Driver> {
        Driver::create(&self.client, data).await
    }

    /// Validate and apply a partial update.
    pub async fn update(&self, driver_id: &str, data: &JsonMap) -> Result<Driver> {
        Driver::update(&self.client, driver_id, data).await
    }

    /// Delete a driver.
    pub async fn delete(&self, driver_id: &str) -> Result<()> {
        Driver::delete(&self.client, driver_id).await
    }

    /// Set the driver's status to `active`.
    pub async fn activate(&self, driver_id: &str) -> Result<Driver> {
        self.set_status(driver_id, json!({"status": "active"})).await
    }

    /// Set the driver's status to `inactive`.
    pub async fn deactivate(&self, driver_id: &str) -> Result<Driver> {
        self.set_status(driver_id, json!({"status": "inactive"})).await
    }

    /// Suspend a driver, recording the reason when one is given.
    pub async fn suspend(&self, driver_id: &str, reason: Option<&str>) -> Result<Driver> {
        let mut body = json!({"status": "suspended"});
        if let Some(reason) = reason {
            body["reason"] = json!(reason);
        }
        self.set_status(driver_id, body).await
    }

    #[tracing::instrument(skip(self, body))]
    async fn set_status(&self, driver_id: &str, body: serde_json::Value) -> Result<Driver> {
        let path = format!("{}/status", resource_path(Driver::PATH, driver_id));
        let response = self.client.patch(&path, &body).await?;
        single_from_response(response)
    }

    /// The driver's current MVR.
    #[tracing::instrument(skip(self))]
    pub async fn get_mvr(&self, driver_id: &str) -> Result<MvrRecord> {
        let response = self.client.get(&mvr_path(driver_id)).await?;
        single_from_response(response)
    }

    /// Order a new MVR for the driver.
    #[tracing::instrument(skip(self, options))]
    pub async fn request_mvr(&self, driver_id: &str, options: &JsonMap) -> Result<MvrRecord> {
        let response = self.client.post(&mvr_path(driver_id), options).await?;
        single_from_response(response)
    }

    /// All past MVRs for the driver.
    #[tracing::instrument(skip(self))]
    pub async fn mvr_history(&self, driver_id: &str) -> Result<MvrCollection> {
        let path = format!("{}/history", mvr_path(driver_id));
        let response = self.client.get(&path).await?;
        Collection::from_response(response)
    }

    /// Start a fluent query over the driver list.
    pub fn query(&self) -> DriverQuery {
        DriverQuery::new(self.client.clone())
    }
}

fn mvr_path(driver_id: &str) -> String {
    format!("{}/mvr", resource_path(Driver::PATH, driver_id))
}

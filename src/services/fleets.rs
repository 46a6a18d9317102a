//! Fleet operations and roster management.

use serde_json::json;

use crate::client::{JsonMap, QueryParams, SambaSafetyClient};
use crate::error::Result;
use crate::models::{resource_path, DriverCollection, Fleet};
use crate::pagination::Collection;
use crate::traits::{Create, Delete, Get, List, Update};

/// Fleet CRUD plus adding and removing member drivers.
#[derive(Debug, Clone)]
pub struct FleetService {
    client: SambaSafetyClient,
}

impl FleetService {
    /// Wrap a client.
    pub fn new(client: SambaSafetyClient) -> Self {
        Self { client }
    }

    /// List fleets matching the filters.
    pub async fn list(&self, filters: &QueryParams) -> Result<Collection<Fleet>> {
        Fleet::list(&self.client, filters).await
    }

    /// Fetch one fleet by id.
    pub async fn get(&self, fleet_id: &str) -> Result<Fleet> {
        Fleet::get(&self.client, fleet_id).await
    }

    /// Create a fleet.
    pub async fn create(&self, data: &JsonMap) -> Result<Fleet> {
        Fleet::create(&self.client, data).await
    }

    /// Apply a partial update to a fleet.
    pub async fn update(&self, fleet_id: &str, data: &JsonMap) -> Result<Fleet> {
        Fleet::update(&self.client, fleet_id, data).await
    }

    /// Delete a fleet.
    pub async fn delete(&self, fleet_id: &str) -> Result<()> {
        Fleet::delete(&self.client, fleet_id).await
    }

    /// Drivers in the fleet, with the server's pagination metadata.
    #[tracing::instrument(skip(self))]
    pub async fn drivers(&self, fleet_id: &str, filters: &QueryParams) -> Result<DriverCollection> {
        let response = self
            .client
            .get_with_query(&roster_path(fleet_id), filters)
            .await?;
        Collection::from_response(response)
    }

    /// Add a driver to the fleet.
    #[tracing::instrument(skip(self))]
    pub async fn add_driver(&self, fleet_id: &str, driver_id: &str) -> Result<()> {
        self.client
            .post(&roster_path(fleet_id), &json!({"driver_id": driver_id}))
            .await?;
        Ok(())
    }

    /// Remove a driver from the fleet.
    #[tracing::instrument(skip(self))]
    pub async fn remove_driver(&self, fleet_id: &str, driver_id: &str) -> Result<()> {
        let path = resource_path(&roster_path(fleet_id), driver_id);
        self.client.delete(&path).await?;
        Ok(())
    }
}

fn roster_path(fleet_id: &str) -> String {
    format!("{}/drivers", resource_path(Fleet::PATH, fleet_id))
}

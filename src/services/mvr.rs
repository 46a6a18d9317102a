//! Motor vehicle record operations.

use serde_json::json;

use crate::client::{JsonMap, QueryParams, SambaSafetyClient};
use crate::error::Result;
use crate::models::{resource_path, single_from_response, MvrCollection, MvrRecord};
use crate::traits::{Get, List};

/// Ordering, tracking and cancelling MVR reports.
#[derive(Debug, Clone)]
pub struct MvrService {
    client: SambaSafetyClient,
}

impl MvrService {
    /// Wrap a client.
    pub fn new(client: SambaSafetyClient) -> Self {
        Self { client }
    }

    /// List MVR records matching the filters.
    pub async fn list(&self, filters: &QueryParams) -> Result<MvrCollection> {
        MvrRecord::list(&self.client, filters).await
    }

    /// Fetch one MVR record by id.
    pub async fn get(&self, record_id: &str) -> Result<MvrRecord> {
        MvrRecord::get(&self.client, record_id).await
    }

    /// Order an MVR from a raw request payload.
    #[tracing::instrument(skip(self, data))]
    pub async fn request(&self, data: &JsonMap) -> Result<MvrRecord> {
        let response = self.client.post(MvrRecord::PATH, data).await?;
        single_from_response(response)
    }

    /// Order an MVR for a driver. `options` are merged over `driver_id`.
    pub async fn request_for_driver(&self, driver_id: &str, options: &JsonMap) -> Result<MvrRecord> {
        let mut data = JsonMap::new();
        data.insert("driver_id".to_string(), json!(driver_id));
        data.extend(options.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.request(&data).await
    }

    /// Records for a driver. `driver_id` overrides any filter of the same name.
    pub async fn by_driver(&self, driver_id: &str, filters: &QueryParams) -> Result<MvrCollection> {
        let mut filters = filters.clone();
        filters.insert("driver_id".to_string(), driver_id.to_string());
        self.list(&filters).await
    }

    /// The most recently created record for a driver, if any.
    pub async fn latest_by_driver(&self, driver_id: &str) -> Result<Option<MvrRecord>> {
        let filters = QueryParams::from([
            ("limit".to_string(), "1".to_string()),
            ("sort".to_string(), "-created_at".to_string()),
        ]);
        let records = self.by_driver(driver_id, &filters).await?;
        Ok(records.into_iter().next())
    }

    /// Records still waiting on the state.
    pub async fn pending(&self) -> Result<MvrCollection> {
        self.list(&status_filter("pending")).await
    }

    /// Records with a finished report.
    pub async fn completed(&self) -> Result<MvrCollection> {
        self.list(&status_filter("completed")).await
    }

    /// Cancel a pending order.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, record_id: &str) -> Result<()> {
        let path = resource_path(MvrRecord::PATH, record_id);
        self.client
            .patch(&path, &json!({"status": "cancelled"}))
            .await?;
        Ok(())
    }

    /// Ask the server to re-fetch a record from the state.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self, record_id: &str) -> Result<MvrRecord> {
        let path = format!("{}/refresh", resource_path(MvrRecord::PATH, record_id));
        let response = self.client.post_empty(&path).await?;
        single_from_response(response)
    }
}

fn status_filter(status: &str) -> QueryParams {
    QueryParams::from([("status".to_string(), status.to_string())])
}

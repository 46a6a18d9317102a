//! Update trait for modifying entities.

use async_trait::async_trait;

use crate::client::{JsonMap, SambaSafetyClient};
use crate::error::Result;

/// Update an existing entity.
///
/// # Example
///
/// ```ignore
/// use serde_json::json;
/// use sambasafety::{SambaSafetyClient, Driver, Update};
///
/// let client = SambaSafetyClient::from_env()?;
/// let data = json!({"email": "ada@example.com"});
/// let updated = Driver::update(&client, "drv_123", data.as_object().unwrap()).await?;
/// ```
#[async_trait]
pub trait Update: Sized {
    /// Update the entity and return the updated version.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found, the payload is
    /// rejected, or the request fails.
    async fn update(client: &SambaSafetyClient, id: &str, data: &JsonMap) -> Result<Self>;
}

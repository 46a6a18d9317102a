//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::SambaSafetyClient;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// # Example
///
/// ```ignore
/// use sambasafety::{SambaSafetyClient, Driver, Get};
///
/// let client = SambaSafetyClient::from_env()?;
/// let driver = Driver::get(&client, "drv_123").await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn get(client: &SambaSafetyClient, id: &str) -> Result<Self>;
}

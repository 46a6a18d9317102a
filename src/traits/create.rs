//! Create trait for new entities.

use async_trait::async_trait;

use crate::client::{JsonMap, SambaSafetyClient};
use crate::error::Result;

/// Create a new entity from a plain JSON payload.
#[async_trait]
pub trait Create: Sized {
    /// Create the entity and return the server's representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is rejected or the request fails.
    async fn create(client: &SambaSafetyClient, data: &JsonMap) -> Result<Self>;
}

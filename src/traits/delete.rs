//! Delete trait for removing entities.

use async_trait::async_trait;

use crate::client::SambaSafetyClient;
use crate::error::Result;

/// Delete an entity by ID.
#[async_trait]
pub trait Delete {
    /// Delete the entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn delete(client: &SambaSafetyClient, id: &str) -> Result<()>;
}

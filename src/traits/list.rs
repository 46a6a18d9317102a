//! List trait for fetching collections of entities.

use async_trait::async_trait;

use crate::client::{QueryParams, SambaSafetyClient};
use crate::error::Result;
use crate::models::Resource;
use crate::pagination::Collection;

/// Default page size for `list_all`.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Maximum pages to fetch (safety limit).
const MAX_PAGES: u32 = 1000;

/// List/filter entities with pagination support.
///
/// List endpoints answer `{data: [...], meta?: {total, current_page, per_page}}`.
///
/// # Example
///
/// ```ignore
/// use sambasafety::{SambaSafetyClient, Driver, List};
///
/// let client = SambaSafetyClient::from_env()?;
///
/// // Fetch a single page
/// let page = Driver::list_page(&client, &Default::default(), 1, 50).await?;
///
/// // Fetch all pages
/// let all_drivers = Driver::list_all(&client, &Default::default()).await?;
/// ```
#[async_trait]
pub trait List: Resource + Send {
    /// Collection path relative to the API base URL (e.g. `drivers`).
    const PATH: &'static str;

    /// List entities matching the filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    async fn list(client: &SambaSafetyClient, params: &QueryParams) -> Result<Collection<Self>> {
        let response = client.get_with_query(Self::PATH, params).await?;
        Collection::from_response(response)
    }

    /// List a single page of entities.
    ///
    /// # Arguments
    ///
    /// * `client` - The SambaSafety API client
    /// * `params` - Filters
    /// * `page` - Page number (1-indexed)
    /// * `per_page` - Number of items per page
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &SambaSafetyClient,
        params: &QueryParams,
        page: u32,
        per_page: u32,
    ) -> Result<Collection<Self>> {
        let mut params = params.clone();
        params.insert("page".to_string(), page.to_string());
        params.insert("per_page".to_string(), per_page.to_string());
        Self::list(client, &params).await
    }

    /// List all entities matching the filters (fetches all pages).
    ///
    /// Pages are requested until the response metadata reports no next page.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(client: &SambaSafetyClient, params: &QueryParams) -> Result<Vec<Self>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            let result = Self::list_page(client, params, page, DEFAULT_PAGE_SIZE).await?;
            let has_next = result.has_next_page();
            all_items.extend(result.items);

            if !has_next {
                break;
            }
            page += 1;

            if page > MAX_PAGES {
                tracing::warn!("Reached pagination limit of {} pages, stopping", MAX_PAGES);
                break;
            }
        }

        Ok(all_items)
    }
}

//! Fluent query builder for list endpoints.
//!
//! A [`QueryBuilder`] accumulates filters, sorts, paging and includes and
//! compiles them into query parameters for the resource's list endpoint.
//! Nothing is sent until [`get`](QueryBuilder::get),
//! [`first`](QueryBuilder::first) or [`count`](QueryBuilder::count) is
//! awaited.

use std::fmt::{self, Display};
use std::marker::PhantomData;

use serde_json::Value;

use crate::client::{QueryParams, SambaSafetyClient};
use crate::error::Result;
use crate::models::Driver;
use crate::pagination::Collection;
use crate::traits::List;

/// Sort direction for [`QueryBuilder::sort_by`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Builder for a filtered, sorted, paginated list query.
///
/// Filters are keyed by field; setting a field again replaces its value.
/// Sorts keep the order in which fields were first added.
///
/// # Example
///
/// ```no_run
/// use sambasafety::{SambaSafety, SortDirection};
///
/// # async fn example() -> sambasafety::Result<()> {
/// let sdk = SambaSafety::from_env()?;
/// let drivers = sdk
///     .drivers()
///     .query()
///     .where_active()
///     .where_state("CA")
///     .sort_by("last_name", SortDirection::Asc)
///     .per_page(25)
///     .get()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
#[must_use]
pub struct QueryBuilder<T> {
    client: SambaSafetyClient,
    filters: QueryParams,
    sorts: Vec<(String, SortDirection)>,
    page: Option<u32>,
    per_page: Option<u32>,
    includes: Vec<String>,
    _resource: PhantomData<fn() -> T>,
}

/// Query over the driver list endpoint.
pub type DriverQuery = QueryBuilder<Driver>;

impl<T> fmt::Debug for QueryBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("filters", &self.filters)
            .field("sorts", &self.sorts)
            .field("page", &self.page)
            .field("per_page", &self.per_page)
            .field("includes", &self.includes)
            .finish_non_exhaustive()
    }
}

impl<T: List> QueryBuilder<T> {
    /// Start an empty query against `T`'s list endpoint.
    pub fn new(client: SambaSafetyClient) -> Self {
        Self {
            client,
            filters: QueryParams::new(),
            sorts: Vec::new(),
            page: None,
            per_page: None,
            includes: Vec::new(),
            _resource: PhantomData,
        }
    }

    /// Filter on `field == value`.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Display) -> Self {
        self.filters.insert(field.into(), value.to_string());
        self
    }

    /// Filter on `field` being one of `values` (sent comma-joined).
    pub fn where_in<I>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.where_eq(field, joined)
    }

    /// Substring filter, sent as `<field>_like`.
    pub fn where_like(self, field: &str, value: impl Display) -> Self {
        self.where_eq(format!("{field}_like"), value)
    }

    /// Sort by `field`. Re-sorting a field keeps its original position.
    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        let field = field.into();
        match self.sorts.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = direction,
            None => self.sorts.push((field, direction)),
        }
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Request related resources. Relations accumulate in call order.
    pub fn include<I>(mut self, relations: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.includes.extend(relations.into_iter().map(Into::into));
        self
    }

    /// Compile the query into list-endpoint parameters.
    #[must_use]
    pub fn build_params(&self) -> QueryParams {
        let mut params = self.filters.clone();

        if !self.sorts.is_empty() {
            let sort = self
                .sorts
                .iter()
                .map(|(field, direction)| match direction {
                    SortDirection::Asc => field.clone(),
                    SortDirection::Desc => format!("-{field}"),
                })
                .collect::<Vec<_>>()
                .join(",");
            params.insert("sort".to_string(), sort);
        }

        if let Some(page) = self.page {
            params.insert("page".to_string(), page.to_string());
        }

        if let Some(per_page) = self.per_page {
            params.insert("per_page".to_string(), per_page.to_string());
        }

        if !self.includes.is_empty() {
            params.insert("include".to_string(), self.includes.join(","));
        }

        params
    }

    /// Run the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn get(self) -> Result<Collection<T>> {
        T::list(&self.client, &self.build_params()).await
    }

    /// Run the query with a page size of one and return the first match.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn first(self) -> Result<Option<T>> {
        let collection = self.per_page(1).get().await?;
        Ok(collection.into_iter().next())
    }

    /// Count matches without fetching them. A response without `count` is 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self), fields(path = T::PATH))]
    pub async fn count(self) -> Result<u64> {
        let mut params = self.build_params();
        params.insert("count_only".to_string(), "true".to_string());

        let response = self.client.get_with_query(T::PATH, &params).await?;
        Ok(response.get("count").map_or(0, count_value))
    }
}

fn count_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

impl QueryBuilder<Driver> {
    pub fn where_status(self, status: &str) -> Self {
        self.where_eq("status", status)
    }

    pub fn where_active(self) -> Self {
        self.where_status("active")
    }

    pub fn where_inactive(self) -> Self {
        self.where_status("inactive")
    }

    pub fn where_state(self, state: &str) -> Self {
        self.where_eq("state", state)
    }

    pub fn where_email(self, email: &str) -> Self {
        self.where_eq("email", email)
    }

    pub fn where_license_number(self, license_number: &str) -> Self {
        self.where_eq("license_number", license_number)
    }

    /// Drivers created after `date` (passed through as given).
    pub fn where_created_after(self, date: &str) -> Self {
        self.where_eq("created_after", date)
    }

    /// Drivers created before `date` (passed through as given).
    pub fn where_created_before(self, date: &str) -> Self {
        self.where_eq("created_before", date)
    }

    pub fn sort_by_name(self, direction: SortDirection) -> Self {
        self.sort_by("name", direction)
    }

    pub fn sort_by_created_at(self, direction: SortDirection) -> Self {
        self.sort_by("created_at", direction)
    }

    /// Newest first.
    pub fn latest(self) -> Self {
        self.sort_by_created_at(SortDirection::Desc)
    }

    pub fn include_mvr(self) -> Self {
        self.include(["mvr"])
    }

    pub fn include_fleet(self) -> Self {
        self.include(["fleet"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query() -> DriverQuery {
        let client = SambaSafetyClient::new("test-key", "http://localhost:1").unwrap();
        DriverQuery::new(client)
    }

    #[test]
    fn test_empty_query_has_no_params() {
        assert!(query().build_params().is_empty());
    }

    #[test]
    fn test_filters_last_write_wins() {
        let params = query()
            .where_active()
            .where_state("CA")
            .where_status("suspended")
            .build_params();

        assert_eq!(params.get("status").map(String::as_str), Some("suspended"));
        assert_eq!(params.get("state").map(String::as_str), Some("CA"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_where_in_and_like() {
        let params = query()
            .where_in("state", ["CA", "NV", "OR"])
            .where_like("last_name", "smi")
            .build_params();

        assert_eq!(params.get("state").map(String::as_str), Some("CA,NV,OR"));
        assert_eq!(params.get("last_name_like").map(String::as_str), Some("smi"));
    }

    #[test]
    fn test_sort_order_is_preserved() {
        let params = query()
            .sort_by_created_at(SortDirection::Desc)
            .sort_by_name(SortDirection::Asc)
            .sort_by("created_at", SortDirection::Asc)
            .build_params();

        assert_eq!(params.get("sort").map(String::as_str), Some("created_at,name"));

        let params = query()
            .sort_by_name(SortDirection::Asc)
            .latest()
            .build_params();
        assert_eq!(params.get("sort").map(String::as_str), Some("name,-created_at"));
    }

    #[test]
    fn test_paging_and_includes() {
        let params = query()
            .page(3)
            .per_page(20)
            .include_mvr()
            .include_fleet()
            .include(["mvr"])
            .build_params();

        assert_eq!(params.get("page").map(String::as_str), Some("3"));
        assert_eq!(params.get("per_page").map(String::as_str), Some("20"));
        assert_eq!(params.get("include").map(String::as_str), Some("mvr,fleet,mvr"));
    }

    #[test]
    fn test_query_string_encoding() {
        let params = query().where_active().page(2).per_page(10).build_params();
        assert_eq!(
            serde_qs::to_string(&params).unwrap(),
            "page=2&per_page=10&status=active"
        );
    }

    #[test]
    fn test_query_string_decodes_to_same_params() {
        let params = query()
            .where_in("state", ["CA", "NV"])
            .sort_by_name(SortDirection::Desc)
            .include_mvr()
            .build_params();

        let encoded = serde_qs::to_string(&params).unwrap();
        let decoded: QueryParams = serde_qs::from_str(&encoded).unwrap();
        assert_eq!(decoded, params);
        assert_eq!(decoded.get("sort").map(String::as_str), Some("-name"));
    }

    #[test]
    fn test_count_value_lenient() {
        assert_eq!(count_value(&json!(42)), 42);
        assert_eq!(count_value(&json!("17")), 17);
        assert_eq!(count_value(&json!(null)), 0);
        assert_eq!(count_value(&json!(-3)), 0);
    }
}

//! Paginated collections returned by list endpoints.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{json_kind, JsonMap};
use crate::error::{Result, SambaSafetyError};
use crate::models::Resource;

/// Pagination metadata from the `meta` object of a list response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Total number of items across all pages.
    #[serde(default)]
    pub total: Option<u64>,
    /// Current page number (1-indexed).
    #[serde(default)]
    pub current_page: Option<u32>,
    /// Number of items per page.
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// An ordered page of models plus optional pagination metadata.
///
/// Domain-specific helpers live on concrete instantiations, see
/// [`DriverCollection`](crate::DriverCollection) and
/// [`MvrCollection`](crate::MvrCollection).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Collection<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Pagination metadata, if the server sent any.
    pub meta: Option<PaginationMeta>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            meta: None,
        }
    }
}

impl<T> Collection<T> {
    /// Create a collection from items and pagination info.
    #[must_use]
    pub fn new(items: Vec<T>, meta: Option<PaginationMeta>) -> Self {
        Self { items, meta }
    }

    /// Returns the number of items in this collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if this collection has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The first item, if any.
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// The last item, if any.
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Returns an iterator over the items in this collection.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Keep only the items matching `predicate`. Metadata is carried over.
    #[must_use]
    pub fn filter<F: FnMut(&T) -> bool>(self, mut predicate: F) -> Self {
        Self {
            items: self.items.into_iter().filter(|item| predicate(item)).collect(),
            meta: self.meta,
        }
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Collection<U> {
        Collection {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    /// The first item matching `predicate`.
    pub fn find<F: FnMut(&T) -> bool>(&self, mut predicate: F) -> Option<&T> {
        self.items.iter().find(|item| predicate(item))
    }

    /// Extract one value per item.
    pub fn pluck<U, F: FnMut(&T) -> U>(&self, f: F) -> Vec<U> {
        self.items.iter().map(f).collect()
    }

    /// Total number of items across all pages, if known.
    pub fn total(&self) -> Option<u64> {
        self.meta.and_then(|m| m.total)
    }

    /// Current page number, if known.
    pub fn current_page(&self) -> Option<u32> {
        self.meta.and_then(|m| m.current_page)
    }

    /// Page size, if known.
    pub fn per_page(&self) -> Option<u32> {
        self.meta.and_then(|m| m.per_page)
    }

    /// Whether another page follows this one.
    ///
    /// Requires `total`, `current_page` and `per_page` to all be present.
    pub fn has_next_page(&self) -> bool {
        match (self.total(), self.current_page(), self.per_page()) {
            (Some(total), Some(current), Some(per_page)) if per_page > 0 => {
                let last_page = total.div_ceil(u64::from(per_page));
                u64::from(current) < last_page
            }
            _ => false,
        }
    }

    /// Whether a page precedes this one.
    pub fn has_previous_page(&self) -> bool {
        self.current_page().is_some_and(|page| page > 1)
    }
}

impl<T: Resource> Collection<T> {
    /// Build a collection from a list response (`{data: [...], meta?: {...}}`).
    ///
    /// A missing `data` key yields an empty collection.
    pub fn from_response(mut response: JsonMap) -> Result<Self> {
        let items = match response.remove("data") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(values)) => values
                .into_iter()
                .map(T::from_value)
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(SambaSafetyError::ResponseFormat(format!(
                    "expected 'data' to be an array, got {}",
                    json_kind(&other)
                )))
            }
        };

        let meta = match response.remove("meta") {
            Some(value @ Value::Object(_)) => Some(decode(value, "meta")?),
            _ => None,
        };

        Ok(Self::new(items, meta))
    }

    /// Serialize every item back to a JSON object.
    pub fn to_json(&self) -> Vec<JsonMap> {
        self.items.iter().map(Resource::to_json).collect()
    }
}

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| SambaSafetyError::ResponseFormat(format!("invalid '{what}': {e}")))
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

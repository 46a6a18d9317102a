//! Driver model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError, DefaultOnNull};

use super::de::string_or_number;
use super::{resource_path, single_from_response, Resource};
use crate::client::{JsonMap, SambaSafetyClient};
use crate::error::Result;
use crate::pagination::Collection;
use crate::traits::{Create, Delete, Get, List, Update};
use crate::validation::DriverValidator;

/// A driver enrolled with the account.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Driver ID.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,

    /// Given name.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub first_name: String,

    /// Family name.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub last_name: String,

    /// Driver's license number.
    #[serde(default)]
    pub license_number: Option<String>,

    /// Contact email address.
    #[serde(default)]
    pub email: Option<String>,

    /// Open key/value bag. The account-level driver status lives here.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub metadata: JsonMap,
}

impl Resource for Driver {
    const CAMEL_CASE_FIELDS: &'static [&'static str] =
        &["first_name", "last_name", "license_number"];
}

impl Driver {
    /// First and last name joined by a space, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// The `status` entry of the metadata bag, if it is a string.
    pub fn status(&self) -> Option<&str> {
        self.metadata.get("status").and_then(Value::as_str)
    }

    /// Look up a metadata entry.
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

/// A page of drivers.
pub type DriverCollection = Collection<Driver>;

impl Collection<Driver> {
    /// The first driver with exactly this email.
    pub fn find_by_email(&self, email: &str) -> Option<&Driver> {
        self.find(|d| d.email.as_deref() == Some(email))
    }

    /// The first driver with exactly this license number.
    pub fn find_by_license_number(&self, license_number: &str) -> Option<&Driver> {
        self.find(|d| d.license_number.as_deref() == Some(license_number))
    }

    /// Drivers whose metadata status equals `status`.
    ///
    /// Compares `metadata["status"]` with `status`; an earlier port compared
    /// `null` with `status` because of an operator-precedence slip.
    #[must_use]
    pub fn filter_by_status(self, status: &str) -> Self {
        self.filter(|d| d.status() == Some(status))
    }

    /// Drivers with status `active`.
    #[must_use]
    pub fn active_drivers(self) -> Self {
        self.filter_by_status("active")
    }

    /// Drivers with status `inactive`.
    #[must_use]
    pub fn inactive_drivers(self) -> Self {
        self.filter_by_status("inactive")
    }

    /// Sorted by full name (byte-wise).
    #[must_use]
    pub fn sort_by_name(mut self) -> Self {
        self.items.sort_by_key(Driver::full_name);
        self
    }
}

#[async_trait]
impl Get for Driver {
    #[tracing::instrument(skip(client))]
    async fn get(client: &SambaSafetyClient, id: &str) -> Result<Self> {
        let response = client.get(&resource_path(Self::PATH, id)).await?;
        single_from_response(response)
    }
}

#[async_trait]
impl List for Driver {
    const PATH: &'static str = "drivers";
}

#[async_trait]
impl Create for Driver {
    #[tracing::instrument(skip(client, data))]
    async fn create(client: &SambaSafetyClient, data: &JsonMap) -> Result<Self> {
        DriverValidator::validate_create(data)?;
        let response = client.post(Self::PATH, data).await?;
        single_from_response(response)
    }
}

#[async_trait]
impl Update for Driver {
    #[tracing::instrument(skip(client, data))]
    async fn update(client: &SambaSafetyClient, id: &str, data: &JsonMap) -> Result<Self> {
        DriverValidator::validate_update(data)?;
        let response = client.put(&resource_path(Self::PATH, id), data).await?;
        single_from_response(response)
    }
}

#[async_trait]
impl Delete for Driver {
    #[tracing::instrument(skip(client))]
    async fn delete(client: &SambaSafetyClient, id: &str) -> Result<()> {
        client.delete(&resource_path(Self::PATH, id)).await?;
        Ok(())
    }
}

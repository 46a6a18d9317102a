//! Fleet model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError, DefaultOnNull};

use super::de::string_or_number;
use super::{resource_path, single_from_response, Resource};
use crate::client::{JsonMap, SambaSafetyClient};
use crate::error::Result;
use crate::traits::{Create, Delete, Get, List, Update};

/// A named group of drivers.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    /// Fleet ID.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,

    /// Display name.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,

    /// Fleet status, `active` unless the server says otherwise.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default = "default_status")]
    pub status: String,

    /// Fleet-level configuration.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub settings: JsonMap,

    /// When the fleet was created.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// When the fleet was last changed.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Additional fleet fields.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub metadata: JsonMap,
}

fn default_status() -> String {
    "active".to_string()
}

impl Default for Fleet {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: None,
            status: default_status(),
            settings: JsonMap::new(),
            created_at: None,
            updated_at: None,
            metadata: JsonMap::new(),
        }
    }
}

impl Resource for Fleet {
    const CAMEL_CASE_FIELDS: &'static [&'static str] = &["created_at", "updated_at"];
}

impl Fleet {
    /// Status is `active` (case-insensitive).
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }

    /// Look up a fleet setting.
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }
}

#[async_trait]
impl Get for Fleet {
    #[tracing::instrument(skip(client))]
    async fn get(client: &SambaSafetyClient, id: &str) -> Result<Self> {
        let response = client.get(&resource_path(Self::PATH, id)).await?;
        single_from_response(response)
    }
}

#[async_trait]
impl List for Fleet {
    const PATH: &'static str = "fleets";
}

#[async_trait]
impl Create for Fleet {
    #[tracing::instrument(skip(client, data))]
    async fn create(client: &SambaSafetyClient, data: &JsonMap) -> Result<Self> {
        let response = client.post(Self::PATH, data).await?;
        single_from_response(response)
    }
}

#[async_trait]
impl Update for Fleet {
    #[tracing::instrument(skip(client, data))]
    async fn update(client: &SambaSafetyClient, id: &str, data: &JsonMap) -> Result<Self> {
        let response = client.put(&resource_path(Self::PATH, id), data).await?;
        single_from_response(response)
    }
}

#[async_trait]
impl Delete for Fleet {
    #[tracing::instrument(skip(client))]
    async fn delete(client: &SambaSafetyClient, id: &str) -> Result<()> {
        client.delete(&resource_path(Self::PATH, id)).await?;
        Ok(())
    }
}

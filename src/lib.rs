//! SambaSafety API client library.
//!
//! A Rust library for the SambaSafety driver-safety compliance REST API:
//! drivers, fleets, motor vehicle records (MVRs), license discovery and
//! token authentication. Each resource operation (Get, List, Create,
//! Update, Delete) is a trait that model types implement; services compose
//! those traits with endpoint-specific calls.
//!
//! # Quick Start
//!
//! ```no_run
//! use sambasafety::{SambaSafety, SortDirection};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> sambasafety::Result<()> {
//!     // Create the SDK from environment variables
//!     let sdk = SambaSafety::from_env()?;
//!
//!     // Create a driver (validated locally first)
//!     let payload = json!({"first_name": "Ada", "last_name": "Lovelace"});
//!     let driver = sdk.drivers().create(payload.as_object().unwrap()).await?;
//!
//!     // Query active drivers in California
//!     let drivers = sdk
//!         .drivers()
//!         .query()
//!         .where_active()
//!         .where_state("CA")
//!         .sort_by_name(SortDirection::Asc)
//!         .get()
//!         .await?;
//!     println!("Found {} drivers", drivers.len());
//!
//!     // Latest MVR for the new driver
//!     if let Some(mvr) = sdk.mvr().latest_by_driver(&driver.id).await? {
//!         println!("{} violations", mvr.violation_count());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`SambaSafetyClient`] - HTTP transport, authentication and error mapping
//! - [`Get`], [`List`], [`Create`], [`Update`], [`Delete`] - resource traits
//! - [`Collection`] - a page of models plus pagination metadata
//! - [`DriverQuery`] - fluent filter/sort/paging builder for drivers
//! - [`SambaSafety`] - facade owning one instance of every service
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `SAMBASAFETY_API_KEY` (required) - API key or bearer token
//! - `SAMBASAFETY_API_URL` (optional) - Base URL (defaults to `https://api.sambasafety.com/v1`)
//! - `SAMBASAFETY_TIMEOUT_SECS` (optional) - Request timeout in seconds

pub mod cli;
mod client;
mod config;
mod error;
mod models;
pub mod output;
mod pagination;
mod query;
mod sdk;
mod services;
mod traits;
mod validation;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{JsonMap, QueryParams, SambaSafetyClient};
pub use config::{ClientConfig, DEFAULT_API_URL, USER_AGENT};
pub use error::{Result, SambaSafetyError};
pub use pagination::{Collection, PaginationMeta};
pub use query::{DriverQuery, QueryBuilder, SortDirection};
pub use sdk::{Authenticator, SambaSafety};
pub use validation::DriverValidator;

// Re-export services
pub use services::{AuthService, DriverService, FleetService, LicenseDiscoveryService, MvrService};

// Re-export traits
pub use traits::{Create, Delete, Get, List, Update, DEFAULT_PAGE_SIZE};

pub use output::PrettyPrint;

// Re-export models
pub use models::{
    // Accident
    Accident,
    // Auth
    TokenBundle,
    DEFAULT_EXPIRES_IN,
    // Bulk validation
    BulkValidationResult,
    // Driver types
    Driver,
    DriverCollection,
    // Fleet
    Fleet,
    // License types
    LicenseInfo,
    LicenseLookup,
    // MVR types
    MvrCollection,
    MvrRecord,
    // Shared decoding
    Resource,
    // Violation
    Violation,
};

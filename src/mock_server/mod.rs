//! Mock SambaSafety API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the SambaSafety
//! API for integration and end-to-end testing. Unlike wiremock which mocks at the
//! HTTP level per-test, this server maintains state across requests, enabling
//! realistic workflow testing: a driver created in one call can be suspended,
//! assigned to a fleet and have an MVR ordered in the following ones.
//!
//! # Example
//!
//! ```ignore
//! use sambasafety::mock_server::MockServer;
//! use sambasafety::SambaSafety;
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let sdk = SambaSafety::new("test-token", server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let driver = sdk.drivers().get("drv_1").await.unwrap();
//!     assert_eq!(driver.full_name(), "John Doe");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::MockState;

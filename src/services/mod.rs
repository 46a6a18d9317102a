//! Resource-oriented operation sets.
//!
//! Each service holds a clone of the [`SambaSafetyClient`](crate::SambaSafetyClient)
//! and composes the resource traits with endpoint-specific calls.

mod auth;
mod drivers;
mod fleets;
mod license_discovery;
mod mvr;

pub use auth::AuthService;
pub use drivers::DriverService;
pub use fleets::FleetService;
pub use license_discovery::LicenseDiscoveryService;
pub use mvr::MvrService;

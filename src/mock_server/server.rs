//! Mock SambaSafety API server.
//!
//! Provides an axum-based HTTP server that simulates the SambaSafety API.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers::{self, bearer_token, error_response, SharedState};
use super::state::MockState;

/// Paths reachable without a bearer token.
const PUBLIC_PATHS: [&str; 3] = ["/health", "/auth/login", "/auth/refresh"];

/// In-process SambaSafety API bound to a loopback port.
///
/// Drivers, fleets, MVR records, licenses and sessions live in a shared
/// [`MockState`] that tests can inspect or seed while the server runs.
pub struct MockServer {
    url: String,
    handle: JoinHandle<()>,
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Serve [`Fixtures::default_scenario`] on an ephemeral port.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Serve an account with no drivers, fleets or records.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Serve a pre-built state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("mock server could not bind a loopback port");
        let addr = listener
            .local_addr()
            .expect("mock server listener has no local address");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "mock server stopped");
            }
        });

        Self {
            url: format!("http://{addr}"),
            handle,
            state: shared_state,
        }
    }

    /// Base URL to hand to [`SambaSafety::new`](crate::SambaSafety::new).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Live state behind the routes.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Abort the serving task and wait for it to finish.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for driver in scenario.drivers {
            state = state.with_driver(driver);
        }

        for fleet in scenario.fleets {
            state = state.with_fleet(fleet);
        }

        for (fleet_id, driver_ids) in scenario.rosters {
            for driver_id in driver_ids {
                state.add_fleet_member(&fleet_id, &driver_id);
            }
        }

        for record in scenario.mvr_records {
            state = state.with_mvr_record(record);
        }

        for license in scenario.licenses {
            state = state.with_license(license);
        }

        for (username, password) in scenario.users {
            state = state.with_user(&username, &password);
        }

        state
    }

    /// Every route plus the bearer-token layer.
    pub(crate) fn create_router(state: SharedState) -> Router {
        Router::new()
            // Auth routes
            .route("/auth/login", post(handlers::login))
            .route("/auth/refresh", post(handlers::refresh))
            .route("/auth/logout", post(handlers::logout))
            .route("/auth/user", get(handlers::current_user))
            .route("/auth/validate", get(handlers::validate))
            // Driver routes
            .route(
                "/drivers",
                get(handlers::list_drivers).post(handlers::create_driver),
            )
            .route(
                "/drivers/:id",
                get(handlers::get_driver)
                    .put(handlers::update_driver)
                    .delete(handlers::delete_driver),
            )
            .route("/drivers/:id/status", patch(handlers::update_driver_status))
            .route(
                "/drivers/:id/mvr",
                get(handlers::get_driver_mvr).post(handlers::request_driver_mvr),
            )
            .route("/drivers/:id/mvr/history", get(handlers::driver_mvr_history))
            .route(
                "/drivers/:id/license-discovery",
                post(handlers::discover_driver_licenses),
            )
            .route("/drivers/:id/licenses", post(handlers::link_driver_license))
            .route(
                "/drivers/:id/licenses/:state/:number",
                delete(handlers::unlink_driver_license),
            )
            // Fleet routes
            .route(
                "/fleets",
                get(handlers::list_fleets).post(handlers::create_fleet),
            )
            .route(
                "/fleets/:id",
                get(handlers::get_fleet)
                    .put(handlers::update_fleet)
                    .delete(handlers::delete_fleet),
            )
            .route(
                "/fleets/:id/drivers",
                get(handlers::list_fleet_drivers).post(handlers::add_fleet_driver),
            )
            .route(
                "/fleets/:id/drivers/:driver_id",
                delete(handlers::remove_fleet_driver),
            )
            // MVR routes
            .route(
                "/mvr-records",
                get(handlers::list_mvr_records).post(handlers::request_mvr_record),
            )
            .route(
                "/mvr-records/:id",
                get(handlers::get_mvr_record).patch(handlers::update_mvr_record),
            )
            .route("/mvr-records/:id/refresh", post(handlers::refresh_mvr_record))
            // License discovery routes
            .route(
                "/license-discovery/validate",
                post(handlers::validate_license),
            )
            .route(
                "/license-discovery/history/:state/:number",
                get(handlers::license_history),
            )
            .route("/license-discovery/expired", get(handlers::expired_licenses))
            .route(
                "/license-discovery/expiring-soon",
                get(handlers::expiring_licenses),
            )
            .route(
                "/license-discovery/suspended",
                get(handlers::suspended_licenses),
            )
            .route(
                "/license-discovery/bulk-validate",
                post(handlers::bulk_validate),
            )
            .route(
                "/license-discovery/personal",
                post(handlers::discover_by_personal_info),
            )
            .route(
                "/license-discovery/multi-state",
                post(handlers::discover_by_personal_info),
            )
            .route(
                "/license-discovery/all-states",
                post(handlers::discover_by_personal_info),
            )
            .route("/license-discovery/ssn", post(handlers::discover_by_ssn))
            // Health check
            .route("/health", get(health_check))
            .layer(middleware::from_fn_with_state(state.clone(), require_token))
            .with_state(state)
    }
}

/// Reject requests without an accepted bearer token once a required token is set.
async fn require_token(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    if PUBLIC_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let authorized = {
        let state = state.read().await;
        state.required_token.is_none()
            || bearer_token(request.headers()).is_some_and(|t| state.accepts_token(t))
    };

    if authorized {
        next.run(request).await
    } else {
        error_response(StatusCode::UNAUTHORIZED, "Unauthorized", "Unauthenticated.")
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

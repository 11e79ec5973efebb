//! spacedash-api — HTTP surface for SpaceDash.
//!
//! Serves the dashboard page at the root and a read-only JSON API that
//! exposes the same chart figures the page renders.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/v1/records` | All launch records |
//! | GET | `/api/v1/sites` | Launch sites and payload bounds |
//! | GET | `/api/v1/figures/success-pie-chart` | Pie figure (`?site=`) |
//! | GET | `/api/v1/figures/success-payload-scatter-chart` | Scatter figure (`?site=&low=&high=`) |
//! | GET | `/healthz` | Liveness probe |

pub mod handlers;

use axum::Router;
use axum::routing::get;
use spacedash_dashboard::DashboardState;

/// Build the complete router (dashboard + JSON API + health).
pub fn build_router(state: DashboardState) -> Router {
    let api_routes = Router::new()
        .route("/records", get(handlers::list_records))
        .route("/sites", get(handlers::list_sites))
        .route("/figures/{output}", get(handlers::get_figure))
        .with_state(state.clone());

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/healthz", get(handlers::healthz))
        .merge(spacedash_dashboard::dashboard_router(state))
}

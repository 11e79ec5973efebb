//! spacedash-dashboard — server-rendered launch records dashboard.
//!
//! Provides axum route handlers that render the dashboard page and the
//! HTMX fragments that replace a chart whenever a control changes. Chart
//! updates go through the reactive [`Dispatcher`]: the browser posts the
//! current control values plus the id of the control that changed, and
//! only the outputs bound to that control are re-rendered.
//!
//! # Routes
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /` | Dashboard page |
//! | `POST /update` | Out-of-band chart fragments for a control change |
//!
//! [`Dispatcher`]: spacedash_reactive::Dispatcher

pub mod bindings;
pub mod pages;
pub mod partials;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use spacedash_core::LayoutConfig;
use spacedash_reactive::{BindingRegistry, BindingResult};
use spacedash_records::RecordStore;

pub use bindings::ChartFigure;

/// Process-wide application context: the loaded records and the static
/// layout. Read-only after startup.
pub struct AppContext {
    pub store: RecordStore,
    pub layout: LayoutConfig,
    /// Unix timestamp (seconds) when the store was loaded.
    pub loaded_at: u64,
}

impl AppContext {
    pub fn new(store: RecordStore, layout: LayoutConfig) -> Self {
        let loaded_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self {
            store,
            layout,
            loaded_at,
        }
    }
}

/// Shared state for dashboard handlers.
#[derive(Clone)]
pub struct DashboardState {
    pub context: Arc<AppContext>,
    pub bindings: Arc<BindingRegistry<AppContext, ChartFigure>>,
}

impl DashboardState {
    /// Wrap the context and register the dashboard's chart bindings.
    pub fn new(context: AppContext) -> BindingResult<Self> {
        Ok(Self {
            context: Arc::new(context),
            bindings: Arc::new(bindings::build_registry()?),
        })
    }
}

/// Build the dashboard router.
pub fn dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/update", post(partials::control_changed))
        .with_state(state)
}

//! JSON API handlers.
//!
//! Figures are produced through the same binding registry and dispatcher
//! as the dashboard page, so the API and the charts never disagree.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use spacedash_dashboard::{ChartFigure, DashboardState};
use spacedash_dashboard::bindings::{self, PAYLOAD_SLIDER, SITE_DROPDOWN};
use spacedash_reactive::{BindingResult, ControlValue, Dispatcher};
use spacedash_records::{ALL_SITES, PayloadBounds};

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
}

// ── Health ─────────────────────────────────────────────────────

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}

// ── Records ────────────────────────────────────────────────────

/// GET /api/v1/records
pub async fn list_records(State(state): State<DashboardState>) -> impl IntoResponse {
    ApiResponse::ok(state.context.store.records().to_vec())
}

#[derive(serde::Serialize)]
struct SitesResponse {
    sites: Vec<String>,
    payload_bounds: Option<PayloadBounds>,
}

/// GET /api/v1/sites
pub async fn list_sites(State(state): State<DashboardState>) -> impl IntoResponse {
    let store = &state.context.store;
    ApiResponse::ok(SitesResponse {
        sites: store.sites().to_vec(),
        payload_bounds: store.payload_bounds(),
    })
}

// ── Figures ────────────────────────────────────────────────────

/// Figure filter query. Missing values default to every site and the
/// observed payload bounds.
#[derive(Debug, Default, serde::Deserialize)]
pub struct FigureQuery {
    pub site: Option<String>,
    pub low: Option<f64>,
    pub high: Option<f64>,
}

/// GET /api/v1/figures/{output}
pub async fn get_figure(
    State(state): State<DashboardState>,
    Path(output): Path<String>,
    Query(query): Query<FigureQuery>,
) -> impl IntoResponse {
    if state.bindings.get(&output).is_none() {
        return error_response("figure not found", StatusCode::NOT_FOUND).into_response();
    }

    match evaluate_figure(&state, &output, query) {
        Ok(figure) => ApiResponse::ok(figure).into_response(),
        Err(e) => {
            tracing::warn!(%output, error = %e, "figure evaluation failed");
            error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
    }
}

/// Evaluate only the requested binding; the other figure is not computed.
fn evaluate_figure(
    state: &DashboardState,
    output: &str,
    query: FigureQuery,
) -> BindingResult<ChartFigure> {
    let initial = bindings::initial_range(&state.context);
    let site = query.site.unwrap_or_else(|| ALL_SITES.to_string());
    let low = query.low.unwrap_or(initial.low);
    let high = query.high.unwrap_or(initial.high);

    let mut dispatcher = Dispatcher::new(state.bindings.clone(), state.context.clone());
    dispatcher.seed(SITE_DROPDOWN, ControlValue::text(site))?;
    dispatcher.seed(PAYLOAD_SLIDER, ControlValue::range(low, high))?;
    dispatcher.evaluate(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    use spacedash_core::LayoutConfig;
    use spacedash_dashboard::AppContext;
    use spacedash_dashboard::bindings::{PIE_CHART, SCATTER_CHART};
    use spacedash_reactive::BindingError;
    use spacedash_records::{LaunchRecord, RecordStore};

    fn state() -> DashboardState {
        let store = RecordStore::from_records(vec![
            LaunchRecord::new("KSC LC-39A", 5000.0, "v1", 1),
            LaunchRecord::new("CCAFS LC-40", 2000.0, "v2", 0),
        ])
        .unwrap();
        DashboardState::new(AppContext::new(store, LayoutConfig::default())).unwrap()
    }

    #[test]
    fn pie_figure_for_one_site() {
        let query = FigureQuery {
            site: Some("CCAFS LC-40".to_string()),
            ..Default::default()
        };
        match evaluate_figure(&state(), PIE_CHART, query).unwrap() {
            ChartFigure::Pie(p) => {
                assert_eq!(p.title, "CCAFS LC-40 Launch Success Rate");
                assert_eq!(p.total(), 1);
            }
            other => panic!("unexpected figure {other:?}"),
        }
    }

    #[test]
    fn scatter_defaults_to_payload_bounds() {
        match evaluate_figure(&state(), SCATTER_CHART, FigureQuery::default()).unwrap() {
            ChartFigure::Scatter(c) => assert_eq!(c.points.len(), 2),
            other => panic!("unexpected figure {other:?}"),
        }
    }

    #[test]
    fn unknown_output_is_an_error() {
        assert_eq!(
            evaluate_figure(&state(), "bar-chart", FigureQuery::default()).unwrap_err(),
            BindingError::UnknownOutput("bar-chart".to_string())
        );
    }
}

//! HTMX partial endpoints.
//!
//! A control change posts every control's current value plus the id of
//! the control that changed. The handler seeds a per-request dispatcher
//! with the unchanged values, applies the changed one, and returns one
//! out-of-band fragment per refreshed chart so HTMX can swap each into
//! its placeholder.

use askama::Template;
use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use spacedash_reactive::{BindingResult, Dispatcher};
use tracing::{debug, warn};

use crate::bindings::ControlForm;
use crate::pages::render;
use crate::views::*;
use crate::{ChartFigure, DashboardState};

// ── Chart Fragments ─────────────────────────────────────────────

#[derive(Template)]
#[template(path = "_partials/pie_chart.html")]
struct PieChartPartial<'a> {
    id: &'a str,
    pie: PieView,
    oob: bool,
}

#[derive(Template)]
#[template(path = "_partials/scatter_chart.html")]
struct ScatterChartPartial<'a> {
    id: &'a str,
    scatter: ScatterView,
    oob: bool,
}

/// Update status line under the controls. Empty on success, so a
/// successful update clears an earlier error.
#[derive(Template)]
#[template(path = "_partials/error.html")]
struct UpdateErrorPartial<'a> {
    message: &'a str,
}

/// Render one bound output as an HTML fragment whose element id is the
/// output id. `oob` marks it for an out-of-band swap.
pub fn render_output(id: &str, figure: &ChartFigure, oob: bool) -> String {
    let html = match figure {
        ChartFigure::Pie(p) => render(PieChartPartial {
            id,
            pie: PieView::from_proportion(p),
            oob,
        }),
        ChartFigure::Scatter(c) => render(ScatterChartPartial {
            id,
            scatter: ScatterView::from_correlation(c),
            oob,
        }),
    };
    html.0
}

// ── Control Change ──────────────────────────────────────────────

pub async fn control_changed(
    State(state): State<DashboardState>,
    form: Result<Form<ControlForm>, FormRejection>,
) -> impl IntoResponse {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(error = %rejection, "malformed control update");
            return error_fragment(&rejection.body_text()).into_response();
        }
    };

    match refreshed_charts(&state, &form) {
        Ok(fragments) => {
            debug!(trigger = %form.trigger, charts = fragments.len(), "charts refreshed");
            let mut body = fragments.concat();
            body.push_str(&render(UpdateErrorPartial { message: "" }).0);
            Html(body).into_response()
        }
        Err(e) => {
            warn!(trigger = %form.trigger, error = %e, "control update rejected");
            error_fragment(&e.to_string()).into_response()
        }
    }
}

fn error_fragment(message: &str) -> (StatusCode, Html<String>) {
    (
        StatusCode::BAD_REQUEST,
        render(UpdateErrorPartial { message }),
    )
}

fn refreshed_charts(state: &DashboardState, form: &ControlForm) -> BindingResult<Vec<String>> {
    let mut dispatcher = Dispatcher::new(state.bindings.clone(), state.context.clone());
    let mut changed = None;
    for (id, value) in form.values() {
        if id == form.trigger {
            changed = Some(value);
        } else {
            dispatcher.seed(id, value)?;
        }
    }
    let Some(value) = changed else {
        return Err(spacedash_reactive::BindingError::UnknownInput(
            form.trigger.clone(),
        ));
    };

    let refreshed = dispatcher.set_input(&form.trigger, value)?;
    Ok(refreshed
        .iter()
        .filter_map(|id| {
            dispatcher
                .output(id)
                .map(|figure| render_output(id, figure, true))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use spacedash_core::LayoutConfig;
    use spacedash_records::{LaunchRecord, RecordStore};

    use crate::AppContext;
    use crate::bindings::{PAYLOAD_SLIDER, PIE_CHART, SCATTER_CHART, SITE_DROPDOWN};

    fn state() -> DashboardState {
        let store = RecordStore::from_records(vec![
            LaunchRecord::new("KSC LC-39A", 5000.0, "v1", 1),
            LaunchRecord::new("KSC LC-39A", 3000.0, "v1", 0),
            LaunchRecord::new("CCAFS LC-40", 2000.0, "v2", 1),
        ])
        .unwrap();
        DashboardState::new(AppContext::new(store, LayoutConfig::default())).unwrap()
    }

    fn form(trigger: &str, site: &str, low: f64, high: f64) -> ControlForm {
        ControlForm {
            trigger: trigger.to_string(),
            site: site.to_string(),
            payload_low: low,
            payload_high: high,
        }
    }

    #[test]
    fn site_change_returns_both_fragments() {
        let fragments =
            refreshed_charts(&state(), &form(SITE_DROPDOWN, "KSC LC-39A", 0.0, 10000.0)).unwrap();
        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].contains(&format!(r#"id="{PIE_CHART}""#)));
        assert!(fragments[0].contains("KSC LC-39A Launch Success Rate"));
        assert!(fragments[1].contains(&format!(r#"id="{SCATTER_CHART}""#)));
        assert!(fragments.iter().all(|f| f.contains(r#"hx-swap-oob="true""#)));
    }

    #[test]
    fn slider_change_returns_scatter_only() {
        let fragments =
            refreshed_charts(&state(), &form(PAYLOAD_SLIDER, "ALL", 4000.0, 10000.0)).unwrap();
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].contains("ALL Scatter Plot Payload vs. Success"));
        assert_eq!(fragments[0].matches("<circle").count(), 1);
    }

    #[test]
    fn empty_selection_renders_empty_chart() {
        let fragments =
            refreshed_charts(&state(), &form(PAYLOAD_SLIDER, "ALL", 9000.0, 1000.0)).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].matches("<circle").count(), 0);
        assert!(fragments[0].contains("No launches in range"));
    }

    #[test]
    fn unknown_trigger_rejected() {
        let err = refreshed_charts(&state(), &form("colour", "ALL", 0.0, 1.0)).unwrap_err();
        assert_eq!(
            err,
            spacedash_reactive::BindingError::UnknownInput("colour".to_string())
        );
    }

    #[test]
    fn render_output_without_oob() {
        let state = state();
        let figure = ChartFigure::Pie(spacedash_records::success_proportion(
            &state.context.store,
            &spacedash_records::SiteSelection::All,
        ));
        let html = render_output(PIE_CHART, &figure, false);
        assert!(!html.contains("hx-swap-oob"));
        assert!(html.contains("Launch Site Success Rate"));
        assert!(html.contains("<path"));
    }

    #[test]
    fn error_partial_escapes_message() {
        let (status, html) = error_fragment(r#"<a href="x">&</a>"#);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(html.0.contains(r#"id="update-error""#));
        assert!(html.0.contains(r#"hx-swap-oob="true""#));
        assert!(html.0.contains("a href="));
        assert!(!html.0.contains("<a href"));
        assert!(!html.0.contains(r#""x""#));
    }

    #[tokio::test]
    async fn control_changed_bad_trigger_is_400() {
        let resp = control_changed(State(state()), Ok(Form(form("nope", "ALL", 0.0, 1.0))))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn shared_context_not_copied() {
        let state = state();
        let clone = state.clone();
        assert!(Arc::ptr_eq(&state.context, &clone.context));
    }
}

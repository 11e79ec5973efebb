//! Dashboard page handler.
//!
//! Renders the full layout: title, site dropdown, payload range control
//! and both charts. The charts come from a fresh dispatcher seeded with
//! the default control values, so the first paint matches what any later
//! update would produce for the same inputs. HTMX partials are in
//! `partials.rs`.

use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use spacedash_reactive::{BindingResult, Dispatcher};
use spacedash_records::ALL_SITES;
use tracing::warn;

use crate::DashboardState;
use crate::bindings::{self, PIE_CHART, SCATTER_CHART};
use crate::partials::render_output;
use crate::views::*;

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    title: String,
    site_options: Vec<SiteOption>,
    slider: SliderView,
    /// Pre-rendered chart fragments.
    pie_chart: String,
    scatter_chart: String,
    record_count: usize,
    loaded_display: String,
}

pub async fn index(State(state): State<DashboardState>) -> impl IntoResponse {
    let (pie_chart, scatter_chart) = match initial_charts(&state) {
        Ok(charts) => charts,
        Err(e) => {
            warn!(error = %e, "initial chart evaluation failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("<pre>Chart error: {e}</pre>")),
            )
                .into_response();
        }
    };

    let ctx = &state.context;
    render(DashboardTemplate {
        title: ctx.layout.title.clone(),
        site_options: site_options(ctx.store.sites(), ALL_SITES),
        slider: SliderView::new(&ctx.layout, bindings::initial_range(ctx)),
        pie_chart,
        scatter_chart,
        record_count: ctx.store.len(),
        loaded_display: format_timestamp(ctx.loaded_at),
    })
    .into_response()
}

fn initial_charts(state: &DashboardState) -> BindingResult<(String, String)> {
    let mut dispatcher = Dispatcher::new(state.bindings.clone(), state.context.clone());
    for (id, value) in bindings::initial_values(&state.context) {
        dispatcher.seed(id, value)?;
    }
    dispatcher.evaluate_all()?;

    let chart = |id: &str| {
        dispatcher
            .output(id)
            .map(|figure| render_output(id, figure, false))
            .unwrap_or_default()
    };
    Ok((chart(PIE_CHART), chart(SCATTER_CHART)))
}

pub(crate) fn render<T: Template>(tmpl: T) -> Html<String> {
    Html(tmpl.render().unwrap_or_else(|e| {
        format!("<pre>Template error: {e}</pre>")
    }))
}

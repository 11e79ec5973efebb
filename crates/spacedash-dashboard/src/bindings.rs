//! Chart bindings: which controls feed which chart.
//!
//! | Output | Inputs |
//! |---|---|
//! | `success-pie-chart` | `site-dropdown` |
//! | `success-payload-scatter-chart` | `site-dropdown`, `payload-slider` |

use serde::{Deserialize, Serialize};

use spacedash_reactive::{BindingError, BindingRegistry, BindingResult, ControlValue};
use spacedash_records::{
    Correlation, PayloadRange, Proportion, SiteSelection, payload_correlation, success_proportion,
};

use crate::AppContext;

pub const SITE_DROPDOWN: &str = "site-dropdown";
pub const PAYLOAD_SLIDER: &str = "payload-slider";
pub const PIE_CHART: &str = "success-pie-chart";
pub const SCATTER_CHART: &str = "success-payload-scatter-chart";

/// Result of one chart binding, ready for rendering or JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartFigure {
    Pie(Proportion),
    Scatter(Correlation),
}

/// Register the two chart bindings.
pub fn build_registry() -> BindingResult<BindingRegistry<AppContext, ChartFigure>> {
    let mut registry = BindingRegistry::new();
    registry.register(PIE_CHART, [SITE_DROPDOWN], pie_figure)?;
    registry.register(SCATTER_CHART, [SITE_DROPDOWN, PAYLOAD_SLIDER], scatter_figure)?;
    Ok(registry)
}

fn pie_figure(ctx: &AppContext, values: &[ControlValue]) -> BindingResult<ChartFigure> {
    let site = site_selection(input(values, 0, PIE_CHART, SITE_DROPDOWN)?)?;
    Ok(ChartFigure::Pie(success_proportion(&ctx.store, &site)))
}

fn scatter_figure(ctx: &AppContext, values: &[ControlValue]) -> BindingResult<ChartFigure> {
    let site = site_selection(input(values, 0, SCATTER_CHART, SITE_DROPDOWN)?)?;
    let range = payload_range(input(values, 1, SCATTER_CHART, PAYLOAD_SLIDER)?)?;
    Ok(ChartFigure::Scatter(payload_correlation(
        &ctx.store, &site, range,
    )))
}

fn input<'a>(
    values: &'a [ControlValue],
    idx: usize,
    output: &str,
    name: &str,
) -> BindingResult<&'a ControlValue> {
    values.get(idx).ok_or_else(|| BindingError::MissingInput {
        output: output.to_string(),
        input: name.to_string(),
    })
}

pub fn site_selection(value: &ControlValue) -> BindingResult<SiteSelection> {
    Ok(SiteSelection::from(value.as_text(SITE_DROPDOWN)?))
}

pub fn payload_range(value: &ControlValue) -> BindingResult<PayloadRange> {
    let (low, high) = value.as_range(PAYLOAD_SLIDER)?;
    Ok(PayloadRange::new(low, high))
}

/// Control values posted by the page on every change.
#[derive(Debug, Clone, Deserialize)]
pub struct ControlForm {
    /// Id of the control that changed.
    pub trigger: String,
    pub site: String,
    pub payload_low: f64,
    pub payload_high: f64,
}

impl ControlForm {
    /// Every control's value, keyed by control id.
    pub fn values(&self) -> [(&'static str, ControlValue); 2] {
        [
            (SITE_DROPDOWN, ControlValue::text(self.site.as_str())),
            (
                PAYLOAD_SLIDER,
                ControlValue::range(self.payload_low, self.payload_high),
            ),
        ]
    }
}

/// Payload range the slider starts at: the observed payload bounds, or
/// the slider's own bounds for a store without records.
pub fn initial_range(ctx: &AppContext) -> PayloadRange {
    ctx.store
        .payload_bounds()
        .map(PayloadRange::from)
        .unwrap_or_else(|| PayloadRange::new(ctx.layout.slider_min, ctx.layout.slider_max))
}

/// Default control values for the first render.
pub fn initial_values(ctx: &AppContext) -> [(&'static str, ControlValue); 2] {
    let range = initial_range(ctx);
    [
        (SITE_DROPDOWN, ControlValue::text(SiteSelection::All)),
        (PAYLOAD_SLIDER, ControlValue::range(range.low, range.high)),
    ]
}

//! View types for dashboard template rendering.
//!
//! These types are purpose-built for Askama templates: they carry
//! pre-formatted strings and precomputed SVG geometry so templates stay
//! simple.

use std::f64::consts::{FRAC_PI_2, TAU};

use spacedash_core::LayoutConfig;
use spacedash_records::{ALL_SITES, Correlation, PayloadRange, Proportion};

/// Categorical colour cycle shared by both charts.
pub const PALETTE: [&str; 10] = [
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
    "#ff97ff", "#fecb52",
];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

// ── Controls ────────────────────────────────────────────────────

pub struct SiteOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Dropdown options: "All Sites" first, then every site in data order.
pub fn site_options(sites: &[String], selected: &str) -> Vec<SiteOption> {
    std::iter::once(SiteOption {
        value: ALL_SITES.to_string(),
        label: "All Sites".to_string(),
        selected: selected == ALL_SITES,
    })
    .chain(sites.iter().map(|site| SiteOption {
        value: site.clone(),
        label: site.clone(),
        selected: selected == site,
    }))
    .collect()
}

pub struct SliderView {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub low: f64,
    pub high: f64,
    pub marks: Vec<String>,
}

impl SliderView {
    pub fn new(layout: &LayoutConfig, value: PayloadRange) -> Self {
        Self {
            min: layout.slider_min,
            max: layout.slider_max,
            step: layout.slider_step,
            low: value.low,
            high: value.high,
            marks: vec![
                format_mass(layout.slider_min),
                format_mass(layout.slider_max),
            ],
        }
    }
}

// ── Pie Chart ───────────────────────────────────────────────────

const PIE_CX: f64 = 160.0;
const PIE_CY: f64 = 160.0;
const PIE_R: f64 = 140.0;

pub struct PieSliceView {
    pub label: String,
    pub value: u64,
    pub percent_display: String,
    pub color: &'static str,
    /// SVG path; empty for zero-valued slices, which only show in the legend.
    pub path: String,
    pub has_path: bool,
}

pub struct PieView {
    pub title: String,
    pub slices: Vec<PieSliceView>,
    pub total: u64,
    pub is_empty: bool,
}

impl PieView {
    pub fn from_proportion(p: &Proportion) -> Self {
        let total = p.total();
        let mut cursor = 0.0_f64;

        let slices = p
            .slices
            .iter()
            .enumerate()
            .map(|(idx, s)| {
                let frac = if total > 0 {
                    s.value as f64 / total as f64
                } else {
                    0.0
                };
                let path = if frac <= 0.0 {
                    String::new()
                } else if frac >= 1.0 {
                    full_circle_path()
                } else {
                    wedge_path(cursor, cursor + frac)
                };
                cursor += frac;
                PieSliceView {
                    label: s.key.to_string(),
                    value: s.value,
                    percent_display: format!("{:.1}%", frac * 100.0),
                    color: palette_color(idx),
                    has_path: !path.is_empty(),
                    path,
                }
            })
            .collect();

        Self {
            title: p.title.clone(),
            slices,
            total,
            is_empty: total == 0,
        }
    }
}

fn pie_point(frac: f64) -> (f64, f64) {
    // Zero is twelve o'clock, increasing clockwise.
    let angle = frac * TAU - FRAC_PI_2;
    (PIE_CX + PIE_R * angle.cos(), PIE_CY + PIE_R * angle.sin())
}

fn wedge_path(start: f64, end: f64) -> String {
    let (x0, y0) = pie_point(start);
    let (x1, y1) = pie_point(end);
    let large_arc = if end - start > 0.5 { 1 } else { 0 };
    format!(
        "M {PIE_CX:.2} {PIE_CY:.2} L {x0:.2} {y0:.2} A {PIE_R:.2} {PIE_R:.2} 0 {large_arc} 1 {x1:.2} {y1:.2} Z"
    )
}

fn full_circle_path() -> String {
    let top = PIE_CY - PIE_R;
    let bottom = PIE_CY + PIE_R;
    format!(
        "M {PIE_CX:.2} {top:.2} A {PIE_R:.2} {PIE_R:.2} 0 1 1 {PIE_CX:.2} {bottom:.2} A {PIE_R:.2} {PIE_R:.2} 0 1 1 {PIE_CX:.2} {top:.2} Z"
    )
}

// ── Scatter Chart ───────────────────────────────────────────────

const PLOT_WIDTH: f64 = 720.0;
const PLOT_HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 40.0;
const X_TICKS: usize = 5;

pub struct ScatterPointView {
    pub cx: String,
    pub cy: String,
    pub color: &'static str,
    pub tooltip: String,
}

pub struct LegendEntry {
    pub label: String,
    pub color: &'static str,
}

pub struct AxisTick {
    pub pos: String,
    pub label: String,
}

pub struct ScatterView {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub points: Vec<ScatterPointView>,
    pub legend: Vec<LegendEntry>,
    pub x_ticks: Vec<AxisTick>,
    pub y_ticks: Vec<AxisTick>,
    /// Plot area edges, for axis lines and tick labels.
    pub plot_left: String,
    pub plot_right: String,
    pub plot_top: String,
    pub plot_bottom: String,
    pub point_count: usize,
    pub is_empty: bool,
}

impl ScatterView {
    pub fn from_correlation(c: &Correlation) -> Self {
        let (x_min, x_max) = x_domain(c);
        let left = MARGIN_LEFT;
        let right = PLOT_WIDTH - MARGIN_RIGHT;
        let top = MARGIN_TOP;
        let bottom = PLOT_HEIGHT - MARGIN_BOTTOM;

        let sx = |mass: f64| left + (mass - x_min) / (x_max - x_min) * (right - left);
        // Outcome classes sit at 0 and 1 inside a [-0.25, 1.25] band.
        let sy = |class: f64| bottom - (class + 0.25) / 1.5 * (bottom - top);

        // Categories are coloured in order of first appearance.
        let mut legend: Vec<LegendEntry> = Vec::new();
        let points = c
            .points
            .iter()
            .map(|p| {
                let idx = match legend
                    .iter()
                    .position(|l| l.label == p.booster_version_category)
                {
                    Some(idx) => idx,
                    None => {
                        legend.push(LegendEntry {
                            label: p.booster_version_category.clone(),
                            color: palette_color(legend.len()),
                        });
                        legend.len() - 1
                    }
                };
                ScatterPointView {
                    cx: format!("{:.1}", sx(p.payload_mass_kg)),
                    cy: format!("{:.1}", sy(f64::from(p.outcome_class))),
                    color: legend[idx].color,
                    tooltip: format!(
                        "{} kg, class {}, {}",
                        format_mass(p.payload_mass_kg),
                        p.outcome_class,
                        p.booster_version_category
                    ),
                }
            })
            .collect();

        let x_ticks = (0..X_TICKS)
            .map(|i| {
                let mass = x_min + (x_max - x_min) * i as f64 / (X_TICKS - 1) as f64;
                AxisTick {
                    pos: format!("{:.1}", sx(mass)),
                    label: format_mass(mass),
                }
            })
            .collect();

        let y_ticks = [0.0, 1.0]
            .into_iter()
            .map(|class| AxisTick {
                pos: format!("{:.1}", sy(class)),
                label: format!("{class:.0}"),
            })
            .collect();

        Self {
            title: c.title.clone(),
            width: PLOT_WIDTH,
            height: PLOT_HEIGHT,
            points,
            legend,
            x_ticks,
            y_ticks,
            plot_left: format!("{left:.1}"),
            plot_right: format!("{right:.1}"),
            plot_top: format!("{top:.1}"),
            plot_bottom: format!("{bottom:.1}"),
            point_count: c.points.len(),
            is_empty: c.points.is_empty(),
        }
    }
}

/// Padded payload domain of the plotted points.
fn x_domain(c: &Correlation) -> (f64, f64) {
    let (min, max) = c
        .points
        .iter()
        .map(|p| p.payload_mass_kg)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), m| {
            (lo.min(m), hi.max(m))
        });

    if !min.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if max > min { (max - min) * 0.05 } else { 500.0 };
    ((min - pad).max(0.0), max + pad)
}

// ── Format Helpers ──────────────────────────────────────────────

/// Payload mass without trailing decimals when whole.
pub fn format_mass(kg: f64) -> String {
    if kg.fract() == 0.0 {
        format!("{kg:.0}")
    } else {
        format!("{kg:.1}")
    }
}

pub fn format_timestamp(timestamp_secs: u64) -> String {
    chrono::DateTime::from_timestamp(timestamp_secs as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

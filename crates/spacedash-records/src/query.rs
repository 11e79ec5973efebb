//! Chart queries over the record store.
//!
//! Both queries are pure functions of (store, filter). Results are small
//! tables shaped for exactly one chart and carry the chart title.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::store::RecordStore;
use crate::types::{LaunchRecord, PayloadRange, SiteSelection};

// ── Success Proportion ─────────────────────────────────────────────

/// Category of a proportion slice: a launch site when every site is
/// selected, otherwise an outcome class.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum SliceKey {
    Site(String),
    Outcome(u8),
}

impl fmt::Display for SliceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Site(site) => f.write_str(site),
            Self::Outcome(class) => write!(f, "{class}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProportionSlice {
    pub key: SliceKey,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Proportion {
    pub title: String,
    pub slices: Vec<ProportionSlice>,
}

impl Proportion {
    pub fn total(&self) -> u64 {
        self.slices.iter().map(|s| s.value).sum()
    }
}

/// Success distribution for the pie chart.
///
/// For [`SiteSelection::All`], successes are summed per launch site (every
/// site appears, even with zero successes). For one site, that site's rows
/// are counted per outcome class. An unknown site yields no slices.
pub fn success_proportion(store: &RecordStore, selection: &SiteSelection) -> Proportion {
    let proportion = match selection {
        SiteSelection::All => {
            let mut per_site: BTreeMap<&str, u64> = BTreeMap::new();
            for record in store.records() {
                *per_site.entry(record.launch_site.as_str()).or_default() +=
                    u64::from(record.outcome_class);
            }
            Proportion {
                title: "Launch Site Success Rate".to_string(),
                slices: per_site
                    .into_iter()
                    .map(|(site, value)| ProportionSlice {
                        key: SliceKey::Site(site.to_string()),
                        value,
                    })
                    .collect(),
            }
        }
        SiteSelection::Site(site) => {
            let mut per_class: BTreeMap<u8, u64> = BTreeMap::new();
            for record in store.records().iter().filter(|r| &r.launch_site == site) {
                *per_class.entry(record.outcome_class).or_default() += 1;
            }
            Proportion {
                title: format!("{site} Launch Success Rate"),
                slices: per_class
                    .into_iter()
                    .map(|(class, value)| ProportionSlice {
                        key: SliceKey::Outcome(class),
                        value,
                    })
                    .collect(),
            }
        }
    };

    debug!(
        site = %selection,
        slices = proportion.slices.len(),
        total = proportion.total(),
        "success proportion computed"
    );
    proportion
}

// ── Payload Correlation ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPoint {
    pub payload_mass_kg: f64,
    pub outcome_class: u8,
    pub booster_version_category: String,
}

impl From<&LaunchRecord> for CorrelationPoint {
    fn from(record: &LaunchRecord) -> Self {
        Self {
            payload_mass_kg: record.payload_mass_kg,
            outcome_class: record.outcome_class,
            booster_version_category: record.booster_version_category.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    pub title: String,
    pub points: Vec<CorrelationPoint>,
}

/// Individual records inside `range` (inclusive), optionally narrowed to
/// one site, for the payload/outcome scatter chart. Points keep store
/// order. The title embeds the selection verbatim, so `ALL` shows up as
/// the literal sentinel.
pub fn payload_correlation(
    store: &RecordStore,
    selection: &SiteSelection,
    range: PayloadRange,
) -> Correlation {
    let points: Vec<CorrelationPoint> = store
        .records()
        .iter()
        .filter(|r| range.contains(r.payload_mass_kg))
        .filter(|r| selection.matches(&r.launch_site))
        .map(CorrelationPoint::from)
        .collect();

    debug!(
        site = %selection,
        low = range.low,
        high = range.high,
        points = points.len(),
        "payload correlation computed"
    );

    Correlation {
        title: format!("{selection} Scatter Plot Payload vs. Success"),
        points,
    }
}

//! Domain types for launch records and chart filters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire sentinel for "every launch site" in the site selector.
pub const ALL_SITES: &str = "ALL";

/// Outcome class of a successful launch.
pub const OUTCOME_SUCCESS: u8 = 1;

/// Outcome class of a failed launch.
pub const OUTCOME_FAILURE: u8 = 0;

// ── Launch Record ──────────────────────────────────────────────────

/// One row of the launch dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaunchRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<u32>,
    pub launch_site: String,
    /// Payload mass in kilograms, finite and non-negative.
    pub payload_mass_kg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booster_version: Option<String>,
    pub booster_version_category: String,
    /// 1 = success, 0 = failure.
    pub outcome_class: u8,
}

impl LaunchRecord {
    /// Build a record with only the columns the charts read.
    pub fn new(
        launch_site: impl Into<String>,
        payload_mass_kg: f64,
        booster_version_category: impl Into<String>,
        outcome_class: u8,
    ) -> Self {
        Self {
            flight_number: None,
            launch_site: launch_site.into(),
            payload_mass_kg,
            booster_version: None,
            booster_version_category: booster_version_category.into(),
            outcome_class,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome_class == OUTCOME_SUCCESS
    }
}

// ── Payload Bounds ─────────────────────────────────────────────────

/// Observed min/max payload mass, computed once at load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PayloadBounds {
    pub min: f64,
    pub max: f64,
}

// ── Site Selection ─────────────────────────────────────────────────

/// Site filter: every site, or exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    pub fn site(name: impl Into<String>) -> Self {
        Self::Site(name.into())
    }

    pub fn matches(&self, launch_site: &str) -> bool {
        match self {
            Self::All => true,
            Self::Site(site) => site == launch_site,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_SITES,
            Self::Site(site) => site,
        }
    }
}

impl From<&str> for SiteSelection {
    fn from(value: &str) -> Self {
        if value == ALL_SITES {
            Self::All
        } else {
            Self::Site(value.to_string())
        }
    }
}

impl From<String> for SiteSelection {
    fn from(value: String) -> Self {
        if value == ALL_SITES {
            Self::All
        } else {
            Self::Site(value)
        }
    }
}

impl From<SiteSelection> for String {
    fn from(value: SiteSelection) -> Self {
        match value {
            SiteSelection::All => ALL_SITES.to_string(),
            SiteSelection::Site(site) => site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Payload Range ──────────────────────────────────────────────────

/// Closed payload interval `[low, high]` in kilograms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Inclusive at both ends. An inverted range contains nothing.
    pub fn contains(&self, mass_kg: f64) -> bool {
        self.low <= mass_kg && mass_kg <= self.high
    }
}

impl From<PayloadBounds> for PayloadRange {
    fn from(bounds: PayloadBounds) -> Self {
        Self::new(bounds.min, bounds.max)
    }
}

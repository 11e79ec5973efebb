//! spacedash.toml configuration parser.
//!
//! Every field has a default, so an absent file (or an empty one) yields
//! the same dashboard the bare `spacedashd serve` command starts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Launch records CSV, loaded once at startup.
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("spacex_launch_dash.csv"),
        }
    }
}

/// Static page layout: title and payload slider bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub title: String,
    pub slider_min: f64,
    pub slider_max: f64,
    pub slider_step: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            title: "SpaceX Launch Records Dashboard".to_string(),
            slider_min: 0.0,
            slider_max: 10000.0,
            slider_step: 500.0,
        }
    }
}

impl DashConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DashConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject slider settings the range control cannot render.
    pub fn validate(&self) -> anyhow::Result<()> {
        let l = &self.layout;
        if !(l.slider_min < l.slider_max) {
            anyhow::bail!(
                "layout.slider_min ({}) must be below layout.slider_max ({})",
                l.slider_min,
                l.slider_max
            );
        }
        if !(l.slider_step > 0.0) {
            anyhow::bail!("layout.slider_step must be positive, got {}", l.slider_step);
        }
        Ok(())
    }
}

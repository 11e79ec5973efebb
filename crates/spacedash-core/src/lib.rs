pub mod config;

pub use config::{DashConfig, DataConfig, LayoutConfig, ServerConfig};

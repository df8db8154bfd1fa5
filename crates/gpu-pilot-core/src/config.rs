//! Runtime configuration from a gpu-pilot.toml file.

use serde::Deserialize;

use crate::error::{PilotError, Result};
use crate::rank::TradeoffMode;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PilotConfig {
    pub catalog: CatalogConfig,
    pub selection: SelectionConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog author/organization whose artifacts target this runtime.
    pub author: String,
    pub limit: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            author: "mlc-ai".into(),
            limit: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    pub mode: TradeoffMode,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            mode: TradeoffMode::Balanced,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Where `sync` fetches a refreshed gpu-database.json from.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "https://raw.githubusercontent.com/gpu-pilot/gpu-pilot/main/data/gpu-database.json"
                .into(),
        }
    }
}

/// Parse configuration from a TOML string. Missing keys take defaults.
pub fn parse_config(toml_str: &str) -> Result<PilotConfig> {
    toml::from_str(toml_str).map_err(|e| PilotError::Io(format!("bad gpu-pilot.toml: {e}")))
}

/// Load configuration from a file path.
#[cfg(feature = "network")]
pub fn load_config(path: &std::path::Path) -> Result<PilotConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PilotError::Io(e.to_string()))?;
    parse_config(&content)
}

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::MatchSettings;
use crate::risk::ExtractionLayout;

/// Modules offered when no catalog is active yet
pub const DEFAULT_MODULES: &[&str] = &[
    "TOTVS Educacional",
    "TOTVS Folha de Pagamento",
    "TOTVS Gestão Contábil",
    "TOTVS Gestão de Estoque, Compras e Faturamento",
    "TOTVS Gestão de Pessoas",
    "TOTVS Gestão Financeira",
    "TOTVS Gestão Fiscal",
    "TOTVS Gestão Patrimonial",
    "TOTVS Inteligência de Negócios",
];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Storage
    pub database_path: String,
    pub output_dir: String,

    // Matching
    pub fuzzy_cutoff: f64,
    pub alert_ratio: f64,
    pub alert_min_sample: usize,

    // Risk extraction
    #[serde(default)]
    pub layout: ExtractionLayout,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = MatchSettings::default();
        Self {
            database_path: data_dir().join("catalog.db").to_string_lossy().to_string(),
            output_dir: data_dir().join("outputs").to_string_lossy().to_string(),
            fuzzy_cutoff: defaults.fuzzy_cutoff,
            alert_ratio: defaults.alert_ratio,
            alert_min_sample: defaults.alert_min_sample,
            layout: ExtractionLayout::default(),
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Load config from file, or fall back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                // Graceful degradation: log warning and use defaults
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                // Backup corrupt file for debugging
                let backup_path = config_path.with_extension("json.corrupt");
                let _ = std::fs::rename(config_path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            fuzzy_cutoff: self.fuzzy_cutoff,
            alert_ratio: self.alert_ratio,
            alert_min_sample: self.alert_min_sample,
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("accessrecon")
        .join("config.json")
}

pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("accessrecon")
}

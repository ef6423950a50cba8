use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stores user-configurable preferences for the metrics CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display code printed next to amounts. No conversion is performed.
    pub currency: String,
    pub color_output: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    /// Metrics reported when none are requested explicitly. Empty means all.
    pub default_metrics: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// `tracing` filter directive, e.g. `tally=debug`.
    pub log_filter: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for ledgers. Defaults to `~/Documents/Tally/ledgers`.
    pub ledger_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            color_output: Self::default_color_output(),
            default_metrics: Vec::new(),
            log_filter: None,
            ledger_root: None,
        }
    }
}

impl Config {
    pub fn default_color_output() -> bool {
        true
    }

    pub fn resolve_ledger_root(&self) -> PathBuf {
        if let Some(path) = &self.ledger_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("Tally").join("ledgers")
    }
}

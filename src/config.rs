//! User settings persisted as JSON.
//!
//! Looked up in `$PRESSURE_ANALYZER_CONFIG`, then `pressure-analyzer.json`
//! in the working directory. A missing file means defaults; fields left out
//! of the file also take their defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::metrics::MetricsOptions;
use crate::data::model::Schema;
use crate::export::OverwritePolicy;

pub const CONFIG_ENV_VAR: &str = "PRESSURE_ANALYZER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "pressure-analyzer.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Column holding timestamps or elapsed time.
    pub time_column: String,
    /// Column holding the pressure channel under analysis.
    pub pressure_column: String,
    /// Unit suffix shown after pressure values.
    pub pressure_unit: String,
    /// Directory the save toggles write into.
    pub output_dir: PathBuf,
    pub original_data_file: String,
    pub analysis_results_file: String,
    pub overwrite: OverwritePolicy,
    pub metrics: MetricsOptions,
}

impl Default for Settings {
    fn default() -> Self {
        let schema = Schema::default();
        Self {
            time_column: schema.time_column,
            pressure_column: schema.pressure_column,
            pressure_unit: "Pa".to_string(),
            output_dir: PathBuf::from("."),
            original_data_file: "original_data.csv".to_string(),
            analysis_results_file: "analysis_results.csv".to_string(),
            overwrite: OverwritePolicy::Allow,
            metrics: MetricsOptions::default(),
        }
    }
}

impl Settings {
    /// Path the settings are read from and saved to.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Read settings from `path`; defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("serializing settings")?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Saved settings to {}", path.display());
        Ok(())
    }

    pub fn schema(&self) -> Schema {
        Schema {
            time_column: self.time_column.clone(),
            pressure_column: self.pressure_column.clone(),
        }
    }

    pub fn original_data_path(&self) -> PathBuf {
        self.output_dir.join(&self.original_data_file)
    }

    pub fn analysis_results_path(&self) -> PathBuf {
        self.output_dir.join(&self.analysis_results_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::metrics::FallScan;

    #[test]
    fn defaults_match_original_file_names() {
        let s = Settings::default();
        assert_eq!(s.original_data_path(), PathBuf::from("./original_data.csv"));
        assert_eq!(s.analysis_results_path(), PathBuf::from("./analysis_results.csv"));
        assert_eq!(s.schema(), Schema::default());
        assert_eq!(s.overwrite, OverwritePolicy::Allow);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(
            &path,
            r#"{ "pressure_unit": "bar", "overwrite": "Version", "metrics": { "fall_scan": "AfterPeak" } }"#,
        )
        .unwrap();
        let s = Settings::load(&path).unwrap();
        assert_eq!(s.pressure_unit, "bar");
        assert_eq!(s.overwrite, OverwritePolicy::Version);
        assert_eq!(s.metrics.fall_scan, FallScan::AfterPeak);
        assert_eq!(s.metrics.rise_fraction, 0.9);
        assert_eq!(s.pressure_column, "P2");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{ "pressure_colum": "P3" }"#).unwrap();
        let err = Settings::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("unknown field"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        let mut s = Settings::default();
        s.output_dir = dir.path().to_path_buf();
        s.overwrite = OverwritePolicy::Deny;
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), s);
    }
}

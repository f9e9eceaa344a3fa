//! Configuration for npu-probe

use anyhow::{Context, Result};
use npu_gate::GateConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Version tables and SoC list
    #[serde(default)]
    pub gate: GateConfig,

    /// Where properties come from
    #[serde(default)]
    pub properties: PropertiesConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Property source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertiesConfig {
    /// Query the platform property service
    #[serde(default = "default_true")]
    pub system: bool,

    /// `build.prop`-style dump consulted before the property service
    #[serde(default)]
    pub dump: Option<PathBuf>,

    /// Fixed values that shadow every other source
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

impl Default for PropertiesConfig {
    fn default() -> Self {
        Self {
            system: true,
            dump: None,
            overrides: BTreeMap::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (e.g. "warn", "npu_gate=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl ProbeConfig {
    /// Load configuration from file, falling back to defaults if it is missing
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config: Self = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use npu_gate::VersionTuple;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProbeConfig::load(&dir.path().join("npu-probe.yaml")).unwrap();

        assert!(config.properties.system);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.gate, GateConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
gate:
  boards:
    TAS: "11.0.0.150"
properties:
  system: false
  overrides:
    ro.product.board: TAS
"#
        )
        .unwrap();

        let config = ProbeConfig::load(file.path()).unwrap();
        assert!(!config.properties.system);
        assert_eq!(
            config.properties.overrides.get("ro.product.board").map(String::as_str),
            Some("TAS")
        );
        assert_eq!(
            config.gate.boards.minimum("TAS"),
            Some(&VersionTuple::new(11, 0, 0, 150))
        );
        assert!(!config.gate.boards.contains("LIO"));
        assert_eq!(config.gate.driver_rules.len(), 5);
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "gate: [not, a, map]").unwrap();

        assert!(ProbeConfig::load(file.path()).is_err());
    }
}

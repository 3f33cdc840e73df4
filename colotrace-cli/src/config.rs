// Copyright 2025 Colotrace Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! `colotrace.toml` loading

use anyhow::{Context, Result};
use colotrace_core::BuildConfig;
use colotrace_query::ReportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "colotrace.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Observation table (CSV, one row per patient/ARG/MGE)
    #[serde(default = "default_data_path")]
    pub data: PathBuf,

    /// Entity registry (JSON)
    #[serde(default = "default_registry_path")]
    pub registry: PathBuf,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/colocalizations.csv")
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("data/registry.json")
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data: default_data_path(),
            registry: default_registry_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report directory, created on demand
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Also write JSON documents next to the CSV reports
    #[serde(default)]
    pub json: bool,

    #[serde(flatten)]
    pub report: ReportConfig,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            json: false,
            report: ReportConfig::default(),
        }
    }
}

impl CliConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Load with priority: env > file > defaults
    ///
    /// Supported environment variables:
    /// - COLOTRACE_DATA: observation table path
    /// - COLOTRACE_REGISTRY: registry path
    /// - COLOTRACE_OUTPUT_DIR: report directory
    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::from_file(path)?;
        tracing::debug!(path = %path.display(), "Configuration loaded");
        Ok(config.merge_with_env())
    }

    fn merge_with_env(mut self) -> Self {
        if let Ok(data) = std::env::var("COLOTRACE_DATA") {
            self.input.data = PathBuf::from(data);
        }
        if let Ok(registry) = std::env::var("COLOTRACE_REGISTRY") {
            self.input.registry = PathBuf::from(registry);
        }
        if let Ok(dir) = std::env::var("COLOTRACE_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(dir);
        }
        self
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_round_trips_through_toml() {
        let config = CliConfig::default();
        let text = config.to_toml().unwrap();
        let back: CliConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_file_takes_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[input]\ndata = \"cohort.csv\"\n\n[build]\nexclude_metals = true\n\n[output]\ntop_n = 25"
        )
        .unwrap();

        let config = CliConfig::from_file(file.path()).unwrap();
        assert_eq!(config.input.data, PathBuf::from("cohort.csv"));
        assert_eq!(config.input.registry, default_registry_path());
        assert!(config.build.exclude_metals);
        assert!(config.build.exclude_snp_confirmation_args);
        assert_eq!(config.output.report.top_n, 25);
        assert!(config.output.report.detailed_scenarios);
        assert!(!config.output.json);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}

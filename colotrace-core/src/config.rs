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

//! Configuration for graph construction
//!
//! Passed explicitly into [`GraphBuilder::new`](crate::builder::GraphBuilder::new);
//! there is no process-wide configuration.

use serde::{Deserialize, Serialize};

/// Resistance class kept when metal/biocide resistance is excluded
pub const DRUG_RESISTANCE_CLASS: &str = "Drugs";

/// Which observations the builder admits into the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Drop ARGs whose resistance is only conferred by a point mutation.
    /// Their presence cannot be confirmed from colocalization reads alone.
    pub exclude_snp_confirmation_args: bool,

    /// Keep only ARGs whose resistance class is [`DRUG_RESISTANCE_CLASS`]
    pub exclude_metals: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            exclude_snp_confirmation_args: true,
            exclude_metals: false,
        }
    }
}

impl BuildConfig {
    /// Admit every observation that resolves
    pub fn permissive() -> Self {
        Self {
            exclude_snp_confirmation_args: false,
            exclude_metals: false,
        }
    }

    /// Antibiotic resistance only: no SNP-confirmation ARGs, no metal/biocide genes
    pub fn drugs_only() -> Self {
        Self {
            exclude_snp_confirmation_args: true,
            exclude_metals: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BuildConfig::default();
        assert!(config.exclude_snp_confirmation_args);
        assert!(!config.exclude_metals);
    }

    #[test]
    fn test_presets() {
        let config = BuildConfig::permissive();
        assert!(!config.exclude_snp_confirmation_args);
        assert!(!config.exclude_metals);

        let config = BuildConfig::drugs_only();
        assert!(config.exclude_snp_confirmation_args);
        assert!(config.exclude_metals);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: BuildConfig = serde_json::from_str(r#"{"exclude_metals": true}"#).unwrap();
        assert!(config.exclude_snp_confirmation_args);
        assert!(config.exclude_metals);
    }
}

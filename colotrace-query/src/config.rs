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

//! Report configuration

use serde::{Deserialize, Serialize};

/// Number of rows the top-N reports keep by default
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Rows kept by the top-N rankings; `0` keeps every row
    pub top_n: usize,
    /// Emit the per-patient scenario listings alongside the pair counts
    pub detailed_scenarios: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            detailed_scenarios: true,
        }
    }
}

impl ReportConfig {
    /// Pair counts and rankings only, nothing truncated
    pub fn summary() -> Self {
        Self {
            top_n: 0,
            detailed_scenarios: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.top_n, DEFAULT_TOP_N);
        assert!(config.detailed_scenarios);
    }

    #[test]
    fn test_summary_preset() {
        let config = ReportConfig::summary();
        assert_eq!(config.top_n, 0);
        assert!(!config.detailed_scenarios);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: ReportConfig = serde_json::from_str(r#"{"top_n": 25}"#).unwrap();
        assert_eq!(config.top_n, 25);
        assert!(config.detailed_scenarios);
    }
}

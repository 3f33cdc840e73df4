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

//! Colotrace command-line support: configuration, table input, the
//! analysis pipeline and report output.

pub mod config;
pub mod input;
pub mod pipeline;
pub mod report;

pub use config::{CliConfig, InputConfig, OutputConfig, DEFAULT_CONFIG_PATH};
pub use input::{parse_observations, read_observations, ObservationTable, ReadStats};
pub use pipeline::{build_graph, load_registry, run_analysis, AnalysisSummary, BuiltGraph};
pub use report::{detailed_path, sanitize_file_stem, write_csv, write_json, ReportWriter};

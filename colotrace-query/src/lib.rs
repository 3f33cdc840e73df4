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

//! Colotrace Query
//!
//! Analyses over a built colocalization graph and its traversal timelines:
//! presence classification into temporal dynamics, frequency rankings and
//! grouped counts for reporting.

pub mod aggregation;
pub mod classify;
pub mod config;
pub mod ranking;

pub use aggregation::{
    all_disease_dynamics_counts, disease_dynamics_counts, disease_status_counts,
    mge_group_dynamics_counts, DiseaseDynamicsKey, DiseaseStatusCounts, DynamicsCounts,
    GraphStatistics, GroupDynamicsKey, UNKNOWN_GROUP,
};
pub use classify::{
    classify, dynamics_report, filter_by_scenario, pair_patients_by_criteria, patients_by_pair,
    PresenceFlags, Scenario, ScenarioSlice, TemporalDynamics,
};
pub use config::{ReportConfig, DEFAULT_TOP_N};
pub use ranking::{
    scenario_pair_rankings, top_k_entities, top_pairs_by_frequency,
    top_pairs_by_frequency_without_donor, top_pairs_by_unique_patients, PairDiseaseBreakdown,
    PairFrequencyReport, PairPatients, Ranked, ScenarioPairs, UNKNOWN_DISEASE,
};

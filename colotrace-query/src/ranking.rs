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

//! Frequency rankings
//!
//! All rankings sort by descending count and break ties by ascending key,
//! so output is stable across runs. A limit of `0` returns every entry.

use crate::classify::{pair_patients_by_criteria, Scenario};
use colotrace_core::{EntityId, EntityKind, Graph, PatientId, Timepoint};
use colotrace_index::{IndividualTimeline, PairKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Disease label used when a patient has no recorded disease
pub const UNKNOWN_DISEASE: &str = "Unknown";

/// A ranked key and its count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranked<K> {
    pub key: K,
    pub count: usize,
}

/// Sort counts (already in key order) by descending count, then truncate
fn rank<K: Ord>(counts: BTreeMap<K, usize>, limit: usize) -> Vec<Ranked<K>> {
    let mut ranked: Vec<Ranked<K>> = counts
        .into_iter()
        .map(|(key, count)| Ranked { key, count })
        .collect();
    // Stable: equal counts keep ascending key order
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    if limit > 0 {
        ranked.truncate(limit);
    }
    ranked
}

/// Most frequent ARGs or MGEs across colocalizations
///
/// Each colocalization edge adds one count per patient to its endpoint of the
/// requested kind. Donor-sample edges are ignored.
pub fn top_k_entities(graph: &Graph, kind: EntityKind, k: usize) -> Vec<Ranked<EntityId>> {
    let mut counts: BTreeMap<EntityId, usize> = BTreeMap::new();
    for edge in graph.colocalization_edges() {
        let Some(node) = edge.endpoint_of_kind(kind.is_arg()) else {
            continue;
        };
        if node.timepoint == Timepoint::Donor {
            continue;
        }
        *counts.entry(node.entity_id).or_default() += edge.individuals.len();
    }
    rank(counts, k)
}

/// Pairs ranked by how many patients carry them
pub fn top_pairs_by_frequency(timeline: &IndividualTimeline, n: usize) -> Vec<Ranked<PairKey>> {
    let mut counts: BTreeMap<PairKey, usize> = BTreeMap::new();
    for key in timeline.keys() {
        *counts.entry(key.pair()).or_default() += 1;
    }
    rank(counts, n)
}

/// One row of the donor-excluded pair ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairDiseaseBreakdown {
    pub pair: PairKey,
    pub total: usize,
    /// Count per disease; diseases with no patients for this pair are absent
    pub by_disease: BTreeMap<String, usize>,
}

impl PairDiseaseBreakdown {
    pub fn count_for(&self, disease: &str) -> usize {
        self.by_disease.get(disease).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairFrequencyReport {
    /// Every disease seen among counted entries, sorted (report column order)
    pub diseases: Vec<String>,
    pub rows: Vec<PairDiseaseBreakdown>,
}

/// Pair ranking that ignores donor-only entries, broken down by disease
pub fn top_pairs_by_frequency_without_donor(
    timeline: &IndividualTimeline,
    n: usize,
    diseases: &BTreeMap<PatientId, String>,
) -> PairFrequencyReport {
    let mut counts: BTreeMap<PairKey, usize> = BTreeMap::new();
    let mut by_disease: BTreeMap<PairKey, BTreeMap<String, usize>> = BTreeMap::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    for (key, tps) in timeline {
        if tps.iter().all(|tp| *tp == Timepoint::Donor) {
            continue;
        }
        let disease = diseases
            .get(&key.patient_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_DISEASE);

        *counts.entry(key.pair()).or_default() += 1;
        *by_disease
            .entry(key.pair())
            .or_default()
            .entry(disease.to_string())
            .or_default() += 1;
        seen.insert(disease.to_string());
    }

    let rows = rank(counts, n)
        .into_iter()
        .map(|ranked| PairDiseaseBreakdown {
            pair: ranked.key,
            total: ranked.count,
            by_disease: by_disease.remove(&ranked.key).unwrap_or_default(),
        })
        .collect();

    PairFrequencyReport {
        diseases: seen.into_iter().collect(),
        rows,
    }
}

/// Pairs ranked by distinct patient count
pub fn top_pairs_by_unique_patients(
    pair_patients: &BTreeMap<PairKey, BTreeSet<PatientId>>,
    n: usize,
) -> Vec<Ranked<PairKey>> {
    let counts = pair_patients
        .iter()
        .map(|(pair, patients)| (*pair, patients.len()))
        .collect();
    rank(counts, n)
}

/// A pair and the distinct patients carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairPatients {
    pub pair: PairKey,
    pub patients: BTreeSet<PatientId>,
}

/// Pair-to-patients map and unique-patient ranking for one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioPairs {
    pub scenario: Scenario,
    pub pairs: Vec<PairPatients>,
    pub top: Vec<Ranked<PairKey>>,
}

/// [`pair_patients_by_criteria`] and [`top_pairs_by_unique_patients`] for
/// every named scenario, in report order
pub fn scenario_pair_rankings(timeline: &IndividualTimeline, n: usize) -> Vec<ScenarioPairs> {
    Scenario::all()
        .into_iter()
        .map(|scenario| {
            let pair_patients = pair_patients_by_criteria(timeline, scenario.flags);
            let top = top_pairs_by_unique_patients(&pair_patients, n);
            tracing::debug!(
                scenario = scenario.label,
                pairs = pair_patients.len(),
                "Scenario pairs ranked"
            );
            ScenarioPairs {
                scenario,
                pairs: pair_patients
                    .into_iter()
                    .map(|(pair, patients)| PairPatients { pair, patients })
                    .collect(),
                top,
            }
        })
        .collect()
}

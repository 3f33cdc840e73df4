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

//! Grouped dynamics counts and graph statistics

use crate::classify::{classify, PresenceFlags, TemporalDynamics};
use crate::ranking::UNKNOWN_DISEASE;
use colotrace_core::{post_bin_of, EntityId, EntityRegistry, Graph, PatientId, PostBin};
use colotrace_index::{AdjacencyIndex, IndividualTimeline, PairKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Group label for MGEs the registry does not place in a group
pub const UNKNOWN_GROUP: &str = "Unknown";

/// `(ARG, MGE, donor, pre, post bin)` for the per-disease report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiseaseDynamicsKey {
    pub arg_id: EntityId,
    pub mge_id: EntityId,
    pub donor: bool,
    pub pre: bool,
    /// Highest post-treatment bin reached; `None` when never seen post-treatment
    pub post_bin: Option<PostBin>,
}

impl DiseaseDynamicsKey {
    /// Report column value: 0 (no post) to 3
    pub fn post_column(&self) -> u8 {
        self.post_bin.map(PostBin::index).unwrap_or(0)
    }
}

/// `(ARG, MGE, donor, pre, post)` for the per-group report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupDynamicsKey {
    pub arg_id: EntityId,
    pub mge_id: EntityId,
    pub flags: PresenceFlags,
}

pub type DynamicsCounts<K> = BTreeMap<K, usize>;

/// Patient counts per dynamics key, restricted to patients with `disease`
pub fn disease_dynamics_counts(
    timeline: &IndividualTimeline,
    diseases: &BTreeMap<PatientId, String>,
    disease: &str,
) -> DynamicsCounts<DiseaseDynamicsKey> {
    let mut counts = DynamicsCounts::new();
    for (key, tps) in timeline {
        if diseases.get(&key.patient_id).map(String::as_str) != Some(disease) {
            continue;
        }
        let flags = PresenceFlags::from_timepoints(tps);
        let dynamics_key = DiseaseDynamicsKey {
            arg_id: key.arg_id,
            mge_id: key.mge_id,
            donor: flags.donor,
            pre: flags.pre,
            post_bin: post_bin_of(tps),
        };
        *counts.entry(dynamics_key).or_default() += 1;
    }
    counts
}

/// [`disease_dynamics_counts`] for every disease in the patient map
pub fn all_disease_dynamics_counts(
    timeline: &IndividualTimeline,
    diseases: &BTreeMap<PatientId, String>,
) -> BTreeMap<String, DynamicsCounts<DiseaseDynamicsKey>> {
    let labels: BTreeSet<&String> = diseases.values().collect();
    labels
        .into_iter()
        .map(|disease| {
            (
                disease.clone(),
                disease_dynamics_counts(timeline, diseases, disease),
            )
        })
        .collect()
}

/// Patients per pair and category, keyed by disease
pub type DiseaseStatusCounts = BTreeMap<String, BTreeMap<PairKey, BTreeMap<TemporalDynamics, usize>>>;

/// Patient counts per pair and temporal-dynamics category, grouped by disease
///
/// Entries outside the four categories are left out. Patients with no
/// recorded disease count under [`UNKNOWN_DISEASE`].
pub fn disease_status_counts(
    timeline: &IndividualTimeline,
    diseases: &BTreeMap<PatientId, String>,
) -> DiseaseStatusCounts {
    let mut counts = DiseaseStatusCounts::new();
    for (key, tps) in timeline {
        let Some(status) = classify(PresenceFlags::from_timepoints(tps)) else {
            continue;
        };
        let disease = diseases
            .get(&key.patient_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_DISEASE);
        *counts
            .entry(disease.to_string())
            .or_default()
            .entry(key.pair())
            .or_default()
            .entry(status)
            .or_default() += 1;
    }
    counts
}

/// Patient counts per dynamics key, grouped by the MGE's registry group
pub fn mge_group_dynamics_counts<R>(
    timeline: &IndividualTimeline,
    registry: &R,
) -> BTreeMap<String, DynamicsCounts<GroupDynamicsKey>>
where
    R: EntityRegistry + ?Sized,
{
    let mut groups: BTreeMap<String, DynamicsCounts<GroupDynamicsKey>> = BTreeMap::new();
    for (key, tps) in timeline {
        let group = registry.mge_group(key.mge_id).unwrap_or(UNKNOWN_GROUP);
        let dynamics_key = GroupDynamicsKey {
            arg_id: key.arg_id,
            mge_id: key.mge_id,
            flags: PresenceFlags::from_timepoints(tps),
        };
        *groups
            .entry(group.to_string())
            .or_default()
            .entry(dynamics_key)
            .or_default() += 1;
    }
    groups
}

/// Node and edge counts of a built graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub args: usize,
    pub mges: usize,
    pub colocalization_edges: usize,
    pub temporal_edges: usize,
    /// Nodes with at least one outgoing adjacency link
    pub adjacency_nodes: usize,
}

impl GraphStatistics {
    pub fn compute(graph: &Graph, adjacency: &AdjacencyIndex) -> Self {
        let total_nodes = graph.node_count();
        let args = graph.nodes().iter().filter(|n| n.is_arg).count();
        let colocalization_edges = graph.colocalization_edges().count();
        Self {
            total_nodes,
            total_edges: graph.edge_count(),
            args,
            mges: total_nodes - args,
            colocalization_edges,
            temporal_edges: graph.edge_count() - colocalization_edges,
            adjacency_nodes: adjacency.len(),
        }
    }
}

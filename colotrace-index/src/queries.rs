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

//! Per-entity views of the colocalization edges

use colotrace_core::{Edge, EntityId, EntityKind, Graph, Timepoint};
use std::collections::{BTreeMap, BTreeSet};

/// The partner endpoint when `edge` touches entity `(kind, id)`
fn partner(edge: &Edge, kind: EntityKind, id: EntityId) -> Option<EntityId> {
    let is_arg = kind.is_arg();
    if edge.source.is_arg == is_arg && edge.source.entity_id == id {
        Some(edge.target.entity_id)
    } else if edge.target.is_arg == is_arg && edge.target.entity_id == id {
        Some(edge.source.entity_id)
    } else {
        None
    }
}

fn timeline_for(graph: &Graph, kind: EntityKind, id: EntityId) -> BTreeMap<EntityId, BTreeSet<Timepoint>> {
    let mut timeline: BTreeMap<EntityId, BTreeSet<Timepoint>> = BTreeMap::new();
    for edge in graph.colocalization_edges() {
        if let Some(other) = partner(edge, kind, id) {
            timeline.entry(other).or_default().insert(edge.source.timepoint);
        }
    }
    timeline
}

/// MGEs colocalized with `arg_id`, and the timepoints of each
pub fn timeline_for_arg(graph: &Graph, arg_id: EntityId) -> BTreeMap<EntityId, BTreeSet<Timepoint>> {
    timeline_for(graph, EntityKind::Arg, arg_id)
}

/// ARGs colocalized with `mge_id`, and the timepoints of each
pub fn timeline_for_mge(graph: &Graph, mge_id: EntityId) -> BTreeMap<EntityId, BTreeSet<Timepoint>> {
    timeline_for(graph, EntityKind::Mge, mge_id)
}

/// Colocalization edges touching the entity, per timepoint
pub fn node_degree_over_time(graph: &Graph, kind: EntityKind, id: EntityId) -> BTreeMap<Timepoint, usize> {
    let mut degree: BTreeMap<Timepoint, usize> = BTreeMap::new();
    for edge in graph.colocalization_edges() {
        if partner(edge, kind, id).is_some() {
            *degree.entry(edge.source.timepoint).or_default() += 1;
        }
    }
    degree
}

/// Every MGE the ARG was ever colocalized with
pub fn connected_mges(graph: &Graph, arg_id: EntityId) -> BTreeSet<EntityId> {
    graph
        .colocalization_edges()
        .filter_map(|e| partner(e, EntityKind::Arg, arg_id))
        .collect()
}

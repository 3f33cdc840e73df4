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

//! Subgraph extraction
//!
//! Entity filters pick colocalization edges by predicate, then pull in the
//! temporal edges whose endpoints were both picked. The timepoint and disease
//! filters test every edge directly.
//!
//! An empty result is logged and returned as an empty graph; it is not an error.

use crate::edge::Edge;
use crate::graph::Graph;
use crate::node::{EntityId, Node, PatientId};
use crate::registry::EntityRegistry;
use crate::timepoint::TimepointCategory;
use std::collections::{BTreeMap, BTreeSet, HashSet};

fn select_colocalizations<F>(graph: &Graph, keep: F) -> Graph
where
    F: Fn(&Edge) -> bool,
{
    let mut subgraph = Graph::new();
    let mut relevant: HashSet<Node> = HashSet::new();

    for edge in graph.colocalization_edges().filter(|e| keep(e)) {
        relevant.insert(edge.source);
        relevant.insert(edge.target);
        subgraph.insert_edge(edge.clone());
    }

    for edge in graph.temporal_edges() {
        if relevant.contains(&edge.source) && relevant.contains(&edge.target) {
            subgraph.insert_edge(edge.clone());
        }
    }

    for node in relevant {
        subgraph.insert_node(node);
    }
    subgraph
}

fn has_endpoint(edge: &Edge, is_arg: bool, id: EntityId) -> bool {
    (edge.source.is_arg == is_arg && edge.source.entity_id == id)
        || (edge.target.is_arg == is_arg && edge.target.entity_id == id)
}

/// Colocalizations involving one ARG, plus their temporal links
pub fn filter_by_arg(graph: &Graph, arg_id: EntityId) -> Graph {
    let subgraph = select_colocalizations(graph, |e| has_endpoint(e, true, arg_id));
    if subgraph.is_empty() {
        tracing::warn!(arg_id, "No colocalizations found for ARG");
    }
    subgraph
}

/// Colocalizations involving one MGE, plus their temporal links
pub fn filter_by_mge(graph: &Graph, mge_id: EntityId) -> Graph {
    let subgraph = select_colocalizations(graph, |e| has_endpoint(e, false, mge_id));
    if subgraph.is_empty() {
        tracing::warn!(mge_id, "No colocalizations found for MGE");
    }
    subgraph
}

/// Colocalizations of exactly this ARG–MGE pair
pub fn filter_by_arg_and_mge(graph: &Graph, arg_id: EntityId, mge_id: EntityId) -> Graph {
    let subgraph = select_colocalizations(graph, |e| {
        has_endpoint(e, true, arg_id) && has_endpoint(e, false, mge_id)
    });
    if subgraph.is_empty() {
        tracing::warn!(arg_id, mge_id, "No colocalizations found for ARG-MGE pair");
    }
    subgraph
}

/// Colocalizations involving any MGE of `group`
pub fn filter_by_mge_group<R>(graph: &Graph, registry: &R, group: &str) -> Graph
where
    R: EntityRegistry + ?Sized,
{
    let in_group = |node: &Node| !node.is_arg && registry.mge_group(node.entity_id) == Some(group);
    let subgraph = select_colocalizations(graph, |e| in_group(&e.source) || in_group(&e.target));
    if subgraph.is_empty() {
        tracing::warn!(group, "No colocalizations found for MGE group");
    }
    subgraph
}

/// Edges whose endpoints both fall in `category`
pub fn filter_by_timepoint(graph: &Graph, category: TimepointCategory) -> Graph {
    let mut subgraph = Graph::new();
    for edge in graph.edges() {
        if category.matches(edge.source.timepoint) && category.matches(edge.target.timepoint) {
            subgraph.insert_node(edge.source);
            subgraph.insert_node(edge.target);
            subgraph.insert_edge(edge.clone());
        }
    }
    if subgraph.is_empty() {
        tracing::warn!(?category, "No nodes found for timepoint category");
    }
    subgraph
}

/// Nodes touched by any patient with `disease`, and every edge among them
pub fn filter_by_disease(
    graph: &Graph,
    diseases: &BTreeMap<PatientId, String>,
    disease: &str,
) -> Graph {
    let patients: BTreeSet<PatientId> = diseases
        .iter()
        .filter(|(_, d)| d.as_str() == disease)
        .map(|(&p, _)| p)
        .collect();
    if patients.is_empty() {
        tracing::warn!(disease, "No patients found for disease");
        return Graph::new();
    }

    let mut relevant: HashSet<Node> = HashSet::new();
    for edge in graph.colocalization_edges() {
        if edge.individuals.iter().any(|p| patients.contains(p)) {
            relevant.insert(edge.source);
            relevant.insert(edge.target);
        }
    }

    let mut subgraph = Graph::new();
    for edge in graph.edges() {
        if relevant.contains(&edge.source) && relevant.contains(&edge.target) {
            subgraph.insert_edge(edge.clone());
        }
    }
    for node in relevant {
        subgraph.insert_node(node);
    }
    subgraph
}

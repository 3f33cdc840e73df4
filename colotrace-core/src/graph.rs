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

//! Temporal colocalization graph
//!
//! An ordered set of unique nodes plus an ordered map from edge identity to
//! the aggregated edge. Keeping the accumulator as the map value (instead of
//! inside a set key) turns the merge-on-insert into a single `entry` call:
//! callers never observe a removed-but-not-reinserted edge.
//!
//! Mutation is crate-private. Consumers receive a `Graph` from
//! [`GraphBuilder::finish`](crate::builder::GraphBuilder::finish) and can
//! only read it.

use crate::edge::{Edge, EdgeKey};
use crate::node::{Node, PatientId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(into = "GraphSnapshot", from = "GraphSnapshot")]
pub struct Graph {
    nodes: BTreeSet<Node>,
    edges: BTreeMap<EdgeKey, Edge>,
}

/// Serialized form: JSON object keys must be strings, so edges go out as a list
#[derive(Serialize, Deserialize)]
struct GraphSnapshot {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl From<Graph> for GraphSnapshot {
    fn from(graph: Graph) -> Self {
        Self {
            nodes: graph.nodes.into_iter().collect(),
            edges: graph.edges.into_values().collect(),
        }
    }
}

impl From<GraphSnapshot> for Graph {
    fn from(snapshot: GraphSnapshot) -> Self {
        let mut graph = Graph::new();
        for node in snapshot.nodes {
            graph.insert_node(node);
        }
        for edge in snapshot.edges {
            graph.insert_edge(edge);
        }
        graph
    }
}

impl Graph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Idempotent node insert
    pub(crate) fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node);
    }

    /// Copy an existing edge (with its accumulators) into this graph
    pub(crate) fn insert_edge(&mut self, edge: Edge) {
        self.edges.insert(edge.key(), edge);
    }

    /// Merge-insert a colocalization observation
    ///
    /// The key is canonicalized, so `(arg, mge)` and `(mge, arg)` land on the
    /// same edge. A `None` patient creates or finds the edge without touching
    /// its patient set.
    pub(crate) fn upsert_colocalization(
        &mut self,
        a: Node,
        b: Node,
        patient: Option<PatientId>,
    ) -> &Edge {
        let key = EdgeKey::colocalization(a, b);
        let edge = self.edges.entry(key).or_insert_with(|| Edge::empty(key));
        if let Some(patient) = patient {
            edge.individuals.insert(patient);
        }
        edge
    }

    /// Merge-insert one temporal transition: a new edge starts at weight 1,
    /// an existing one is incremented
    pub(crate) fn upsert_temporal(&mut self, source: Node, target: Node) -> &Edge {
        let key = EdgeKey::temporal(source, target);
        let edge = self.edges.entry(key).or_insert_with(|| Edge::empty(key));
        edge.weight += 1;
        edge
    }

    pub fn nodes(&self) -> &BTreeSet<Node> {
        &self.nodes
    }

    /// All edges in key order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    pub fn colocalization_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values().filter(|e| e.is_colocalization())
    }

    pub fn temporal_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values().filter(|e| e.is_temporal())
    }

    pub fn edge(&self, key: &EdgeKey) -> Option<&Edge> {
        self.edges.get(key)
    }

    pub fn contains_node(&self, node: &Node) -> bool {
        self.nodes.contains(node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Every patient appearing on any colocalization edge
    pub fn patients(&self) -> BTreeSet<PatientId> {
        self.colocalization_edges()
            .flat_map(|e| e.individuals.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timepoint::Timepoint;

    #[test]
    fn test_colocalization_upsert_dedupes_patients() {
        let mut graph = Graph::new();
        let arg = Node::arg(1, Timepoint::PreFmt);
        let mge = Node::mge(10, Timepoint::PreFmt);

        graph.upsert_colocalization(arg, mge, Some(7));
        graph.upsert_colocalization(arg, mge, Some(7));
        let edge = graph.upsert_colocalization(mge, arg, Some(8));

        assert_eq!(edge.individuals.len(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_search_key_upsert_leaves_patients_alone() {
        let mut graph = Graph::new();
        let arg = Node::arg(1, Timepoint::PreFmt);
        let mge = Node::mge(10, Timepoint::PreFmt);

        let edge = graph.upsert_colocalization(arg, mge, None);
        assert!(edge.individuals.is_empty());
        graph.upsert_colocalization(arg, mge, Some(3));
        let edge = graph.upsert_colocalization(arg, mge, None);
        assert_eq!(edge.individuals.len(), 1);
    }

    #[test]
    fn test_temporal_upsert_counts() {
        let mut graph = Graph::new();
        let pre = Node::arg(1, Timepoint::PreFmt);
        let post = Node::arg(1, Timepoint::post(14).unwrap());

        assert_eq!(graph.upsert_temporal(pre, post).weight, 1);
        assert_eq!(graph.upsert_temporal(pre, post).weight, 2);
        assert_eq!(graph.temporal_edges().count(), 1);
        assert_eq!(graph.colocalization_edges().count(), 0);
    }

    #[test]
    fn test_json_snapshot_round_trip() {
        let mut graph = Graph::new();
        let arg = Node::arg(1, Timepoint::Donor);
        let mge = Node::mge(4, Timepoint::Donor);
        graph.insert_node(arg);
        graph.insert_node(mge);
        graph.upsert_colocalization(arg, mge, Some(11));

        let json = serde_json::to_string(&graph).unwrap();
        let back: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(back.node_count(), 2);
        let edge = back.edge(&EdgeKey::colocalization(arg, mge)).unwrap();
        assert!(edge.has_individual(11));
    }
}

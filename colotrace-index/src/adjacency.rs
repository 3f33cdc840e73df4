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

//! Adjacency index over a frozen graph
//!
//! Colocalization edges are linked both ways, temporal edges only from source
//! to target. Nodes without edges are absent; looking one up yields an empty
//! neighbor set, never a panic.

use colotrace_core::{Graph, Node};
use std::collections::{BTreeMap, BTreeSet};

static NO_NEIGHBORS: BTreeSet<Node> = BTreeSet::new();

#[derive(Debug, Clone, Default)]
pub struct AdjacencyIndex {
    neighbors: BTreeMap<Node, BTreeSet<Node>>,
}

impl AdjacencyIndex {
    /// One pass over the edges
    pub fn build(graph: &Graph) -> Self {
        let mut neighbors: BTreeMap<Node, BTreeSet<Node>> = BTreeMap::new();
        for edge in graph.edges() {
            neighbors.entry(edge.source).or_default().insert(edge.target);
            if edge.is_colocalization() {
                neighbors.entry(edge.target).or_default().insert(edge.source);
            }
        }

        let index = Self { neighbors };
        tracing::debug!(
            nodes = index.len(),
            links = index.stats().num_links,
            "Adjacency index built"
        );
        index
    }

    /// Neighbors of `node`; empty when the node has no outgoing links
    pub fn neighbors(&self, node: &Node) -> &BTreeSet<Node> {
        self.neighbors.get(node).unwrap_or(&NO_NEIGHBORS)
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.neighbors.contains_key(node)
    }

    /// Iterate `(node, neighbors)` in node order
    pub fn iter(&self) -> impl Iterator<Item = (&Node, &BTreeSet<Node>)> + '_ {
        self.neighbors.iter()
    }

    /// Number of nodes with at least one outgoing link
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn stats(&self) -> AdjacencyStats {
        AdjacencyStats {
            num_nodes: self.neighbors.len(),
            num_links: self.neighbors.values().map(BTreeSet::len).sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjacencyStats {
    pub num_nodes: usize,
    /// Directed links; a colocalization contributes two
    pub num_links: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use colotrace_core::{GraphBuilder, Timepoint};

    #[test]
    fn test_directionality() {
        let pre = Timepoint::PreFmt;
        let post = Timepoint::post(14).unwrap();

        let mut builder = GraphBuilder::default();
        builder.add_colocalization_edge(Node::arg(1, pre), Node::mge(10, pre), 1);
        builder.add_colocalization_edge(Node::arg(1, post), Node::mge(10, post), 1);
        let graph = builder.finish().graph;
        let index = AdjacencyIndex::build(&graph);

        // Colocalization: both directions
        assert!(index.neighbors(&Node::arg(1, pre)).contains(&Node::mge(10, pre)));
        assert!(index.neighbors(&Node::mge(10, pre)).contains(&Node::arg(1, pre)));

        // Temporal: forward only
        assert!(index.neighbors(&Node::arg(1, pre)).contains(&Node::arg(1, post)));
        assert!(!index.neighbors(&Node::arg(1, post)).contains(&Node::arg(1, pre)));

        let stats = index.stats();
        assert_eq!(stats.num_nodes, 4);
        // 2 colocalizations x 2 + 2 temporal
        assert_eq!(stats.num_links, 6);
    }

    #[test]
    fn test_lookup_miss_is_empty() {
        let index = AdjacencyIndex::build(&GraphBuilder::default().finish().graph);
        assert!(index.is_empty());
        let stranger = Node::arg(99, Timepoint::Donor);
        assert!(index.neighbors(&stranger).is_empty());
        assert!(!index.contains(&stranger));
    }
}

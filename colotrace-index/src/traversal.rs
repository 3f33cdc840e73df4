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

//! Traversal strategies
//!
//! Four ways of reducing the graph to colocalization timelines:
//!
//! | strategy | key | source |
//! |---|---|---|
//! | [`traverse_adjacency`] | `(ARG, MGE)` multiset | ARG nodes and their MGE neighbors |
//! | [`traverse_graph`] | `(patient, ARG, MGE)` | colocalization edges, one entry per patient |
//! | [`traverse_temp_graph`] | `(ARG, MGE)` | forward BFS from each pair's first occurrence |
//! | [`traverse_graph_by_individual`] | `(patient, ARG, MGE)` | forward BFS restricted to the patient's edges |
//!
//! **Forward in time:** both BFS variants skip a neighbor whose timepoint
//! orders strictly before the current node. Equal timepoints pass. Timepoint
//! order puts the donor sample first.
//!
//! Everything here reads a frozen graph; no strategy mutates it.

use crate::adjacency::AdjacencyIndex;
use crate::timeline::{IndividualKey, IndividualTimeline, PairKey, PairMultiTimeline, PairTimeline};
use colotrace_core::{Edge, Graph, Node, Timepoint};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Edges between one ordered node pair; almost always one, rarely two
type EdgeList<'g> = SmallVec<[&'g Edge; 2]>;

/// First-occurrence roots and the timeline gathered from them
#[derive(Debug, Clone)]
pub struct ForwardTraversal<K: Ord> {
    pub first_occurrence: BTreeMap<K, Node>,
    pub timeline: BTreeMap<K, BTreeSet<Timepoint>>,
}

/// `(arg, mge)` ids of a node pair, whichever one is the ARG
fn pair_of(a: &Node, b: &Node) -> PairKey {
    if a.is_arg {
        PairKey::new(a.entity_id, b.entity_id)
    } else {
        PairKey::new(b.entity_id, a.entity_id)
    }
}

/// Direct scan: every ARG node against each of its MGE neighbors
pub fn traverse_adjacency(graph: &Graph, adjacency: &AdjacencyIndex) -> PairMultiTimeline {
    let mut timeline = PairMultiTimeline::new();
    for node in graph.nodes().iter().filter(|n| n.is_arg) {
        for neighbor in adjacency.neighbors(node).iter().filter(|n| !n.is_arg) {
            *timeline
                .entry(PairKey::new(node.entity_id, neighbor.entity_id))
                .or_default()
                .entry(node.timepoint)
                .or_default() += 1;
        }
    }
    timeline
}

/// Per-patient scan of colocalization edges
pub fn traverse_graph(graph: &Graph) -> IndividualTimeline {
    let mut timeline = IndividualTimeline::new();
    for edge in graph.colocalization_edges() {
        let pair = pair_of(edge.arg_node(), edge.mge_node());
        // Both endpoints share one timepoint
        let timepoint = edge.source.timepoint;
        for &patient in &edge.individuals {
            timeline
                .entry(IndividualKey::new(patient, pair.arg_id, pair.mge_id))
                .or_default()
                .insert(timepoint);
        }
    }
    tracing::debug!(entries = timeline.len(), "Per-patient timeline collected");
    timeline
}

/// Earliest ARG node of each colocalizing pair
pub fn find_first_occurrence(graph: &Graph) -> BTreeMap<PairKey, Node> {
    let mut first: BTreeMap<PairKey, Node> = BTreeMap::new();
    for edge in graph.colocalization_edges() {
        let arg = *edge.arg_node();
        let pair = pair_of(&arg, edge.mge_node());
        first
            .entry(pair)
            .and_modify(|existing| {
                if arg.timepoint < existing.timepoint {
                    *existing = arg;
                }
            })
            .or_insert(arg);
    }
    first
}

/// Forward-in-time BFS from `start`, recording every ARG–MGE crossing
///
/// Each crossing records the timepoint of the node being entered. Returns
/// the number of nodes visited, root included.
pub fn bfs_temporal(start: Node, adjacency: &AdjacencyIndex, timeline: &mut PairTimeline) -> usize {
    let mut visited: HashSet<Node> = HashSet::new();
    let mut queue: VecDeque<Node> = VecDeque::new();

    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for neighbor in adjacency.neighbors(&current) {
            if neighbor.timepoint < current.timepoint {
                continue;
            }
            if !visited.insert(*neighbor) {
                continue;
            }
            queue.push_back(*neighbor);

            if current.is_arg != neighbor.is_arg {
                timeline
                    .entry(pair_of(&current, neighbor))
                    .or_default()
                    .insert(neighbor.timepoint);
            }
        }
    }

    visited.len()
}

/// First occurrence per pair, then a forward BFS from each root
///
/// Roots reach pairs other than their own through shared entities, so the
/// result is broader than [`traverse_graph`].
pub fn traverse_temp_graph(graph: &Graph, adjacency: &AdjacencyIndex) -> ForwardTraversal<PairKey> {
    let first_occurrence = find_first_occurrence(graph);
    let mut timeline = PairTimeline::new();
    let mut visited = 0usize;
    for start in first_occurrence.values() {
        visited += bfs_temporal(*start, adjacency, &mut timeline);
    }
    tracing::debug!(
        roots = first_occurrence.len(),
        visited,
        pairs = timeline.len(),
        "Forward traversal complete"
    );
    ForwardTraversal {
        first_occurrence,
        timeline,
    }
}

/// Earliest ARG node of each pair, per patient
///
/// Colocalizations joining two nodes of the same kind are reported and skipped.
pub fn find_first_occurrence_by_individual(graph: &Graph) -> BTreeMap<IndividualKey, Node> {
    let mut first: BTreeMap<IndividualKey, Node> = BTreeMap::new();
    for edge in graph.colocalization_edges() {
        if edge.is_same_kind() {
            tracing::warn!(
                source = %edge.source,
                target = %edge.target,
                "Colocalization edge joins two nodes of the same kind"
            );
            continue;
        }

        let arg = *edge.arg_node();
        let pair = pair_of(&arg, edge.mge_node());
        for &patient in &edge.individuals {
            first
                .entry(IndividualKey::new(patient, pair.arg_id, pair.mge_id))
                .and_modify(|existing| {
                    if arg.timepoint < existing.timepoint {
                        *existing = arg;
                    }
                })
                .or_insert(arg);
        }
    }
    tracing::debug!(roots = first.len(), "First occurrences by patient found");
    first
}

/// Undirected edge lookup keyed by ordered node pair
///
/// Every edge is reachable from `(source, target)` and `(target, source)`.
#[derive(Debug, Default)]
pub struct EdgeLookup<'g> {
    edges: HashMap<(Node, Node), EdgeList<'g>>,
}

impl<'g> EdgeLookup<'g> {
    pub fn build(graph: &'g Graph) -> Self {
        let mut edges: HashMap<(Node, Node), EdgeList<'g>> = HashMap::new();
        for edge in graph.edges() {
            edges.entry((edge.source, edge.target)).or_default().push(edge);
            edges.entry((edge.target, edge.source)).or_default().push(edge);
        }
        Self { edges }
    }

    /// Edges joining `a` and `b`, in either direction
    pub fn between(&self, a: &Node, b: &Node) -> &[&'g Edge] {
        self.edges
            .get(&(*a, *b))
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Forward BFS for one patient and one pair
///
/// A neighbor is entered only through a colocalization edge that carries the
/// patient and joins exactly the key's ARG and MGE. The root's timepoint is
/// always recorded.
pub fn temporal_timeline_traversal(
    start: Node,
    adjacency: &AdjacencyIndex,
    lookup: &EdgeLookup<'_>,
    key: IndividualKey,
    timeline: &mut IndividualTimeline,
) {
    let mut visited: HashSet<Node> = HashSet::new();
    let mut queue: VecDeque<Node> = VecDeque::new();

    visited.insert(start);
    queue.push_back(start);
    let entry = timeline.entry(key).or_default();
    entry.insert(start.timepoint);

    while let Some(current) = queue.pop_front() {
        for neighbor in adjacency.neighbors(&current) {
            if neighbor.timepoint < current.timepoint || visited.contains(neighbor) {
                continue;
            }
            if pair_of(&current, neighbor) != key.pair() {
                continue;
            }

            let carried = lookup
                .between(&current, neighbor)
                .iter()
                .any(|e| e.is_colocalization() && e.has_individual(key.patient_id));
            if carried {
                entry.insert(neighbor.timepoint);
                visited.insert(*neighbor);
                queue.push_back(*neighbor);
            }
        }
    }
}

/// Per-patient first occurrence, then a patient-restricted forward BFS from each root
pub fn traverse_graph_by_individual(
    graph: &Graph,
    adjacency: &AdjacencyIndex,
) -> ForwardTraversal<IndividualKey> {
    let first_occurrence = find_first_occurrence_by_individual(graph);
    let lookup = EdgeLookup::build(graph);
    let mut timeline = IndividualTimeline::new();

    for (key, start) in &first_occurrence {
        temporal_timeline_traversal(*start, adjacency, &lookup, *key, &mut timeline);
    }

    ForwardTraversal {
        first_occurrence,
        timeline,
    }
}

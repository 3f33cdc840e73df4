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

//! Colotrace Index
//!
//! Adjacency lookup and timeline traversal over a built colocalization graph.

pub mod adjacency;
pub mod queries;
pub mod timeline;
pub mod traversal;

pub use adjacency::{AdjacencyIndex, AdjacencyStats};
pub use queries::{connected_mges, node_degree_over_time, timeline_for_arg, timeline_for_mge};
pub use timeline::{
    pair_union, IndividualKey, IndividualTimeline, PairKey, PairMultiTimeline, PairTimeline,
};
pub use traversal::{
    bfs_temporal, find_first_occurrence, find_first_occurrence_by_individual,
    temporal_timeline_traversal, traverse_adjacency, traverse_graph, traverse_graph_by_individual,
    traverse_temp_graph, EdgeLookup, ForwardTraversal,
};

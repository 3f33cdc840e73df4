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

//! Graph edges
//!
//! Two relationships share one edge type:
//!
//! - **Colocalization**: undirected ARG–MGE link at a single timepoint. The
//!   accumulator is the set of patients that exhibited it.
//! - **Temporal**: directed link from an entity's earlier node to its next
//!   node for one patient's progression. The accumulator is a count of the
//!   patients sharing that exact transition.
//!
//! Identity is [`EdgeKey`]; the accumulators are not part of it.

use crate::node::{Node, PatientId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Colocalization,
    Temporal,
}

/// Edge identity: `(source, target, kind)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub source: Node,
    pub target: Node,
    pub kind: EdgeKind,
}

impl EdgeKey {
    /// Canonical key for an undirected colocalization: smaller node first
    pub fn colocalization(a: Node, b: Node) -> Self {
        let (source, target) = if b < a { (b, a) } else { (a, b) };
        Self {
            source,
            target,
            kind: EdgeKind::Colocalization,
        }
    }

    /// Directed temporal key, kept in the given orientation
    pub fn temporal(source: Node, target: Node) -> Self {
        Self {
            source,
            target,
            kind: EdgeKind::Temporal,
        }
    }
}

/// An aggregated edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source: Node,
    pub target: Node,
    pub kind: EdgeKind,
    /// Patients exhibiting a colocalization (empty for temporal edges)
    pub individuals: BTreeSet<PatientId>,
    /// Patients sharing a temporal transition (0 for colocalization edges)
    pub weight: u32,
}

impl Edge {
    pub(crate) fn empty(key: EdgeKey) -> Self {
        Self {
            source: key.source,
            target: key.target,
            kind: key.kind,
            individuals: BTreeSet::new(),
            weight: 0,
        }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            source: self.source,
            target: self.target,
            kind: self.kind,
        }
    }

    pub fn is_colocalization(&self) -> bool {
        self.kind == EdgeKind::Colocalization
    }

    pub fn is_temporal(&self) -> bool {
        self.kind == EdgeKind::Temporal
    }

    /// The ARG endpoint of a colocalization edge
    ///
    /// Falls back to `source` when neither (or both) endpoints are ARGs.
    pub fn arg_node(&self) -> &Node {
        if !self.source.is_arg && self.target.is_arg {
            &self.target
        } else {
            &self.source
        }
    }

    /// The MGE endpoint of a colocalization edge
    pub fn mge_node(&self) -> &Node {
        if !self.source.is_arg && self.target.is_arg {
            &self.source
        } else {
            &self.target
        }
    }

    /// Both endpoints have the same entity kind (a data-integrity smell for colocalizations)
    pub fn is_same_kind(&self) -> bool {
        self.source.is_arg == self.target.is_arg
    }

    pub fn has_individual(&self, patient: PatientId) -> bool {
        self.individuals.contains(&patient)
    }

    /// Endpoint matching `kind`, if any
    pub fn endpoint_of_kind(&self, is_arg: bool) -> Option<&Node> {
        if self.source.is_arg == is_arg {
            Some(&self.source)
        } else if self.target.is_arg == is_arg {
            Some(&self.target)
        } else {
            None
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

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

//! Graph nodes
//!
//! A node is one entity (ARG or MGE) observed at one timepoint. Identity is
//! `(entity_id, is_arg, timepoint)`; the SNP-confirmation flag rides along
//! as metadata and never participates in equality, hashing or ordering.

use crate::timepoint::Timepoint;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Numeric ARG or MGE identifier assigned by the entity registry
pub type EntityId = u32;

/// Patient identifier from the input table
pub type PatientId = u32;

/// The two entity kinds tracked by the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Arg,
    Mge,
}

impl EntityKind {
    pub fn is_arg(self) -> bool {
        self == EntityKind::Arg
    }

    pub fn from_is_arg(is_arg: bool) -> Self {
        if is_arg {
            EntityKind::Arg
        } else {
            EntityKind::Mge
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Arg => f.write_str("ARG"),
            EntityKind::Mge => f.write_str("MGE"),
        }
    }
}

/// An entity at a timepoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Node {
    pub entity_id: EntityId,
    pub is_arg: bool,
    pub timepoint: Timepoint,
    /// Metadata only: excluded from identity
    #[serde(default)]
    pub requires_snp_confirmation: bool,
}

impl Node {
    pub fn new(entity_id: EntityId, is_arg: bool, timepoint: Timepoint) -> Self {
        Self {
            entity_id,
            is_arg,
            timepoint,
            requires_snp_confirmation: false,
        }
    }

    pub fn arg(entity_id: EntityId, timepoint: Timepoint) -> Self {
        Self::new(entity_id, true, timepoint)
    }

    pub fn mge(entity_id: EntityId, timepoint: Timepoint) -> Self {
        Self::new(entity_id, false, timepoint)
    }

    pub fn with_snp_confirmation(mut self, requires: bool) -> Self {
        self.requires_snp_confirmation = requires;
        self
    }

    pub fn kind(&self) -> EntityKind {
        EntityKind::from_is_arg(self.is_arg)
    }

    /// `(entity_id, is_arg)`: the entity independent of timepoint
    pub fn entity(&self) -> (EntityId, bool) {
        (self.entity_id, self.is_arg)
    }

    /// Same entity (ID and kind), any timepoint
    pub fn same_entity(&self, other: &Node) -> bool {
        self.entity() == other.entity()
    }

    fn identity(&self) -> (EntityId, bool, Timepoint) {
        (self.entity_id, self.is_arg, self.timepoint)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl Ord for Node {
    /// Entity ID, then kind (MGE before ARG), then timepoint with Donor first
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})@{}", self.kind(), self.entity_id, self.timepoint)
    }
}

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

//! Timeline keys and aggregated timeline maps

use colotrace_core::{EntityId, PatientId, Timepoint};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Global `(ARG, MGE)` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    pub arg_id: EntityId,
    pub mge_id: EntityId,
}

impl PairKey {
    pub fn new(arg_id: EntityId, mge_id: EntityId) -> Self {
        Self { arg_id, mge_id }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARG({})-MGE({})", self.arg_id, self.mge_id)
    }
}

/// Per-patient `(patient, ARG, MGE)` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndividualKey {
    pub patient_id: PatientId,
    pub arg_id: EntityId,
    pub mge_id: EntityId,
}

impl IndividualKey {
    pub fn new(patient_id: PatientId, arg_id: EntityId, mge_id: EntityId) -> Self {
        Self {
            patient_id,
            arg_id,
            mge_id,
        }
    }

    pub fn pair(&self) -> PairKey {
        PairKey::new(self.arg_id, self.mge_id)
    }
}

/// Pair to timepoint multiplicities
pub type PairMultiTimeline = BTreeMap<PairKey, BTreeMap<Timepoint, usize>>;

/// Pair to distinct timepoints
pub type PairTimeline = BTreeMap<PairKey, BTreeSet<Timepoint>>;

/// Patient-pair to distinct timepoints; the map most reports consume
pub type IndividualTimeline = BTreeMap<IndividualKey, BTreeSet<Timepoint>>;

/// Union of every patient's timepoints per pair
pub fn pair_union(timeline: &IndividualTimeline) -> PairTimeline {
    let mut union = PairTimeline::new();
    for (key, timepoints) in timeline {
        union
            .entry(key.pair())
            .or_default()
            .extend(timepoints.iter().copied());
    }
    union
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_order_by_fields() {
        assert!(PairKey::new(1, 20) < PairKey::new(2, 10));
        assert!(IndividualKey::new(1, 9, 9) < IndividualKey::new(2, 1, 1));
        assert_eq!(IndividualKey::new(4, 1, 10).pair(), PairKey::new(1, 10));
    }

    #[test]
    fn test_pair_union() {
        let post = Timepoint::post(7).unwrap();
        let mut timeline = IndividualTimeline::new();
        timeline.insert(IndividualKey::new(1, 1, 10), [Timepoint::PreFmt].into());
        timeline.insert(IndividualKey::new(2, 1, 10), [post].into());
        timeline.insert(IndividualKey::new(2, 2, 10), [Timepoint::Donor].into());

        let union = pair_union(&timeline);
        assert_eq!(union.len(), 2);
        assert_eq!(union[&PairKey::new(1, 10)], BTreeSet::from([Timepoint::PreFmt, post]));
    }
}

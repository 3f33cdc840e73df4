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

//! Presence classification
//!
//! A timeline is reduced to three flags (donor / pre / post seen) by the
//! label-based predicates on [`Timepoint`]. A scenario matches only when all
//! three flags are equal; "at least" matching is never used.
//!
//! Seven scenarios are named. Five of them feed the four temporal-dynamics
//! categories:
//!
//! | category | scenarios |
//! |---|---|
//! | emerged | PostFMT Only |
//! | disappeared | PreFMT Only, Donor & PreFMT Only |
//! | transferred | Donor & PostFMT Only |
//! | persisted | PreFMT & PostFMT Only, PreFMT, Donor & PostFMT |
//!
//! Anything else (donor-only, nothing at all) has no category.

use colotrace_core::{PatientId, Timepoint};
use colotrace_index::{pair_union, IndividualTimeline, PairKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Which sampling periods a timeline touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PresenceFlags {
    pub donor: bool,
    pub pre: bool,
    pub post: bool,
}

impl PresenceFlags {
    pub const fn new(donor: bool, pre: bool, post: bool) -> Self {
        Self { donor, pre, post }
    }

    pub fn from_timepoints<'a, I>(timepoints: I) -> Self
    where
        I: IntoIterator<Item = &'a Timepoint>,
    {
        timepoints
            .into_iter()
            .fold(Self::new(false, false, false), |flags, tp| Self {
                donor: flags.donor || tp.is_donor(),
                pre: flags.pre || tp.is_pre(),
                post: flags.post || tp.is_post(),
            })
    }
}

impl fmt::Display for PresenceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "donor={} pre={} post={}",
            self.donor as u8, self.pre as u8, self.post as u8
        )
    }
}

/// A named presence pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Scenario {
    pub flags: PresenceFlags,
    pub label: &'static str,
}

impl Scenario {
    pub const POST_FMT_ONLY: Scenario = Scenario::named(false, false, true, "PostFMT Only");
    pub const PRE_FMT_ONLY: Scenario = Scenario::named(false, true, false, "PreFMT Only");
    pub const DONOR_ONLY: Scenario = Scenario::named(true, false, false, "Donor Only");
    pub const DONOR_AND_PRE_FMT_ONLY: Scenario =
        Scenario::named(true, true, false, "Donor & PreFMT Only");
    pub const PRE_AND_POST_FMT_ONLY: Scenario =
        Scenario::named(false, true, true, "PreFMT & PostFMT Only");
    pub const DONOR_PRE_AND_POST_FMT: Scenario =
        Scenario::named(true, true, true, "PreFMT, Donor & PostFMT");
    pub const DONOR_AND_POST_FMT_ONLY: Scenario =
        Scenario::named(true, false, true, "Donor & PostFMT Only");

    const fn named(donor: bool, pre: bool, post: bool, label: &'static str) -> Self {
        Self {
            flags: PresenceFlags::new(donor, pre, post),
            label,
        }
    }

    /// Every named scenario, in report order
    pub fn all() -> [Scenario; 7] {
        [
            Self::POST_FMT_ONLY,
            Self::PRE_FMT_ONLY,
            Self::DONOR_ONLY,
            Self::DONOR_AND_PRE_FMT_ONLY,
            Self::PRE_AND_POST_FMT_ONLY,
            Self::DONOR_PRE_AND_POST_FMT,
            Self::DONOR_AND_POST_FMT_ONLY,
        ]
    }

    pub fn matches(&self, timepoints: &BTreeSet<Timepoint>) -> bool {
        PresenceFlags::from_timepoints(timepoints) == self.flags
    }
}

/// The four temporal-dynamics categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalDynamics {
    Emerged,
    Disappeared,
    Transferred,
    Persisted,
}

impl TemporalDynamics {
    pub fn all() -> [TemporalDynamics; 4] {
        [
            TemporalDynamics::Emerged,
            TemporalDynamics::Disappeared,
            TemporalDynamics::Transferred,
            TemporalDynamics::Persisted,
        ]
    }

    /// Scenarios accumulated into this category
    pub fn scenarios(self) -> &'static [Scenario] {
        const EMERGED: [Scenario; 1] = [Scenario::POST_FMT_ONLY];
        const DISAPPEARED: [Scenario; 2] = [Scenario::PRE_FMT_ONLY, Scenario::DONOR_AND_PRE_FMT_ONLY];
        const TRANSFERRED: [Scenario; 1] = [Scenario::DONOR_AND_POST_FMT_ONLY];
        const PERSISTED: [Scenario; 2] =
            [Scenario::PRE_AND_POST_FMT_ONLY, Scenario::DONOR_PRE_AND_POST_FMT];

        match self {
            TemporalDynamics::Emerged => &EMERGED,
            TemporalDynamics::Disappeared => &DISAPPEARED,
            TemporalDynamics::Transferred => &TRANSFERRED,
            TemporalDynamics::Persisted => &PERSISTED,
        }
    }

    /// Short name used for report file stems
    pub fn name(self) -> &'static str {
        match self {
            TemporalDynamics::Emerged => "emerge",
            TemporalDynamics::Disappeared => "disappear",
            TemporalDynamics::Transferred => "transfer",
            TemporalDynamics::Persisted => "persist",
        }
    }
}

impl fmt::Display for TemporalDynamics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category of a presence pattern, if it has one
pub fn classify(flags: PresenceFlags) -> Option<TemporalDynamics> {
    TemporalDynamics::all()
        .into_iter()
        .find(|category| category.scenarios().iter().any(|s| s.flags == flags))
}

/// Entries whose own timeline matches `flags` exactly
pub fn filter_by_scenario(timeline: &IndividualTimeline, flags: PresenceFlags) -> IndividualTimeline {
    timeline
        .iter()
        .filter(|(_, tps)| PresenceFlags::from_timepoints(*tps) == flags)
        .map(|(key, tps)| (*key, tps.clone()))
        .collect()
}

/// Distinct patients per pair
pub fn patients_by_pair(timeline: &IndividualTimeline) -> BTreeMap<PairKey, BTreeSet<PatientId>> {
    let mut pairs: BTreeMap<PairKey, BTreeSet<PatientId>> = BTreeMap::new();
    for key in timeline.keys() {
        pairs.entry(key.pair()).or_default().insert(key.patient_id);
    }
    pairs
}

/// Patients per pair where both the pair's pooled timeline and the patient's
/// own timeline match `flags`
pub fn pair_patients_by_criteria(
    timeline: &IndividualTimeline,
    flags: PresenceFlags,
) -> BTreeMap<PairKey, BTreeSet<PatientId>> {
    let valid_pairs: BTreeSet<PairKey> = pair_union(timeline)
        .into_iter()
        .filter(|(_, tps)| PresenceFlags::from_timepoints(tps) == flags)
        .map(|(pair, _)| pair)
        .collect();

    let mut pairs: BTreeMap<PairKey, BTreeSet<PatientId>> = BTreeMap::new();
    for (key, tps) in timeline {
        if valid_pairs.contains(&key.pair()) && PresenceFlags::from_timepoints(tps) == flags {
            pairs.entry(key.pair()).or_default().insert(key.patient_id);
        }
    }
    pairs
}

/// One scenario's share of a category
#[derive(Debug, Clone)]
pub struct ScenarioSlice {
    pub scenario: Scenario,
    pub entries: IndividualTimeline,
}

/// All four categories, each split into its scenarios
pub fn dynamics_report(timeline: &IndividualTimeline) -> BTreeMap<TemporalDynamics, Vec<ScenarioSlice>> {
    let mut report = BTreeMap::new();
    for category in TemporalDynamics::all() {
        let slices: Vec<ScenarioSlice> = category
            .scenarios()
            .iter()
            .map(|scenario| {
                let entries = filter_by_scenario(timeline, scenario.flags);
                tracing::debug!(
                    category = %category,
                    scenario = scenario.label,
                    entries = entries.len(),
                    "Scenario filtered"
                );
                ScenarioSlice {
                    scenario: *scenario,
                    entries,
                }
            })
            .collect();
        report.insert(category, slices);
    }
    report
}

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

//! End-to-end: observation records through graph, traversal and classification

use colotrace_core::{
    GraphBuilder, ObservationRecord, StaticRegistry, Timepoint, POST_FMT_DAYS,
};
use colotrace_index::{traverse_graph, IndividualKey, IndividualTimeline, PairKey};
use colotrace_query::{
    classify, dynamics_report, pair_patients_by_criteria, top_pairs_by_unique_patients,
    PresenceFlags, Scenario, TemporalDynamics,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn registry() -> StaticRegistry {
    StaticRegistry::new()
        .with_arg(1, "MEG_1")
        .and_then(|r| r.with_arg(2, "MEG_2"))
        .and_then(|r| r.with_mge(10, "tn916"))
        .and_then(|r| r.with_mge(20, "IS26"))
        .unwrap()
}

fn record(patient: u32, arg: &str, mge: &str, column: &str) -> ObservationRecord {
    ObservationRecord::new(patient, "rCDI", arg, mge, column, "1")
}

fn timeline_from(records: Vec<ObservationRecord>) -> IndividualTimeline {
    let mut builder = GraphBuilder::default();
    builder.ingest_all(records, &registry()).unwrap();
    traverse_graph(&builder.finish().graph)
}

/// Two patients carrying ARG 1 / MGE 10 before and after treatment
#[test]
fn test_two_patients_persisted() {
    let timeline = timeline_from(vec![
        record(1, "MEG_1", "tn916", "PreFMT"),
        record(1, "MEG_1", "tn916", "PostFMT_14"),
        record(2, "MEG_1", "tn916", "PreFMT"),
        record(2, "MEG_1", "tn916", "PostFMT_14"),
    ]);

    let expected = BTreeSet::from([Timepoint::PreFmt, Timepoint::post(14).unwrap()]);
    assert_eq!(timeline.len(), 2);
    for patient in [1, 2] {
        let tps = &timeline[&IndividualKey::new(patient, 1, 10)];
        assert_eq!(tps, &expected);
        assert_eq!(
            classify(PresenceFlags::from_timepoints(tps)),
            Some(TemporalDynamics::Persisted)
        );
    }

    let persisted = pair_patients_by_criteria(&timeline, Scenario::PRE_AND_POST_FMT_ONLY.flags);
    assert_eq!(persisted[&PairKey::new(1, 10)].len(), 2);

    let ranked = top_pairs_by_unique_patients(&persisted, 0);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].count, 2);
}

/// Donor-only and post-only-without-donor fall outside every category
#[test]
fn test_donor_only_and_post_only_unclassified() {
    let timeline = timeline_from(vec![
        record(5, "MEG_2", "IS26", "Donor"),
        record(6, "MEG_2", "IS26", "PostFMT_7"),
    ]);

    let donor_only = &timeline[&IndividualKey::new(5, 2, 20)];
    assert_eq!(donor_only, &BTreeSet::from([Timepoint::Donor]));
    assert_eq!(classify(PresenceFlags::from_timepoints(donor_only)), None);

    // Post-only alone is "emerged"; it is not "transferred" without a donor sample
    let post_only = &timeline[&IndividualKey::new(6, 2, 20)];
    assert_ne!(
        classify(PresenceFlags::from_timepoints(post_only)),
        Some(TemporalDynamics::Transferred)
    );

    // Pooled across patients the pair looks transferred, but no single patient matches
    let transferred = pair_patients_by_criteria(&timeline, Scenario::DONOR_AND_POST_FMT_ONLY.flags);
    assert!(transferred.is_empty());

    let report = dynamics_report(&timeline);
    let transferred_entries: usize = report[&TemporalDynamics::Transferred]
        .iter()
        .map(|slice| slice.entries.len())
        .sum();
    assert_eq!(transferred_entries, 0);
    let donor_only_listed = report
        .values()
        .flatten()
        .any(|slice| slice.entries.contains_key(&IndividualKey::new(5, 2, 20)));
    assert!(!donor_only_listed);
}

/// Rows that fail to resolve are skipped without aborting the batch
#[test]
fn test_bad_rows_skipped() {
    let mut builder = GraphBuilder::default();
    let stats = builder
        .ingest_all(
            vec![
                record(1, "MEG_1", "tn916", "PreFMT"),
                record(1, "MEG_404", "tn916", "PreFMT"),
                record(1, "MEG_1", "tn916", "Week_3"),
                ObservationRecord::new(1, "rCDI", "MEG_1", "tn916", "PostFMT_14", "0"),
            ],
            &registry(),
        )
        .unwrap();

    assert_eq!(stats.recorded, 1);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.not_observed, 1);
    assert_eq!(builder.finish().graph.colocalization_edges().count(), 1);
}

fn timepoint_strategy() -> impl Strategy<Value = Timepoint> {
    prop_oneof![
        Just(Timepoint::Donor),
        Just(Timepoint::PreFmt),
        prop::sample::select(POST_FMT_DAYS.to_vec())
            .prop_map(|day| Timepoint::post(day).unwrap()),
    ]
}

proptest! {
    /// At most one category fires, and exactly one when the pattern is named
    #[test]
    fn prop_classification_is_a_partial_partition(
        tps in prop::collection::btree_set(timepoint_strategy(), 1..6)
    ) {
        let flags = PresenceFlags::from_timepoints(&tps);
        let firing: Vec<TemporalDynamics> = TemporalDynamics::all()
            .into_iter()
            .filter(|category| category.scenarios().iter().any(|s| s.matches(&tps)))
            .collect();

        prop_assert!(firing.len() <= 1);
        prop_assert_eq!(firing.first().copied(), classify(flags));
        if tps.iter().all(|tp| tp.is_donor()) {
            prop_assert!(firing.is_empty());
        }
    }
}

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

//! Graph construction
//!
//! Two phases:
//!
//! 1. **Colocalization**: every observed record merge-inserts one ARG–MGE
//!    edge at the record's timepoint, tagged with the patient.
//! 2. **Temporal synthesis**: once all colocalizations are known, each
//!    patient's nodes are grouped by entity, sorted by timepoint and linked
//!    pairwise (`n[i] -> n[i+1]`). Repeated transitions across patients
//!    increment the edge weight.
//!
//! [`GraphBuilder::finish`] runs phase 2 (if not already run) and hands back
//! the frozen graph.

use crate::config::{BuildConfig, DRUG_RESISTANCE_CLASS};
use crate::error::{ColotraceError, Result};
use crate::graph::Graph;
use crate::node::{EntityId, Node, PatientId};
use crate::observation::ObservationRecord;
use crate::registry::EntityRegistry;
use crate::timepoint::Timepoint;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Per-entity timepoint run; most entities appear at only a handful of timepoints
type EntityRun = SmallVec<[Node; 8]>;

/// Why an otherwise valid observation was left out of the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExclusionReason {
    /// ARG requires SNP confirmation and those are excluded
    SnpConfirmation,
    /// ARG resistance class is not drug resistance and metals are excluded
    NonDrugResistance,
}

/// Result of ingesting one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Recorded,
    NotObserved,
    Excluded(ExclusionReason),
}

/// Counters for a batch ingest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    pub recorded: usize,
    pub not_observed: usize,
    pub excluded: usize,
    /// Rows dropped because of a row-level error
    pub skipped: usize,
}

impl IngestStats {
    pub fn total(&self) -> usize {
        self.recorded + self.not_observed + self.excluded + self.skipped
    }
}

/// The finished graph plus the patient metadata gathered while building it
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub graph: Graph,
    pub patient_diseases: BTreeMap<PatientId, String>,
}

pub struct GraphBuilder {
    config: BuildConfig,
    graph: Graph,
    patient_diseases: BTreeMap<PatientId, String>,
    temporal_done: bool,
}

impl GraphBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            graph: Graph::new(),
            patient_diseases: BTreeMap::new(),
            temporal_done: false,
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Read-only view of the graph under construction
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Remember a patient's disease; a later call for the same patient wins
    pub fn record_disease(&mut self, patient: PatientId, disease: impl Into<String>) {
        self.patient_diseases.insert(patient, disease.into());
    }

    /// Insert both nodes and merge the patient into the canonical edge
    pub fn add_colocalization_edge(&mut self, arg: Node, mge: Node, patient: PatientId) {
        if arg.is_arg == mge.is_arg {
            tracing::warn!(
                source = %arg,
                target = %mge,
                "Colocalization between two nodes of the same kind"
            );
        }
        self.graph.insert_node(arg);
        self.graph.insert_node(mge);
        self.graph.upsert_colocalization(arg, mge, Some(patient));
    }

    /// Link each patient's successive timepoints of the same entity
    ///
    /// Runs at most once; later calls are no-ops so weights are never
    /// double counted.
    pub fn add_temporal_edges(&mut self) {
        if self.temporal_done {
            tracing::debug!("Temporal edges already synthesized");
            return;
        }
        self.temporal_done = true;

        let mut nodes_by_patient: BTreeMap<PatientId, BTreeSet<Node>> = BTreeMap::new();
        for edge in self.graph.colocalization_edges() {
            for &patient in &edge.individuals {
                let nodes = nodes_by_patient.entry(patient).or_default();
                nodes.insert(edge.source);
                nodes.insert(edge.target);
            }
        }

        let mut transitions = 0usize;
        for nodes in nodes_by_patient.values() {
            let mut runs: BTreeMap<(EntityId, bool), EntityRun> = BTreeMap::new();
            for node in nodes {
                runs.entry(node.entity()).or_default().push(*node);
            }

            for run in runs.values_mut() {
                run.sort();
                for pair in run.windows(2) {
                    self.graph.upsert_temporal(pair[0], pair[1]);
                    transitions += 1;
                }
            }
        }

        tracing::info!(
            patients = nodes_by_patient.len(),
            transitions,
            temporal_edges = self.graph.temporal_edges().count(),
            "Temporal edges synthesized"
        );
    }

    /// Ingest one record
    ///
    /// Row-level problems come back as errors; the caller decides whether
    /// to skip (see [`GraphBuilder::ingest_all`]).
    pub fn ingest<R>(&mut self, record: &ObservationRecord, registry: &R) -> Result<IngestOutcome>
    where
        R: EntityRegistry + ?Sized,
    {
        // Recorded even when the row is dropped below
        self.record_disease(record.patient_id, record.disease_label.as_str());

        let arg_id = registry
            .resolve_arg(&record.arg_label)
            .ok_or_else(|| ColotraceError::UnknownArg(record.arg_label.clone()))?;
        let mge_id = registry
            .resolve_mge(&record.mge_label)
            .ok_or_else(|| ColotraceError::UnknownMge(record.mge_label.clone()))?;

        if !record.is_observed() {
            return Ok(IngestOutcome::NotObserved);
        }

        let timepoint = Timepoint::from_column_header(&record.timepoint_column)?;

        let requires_snp = registry.requires_snp_confirmation(arg_id);
        if self.config.exclude_snp_confirmation_args && requires_snp {
            return Ok(IngestOutcome::Excluded(ExclusionReason::SnpConfirmation));
        }
        if self.config.exclude_metals
            && registry.arg_resistance(arg_id) != Some(DRUG_RESISTANCE_CLASS)
        {
            return Ok(IngestOutcome::Excluded(ExclusionReason::NonDrugResistance));
        }

        let arg = Node::arg(arg_id, timepoint).with_snp_confirmation(requires_snp);
        let mge = Node::mge(mge_id, timepoint);
        self.add_colocalization_edge(arg, mge, record.patient_id);
        Ok(IngestOutcome::Recorded)
    }

    /// Ingest a batch, skipping (and logging) row-level errors
    ///
    /// Each distinct bad column header or unknown label is logged once.
    pub fn ingest_all<I, R>(&mut self, records: I, registry: &R) -> Result<IngestStats>
    where
        I: IntoIterator<Item = ObservationRecord>,
        R: EntityRegistry + ?Sized,
    {
        let mut stats = IngestStats::default();
        let mut reported: HashSet<String> = HashSet::new();

        for record in records {
            match self.ingest(&record, registry) {
                Ok(IngestOutcome::Recorded) => stats.recorded += 1,
                Ok(IngestOutcome::NotObserved) => stats.not_observed += 1,
                Ok(IngestOutcome::Excluded(_)) => stats.excluded += 1,
                Err(e) if e.is_row_error() => {
                    stats.skipped += 1;
                    if reported.insert(e.to_string()) {
                        tracing::warn!(
                            patient_id = record.patient_id,
                            column = %record.timepoint_column,
                            "Skipping observation: {}",
                            e
                        );
                    }
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            recorded = stats.recorded,
            not_observed = stats.not_observed,
            excluded = stats.excluded,
            skipped = stats.skipped,
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "Observations ingested"
        );
        Ok(stats)
    }

    /// Synthesize temporal edges and freeze the graph
    pub fn finish(mut self) -> BuildOutput {
        self.add_temporal_edges();
        BuildOutput {
            graph: self.graph,
            patient_diseases: self.patient_diseases,
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(BuildConfig::default())
    }
}

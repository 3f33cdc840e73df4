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

//! Load, build and analyze

use crate::config::CliConfig;
use crate::input::{read_observations, ReadStats};
use crate::report::ReportWriter;
use anyhow::{Context, Result};
use colotrace_core::{Graph, GraphBuilder, IngestStats, PatientId, StaticRegistry};
use colotrace_index::{
    traverse_adjacency, traverse_graph, traverse_graph_by_individual, traverse_temp_graph,
    AdjacencyIndex, PairKey,
};
use colotrace_query::{
    top_pairs_by_frequency, GraphStatistics, PairFrequencyReport, Ranked, ScenarioPairs,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub fn load_registry(path: &Path) -> Result<StaticRegistry> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read registry {}", path.display()))?;
    let registry = StaticRegistry::from_json_str(&text)
        .with_context(|| format!("Invalid registry {}", path.display()))?;
    tracing::info!(entries = registry.len(), "Registry loaded");
    Ok(registry)
}

/// A frozen graph with everything gathered while building it
#[derive(Debug)]
pub struct BuiltGraph {
    pub graph: Graph,
    pub patient_diseases: BTreeMap<PatientId, String>,
    pub adjacency: AdjacencyIndex,
    pub read: ReadStats,
    pub ingest: IngestStats,
}

pub fn build_graph(config: &CliConfig, registry: &StaticRegistry) -> Result<BuiltGraph> {
    let table = read_observations(&config.input.data)?;
    let mut builder = GraphBuilder::new(config.build.clone());
    for (patient, disease) in table.diseases {
        builder.record_disease(patient, disease);
    }
    let ingest = builder
        .ingest_all(table.records, registry)
        .context("Failed to build graph")?;
    let output = builder.finish();
    let adjacency = AdjacencyIndex::build(&output.graph);

    Ok(BuiltGraph {
        graph: output.graph,
        patient_diseases: output.patient_diseases,
        adjacency,
        read: table.stats,
        ingest,
    })
}

/// Machine-readable outcome of `analyze`
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub ingest: IngestStats,
    pub statistics: GraphStatistics,
    pub patients: usize,
    pub individual_entries: usize,
    /// Pairs reachable by forward traversal from their first occurrence
    pub reachable_pairs: usize,
    /// Entries found by the patient-restricted forward traversal
    pub individual_forward_entries: usize,
    /// Pairs linked through the adjacency index
    pub adjacency_pairs: usize,
    /// Individual entries per temporal-dynamics category
    pub dynamics: BTreeMap<String, usize>,
    pub top_pairs: Vec<Ranked<PairKey>>,
    pub top_colocalizations: PairFrequencyReport,
    /// Pair-to-patients map and unique-patient ranking per scenario
    pub scenario_pairs: Vec<ScenarioPairs>,
    pub diseases: usize,
    pub mge_groups: usize,
    pub files: Vec<PathBuf>,
}

/// Build the graph and write every report under `config.output.dir`
pub fn run_analysis(config: &CliConfig) -> Result<AnalysisSummary> {
    let registry = load_registry(&config.input.registry)?;
    let built = build_graph(config, &registry)?;
    let report_config = config.output.report.clone();
    let top_n = report_config.top_n;

    let statistics = GraphStatistics::compute(&built.graph, &built.adjacency);
    let timeline = traverse_graph(&built.graph);
    let forward = traverse_temp_graph(&built.graph, &built.adjacency);
    let forward_by_individual = traverse_graph_by_individual(&built.graph, &built.adjacency);
    let adjacency_pairs = traverse_adjacency(&built.graph, &built.adjacency).len();

    let mut writer = ReportWriter::new(&config.output.dir, &registry, report_config);
    writer.graph_statistics(&statistics)?;
    let dynamics = writer.temporal_dynamics(&timeline)?;
    writer.top_entities(&built.graph)?;
    let top_colocalizations = writer.top_colocalizations(&timeline, &built.patient_diseases)?;
    let scenario_pairs = writer.scenario_pairs(&timeline)?;
    let diseases = writer.disease_counts(&timeline, &built.patient_diseases)?;
    let mge_groups = writer.mge_group_counts(&timeline)?;

    let mut summary = AnalysisSummary {
        ingest: built.ingest,
        statistics,
        patients: built.patient_diseases.len(),
        individual_entries: timeline.len(),
        reachable_pairs: forward.timeline.len(),
        individual_forward_entries: forward_by_individual.timeline.len(),
        adjacency_pairs,
        dynamics,
        top_pairs: top_pairs_by_frequency(&timeline, top_n),
        top_colocalizations,
        scenario_pairs,
        diseases,
        mge_groups,
        files: Vec::new(),
    };

    if config.output.json {
        writer.json("graph.json", &built.graph)?;
        writer.disease_status_json(&timeline, &built.patient_diseases)?;
        summary.files = writer.written().to_vec();
        writer.json("summary.json", &summary)?;
    }
    summary.files = writer.written().to_vec();

    tracing::info!(
        files = summary.files.len(),
        dir = %config.output.dir.display(),
        "Analysis complete"
    );
    Ok(summary)
}

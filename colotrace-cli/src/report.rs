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

//! CSV and JSON report writers
//!
//! Layout under the output directory:
//!
//! ```text
//! graph_statistics.csv
//! temporal_dynamics/{emerge,disappear,transfer,persist}.csv (+ _detailed)
//! top_entities/{top_arg,top_mge,top_colocalizations,top_by_patients}.csv
//! disease_type/<disease>.csv
//! mge_group/<group>.csv
//! colocalizations_by_disease.json (JSON output only)
//! ```

use anyhow::{Context, Result};
use colotrace_core::{EntityKind, EntityRegistry, Graph, PatientId};
use colotrace_index::IndividualTimeline;
use colotrace_query::{
    all_disease_dynamics_counts, disease_status_counts, dynamics_report,
    mge_group_dynamics_counts, patients_by_pair, scenario_pair_rankings, top_k_entities,
    top_pairs_by_frequency_without_donor, GraphStatistics, PairFrequencyReport, ReportConfig,
    ScenarioPairs, TemporalDynamics,
};
use csv::Writer;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const DYNAMICS_HEADER: [&str; 6] = ["ARG_ID", "MGE_ID", "Donor", "Pre", "Post", "PatientCount"];

/// Replace characters that are not allowed in file names
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

/// `dir/name.csv` -> `dir/name_detailed.csv`
pub fn detailed_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{}_detailed.{}", stem, ext.to_string_lossy()),
        None => format!("{}_detailed", stem),
    };
    path.with_file_name(file_name)
}

/// Write a header and rows, creating parent directories as needed
pub fn write_csv<H: AsRef<str>>(path: &Path, header: &[H], rows: &[Vec<String>]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut writer =
        Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(header.iter().map(|h| h.as_ref()))?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "CSV written");
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    out.flush()?;
    Ok(())
}

/// One pair's patient count under one category, for the per-disease JSON export
#[derive(Debug, Clone, Serialize)]
pub struct ColocalizationStatus {
    pub colocalization: String,
    pub status: TemporalDynamics,
    pub patients: usize,
}

/// Writes every report for one analysis run into a directory
pub struct ReportWriter<'a, R: EntityRegistry + ?Sized> {
    dir: PathBuf,
    registry: &'a R,
    config: ReportConfig,
    written: Vec<PathBuf>,
}

impl<'a, R: EntityRegistry + ?Sized> ReportWriter<'a, R> {
    pub fn new(dir: impl Into<PathBuf>, registry: &'a R, config: ReportConfig) -> Self {
        Self {
            dir: dir.into(),
            registry,
            config,
            written: Vec::new(),
        }
    }

    /// Files written so far, in write order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn csv<H: AsRef<str>>(
        &mut self,
        relative: &str,
        header: &[H],
        rows: &[Vec<String>],
    ) -> Result<()> {
        let path = self.dir.join(relative);
        write_csv(&path, header, rows)?;
        self.written.push(path);
        Ok(())
    }

    pub fn json<T: Serialize + ?Sized>(&mut self, relative: &str, value: &T) -> Result<()> {
        let path = self.dir.join(relative);
        write_json(&path, value)?;
        self.written.push(path);
        Ok(())
    }

    pub fn graph_statistics(&mut self, stats: &GraphStatistics) -> Result<()> {
        let row = vec![
            stats.total_nodes.to_string(),
            stats.total_edges.to_string(),
            stats.args.to_string(),
            stats.mges.to_string(),
            stats.colocalization_edges.to_string(),
            stats.temporal_edges.to_string(),
            stats.adjacency_nodes.to_string(),
        ];
        self.csv(
            "graph_statistics.csv",
            &[
                "TotalNodes",
                "TotalEdges",
                "ARGs",
                "MGEs",
                "ColocalizationEdges",
                "TemporalEdges",
                "AdjacencyNodes",
            ],
            &[row],
        )
    }

    /// One file per category: patient counts per pair for each of its scenarios.
    /// Returns the number of individual entries per category.
    pub fn temporal_dynamics(
        &mut self,
        timeline: &IndividualTimeline,
    ) -> Result<BTreeMap<String, usize>> {
        let mut totals = BTreeMap::new();
        for (category, slices) in dynamics_report(timeline) {
            let mut rows = Vec::new();
            let mut detailed = Vec::new();
            for slice in &slices {
                for (pair, patients) in patients_by_pair(&slice.entries) {
                    rows.push(vec![
                        self.registry.arg_display(pair.arg_id),
                        self.registry.mge_display(pair.mge_id),
                        patients.len().to_string(),
                        slice.scenario.label.to_string(),
                    ]);
                }
                for key in slice.entries.keys() {
                    detailed.push(vec![
                        self.registry.arg_display(key.arg_id),
                        self.registry.mge_display(key.mge_id),
                        key.patient_id.to_string(),
                        slice.scenario.label.to_string(),
                    ]);
                }
            }

            let relative = format!("temporal_dynamics/{}.csv", category.name());
            self.csv(&relative, &["ARG_Name", "MGE_Name", "PatientCount", "Label"], &rows)?;
            if self.config.detailed_scenarios {
                let path = detailed_path(&self.dir.join(&relative));
                write_csv(&path, &["ARG_Name", "MGE_Name", "Patient_ID", "Label"], &detailed)?;
                self.written.push(path);
            }

            tracing::info!(
                category = %category,
                entries = detailed.len(),
                pairs = rows.len(),
                "Temporal dynamics written"
            );
            totals.insert(category.name().to_string(), detailed.len());
        }
        Ok(totals)
    }

    pub fn top_entities(&mut self, graph: &Graph) -> Result<()> {
        let top_n = self.config.top_n;

        let rows: Vec<Vec<String>> = top_k_entities(graph, EntityKind::Arg, top_n)
            .into_iter()
            .map(|ranked| {
                vec![
                    ranked.key.to_string(),
                    self.registry.arg_display(ranked.key),
                    self.registry.arg_group(ranked.key).unwrap_or_default().to_string(),
                    ranked.count.to_string(),
                ]
            })
            .collect();
        self.csv(
            "top_entities/top_arg.csv",
            &["ARG_ID", "ARG_Name", "ARG_Group", "Count"],
            &rows,
        )?;

        let rows: Vec<Vec<String>> = top_k_entities(graph, EntityKind::Mge, top_n)
            .into_iter()
            .map(|ranked| {
                vec![
                    ranked.key.to_string(),
                    self.registry.mge_display(ranked.key),
                    ranked.count.to_string(),
                ]
            })
            .collect();
        self.csv("top_entities/top_mge.csv", &["MGE_ID", "MGE_Name", "Count"], &rows)
    }

    /// Pair ranking without donor-only entries, one column per disease
    pub fn top_colocalizations(
        &mut self,
        timeline: &IndividualTimeline,
        diseases: &BTreeMap<PatientId, String>,
    ) -> Result<PairFrequencyReport> {
        let report = top_pairs_by_frequency_without_donor(timeline, self.config.top_n, diseases);

        let mut header: Vec<String> = ["ARG_Name", "ARG_Group", "MGE_Name", "TotalCount"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        header.extend(report.diseases.iter().cloned());

        let rows: Vec<Vec<String>> = report
            .rows
            .iter()
            .map(|row| {
                let mut cells = vec![
                    self.registry.arg_display(row.pair.arg_id),
                    self.registry.arg_group(row.pair.arg_id).unwrap_or_default().to_string(),
                    self.registry.mge_display(row.pair.mge_id),
                    row.total.to_string(),
                ];
                cells.extend(report.diseases.iter().map(|d| row.count_for(d).to_string()));
                cells
            })
            .collect();

        self.csv("top_entities/top_colocalizations.csv", &header, &rows)?;
        Ok(report)
    }

    /// Per-scenario pairs ranked by distinct patients
    pub fn scenario_pairs(&mut self, timeline: &IndividualTimeline) -> Result<Vec<ScenarioPairs>> {
        let scenarios = scenario_pair_rankings(timeline, self.config.top_n);

        let mut rows = Vec::new();
        for entry in &scenarios {
            for ranked in &entry.top {
                rows.push(vec![
                    entry.scenario.label.to_string(),
                    self.registry.arg_display(ranked.key.arg_id),
                    self.registry.arg_group(ranked.key.arg_id).unwrap_or_default().to_string(),
                    self.registry.mge_display(ranked.key.mge_id),
                    ranked.count.to_string(),
                ]);
            }
        }

        self.csv(
            "top_entities/top_by_patients.csv",
            &["Label", "ARG_Name", "ARG_Group", "MGE_Name", "Patients"],
            &rows,
        )?;
        Ok(scenarios)
    }

    /// Disease to `[{colocalization, status, patients}]`, as one JSON document.
    /// Returns the number of diseases written.
    pub fn disease_status_json(
        &mut self,
        timeline: &IndividualTimeline,
        diseases: &BTreeMap<PatientId, String>,
    ) -> Result<usize> {
        let counts = disease_status_counts(timeline, diseases);
        let doc: BTreeMap<&str, Vec<ColocalizationStatus>> = counts
            .iter()
            .map(|(disease, pairs)| {
                let entries = pairs
                    .iter()
                    .flat_map(|(pair, statuses)| {
                        let name = format!(
                            "{}-{}",
                            self.registry.arg_display(pair.arg_id),
                            self.registry.mge_display(pair.mge_id)
                        );
                        statuses.iter().map(move |(status, patients)| ColocalizationStatus {
                            colocalization: name.clone(),
                            status: *status,
                            patients: *patients,
                        })
                    })
                    .collect();
                (disease.as_str(), entries)
            })
            .collect();

        self.json("colocalizations_by_disease.json", &doc)?;
        Ok(doc.len())
    }

    /// One file per disease, post-treatment presence binned by day
    pub fn disease_counts(
        &mut self,
        timeline: &IndividualTimeline,
        diseases: &BTreeMap<PatientId, String>,
    ) -> Result<usize> {
        let all = all_disease_dynamics_counts(timeline, diseases);
        for (disease, counts) in &all {
            let rows: Vec<Vec<String>> = counts
                .iter()
                .map(|(key, count)| {
                    vec![
                        self.registry.arg_display(key.arg_id),
                        self.registry.mge_display(key.mge_id),
                        u8::from(key.donor).to_string(),
                        u8::from(key.pre).to_string(),
                        key.post_column().to_string(),
                        count.to_string(),
                    ]
                })
                .collect();
            let relative = format!("disease_type/{}.csv", sanitize_file_stem(disease));
            self.csv(&relative, &DYNAMICS_HEADER, &rows)?;
        }
        Ok(all.len())
    }

    /// One file per MGE group, post-treatment presence as a flag
    pub fn mge_group_counts(&mut self, timeline: &IndividualTimeline) -> Result<usize> {
        let groups = mge_group_dynamics_counts(timeline, self.registry);
        for (group, counts) in &groups {
            let rows: Vec<Vec<String>> = counts
                .iter()
                .map(|(key, count)| {
                    vec![
                        self.registry.arg_display(key.arg_id),
                        self.registry.mge_display(key.mge_id),
                        u8::from(key.flags.donor).to_string(),
                        u8::from(key.flags.pre).to_string(),
                        u8::from(key.flags.post).to_string(),
                        count.to_string(),
                    ]
                })
                .collect();
            let relative = format!("mge_group/{}.csv", sanitize_file_stem(group));
            self.csv(&relative, &DYNAMICS_HEADER, &rows)?;
        }
        Ok(groups.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("plasmid/IS:26?"), "plasmid_IS_26_");
        assert_eq!(sanitize_file_stem("ICE"), "ICE");
    }

    #[test]
    fn test_detailed_path() {
        assert_eq!(
            detailed_path(Path::new("out/temporal_dynamics/emerge.csv")),
            PathBuf::from("out/temporal_dynamics/emerge_detailed.csv")
        );
        assert_eq!(detailed_path(Path::new("out/emerge")), PathBuf::from("out/emerge_detailed"));
    }

    #[test]
    fn test_csv_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report.csv");
        write_csv(
            &path,
            &["Name", "Count"],
            &[vec!["tet(W/N/W), variant".to_string(), "3".to_string()]],
        )
        .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Name,Count\n\"tet(W/N/W), variant\",3\n");
    }
}

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

//! End-to-end runs of the analysis pipeline over files in a temp directory

use colotrace_cli::{run_analysis, CliConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const REGISTRY: &str = r#"{
    "args": [
        {"id": 1, "label": "MEG_1", "group": "Aminoglycosides", "resistance": "Drugs"},
        {"id": 2, "label": "MEG_2", "group": "Tetracyclines", "resistance": "Drugs"}
    ],
    "mges": [
        {"id": 10, "label": "tn916_1", "name": "Tn916", "group": "ICE"},
        {"id": 20, "label": "IS26"}
    ]
}"#;

const TABLE: &str = "\
Patient,Disease,ARG,MGE,Donor,PreFMT,PostFMT_7,PostFMT_14
1,rCDI,MEG_1,tn916_1,0,1,0,1
2,rCDI,MEG_1,tn916_1,0,1,0,2
5,UC,MEG_2,IS26,1,0,0,0
6,UC,MEG_2,IS26,0,0,1,0
7,UC,MEG_404,IS26,1,1,1,1
";

fn setup(json: bool) -> (TempDir, CliConfig) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("registry.json"), REGISTRY).unwrap();
    fs::write(dir.path().join("table.csv"), TABLE).unwrap();

    let mut config = CliConfig::default();
    config.input.data = dir.path().join("table.csv");
    config.input.registry = dir.path().join("registry.json");
    config.output.dir = dir.path().join("out");
    config.output.json = json;
    (dir, config)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

/// Counts and graph shape for a small cohort
#[test]
fn test_analysis_summary() {
    let (_dir, config) = setup(false);
    let summary = run_analysis(&config).unwrap();

    assert_eq!(summary.ingest.recorded, 6);
    assert_eq!(summary.ingest.skipped, 4);
    assert_eq!(summary.patients, 5);
    assert_eq!(summary.statistics.total_nodes, 8);
    assert_eq!(summary.statistics.colocalization_edges, 4);
    assert_eq!(summary.statistics.temporal_edges, 2);
    assert_eq!(summary.statistics.adjacency_nodes, 8);

    assert_eq!(summary.dynamics["persist"], 2);
    assert_eq!(summary.dynamics["emerge"], 1);
    assert_eq!(summary.dynamics["transfer"], 0);
    assert_eq!(summary.dynamics["disappear"], 0);

    assert_eq!(summary.individual_forward_entries, 4);
    assert_eq!(summary.adjacency_pairs, 2);

    let persisted = summary
        .scenario_pairs
        .iter()
        .find(|s| s.scenario.label == "PreFMT & PostFMT Only")
        .unwrap();
    assert_eq!(persisted.pairs.len(), 1);
    assert_eq!(persisted.pairs[0].pair.arg_id, 1);
    assert_eq!(persisted.pairs[0].patients.len(), 2);
    assert_eq!(persisted.top[0].count, 2);

    // Pooled, MEG_2/IS26 is donor and post, but neither patient has both
    let transferred = summary
        .scenario_pairs
        .iter()
        .find(|s| s.scenario.label == "Donor & PostFMT Only")
        .unwrap();
    assert!(transferred.pairs.is_empty());
}

/// Report files use the expected headers and registry names
#[test]
fn test_report_files() {
    let (dir, config) = setup(false);
    run_analysis(&config).unwrap();
    let out = dir.path().join("out");

    let stats = read(&out.join("graph_statistics.csv"));
    assert_eq!(
        stats,
        "TotalNodes,TotalEdges,ARGs,MGEs,ColocalizationEdges,TemporalEdges,AdjacencyNodes\n8,6,4,4,4,2,8\n"
    );

    let persist = read(&out.join("temporal_dynamics/persist.csv"));
    assert_eq!(
        persist,
        "ARG_Name,MGE_Name,PatientCount,Label\nMEG_1,Tn916,2,PreFMT & PostFMT Only\n"
    );
    let detailed = read(&out.join("temporal_dynamics/persist_detailed.csv"));
    assert_eq!(detailed.lines().count(), 3);

    // Patient 5 is donor-only and appears in no category file
    for name in ["emerge", "disappear", "transfer", "persist"] {
        let text = read(&out.join(format!("temporal_dynamics/{}_detailed.csv", name)));
        assert!(!text.lines().any(|line| line.contains(",5,")), "{}", name);
    }

    let top = read(&out.join("top_entities/top_colocalizations.csv"));
    let mut lines = top.lines();
    assert_eq!(lines.next(), Some("ARG_Name,ARG_Group,MGE_Name,TotalCount,UC,rCDI"));
    assert_eq!(lines.next(), Some("MEG_1,Aminoglycosides,Tn916,2,0,2"));
    assert_eq!(lines.next(), Some("MEG_2,Tetracyclines,IS26,1,1,0"));

    let rcdi = read(&out.join("disease_type/rCDI.csv"));
    assert_eq!(
        rcdi,
        "ARG_ID,MGE_ID,Donor,Pre,Post,PatientCount\nMEG_1,Tn916,0,1,1,2\n"
    );

    let by_patients = read(&out.join("top_entities/top_by_patients.csv"));
    assert_eq!(
        by_patients,
        "Label,ARG_Name,ARG_Group,MGE_Name,Patients\n\
         PreFMT & PostFMT Only,MEG_1,Aminoglycosides,Tn916,2\n"
    );

    assert!(out.join("mge_group/ICE.csv").exists());
    assert!(out.join("mge_group/Unknown.csv").exists());
    assert!(!out.join("summary.json").exists());
    assert!(!out.join("colocalizations_by_disease.json").exists());
}

/// JSON output adds the graph snapshot and a summary document
#[test]
fn test_json_output() {
    let (dir, config) = setup(true);
    let summary = run_analysis(&config).unwrap();
    let out = dir.path().join("out");

    let graph: serde_json::Value = serde_json::from_str(&read(&out.join("graph.json"))).unwrap();
    assert_eq!(graph["nodes"].as_array().map(Vec::len), Some(8));
    assert_eq!(graph["edges"].as_array().map(Vec::len), Some(6));

    let doc: serde_json::Value = serde_json::from_str(&read(&out.join("summary.json"))).unwrap();
    assert_eq!(doc["statistics"]["total_edges"], 6);
    assert_eq!(doc["top_colocalizations"]["diseases"][1], "rCDI");
    let persisted = &doc["scenario_pairs"][4];
    assert_eq!(persisted["scenario"]["label"], "PreFMT & PostFMT Only");
    assert_eq!(persisted["pairs"][0]["patients"], serde_json::json!([1, 2]));

    let by_disease: serde_json::Value =
        serde_json::from_str(&read(&out.join("colocalizations_by_disease.json"))).unwrap();
    assert_eq!(
        by_disease,
        serde_json::json!({
            "UC": [{"colocalization": "MEG_2-IS26", "status": "emerged", "patients": 1}],
            "rCDI": [{"colocalization": "MEG_1-Tn916", "status": "persisted", "patients": 2}],
        })
    );
    assert!(summary.files.iter().any(|p| p.ends_with("summary.json")));
}

/// A patient whose row has no filled timepoint cells still counts toward its disease
#[test]
fn test_patient_without_observations() {
    let (dir, mut config) = setup(false);
    fs::write(dir.path().join("extra.csv"), format!("{}8,CD,MEG_1,tn916_1,,,,\n", TABLE)).unwrap();
    config.input.data = dir.path().join("extra.csv");

    let summary = run_analysis(&config).unwrap();
    assert_eq!(summary.patients, 6);
    assert_eq!(summary.ingest.recorded, 6);

    let cd = read(&dir.path().join("out/disease_type/CD.csv"));
    assert_eq!(cd, "ARG_ID,MGE_ID,Donor,Pre,Post,PatientCount\n");
}

/// A missing registry is an error that names the file
#[test]
fn test_missing_registry() {
    let (dir, mut config) = setup(false);
    config.input.registry = dir.path().join("absent.json");
    let err = run_analysis(&config).unwrap_err();
    assert!(format!("{:#}", err).contains("absent.json"));
}

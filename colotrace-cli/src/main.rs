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

//! Colotrace CLI
//!
//! Builds the temporal colocalization graph from an observation table and
//! writes the analysis reports.

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use colotrace_cli::{build_graph, load_registry, run_analysis, CliConfig, DEFAULT_CONFIG_PATH};
use colotrace_core::{
    filter_by_arg, filter_by_mge, EntityId, EntityKind, EntityRegistry, Timepoint,
};
use colotrace_index::{connected_mges, node_degree_over_time, timeline_for_arg, timeline_for_mge};
use colotrace_query::GraphStatistics;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "colotrace")]
#[command(about = "Colotrace - ARG/MGE colocalization dynamics", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Output as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph and write every report
    Analyze {
        /// Override the configured output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Print graph statistics
    Stats,

    /// Show when an ARG or MGE colocalizes with its partners
    #[command(group(ArgGroup::new("entity").required(true).args(["arg", "mge"])))]
    Timeline {
        /// ARG label
        #[arg(long)]
        arg: Option<String>,

        /// MGE label or display name
        #[arg(long)]
        mge: Option<String>,
    },

    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; RUST_LOG takes precedence over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::InitConfig { force } = &cli.command {
        return init_config(&cli.config, *force, cli.json);
    }

    let mut config = CliConfig::load(&cli.config)
        .context("Failed to load configuration (run `colotrace init-config` to create one)")?;

    match cli.command {
        Commands::InitConfig { .. } => unreachable!(), // Handled above
        Commands::Analyze { output_dir } => {
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            let summary = run_analysis(&config)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("✓ Analysis written to {}", config.output.dir.display());
                println!(
                    "  Observations: {} recorded, {} excluded, {} skipped",
                    summary.ingest.recorded, summary.ingest.excluded, summary.ingest.skipped
                );
                println!(
                    "  Graph: {} nodes, {} edges",
                    summary.statistics.total_nodes, summary.statistics.total_edges
                );
                println!(
                    "  Patients: {}, colocalizations by individual: {}",
                    summary.patients, summary.individual_entries
                );
                for (category, entries) in &summary.dynamics {
                    println!("  {}: {} entries", category, entries);
                }
                println!("  Files: {}", summary.files.len());
            }
        }

        Commands::Stats => {
            let registry = load_registry(&config.input.registry)?;
            let built = build_graph(&config, &registry)?;
            let stats = GraphStatistics::compute(&built.graph, &built.adjacency);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Colotrace Statistics");
                println!("====================");
                println!();
                println!("Nodes: {} ({} ARGs, {} MGEs)", stats.total_nodes, stats.args, stats.mges);
                println!(
                    "Edges: {} ({} colocalization, {} temporal)",
                    stats.total_edges, stats.colocalization_edges, stats.temporal_edges
                );
                println!("Adjacency: {} nodes with links", stats.adjacency_nodes);
                println!("Patients: {}", built.patient_diseases.len());
            }
        }

        Commands::Timeline { arg, mge } => {
            let registry = load_registry(&config.input.registry)?;
            let built = build_graph(&config, &registry)?;

            let (kind, id, partners) = match (arg, mge) {
                (Some(label), _) => {
                    let Some(id) = registry.resolve_arg(&label) else {
                        bail!("Unknown ARG '{}'", label);
                    };
                    (EntityKind::Arg, id, timeline_for_arg(&built.graph, id))
                }
                (None, Some(label)) => {
                    let Some(id) = registry
                        .resolve_mge(&label)
                        .or_else(|| registry.resolve_mge_by_name(&label))
                    else {
                        bail!("Unknown MGE '{}'", label);
                    };
                    (EntityKind::Mge, id, timeline_for_mge(&built.graph, id))
                }
                (None, None) => unreachable!(), // Enforced by the argument group
            };
            let degree = node_degree_over_time(&built.graph, kind, id);
            let subgraph = match kind {
                EntityKind::Arg => filter_by_arg(&built.graph, id),
                EntityKind::Mge => filter_by_mge(&built.graph, id),
            };
            info!(kind = %kind, id, partners = partners.len(), "Timeline computed");

            let partner_name = |partner: EntityId| match kind {
                EntityKind::Arg => registry.mge_display(partner),
                EntityKind::Mge => registry.arg_display(partner),
            };

            if cli.json {
                let partners: BTreeMap<String, &BTreeSet<Timepoint>> = partners
                    .iter()
                    .map(|(partner, tps)| (partner_name(*partner), tps))
                    .collect();
                let doc = serde_json::json!({
                    "kind": kind,
                    "id": id,
                    "partners": partners,
                    "degree": degree,
                    "subgraph": {
                        "nodes": subgraph.node_count(),
                        "edges": subgraph.edge_count(),
                    },
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                let name = match kind {
                    EntityKind::Arg => registry.arg_display(id),
                    EntityKind::Mge => registry.mge_display(id),
                };
                println!("{} {} ({})", kind, name, id);
                println!(
                    "  Subgraph: {} nodes, {} edges",
                    subgraph.node_count(),
                    subgraph.edge_count()
                );
                if kind == EntityKind::Arg {
                    println!("  Connected MGEs: {}", connected_mges(&built.graph, id).len());
                }
                for (partner, tps) in &partners {
                    let labels: Vec<String> = tps.iter().map(|tp| tp.label()).collect();
                    println!("  {}: {}", partner_name(*partner), labels.join(", "));
                }
                println!("  Degree over time:");
                for (tp, count) in &degree {
                    println!("    {}: {}", tp, count);
                }
            }
        }
    }

    Ok(())
}

fn init_config(path: &Path, force: bool, json_output: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let text = CliConfig::default().to_toml()?;
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;

    if json_output {
        println!("{}", serde_json::json!({"path": path.to_string_lossy()}));
    } else {
        println!("✓ Configuration written to {}", path.display());
    }
    Ok(())
}

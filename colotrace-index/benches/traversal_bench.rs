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

//! Traversal benchmarks over a synthetic cohort
//!
//! Run with: cargo bench -p colotrace-index --bench traversal_bench

use colotrace_core::{Graph, GraphBuilder, Node, Timepoint, POST_FMT_DAYS};
use colotrace_index::{
    traverse_adjacency, traverse_graph, traverse_graph_by_individual, traverse_temp_graph,
    AdjacencyIndex,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Deterministic cohort: each patient carries a few ARG-MGE pairs across a few timepoints
fn synthetic_graph(patients: u32) -> Graph {
    let mut builder = GraphBuilder::default();
    let timepoints: Vec<Timepoint> = [Timepoint::Donor, Timepoint::PreFmt]
        .into_iter()
        .chain(POST_FMT_DAYS.iter().take(6).filter_map(|&d| Timepoint::post(d)))
        .collect();

    for patient in 0..patients {
        for pair in 0..4u32 {
            let arg = (patient * 7 + pair * 13) % 200;
            let mge = (patient * 3 + pair * 17) % 80;
            for (i, &tp) in timepoints.iter().enumerate() {
                if (patient as usize + pair as usize + i) % 3 != 0 {
                    builder.add_colocalization_edge(Node::arg(arg, tp), Node::mge(mge, tp), patient);
                }
            }
        }
    }
    builder.finish().graph
}

fn bench_direct_scans(c: &mut Criterion) {
    let mut group = c.benchmark_group("direct_scan");

    for patients in [50u32, 200, 800].iter() {
        let graph = synthetic_graph(*patients);
        let adjacency = AdjacencyIndex::build(&graph);
        group.throughput(Throughput::Elements(graph.edge_count() as u64));

        group.bench_with_input(BenchmarkId::new("by_individual", patients), &graph, |b, graph| {
            b.iter(|| traverse_graph(black_box(graph)));
        });
        group.bench_with_input(BenchmarkId::new("adjacency", patients), &graph, |b, graph| {
            b.iter(|| traverse_adjacency(black_box(graph), &adjacency));
        });
    }

    group.finish();
}

fn bench_forward_bfs(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward_bfs");
    group.sample_size(20);

    for patients in [50u32, 200].iter() {
        let graph = synthetic_graph(*patients);
        let adjacency = AdjacencyIndex::build(&graph);

        group.bench_with_input(BenchmarkId::new("global", patients), &graph, |b, graph| {
            b.iter(|| traverse_temp_graph(black_box(graph), &adjacency));
        });
        group.bench_with_input(BenchmarkId::new("per_patient", patients), &graph, |b, graph| {
            b.iter(|| traverse_graph_by_individual(black_box(graph), &adjacency));
        });
    }

    group.finish();
}

fn bench_adjacency_build(c: &mut Criterion) {
    let graph = synthetic_graph(800);
    c.bench_function("adjacency_build", |b| {
        b.iter(|| AdjacencyIndex::build(black_box(&graph)));
    });
}

criterion_group!(benches, bench_direct_scans, bench_forward_bfs, bench_adjacency_build);
criterion_main!(benches);

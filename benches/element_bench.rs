//! Benchmarks for the co-rotational beam element

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use crbeam::prelude::*;

fn props() -> Properties {
    Properties::from_parts(&Material::steel(), &Section::rectangular(0.3, 0.5))
}

fn create_element() -> ([Node; 2], CrBeam3D2N) {
    let nodes = [Node::new(0.0, 0.0, 0.0), Node::new(4.0, 1.0, 0.5)];
    let mut beam = CrBeam3D2N::new(0, [0, 1], props());
    beam.initialize([&nodes[0], &nodes[1]]).unwrap();
    (nodes, beam)
}

fn create_cantilever(n_elements: usize) -> (BeamModel, NodeId) {
    let mut model = BeamModel::new();
    let nodes: Vec<NodeId> = (0..=n_elements)
        .map(|i| model.add_node(Node::new(10.0 * i as f64 / n_elements as f64, 0.0, 0.0)))
        .collect();
    for pair in nodes.windows(2) {
        model.add_beam(pair, props()).unwrap();
    }
    model.add_support(nodes[0], Support::fixed()).unwrap();
    model.initialize_all().unwrap();
    (model, nodes[n_elements])
}

fn benchmark_local_system(c: &mut Criterion) {
    c.bench_function("local_system_single", |b| {
        let (mut nodes, _) = create_element();
        nodes[1].set_displacement([0.01, -0.02, 0.005, 0.01, 0.02, -0.01]);
        b.iter(|| {
            let (_, mut beam) = create_element();
            let system = beam.compute_local_system([&nodes[0], &nodes[1]]).unwrap();
            black_box(system);
        })
    });
}

fn benchmark_rotating_sequence(c: &mut Criterion) {
    c.bench_function("local_system_10_iterations", |b| {
        b.iter(|| {
            let (mut nodes, mut beam) = create_element();
            for step in 1..=10 {
                let s = step as f64 * 0.02;
                nodes[1].set_displacement([0.0, s, 0.0, 0.0, 0.0, s]);
                black_box(beam.compute_local_system([&nodes[0], &nodes[1]]).unwrap());
            }
        })
    });
}

fn benchmark_cantilever(c: &mut Criterion) {
    c.bench_function("cantilever_10_elements_static", |b| {
        b.iter(|| {
            let (mut model, tip) = create_cantilever(10);
            model
                .add_nodal_load(tip, [0.0, -10000.0, 0.0, 0.0, 0.0, 0.0])
                .unwrap();
            model.solve_static(&AnalysisOptions::new()).unwrap();
            black_box(&model);
        })
    });
}

criterion_group!(
    benches,
    benchmark_local_system,
    benchmark_rotating_sequence,
    benchmark_cantilever,
);

criterion_main!(benches);

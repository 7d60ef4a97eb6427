use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lockstep_fs::{LocalFileSystem, NormalizedPath};
use lockstep_graph::{DependencyGraph, GraphBuilder, ImpactResolver};
use lockstep_test_utils::TestTree;

fn layered_graph(layers: usize, width: usize) -> DependencyGraph {
    let node = |layer: usize, i: usize| NormalizedPath::new(format!("/repo/L{layer}/P{i}/P{i}.csproj"));
    let mut graph = DependencyGraph::new();
    for layer in 0..layers {
        for i in 0..width {
            graph.add_node(node(layer, i));
            if layer > 0 {
                graph.add_edge(node(layer, i), node(layer - 1, i));
                graph.add_edge(node(layer, i), node(layer - 1, (i + 1) % width));
            }
        }
    }
    graph
}

fn impact_benchmark(c: &mut Criterion) {
    let graph = layered_graph(10, 50);
    let target = NormalizedPath::new("/repo/L0/P0/P0.csproj");

    c.bench_function("impact::resolve (500 nodes)", |b| {
        let resolver = ImpactResolver::new(&graph);
        b.iter(|| resolver.resolve(black_box(&target)))
    });
}

fn build_benchmark(c: &mut Criterion) {
    let tree = TestTree::new();
    for i in 0..100 {
        let refs: Vec<String> = (0..i.min(3)).map(|j| format!("../P{}/P{}.csproj", i - j - 1, i - j - 1)).collect();
        let refs: Vec<&str> = refs.iter().map(String::as_str).collect();
        tree.manifest(&format!("P{i}/P{i}.csproj"), &refs);
    }
    let root = tree.root_path();
    let extensions = vec!["csproj".to_string()];

    c.bench_function("graph::build (100 manifests)", |b| {
        b.iter(|| {
            GraphBuilder::new(&LocalFileSystem, &extensions)
                .build(black_box(&root))
                .unwrap()
        })
    });
}

criterion_group!(benches, impact_benchmark, build_benchmark);
criterion_main!(benches);

//! Benchmarks for the forward and backward chainers on the triangle pack.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use khet::infer::{
    run_backward, run_forward, BackwardQuery, ForwardQuery, IndexMode, Structure,
};
use khet::kb::KnowledgeBase;
use khet::seeds::SeedRegistry;

fn triangle() -> (KnowledgeBase, Vec<khet::atom::Atom>) {
    let registry = SeedRegistry::bundled();
    let pack = registry.get("triangle").expect("bundled pack");
    let kb = pack.to_knowledge_base().expect("pack builds");
    (kb, pack.goal_atoms())
}

fn bench_forward(c: &mut Criterion) {
    let (kb, goals) = triangle();
    for structure in [Structure::Stack, Structure::Queue] {
        for index_mode in [IndexMode::Min, IndexMode::Max] {
            let query = ForwardQuery {
                goals: goals.clone(),
                structure,
                index_mode,
                initial_facts: None,
            };
            c.bench_function(&format!("forward_triangle_{structure}_{index_mode}"), |b| {
                b.iter(|| black_box(run_forward(&kb, &query)))
            });
        }
    }
}

fn bench_backward(c: &mut Criterion) {
    let (kb, goals) = triangle();
    for index_mode in [IndexMode::Min, IndexMode::Max] {
        let query = BackwardQuery {
            goals: goals.clone(),
            index_mode,
            initial_facts: None,
        };
        c.bench_function(&format!("backward_triangle_{index_mode}"), |b| {
            b.iter(|| black_box(run_backward(&kb, &query)))
        });
    }
}

criterion_group!(benches, bench_forward, bench_backward);
criterion_main!(benches);

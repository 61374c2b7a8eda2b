//! Benchmark for god-class clustering
//!
//! Synthetic classes made of independent method/field groups, so the
//! expected partition is known and only the cost varies with size.

use cohesionmap::organization::clustering::{
    DistanceMatrix, EntitySet, HierarchicalClustering, MemberId,
};
use cohesionmap::testkit::helpers::{class_with, method_touching};
use cohesionmap::{AnalysisSession, ClassEntity, CohesionConfig, Linkage};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

/// `groups` groups of `methods_per_group` methods, each touching the
/// group's three fields
fn synthetic_class(groups: usize, methods_per_group: usize) -> ClassEntity {
    let name = "bench.Synthetic";
    let mut fields = Vec::new();
    let mut methods = Vec::new();
    for group in 0..groups {
        let group_fields: Vec<String> = (0..3).map(|f| format!("g{group}_f{f}")).collect();
        let refs: Vec<&str> = group_fields.iter().map(String::as_str).collect();
        for m in 0..methods_per_group {
            methods.push(method_touching(name, &format!("g{group}_m{m}"), &refs));
        }
        fields.extend(group_fields);
    }
    let field_refs: Vec<&str> = fields.iter().map(String::as_str).collect();
    class_with(name, &field_refs, methods)
}

fn benchmark_full_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("god_class_analysis");
    group.sample_size(20);

    for groups in [2, 8, 16] {
        let class = synthetic_class(groups, 4);
        let session = AnalysisSession::from_classes(vec![class], CohesionConfig::default())
            .expect("single class registers");

        group.bench_with_input(BenchmarkId::from_parameter(groups), &session, |b, session| {
            b.iter(|| {
                let analysis = session.analyze_class(black_box("bench.Synthetic"));
                black_box(analysis);
            });
        });
    }

    group.finish();
}

fn benchmark_linkages(c: &mut Criterion) {
    let sets: Vec<EntitySet> = (0..120)
        .map(|i| {
            EntitySet::new(MemberId::Method(format!("m{i}")))
                .with_entities((0..4).map(|k| format!("f{}", (i / 6) * 4 + k)))
        })
        .collect();
    let matrix = DistanceMatrix::from_entity_sets(&sets);

    let mut group = c.benchmark_group("clustering_linkage");
    group.sample_size(10);

    for linkage in [Linkage::Single, Linkage::Complete, Linkage::Average] {
        let clustering = HierarchicalClustering::new(0.75, linkage);
        group.bench_function(format!("{linkage:?}"), |b| {
            b.iter(|| black_box(clustering.cluster(black_box(&matrix))));
        });
    }

    group.bench_function("distance_matrix", |b| {
        b.iter(|| black_box(DistanceMatrix::from_entity_sets(black_box(&sets))));
    });

    group.finish();
}

criterion_group!(benches, benchmark_full_analysis, benchmark_linkages);
criterion_main!(benches);

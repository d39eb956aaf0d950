//! Performance measurement for weighted snippet selection at varying pool sizes

// Criterion macros generate undocumented functions
#![allow(missing_docs)]

use std::collections::HashMap;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use loopworld::generation::selection::{TypeWeightMultipliers, select_weighted};
use loopworld::registry::SnippetRegistry;
use loopworld::registry::snippet::SnippetDefinition;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn registry_of_size(pool: usize) -> Option<SnippetRegistry> {
    let mut definitions = vec![SnippetDefinition {
        filename: "empty.png".to_string(),
        connectors: vec![],
        weight: 1,
    }];
    for index in 0..pool {
        definitions.push(SnippetDefinition {
            filename: format!("path_{index}.png"),
            connectors: vec![0, 180],
            weight: (index as u32 % 7) + 1,
        });
    }
    let masks: HashMap<String, Array2<bool>> = definitions
        .iter()
        .map(|def| (def.filename.clone(), Array2::from_elem((4, 4), false)))
        .collect();
    SnippetRegistry::load(&definitions, &masks).ok()
}

/// Measures a single weighted draw as the candidate pool grows
fn bench_select_weighted(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_weighted");
    let multipliers = TypeWeightMultipliers::default();

    for &pool in &[4_usize, 32, 256] {
        let Some(registry) = registry_of_size(pool) else {
            group.finish();
            return;
        };
        let candidates: Vec<usize> = (1..=pool).collect();
        group.bench_with_input(BenchmarkId::from_parameter(pool), &pool, |b, _| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| {
                black_box(select_weighted(
                    black_box(&candidates),
                    &registry,
                    &multipliers,
                    &mut rng,
                ))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_select_weighted);
criterion_main!(benches);

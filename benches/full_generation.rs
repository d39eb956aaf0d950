//! Performance measurement for complete generation runs at varying branch density

// Criterion macros generate undocumented functions
#![allow(missing_docs)]

use std::collections::HashMap;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use loopworld::generation::executor::{GenerationConfig, WorldGenerator};
use loopworld::registry::SnippetRegistry;
use loopworld::registry::snippet::SnippetDefinition;
use ndarray::Array2;

fn bench_registry() -> Option<SnippetRegistry> {
    let tile_set: [(&str, &[u16], u32); 6] = [
        ("empty.png", &[], 1),
        ("cap.png", &[0], 1),
        ("straight.png", &[0, 180], 4),
        ("corner.png", &[0, 90], 3),
        ("tee.png", &[0, 90, 180], 2),
        ("cross.png", &[0, 90, 180, 270], 1),
    ];
    let definitions: Vec<SnippetDefinition> = tile_set
        .iter()
        .map(|&(filename, connectors, weight)| SnippetDefinition {
            filename: filename.to_string(),
            connectors: connectors.to_vec(),
            weight,
        })
        .collect();
    let masks: HashMap<String, Array2<bool>> = tile_set
        .iter()
        .map(|&(filename, _, _)| (filename.to_string(), Array2::from_elem((16, 16), false)))
        .collect();
    SnippetRegistry::load(&definitions, &masks).ok()
}

/// Measures full generation cost as branch probability increases
fn bench_generate(c: &mut Criterion) {
    let Some(registry) = bench_registry() else {
        return;
    };
    let mut group = c.benchmark_group("generate");

    for &branch_percent in &[0, 40, 100] {
        let config = GenerationConfig {
            seed: 42,
            branch_probability: f64::from(branch_percent) / 100.0,
            ..GenerationConfig::default()
        };
        let Ok(generator) = WorldGenerator::new(&registry, config) else {
            group.finish();
            return;
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(branch_percent),
            &branch_percent,
            |b, _| {
                b.iter(|| black_box(generator.generate()));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);

//! Weighted snippet selection
//!
//! Selection is a single weighted draw over a candidate pool, with optional
//! per-kind multipliers so a configuration can favor plain path pieces over
//! junctions. One RNG call per draw keeps worlds reproducible: the RNG
//! stream consumed by a generation run depends only on seed, configuration,
//! and registry order.

use rand::Rng;
use rand::rngs::StdRng;

use crate::registry::SnippetRegistry;
use crate::registry::snippet::SnippetKind;

/// Per-kind scaling applied on top of base snippet weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeWeightMultipliers {
    /// Multiplier for single-connector snippets
    pub dead_end: f64,
    /// Multiplier for two-connector snippets
    pub path: f64,
    /// Multiplier for three- and four-connector snippets
    pub junction: f64,
}

impl Default for TypeWeightMultipliers {
    fn default() -> Self {
        Self {
            dead_end: 1.0,
            path: 1.0,
            junction: 1.0,
        }
    }
}

impl TypeWeightMultipliers {
    /// Multiplier for a snippet kind
    ///
    /// The empty tile is written by repair passes, never drawn, so its
    /// multiplier is zero.
    pub const fn for_kind(&self, kind: SnippetKind) -> f64 {
        match kind {
            SnippetKind::Empty => 0.0,
            SnippetKind::DeadEnd => self.dead_end,
            SnippetKind::Path => self.path,
            SnippetKind::Junction => self.junction,
        }
    }
}

/// Draw one snippet index from `candidates` by effective weight
///
/// Effective weight is the snippet's base weight times its kind multiplier.
/// When the total effective weight is zero the draw falls back to a uniform
/// choice over the pool. Returns `None` only for an empty pool.
pub fn select_weighted(
    candidates: &[usize],
    registry: &SnippetRegistry,
    multipliers: &TypeWeightMultipliers,
    rng: &mut StdRng,
) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }

    let weights: Vec<f64> = candidates
        .iter()
        .map(|&index| {
            registry.get(index).map_or(0.0, |snippet| {
                f64::from(snippet.weight) * multipliers.for_kind(snippet.kind)
            })
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        let uniform = rng.random_range(0..candidates.len());
        return candidates.get(uniform).copied();
    }

    let mut remaining = rng.random::<f64>() * total;
    for (&candidate, &weight) in candidates.iter().zip(&weights) {
        remaining -= weight;
        if remaining <= 0.0 {
            return Some(candidate);
        }
    }
    candidates.last().copied()
}

#[cfg(test)]
mod tests {
    use super::{TypeWeightMultipliers, select_weighted};
    use crate::registry::SnippetRegistry;
    use crate::registry::snippet::SnippetDefinition;
    use ndarray::Array2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn registry(weights: &[(&str, &[u16], u32)]) -> SnippetRegistry {
        let definitions: Vec<SnippetDefinition> = weights
            .iter()
            .map(|&(filename, connectors, weight)| SnippetDefinition {
                filename: filename.to_string(),
                connectors: connectors.to_vec(),
                weight,
            })
            .collect();
        let masks: HashMap<String, Array2<bool>> = weights
            .iter()
            .map(|&(filename, _, _)| (filename.to_string(), Array2::from_elem((4, 4), false)))
            .collect();
        SnippetRegistry::load(&definitions, &masks).unwrap()
    }

    #[test]
    fn test_selection_is_deterministic_per_seed() {
        let registry = registry(&[
            ("empty.png", &[], 1),
            ("a.png", &[0, 180], 3),
            ("b.png", &[0, 90], 5),
            ("c.png", &[0], 2),
        ]);
        let candidates = [1, 2, 3];
        let multipliers = TypeWeightMultipliers::default();

        let mut first = StdRng::seed_from_u64(9);
        let mut second = StdRng::seed_from_u64(9);
        for _ in 0..32 {
            assert_eq!(
                select_weighted(&candidates, &registry, &multipliers, &mut first),
                select_weighted(&candidates, &registry, &multipliers, &mut second),
            );
        }
    }

    #[test]
    fn test_zero_total_weight_falls_back_to_uniform() {
        let registry = registry(&[
            ("empty.png", &[], 1),
            ("a.png", &[0, 180], 0),
            ("b.png", &[0, 90], 0),
        ]);
        let candidates = [1, 2];
        let multipliers = TypeWeightMultipliers::default();
        let mut rng = StdRng::seed_from_u64(3);

        let mut seen = [false, false];
        for _ in 0..64 {
            match select_weighted(&candidates, &registry, &multipliers, &mut rng) {
                Some(1) => seen[0] = true,
                Some(2) => seen[1] = true,
                other => unreachable!("unexpected selection {other:?}"),
            }
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn test_empty_pool_yields_none() {
        let registry = registry(&[("empty.png", &[], 1)]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            select_weighted(&[], &registry, &TypeWeightMultipliers::default(), &mut rng),
            None
        );
    }

    #[test]
    fn test_kind_multiplier_can_exclude_junctions() {
        let registry = registry(&[
            ("empty.png", &[], 1),
            ("path.png", &[0, 180], 1),
            ("junction.png", &[0, 90, 180, 270], 100),
        ]);
        let multipliers = TypeWeightMultipliers {
            junction: 0.0,
            ..TypeWeightMultipliers::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..32 {
            assert_eq!(
                select_weighted(&[1, 2], &registry, &multipliers, &mut rng),
                Some(1)
            );
        }
    }
}

//! Bounded branch growth off the main path
//!
//! Branches are grown from an explicit worklist of pending placements rather
//! than by recursion, so the traversal order is a plain data structure and
//! depth bounds never meet the call stack. Each task records where the branch
//! is growing from, in which direction, at what depth, and whether the
//! placement is a mandatory obligation (a connector on an earlier cell that
//! must not be left dangling).

use rand::Rng;
use rand::rngs::StdRng;

use crate::generation::executor::GenerationConfig;
use crate::generation::selection::select_weighted;
use crate::io::error::{GenerationError, Result};
use crate::registry::SnippetRegistry;
use crate::spatial::WorldMap;
use crate::spatial::cell::Cell;
use crate::spatial::direction::{Direction, Rotation};

/// One pending branch placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchTask {
    /// Cell the branch grows out of
    pub from: [i32; 2],
    /// Growth direction from `from`
    pub direction: Direction,
    /// Depth of the placement (main path is depth 0)
    pub depth: u32,
    /// Whether this placement must terminate in a dead-end if at all possible
    pub forced: bool,
}

/// Grow branches from every main-path cell
///
/// Seeds one task per free neighbor direction of each main-path cell at
/// `branch_probability`, then drains the worklist depth-first. Placement
/// order is fully determined by the seeded RNG and the fixed direction
/// enumeration, so identical inputs grow identical branch trees.
///
/// # Errors
///
/// Returns an error when a required connector has an empty candidate pool
/// and no dead-end snippet can be rotated into place.
pub fn generate_branches(
    world: &mut WorldMap,
    registry: &SnippetRegistry,
    config: &GenerationConfig,
    rng: &mut StdRng,
) -> Result<()> {
    let mut tasks: Vec<BranchTask> = Vec::new();
    let seeds: Vec<[i32; 2]> = world.main_path().to_vec();
    for coord in seeds {
        for direction in Direction::ALL {
            if world.contains(direction.step(coord)) {
                continue;
            }
            if rng.random::<f64>() < config.branch_probability {
                tasks.push(BranchTask {
                    from: coord,
                    direction,
                    depth: 1,
                    forced: false,
                });
            }
        }
    }

    // LIFO drain grows each seed to completion before starting the next;
    // reverse so the first seeded task is processed first.
    tasks.reverse();
    while let Some(task) = tasks.pop() {
        grow(world, registry, config, rng, &mut tasks, task)?;
    }
    Ok(())
}

/// Place one branch cell and queue its follow-up work
fn grow(
    world: &mut WorldMap,
    registry: &SnippetRegistry,
    config: &GenerationConfig,
    rng: &mut StdRng,
    tasks: &mut Vec<BranchTask>,
    task: BranchTask,
) -> Result<()> {
    if task.depth > config.branch_max_depth {
        // Depth ceiling: nothing is placed, and any connector pointing here
        // is reconciled by the repair passes.
        return Ok(());
    }
    let coord = task.direction.step(task.from);
    if world.contains(coord) {
        // Another branch claimed the coordinate first; if its connectors do
        // not point back, repair reconciles the seam.
        return Ok(());
    }

    let back = task.direction.opposite();
    let must_dead_end = task.forced
        || task.depth >= config.branch_max_depth
        || rng.random::<f64>() < config.dead_end_probability;

    if must_dead_end {
        if let Some((index, rotation)) = dead_end_exposing(registry, back) {
            let snippet = registry.get(index).ok_or(GenerationError::NoCandidates {
                direction: back,
                position: coord,
            })?;
            world.place(
                coord,
                Cell::place(index, snippet, rotation).at_depth(task.depth),
            );
            return Ok(());
        }
        // No dead-end snippet in the library: fall through to a
        // multi-connector placement whose other connectors become
        // mandatory obligations.
    }

    let pool = registry.candidates_for(back);
    let selected = select_weighted(pool, registry, &config.type_weight_multipliers, rng).ok_or(
        GenerationError::NoCandidates {
            direction: back,
            position: coord,
        },
    )?;
    let snippet = registry
        .get(selected)
        .ok_or(GenerationError::NoCandidates {
            direction: back,
            position: coord,
        })?;
    let cell = Cell::place(selected, snippet, Rotation::R0).at_depth(task.depth);
    world.place(coord, cell);

    // A branch that touches the main path again has rejoined the circuit;
    // stop growing and let repair reconcile the extra connectors.
    if task.depth > 1 {
        let rejoined = Direction::ALL.into_iter().any(|direction| {
            direction != back
                && world
                    .get(direction.step(coord))
                    .is_some_and(|neighbor| neighbor.is_main_path)
        });
        if rejoined {
            return Ok(());
        }
    }

    for direction in cell.connectors.iter() {
        if direction == back {
            continue;
        }
        let target = direction.step(coord);
        if world.contains(target) {
            // Satisfied already if the occupant points back; otherwise the
            // seam is left to the repair passes.
            continue;
        }
        let sub_branch =
            !must_dead_end && rng.random::<f64>() < config.sub_branch_probability;
        tasks.push(BranchTask {
            from: coord,
            direction,
            depth: task.depth + 1,
            forced: !sub_branch,
        });
    }
    Ok(())
}

/// First dead-end snippet and rotation exposing a connector in `direction`
///
/// Dead-ends are scanned in load order and rotations in R0 → R270 order so
/// the choice is deterministic.
fn dead_end_exposing(
    registry: &SnippetRegistry,
    direction: Direction,
) -> Option<(usize, Rotation)> {
    registry.dead_ends().iter().find_map(|&index| {
        registry.get(index).and_then(|snippet| {
            snippet
                .rotation_exposing(direction)
                .map(|rotation| (index, rotation))
        })
    })
}

//! Closed-loop main path construction
//!
//! The primary circuit is planned as coordinates first and placed as cells
//! second. Planning walks a deterministic expanding spiral (right, down,
//! left, up, run length growing every two turns) and then closes the loop
//! with a direct return leg to a coordinate adjacent to the origin, replacing
//! the spiral tail when the natural endpoint cannot reach the origin.
//! Placement then picks a snippet and rotation for every coordinate such that
//! each cell exposes connectors toward both of its circuit neighbors.

use rand::Rng;
use rand::rngs::StdRng;

use crate::generation::selection::{TypeWeightMultipliers, select_weighted};
use crate::io::error::{GenerationError, Result, path_error};
use crate::registry::SnippetRegistry;
use crate::registry::snippet::Snippet;
use crate::spatial::WorldMap;
use crate::spatial::cell::Cell;
use crate::spatial::direction::{Direction, Rotation};

/// Spiral direction cycle: right, down, left, up
const SPIRAL_ORDER: [Direction; 4] = [
    Direction::Right,
    Direction::Bottom,
    Direction::Left,
    Direction::Top,
];

/// Plan the coordinates of a closed circuit of at most `length` cells
///
/// The result starts at the origin `[0, 0]`, visits each coordinate once,
/// steps only between orthogonal neighbors, and ends adjacent to the origin.
/// The spiral encircles the origin after seven steps, so the achievable
/// circuit saturates at eight cells; requests beyond that are closed by
/// replacing the planned tail, and the caller decides whether the shorter
/// circuit still satisfies its configured minimum.
///
/// # Errors
///
/// Returns an error if `length` is below four (no simple grid cycle exists)
/// or no closable prefix remains after tail replacement.
pub fn plan_loop(length: usize) -> Result<Vec<[i32; 2]>> {
    if length < 4 {
        return Err(path_error(format!(
            "a grid circuit needs at least 4 cells, requested {length}"
        )));
    }

    let origin = [0, 0];
    let mut spiral = Vec::with_capacity(length - 1);
    let mut position = origin;
    let mut run_length = 1_usize;
    let mut leg_index = 0_usize;

    // Expanding spiral for length - 2 steps: the origin and the closing cell
    // account for the remainder of the budget.
    'outer: loop {
        for _ in 0..2 {
            let direction = SPIRAL_ORDER
                .get(leg_index % 4)
                .copied()
                .unwrap_or(Direction::Right);
            leg_index += 1;
            for _ in 0..run_length {
                if spiral.len() >= length - 2 {
                    break 'outer;
                }
                position = direction.step(position);
                spiral.push(position);
            }
        }
        run_length += 1;
    }

    // Close the circuit, dropping spiral tail cells until a collision-free
    // return leg exists.
    while let Some(&end) = spiral.last() {
        if spiral.len() >= 3 && is_adjacent(end, origin) {
            let mut ring = Vec::with_capacity(spiral.len() + 1);
            ring.push(origin);
            ring.extend_from_slice(&spiral);
            return Ok(ring);
        }
        for axis_first in [0_usize, 1] {
            if let Some(leg) = return_leg(end, origin, &spiral, axis_first) {
                let mut ring = Vec::with_capacity(spiral.len() + leg.len() + 1);
                ring.push(origin);
                ring.extend_from_slice(&spiral);
                ring.extend_from_slice(&leg);
                return Ok(ring);
            }
        }
        spiral.pop();
    }

    Err(path_error("no closable spiral prefix remains"))
}

const fn is_adjacent(a: [i32; 2], b: [i32; 2]) -> bool {
    (a[0] - b[0]).abs() + (a[1] - b[1]).abs() == 1
}

/// Direct return leg from `from` to any free coordinate adjacent to `origin`
///
/// Walks one axis to zero, then the other, checking occupancy at every step;
/// `axis_first` selects x-then-y (0) or y-then-x (1). Returns the
/// intermediate coordinates excluding `from`, or `None` on collision.
fn return_leg(
    from: [i32; 2],
    origin: [i32; 2],
    occupied: &[[i32; 2]],
    axis_first: usize,
) -> Option<Vec<[i32; 2]>> {
    let mut leg = Vec::new();
    let mut position = from;
    let axes = if axis_first == 0 { [0, 1] } else { [1, 0] };

    for axis in axes {
        loop {
            let (current, target) = if axis == 0 {
                (position[0], origin[0])
            } else {
                (position[1], origin[1])
            };
            if current == target {
                break;
            }
            let delta = if current > target { -1 } else { 1 };
            let next = if axis == 0 {
                [position[0] + delta, position[1]]
            } else {
                [position[0], position[1] + delta]
            };
            if next == origin || occupied.contains(&next) || leg.contains(&next) {
                return None;
            }
            leg.push(next);
            position = next;
            if is_adjacent(position, origin) {
                return Some(leg);
            }
        }
    }

    is_adjacent(position, origin).then_some(leg)
}

/// Plan and place the closed main-path circuit
///
/// Draws the requested circuit length uniformly from
/// `[min_length, max_length]`, plans the coordinates, and walks them placing
/// snippets. Every cell must expose a connector toward both circuit
/// neighbors, and no spare connector may face another circuit coordinate:
/// circuits longer than four cells fold back on themselves, so a spare
/// connector aimed at a non-consecutive circuit cell would demand a
/// reciprocal connector that cell was never constrained to carry, and both
/// ends are inviolable to repair. Candidates come from the two-plus-connector
/// pool, filtered by testing all four rotations. After placement the closure
/// between the last cell and the origin is re-verified explicitly.
///
/// # Errors
///
/// Returns an error if the planned circuit falls short of `min_length`, any
/// placement has no qualifying candidate, or the closure check fails.
pub fn generate_main_path(
    world: &mut WorldMap,
    registry: &SnippetRegistry,
    min_length: usize,
    max_length: usize,
    multipliers: &TypeWeightMultipliers,
    rng: &mut StdRng,
) -> Result<()> {
    let length = if min_length >= max_length {
        min_length
    } else {
        rng.random_range(min_length..=max_length)
    };

    // Odd requests close short (a 5-cell request yields a 4-ring), so keep
    // planning longer circuits before declaring the minimum unsatisfiable.
    let mut ring = plan_loop(length)?;
    let mut requested = length;
    while ring.len() < min_length && requested < max_length {
        requested += 1;
        ring = plan_loop(requested)?;
    }
    if ring.len() < min_length {
        return Err(path_error(format!(
            "closable circuit has {} cells, below the configured minimum {min_length}",
            ring.len()
        )));
    }

    let count = ring.len();
    for (index, &coord) in ring.iter().enumerate() {
        let prev = ring
            .get((index + count - 1) % count)
            .copied()
            .unwrap_or_default();
        let next = ring.get((index + 1) % count).copied().unwrap_or_default();
        let toward_prev = Direction::between(coord, prev)
            .ok_or_else(|| path_error("planned circuit is not orthogonally contiguous"))?;
        let toward_next = Direction::between(coord, next)
            .ok_or_else(|| path_error("planned circuit is not orthogonally contiguous"))?;

        let (snippet_index, rotation) = place_circuit_cell(
            registry,
            &ring,
            coord,
            toward_prev,
            toward_next,
            multipliers,
            rng,
        )?;

        let snippet = registry
            .get(snippet_index)
            .ok_or_else(|| path_error("selected snippet index is out of range"))?;
        world.place(coord, Cell::place(snippet_index, snippet, rotation).on_main_path());
    }

    verify_closure(world, &ring)
}

/// Whether a rotated snippet can occupy a circuit coordinate
///
/// The effective connectors must cover both circuit directions, and every
/// spare connector must face a coordinate outside the circuit. Spare
/// connectors into open terrain are fine: the repair passes cap or serve
/// them, but another circuit cell cannot be rewritten to reciprocate.
fn rotation_fits(
    snippet: &Snippet,
    rotation: Rotation,
    coord: [i32; 2],
    toward_prev: Direction,
    toward_next: Direction,
    ring: &[[i32; 2]],
) -> bool {
    let effective = snippet.connectors.rotated(rotation);
    effective.contains(toward_prev)
        && effective.contains(toward_next)
        && effective.iter().all(|direction| {
            direction == toward_prev
                || direction == toward_next
                || !ring.contains(&direction.step(coord))
        })
}

/// Select a snippet and rotation for one circuit coordinate
///
/// Candidates are the two-plus-connector pool; for each, the first rotation
/// in `R0..R270` order that fits the circuit is kept, then the winner is
/// drawn by weight.
fn place_circuit_cell(
    registry: &SnippetRegistry,
    ring: &[[i32; 2]],
    coord: [i32; 2],
    toward_prev: Direction,
    toward_next: Direction,
    multipliers: &TypeWeightMultipliers,
    rng: &mut StdRng,
) -> Result<(usize, Rotation)> {
    let mut qualifying = Vec::new();
    let mut rotations = Vec::new();
    for candidate in registry.with_min_connectors(2) {
        let Some(snippet) = registry.get(candidate) else {
            continue;
        };
        let rotation = Rotation::ALL.into_iter().find(|&rotation| {
            rotation_fits(snippet, rotation, coord, toward_prev, toward_next, ring)
        });
        if let Some(rotation) = rotation {
            qualifying.push(candidate);
            rotations.push((candidate, rotation));
        }
    }

    let selected = select_weighted(&qualifying, registry, multipliers, rng).ok_or(
        GenerationError::NoCandidates {
            direction: toward_prev,
            position: coord,
        },
    )?;
    let rotation = rotations
        .iter()
        .find(|(candidate, _)| *candidate == selected)
        .map_or(Rotation::R0, |&(_, rotation)| rotation);
    Ok((selected, rotation))
}

/// Re-verify bidirectional connectors between the circuit's last cell and
/// the origin
///
/// Placement constrains each cell against its planned neighbors, but this
/// final check is kept explicit so a planning defect surfaces as an error
/// instead of a silently broken circuit.
fn verify_closure(world: &WorldMap, ring: &[[i32; 2]]) -> Result<()> {
    let (Some(&origin), Some(&last)) = (ring.first(), ring.last()) else {
        return Err(path_error("planned circuit is empty"));
    };
    let toward_origin = Direction::between(last, origin)
        .ok_or_else(|| path_error("circuit end is not adjacent to the origin"))?;

    if world.connected(last, toward_origin) && world.connected(origin, toward_origin.opposite()) {
        Ok(())
    } else {
        Err(path_error(
            "circuit closure lacks a bidirectional connector pair",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::plan_loop;

    fn assert_simple_cycle(ring: &[[i32; 2]]) {
        assert!(ring.len() >= 4);
        for (index, &coord) in ring.iter().enumerate() {
            let next = ring[(index + 1) % ring.len()];
            let manhattan = (coord[0] - next[0]).abs() + (coord[1] - next[1]).abs();
            assert_eq!(manhattan, 1, "non-adjacent step {coord:?} -> {next:?}");
        }
        let mut unique: Vec<[i32; 2]> = ring.to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), ring.len(), "circuit revisits a coordinate");
    }

    #[test]
    fn test_minimal_plan_is_a_two_by_two_ring() {
        let ring = plan_loop(4).unwrap();
        assert_eq!(ring, vec![[0, 0], [1, 0], [1, 1], [0, 1]]);
    }

    #[test]
    fn test_planned_circuits_are_simple_cycles() {
        for length in 4..=16 {
            let ring = plan_loop(length).unwrap();
            assert_simple_cycle(&ring);
            assert!(ring.len() <= length);
        }
    }

    #[test]
    fn test_tiny_lengths_are_rejected() {
        assert!(plan_loop(3).is_err());
        assert!(plan_loop(0).is_err());
    }

    #[test]
    fn test_long_requests_saturate_at_the_enclosing_spiral() {
        // Once the spiral claims all four origin-adjacent cells, the tail
        // replacement can only close earlier prefixes.
        let ring = plan_loop(64).unwrap();
        assert_simple_cycle(&ring);
        assert_eq!(ring.len(), 8);
    }
}

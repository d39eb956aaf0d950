//! Post-generation invariant repair
//!
//! Generation leaves seams: connectors pointing at nothing, branch cells that
//! collided mid-growth, regions the player could never reach. The repair
//! passes run in a fixed order over the whole placed region and rewrite cells
//! until the global invariant holds: every effective connector faces a
//! neighbor carrying the opposite connector, and no connector faces past the
//! padded border. Each pass is idempotent; ordering matters because border
//! construction and connector reconciliation create work for the later
//! passes. Failures inside a pass degrade to warnings, never to an abort.

use std::collections::VecDeque;

use bitvec::vec::BitVec;

use crate::io::configuration::{BORDER_MARGIN, MAX_CLUSTER_SWEEPS, MAX_RECONCILE_SWEEPS};
use crate::registry::SnippetRegistry;
use crate::spatial::WorldMap;
use crate::spatial::cell::Cell;
use crate::spatial::direction::{Direction, DirectionSet};

/// A repair pass fallback that could not fully satisfy its invariant
///
/// Non-fatal by design: the pass applies its next-best strategy and
/// generation continues. Warnings are logged when raised and collected for
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairWarning {
    /// An empty cell still has fewer than two empty orthogonal neighbors
    ClusterUnsatisfied {
        /// Coordinate of the under-clustered empty cell
        position: [i32; 2],
    },
    /// Connector reconciliation hit its sweep cap before reaching a fixpoint
    ReconcileSweepLimit {
        /// Mismatches still open when the cap was hit
        remaining: usize,
    },
    /// A main-path cell is involved in a violation repair may not touch
    MainPathConflict {
        /// Coordinate of the inviolable cell
        position: [i32; 2],
        /// Connector direction of the violation
        direction: Direction,
    },
}

impl std::fmt::Display for RepairWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClusterUnsatisfied { position } => {
                write!(
                    f,
                    "empty cell at ({}, {}) kept fewer than two empty neighbors",
                    position[0], position[1]
                )
            }
            Self::ReconcileSweepLimit { remaining } => {
                write!(
                    f,
                    "connector reconciliation capped with {remaining} mismatches open"
                )
            }
            Self::MainPathConflict {
                position,
                direction,
            } => {
                write!(
                    f,
                    "main-path cell at ({}, {}) has an unrepairable {direction} connector",
                    position[0], position[1]
                )
            }
        }
    }
}

/// Outcome summary of a full repair run
#[derive(Debug, Clone, Default)]
pub struct RepairReport {
    /// Warnings raised by fallback strategies
    pub warnings: Vec<RepairWarning>,
    /// Empty cells added by border construction
    pub border_cells: usize,
    /// Cells rewritten because a connector pointed past the region
    pub trimmed: usize,
    /// Cells rewritten to reconcile connector mismatches
    pub reconciled: usize,
    /// Empty cells added or converted for clustering
    pub clustered: usize,
    /// Unreachable connector cells converted to empty
    pub unreachable: usize,
    /// Empty cells added by the final gap sweep
    pub gap_fills: usize,
}

impl RepairReport {
    fn warn(&mut self, warning: RepairWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Run all repair passes in their required order
///
/// The pass sequence is border fill, border-connector trimming, connector
/// reconciliation, empty-tile clustering, reachability enforcement, and the
/// final gap sweep.
pub fn run_repair_passes(world: &mut WorldMap, registry: &SnippetRegistry) -> RepairReport {
    let mut report = RepairReport::default();
    apply_border(world, registry, &mut report);
    trim_border_connectors(world, registry, &mut report);
    reconcile_connectors(world, registry, &mut report);
    cluster_empty_tiles(world, registry, &mut report);
    enforce_reachability(world, registry, &mut report);
    close_gaps(world, registry, &mut report);
    log::debug!(
        "repair: {} border, {} trimmed, {} reconciled, {} clustered, {} unreachable, {} gaps, {} warnings",
        report.border_cells,
        report.trimmed,
        report.reconciled,
        report.clustered,
        report.unreachable,
        report.gap_fills,
        report.warnings.len()
    );
    report
}

/// Pass 1: wrap the generated region in an empty-tile border
fn apply_border(world: &mut WorldMap, registry: &SnippetRegistry, report: &mut RepairReport) {
    let Some(bbox) = world.bounding_box() else {
        return;
    };
    let padded = bbox.expanded(BORDER_MARGIN);
    for coord in padded.iter_coords() {
        if !world.contains(coord) {
            world.overwrite(coord, registry.empty_cell());
            report.border_cells += 1;
        }
    }
}

/// Pass 2: eliminate connectors that would point past the padded region
fn trim_border_connectors(
    world: &mut WorldMap,
    registry: &SnippetRegistry,
    report: &mut RepairReport,
) {
    let Some(bbox) = world.bounding_box() else {
        return;
    };
    for coord in world.coords_sorted() {
        let Some(cell) = world.get(coord).copied() else {
            continue;
        };
        let dangling = cell
            .connectors
            .iter()
            .find(|&direction| !bbox.contains(direction.step(coord)));
        let Some(direction) = dangling else {
            continue;
        };
        if cell.is_main_path {
            report.warn(RepairWarning::MainPathConflict {
                position: coord,
                direction,
            });
            continue;
        }
        world.overwrite(coord, registry.empty_cell().at_depth(cell.branch_depth));
        report.trimmed += 1;
    }
}

/// Pass 3: reconcile every connector facing a non-reciprocating neighbor
///
/// Preferred fix: rewrite the neighbor with a snippet whose effective
/// connectors equal exactly the directions demanded of it (a dead-end when
/// only one connector is demanded). When the neighbor is inviolable or no
/// exact profile exists, the offending cell itself is rewritten without the
/// dangling connector, falling back to the empty snippet. Sweeps repeat to a
/// fixpoint, capped to guarantee termination.
fn reconcile_connectors(
    world: &mut WorldMap,
    registry: &SnippetRegistry,
    report: &mut RepairReport,
) {
    for _ in 0..MAX_RECONCILE_SWEEPS {
        let mut changed = false;
        for coord in world.coords_sorted() {
            let Some(cell) = world.get(coord).copied() else {
                continue;
            };
            for direction in cell.connectors.iter() {
                let neighbor_coord = direction.step(coord);
                let Some(neighbor) = world.get(neighbor_coord).copied() else {
                    // Off the padded region; pass 2 is responsible.
                    continue;
                };
                if neighbor.has_connector(direction.opposite()) {
                    continue;
                }

                if !neighbor.is_main_path
                    && rewrite_to_demand(world, registry, neighbor_coord, neighbor.branch_depth)
                {
                    report.reconciled += 1;
                    changed = true;
                    break;
                }

                if cell.is_main_path {
                    report.warn(RepairWarning::MainPathConflict {
                        position: coord,
                        direction,
                    });
                    continue;
                }
                if !rewrite_to_demand(world, registry, coord, cell.branch_depth) {
                    world.overwrite(coord, registry.empty_cell().at_depth(cell.branch_depth));
                }
                report.reconciled += 1;
                changed = true;
                break;
            }
        }
        if !changed {
            return;
        }
    }

    let remaining = count_mismatches(world);
    if remaining > 0 {
        report.warn(RepairWarning::ReconcileSweepLimit { remaining });
    }
}

/// Rewrite `coord` with a snippet matching exactly the connectors its
/// neighbors demand of it; returns false when no exact profile exists
fn rewrite_to_demand(
    world: &mut WorldMap,
    registry: &SnippetRegistry,
    coord: [i32; 2],
    depth: u32,
) -> bool {
    let demanded: Vec<Direction> = world.demanded_connectors(coord).collect();
    let required = DirectionSet::from_directions(&demanded);
    let Some((index, rotation)) = registry.find_matching(required) else {
        return false;
    };
    let Some(snippet) = registry.get(index) else {
        return false;
    };
    world.overwrite(coord, Cell::place(index, snippet, rotation).at_depth(depth));
    true
}

fn count_mismatches(world: &WorldMap) -> usize {
    world
        .coords_sorted()
        .into_iter()
        .map(|coord| {
            world.get(coord).map_or(0, |cell| {
                cell.connectors
                    .iter()
                    .filter(|&direction| !world.connected(coord, direction))
                    .count()
            })
        })
        .sum()
}

/// Pass 4: ensure every empty cell clusters with at least two empty
/// orthogonal neighbors
///
/// Per under-clustered empty cell, in order: add empty cells at unfilled
/// orthogonal coordinates, then convert adjacent non-essential cells to
/// empty, fewest connectors first. A cell is non-essential when it is not on
/// the main path and no main-path cell points at it; converting one leaves
/// its partners with dangling connectors, so each conversion re-reconciles
/// the partners on the spot. Conversions can expose new under-clustered
/// cells, so sweeps repeat to a fixpoint under a cap, and only cells no
/// sweep could help (every neighbor inviolable) are warned about.
fn cluster_empty_tiles(
    world: &mut WorldMap,
    registry: &SnippetRegistry,
    report: &mut RepairReport,
) {
    for _ in 0..MAX_CLUSTER_SWEEPS {
        let mut changed = false;
        for coord in world.coords_sorted() {
            if !world.get(coord).is_some_and(Cell::is_empty_tile) {
                continue;
            }
            if empty_neighbor_count(world, coord) >= 2 {
                continue;
            }

            // Orthogonal ring: fill coordinates still missing entirely.
            for direction in Direction::ALL {
                if empty_neighbor_count(world, coord) >= 2 {
                    break;
                }
                let target = direction.step(coord);
                if !world.contains(target) {
                    world.overwrite(target, registry.empty_cell());
                    report.clustered += 1;
                    changed = true;
                }
            }
            if empty_neighbor_count(world, coord) >= 2 {
                continue;
            }

            // Convert the least-connected non-essential neighbors. Branch
            // dead-end caps go first; they cost the least to give up.
            let mut convertible: Vec<([i32; 2], usize)> = Direction::ALL
                .into_iter()
                .filter_map(|direction| {
                    let target = direction.step(coord);
                    world.get(target).and_then(|cell| {
                        (!cell.is_main_path
                            && !cell.is_empty_tile()
                            && !serves_main_path(world, target))
                        .then(|| (target, cell.connectors.len()))
                    })
                })
                .collect();
            convertible.sort_unstable_by_key(|&(_, count)| count);
            for (target, _) in convertible {
                if empty_neighbor_count(world, coord) >= 2 {
                    break;
                }
                convert_and_patch(world, registry, target);
                report.clustered += 1;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    for coord in world.coords_sorted() {
        if world.get(coord).is_some_and(Cell::is_empty_tile)
            && empty_neighbor_count(world, coord) < 2
        {
            report.warn(RepairWarning::ClusterUnsatisfied { position: coord });
        }
    }
}

/// Whether a main-path cell points a connector at `coord`
///
/// Such a cell cannot be converted to empty: the main-path connector would
/// dangle and the main path is inviolable.
fn serves_main_path(world: &WorldMap, coord: [i32; 2]) -> bool {
    Direction::ALL.into_iter().any(|direction| {
        world.get(direction.step(coord)).is_some_and(|neighbor| {
            neighbor.is_main_path && neighbor.has_connector(direction.opposite())
        })
    })
}

/// Convert `coord` to the empty snippet and repair its partners in place
///
/// Every neighbor that pointed at the converted cell is rewritten to its
/// newly demanded connector profile, which drops exactly the connector
/// toward the conversion and keeps the rest matched. A neighbor with no
/// exact profile in the registry is converted too, cascading until every
/// touched cell is matched again.
fn convert_and_patch(world: &mut WorldMap, registry: &SnippetRegistry, coord: [i32; 2]) {
    let mut pending = vec![coord];
    while let Some(current) = pending.pop() {
        let depth = world.get(current).map_or(0, |cell| cell.branch_depth);
        world.overwrite(current, registry.empty_cell().at_depth(depth));
        for direction in Direction::ALL {
            let neighbor = direction.step(current);
            let Some(cell) = world.get(neighbor).copied() else {
                continue;
            };
            if !cell.has_connector(direction.opposite()) || cell.is_main_path {
                continue;
            }
            if !rewrite_to_demand(world, registry, neighbor, cell.branch_depth) {
                pending.push(neighbor);
            }
        }
    }
}

fn empty_neighbor_count(world: &WorldMap, coord: [i32; 2]) -> usize {
    Direction::ALL
        .into_iter()
        .filter(|&direction| {
            world
                .get(direction.step(coord))
                .is_some_and(Cell::is_empty_tile)
        })
        .count()
}

/// Pass 5: convert cells unreachable from the main path to the empty snippet
///
/// Breadth-first traversal from every main-path cell, following only
/// bidirectionally matched connector edges. A connector-bearing cell the
/// traversal never visits cannot be reached by the player, so it is
/// rewritten rather than left dangling.
fn enforce_reachability(
    world: &mut WorldMap,
    registry: &SnippetRegistry,
    report: &mut RepairReport,
) {
    let Some(bbox) = world.bounding_box() else {
        return;
    };
    let width = bbox.width() as usize;
    let height = bbox.height() as usize;
    let index_of = |coord: [i32; 2]| -> Option<usize> {
        bbox.contains(coord).then(|| {
            let x = (coord[0] - bbox.min[0]) as usize;
            let y = (coord[1] - bbox.min[1]) as usize;
            y * width + x
        })
    };

    let mut visited: BitVec = BitVec::repeat(false, width * height);
    let mut queue: VecDeque<[i32; 2]> = VecDeque::new();
    for &coord in world.main_path() {
        if let Some(index) = index_of(coord) {
            if !visited.get(index).is_some_and(|bit| *bit) {
                visited.set(index, true);
                queue.push_back(coord);
            }
        }
    }

    while let Some(coord) = queue.pop_front() {
        for direction in Direction::ALL {
            if !world.connected(coord, direction) {
                continue;
            }
            let neighbor = direction.step(coord);
            if let Some(index) = index_of(neighbor) {
                if !visited.get(index).is_some_and(|bit| *bit) {
                    visited.set(index, true);
                    queue.push_back(neighbor);
                }
            }
        }
    }

    for coord in world.coords_sorted() {
        let orphaned = world.get(coord).is_some_and(|cell| {
            !cell.is_empty_tile()
                && !index_of(coord)
                    .and_then(|index| visited.get(index).map(|bit| *bit))
                    .unwrap_or(false)
        });
        if orphaned {
            let depth = world.get(coord).map_or(0, |cell| cell.branch_depth);
            world.overwrite(coord, registry.empty_cell().at_depth(depth));
            report.unreachable += 1;
        }
    }
}

/// Pass 6: guarantee every cell has neighbors in all four directions
fn close_gaps(world: &mut WorldMap, registry: &SnippetRegistry, report: &mut RepairReport) {
    for coord in world.coords_sorted() {
        for direction in Direction::ALL {
            let target = direction.step(coord);
            if !world.contains(target) {
                world.overwrite(target, registry.empty_cell());
                report.gap_fills += 1;
            }
        }
    }
}

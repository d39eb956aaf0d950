//! Cell value type stored in the world grid
//!
//! A cell is one placement of a snippet at a grid coordinate. Cells are plain
//! values: repair passes "replace" a cell by overwriting the entry in the
//! grid, never by rebinding shared references.

use crate::registry::snippet::Snippet;
use crate::spatial::direction::{Direction, DirectionSet, Rotation};

/// One placed snippet instance
///
/// The effective connector set (snippet connectors rotated by the placement
/// rotation) is cached at construction so adjacency checks never need the
/// registry. Every overwrite goes through [`Cell::place`], which keeps the
/// cache consistent with the snippet and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Index of the snippet in the registry
    pub snippet: usize,
    /// Clockwise rotation applied to the snippet
    pub rotation: Rotation,
    /// Snippet connectors rotated by `rotation`
    pub connectors: DirectionSet,
    /// Whether this cell belongs to the closed main-path circuit
    pub is_main_path: bool,
    /// Branch recursion depth; 0 for main-path and filler cells
    pub branch_depth: u32,
}

impl Cell {
    /// Place `snippet` (identified by its registry index) with `rotation`
    pub fn place(index: usize, snippet: &Snippet, rotation: Rotation) -> Self {
        Self {
            snippet: index,
            rotation,
            connectors: snippet.connectors.rotated(rotation),
            is_main_path: false,
            branch_depth: 0,
        }
    }

    /// Mark the cell as part of the main path
    pub const fn on_main_path(mut self) -> Self {
        self.is_main_path = true;
        self
    }

    /// Record the branch depth the cell was placed at
    pub const fn at_depth(mut self, depth: u32) -> Self {
        self.branch_depth = depth;
        self
    }

    /// Whether the cell exposes a connector in `direction`
    pub const fn has_connector(&self, direction: Direction) -> bool {
        self.connectors.contains(direction)
    }

    /// Whether the cell is the zero-connector empty tile
    pub const fn is_empty_tile(&self) -> bool {
        self.connectors.is_empty()
    }
}

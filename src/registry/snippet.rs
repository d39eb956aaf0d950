//! Snippet definitions and loaded snippet records

use serde::Deserialize;

use crate::registry::geometry::WallPoint;
use crate::spatial::direction::{Direction, DirectionSet, Rotation};

/// One record of the external snippet definition format
///
/// Connector angles use the wire encoding of the definition files:
/// 0 = top, 90 = right, 180 = bottom, 270 = left.
#[derive(Debug, Clone, Deserialize)]
pub struct SnippetDefinition {
    /// Image resource key; the decoded image is supplied under this name
    pub filename: String,
    /// Connector angles in degrees
    pub connectors: Vec<u16>,
    /// Non-negative selection weight
    pub weight: u32,
}

/// Role class derived from a snippet's connector count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetKind {
    /// Zero connectors; the designated filler tile
    Empty,
    /// Exactly one connector; terminates branches
    DeadEnd,
    /// Two connectors; straight or corner path piece
    Path,
    /// Three or four connectors
    Junction,
}

impl SnippetKind {
    /// Classify by connector count
    pub const fn classify(connector_count: usize) -> Self {
        match connector_count {
            0 => Self::Empty,
            1 => Self::DeadEnd,
            2 => Self::Path,
            _ => Self::Junction,
        }
    }
}

/// A loaded tile definition, immutable after registry load
#[derive(Debug, Clone)]
pub struct Snippet {
    /// Definition filename, used as the snippet's identity
    pub id: String,
    /// Unrotated connector set
    pub connectors: DirectionSet,
    /// Base selection weight
    pub weight: u32,
    /// Role class derived from the connector count
    pub kind: SnippetKind,
    /// Boundary points with outward normals, in tile-local pixels
    pub wall_points: Vec<WallPoint>,
}

impl Snippet {
    /// First rotation (R0 → R270) that exposes a connector in `direction`
    pub fn rotation_exposing(&self, direction: Direction) -> Option<Rotation> {
        Rotation::ALL
            .into_iter()
            .find(|&rotation| self.connectors.rotated(rotation).contains(direction))
    }

    /// First rotation whose effective connector set equals `required` exactly
    ///
    /// Used by the repair passes, which must not introduce extra connectors
    /// when rewriting a cell.
    pub fn rotation_matching(&self, required: DirectionSet) -> Option<Rotation> {
        Rotation::ALL
            .into_iter()
            .find(|&rotation| self.connectors.rotated(rotation) == required)
    }
}

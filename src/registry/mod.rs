//! Snippet registry: loading, validation, and connector indexing
//!
//! The registry is immutable after [`SnippetRegistry::load`], which computes
//! wall geometry eagerly for every snippet. Generation and repair treat it as
//! shared read-only state, so no locking is ever needed.

/// Wall geometry extraction and rotation
pub mod geometry;
/// Definition records and loaded snippets
pub mod snippet;

use std::collections::HashMap;

use ndarray::Array2;

use crate::io::error::{GenerationError, Result};
use crate::registry::snippet::{Snippet, SnippetDefinition, SnippetKind};
use crate::spatial::cell::Cell;
use crate::spatial::direction::{Direction, DirectionSet, Rotation};

/// Library of loaded snippets indexed by raw connector direction
#[derive(Debug, Clone)]
pub struct SnippetRegistry {
    snippets: Vec<Snippet>,
    by_connector: [Vec<usize>; 4],
    dead_ends: Vec<usize>,
    empty_index: usize,
    tile_size: usize,
}

impl SnippetRegistry {
    /// Load and validate a snippet library
    ///
    /// `masks` holds the decoded solidity mask for each definition filename,
    /// supplied by the asset-loading collaborator. All masks must be square
    /// and uniformly sized; exactly one definition must declare zero
    /// connectors (the empty tile every repair pass writes).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The definition list is empty
    /// - A definition references an unknown image or an invalid connector angle
    /// - Masks are not square or differ in size
    /// - The library has no, or more than one, zero-connector snippet
    pub fn load(
        definitions: &[SnippetDefinition],
        masks: &HashMap<String, Array2<bool>>,
    ) -> Result<Self> {
        if definitions.is_empty() {
            return Err(GenerationError::EmptyRegistry);
        }

        let mut snippets = Vec::with_capacity(definitions.len());
        let mut tile_size = None;

        for definition in definitions {
            let mask = masks.get(&definition.filename).ok_or_else(|| {
                GenerationError::MissingImage {
                    filename: definition.filename.clone(),
                }
            })?;

            let (rows, cols) = mask.dim();
            if rows != cols || rows == 0 {
                return Err(GenerationError::InvalidDefinition {
                    filename: definition.filename.clone(),
                    reason: format!("image must be square and non-empty, got {cols}x{rows}"),
                });
            }
            match tile_size {
                None => tile_size = Some(rows),
                Some(size) if size != rows => {
                    return Err(GenerationError::InvalidDefinition {
                        filename: definition.filename.clone(),
                        reason: format!("image is {rows}px but the library uses {size}px tiles"),
                    });
                }
                Some(_) => {}
            }

            let mut connectors = DirectionSet::EMPTY;
            for &degrees in &definition.connectors {
                let direction = Direction::from_degrees(degrees).ok_or_else(|| {
                    GenerationError::InvalidDefinition {
                        filename: definition.filename.clone(),
                        reason: format!("connector angle {degrees} is not one of 0/90/180/270"),
                    }
                })?;
                connectors.insert(direction);
            }

            snippets.push(Snippet {
                id: definition.filename.clone(),
                connectors,
                weight: definition.weight,
                kind: SnippetKind::classify(connectors.len()),
                wall_points: geometry::extract_wall_points(mask),
            });
        }

        let empty_indices: Vec<usize> = snippets
            .iter()
            .enumerate()
            .filter(|(_, snippet)| snippet.kind == SnippetKind::Empty)
            .map(|(index, _)| index)
            .collect();
        let empty_index = match empty_indices.as_slice() {
            [] => return Err(GenerationError::MissingEmptySnippet),
            [index] => *index,
            [first, ..] => {
                let id = snippets
                    .get(*first)
                    .map_or_else(String::new, |snippet| snippet.id.clone());
                return Err(GenerationError::InvalidDefinition {
                    filename: id,
                    reason: "library declares more than one zero-connector snippet".to_string(),
                });
            }
        };

        let mut by_connector: [Vec<usize>; 4] = Default::default();
        let mut dead_ends = Vec::new();
        for (index, snippet) in snippets.iter().enumerate() {
            for direction in snippet.connectors.iter() {
                if let Some(pool) = by_connector.get_mut(direction.index()) {
                    pool.push(index);
                }
            }
            if snippet.kind == SnippetKind::DeadEnd {
                dead_ends.push(index);
            }
        }

        Ok(Self {
            snippets,
            by_connector,
            dead_ends,
            empty_index,
            tile_size: tile_size.unwrap_or(0),
        })
    }

    /// Snippet at a registry index
    pub fn get(&self, index: usize) -> Option<&Snippet> {
        self.snippets.get(index)
    }

    /// Number of loaded snippets
    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    /// Whether the registry holds no snippets
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Edge length of every tile image, in pixels
    pub const fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Index of the designated zero-connector snippet
    pub const fn empty_index(&self) -> usize {
        self.empty_index
    }

    /// A freshly built empty-tile cell, used by every repair pass
    pub fn empty_cell(&self) -> Cell {
        // The empty snippet is validated at load, so the lookup cannot miss;
        // fall back to a connector-free cell if it somehow does.
        self.snippets.get(self.empty_index).map_or(
            Cell {
                snippet: self.empty_index,
                rotation: Rotation::R0,
                connectors: DirectionSet::EMPTY,
                is_main_path: false,
                branch_depth: 0,
            },
            |snippet| Cell::place(self.empty_index, snippet, Rotation::R0),
        )
    }

    /// Snippets whose raw (unrotated) connectors include `direction`
    ///
    /// The candidate pool whenever a new cell must connect back toward a
    /// known neighbor.
    pub fn candidates_for(&self, direction: Direction) -> &[usize] {
        self.by_connector
            .get(direction.index())
            .map_or(&[], Vec::as_slice)
    }

    /// All single-connector snippets, in load order
    pub fn dead_ends(&self) -> &[usize] {
        &self.dead_ends
    }

    /// Indices of snippets with at least `minimum` connectors
    pub fn with_min_connectors(&self, minimum: usize) -> Vec<usize> {
        self.snippets
            .iter()
            .enumerate()
            .filter(|(_, snippet)| snippet.connectors.len() >= minimum)
            .map(|(index, _)| index)
            .collect()
    }

    /// First snippet and rotation whose effective connectors equal `required`
    ///
    /// Snippets are scanned in load order and rotations in R0 → R270 order,
    /// so the result is deterministic. Preferring lower connector counts
    /// falls out naturally when callers pass a minimal requirement set.
    pub fn find_matching(&self, required: DirectionSet) -> Option<(usize, Rotation)> {
        self.snippets
            .iter()
            .enumerate()
            .find_map(|(index, snippet)| {
                snippet
                    .rotation_matching(required)
                    .map(|rotation| (index, rotation))
            })
    }
}

//! Sparse world grid keyed by integer coordinates
//!
//! The map owns every placed cell plus the append-only main-path and branch
//! coordinate lists recorded during generation. Adjacency is a pure function
//! of coordinates; there is no pointer graph between cells.

use std::collections::HashMap;

use crate::registry::SnippetRegistry;
use crate::registry::geometry::WallPoint;
use crate::spatial::cell::Cell;
use crate::spatial::direction::Direction;

/// Axis-aligned inclusive bounding box in grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Minimum coordinates (inclusive)
    pub min: [i32; 2],
    /// Maximum coordinates (inclusive)
    pub max: [i32; 2],
}

impl BoundingBox {
    /// Check if a position is within the bounds
    pub const fn contains(&self, pos: [i32; 2]) -> bool {
        pos[0] >= self.min[0]
            && pos[0] <= self.max[0]
            && pos[1] >= self.min[1]
            && pos[1] <= self.max[1]
    }

    /// The box grown by `margin` cells on every side
    pub const fn expanded(&self, margin: i32) -> Self {
        Self {
            min: [self.min[0] - margin, self.min[1] - margin],
            max: [self.max[0] + margin, self.max[1] + margin],
        }
    }

    /// Iterate every coordinate inside the box in reading order
    pub fn iter_coords(&self) -> impl Iterator<Item = [i32; 2]> {
        let (min, max) = (self.min, self.max);
        (min[1]..=max[1]).flat_map(move |y| (min[0]..=max[0]).map(move |x| [x, y]))
    }

    /// Width in cells
    pub const fn width(&self) -> i32 {
        self.max[0] - self.min[0] + 1
    }

    /// Height in cells
    pub const fn height(&self) -> i32 {
        self.max[1] - self.min[1] + 1
    }
}

/// The full coordinate → cell dictionary for one generated world
#[derive(Debug, Clone, Default)]
pub struct WorldMap {
    cells: HashMap<[i32; 2], Cell>,
    main_path: Vec<[i32; 2]>,
    branch_cells: Vec<[i32; 2]>,
}

impl WorldMap {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly generated cell
    ///
    /// Main-path and branch coordinates are appended to their role lists in
    /// placement order; those lists are read-only once generation finishes.
    pub fn place(&mut self, coord: [i32; 2], cell: Cell) {
        if cell.is_main_path {
            self.main_path.push(coord);
        } else if cell.branch_depth > 0 {
            self.branch_cells.push(coord);
        }
        self.cells.insert(coord, cell);
    }

    /// Overwrite a cell during repair without touching the role lists
    pub fn overwrite(&mut self, coord: [i32; 2], cell: Cell) {
        self.cells.insert(coord, cell);
    }

    /// Look up the cell at a coordinate
    pub fn get(&self, coord: [i32; 2]) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    /// Whether a coordinate is occupied
    pub fn contains(&self, coord: [i32; 2]) -> bool {
        self.cells.contains_key(&coord)
    }

    /// Number of placed cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell has been placed yet
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate all placed cells in hash order
    ///
    /// Repair passes must not use this for anything order-sensitive; see
    /// [`Self::coords_sorted`].
    pub fn cells(&self) -> impl Iterator<Item = ([i32; 2], &Cell)> {
        self.cells.iter().map(|(&coord, cell)| (coord, cell))
    }

    /// All occupied coordinates in reading order (y, then x)
    ///
    /// The hash map iteration order is unstable between runs, so every
    /// order-sensitive sweep sorts first to keep worlds seed-reproducible.
    pub fn coords_sorted(&self) -> Vec<[i32; 2]> {
        let mut coords: Vec<[i32; 2]> = self.cells.keys().copied().collect();
        coords.sort_unstable_by_key(|&[x, y]| (y, x));
        coords
    }

    /// Main-path coordinates in circuit order
    pub fn main_path(&self) -> &[[i32; 2]] {
        &self.main_path
    }

    /// Branch coordinates in placement order
    pub fn branch_cells(&self) -> &[[i32; 2]] {
        &self.branch_cells
    }

    /// Minimal box containing every placed cell
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut coords = self.cells.keys();
        let &first = coords.next()?;
        let mut bbox = BoundingBox {
            min: first,
            max: first,
        };
        for &[x, y] in coords {
            bbox.min[0] = bbox.min[0].min(x);
            bbox.min[1] = bbox.min[1].min(y);
            bbox.max[0] = bbox.max[0].max(x);
            bbox.max[1] = bbox.max[1].max(y);
        }
        Some(bbox)
    }

    /// Whether the cell at `coord` is bidirectionally connected in `direction`
    ///
    /// True only when the cell exposes the connector and the neighbor both
    /// exists and points back.
    pub fn connected(&self, coord: [i32; 2], direction: Direction) -> bool {
        let Some(cell) = self.get(coord) else {
            return false;
        };
        if !cell.has_connector(direction) {
            return false;
        }
        self.get(direction.step(coord))
            .is_some_and(|neighbor| neighbor.has_connector(direction.opposite()))
    }

    /// Directions in which neighbors point a connector at `coord`
    ///
    /// This is the connector profile the coordinate is obliged to carry; the
    /// repair passes use it to pick exact replacement snippets.
    pub fn demanded_connectors(&self, coord: [i32; 2]) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&direction| {
            self.get(direction.step(coord))
                .is_some_and(|neighbor| neighbor.has_connector(direction.opposite()))
        })
    }

    /// Wall geometry of the cell at `coord`, translated into world units
    ///
    /// Points are the snippet's cached boundary points rotated by the cell's
    /// placement rotation and offset by the cell origin. This is the sole
    /// interface the collision collaborator consumes.
    pub fn wall_geometry_at(
        &self,
        registry: &SnippetRegistry,
        coord: [i32; 2],
    ) -> Option<Vec<WallPoint>> {
        let cell = self.get(coord)?;
        let snippet = registry.get(cell.snippet)?;
        let size = registry.tile_size() as f32;
        let origin = [coord[0] as f32 * size, coord[1] as f32 * size];
        Some(
            snippet
                .wall_points
                .iter()
                .map(|point| point.rotated(cell.rotation, size).translated(origin))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use ndarray::Array2;

    use crate::registry::SnippetRegistry;
    use crate::registry::snippet::SnippetDefinition;
    use crate::spatial::cell::Cell;
    use crate::spatial::direction::{Direction, Rotation};
    use crate::spatial::world::WorldMap;

    #[test]
    fn test_wall_geometry_is_rotated_and_translated_into_world_units() {
        let definitions = vec![
            SnippetDefinition {
                filename: "empty.png".to_string(),
                connectors: vec![],
                weight: 1,
            },
            SnippetDefinition {
                filename: "wall.png".to_string(),
                connectors: vec![0],
                weight: 1,
            },
        ];
        let mut masks: HashMap<String, Array2<bool>> = HashMap::new();
        masks.insert("empty.png".to_string(), Array2::from_elem((4, 4), false));
        // Left half solid: four boundary points at x = 2.0, normals +x.
        masks.insert(
            "wall.png".to_string(),
            Array2::from_shape_fn((4, 4), |(_, col)| col < 2),
        );
        let registry = SnippetRegistry::load(&definitions, &masks).unwrap();

        let index = *registry
            .candidates_for(Direction::Top)
            .first()
            .expect("wall snippet is indexed under its connector");
        let snippet = registry.get(index).unwrap();

        let mut map = WorldMap::new();
        map.place([2, 1], Cell::place(index, snippet, Rotation::R90));

        let points = map.wall_geometry_at(&registry, [2, 1]).unwrap();
        assert_eq!(points.len(), 4);
        // One clockwise quarter turn sends the +x boundary to y = 2.0 with
        // normals +y; the cell origin offset is [2 * 4, 1 * 4].
        for point in &points {
            assert!((point.position[1] - 6.0).abs() < f32::EPSILON);
            assert!((point.normal[0] - 0.0).abs() < f32::EPSILON);
            assert!((point.normal[1] - 1.0).abs() < f32::EPSILON);
        }
        assert!(
            points
                .iter()
                .any(|point| (point.position[0] - 11.5).abs() < f32::EPSILON),
            "expected the rotated x = 3.5 boundary point at world x = 11.5"
        );

        assert!(map.wall_geometry_at(&registry, [0, 0]).is_none());
    }
}

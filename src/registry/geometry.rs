//! Wall geometry derived from snippet solidity masks
//!
//! Each snippet image decodes to a boolean solidity mask (alpha channel).
//! The boundary between solid and open pixels yields a list of wall points
//! with outward normals, computed once at registry load time and reused for
//! every placement of the snippet.

use ndarray::Array2;

use crate::spatial::direction::{Direction, Rotation};

/// One point on a solid/open pixel boundary, with its outward normal
///
/// Positions are in tile-local pixel units with the origin at the top-left
/// corner of the tile; normals are unit axis vectors pointing out of the
/// solid region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallPoint {
    /// Position inside the tile, in pixels
    pub position: [f32; 2],
    /// Outward unit normal
    pub normal: [f32; 2],
}

impl WallPoint {
    /// The point rotated clockwise about the tile center
    ///
    /// `size` is the tile edge length in pixels. Quarter turns map a point
    /// `(x, y)` to `(size - y, x)` and rotate the normal with it.
    pub fn rotated(&self, rotation: Rotation, size: f32) -> Self {
        let mut position = self.position;
        let mut normal = self.normal;
        for _ in 0..rotation.quarter_turns() {
            position = [size - position[1], position[0]];
            normal = [-normal[1], normal[0]];
        }
        Self { position, normal }
    }

    /// The point shifted by a world-space cell origin
    pub const fn translated(&self, origin: [f32; 2]) -> Self {
        Self {
            position: [self.position[0] + origin[0], self.position[1] + origin[1]],
            normal: self.normal,
        }
    }
}

/// Extract boundary points from a solidity mask
///
/// A point is emitted at the midpoint of every pixel edge separating a solid
/// pixel from an open pixel inside the tile. Tile borders are deliberately
/// silent: they are seams to neighboring tiles, and emitting normals there
/// would wall off every connector opening.
pub fn extract_wall_points(mask: &Array2<bool>) -> Vec<WallPoint> {
    let (rows, cols) = mask.dim();
    let mut points = Vec::new();

    for y in 0..rows {
        for x in 0..cols {
            if !mask.get([y, x]).copied().unwrap_or(false) {
                continue;
            }
            for direction in Direction::ALL {
                let [dx, dy] = direction.offset();
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 0 || ny < 0 || nx >= cols as i32 || ny >= rows as i32 {
                    continue;
                }
                let neighbor_solid = mask
                    .get([ny as usize, nx as usize])
                    .copied()
                    .unwrap_or(false);
                if neighbor_solid {
                    continue;
                }
                points.push(WallPoint {
                    position: [
                        (x as f32) + 0.5 + 0.5 * dx as f32,
                        (y as f32) + 0.5 + 0.5 * dy as f32,
                    ],
                    normal: [dx as f32, dy as f32],
                });
            }
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::{WallPoint, extract_wall_points};
    use crate::spatial::direction::Rotation;
    use ndarray::Array2;

    #[test]
    fn test_solid_block_emits_interior_boundary_only() {
        // 4x4 tile, left half solid: boundary runs down the middle
        let mask = Array2::from_shape_fn((4, 4), |(_, x)| x < 2);
        let points = extract_wall_points(&mask);
        assert_eq!(points.len(), 4);
        for point in &points {
            assert!((point.position[0] - 2.0).abs() < f32::EPSILON);
            assert_eq!(point.normal, [1.0, 0.0]);
        }
    }

    #[test]
    fn test_uniform_masks_have_no_walls() {
        let solid = Array2::from_elem((4, 4), true);
        let open = Array2::from_elem((4, 4), false);
        assert!(extract_wall_points(&solid).is_empty());
        assert!(extract_wall_points(&open).is_empty());
    }

    #[test]
    fn test_rotation_carries_normal_with_position() {
        let point = WallPoint {
            position: [1.0, 2.0],
            normal: [0.0, -1.0],
        };
        let turned = point.rotated(Rotation::R90, 4.0);
        assert_eq!(turned.position, [2.0, 1.0]);
        assert_eq!(turned.normal, [1.0, 0.0]);

        let full = point.rotated(Rotation::R180, 4.0).rotated(Rotation::R180, 4.0);
        assert_eq!(full.position, point.position);
        assert_eq!(full.normal, point.normal);
    }
}

//! PNG export of generated worlds
//!
//! Each cell is rendered at the library's native tile resolution: solid mask
//! pixels become wall color, open pixels become a floor tint that encodes
//! the cell's role, so main path, branches, and empty padding are separable
//! at a glance in the exported map.

use std::collections::HashMap;
use std::path::Path;

use image::{ImageBuffer, Rgba};
use ndarray::Array2;

use crate::io::error::{GenerationError, Result, path_error};
use crate::registry::SnippetRegistry;
use crate::spatial::WorldMap;
use crate::spatial::cell::Cell;

const WALL_COLOR: Rgba<u8> = Rgba([40, 36, 48, 255]);
const MAIN_PATH_FLOOR: Rgba<u8> = Rgba([214, 181, 93, 255]);
const BRANCH_FLOOR: Rgba<u8> = Rgba([145, 168, 120, 255]);
const EMPTY_FLOOR: Rgba<u8> = Rgba([78, 78, 86, 255]);

/// Export a generated world as a PNG image
///
/// The image is cropped to the world's bounding box; `masks` must be the
/// solidity masks the registry was loaded from.
///
/// # Errors
///
/// Returns an error if the world is empty, a cell references a mask that is
/// not in `masks`, the parent directory cannot be created, or the image
/// cannot be written.
pub fn export_world_as_png(
    world: &WorldMap,
    registry: &SnippetRegistry,
    masks: &HashMap<String, Array2<bool>>,
    output_path: &Path,
) -> Result<()> {
    let bbox = world
        .bounding_box()
        .ok_or_else(|| path_error("cannot export an empty world"))?;
    let tile = registry.tile_size();
    let width = bbox.width() as u32 * tile as u32;
    let height = bbox.height() as u32 * tile as u32;
    let mut img = ImageBuffer::new(width, height);

    for (coord, cell) in world.cells() {
        let mask = registry
            .get(cell.snippet)
            .and_then(|snippet| masks.get(&snippet.id))
            .ok_or(GenerationError::MissingImage {
                filename: registry
                    .get(cell.snippet)
                    .map_or_else(String::new, |snippet| snippet.id.clone()),
            })?;

        let floor = floor_color(cell);
        let base_x = (coord[0] - bbox.min[0]) as u32 * tile as u32;
        let base_y = (coord[1] - bbox.min[1]) as u32 * tile as u32;
        for y in 0..tile {
            for x in 0..tile {
                let solid = sample_rotated(mask, cell.rotation.quarter_turns(), x, y, tile);
                let color = if solid { WALL_COLOR } else { floor };
                img.put_pixel(base_x + x as u32, base_y + y as u32, color);
            }
        }
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| GenerationError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source,
            })?;
        }
    }
    img.save(output_path)
        .map_err(|source| GenerationError::ImageExport {
            path: output_path.to_path_buf(),
            source,
        })
}

const fn floor_color(cell: &Cell) -> Rgba<u8> {
    if cell.is_main_path {
        MAIN_PATH_FLOOR
    } else if cell.branch_depth > 0 {
        BRANCH_FLOOR
    } else {
        EMPTY_FLOOR
    }
}

/// Sample a mask as if its image were rotated clockwise by `quarter_turns`
///
/// Masks are indexed `(row, column)`. One clockwise quarter turn maps the
/// rotated pixel `(x, y)` back to source `(y, size - 1 - x)`.
fn sample_rotated(
    mask: &Array2<bool>,
    quarter_turns: usize,
    x: usize,
    y: usize,
    size: usize,
) -> bool {
    let (mut sx, mut sy) = (x, y);
    for _ in 0..quarter_turns {
        let next_x = sy;
        let next_y = size - 1 - sx;
        sx = next_x;
        sy = next_y;
    }
    mask.get((sy, sx)).copied().unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::sample_rotated;
    use ndarray::Array2;

    #[test]
    fn test_quarter_turn_moves_top_edge_to_the_right() {
        // Solid top row only.
        let mask = Array2::from_shape_fn((4, 4), |(row, _)| row == 0);

        // Unrotated: top row solid.
        assert!(sample_rotated(&mask, 0, 2, 0, 4));
        assert!(!sample_rotated(&mask, 0, 2, 3, 4));

        // One clockwise turn: rightmost column solid.
        assert!(sample_rotated(&mask, 1, 3, 2, 4));
        assert!(!sample_rotated(&mask, 1, 0, 2, 4));

        // Two turns: bottom row solid.
        assert!(sample_rotated(&mask, 2, 1, 3, 4));

        // Four turns is the identity.
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(
                    sample_rotated(&mask, 4, x, y, 4),
                    sample_rotated(&mask, 0, x, y, 4)
                );
            }
        }
    }
}

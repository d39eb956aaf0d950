//! Validates loading a snippet library from a definition file and images
//! on disk, including solidity-mask decoding and wall geometry derivation

use image::{Rgba, RgbaImage};
use loopworld::io::definitions::load_library;
use loopworld::spatial::direction::Direction;

fn write_tile(directory: &std::path::Path, name: &str, solid_top_row: bool) {
    let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
    if solid_top_row {
        for x in 0..4 {
            img.put_pixel(x, 0, Rgba([20, 20, 20, 255]));
        }
    }
    img.save(directory.join(name)).unwrap();
}

#[test]
fn test_library_round_trip_from_disk() {
    let directory = tempfile::tempdir().unwrap();
    write_tile(directory.path(), "empty.png", false);
    write_tile(directory.path(), "cap.png", true);

    let definitions_path = directory.path().join("snippets.json");
    std::fs::write(
        &definitions_path,
        r#"[
            {"filename": "empty.png", "connectors": [], "weight": 1},
            {"filename": "cap.png", "connectors": [180], "weight": 3}
        ]"#,
    )
    .unwrap();

    let (registry, masks) = load_library(&definitions_path).unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.tile_size(), 4);
    assert_eq!(registry.empty_index(), 0);
    assert_eq!(registry.candidates_for(Direction::Bottom), &[1]);

    // The opaque top row against the transparent row below yields boundary
    // wall points; the fully transparent tile yields none.
    let cap = registry.get(1).unwrap();
    assert!(!cap.wall_points.is_empty());
    let empty = registry.get(0).unwrap();
    assert!(empty.wall_points.is_empty());

    assert!(masks["cap.png"][(0, 2)]);
    assert!(!masks["cap.png"][(1, 2)]);
}

#[test]
fn test_missing_image_is_reported() {
    let directory = tempfile::tempdir().unwrap();
    let definitions_path = directory.path().join("snippets.json");
    std::fs::write(
        &definitions_path,
        r#"[{"filename": "nowhere.png", "connectors": [], "weight": 1}]"#,
    )
    .unwrap();

    assert!(load_library(&definitions_path).is_err());
}

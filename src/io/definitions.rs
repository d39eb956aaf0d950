//! Snippet definition parsing and image decoding
//!
//! A snippet library on disk is one JSON file listing definitions plus the
//! referenced PNG images in the same directory. The JSON is the authority on
//! connectors and weights; the images only contribute solidity masks, where
//! any pixel with alpha of at least half opacity counts as solid wall.

use std::collections::HashMap;
use std::path::Path;

use image::GenericImageView;
use ndarray::Array2;

use crate::io::error::{GenerationError, Result};
use crate::registry::SnippetRegistry;
use crate::registry::snippet::SnippetDefinition;

/// Alpha threshold above which a pixel is solid
const SOLID_ALPHA: u8 = 128;

/// Parse the snippet definition list from a JSON file
///
/// # Errors
///
/// Returns an error when the file cannot be read or is not a valid JSON
/// array of definitions.
pub fn load_definitions(path: &Path) -> Result<Vec<SnippetDefinition>> {
    let text = std::fs::read_to_string(path).map_err(|source| GenerationError::DefinitionRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| GenerationError::DefinitionParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode the solidity mask of every referenced image
///
/// Images are looked up beside the definition file. Masks are indexed
/// `(row, column)`, matching image y then x.
///
/// # Errors
///
/// Returns an error when a referenced image cannot be opened or decoded.
pub fn load_solidity_masks(
    definitions: &[SnippetDefinition],
    directory: &Path,
) -> Result<HashMap<String, Array2<bool>>> {
    let mut masks = HashMap::with_capacity(definitions.len());
    for definition in definitions {
        if masks.contains_key(&definition.filename) {
            continue;
        }
        let path = directory.join(&definition.filename);
        let decoded = image::open(&path).map_err(|source| GenerationError::ImageLoad {
            path: path.clone(),
            source,
        })?;

        let (width, height) = decoded.dimensions();
        let mask = Array2::from_shape_fn((height as usize, width as usize), |(row, column)| {
            let pixel = decoded.get_pixel(column as u32, row as u32);
            pixel.0.last().copied().unwrap_or(0) >= SOLID_ALPHA
        });
        masks.insert(definition.filename.clone(), mask);
    }
    Ok(masks)
}

/// Load a complete snippet library from a definition file
///
/// Convenience wrapper chaining [`load_definitions`], [`load_solidity_masks`]
/// and [`SnippetRegistry::load`]. Returns the masks alongside the registry so
/// callers can render tiles without re-decoding the images.
///
/// # Errors
///
/// Returns an error when reading, decoding, or registry validation fails.
pub fn load_library(path: &Path) -> Result<(SnippetRegistry, HashMap<String, Array2<bool>>)> {
    let definitions = load_definitions(path)?;
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    let masks = load_solidity_masks(&definitions, directory)?;
    let registry = SnippetRegistry::load(&definitions, &masks)?;
    Ok((registry, masks))
}

#[cfg(test)]
mod tests {
    use super::load_definitions;
    use std::io::Write;

    #[test]
    fn test_definitions_parse_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"filename": "empty.png", "connectors": [], "weight": 1}},
                {{"filename": "corner.png", "connectors": [0, 90], "weight": 5}}
            ]"#
        )
        .unwrap();

        let definitions = load_definitions(file.path()).unwrap();
        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[1].filename, "corner.png");
        assert_eq!(definitions[1].connectors, vec![0, 90]);
        assert_eq!(definitions[1].weight, 5);
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load_definitions(file.path()).is_err());
    }
}

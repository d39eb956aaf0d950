//! Error types for registry loading, generation, and map export

use std::fmt;
use std::path::PathBuf;

use crate::spatial::direction::Direction;

/// Main error type for all world generation operations
#[derive(Debug)]
pub enum GenerationError {
    /// The snippet library contained no definitions at all
    EmptyRegistry,

    /// No zero-connector snippet exists in the library
    ///
    /// Fatal before generation starts: every repair pass writes the empty
    /// snippet, so a registry without one cannot produce a valid world.
    MissingEmptySnippet,

    /// A snippet definition failed validation
    InvalidDefinition {
        /// Filename of the offending definition
        filename: String,
        /// Explanation of what is wrong with it
        reason: String,
    },

    /// A definition references an image no asset collaborator supplied
    MissingImage {
        /// Filename the definition referenced
        filename: String,
    },

    /// The main path or a branch could not be constructed
    ///
    /// Deterministic for a given seed, config, and registry; callers should
    /// treat the combination as unsatisfiable and retry with another seed.
    PathGeneration {
        /// Description of the step that failed
        reason: String,
    },

    /// No snippet offers a required connector at a construction step
    NoCandidates {
        /// Connector direction that could not be satisfied
        direction: Direction,
        /// Grid coordinate of the placement
        position: [i32; 2],
    },

    /// Generation parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to load a snippet image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// Failed to save a generated map image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// A filesystem operation failed
    FileSystem {
        /// Path the operation touched
        path: PathBuf,
        /// Short description of the attempted operation
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Failed to read a snippet definition file
    DefinitionRead {
        /// Path to the definition file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A snippet definition file is not valid JSON
    DefinitionParse {
        /// Path to the definition file
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRegistry => {
                write!(f, "Snippet library contains no definitions")
            }
            Self::MissingEmptySnippet => {
                write!(
                    f,
                    "Snippet library has no zero-connector empty tile; repair passes require one"
                )
            }
            Self::InvalidDefinition { filename, reason } => {
                write!(f, "Invalid snippet definition '{filename}': {reason}")
            }
            Self::MissingImage { filename } => {
                write!(f, "No image was supplied for snippet '{filename}'")
            }
            Self::PathGeneration { reason } => {
                write!(f, "Main path construction failed: {reason}")
            }
            Self::NoCandidates {
                direction,
                position,
            } => {
                write!(
                    f,
                    "No snippet offers a {direction} connector at ({}, {})",
                    position[0], position[1]
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(f, "Failed to {operation} '{}': {source}", path.display())
            }
            Self::DefinitionRead { path, source } => {
                write!(
                    f,
                    "Failed to read definitions '{}': {source}",
                    path.display()
                )
            }
            Self::DefinitionParse { path, source } => {
                write!(
                    f,
                    "Failed to parse definitions '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } | Self::DefinitionRead { source, .. } => Some(source),
            Self::DefinitionParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GenerationError {
    GenerationError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a path generation error
pub fn path_error(reason: impl Into<String>) -> GenerationError {
    GenerationError::PathGeneration {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::{GenerationError, invalid_parameter};
    use crate::spatial::direction::Direction;

    #[test]
    fn test_display_carries_position_and_direction() {
        let err = GenerationError::NoCandidates {
            direction: Direction::Left,
            position: [-3, 7],
        };
        let message = err.to_string();
        assert!(message.contains("left"));
        assert!(message.contains("(-3, 7)"));
    }

    #[test]
    fn test_invalid_parameter_helper() {
        let err = invalid_parameter("branch_probability", &1.5, &"must be in [0, 1]");
        match err {
            GenerationError::InvalidParameter { parameter, .. } => {
                assert_eq!(parameter, "branch_probability");
            }
            _ => unreachable!("Expected InvalidParameter error type"),
        }
    }
}

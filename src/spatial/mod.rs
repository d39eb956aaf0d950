//! Spatial data structures for the generated world
//!
//! This module contains the grid-level building blocks:
//! - Direction and rotation algebra for connector matching
//! - The cell value type and the sparse coordinate map
//! - Chunk partitioning for load/unload streaming

/// Cell value type stored in the grid
pub mod cell;
/// Chunk partitioning and viewer-distance streaming
pub mod chunk;
/// Direction, rotation, and connector-set algebra
pub mod direction;
/// Sparse world map and bounding boxes
pub mod world;

pub use world::WorldMap;

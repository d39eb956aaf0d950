//! Fixed-size chunk partition for load/unload streaming
//!
//! Chunks carry no generation semantics; they only tell downstream consumers
//! (rendering, collision, spawning) which part of the world is near the
//! viewer. The loaded flags are recomputed in full on every viewer update,
//! trading a small constant cost for obvious correctness.

use std::collections::HashMap;

use crate::spatial::world::WorldMap;

/// One fixed-size group of cell coordinates
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    /// Coordinates of the cells assigned to this chunk
    pub cells: Vec<[i32; 2]>,
    /// Advisory streaming flag; never affects the underlying world data
    pub loaded: bool,
}

/// Partitions a world into chunks and tracks which are near the viewer
#[derive(Debug, Clone)]
pub struct ChunkManager {
    chunk_size: i32,
    load_radius: i32,
    chunks: HashMap<[i32; 2], Chunk>,
}

impl ChunkManager {
    /// Create a manager with the given chunk edge length (in cells) and
    /// load radius (in chunks); both are clamped to at least one
    pub fn new(chunk_size: u32, load_radius: u32) -> Self {
        Self {
            chunk_size: chunk_size.max(1) as i32,
            load_radius: load_radius.max(1) as i32,
            chunks: HashMap::new(),
        }
    }

    /// Chunk key owning a cell coordinate
    pub const fn chunk_of(&self, coord: [i32; 2]) -> [i32; 2] {
        [
            coord[0].div_euclid(self.chunk_size),
            coord[1].div_euclid(self.chunk_size),
        ]
    }

    /// Rebuild the partition from a generated world
    ///
    /// All chunks start unloaded; call [`Self::set_viewer_position`] to
    /// activate the region around the viewer.
    pub fn organize(&mut self, world: &WorldMap) {
        self.chunks.clear();
        for (coord, _) in world.cells() {
            let key = self.chunk_of(coord);
            self.chunks.entry(key).or_default().cells.push(coord);
        }
        // Stable member order for consumers that iterate chunk contents
        for chunk in self.chunks.values_mut() {
            chunk.cells.sort_unstable_by_key(|&[x, y]| (y, x));
        }
    }

    /// Recompute every chunk's loaded flag from the viewer's cell position
    ///
    /// Full recompute, not incremental: exactly the chunks within the load
    /// radius (Chebyshev distance in chunk units) end up loaded.
    pub fn set_viewer_position(&mut self, x: f64, y: f64) {
        let viewer_chunk = self.chunk_of([x.floor() as i32, y.floor() as i32]);
        for (&key, chunk) in &mut self.chunks {
            let distance = (key[0] - viewer_chunk[0])
                .abs()
                .max((key[1] - viewer_chunk[1]).abs());
            chunk.loaded = distance <= self.load_radius;
        }
    }

    /// Whether the chunk owning `coord` is currently loaded
    pub fn is_loaded(&self, coord: [i32; 2]) -> bool {
        self.chunks
            .get(&self.chunk_of(coord))
            .is_some_and(|chunk| chunk.loaded)
    }

    /// Iterate all chunks with their keys
    pub fn chunks(&self) -> impl Iterator<Item = ([i32; 2], &Chunk)> {
        self.chunks.iter().map(|(&key, chunk)| (key, chunk))
    }

    /// Number of chunks in the current partition
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the partition is empty
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

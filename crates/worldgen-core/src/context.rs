use std::hash::Hasher;

use glam::Vec2;
use rustc_hash::FxHasher;

use sprawl_core::{Aabb, ChunkContent, ChunkPos, PlacedObject, RoadSegment};
use sprawl_placement::{AdjacentChunk, PlacementContext, PlacementEngine};
use sprawl_rng::{DefaultRng, Rng};

/// Everything a [`Generator`](crate::Generator) needs to know about the chunk it generates.
pub struct GenerationContext<'a> {
    /// The position of the chunk being generated.
    pub chunk: ChunkPos,
    /// The seed derived for the chunk.
    pub chunk_seed: u64,
    /// The side of a chunk, in world units.
    pub chunk_size: f32,
    /// The seed of the world.
    pub world_seed: i64,
    /// The chunks surrounding this one that were already loaded when generation started.
    pub adjacent: &'a [AdjacentChunk<'a>],
    /// The placement engine of the current generation pass.
    pub placement: &'a mut PlacementEngine,
}

impl<'a> GenerationContext<'a> {
    /// Returns the world-space origin of the chunk.
    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.chunk.origin(self.chunk_size)
    }

    /// Returns the world-space bounds of the chunk.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.chunk.bounds(self.chunk_size)
    }

    /// Creates the random stream named `stream` for this chunk.
    ///
    /// Every stream is derived from the chunk seed alone, so a generator's output does not
    /// depend on how many values the generators before it consumed.
    pub fn rng_for(&self, stream: &str) -> DefaultRng {
        let mut hasher = FxHasher::default();
        hasher.write(stream.as_bytes());
        DefaultRng::from_seed(self.chunk_seed).derive(hasher.finish())
    }

    /// Returns the content of the adjacent chunk at `pos`, if it is loaded.
    pub fn adjacent_content(&self, pos: ChunkPos) -> Option<&'a ChunkContent> {
        self.adjacent
            .iter()
            .find(|adj| adj.pos == pos)
            .map(|adj| adj.content)
    }

    /// Builds the [`PlacementContext`] used to check candidates of this chunk.
    #[inline]
    pub fn placement_context<'b>(&self, roads: &'b [RoadSegment]) -> PlacementContext<'b>
    where
        'a: 'b,
    {
        PlacementContext {
            chunk: self.chunk,
            chunk_size: self.chunk_size,
            roads,
            adjacent: self.adjacent,
        }
    }

    /// Checks `object` against the placement rules and commits it when it is valid.
    ///
    /// Returns whether the object was committed.
    pub fn try_place(&mut self, object: &PlacedObject, roads: &[RoadSegment]) -> bool {
        let ctx = self.placement_context(roads);
        self.placement.try_place(object, &ctx).is_ok()
    }
}

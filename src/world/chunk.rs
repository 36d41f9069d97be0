use glam::Vec2;

use sprawl_core::{ChunkContent, ChunkPos, PhysicsHandle, RenderHandle};

/// A handle to an external resource owned by a [`Chunk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// A renderable resource.
    Render(RenderHandle),
    /// A physics body.
    Physics(PhysicsHandle),
}

/// A chunk loaded in memory.
///
/// The position, seed and content of a chunk never change once it is created. Getting fresh
/// content for a position requires unloading the chunk and loading it again.
#[derive(Debug)]
pub struct Chunk {
    pos: ChunkPos,
    origin: Vec2,
    seed: u64,
    content: ChunkContent,
    resources: Vec<Resource>,
    generated_at: quanta::Instant,
}

impl Chunk {
    pub(super) fn new(
        pos: ChunkPos,
        chunk_size: f32,
        seed: u64,
        content: ChunkContent,
        resources: Vec<Resource>,
        generated_at: quanta::Instant,
    ) -> Self {
        Self {
            pos,
            origin: pos.origin(chunk_size),
            seed,
            content,
            resources,
            generated_at,
        }
    }

    /// Returns the position of the chunk.
    #[inline]
    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    /// Returns the world-space origin of the chunk.
    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Returns the seed derived for the chunk.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the content generated for the chunk.
    #[inline]
    pub fn content(&self) -> &ChunkContent {
        &self.content
    }

    /// Returns the external resources owned by the chunk.
    #[inline]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Returns the instant at which the chunk finished generating.
    #[inline]
    pub fn generated_at(&self) -> quanta::Instant {
        self.generated_at
    }

    /// Takes the resources out of the chunk, releasing the last ones first.
    pub(super) fn take_resources(&mut self) -> impl Iterator<Item = Resource> {
        std::mem::take(&mut self.resources).into_iter().rev()
    }
}

//! Utility functions for the core library.

use glam::{Vec2, Vec3};

use crate::ChunkPos;

/// Returns the chunk that the provided position is in.
///
/// The vertical component of `pos` is ignored.
#[inline]
pub fn chunk_of(pos: Vec3, chunk_size: f32) -> ChunkPos {
    ChunkPos::from_world_pos(pos.x, pos.z, chunk_size)
}

/// Projects a 3D world position onto the ground plane.
#[inline]
pub fn ground(pos: Vec3) -> Vec2 {
    Vec2::new(pos.x, pos.z)
}

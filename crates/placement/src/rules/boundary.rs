use glam::Vec2;
use sprawl_core::{ChunkPos, PlacedObject};

use crate::{PlacementContext, PlacementRule, SpatialIndex, Violation};

/// The distance under which an object of an adjacent chunk is considered the same object.
pub const DUPLICATE_DISTANCE: f32 = 1.0;

/// Returns the chunk that owns an object centered on `point`.
///
/// The chunk containing the point owns it. When the point lies exactly on a boundary, every
/// chunk whose closed bounds contain the point competes and the lowest `(x, z)` wins. This also
/// covers corners shared by four chunks.
pub fn boundary_owner(point: Vec2, chunk_size: f32) -> ChunkPos {
    let axis = |v: f32| {
        let cell = (v / chunk_size).floor();
        if cell * chunk_size == v {
            cell as i32 - 1
        } else {
            cell as i32
        }
    };

    ChunkPos::new(axis(point.x), axis(point.y))
}

/// Keeps content from being cut off by chunk boundaries or duplicated across them.
///
/// - An object whose bounding box leaves the bounds of its chunk is rejected.
/// - An object whose bounding box comes within `margin` of an edge is compared against the
///   objects of the adjacent chunks. If one of them has the same kind and stands within
///   [`DUPLICATE_DISTANCE`], only the chunk returned by [`boundary_owner`] may keep it.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryIntegrity {
    margin: f32,
}

impl BoundaryIntegrity {
    /// The name of the rule.
    pub const NAME: &'static str = "boundary_integrity";

    /// The margin used by [`BoundaryIntegrity::default`].
    pub const DEFAULT_MARGIN: f32 = 5.0;

    /// Creates a new [`BoundaryIntegrity`] rule.
    pub fn new(margin: f32) -> Self {
        Self {
            margin: margin.max(0.0),
        }
    }

    /// Returns the distance from the edges under which duplicates are looked for.
    #[inline]
    pub fn margin(&self) -> f32 {
        self.margin
    }
}

impl Default for BoundaryIntegrity {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MARGIN)
    }
}

impl PlacementRule for BoundaryIntegrity {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(
        &self,
        object: &PlacedObject,
        ctx: &PlacementContext,
        _index: &SpatialIndex,
    ) -> Option<Violation> {
        let bounds = ctx.bounds();
        let bbox = object.bbox();

        if !bounds.contains(&bbox) {
            return Some(Violation::error(
                Self::NAME,
                format!("{} extends outside of chunk {}", object.id, ctx.chunk),
            ));
        }

        if bbox.distance_to_edges(&bounds) >= self.margin {
            return None;
        }

        let duplicate = ctx.adjacent.iter().find_map(|adj| {
            adj.content
                .objects_of_kind(object.kind)
                .find(|o| o.position.distance(object.position) < DUPLICATE_DISTANCE)
        })?;

        let owner = boundary_owner(object.position, ctx.chunk_size);
        if owner == ctx.chunk {
            return None;
        }

        Some(Violation::error(
            Self::NAME,
            format!(
                "{} duplicates {} which belongs to chunk {owner}",
                object.id, duplicate.id,
            ),
        ))
    }
}

use sprawl_core::PlacedObject;

use crate::{PlacementContext, PlacementRule, SpatialIndex, Violation};

/// Rejects objects whose bounding box intersects the box of a committed object of another kind.
///
/// Objects of the same kind may overlap as far as this rule is concerned. Spacing between
/// objects of the same kind is the job of [`MinimumSpacing`](crate::rules::MinimumSpacing).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCrossTypeCollision;

impl NoCrossTypeCollision {
    /// The name of the rule.
    pub const NAME: &'static str = "no_cross_type_collision";
}

impl PlacementRule for NoCrossTypeCollision {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(
        &self,
        object: &PlacedObject,
        _ctx: &PlacementContext,
        index: &SpatialIndex,
    ) -> Option<Violation> {
        let bbox = object.bbox();
        let other = index
            .query_box(&bbox)
            .into_iter()
            .find(|o| o.kind != object.kind && o.bbox().intersects(&bbox))?;
        Some(Violation::error(
            Self::NAME,
            format!("{} collides with {}", object.id, other.id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use sprawl_core::{ChunkPos, ObjectId, ObjectKind};

    use super::*;
    use crate::PlacementEngine;

    fn object(kind: ObjectKind, index: u32, x: f32, z: f32, size: f32) -> PlacedObject {
        PlacedObject::new(
            ObjectId::new(kind, ChunkPos::new(0, 0), index),
            Vec2::new(x, z),
            Vec2::splat(size),
        )
    }

    #[test]
    fn same_kind_overlap_is_permitted() {
        let mut index = SpatialIndex::new(10.0);
        index.insert(object(ObjectKind::Vehicle, 0, 10.0, 10.0, 4.0));
        let ctx = PlacementContext {
            chunk: ChunkPos::new(0, 0),
            chunk_size: 100.0,
            roads: &[],
            adjacent: &[],
        };

        let rule = NoCrossTypeCollision;
        assert!(rule
            .check(&object(ObjectKind::Vehicle, 1, 11.0, 11.0, 4.0), &ctx, &index)
            .is_none());
        assert!(rule
            .check(&object(ObjectKind::Building, 0, 11.0, 11.0, 4.0), &ctx, &index)
            .is_some());
    }

    #[test]
    fn placed_objects_of_different_kinds_never_intersect() {
        const KINDS: [ObjectKind; 3] = [
            ObjectKind::Building,
            ObjectKind::Vehicle,
            ObjectKind::StreetLamp,
        ];

        let ctx = PlacementContext {
            chunk: ChunkPos::new(0, 0),
            chunk_size: 100.0,
            roads: &[],
            adjacent: &[],
        };
        let mut engine = PlacementEngine::new(7.0);
        engine.add_rule(Box::new(NoCrossTypeCollision));

        // A dense, overlapping lattice of candidates of mixed kinds.
        let mut n = 0u32;
        for j in 0..30 {
            for i in 0..30 {
                let kind = KINDS[(i * 7 + j * 3) % KINDS.len()];
                let size = 2.0 + ((i + j) % 4) as f32;
                let candidate = object(kind, n, 5.0 + i as f32 * 3.0, 5.0 + j as f32 * 3.0, size);
                let _ = engine.try_place(&candidate, &ctx);
                n += 1;
            }
        }

        let placed: Vec<_> = engine.objects().collect();
        assert!(placed.len() > KINDS.len());
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                if a.kind != b.kind {
                    assert!(!a.bbox().intersects(&b.bbox()), "{} / {}", a.id, b.id);
                }
            }
        }
    }
}

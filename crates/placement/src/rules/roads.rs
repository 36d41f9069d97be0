use sprawl_core::{ObjectKind, PlacedObject};

use crate::{PlacementContext, PlacementRule, SpatialIndex, Violation};

/// Rejects objects whose bounding box intersects the surface of a road.
///
/// The surface of a road is the box of its midline expanded by half its width.
#[derive(Debug, Clone)]
pub struct NoOverlapWithRoads {
    kinds: Vec<ObjectKind>,
}

impl NoOverlapWithRoads {
    /// The name of the rule.
    pub const NAME: &'static str = "no_overlap_with_roads";

    /// Creates a rule restricted to the provided kinds.
    pub fn for_kinds(kinds: impl Into<Vec<ObjectKind>>) -> Self {
        Self {
            kinds: kinds.into(),
        }
    }
}

impl Default for NoOverlapWithRoads {
    /// Applies to every kind that is not itself a surface.
    fn default() -> Self {
        Self::for_kinds(
            ObjectKind::ALL
                .into_iter()
                .filter(|k| !k.is_surface())
                .collect::<Vec<_>>(),
        )
    }
}

impl PlacementRule for NoOverlapWithRoads {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn applies_to(&self) -> &[ObjectKind] {
        &self.kinds
    }

    fn check(
        &self,
        object: &PlacedObject,
        ctx: &PlacementContext,
        _index: &SpatialIndex,
    ) -> Option<Violation> {
        let bbox = object.bbox();
        let road = ctx.roads.iter().find(|r| r.bbox().intersects(&bbox))?;
        Some(Violation::error(
            Self::NAME,
            format!("{} overlaps road {}", object.id, road.id),
        ))
    }
}

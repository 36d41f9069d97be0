use glam::Vec2;
use smallvec::SmallVec;

use crate::{Aabb, ObjectId};

/// The tolerance used when comparing road geometry.
pub const ROAD_EPSILON: f32 = 1e-3;

/// The class of a road.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoadKind {
    /// A wide arterial road.
    Main,
    /// A narrower residential road.
    Side,
}

/// A straight piece of road.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadSegment {
    /// The identifier of the segment.
    pub id: ObjectId,
    /// The world-space start of the road's midline.
    pub start: Vec2,
    /// The world-space end of the road's midline.
    pub end: Vec2,
    /// The full width of the road.
    pub width: f32,
    /// The class of the road.
    pub kind: RoadKind,
    /// The number of lanes of the road.
    pub lane_count: u8,
}

impl RoadSegment {
    /// Returns the length of the midline.
    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Returns the normalized direction of the segment, or zero for a degenerate segment.
    #[inline]
    pub fn direction(&self) -> Vec2 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Returns the rotation of the segment around the vertical axis, in radians.
    #[inline]
    pub fn rotation(&self) -> f32 {
        let d = self.end - self.start;
        d.y.atan2(d.x)
    }

    /// Returns the middle point of the midline.
    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    /// Returns the bounding box of the road surface: the box of the midline expanded by half
    /// the width of the road.
    #[inline]
    pub fn bbox(&self) -> Aabb {
        Aabb::new(self.start, self.end).expand(self.width * 0.5)
    }

    /// Returns whether the two segments are perpendicular.
    pub fn is_perpendicular(&self, other: &Self) -> bool {
        let a = self.direction();
        let b = other.direction();
        a != Vec2::ZERO && b != Vec2::ZERO && a.dot(b).abs() < ROAD_EPSILON
    }

    /// Returns whether `p` is one of the two endpoints of the midline.
    #[inline]
    pub fn is_endpoint(&self, p: Vec2) -> bool {
        self.start.distance(p) < ROAD_EPSILON || self.end.distance(p) < ROAD_EPSILON
    }

    /// Returns the point where the two midlines cross, if they do.
    ///
    /// Touching at an endpoint counts as crossing. Parallel segments never cross.
    pub fn crossing(&self, other: &Self) -> Option<Vec2> {
        let r = self.end - self.start;
        let s = other.end - other.start;
        let denom = r.perp_dot(s);
        if denom.abs() < f32::EPSILON {
            return None;
        }

        let qp = other.start - self.start;
        let t = qp.perp_dot(s) / denom;
        let u = qp.perp_dot(r) / denom;

        let tol_t = ROAD_EPSILON / r.length().max(ROAD_EPSILON);
        let tol_u = ROAD_EPSILON / s.length().max(ROAD_EPSILON);

        if (-tol_t..=1.0 + tol_t).contains(&t) && (-tol_u..=1.0 + tol_u).contains(&u) {
            Some(self.start + r * t.clamp(0.0, 1.0))
        } else {
            None
        }
    }
}

/// The shape of an [`Intersection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IntersectionKind {
    /// Both roads continue through the intersection.
    Cross,
    /// One road ends on the other.
    T,
    /// Both roads end at the intersection.
    Corner,
}

/// A point where two perpendicular roads meet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intersection {
    /// The world-space position of the intersection.
    pub position: Vec2,
    /// The identifiers of the roads meeting at the intersection.
    pub roads: SmallVec<[ObjectId; 4]>,
    /// The shape of the intersection.
    pub kind: IntersectionKind,
}

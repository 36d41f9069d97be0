//! Helpers to lay out objects along the sides of a road.

use glam::Vec2;

use sprawl_core::RoadSegment;

/// A side of a road.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The side on the left when travelling from the start of the road to its end.
    Left,
    /// The side on the right when travelling from the start of the road to its end.
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Self; 2] = [Self::Left, Self::Right];

    /// Returns `1.0` for the left side and `-1.0` for the right side.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}

/// Returns the unit vector pointing to the left of the road.
#[inline]
pub fn normal(road: &RoadSegment) -> Vec2 {
    road.direction().perp()
}

/// Returns the point at `distance` from the midline of `road`, on `side`, facing `at`.
#[inline]
pub fn beside(road: &RoadSegment, at: Vec2, side: Side, distance: f32) -> Vec2 {
    at + normal(road) * side.sign() * distance
}

/// Returns evenly spaced points on the midline of `road`.
///
/// Slots are anchored to the world rather than to the segment: they sit at
/// `(k + 0.5) * spacing` along the axis of the road, so that two chunks sharing a road compute
/// the same slots. Each slot comes with its index `k`.
pub fn slots(road: &RoadSegment, spacing: f32) -> impl Iterator<Item = (i64, Vec2)> + '_ {
    let dir = road.direction();
    let s0 = road.start.dot(dir);
    let s1 = road.end.dot(dir);

    let (first, last) = if spacing > 0.0 && dir != Vec2::ZERO {
        (
            (s0 / spacing - 0.5).ceil() as i64,
            (s1 / spacing - 0.5).floor() as i64,
        )
    } else {
        (0, -1)
    };

    (first..=last).map(move |k| {
        let s = (k as f32 + 0.5) * spacing;
        (k, road.start + dir * (s - s0))
    })
}

use glam::Vec2;

/// An axis-aligned bounding box on the ground plane.
///
/// `min.x`/`max.x` span the world X axis and `min.y`/`max.y` span the world Z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    /// The minimum corner of the box.
    pub min: Vec2,
    /// The maximum corner of the box.
    pub max: Vec2,
}

impl Aabb {
    /// Creates a new [`Aabb`] from its two corners.
    ///
    /// The corners are reordered if needed so that `min <= max` on both axes.
    #[inline]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a box centered on `center` with the provided full size.
    #[inline]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Computes the axis-aligned box enclosing a `footprint` rectangle (width along the local X
    /// axis, depth along the local Z axis) centered on `center` and rotated by `rotation`
    /// radians around the vertical axis.
    pub fn of_footprint(center: Vec2, footprint: Vec2, rotation: f32) -> Self {
        let (sin, cos) = rotation.sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        let half = footprint.abs() * 0.5;

        // Snap to the exact extents for the common axis-aligned rotations so that boxes do not
        // grow by a rounding error.
        let extent = if sin < 1e-6 {
            half
        } else if cos < 1e-6 {
            Vec2::new(half.y, half.x)
        } else {
            Vec2::new(
                cos * half.x + sin * half.y,
                sin * half.x + cos * half.y,
            )
        };

        Self {
            min: center - extent,
            max: center + extent,
        }
    }

    /// Returns the minimum X coordinate of the box.
    #[inline]
    pub fn min_x(&self) -> f32 {
        self.min.x
    }

    /// Returns the minimum Z coordinate of the box.
    #[inline]
    pub fn min_z(&self) -> f32 {
        self.min.y
    }

    /// Returns the maximum X coordinate of the box.
    #[inline]
    pub fn max_x(&self) -> f32 {
        self.max.x
    }

    /// Returns the maximum Z coordinate of the box.
    #[inline]
    pub fn max_z(&self) -> f32 {
        self.max.y
    }

    /// Returns the center of the box.
    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Returns the size of the box.
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Returns whether the two boxes overlap.
    ///
    /// Boxes that merely touch along an edge or a corner do not overlap.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Returns whether `other` lies entirely within this box (edges included).
    #[inline]
    pub fn contains(&self, other: &Self) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// Returns whether the point lies within this box (edges included).
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Returns a copy of the box grown by `margin` on every side.
    #[inline]
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    /// Returns the smallest box containing both boxes.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns the distance between the box and the closest of the provided bounds' edges.
    ///
    /// The result is negative when the box pokes out of `bounds`.
    pub fn distance_to_edges(&self, bounds: &Self) -> f32 {
        (self.min.x - bounds.min.x)
            .min(self.min.y - bounds.min.y)
            .min(bounds.max.x - self.max.x)
            .min(bounds.max.y - self.max.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
        let c = Aabb::new(Vec2::new(9.0, 9.0), Vec2::new(20.0, 20.0));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn rotated_footprints() {
        let center = Vec2::new(5.0, 5.0);
        let footprint = Vec2::new(4.0, 2.0);

        let flat = Aabb::of_footprint(center, footprint, 0.0);
        assert_eq!(flat.size(), Vec2::new(4.0, 2.0));

        let quarter = Aabb::of_footprint(center, footprint, std::f32::consts::FRAC_PI_2);
        assert_eq!(quarter.size(), Vec2::new(2.0, 4.0));

        let diagonal = Aabb::of_footprint(center, Vec2::splat(2.0), std::f32::consts::FRAC_PI_4);
        let expected = 2.0 * std::f32::consts::SQRT_2;
        assert!((diagonal.size().x - expected).abs() < 1e-5);
        assert!((diagonal.center() - center).length() < 1e-5);
    }

    #[test]
    fn containment_and_edges() {
        let bounds = Aabb::new(Vec2::ZERO, Vec2::splat(100.0));
        let inside = Aabb::new(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0));
        let outside = Aabb::new(Vec2::new(90.0, 20.0), Vec2::new(110.0, 40.0));
        assert!(bounds.contains(&inside));
        assert!(!bounds.contains(&outside));
        assert_eq!(inside.distance_to_edges(&bounds), 10.0);
        assert_eq!(outside.distance_to_edges(&bounds), -10.0);
        assert!(bounds.contains_point(Vec2::new(100.0, 0.0)));
    }
}

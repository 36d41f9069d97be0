use std::hash::Hash;

use glam::{IVec2, Vec2};

use crate::{Aabb, HeightMap, Intersection, ObjectKind, PlacedObject, RoadSegment};

/// The upper bound used when deriving chunk seeds.
///
/// This is the largest integer that a double-precision float represents exactly, which keeps
/// derived seeds exchangeable with tools that store them as floats.
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// The primes used to combine the world seed and the chunk coordinates.
const SEED_PRIMES: [i64; 3] = [73_856_093, 19_349_663, 83_492_791];

/// The position of a chunk in the chunk grid.
///
/// This is a grid index, not a world-space position. The world-space origin of the chunk is
/// `(x * chunk_size, z * chunk_size)`.
///
/// # Ordering
///
/// Chunk positions are ordered lexicographically on `(x, z)`. Boundary ownership rules rely on
/// this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkPos {
    /// The X coordinate of the chunk.
    pub x: i32,
    /// The Z coordinate of the chunk.
    pub z: i32,
}

impl ChunkPos {
    /// The offsets of the eight chunks surrounding a chunk.
    pub const NEIGHBOR_OFFSETS: [IVec2; 8] = [
        IVec2::new(-1, -1),
        IVec2::new(0, -1),
        IVec2::new(1, -1),
        IVec2::new(-1, 0),
        IVec2::new(1, 0),
        IVec2::new(-1, 1),
        IVec2::new(0, 1),
        IVec2::new(1, 1),
    ];

    /// Creates a new [`ChunkPos`] from the provided coordinates.
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts the provided world-space position into the position of the chunk containing it.
    ///
    /// Chunks are half-open: a position exactly on the boundary between two chunks belongs to
    /// the one with the greater coordinate.
    #[inline]
    pub fn from_world_pos(x: f32, z: f32, chunk_size: f32) -> Self {
        Self {
            x: (x / chunk_size).floor() as i32,
            z: (z / chunk_size).floor() as i32,
        }
    }

    /// Returns the world-space origin (minimum corner) of the chunk.
    #[inline]
    pub fn origin(self, chunk_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * chunk_size, self.z as f32 * chunk_size)
    }

    /// Returns the world-space center of the chunk.
    #[inline]
    pub fn center(self, chunk_size: f32) -> Vec2 {
        self.origin(chunk_size) + Vec2::splat(chunk_size * 0.5)
    }

    /// Returns the world-space bounds of the chunk.
    #[inline]
    pub fn bounds(self, chunk_size: f32) -> Aabb {
        let origin = self.origin(chunk_size);
        Aabb::new(origin, origin + Vec2::splat(chunk_size))
    }

    /// Returns the position as an [`IVec2`].
    #[inline]
    pub const fn as_ivec2(self) -> IVec2 {
        IVec2::new(self.x, self.z)
    }

    /// Returns the position of the chunk offset by `(dx, dz)`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the result does not fit in the grid. See
    /// [`checked_offset`](Self::checked_offset).
    #[inline]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// Returns the position of the chunk offset by `(dx, dz)`, or [`None`] if it falls off
    /// the grid.
    #[inline]
    pub const fn checked_offset(self, dx: i32, dz: i32) -> Option<Self> {
        match (self.x.checked_add(dx), self.z.checked_add(dz)) {
            (Some(x), Some(z)) => Some(Self { x, z }),
            _ => None,
        }
    }

    /// Returns an iterator over the chunks surrounding this one.
    ///
    /// There are eight of them, except on the edges of the grid.
    pub fn neighbors(self) -> impl Iterator<Item = Self> {
        Self::NEIGHBOR_OFFSETS
            .into_iter()
            .filter_map(move |d| self.checked_offset(d.x, d.y))
    }

    /// Returns whether `other` is one of the eight chunks surrounding this one.
    #[inline]
    pub fn is_adjacent(self, other: Self) -> bool {
        self != other && self.x.abs_diff(other.x) <= 1 && self.z.abs_diff(other.z) <= 1
    }

    /// Returns whether `other` shares a full edge with this chunk.
    #[inline]
    pub fn shares_edge(self, other: Self) -> bool {
        self.x.abs_diff(other.x) as u64 + self.z.abs_diff(other.z) as u64 == 1
    }
}

impl Hash for ChunkPos {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64((self.x as u32 as u64) << 32 | self.z as u32 as u64);
    }
}

impl From<IVec2> for ChunkPos {
    #[inline]
    fn from(value: IVec2) -> Self {
        Self::new(value.x, value.y)
    }
}

impl std::fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Derives the seed of the chunk at `pos` from the world seed.
///
/// The world seed and the two coordinates are each multiplied by a large prime modulo
/// [`MAX_SAFE_INTEGER`], the three partial products are XORed together, and the absolute value
/// of the result is reduced modulo [`MAX_SAFE_INTEGER`] again.
///
/// The result is never zero: some random streams misbehave on a zero seed, so zero is remapped
/// to one.
///
/// # Purity
///
/// This function only depends on its inputs. The same world seed and position always produce
/// the same chunk seed.
pub fn chunk_seed(world_seed: i64, pos: ChunkPos) -> u64 {
    #[inline]
    fn partial(value: i64, prime: i64) -> i64 {
        // The remainder takes the sign of the dividend, like the products it reduces.
        ((value as i128 * prime as i128) % MAX_SAFE_INTEGER as i128) as i64
    }

    let a = partial(world_seed, SEED_PRIMES[0]);
    let b = partial(pos.x as i64, SEED_PRIMES[1]);
    let c = partial(pos.z as i64, SEED_PRIMES[2]);

    let seed = (a ^ b ^ c).unsigned_abs() % MAX_SAFE_INTEGER as u64;

    if seed == 0 {
        1
    } else {
        seed
    }
}

/// The content generated for a chunk.
///
/// Every collection is owned exclusively by the chunk. Generators append to these collections
/// while the chunk is being generated; once generation is complete, the content never changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkContent {
    /// The road segments passing through the chunk.
    pub roads: Vec<RoadSegment>,
    /// The intersections between the roads of the chunk.
    pub intersections: Vec<Intersection>,
    /// The terrain height map of the chunk, if a terrain generator ran.
    pub terrain: Option<HeightMap>,
    /// Every object placed in the chunk, in placement order.
    pub objects: Vec<PlacedObject>,
}

impl ChunkContent {
    /// Creates an empty [`ChunkContent`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the objects of the provided kind.
    pub fn objects_of_kind(&self, kind: ObjectKind) -> impl Iterator<Item = &PlacedObject> {
        self.objects.iter().filter(move |o| o.kind == kind)
    }

    /// Returns the number of objects of the provided kind.
    pub fn count_of_kind(&self, kind: ObjectKind) -> usize {
        self.objects_of_kind(kind).count()
    }

    /// Returns the terrain height at the provided world-space position, or `0.0` when the chunk
    /// has no terrain.
    pub fn elevation_at(&self, origin: Vec2, world: Vec2) -> f32 {
        self.terrain
            .as_ref()
            .map_or(0.0, |t| t.height_at(world - origin))
    }

    /// Returns whether nothing has been generated for the chunk.
    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
            && self.intersections.is_empty()
            && self.terrain.is_none()
            && self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_derivation_is_reproducible() {
        assert_eq!(chunk_seed(12345, ChunkPos::new(2, 3)), 911_675_926_190);
        assert_eq!(chunk_seed(12345, ChunkPos::new(0, 0)), 911_753_468_085);
        assert_eq!(chunk_seed(12345, ChunkPos::new(-1, 0)), 911_767_935_020);
        assert_eq!(
            chunk_seed(12345, ChunkPos::new(2, 3)),
            chunk_seed(12345, ChunkPos::new(2, 3))
        );
    }

    #[test]
    fn zero_seed_is_remapped() {
        assert_eq!(chunk_seed(0, ChunkPos::new(0, 0)), 1);
    }

    #[test]
    fn seeds_are_positive_and_bounded() {
        for x in -5..5 {
            for z in -5..5 {
                let seed = chunk_seed(-987_654_321, ChunkPos::new(x, z));
                assert!(seed >= 1);
                assert!(seed < MAX_SAFE_INTEGER as u64);
            }
        }
    }

    #[test]
    fn world_positions_map_to_chunks() {
        assert_eq!(ChunkPos::from_world_pos(0.0, 0.0, 100.0), ChunkPos::new(0, 0));
        assert_eq!(ChunkPos::from_world_pos(99.9, 100.0, 100.0), ChunkPos::new(0, 1));
        assert_eq!(ChunkPos::from_world_pos(-0.1, -100.0, 100.0), ChunkPos::new(-1, -1));
        assert_eq!(ChunkPos::from_world_pos(600.0, 600.0, 100.0), ChunkPos::new(6, 6));
    }

    #[test]
    fn origin_center_and_bounds() {
        let pos = ChunkPos::new(-2, 3);
        assert_eq!(pos.origin(100.0), Vec2::new(-200.0, 300.0));
        assert_eq!(pos.center(100.0), Vec2::new(-150.0, 350.0));
        let bounds = pos.bounds(100.0);
        assert_eq!(bounds.min, Vec2::new(-200.0, 300.0));
        assert_eq!(bounds.max, Vec2::new(-100.0, 400.0));
    }

    #[test]
    fn neighborhood() {
        let pos = ChunkPos::new(0, 0);
        let neighbors: Vec<_> = pos.neighbors().collect();
        assert_eq!(neighbors.len(), 8);
        assert!(neighbors.iter().all(|&n| pos.is_adjacent(n)));
        assert!(!pos.is_adjacent(pos));
        assert!(pos.shares_edge(ChunkPos::new(1, 0)));
        assert!(!pos.shares_edge(ChunkPos::new(1, 1)));
    }

    #[test]
    fn edges_of_the_grid() {
        let corner = ChunkPos::new(i32::MAX, i32::MIN);
        assert_eq!(corner.checked_offset(1, 0), None);
        assert_eq!(corner.checked_offset(0, -1), None);
        assert_eq!(
            corner.checked_offset(-1, 1),
            Some(ChunkPos::new(i32::MAX - 1, i32::MIN + 1))
        );

        let neighbors: Vec<_> = corner.neighbors().collect();
        assert_eq!(neighbors.len(), 3);
        assert!(neighbors.iter().all(|&n| corner.is_adjacent(n)));
        assert!(!corner.is_adjacent(ChunkPos::new(i32::MIN, i32::MAX)));
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(ChunkPos::new(0, 5) < ChunkPos::new(1, -5));
        assert!(ChunkPos::new(1, -5) < ChunkPos::new(1, 0));
    }
}

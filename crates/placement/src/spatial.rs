use std::hash::BuildHasherDefault;

use glam::{IVec2, Vec2};
use hashbrown::HashMap;
use rustc_hash::FxHasher;
use smallvec::SmallVec;

use sprawl_core::{Aabb, PlacedObject};

/// The members of a single cell: indices into [`SpatialIndex::objects`].
type Cell = SmallVec<[u32; 4]>;

/// A uniform grid hash over the footprints of placed objects.
///
/// An object is registered in every cell its bounding box overlaps, so objects larger than a
/// cell are found from any of the cells they cover.
///
/// # Broad phase
///
/// Queries return every object found in the cells overlapping the query region. Those objects
/// are *candidates*: callers must still run exact geometry tests on them.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    /// The side of a cell, in world units.
    cell_size: f32,
    /// The objects that have been inserted, in insertion order.
    objects: Vec<PlacedObject>,
    /// Maps a cell coordinate to the objects overlapping it.
    cells: HashMap<IVec2, Cell, BuildHasherDefault<FxHasher>>,
}

impl SpatialIndex {
    /// Creates a new empty [`SpatialIndex`] with the provided cell size.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not a finite positive number.
    #[track_caller]
    pub fn new(cell_size: f32) -> Self {
        assert!(
            cell_size.is_finite() && cell_size > 0.0,
            "the cell size of a spatial index must be positive",
        );

        Self {
            cell_size,
            objects: Vec::new(),
            cells: HashMap::default(),
        }
    }

    /// Returns the side of a cell.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Returns the number of objects in the index.
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns whether the index contains no object.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns an iterator over the inserted objects, in insertion order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, PlacedObject> {
        self.objects.iter()
    }

    /// Returns the range of cells overlapped by the provided box (both ends included).
    fn cell_range(&self, bbox: &Aabb) -> (IVec2, IVec2) {
        let to_cell = |v: Vec2| (v / self.cell_size).floor().as_ivec2();
        (to_cell(bbox.min), to_cell(bbox.max))
    }

    /// Inserts an object into the index.
    #[profiling::function]
    pub fn insert(&mut self, object: PlacedObject) {
        let index = self.objects.len() as u32;
        let (min, max) = self.cell_range(&object.bbox());

        for z in min.y..=max.y {
            for x in min.x..=max.x {
                self.cells.entry(IVec2::new(x, z)).or_default().push(index);
            }
        }

        self.objects.push(object);
    }

    /// Returns the objects found in the cells overlapping the provided box.
    ///
    /// The result is deduplicated and sorted in insertion order.
    #[profiling::function]
    pub fn query_box(&self, bbox: &Aabb) -> Vec<&PlacedObject> {
        let (min, max) = self.cell_range(bbox);

        let mut found = Vec::new();
        for z in min.y..=max.y {
            for x in min.x..=max.x {
                if let Some(cell) = self.cells.get(&IVec2::new(x, z)) {
                    found.extend_from_slice(cell);
                }
            }
        }

        found.sort_unstable();
        found.dedup();
        found
            .into_iter()
            .map(|i| &self.objects[i as usize])
            .collect()
    }

    /// Returns the objects found in the cells overlapping the square of half-side `radius`
    /// centered on `(x, z)`.
    #[inline]
    pub fn query_near(&self, x: f32, z: f32, radius: f32) -> Vec<&PlacedObject> {
        self.query_box(&Aabb::from_center(
            Vec2::new(x, z),
            Vec2::splat(radius.abs() * 2.0),
        ))
    }

    /// Removes every object from the index.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprawl_core::{ChunkPos, ObjectId, ObjectKind};

    fn object(index: u32, x: f32, z: f32, size: f32) -> PlacedObject {
        PlacedObject::new(
            ObjectId::new(ObjectKind::Building, ChunkPos::new(0, 0), index),
            Vec2::new(x, z),
            Vec2::splat(size),
        )
    }

    #[test]
    fn large_objects_span_several_cells() {
        let mut index = SpatialIndex::new(10.0);
        index.insert(object(0, 15.0, 15.0, 18.0));

        // The object covers cells (0..=2, 0..=2).
        assert_eq!(index.query_near(1.0, 1.0, 0.5).len(), 1);
        assert_eq!(index.query_near(29.0, 29.0, 0.5).len(), 1);
        assert!(index.query_near(45.0, 45.0, 1.0).is_empty());
    }

    #[test]
    fn queries_are_deduplicated_and_ordered() {
        let mut index = SpatialIndex::new(5.0);
        index.insert(object(0, 10.0, 10.0, 20.0));
        index.insert(object(1, 12.0, 12.0, 2.0));
        index.insert(object(2, 100.0, 100.0, 2.0));

        let found = index.query_box(&Aabb::new(Vec2::ZERO, Vec2::splat(30.0)));
        let ids: Vec<_> = found.iter().map(|o| o.id.index).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn negative_coordinates() {
        let mut index = SpatialIndex::new(8.0);
        index.insert(object(0, -3.0, -3.0, 2.0));
        assert_eq!(index.query_near(-1.0, -1.0, 0.5).len(), 1);
        assert!(index.query_near(5.0, 5.0, 0.5).is_empty());
    }

    #[test]
    fn clear_empties_the_index() {
        let mut index = SpatialIndex::new(8.0);
        index.insert(object(0, 1.0, 1.0, 1.0));
        assert_eq!(index.len(), 1);
        index.clear();
        assert!(index.is_empty());
        assert!(index.query_near(1.0, 1.0, 5.0).is_empty());
    }
}

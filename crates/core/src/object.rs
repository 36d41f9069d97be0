use std::collections::BTreeMap;

use glam::Vec2;

use crate::{Aabb, ChunkPos, Value};

/// The kind of a [`PlacedObject`].
///
/// Placement rules select the objects they apply to by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ObjectKind {
    /// The terrain surface of a chunk.
    Terrain,
    /// A road surface.
    Road,
    /// A building.
    Building,
    /// A parked vehicle.
    Vehicle,
    /// A traffic sign, usually standing at an intersection.
    TrafficSign,
    /// A traffic light.
    TrafficLight,
    /// A street lamp along a road.
    StreetLamp,
}

impl ObjectKind {
    /// Every object kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Terrain,
        Self::Road,
        Self::Building,
        Self::Vehicle,
        Self::TrafficSign,
        Self::TrafficLight,
        Self::StreetLamp,
    ];

    /// Returns the stable name of the kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Terrain => "terrain",
            Self::Road => "road",
            Self::Building => "building",
            Self::Vehicle => "vehicle",
            Self::TrafficSign => "traffic_sign",
            Self::TrafficLight => "traffic_light",
            Self::StreetLamp => "street_lamp",
        }
    }

    /// Parses a kind from its stable name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Returns whether objects of this kind are surfaces that other objects may stand on.
    ///
    /// Surfaces are never registered for collision checks.
    #[inline]
    pub const fn is_surface(self) -> bool {
        matches!(self, Self::Terrain | Self::Road)
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A deterministic identifier for a generated object.
///
/// The identifier only depends on the kind of the object, the chunk it was generated in and its
/// index within that chunk, so regenerating a chunk yields the same identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId {
    /// The kind of the object.
    pub kind: ObjectKind,
    /// The chunk that generated the object.
    pub chunk: ChunkPos,
    /// The index of the object among the objects of the same kind in its chunk.
    pub index: u32,
}

impl ObjectId {
    /// Creates a new [`ObjectId`].
    #[inline]
    pub const fn new(kind: ObjectKind, chunk: ChunkPos, index: u32) -> Self {
        Self { kind, chunk, index }
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.kind, self.chunk.x, self.chunk.z, self.index
        )
    }
}

/// An opaque handle returned by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderHandle(pub u64);

/// An opaque handle returned by the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysicsHandle(pub u64);

/// Free-form information attached to a [`PlacedObject`].
pub type Metadata = BTreeMap<String, Value>;

/// An object placed in the world.
///
/// Buildings, vehicles, signs and lamps all reduce to this shape for collision purposes. Roads
/// and terrain surfaces are also described this way so that the rendering collaborator only has
/// one kind of input to deal with.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedObject {
    /// The identifier of the object.
    pub id: ObjectId,
    /// The kind of the object.
    pub kind: ObjectKind,
    /// The world-space position of the center of the object on the ground plane.
    pub position: Vec2,
    /// The height of the ground below the object.
    pub elevation: f32,
    /// The rotation of the object around the vertical axis, in radians.
    pub rotation: f32,
    /// The size of the object: width along its local X axis, depth along its local Z axis.
    pub footprint: Vec2,
    /// The handle of the renderable created for this object, once it exists.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub handle: Option<RenderHandle>,
    /// Additional information about the object.
    pub metadata: Metadata,
}

impl PlacedObject {
    /// Creates a new [`PlacedObject`] with no rotation, elevation or metadata.
    pub fn new(id: ObjectId, position: Vec2, footprint: Vec2) -> Self {
        Self {
            kind: id.kind,
            id,
            position,
            elevation: 0.0,
            rotation: 0.0,
            footprint,
            handle: None,
            metadata: Metadata::new(),
        }
    }

    /// Sets the rotation of the object.
    #[inline]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the elevation of the object.
    #[inline]
    pub fn with_elevation(mut self, elevation: f32) -> Self {
        self.elevation = elevation;
        self
    }

    /// Attaches a metadata entry to the object.
    #[inline]
    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_owned(), value.into());
        self
    }

    /// Returns the world-space bounding box of the object.
    #[inline]
    pub fn bbox(&self) -> Aabb {
        Aabb::of_footprint(self.position, self.footprint, self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_readable_and_stable() {
        let id = ObjectId::new(ObjectKind::Building, ChunkPos::new(2, -3), 7);
        assert_eq!(id.to_string(), "building_2_-3_7");
        assert_eq!(id, ObjectId::new(ObjectKind::Building, ChunkPos::new(2, -3), 7));
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in ObjectKind::ALL {
            assert_eq!(ObjectKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ObjectKind::from_name("spaceship"), None);
    }

    #[test]
    fn bbox_follows_rotation() {
        let id = ObjectId::new(ObjectKind::Vehicle, ChunkPos::new(0, 0), 0);
        let car = PlacedObject::new(id, Vec2::new(10.0, 10.0), Vec2::new(2.0, 4.5))
            .with_rotation(std::f32::consts::FRAC_PI_2);
        let bbox = car.bbox();
        assert_eq!(bbox.size(), Vec2::new(4.5, 2.0));
        assert_eq!(car.kind, ObjectKind::Vehicle);
    }
}

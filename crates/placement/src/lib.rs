//! Spatial indexing and placement validation.
//!
//! Generators describe the objects they would like to place as [`PlacedObject`]s. Before an
//! object is committed, the [`PlacementEngine`] runs every applicable [`PlacementRule`] against
//! it, using a [`SpatialIndex`] of the objects committed so far to find collision candidates.
//!
//! [`PlacedObject`]: sprawl_core::PlacedObject

mod spatial;
pub use spatial::*;

mod rule;
pub use rule::*;

mod engine;
pub use engine::*;

pub mod rules;

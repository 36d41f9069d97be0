//! The standard content generators.
//!
//! The generators of this crate are meant to run in [`DEFAULT_ORDER`]: terrain first, then the
//! road network, then the objects that line the roads.

pub mod frontage;

mod buildings;
mod roads;
mod terrain;
mod traffic;
mod vehicles;

pub use buildings::*;
pub use roads::*;
pub use terrain::*;
pub use traffic::*;
pub use vehicles::*;

use sprawl_worldgen_core::Registry;

/// The order in which the standard generators should run.
pub const DEFAULT_ORDER: [&str; 5] = [
    TerrainGenerator::NAME,
    RoadGenerator::NAME,
    BuildingGenerator::NAME,
    TrafficGenerator::NAME,
    VehicleGenerator::NAME,
];

/// Creates a [`Registry`] holding every standard generator with its default configuration.
pub fn standard_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(Box::new(TerrainGenerator::new()));
    registry.register(Box::new(RoadGenerator::new()));
    registry.register(Box::new(BuildingGenerator::new()));
    registry.register(Box::new(TrafficGenerator::new()));
    registry.register(Box::new(VehicleGenerator::new()));
    registry
}

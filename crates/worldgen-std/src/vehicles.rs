use std::f32::consts::PI;

use glam::Vec2;

use sprawl_core::{ChunkContent, ObjectKind, PlacedObject, RoadKind};
use sprawl_placement::rules::{MinimumSpacing, NoCrossTypeCollision};
use sprawl_placement::PlacementRule;
use sprawl_rng::Rng;
use sprawl_worldgen_core::{
    GenerationContext, GenerationError, Generator, GeneratorBase, ParamReader, Params,
    ValidationError,
};

use crate::frontage::{self, Side};

/// The size of a parked car: length along the road, width across it.
const CAR_FOOTPRINT: Vec2 = Vec2::new(4.5, 2.0);

/// The configuration of the [`VehicleGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleConfig {
    /// The probability for a parking slot to be taken.
    pub density: f32,
    /// The length of a parking slot.
    pub slot_length: f32,
    /// The distance between the edge of the road and a parked car.
    pub curb_offset: f32,
    /// Whether cars only park along side roads.
    pub side_roads_only: bool,
    /// The models a parked car may be.
    pub models: Vec<String>,
    /// The number of distinct paint colors.
    pub colors: u32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            density: 0.3,
            slot_length: 7.0,
            curb_offset: 0.2,
            side_roads_only: true,
            models: ["sedan", "hatchback", "van", "pickup"]
                .into_iter()
                .map(String::from)
                .collect(),
            colors: 8,
        }
    }
}

impl VehicleConfig {
    fn from_params(r: &ParamReader) -> Result<Self, ValidationError> {
        r.only(&[
            "density",
            "slot_length",
            "curb_offset",
            "side_roads_only",
            "models",
            "colors",
        ])?;

        let d = Self::default();
        let models: Vec<&str> = d.models.iter().map(String::as_str).collect();
        Ok(Self {
            density: r.probability("density", d.density)?,
            slot_length: r.float("slot_length", d.slot_length, CAR_FOOTPRINT.x..=100.0)?,
            curb_offset: r.float("curb_offset", d.curb_offset, 0.0..=10.0)?,
            side_roads_only: r.bool("side_roads_only", d.side_roads_only)?,
            models: r.strings("models", &models)?,
            colors: r.uint("colors", d.colors, 1..=256)?,
        })
    }
}

/// Parks cars along the roads of a chunk.
///
/// Parking slots are anchored to the world grid, just outside the road surface. Cars face the
/// direction of traffic on their side of the road.
pub struct VehicleGenerator {
    base: GeneratorBase,
    config: VehicleConfig,
}

impl Default for VehicleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleGenerator {
    /// The name of the generator.
    pub const NAME: &'static str = "vehicles";

    /// Creates a new [`VehicleGenerator`] with the default configuration.
    pub fn new() -> Self {
        Self {
            base: GeneratorBase::new(Self::NAME),
            config: VehicleConfig::default(),
        }
    }

    /// Returns the current configuration of the generator.
    #[inline]
    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }
}

impl Generator for VehicleGenerator {
    fn name(&self) -> &str {
        self.base.name()
    }

    #[profiling::function]
    fn generate(
        &self,
        chunk: &mut ChunkContent,
        ctx: &mut GenerationContext,
    ) -> Result<Vec<PlacedObject>, GenerationError> {
        let c = &self.config;
        let mut rng = ctx.rng_for(Self::NAME);
        let origin = ctx.origin();

        let mut placed = Vec::new();
        let roads = chunk
            .roads
            .iter()
            .filter(|r| !c.side_roads_only || r.kind == RoadKind::Side);

        for road in roads {
            for (_, at) in frontage::slots(road, c.slot_length) {
                for side in Side::BOTH {
                    let parked = rng.chance(c.density);
                    let model = rng.choose(&c.models).cloned().unwrap_or_default();
                    let color = rng.range_i32(0, c.colors as i32 - 1);

                    let distance = road.width * 0.5 + c.curb_offset + CAR_FOOTPRINT.y * 0.5;
                    let center = frontage::beside(road, at, side, distance);

                    if !parked
                        || !GeneratorBase::is_in_chunk_bounds(
                            center.x,
                            center.y,
                            ctx.chunk,
                            ctx.chunk_size,
                        )
                    {
                        continue;
                    }

                    let heading = match side {
                        Side::Right => road.rotation(),
                        Side::Left => road.rotation() + PI,
                    };

                    let id =
                        GeneratorBase::object_id(ObjectKind::Vehicle, ctx.chunk, placed.len() as u32);
                    let candidate = PlacedObject::new(id, center, CAR_FOOTPRINT)
                        .with_rotation(heading)
                        .with_elevation(chunk.elevation_at(origin, center))
                        .with_meta("model", model)
                        .with_meta("color", color as i64);

                    if ctx.try_place(&candidate, &chunk.roads) {
                        placed.push(candidate);
                    }
                }
            }
        }

        Ok(placed)
    }

    fn placement_rules(&self) -> Vec<Box<dyn PlacementRule>> {
        vec![
            Box::new(NoCrossTypeCollision),
            Box::new(MinimumSpacing::new(
                ObjectKind::Vehicle,
                CAR_FOOTPRINT.x + 0.5,
            )),
        ]
    }

    fn configure(&mut self, params: &Params) -> Result<(), ValidationError> {
        self.config = self.base.configure(params, VehicleConfig::from_params)?;
        Ok(())
    }

    fn reset(&mut self) {
        self.base.reset();
        self.config = VehicleConfig::default();
    }
}

#[cfg(test)]
mod tests {
    use sprawl_core::{chunk_seed, ChunkPos, Value};
    use sprawl_placement::rules::{BoundaryIntegrity, NoOverlapWithRoads};
    use sprawl_placement::PlacementEngine;

    use super::*;
    use crate::RoadGenerator;

    const SIZE: f32 = 100.0;
    const WORLD: i64 = 12345;

    fn generate(gen: &VehicleGenerator, pos: ChunkPos) -> ChunkContent {
        let mut engine = PlacementEngine::default();
        engine.add_rule(Box::new(BoundaryIntegrity::default()));
        engine.add_rule(Box::new(NoOverlapWithRoads::default()));
        for rule in gen.placement_rules() {
            engine.add_rule(rule);
        }
        let mut ctx = GenerationContext {
            chunk: pos,
            chunk_seed: chunk_seed(WORLD, pos),
            chunk_size: SIZE,
            world_seed: WORLD,
            adjacent: &[],
            placement: &mut engine,
        };
        let mut content = ChunkContent::new();
        RoadGenerator::new()
            .generate(&mut content, &mut ctx)
            .unwrap();
        let objects = gen.generate(&mut content, &mut ctx).unwrap();
        content.objects.extend(objects);
        content
    }

    fn everywhere() -> VehicleGenerator {
        let mut gen = VehicleGenerator::new();
        let params = [
            ("density".to_owned(), Value::Float(1.0)),
            ("side_roads_only".to_owned(), Value::Bool(false)),
        ]
        .into_iter()
        .collect();
        gen.configure(&params).unwrap();
        gen
    }

    #[test]
    fn cars_park_beside_the_road() {
        let gen = everywhere();
        let content = generate(&gen, ChunkPos::new(0, 0));
        let cars: Vec<_> = content.objects_of_kind(ObjectKind::Vehicle).collect();
        assert!(!cars.is_empty());

        for car in cars {
            let bbox = car.bbox();
            assert!(content.roads.iter().all(|r| !r.bbox().intersects(&bbox)));

            let model = car.metadata["model"].as_str().unwrap();
            assert!(gen.config().models.iter().any(|m| m == model));
        }
    }

    #[test]
    fn cars_keep_their_distance() {
        let content = generate(&everywhere(), ChunkPos::new(2, 7));
        let cars: Vec<_> = content.objects_of_kind(ObjectKind::Vehicle).collect();
        for (i, a) in cars.iter().enumerate() {
            for b in &cars[i + 1..] {
                assert!(!a.bbox().intersects(&b.bbox()), "{} and {}", a.id, b.id);
            }
        }
    }

    #[test]
    fn main_roads_are_skipped_by_default() {
        let gen = VehicleGenerator::new();
        let content = generate(&gen, ChunkPos::new(-4, 3));

        for car in content.objects_of_kind(ObjectKind::Vehicle) {
            let parked_along = content.roads.iter().find(|r| {
                let across = (car.position - r.start).perp_dot(r.direction()).abs();
                let expected = r.width * 0.5 + gen.config().curb_offset + CAR_FOOTPRINT.y * 0.5;
                (across - expected).abs() < 1e-3
            });
            assert_eq!(parked_along.map(|r| r.kind), Some(RoadKind::Side), "{}", car.id);
        }
    }

    #[test]
    fn unknown_parameters_are_rejected() {
        let mut gen = VehicleGenerator::new();
        let params = [("wheels".to_owned(), Value::Int(4))].into_iter().collect();
        assert!(gen.configure(&params).is_err());
        assert_eq!(gen.config(), &VehicleConfig::default());
    }
}

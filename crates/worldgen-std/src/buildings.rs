use glam::Vec2;

use sprawl_core::{ChunkContent, ObjectKind, PlacedObject};
use sprawl_placement::rules::{MinimumSpacing, NoCrossTypeCollision, NoOverlapWithRoads};
use sprawl_placement::PlacementRule;
use sprawl_rng::Rng;
use sprawl_worldgen_core::{
    GenerationContext, GenerationError, Generator, GeneratorBase, ParamReader, Params,
    ValidationError,
};

use crate::frontage::{self, Side};

/// The configuration of the [`BuildingGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingConfig {
    /// The length of road frontage allotted to each lot.
    pub lot_width: f32,
    /// The probability for a lot to receive a building.
    pub density: f32,
    /// The smallest width of a building, along the road.
    pub min_width: f32,
    /// The largest width of a building, along the road.
    pub max_width: f32,
    /// The smallest depth of a building, away from the road.
    pub min_depth: f32,
    /// The largest depth of a building, away from the road.
    pub max_depth: f32,
    /// The distance between the edge of the road and the front of a building.
    pub setback: f32,
    /// The minimum distance between the centers of two buildings.
    pub min_spacing: f32,
    /// The largest number of floors of a building.
    pub max_floors: u32,
    /// The height of one floor.
    pub floor_height: f32,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            lot_width: 18.0,
            density: 0.75,
            min_width: 8.0,
            max_width: 14.0,
            min_depth: 8.0,
            max_depth: 12.0,
            setback: 3.0,
            min_spacing: 10.0,
            max_floors: 6,
            floor_height: 3.2,
        }
    }
}

impl BuildingConfig {
    fn from_params(r: &ParamReader) -> Result<Self, ValidationError> {
        r.only(&[
            "lot_width",
            "density",
            "min_width",
            "max_width",
            "min_depth",
            "max_depth",
            "setback",
            "min_spacing",
            "max_floors",
            "floor_height",
        ])?;

        let d = Self::default();
        let ret = Self {
            lot_width: r.float("lot_width", d.lot_width, 1.0..=1_000.0)?,
            density: r.probability("density", d.density)?,
            min_width: r.float("min_width", d.min_width, 1.0..=500.0)?,
            max_width: r.float("max_width", d.max_width, 1.0..=500.0)?,
            min_depth: r.float("min_depth", d.min_depth, 1.0..=500.0)?,
            max_depth: r.float("max_depth", d.max_depth, 1.0..=500.0)?,
            setback: r.float("setback", d.setback, 0.0..=100.0)?,
            min_spacing: r.float("min_spacing", d.min_spacing, 0.0..=1_000.0)?,
            max_floors: r.uint("max_floors", d.max_floors, 1..=200)?,
            floor_height: r.float("floor_height", d.floor_height, 1.0..=20.0)?,
        };

        if ret.min_width > ret.max_width {
            return Err(ValidationError::new(
                "min_width",
                "must not be greater than `max_width`",
            ));
        }
        if ret.min_depth > ret.max_depth {
            return Err(ValidationError::new(
                "min_depth",
                "must not be greater than `max_depth`",
            ));
        }

        Ok(ret)
    }
}

/// Lines the roads of a chunk with buildings.
///
/// Each road is divided into lots anchored to the world grid. Every lot on either side of the
/// road may receive a building facing the road, set back from its edge.
pub struct BuildingGenerator {
    base: GeneratorBase,
    config: BuildingConfig,
}

impl Default for BuildingGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildingGenerator {
    /// The name of the generator.
    pub const NAME: &'static str = "buildings";

    /// Creates a new [`BuildingGenerator`] with the default configuration.
    pub fn new() -> Self {
        Self {
            base: GeneratorBase::new(Self::NAME),
            config: BuildingConfig::default(),
        }
    }

    /// Returns the current configuration of the generator.
    #[inline]
    pub fn config(&self) -> &BuildingConfig {
        &self.config
    }

    fn overlaps_building(ctx: &GenerationContext, candidate: &PlacedObject) -> bool {
        let bbox = candidate.bbox();
        ctx.placement
            .index()
            .query_box(&bbox)
            .into_iter()
            .any(|o| o.kind == ObjectKind::Building && o.bbox().intersects(&bbox))
    }
}

impl Generator for BuildingGenerator {
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
        for road in &chunk.roads {
            for (_, at) in frontage::slots(road, c.lot_width) {
                for side in Side::BOTH {
                    // Every lot consumes the same draws, whether it is built or not.
                    let build = rng.chance(c.density);
                    let width = rng.range_f32(c.min_width, c.max_width);
                    let depth = rng.range_f32(c.min_depth, c.max_depth);
                    let floors = rng.range_i32(1, c.max_floors as i32);

                    let center =
                        frontage::beside(road, at, side, road.width * 0.5 + c.setback + depth * 0.5);

                    if !build
                        || !GeneratorBase::is_in_chunk_bounds(
                            center.x,
                            center.y,
                            ctx.chunk,
                            ctx.chunk_size,
                        )
                    {
                        continue;
                    }

                    let id = GeneratorBase::object_id(
                        ObjectKind::Building,
                        ctx.chunk,
                        placed.len() as u32,
                    );
                    let candidate = PlacedObject::new(id, center, Vec2::new(width, depth))
                        .with_rotation(road.rotation())
                        .with_elevation(chunk.elevation_at(origin, center))
                        .with_meta("floors", floors as i64)
                        .with_meta("height", floors as f32 * c.floor_height);

                    // Lots of perpendicular roads meet at the corners of a block.
                    if Self::overlaps_building(ctx, &candidate) {
                        continue;
                    }

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
            Box::new(NoOverlapWithRoads::default()),
            Box::new(NoCrossTypeCollision),
            Box::new(MinimumSpacing::new(
                ObjectKind::Building,
                self.config.min_spacing,
            )),
        ]
    }

    fn configure(&mut self, params: &Params) -> Result<(), ValidationError> {
        self.config = self.base.configure(params, BuildingConfig::from_params)?;
        Ok(())
    }

    fn reset(&mut self) {
        self.base.reset();
        self.config = BuildingConfig::default();
    }
}

#[cfg(test)]
mod tests {
    use sprawl_core::{chunk_seed, ChunkPos, Value};
    use sprawl_placement::rules::BoundaryIntegrity;
    use sprawl_placement::PlacementEngine;

    use super::*;
    use crate::RoadGenerator;

    const SIZE: f32 = 100.0;
    const WORLD: i64 = 12345;

    fn generate(gen: &BuildingGenerator, pos: ChunkPos) -> ChunkContent {
        let mut engine = PlacementEngine::default();
        engine.add_rule(Box::new(BoundaryIntegrity::default()));
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

    #[test]
    fn buildings_line_the_roads() {
        let gen = BuildingGenerator::new();
        let content = generate(&gen, ChunkPos::new(1, 1));
        let bounds = ChunkPos::new(1, 1).bounds(SIZE);

        assert!(content.count_of_kind(ObjectKind::Building) > 0);
        for building in content.objects_of_kind(ObjectKind::Building) {
            let bbox = building.bbox();
            assert!(bounds.contains(&bbox));
            assert!(content.roads.iter().all(|r| !r.bbox().intersects(&bbox)));

            let floors = building.metadata["floors"].as_i64().unwrap();
            assert!((1..=6).contains(&floors));
        }
    }

    #[test]
    fn buildings_do_not_overlap_each_other() {
        let gen = BuildingGenerator::new();
        let content = generate(&gen, ChunkPos::new(-2, 5));
        let buildings: Vec<_> = content.objects_of_kind(ObjectKind::Building).collect();
        for (i, a) in buildings.iter().enumerate() {
            for b in &buildings[i + 1..] {
                assert!(!a.bbox().intersects(&b.bbox()), "{} and {}", a.id, b.id);
            }
        }
    }

    #[test]
    fn zero_density_builds_nothing() {
        let mut gen = BuildingGenerator::new();
        let params = [("density".to_owned(), Value::Float(0.0))].into_iter().collect();
        gen.configure(&params).unwrap();

        let content = generate(&gen, ChunkPos::new(0, 0));
        assert_eq!(content.count_of_kind(ObjectKind::Building), 0);
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let mut gen = BuildingGenerator::new();
        let params = [("min_width".to_owned(), Value::Float(20.0))]
            .into_iter()
            .collect();
        let err = gen.configure(&params).unwrap_err();
        assert_eq!(err.key, "min_width");
        assert_eq!(gen.config(), &BuildingConfig::default());
    }
}

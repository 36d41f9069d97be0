use glam::Vec2;

use sprawl_core::{ChunkContent, ObjectId, ObjectKind, PlacedObject, RoadKind, RoadSegment};
use sprawl_placement::rules::{MinimumSpacing, NoCrossTypeCollision, NoOverlapWithRoads};
use sprawl_placement::PlacementRule;
use sprawl_rng::Rng;
use sprawl_worldgen_core::{
    GenerationContext, GenerationError, Generator, GeneratorBase, ParamReader, Params,
    ValidationError,
};

use crate::frontage::{self, Side};

/// The sizes of the pieces of street furniture.
const SIGN_FOOTPRINT: Vec2 = Vec2::splat(0.4);
const LIGHT_FOOTPRINT: Vec2 = Vec2::splat(0.6);
const LAMP_FOOTPRINT: Vec2 = Vec2::splat(0.5);

/// The signs that may stand at an intersection of side roads.
const SIGNS: [&str; 2] = ["stop", "yield"];

/// The configuration of the [`TrafficGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficConfig {
    /// The distance between two street lamps along a road.
    pub lamp_spacing: f32,
    /// The distance between a street lamp and the edge of the road.
    pub lamp_offset: f32,
    /// The height of a street lamp.
    pub lamp_height: f32,
    /// The distance between a sign (or light) and the edge of the roads it stands by.
    pub sign_offset: f32,
    /// The length of a full traffic light cycle, in seconds.
    pub light_cycle: f32,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            lamp_spacing: 25.0,
            lamp_offset: 0.75,
            lamp_height: 6.0,
            sign_offset: 1.0,
            light_cycle: 60.0,
        }
    }
}

impl TrafficConfig {
    fn from_params(r: &ParamReader) -> Result<Self, ValidationError> {
        r.only(&[
            "lamp_spacing",
            "lamp_offset",
            "lamp_height",
            "sign_offset",
            "light_cycle",
        ])?;

        let d = Self::default();
        Ok(Self {
            lamp_spacing: r.float("lamp_spacing", d.lamp_spacing, 1.0..=1_000.0)?,
            lamp_offset: r.float("lamp_offset", d.lamp_offset, 0.3..=20.0)?,
            lamp_height: r.float("lamp_height", d.lamp_height, 1.0..=50.0)?,
            sign_offset: r.float("sign_offset", d.sign_offset, 0.3..=20.0)?,
            light_cycle: r.float("light_cycle", d.light_cycle, 1.0..=3_600.0)?,
        })
    }
}

/// Places traffic signs and lights at intersections and street lamps along roads.
///
/// Intersections involving a main road get a traffic light at each corner. Other intersections
/// get signs. Lamps are anchored to the world grid and alternate sides along a road.
pub struct TrafficGenerator {
    base: GeneratorBase,
    config: TrafficConfig,
}

impl Default for TrafficGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts the objects of each kind placed by the generator so far.
#[derive(Default)]
struct Counters {
    signs: u32,
    lights: u32,
    lamps: u32,
}

impl Counters {
    fn next(&mut self, kind: ObjectKind) -> &mut u32 {
        match kind {
            ObjectKind::TrafficLight => &mut self.lights,
            ObjectKind::StreetLamp => &mut self.lamps,
            _ => &mut self.signs,
        }
    }
}

impl TrafficGenerator {
    /// The name of the generator.
    pub const NAME: &'static str = "traffic";

    /// Creates a new [`TrafficGenerator`] with the default configuration.
    pub fn new() -> Self {
        Self {
            base: GeneratorBase::new(Self::NAME),
            config: TrafficConfig::default(),
        }
    }

    /// Returns the current configuration of the generator.
    #[inline]
    pub fn config(&self) -> &TrafficConfig {
        &self.config
    }

    /// Finds a road of the chunk by identifier.
    fn road<'a>(chunk: &'a ChunkContent, id: &ObjectId) -> Option<&'a RoadSegment> {
        chunk.roads.iter().find(|r| r.id == *id)
    }

    /// Attempts to place one piece of furniture. Returns the object when it was committed.
    fn place(
        ctx: &mut GenerationContext,
        chunk: &ChunkContent,
        counters: &mut Counters,
        object: impl FnOnce(ObjectId) -> PlacedObject,
        kind: ObjectKind,
        at: Vec2,
    ) -> Option<PlacedObject> {
        if !GeneratorBase::is_in_chunk_bounds(at.x, at.y, ctx.chunk, ctx.chunk_size) {
            return None;
        }

        let counter = counters.next(kind);
        let candidate = object(GeneratorBase::object_id(kind, ctx.chunk, *counter))
            .with_elevation(chunk.elevation_at(ctx.origin(), at));

        if ctx.try_place(&candidate, &chunk.roads) {
            *counter += 1;
            Some(candidate)
        } else {
            None
        }
    }
}

impl Generator for TrafficGenerator {
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
        let mut counters = Counters::default();
        let mut placed = Vec::new();

        for intersection in &chunk.intersections {
            let [a, b] = match intersection.roads.as_slice() {
                [a, b, ..] => [a, b],
                _ => continue,
            };
            let (Some(a), Some(b)) = (Self::road(chunk, a), Self::road(chunk, b)) else {
                continue;
            };

            let signalled = a.kind == RoadKind::Main || b.kind == RoadKind::Main;
            let sign = *rng.choose(&SIGNS).unwrap_or(&SIGNS[0]);
            let phase = rng.range_f32(0.0, c.light_cycle);

            for sa in Side::BOTH {
                for sb in Side::BOTH {
                    let at = intersection.position
                        + frontage::normal(a) * sa.sign() * (a.width * 0.5 + c.sign_offset)
                        + frontage::normal(b) * sb.sign() * (b.width * 0.5 + c.sign_offset);

                    let kind = if signalled {
                        ObjectKind::TrafficLight
                    } else {
                        ObjectKind::TrafficSign
                    };

                    let object = |id| {
                        let object = if signalled {
                            PlacedObject::new(id, at, LIGHT_FOOTPRINT)
                                .with_meta("cycle", c.light_cycle)
                                .with_meta("phase", phase)
                        } else {
                            PlacedObject::new(id, at, SIGN_FOOTPRINT).with_meta("sign", sign)
                        };
                        object.with_rotation(a.rotation())
                    };

                    placed.extend(Self::place(ctx, chunk, &mut counters, object, kind, at));
                }
            }
        }

        for road in &chunk.roads {
            for (k, at) in frontage::slots(road, c.lamp_spacing) {
                let side = if k.rem_euclid(2) == 0 {
                    Side::Left
                } else {
                    Side::Right
                };
                let at = frontage::beside(road, at, side, road.width * 0.5 + c.lamp_offset);

                let object = |id| {
                    PlacedObject::new(id, at, LAMP_FOOTPRINT)
                        .with_rotation(road.rotation())
                        .with_meta("height", c.lamp_height)
                };

                placed.extend(Self::place(
                    ctx,
                    chunk,
                    &mut counters,
                    object,
                    ObjectKind::StreetLamp,
                    at,
                ));
            }
        }

        Ok(placed)
    }

    fn placement_rules(&self) -> Vec<Box<dyn PlacementRule>> {
        vec![
            Box::new(NoOverlapWithRoads::default()),
            Box::new(NoCrossTypeCollision),
            Box::new(MinimumSpacing::new(
                ObjectKind::StreetLamp,
                self.config.lamp_spacing * 0.5,
            )),
        ]
    }

    fn configure(&mut self, params: &Params) -> Result<(), ValidationError> {
        self.config = self.base.configure(params, TrafficConfig::from_params)?;
        Ok(())
    }

    fn reset(&mut self) {
        self.base.reset();
        self.config = TrafficConfig::default();
    }
}

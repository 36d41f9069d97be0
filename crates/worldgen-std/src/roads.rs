use glam::Vec2;
use smallvec::smallvec;

use sprawl_core::{
    Aabb, ChunkContent, ChunkPos, Intersection, IntersectionKind, ObjectKind, PlacedObject,
    RoadKind, RoadSegment, ROAD_EPSILON,
};
use sprawl_rng::{DefaultRng, Rng};
use sprawl_worldgen_core::{
    GenerationContext, GenerationError, Generator, GeneratorBase, ParamReader, Params,
    ValidationError,
};

/// The prime used to key the properties of roads running along the Z axis (constant X).
const X_LINE_PRIME: i64 = 15_485_863;
/// The prime used to key the properties of roads running along the X axis (constant Z).
const Z_LINE_PRIME: i64 = 32_452_843;

/// The maximum number of grid lines a chunk may contain on one axis.
const MAX_LINES_PER_AXIS: i64 = 1024;

/// The configuration of the [`RoadGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoadConfig {
    /// The distance between two parallel roads of the grid.
    pub grid_spacing: f32,
    /// The probability for a grid line to be a main road.
    pub main_probability: f32,
    /// The width of a single lane.
    pub lane_width: f32,
    /// The number of lanes of a main road.
    pub main_lanes: u32,
    /// The number of lanes of a side road.
    pub side_lanes: u32,
    /// The probability for a main road to get two extra lanes.
    pub extra_lanes_chance: f32,
    /// The width of the sidewalk on each side of the road.
    pub sidewalk: f32,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            grid_spacing: 50.0,
            main_probability: 0.3,
            lane_width: 3.5,
            main_lanes: 4,
            side_lanes: 2,
            extra_lanes_chance: 0.25,
            sidewalk: 1.5,
        }
    }
}

impl RoadConfig {
    fn from_params(r: &ParamReader) -> Result<Self, ValidationError> {
        r.only(&[
            "grid_spacing",
            "main_probability",
            "lane_width",
            "main_lanes",
            "side_lanes",
            "extra_lanes_chance",
            "sidewalk",
        ])?;

        let d = Self::default();
        let ret = Self {
            grid_spacing: r.float("grid_spacing", d.grid_spacing, 1.0..=100_000.0)?,
            main_probability: r.probability("main_probability", d.main_probability)?,
            lane_width: r.float("lane_width", d.lane_width, 0.5..=10.0)?,
            main_lanes: r.uint("main_lanes", d.main_lanes, 1..=12)?,
            side_lanes: r.uint("side_lanes", d.side_lanes, 1..=12)?,
            extra_lanes_chance: r.probability("extra_lanes_chance", d.extra_lanes_chance)?,
            sidewalk: r.float("sidewalk", d.sidewalk, 0.0..=10.0)?,
        };

        if ret.max_width() >= ret.grid_spacing {
            return Err(ValidationError::new(
                "grid_spacing",
                format!(
                    "{} leaves no room between roads as wide as {}",
                    ret.grid_spacing,
                    ret.max_width(),
                ),
            ));
        }

        Ok(ret)
    }

    /// Returns the width of the widest road the configuration can produce.
    pub fn max_width(&self) -> f32 {
        let lanes = self.main_lanes.max(self.side_lanes) + 2;
        lanes as f32 * self.lane_width + 2.0 * self.sidewalk
    }
}

/// The axis a grid line runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAxis {
    /// The line runs along the Z axis, at a constant X coordinate.
    AlongZ,
    /// The line runs along the X axis, at a constant Z coordinate.
    AlongX,
}

/// The properties of one line of the road grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineProperties {
    /// The class of the road.
    pub kind: RoadKind,
    /// The number of lanes of the road.
    pub lanes: u8,
    /// The full width of the road, sidewalks included.
    pub width: f32,
}

/// Lays a world-wide grid of roads and finds their intersections.
///
/// # Continuity
///
/// Grid lines are anchored at the world origin, and the properties of each line only depend on
/// the world seed and the coordinate of the line. Two chunks that see the same line therefore
/// agree on it without ever communicating.
pub struct RoadGenerator {
    base: GeneratorBase,
    config: RoadConfig,
}

impl Default for RoadGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RoadGenerator {
    /// The name of the generator.
    pub const NAME: &'static str = "roads";

    /// Creates a new [`RoadGenerator`] with the default configuration.
    pub fn new() -> Self {
        Self {
            base: GeneratorBase::new(Self::NAME),
            config: RoadConfig::default(),
        }
    }

    /// Returns the current configuration of the generator.
    #[inline]
    pub fn config(&self) -> &RoadConfig {
        &self.config
    }

    /// Derives the properties of the grid line at `coord` on the provided axis.
    pub fn line_properties(&self, world_seed: i64, axis: LineAxis, coord: f32) -> LineProperties {
        let prime = match axis {
            LineAxis::AlongZ => X_LINE_PRIME,
            LineAxis::AlongX => Z_LINE_PRIME,
        };
        let key = (coord as f64).round() as i64;
        let mut rng = DefaultRng::from_signed(world_seed.wrapping_add(key.wrapping_mul(prime)));

        let c = &self.config;
        let (kind, mut lanes) = if rng.chance(c.main_probability) {
            (RoadKind::Main, c.main_lanes)
        } else {
            (RoadKind::Side, c.side_lanes)
        };
        if kind == RoadKind::Main && rng.chance(c.extra_lanes_chance) {
            lanes += 2;
        }

        LineProperties {
            kind,
            lanes: lanes.min(u8::MAX as u32) as u8,
            width: lanes as f32 * c.lane_width + 2.0 * c.sidewalk,
        }
    }

    /// Returns the coordinates of the grid lines whose surface may touch `[min, max]`.
    ///
    /// This spans `floor(min / spacing)` to `ceil(max / spacing)`.
    fn candidate_lines(&self, min: f32, max: f32) -> Option<impl Iterator<Item = f32>> {
        let spacing = self.config.grid_spacing;
        let first = (min / spacing).floor() as i64;
        let last = (max / spacing).ceil() as i64;
        if last - first > MAX_LINES_PER_AXIS {
            return None;
        }
        Some((first..=last).map(move |k| k as f32 * spacing))
    }

    /// Computes the road segments of the chunk with the provided bounds.
    ///
    /// Segments are clipped to the extent of the chunk along their axis. A line whose surface
    /// merely overlaps the chunk, including a line lying on a boundary, is part of the chunk.
    pub fn segments(
        &self,
        world_seed: i64,
        chunk: ChunkPos,
        bounds: &Aabb,
    ) -> Result<Vec<RoadSegment>, GenerationError> {
        let mut ret = Vec::new();

        for axis in [LineAxis::AlongZ, LineAxis::AlongX] {
            let (min, max) = match axis {
                LineAxis::AlongZ => (bounds.min_x(), bounds.max_x()),
                LineAxis::AlongX => (bounds.min_z(), bounds.max_z()),
            };

            let lines = self.candidate_lines(min, max).ok_or_else(|| {
                GenerationError::internal(
                    Self::NAME,
                    chunk,
                    format!(
                        "a grid spacing of {} yields too many roads",
                        self.config.grid_spacing
                    ),
                )
            })?;

            for coord in lines {
                let props = self.line_properties(world_seed, axis, coord);
                let half = props.width * 0.5;
                if coord + half <= min || coord - half >= max {
                    continue;
                }

                let (start, end) = match axis {
                    LineAxis::AlongZ => (
                        Vec2::new(coord, bounds.min_z()),
                        Vec2::new(coord, bounds.max_z()),
                    ),
                    LineAxis::AlongX => (
                        Vec2::new(bounds.min_x(), coord),
                        Vec2::new(bounds.max_x(), coord),
                    ),
                };

                ret.push(RoadSegment {
                    id: GeneratorBase::object_id(ObjectKind::Road, chunk, ret.len() as u32),
                    start,
                    end,
                    width: props.width,
                    kind: props.kind,
                    lane_count: props.lanes,
                });
            }
        }

        Ok(ret)
    }
}

/// Returns whether `p` lies on one of the edges of `bounds`.
fn on_boundary(p: Vec2, bounds: &Aabb) -> bool {
    (p.x - bounds.min_x()).abs() < ROAD_EPSILON
        || (p.x - bounds.max_x()).abs() < ROAD_EPSILON
        || (p.y - bounds.min_z()).abs() < ROAD_EPSILON
        || (p.y - bounds.max_z()).abs() < ROAD_EPSILON
}

/// Finds the points where perpendicular roads meet.
///
/// A road continues through a point unless it ends there. Roads ending on the boundary of the
/// chunk continue in the next chunk.
pub fn find_intersections(roads: &[RoadSegment], bounds: &Aabb) -> Vec<Intersection> {
    let continues = |road: &RoadSegment, p: Vec2| !road.is_endpoint(p) || on_boundary(p, bounds);

    let mut ret = Vec::new();
    for (i, a) in roads.iter().enumerate() {
        for b in &roads[i + 1..] {
            if !a.is_perpendicular(b) {
                continue;
            }
            let Some(p) = a.crossing(b) else {
                continue;
            };

            let kind = match (continues(a, p), continues(b, p)) {
                (true, true) => IntersectionKind::Cross,
                (false, false) => IntersectionKind::Corner,
                _ => IntersectionKind::T,
            };

            ret.push(Intersection {
                position: p,
                roads: smallvec![a.id, b.id],
                kind,
            });
        }
    }
    ret
}

impl Generator for RoadGenerator {
    fn name(&self) -> &str {
        self.base.name()
    }

    #[profiling::function]
    fn generate(
        &self,
        chunk: &mut ChunkContent,
        ctx: &mut GenerationContext,
    ) -> Result<Vec<PlacedObject>, GenerationError> {
        let bounds = ctx.bounds();
        let roads = self.segments(ctx.world_seed, ctx.chunk, &bounds)?;
        let intersections = find_intersections(&roads, &bounds);

        let surfaces = roads
            .iter()
            .map(|road| {
                let kind = match road.kind {
                    RoadKind::Main => "main",
                    RoadKind::Side => "side",
                };
                PlacedObject::new(
                    road.id,
                    road.midpoint(),
                    Vec2::new(road.length(), road.width),
                )
                .with_rotation(road.rotation())
                .with_elevation(chunk.elevation_at(ctx.origin(), road.midpoint()))
                .with_meta("road_kind", kind)
                .with_meta("lanes", road.lane_count as u32)
            })
            .collect();

        chunk.roads.extend(roads);
        chunk.intersections.extend(intersections);
        Ok(surfaces)
    }

    fn configure(&mut self, params: &Params) -> Result<(), ValidationError> {
        self.config = self.base.configure(params, RoadConfig::from_params)?;
        Ok(())
    }

    fn reset(&mut self) {
        self.base.reset();
        self.config = RoadConfig::default();
    }
}

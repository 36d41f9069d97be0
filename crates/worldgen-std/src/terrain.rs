use std::sync::Arc;

use glam::Vec2;
use parking_lot::RwLock;

use sprawl_core::{ChunkContent, ChunkPos, Edge, HeightMap, ObjectKind, PlacedObject};
use sprawl_placement::AdjacentChunk;
use sprawl_rng::noises::Perlin2;
use sprawl_rng::{DefaultRng, FromRng, Noise};
use sprawl_worldgen_core::{
    GenerationContext, GenerationError, Generator, GeneratorBase, ParamReader, Params,
    ValidationError,
};

/// The noise fields the terrain is sampled from.
///
/// Terrain noise is seeded from the world seed rather than from the chunk seed so that the field
/// is continuous across chunks.
#[derive(FromRng, Debug, Clone)]
struct TerrainNoises {
    /// Large, rolling hills.
    base: Perlin2,
    /// Small bumps added on top of the hills.
    detail: Perlin2,
}

/// The configuration of the [`TerrainGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainConfig {
    /// The number of cells along one side of the height map.
    pub resolution: u32,
    /// The height of the tallest hills.
    pub amplitude: f32,
    /// The frequency of the base noise, in cycles per world unit.
    pub frequency: f32,
    /// The number of octaves of the base noise.
    pub octaves: u32,
    /// The amplitude falloff between two octaves of the base noise.
    pub persistence: f32,
    /// The height of the small bumps.
    pub detail_amplitude: f32,
    /// The frequency of the small bumps.
    pub detail_frequency: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            resolution: 16,
            amplitude: 12.0,
            frequency: 0.004,
            octaves: 4,
            persistence: 0.5,
            detail_amplitude: 0.5,
            detail_frequency: 0.05,
        }
    }
}

impl TerrainConfig {
    fn from_params(r: &ParamReader) -> Result<Self, ValidationError> {
        r.only(&[
            "resolution",
            "amplitude",
            "frequency",
            "octaves",
            "persistence",
            "detail_amplitude",
            "detail_frequency",
        ])?;

        let d = Self::default();
        Ok(Self {
            resolution: r.uint("resolution", d.resolution, 1..=256)?,
            amplitude: r.float("amplitude", d.amplitude, 0.0..=10_000.0)?,
            frequency: r.float("frequency", d.frequency, 0.0..=10.0)?,
            octaves: r.uint("octaves", d.octaves, 1..=12)?,
            persistence: r.float("persistence", d.persistence, 0.0..=1.0)?,
            detail_amplitude: r.float("detail_amplitude", d.detail_amplitude, 0.0..=1_000.0)?,
            detail_frequency: r.float("detail_frequency", d.detail_frequency, 0.0..=10.0)?,
        })
    }
}

/// Samples a height map for every chunk and stitches its edges to the already-generated
/// neighbors.
pub struct TerrainGenerator {
    base: GeneratorBase,
    config: TerrainConfig,
    /// The noises of the last world seed seen by the generator.
    noises: RwLock<Option<(i64, Arc<TerrainNoises>)>>,
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainGenerator {
    /// The name of the generator.
    pub const NAME: &'static str = "terrain";

    /// Creates a new [`TerrainGenerator`] with the default configuration.
    pub fn new() -> Self {
        Self {
            base: GeneratorBase::new(Self::NAME),
            config: TerrainConfig::default(),
            noises: RwLock::new(None),
        }
    }

    /// Returns the current configuration of the generator.
    #[inline]
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Returns the noises of the provided world, creating them if needed.
    fn noises(&self, world_seed: i64) -> Arc<TerrainNoises> {
        if let Some((seed, noises)) = &*self.noises.read() {
            if *seed == world_seed {
                return noises.clone();
            }
        }

        let noises = Arc::new(TerrainNoises::from_rng(&mut DefaultRng::from_signed(
            world_seed,
        )));
        *self.noises.write() = Some((world_seed, noises.clone()));
        noises
    }

    /// Computes the height of the terrain at the provided world-space position.
    fn height(&self, noises: &TerrainNoises, p: Vec2) -> f32 {
        let c = &self.config;

        let hills = noises.base.octaves(
            [p.x * c.frequency, p.y * c.frequency],
            c.octaves,
            c.persistence,
        );
        let hills = (hills + 1.0) * 0.5 * c.amplitude;
        let detail = noises
            .detail
            .sample([p.x * c.detail_frequency, p.y * c.detail_frequency])
            * c.detail_amplitude;

        hills + detail
    }
}

impl Generator for TerrainGenerator {
    fn name(&self) -> &str {
        self.base.name()
    }

    #[profiling::function]
    fn generate(
        &self,
        chunk: &mut ChunkContent,
        ctx: &mut GenerationContext,
    ) -> Result<Vec<PlacedObject>, GenerationError> {
        let noises = self.noises(ctx.world_seed);
        let origin = ctx.origin();
        let cell = ctx.chunk_size / self.config.resolution as f32;

        let mut map = HeightMap::from_fn(self.config.resolution, ctx.chunk_size, |i, j| {
            let p = origin + Vec2::new(i as f32 * cell, j as f32 * cell);
            self.height(&noises, p)
        });

        stitch(&mut map, ctx.chunk, ctx.adjacent);

        let (lo, hi) = map.range();
        let surface = PlacedObject::new(
            GeneratorBase::object_id(ObjectKind::Terrain, ctx.chunk, 0),
            ctx.chunk.center(ctx.chunk_size),
            Vec2::splat(ctx.chunk_size),
        )
        .with_meta("resolution", map.resolution())
        .with_meta("min_height", lo)
        .with_meta("max_height", hi);

        chunk.terrain = Some(map);
        Ok(vec![surface])
    }

    fn configure(&mut self, params: &Params) -> Result<(), ValidationError> {
        self.config = self.base.configure(params, TerrainConfig::from_params)?;
        Ok(())
    }

    fn reset(&mut self) {
        self.base.reset();
        self.config = TerrainConfig::default();
    }
}

/// Overwrites the boundary vertices of `map` with the exact values stored by the adjacent
/// chunks that already have terrain.
///
/// Edge neighbors provide a whole row or column. Diagonal neighbors provide a single corner.
/// Neighbors whose height map has a different resolution are ignored.
///
/// Returns the number of neighbors that were copied from.
pub fn stitch(map: &mut HeightMap, chunk: ChunkPos, adjacent: &[AdjacentChunk]) -> usize {
    let r = map.resolution();
    let mut copied = 0;

    let neighbors = adjacent.iter().filter_map(|adj| {
        let terrain = adj.content.terrain.as_ref()?;
        if terrain.resolution() != r {
            sprawl_log::warning!(
                "chunk {} has terrain of resolution {} (expected {r}), not stitching it to {chunk}",
                adj.pos,
                terrain.resolution(),
            );
            return None;
        }
        Some((adj.pos.x - chunk.x, adj.pos.z - chunk.z, terrain))
    });

    // Edges first, then corners, so that a diagonal neighbor gets the last word on the corner
    // it shares with us.
    let mut corners = Vec::new();
    for (dx, dz, other) in neighbors {
        let edge = match (dx, dz) {
            (-1, 0) => Edge::NegX,
            (1, 0) => Edge::PosX,
            (0, -1) => Edge::NegZ,
            (0, 1) => Edge::PosZ,
            _ => {
                corners.push((dx, dz, other));
                continue;
            }
        };

        let ours: Vec<_> = map.edge_vertices(edge).collect();
        for ((i, j), h) in ours.into_iter().zip(other.edge(edge.opposite())) {
            map.set(i, j, h);
        }
        copied += 1;
    }

    for (dx, dz, other) in corners {
        let ((i, j), (oi, oj)) = match (dx, dz) {
            (-1, -1) => ((0, 0), (r, r)),
            (1, -1) => ((r, 0), (0, r)),
            (-1, 1) => ((0, r), (r, 0)),
            (1, 1) => ((r, r), (0, 0)),
            _ => continue,
        };
        map.set(i, j, other.get(oi, oj));
        copied += 1;
    }

    copied
}

#[cfg(test)]
mod tests {
    use sprawl_core::chunk_seed;
    use sprawl_placement::PlacementEngine;

    use super::*;

    const SIZE: f32 = 100.0;
    const WORLD: i64 = 12345;

    fn generate(
        gen: &TerrainGenerator,
        pos: ChunkPos,
        adjacent: &[AdjacentChunk],
    ) -> ChunkContent {
        let mut engine = PlacementEngine::default();
        let mut ctx = GenerationContext {
            chunk: pos,
            chunk_seed: chunk_seed(WORLD, pos),
            chunk_size: SIZE,
            world_seed: WORLD,
            adjacent,
            placement: &mut engine,
        };
        let mut content = ChunkContent::new();
        let objects = gen.generate(&mut content, &mut ctx).unwrap();
        content.objects.extend(objects);
        content
    }

    #[test]
    fn terrain_is_deterministic() {
        let gen = TerrainGenerator::new();
        let a = generate(&gen, ChunkPos::new(3, -2), &[]);
        let b = generate(&TerrainGenerator::new(), ChunkPos::new(3, -2), &[]);
        assert_eq!(a, b);

        let map = a.terrain.as_ref().unwrap();
        assert_eq!(map.heights().len(), 17 * 17);
        assert_eq!(a.count_of_kind(ObjectKind::Terrain), 1);
    }

    #[test]
    fn edges_match_bit_for_bit() {
        let gen = TerrainGenerator::new();

        let origin = generate(&gen, ChunkPos::new(0, 0), &[]);
        let east = generate(
            &gen,
            ChunkPos::new(1, 0),
            &[AdjacentChunk {
                pos: ChunkPos::new(0, 0),
                content: &origin,
            }],
        );
        let north_east = generate(
            &gen,
            ChunkPos::new(1, 1),
            &[
                AdjacentChunk {
                    pos: ChunkPos::new(0, 0),
                    content: &origin,
                },
                AdjacentChunk {
                    pos: ChunkPos::new(1, 0),
                    content: &east,
                },
            ],
        );
        let north = generate(
            &gen,
            ChunkPos::new(0, 1),
            &[
                AdjacentChunk {
                    pos: ChunkPos::new(0, 0),
                    content: &origin,
                },
                AdjacentChunk {
                    pos: ChunkPos::new(1, 0),
                    content: &east,
                },
                AdjacentChunk {
                    pos: ChunkPos::new(1, 1),
                    content: &north_east,
                },
            ],
        );

        let t = |c: &ChunkContent| c.terrain.clone().unwrap();
        let (o, e, ne, n) = (t(&origin), t(&east), t(&north_east), t(&north));

        let bits = |v: Vec<f32>| v.into_iter().map(f32::to_bits).collect::<Vec<_>>();
        assert_eq!(bits(o.edge(Edge::PosX)), bits(e.edge(Edge::NegX)));
        assert_eq!(bits(e.edge(Edge::PosZ)), bits(ne.edge(Edge::NegZ)));
        assert_eq!(bits(o.edge(Edge::PosZ)), bits(n.edge(Edge::NegZ)));
        assert_eq!(bits(n.edge(Edge::PosX)), bits(ne.edge(Edge::NegX)));

        // The corner shared by the four chunks.
        let r = o.resolution();
        let corner = o.get(r, r).to_bits();
        assert_eq!(e.get(0, r).to_bits(), corner);
        assert_eq!(ne.get(0, 0).to_bits(), corner);
        assert_eq!(n.get(r, 0).to_bits(), corner);
    }

    #[test]
    fn neighbors_with_another_resolution_are_ignored() {
        let mut coarse = TerrainGenerator::new();
        let mut p = Params::new();
        p.insert("resolution".into(), 4u32.into());
        coarse.configure(&p).unwrap();

        let left = generate(&coarse, ChunkPos::new(0, 0), &[]);
        let mut map = HeightMap::flat(16, SIZE);
        let copied = stitch(
            &mut map,
            ChunkPos::new(1, 0),
            &[AdjacentChunk {
                pos: ChunkPos::new(0, 0),
                content: &left,
            }],
        );
        assert_eq!(copied, 0);
        assert!(map.heights().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut gen = TerrainGenerator::new();
        let mut p = Params::new();
        p.insert("resolution".into(), 0u32.into());
        assert!(gen.configure(&p).is_err());
        assert_eq!(gen.config().resolution, 16);

        let mut p = Params::new();
        p.insert("roughness".into(), 1.0f64.into());
        assert!(gen.configure(&p).is_err());
    }
}

use std::hash::BuildHasherDefault;

use glam::{Vec2, Vec3};
use hashbrown::HashMap;
use rustc_hash::FxHasher;
use smallvec::SmallVec;

use sprawl_core::{chunk_seed, utility, ChunkContent, ChunkPos};
use sprawl_log::{error, info, trace, warning};
use sprawl_placement::rules::BoundaryIntegrity;
use sprawl_placement::{AdjacentChunk, PlacementEngine};
use sprawl_worldgen_core::{GenerationContext, GenerationError, Registry, ValidationError};

use crate::backend::{PhysicsBackend, RenderBackend, StaticBody};
use crate::config::WorldConfig;
use crate::error::{ConfigurationError, Error};

mod chunk;
pub use chunk::*;

/// A collection of chunks.
type Chunks = HashMap<ChunkPos, Chunk, BuildHasherDefault<FxHasher>>;

/// What changed during a call to [`ChunkManager::update`].
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// The chunks that were loaded, closest first.
    pub loaded: Vec<ChunkPos>,
    /// The chunks that were unloaded.
    pub unloaded: Vec<ChunkPos>,
    /// The chunks that could not be generated. They are retried on the next rescan.
    pub failed: Vec<(ChunkPos, GenerationError)>,
}

impl UpdateReport {
    /// Returns whether nothing changed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty() && self.unloaded.is_empty() && self.failed.is_empty()
    }
}

/// The state that only exists once the manager is initialized.
struct Active {
    config: WorldConfig,
    placement: PlacementEngine,
}

/// Loads and unloads chunks around an observer.
///
/// Chunks are generated synchronously by running the generators of the registry in the
/// configured order.
pub struct ChunkManager {
    registry: Registry,
    renderer: Box<dyn RenderBackend>,
    physics: Box<dyn PhysicsBackend>,
    clock: quanta::Clock,

    active: Option<Active>,
    /// The chunks that are currently loaded.
    chunks: Chunks,
    /// The chunk the observer was in during the last update.
    observer_chunk: Option<ChunkPos>,
}

impl ChunkManager {
    /// Creates a new [`ChunkManager`].
    ///
    /// The manager must be initialized with [`initialize`](Self::initialize) before it can load
    /// chunks.
    pub fn new(
        registry: Registry,
        renderer: Box<dyn RenderBackend>,
        physics: Box<dyn PhysicsBackend>,
    ) -> Self {
        Self {
            registry,
            renderer,
            physics,
            clock: quanta::Clock::new(),
            active: None,
            chunks: Chunks::default(),
            observer_chunk: None,
        }
    }

    /// Returns the generators available to the manager.
    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the configuration of the manager, if it is initialized.
    #[inline]
    pub fn config(&self) -> Option<&WorldConfig> {
        self.active.as_ref().map(|a| &a.config)
    }

    /// Returns the number of chunks that are currently loaded in memory.
    #[inline]
    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns whether the chunk at `pos` is loaded.
    #[inline]
    pub fn is_loaded(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    /// Returns the chunk at `pos`, if it is loaded.
    #[inline]
    pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    /// Returns an iterator over the loaded chunks, in no particular order.
    #[inline]
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Returns the chunk the observer was in during the last update.
    #[inline]
    pub fn observer_chunk(&self) -> Option<ChunkPos> {
        self.observer_chunk
    }

    /// Validates `config` and prepares the manager to load chunks.
    ///
    /// Any previously loaded chunk is unloaded and the generators are reset to their defaults
    /// first. The parameters of the configuration are then handed to their generators before
    /// the placement rules are collected.
    pub fn initialize(&mut self, config: WorldConfig) -> Result<(), Error> {
        let report = config.validate(&self.registry);
        for warning in &report.warnings {
            warning!("configuration: {warning}");
        }
        if !report.is_valid() {
            for issue in &report.errors {
                error!("configuration: {issue}");
            }
            return Err(ConfigurationError::Invalid {
                errors: report.errors,
            }
            .into());
        }

        self.dispose();

        for (name, params) in &config.generators {
            if let Some(generator) = self.registry.get_mut(name) {
                generator.configure(params)?;
            }
        }

        let mut placement = PlacementEngine::default();
        placement.add_rule(Box::new(BoundaryIntegrity::new(config.boundary_margin)));
        for name in &config.generation_order {
            if let Some(generator) = self.registry.get(name) {
                for rule in generator.placement_rules() {
                    placement.add_rule(rule);
                }
            }
        }

        info!(
            "chunk manager initialized (seed {}, chunk size {}, generators: {})",
            config.seed,
            config.chunk_size,
            config.generation_order.join(", "),
        );

        self.active = Some(Active { config, placement });
        Ok(())
    }

    /// Notifies the manager that the observer is now at `observer`.
    ///
    /// Nothing happens while the observer stays in the same chunk. Otherwise, the missing
    /// chunks within the active radius are generated closest first, then the chunks beyond the
    /// unload distance are unloaded.
    ///
    /// The vertical component of `observer` is ignored.
    #[profiling::function]
    pub fn update(&mut self, observer: Vec3) -> Result<UpdateReport, Error> {
        let config = self.config().ok_or(ConfigurationError::NotInitialized)?;

        if !observer.is_finite() {
            return Err(ValidationError::new(
                "observer",
                format!("position must be finite, got {observer}"),
            )
            .into());
        }

        let limit = config.max_world_coordinate;
        let observer = utility::ground(observer).clamp(Vec2::splat(-limit), Vec2::splat(limit));
        let size = config.chunk_size;
        let active_radius = config.active_radius;
        let unload_distance = config.unload_distance;

        let current = ChunkPos::from_world_pos(observer.x, observer.y, size);
        if self.observer_chunk == Some(current) {
            return Ok(UpdateReport::default());
        }
        self.observer_chunk = Some(current);

        let mut report = UpdateReport::default();

        let reach = (active_radius / size).ceil() as i32;
        let mut missing = Vec::new();
        for dz in -reach..=reach {
            for dx in -reach..=reach {
                let Some(pos) = current.checked_offset(dx, dz) else {
                    continue;
                };
                let distance = pos.center(size).distance(observer);
                if distance <= active_radius && !self.is_loaded(pos) {
                    missing.push((distance, pos));
                }
            }
        }
        missing.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        for (_, pos) in missing {
            match self.generate_chunk(pos) {
                Ok(_) => report.loaded.push(pos),
                Err(Error::Generation(err)) => report.failed.push((pos, err)),
                Err(err) => return Err(err),
            }
        }

        let mut far: Vec<ChunkPos> = self
            .chunks
            .keys()
            .copied()
            .filter(|pos| pos.center(size).distance(observer) > unload_distance)
            .collect();
        far.sort_unstable();

        for pos in far {
            self.unload_chunk(pos);
            report.unloaded.push(pos);
        }

        if !report.is_empty() {
            info!(
                "observer entered chunk {current}: {} loaded, {} unloaded, {} failed ({} in memory)",
                report.loaded.len(),
                report.unloaded.len(),
                report.failed.len(),
                self.chunks.len(),
            );
        }

        Ok(report)
    }

    /// Generates the chunk at `pos`, unless it is already loaded.
    ///
    /// The failure of the critical generator aborts the generation and is returned. The
    /// failures of the other generators are logged, and the chunk is completed without their
    /// content.
    #[profiling::function]
    pub fn generate_chunk(&mut self, pos: ChunkPos) -> Result<&Chunk, Error> {
        if self.chunks.contains_key(&pos) {
            return Ok(&self.chunks[&pos]);
        }

        let Some(active) = self.active.as_mut() else {
            return Err(ConfigurationError::NotInitialized.into());
        };
        let config = &active.config;
        let seed = chunk_seed(config.seed, pos);

        let adjacent: SmallVec<[AdjacentChunk; 8]> = pos
            .neighbors()
            .filter_map(|n| {
                self.chunks.get(&n).map(|chunk| AdjacentChunk {
                    pos: n,
                    content: chunk.content(),
                })
            })
            .collect();

        active.placement.clear();
        let mut content = ChunkContent::new();

        for name in &config.generation_order {
            let Some(generator) = self.registry.get(name) else {
                continue;
            };

            let mut ctx = GenerationContext {
                chunk: pos,
                chunk_seed: seed,
                chunk_size: config.chunk_size,
                world_seed: config.seed,
                adjacent: &adjacent,
                placement: &mut active.placement,
            };

            match generator.generate(&mut content, &mut ctx) {
                Ok(objects) => content.objects.extend(objects),
                Err(err) if *name == config.critical_generator => {
                    error!("failed to generate chunk {pos}: {err}");
                    return Err(err.into());
                }
                Err(err) => warning!("skipping generator `{name}` on chunk {pos}: {err}"),
            }
        }
        drop(adjacent);

        let chunk_size = config.chunk_size;

        let mut resources = Vec::with_capacity(content.objects.len() * 2);
        for object in &mut content.objects {
            let render = match self.renderer.create(object) {
                Ok(handle) => handle,
                Err(err) => {
                    warning!("no renderable for {}: {err}", object.id);
                    continue;
                }
            };
            object.handle = Some(render);
            resources.push(Resource::Render(render));

            match self.physics.create(render, &StaticBody::of(object)) {
                Ok(body) => resources.push(Resource::Physics(body)),
                Err(err) => warning!("no physics body for {}: {err}", object.id),
            }
        }

        trace!(
            "loaded chunk {pos} ({} objects, {} roads)",
            content.objects.len(),
            content.roads.len(),
        );

        let chunk = Chunk::new(
            pos,
            chunk_size,
            seed,
            content,
            resources,
            self.clock.now(),
        );
        Ok(self.chunks.entry(pos).or_insert(chunk))
    }

    /// Unloads the chunk at `pos`, releasing its external resources.
    ///
    /// Resources that cannot be released are logged and forgotten. Returns whether the chunk was
    /// loaded.
    pub fn unload_chunk(&mut self, pos: ChunkPos) -> bool {
        let Some(mut chunk) = self.chunks.remove(&pos) else {
            return false;
        };

        for resource in chunk.take_resources() {
            let result = match resource {
                Resource::Render(handle) => self.renderer.dispose(handle),
                Resource::Physics(handle) => self.physics.dispose(handle),
            };
            if let Err(err) = result {
                warning!("while unloading chunk {pos}: {err}");
            }
        }

        trace!("unloaded chunk {pos}");
        true
    }

    /// Unloads every chunk and forgets the configuration, including the parameters handed to
    /// the generators.
    ///
    /// The manager must be initialized again before it can load chunks.
    pub fn dispose(&mut self) {
        let mut loaded: Vec<ChunkPos> = self.chunks.keys().copied().collect();
        loaded.sort_unstable();
        for pos in loaded {
            self.unload_chunk(pos);
        }
        self.chunks.shrink_to_fit();
        self.observer_chunk = None;
        self.registry.reset();

        if self.active.take().is_some() {
            info!("chunk manager disposed");
        }
    }
}

impl Drop for ChunkManager {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use sprawl_core::{ChunkContent, Edge, ObjectKind, PlacedObject, RoadSegment, Value};
    use sprawl_worldgen_core::{Generator, Params};
    use sprawl_worldgen_std::standard_registry;

    use super::*;
    use crate::backend::{HeadlessPhysics, HeadlessRenderer};

    struct Backends {
        renderer: HeadlessRenderer,
        physics: HeadlessPhysics,
    }

    fn manager_with(registry: Registry, config: WorldConfig) -> (ChunkManager, Backends) {
        let renderer = HeadlessRenderer::new();
        let physics = HeadlessPhysics::new();
        let mut manager = ChunkManager::new(
            registry,
            Box::new(renderer.clone()),
            Box::new(physics.clone()),
        );
        manager.initialize(config).unwrap();
        (manager, Backends { renderer, physics })
    }

    fn manager() -> (ChunkManager, Backends) {
        manager_with(standard_registry(), WorldConfig::default())
    }

    fn loaded(manager: &ChunkManager) -> Vec<ChunkPos> {
        let mut ret: Vec<ChunkPos> = manager.chunks().map(Chunk::pos).collect();
        ret.sort_unstable();
        ret
    }

    /// A generator that always fails.
    struct Broken(&'static str);

    impl Generator for Broken {
        fn name(&self) -> &str {
            self.0
        }

        fn generate(
            &self,
            _chunk: &mut ChunkContent,
            ctx: &mut GenerationContext,
        ) -> Result<Vec<PlacedObject>, GenerationError> {
            Err(GenerationError::internal(self.0, ctx.chunk, "out of order"))
        }

        fn configure(&mut self, _params: &Params) -> Result<(), ValidationError> {
            Ok(())
        }

        fn reset(&mut self) {}
    }

    #[test]
    fn example_scenario() {
        let (mut manager, _) = manager();

        let report = manager.update(Vec3::ZERO).unwrap();
        assert!(report.failed.is_empty());
        assert!(report.loaded.contains(&ChunkPos::new(0, 0)));

        let origin = manager.chunk(ChunkPos::new(0, 0)).unwrap();
        assert_eq!(origin.origin(), Vec2::ZERO);
        assert_eq!(origin.seed(), 911753468085);

        let report = manager.update(Vec3::new(600.0, 0.0, 600.0)).unwrap();
        assert!(report.unloaded.contains(&ChunkPos::new(0, 0)));
        assert!(!manager.is_loaded(ChunkPos::new(0, 0)));
    }

    #[test]
    fn stationary_observer_changes_nothing() {
        let (mut manager, _) = manager();
        manager.update(Vec3::new(30.0, 5.0, 40.0)).unwrap();
        let before = loaded(&manager);

        for p in [
            Vec3::new(30.0, 5.0, 40.0),
            Vec3::new(30.0, 80.0, 40.0),
            Vec3::new(99.0, 0.0, 1.0),
        ] {
            assert!(manager.update(p).unwrap().is_empty());
            assert_eq!(loaded(&manager), before);
        }
    }

    #[test]
    fn chunks_follow_the_observer() {
        let (mut manager, _) = manager();
        let config = manager.config().unwrap().clone();

        for (x, z) in [(0.0, 0.0), (130.0, -20.0), (410.0, -260.0), (-75.0, 900.0)] {
            let observer = Vec3::new(x, 0.0, z);
            manager.update(observer).unwrap();
            let p = utility::ground(observer);

            let current = utility::chunk_of(observer, config.chunk_size);
            for dz in -3..=3 {
                for dx in -3..=3 {
                    let pos = current.offset(dx, dz);
                    if pos.center(config.chunk_size).distance(p) <= config.active_radius {
                        assert!(manager.is_loaded(pos), "{pos} missing around {p}");
                    }
                }
            }
            for chunk in manager.chunks() {
                let d = chunk.pos().center(config.chunk_size).distance(p);
                assert!(d <= config.unload_distance, "{} kept at {d}", chunk.pos());
            }
        }
    }

    #[test]
    fn chunks_are_loaded_closest_first() {
        let (mut manager, _) = manager();
        let observer = Vec3::new(10.0, 0.0, 90.0);
        let report = manager.update(observer).unwrap();

        let distances: Vec<f32> = report
            .loaded
            .iter()
            .map(|pos| pos.center(100.0).distance(utility::ground(observer)))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn generation_is_deterministic() {
        let (mut a, _) = manager();
        let (mut b, _) = manager();
        let pos = ChunkPos::new(2, 3);

        let a = a.generate_chunk(pos).unwrap();
        let b = b.generate_chunk(pos).unwrap();
        assert_eq!(a.seed(), 911675926190);
        assert_eq!(a.content().roads, b.content().roads);
        assert_eq!(a.content().terrain, b.content().terrain);

        let positions = |c: &Chunk| -> Vec<Vec2> {
            c.content()
                .objects_of_kind(ObjectKind::Building)
                .map(|o| o.position)
                .collect()
        };
        assert_eq!(positions(a), positions(b));
    }

    #[test]
    fn generating_twice_returns_the_loaded_chunk() {
        let (mut manager, backends) = manager();
        let pos = ChunkPos::new(-1, 0);

        let first = manager.generate_chunk(pos).unwrap().generated_at();
        let created = backends.renderer.created_count();
        let second = manager.generate_chunk(pos).unwrap().generated_at();

        assert_eq!(first, second);
        assert_eq!(backends.renderer.created_count(), created);
        assert_eq!(manager.loaded_chunk_count(), 1);
    }

    #[test]
    fn adjacent_chunks_are_seamless() {
        let (mut manager, _) = manager();
        manager.update(Vec3::new(50.0, 0.0, 50.0)).unwrap();

        fn along(roads: &[RoadSegment], horizontal: bool, coord: f32) -> Option<&RoadSegment> {
            roads.iter().find(|r| {
                if horizontal {
                    r.start.y == coord && r.end.y == coord
                } else {
                    r.start.x == coord && r.end.x == coord
                }
            })
        }

        let mut pairs = 0;
        for a in manager.chunks() {
            for (b_pos, edge, horizontal) in [
                (a.pos().offset(1, 0), Edge::PosX, true),
                (a.pos().offset(0, 1), Edge::PosZ, false),
            ] {
                let Some(b) = manager.chunk(b_pos) else {
                    continue;
                };
                pairs += 1;

                let ea = a.content().terrain.as_ref().unwrap().edge(edge);
                let eb = b.content().terrain.as_ref().unwrap().edge(edge.opposite());
                assert!(ea.iter().zip(&eb).all(|(x, y)| x.to_bits() == y.to_bits()));

                // Roads crossing the shared edge.
                for road in &a.content().roads {
                    let coord = if horizontal { road.start.y } else { road.start.x };
                    let crosses = if horizontal {
                        road.start.y == road.end.y
                    } else {
                        road.start.x == road.end.x
                    };
                    if !crosses {
                        continue;
                    }
                    let other = along(&b.content().roads, horizontal, coord).unwrap();
                    assert_eq!(road.width, other.width);
                    assert_eq!(road.kind, other.kind);
                    assert_eq!(road.lane_count, other.lane_count);
                }
            }
        }
        assert!(pairs > 0);
    }

    #[test]
    fn loaded_objects_never_collide() {
        let (mut manager, _) = manager();
        manager.update(Vec3::new(-20.0, 0.0, 140.0)).unwrap();

        let solid: Vec<&PlacedObject> = manager
            .chunks()
            .flat_map(|c| c.content().objects.iter())
            .filter(|o| !o.kind.is_surface())
            .collect();

        for (i, a) in solid.iter().enumerate() {
            for b in &solid[i + 1..] {
                if a.kind != b.kind {
                    assert!(!a.bbox().intersects(&b.bbox()), "{} and {}", a.id, b.id);
                }
            }
        }
    }

    #[test]
    fn every_object_owns_resources() {
        let (mut manager, backends) = manager();
        manager.update(Vec3::ZERO).unwrap();

        let objects: usize = manager.chunks().map(|c| c.content().objects.len()).sum();
        assert_eq!(backends.renderer.live_count(), objects);
        assert_eq!(backends.physics.live_count(), objects);
        assert!(manager
            .chunks()
            .flat_map(|c| c.content().objects.iter())
            .all(|o| o.handle.is_some()));

        manager.dispose();
        assert_eq!(manager.loaded_chunk_count(), 0);
        assert_eq!(backends.renderer.live_count(), 0);
        assert_eq!(backends.physics.live_count(), 0);
    }

    #[test]
    fn release_failures_do_not_block_unloading() {
        let (mut manager, backends) = manager();
        manager.generate_chunk(ChunkPos::new(0, 0)).unwrap();
        backends.physics.fail_disposal(true);

        assert!(manager.unload_chunk(ChunkPos::new(0, 0)));
        assert!(!manager.is_loaded(ChunkPos::new(0, 0)));
        assert_eq!(backends.renderer.live_count(), 0);
        assert!(backends.physics.live_count() > 0);

        assert!(!manager.unload_chunk(ChunkPos::new(0, 0)));
    }

    #[test]
    fn critical_failures_abort_the_chunk() {
        let mut registry = standard_registry();
        registry.register(Box::new(Broken("roads")));
        let (mut manager, backends) = manager_with(registry, WorldConfig::default());

        let report = manager.update(Vec3::ZERO).unwrap();
        assert!(report.loaded.is_empty());
        assert!(!report.failed.is_empty());
        assert_eq!(manager.loaded_chunk_count(), 0);
        assert_eq!(backends.renderer.created_count(), 0);

        assert!(matches!(
            manager.generate_chunk(ChunkPos::new(0, 0)),
            Err(Error::Generation(_))
        ));

        // Failed chunks are retried once the observer changes chunk.
        let report = manager.update(Vec3::new(150.0, 0.0, 0.0)).unwrap();
        assert!(report
            .failed
            .iter()
            .any(|(pos, _)| *pos == ChunkPos::new(0, 0)));
    }

    #[test]
    fn other_failures_are_skipped() {
        let mut registry = standard_registry();
        registry.register(Box::new(Broken("buildings")));
        let (mut manager, _) = manager_with(registry, WorldConfig::default());

        let chunk = manager.generate_chunk(ChunkPos::new(0, 0)).unwrap();
        assert_eq!(chunk.content().count_of_kind(ObjectKind::Building), 0);
        assert!(!chunk.content().roads.is_empty());
        assert!(chunk.content().count_of_kind(ObjectKind::StreetLamp) > 0);
    }

    #[test]
    fn invalid_observer_positions() {
        let (mut manager, _) = manager();
        assert!(matches!(
            manager.update(Vec3::new(f32::NAN, 0.0, 0.0)),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            manager.update(Vec3::new(0.0, 0.0, f32::INFINITY)),
            Err(Error::Validation(_))
        ));
        assert_eq!(manager.loaded_chunk_count(), 0);

        manager.update(Vec3::new(1e12, 0.0, -1e12)).unwrap();
        assert_eq!(manager.observer_chunk(), Some(ChunkPos::new(100_000, -100_000)));
    }

    #[test]
    fn uninitialized_and_invalid_configurations() {
        let mut manager = ChunkManager::new(
            standard_registry(),
            Box::new(HeadlessRenderer::new()),
            Box::new(HeadlessPhysics::new()),
        );
        assert!(matches!(
            manager.update(Vec3::ZERO),
            Err(Error::Configuration(ConfigurationError::NotInitialized))
        ));

        let config = WorldConfig {
            active_radius: -1.0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            manager.initialize(config),
            Err(Error::Configuration(ConfigurationError::Invalid { .. }))
        ));
        assert!(manager.config().is_none());
    }

    #[test]
    fn generator_parameters_are_applied() {
        let mut config = WorldConfig::default();
        config.generators.insert(
            "buildings".into(),
            [("density".to_owned(), Value::Float(0.0))].into_iter().collect(),
        );
        let (mut manager, _) = manager_with(standard_registry(), config);

        let chunk = manager.generate_chunk(ChunkPos::new(0, 0)).unwrap();
        assert_eq!(chunk.content().count_of_kind(ObjectKind::Building), 0);

        let mut config = WorldConfig::default();
        config.generators.insert(
            "buildings".into(),
            [("density".to_owned(), Value::Float(2.0))].into_iter().collect(),
        );
        assert!(matches!(
            manager.initialize(config),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn reinitializing_forgets_generator_parameters() {
        let mut config = WorldConfig::default();
        config.generators.insert(
            "buildings".into(),
            [("density".to_owned(), Value::Float(0.0))].into_iter().collect(),
        );
        let (mut reused, _) = manager_with(standard_registry(), config);
        reused.initialize(WorldConfig::default()).unwrap();

        let (mut fresh, _) = manager();
        let pos = ChunkPos::new(0, 0);
        let expected = fresh
            .generate_chunk(pos)
            .unwrap()
            .content()
            .count_of_kind(ObjectKind::Building);
        assert!(expected > 0);

        let chunk = reused.generate_chunk(pos).unwrap();
        assert_eq!(chunk.content().count_of_kind(ObjectKind::Building), expected);
    }

    #[test]
    fn worlds_larger_than_the_grid_are_rejected() {
        let mut manager = ChunkManager::new(
            standard_registry(),
            Box::new(HeadlessRenderer::new()),
            Box::new(HeadlessPhysics::new()),
        );

        let huge = WorldConfig {
            max_world_coordinate: 1e30,
            ..WorldConfig::default()
        };
        let tiny = WorldConfig {
            chunk_size: 0.001,
            active_radius: 0.002,
            unload_distance: 0.004,
            ..WorldConfig::default()
        };
        for config in [huge, tiny] {
            assert!(matches!(
                manager.initialize(config),
                Err(Error::Configuration(ConfigurationError::Invalid { .. }))
            ));
            assert!(manager.update(Vec3::new(1e20, 0.0, 0.0)).is_err());
        }
    }

    #[test]
    fn dispose_resets_the_manager() {
        let (mut manager, _) = manager();
        manager.update(Vec3::ZERO).unwrap();
        manager.dispose();

        assert_eq!(manager.loaded_chunk_count(), 0);
        assert_eq!(manager.observer_chunk(), None);
        assert!(manager.generate_chunk(ChunkPos::new(0, 0)).is_err());

        manager.initialize(WorldConfig::default()).unwrap();
        assert!(!manager.update(Vec3::ZERO).unwrap().loaded.is_empty());
    }
}

use sprawl_core::{ChunkPos, ObjectId, ObjectKind};

use crate::{merge_params, ParamReader, Params, ValidationError};

/// State and helpers shared by generator implementations.
///
/// A generator typically stores a [`GeneratorBase`] next to a typed configuration, and rebuilds
/// that configuration from the merged parameters on every call to
/// [`Generator::configure`](crate::Generator::configure).
#[derive(Debug, Clone)]
pub struct GeneratorBase {
    name: &'static str,
    params: Params,
}

impl GeneratorBase {
    /// Creates a new [`GeneratorBase`] with no parameter set.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            params: Params::new(),
        }
    }

    /// Returns the name of the generator.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the parameters merged so far.
    #[inline]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Forgets the parameters merged so far.
    #[inline]
    pub fn reset(&mut self) {
        self.params.clear();
    }

    /// Merges `params` into the current parameters and builds a typed configuration out of the
    /// result.
    ///
    /// The merge is only kept when `build` succeeds.
    pub fn configure<C>(
        &mut self,
        params: &Params,
        build: impl FnOnce(&ParamReader) -> Result<C, ValidationError>,
    ) -> Result<C, ValidationError> {
        let mut merged = self.params.clone();
        merge_params(&mut merged, params);
        let config = build(&ParamReader::new(&merged))?;
        self.params = merged;
        Ok(config)
    }

    /// Creates the identifier of the `index`-th object of `kind` in `chunk`.
    #[inline]
    pub fn object_id(kind: ObjectKind, chunk: ChunkPos, index: u32) -> ObjectId {
        ObjectId::new(kind, chunk, index)
    }

    /// Returns whether the world-space position `(x, z)` lies in `chunk`.
    ///
    /// Chunks are half-open: `[origin, origin + chunk_size)` on both axes.
    #[inline]
    pub fn is_in_chunk_bounds(x: f32, z: f32, chunk: ChunkPos, chunk_size: f32) -> bool {
        let origin = chunk.origin(chunk_size);
        x >= origin.x && x < origin.x + chunk_size && z >= origin.y && z < origin.y + chunk_size
    }
}

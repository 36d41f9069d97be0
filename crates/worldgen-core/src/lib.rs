//! This crate defines the contract every content generator implements, along with the helpers
//! shared by generator implementations.

use sprawl_core::{ChunkContent, PlacedObject};
use sprawl_placement::PlacementRule;

mod base;
pub use base::*;

mod context;
pub use context::*;

mod error;
pub use error::*;

mod params;
pub use params::*;

mod registry;
pub use registry::*;

/// Populates chunks with one kind of content.
///
/// Generators run one after the other on a chunk, in an order configured by the caller. Each
/// generator sees the content produced by the generators that ran before it.
pub trait Generator: Send {
    /// Returns the stable name of the generator.
    ///
    /// The name is used to order generators and to look them up.
    fn name(&self) -> &str;

    /// Generates content for the chunk described by `ctx`.
    ///
    /// Generators may record roads, intersections and terrain directly into `chunk`. The objects
    /// they place are returned and appended to the chunk by the caller.
    ///
    /// # Purity
    ///
    /// The output must only depend on the chunk seed, the context (including the adjacent
    /// chunks it exposes) and the content already present in `chunk`. Generating the same chunk
    /// twice under the same conditions must produce the same content.
    fn generate(
        &self,
        chunk: &mut ChunkContent,
        ctx: &mut GenerationContext,
    ) -> Result<Vec<PlacedObject>, GenerationError>;

    /// Returns the placement rules that this generator contributes.
    ///
    /// Rules are registered with the placement engine once, before any chunk is generated.
    fn placement_rules(&self) -> Vec<Box<dyn PlacementRule>> {
        Vec::new()
    }

    /// Merges `params` into the current configuration of the generator.
    ///
    /// Repeated calls are cumulative: keys from later calls override earlier ones. When the
    /// merged configuration is invalid, an error is returned and the previous configuration is
    /// kept.
    fn configure(&mut self, params: &Params) -> Result<(), ValidationError>;

    /// Forgets every parameter received through [`configure`](Generator::configure), going
    /// back to the default configuration.
    fn reset(&mut self);
}

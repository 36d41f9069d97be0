//! This crate defines the core data model of the streaming engine: chunk coordinates, placed
//! objects, road segments, height maps and the content a chunk owns.

mod chunk;
pub use chunk::*;

mod geometry;
pub use geometry::*;

mod object;
pub use object::*;

mod road;
pub use road::*;

mod terrain;
pub use terrain::*;

mod value;
pub use value::*;

pub mod utility;

//! Coherent noise functions.

mod perlin;
pub use perlin::*;

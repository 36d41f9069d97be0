//! Implementations of the [`Rng`](crate::Rng) trait.

mod xorshift64;
pub use xorshift64::*;

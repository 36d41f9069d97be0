//! Utility functions to work with random numbers.

mod convert;
pub use convert::*;

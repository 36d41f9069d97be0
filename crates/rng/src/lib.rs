//! Deterministic pseudo-random number generation and coherent noise.
//!
//! Everything in this crate is reproducible: the same seed always yields the same sequence of
//! values, on every platform and across process runs. World generation relies on this to build
//! the exact same chunk every time it is loaded.

pub mod utility;

pub mod noises;
pub mod rngs;

pub use sprawl_rng_derive::FromRng;

// Lets `#[derive(FromRng)]` be used inside of this crate.
extern crate self as sprawl_rng;

/// The default pseudo-random number generator.
///
/// This general purpose RNG should be sufficient in a vast majority of cases.
pub type DefaultRng = rngs::Xorshift64;

/// A seeded pseudo-random number generator.
pub trait Rng {
    /// Creates a new [`Rng`] instance from the provided seed.
    fn from_seed(seed: u64) -> Self
    where
        Self: Sized;

    /// Generates a pseudo-random `u64` value.
    fn next_u64(&mut self) -> u64;

    /// Generates a random `u32` value.
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Generates a random `f32` value in the range `[0.0, 1.0)`.
    #[inline(always)]
    fn next_f32(&mut self) -> f32 {
        utility::f32_from_u64_01(self.next_u64())
    }

    /// Generates a random `f64` value in the range `[0.0, 1.0)`.
    #[inline(always)]
    fn next_f64(&mut self) -> f64 {
        utility::f64_from_u64_01(self.next_u64())
    }

    /// Generates a random `f32` value in the range `(-1.0, 1.0)`.
    #[inline(always)]
    fn next_f32_11(&mut self) -> f32 {
        utility::f32_from_u64_11(self.next_u64())
    }

    /// Generates a random `f32` value in the range `[min, max)`.
    #[inline]
    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Generates a random integer in the range `[min, max]`.
    ///
    /// If `max` is not greater than `min`, `min` is returned and no value is consumed from the
    /// stream.
    fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }

        let span = (max as i64 - min as i64 + 1) as u64;
        (min as i64 + (self.next_u64() % span) as i64) as i32
    }

    /// Returns `true` with probability `p`.
    ///
    /// Values of `p` outside of `[0, 1]` behave like the closest bound.
    #[inline]
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Picks a uniformly distributed element of `items`.
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }

        let index = (self.next_u64() % items.len() as u64) as usize;
        items.get(index)
    }

    /// Shuffles `items` in place using the Fisher-Yates algorithm.
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = (self.next_u64() % (i as u64 + 1)) as usize;
            items.swap(i, j);
        }
    }
}

/// A trait for types that can be generated from a random number generator.
pub trait FromRng {
    /// Generates a new instance of `Self` from the provided random number generator.
    fn from_rng(rng: &mut impl Rng) -> Self;
}

impl FromRng for u32 {
    #[inline]
    fn from_rng(rng: &mut impl Rng) -> Self {
        rng.next_u32()
    }
}

impl FromRng for u64 {
    #[inline]
    fn from_rng(rng: &mut impl Rng) -> Self {
        rng.next_u64()
    }
}

impl FromRng for f32 {
    #[inline]
    fn from_rng(rng: &mut impl Rng) -> Self {
        rng.next_f32()
    }
}

impl<T: FromRng, const N: usize> FromRng for [T; N] {
    fn from_rng(rng: &mut impl Rng) -> Self {
        std::array::from_fn(|_| T::from_rng(rng))
    }
}

/// A trait for types that can map an input to a (usually continuous) pseudorandom output.
pub trait Noise<I> {
    /// The output of this noise.
    type Output;

    /// Samples the noise at the provided input.
    fn sample(&self, input: I) -> Self::Output;
}

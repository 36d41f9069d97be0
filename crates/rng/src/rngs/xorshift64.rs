use crate::Rng;

/// The number of values discarded after seeding.
///
/// Small seeds produce states with very few bits set, and the first outputs of a xorshift
/// generator seeded that way are strongly correlated with the seed.
const WARM_UP_ITERATIONS: usize = 16;

/// A small and fast pseudo-random number generator.
///
/// This number generator is based on Marsaglia's [xorshift64][source] (shift triple 13/7/17).
///
/// [source]: https://www.jstatsoft.org/article/view/v008i14
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Creates a generator from a signed seed.
    ///
    /// Only the magnitude of the seed is used, meaning that `seed` and `-seed` produce the same
    /// stream.
    #[inline]
    pub fn from_signed(seed: i64) -> Self {
        Self::from_seed(seed.unsigned_abs())
    }

    /// Creates a generator from a floating-point seed.
    ///
    /// The seed is floored and its magnitude is used. Non-finite seeds are treated as zero (and
    /// thus remapped to one).
    pub fn from_float_seed(seed: f64) -> Self {
        let seed = if seed.is_finite() {
            seed.floor().abs().min(u64::MAX as f64) as u64
        } else {
            0
        };
        Self::from_seed(seed)
    }

    /// Returns the current internal state of the generator.
    #[inline]
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Creates an independent child stream.
    ///
    /// The child is seeded from the current state plus `offset` and does not advance this
    /// generator. Two children derived with different offsets are decorrelated from each other
    /// and from the parent.
    #[inline]
    pub fn derive(&self, offset: u64) -> Self {
        Self::from_seed(self.state.wrapping_add(offset))
    }

    #[inline(always)]
    fn step(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl Rng for Xorshift64 {
    fn from_seed(seed: u64) -> Self
    where
        Self: Sized,
    {
        // A xorshift generator never leaves the zero state.
        let mut ret = Self {
            state: if seed == 0 { 1 } else { seed },
        };

        for _ in 0..WARM_UP_ITERATIONS {
            ret.step();
        }

        ret
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xorshift64::from_seed(12345);
        let mut b = Xorshift64::from_seed(12345);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn zero_seed_is_remapped_to_one() {
        let mut zero = Xorshift64::from_seed(0);
        let mut one = Xorshift64::from_seed(1);
        assert_eq!(zero, one);
        assert_ne!(zero.next_u64(), 0);
        assert_eq!(zero.next_u64(), one.nth_for_test(2));
    }

    #[test]
    fn signed_and_float_seeds_use_the_magnitude() {
        assert_eq!(Xorshift64::from_signed(-42), Xorshift64::from_seed(42));
        assert_eq!(Xorshift64::from_float_seed(-42.7), Xorshift64::from_seed(43));
        assert_eq!(Xorshift64::from_float_seed(42.7), Xorshift64::from_seed(42));
        assert_eq!(Xorshift64::from_float_seed(f64::NAN), Xorshift64::from_seed(1));
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Xorshift64::from_seed(1);
        let mut b = Xorshift64::from_seed(2);
        let same = (0..64).filter(|_| a.next_u64() == b.next_u64()).count();
        assert_eq!(same, 0);
    }

    #[test]
    fn derived_streams_do_not_advance_the_parent() {
        let parent = Xorshift64::from_seed(7);
        let before = parent.state();
        let mut child_a = parent.derive(1);
        let mut child_b = parent.derive(2);
        assert_eq!(parent.state(), before);
        assert_ne!(child_a.next_u64(), child_b.next_u64());
        assert_eq!(parent.derive(1), parent.derive(1));
    }

    #[test]
    fn floats_stay_in_unit_range() {
        let mut rng = Xorshift64::from_seed(9);
        for _ in 0..10_000 {
            let f = rng.next_f32();
            assert!((0.0..1.0).contains(&f));
        }
    }

    impl Xorshift64 {
        fn nth_for_test(&mut self, n: usize) -> u64 {
            let mut last = 0;
            for _ in 0..n {
                last = self.next_u64();
            }
            last
        }
    }
}

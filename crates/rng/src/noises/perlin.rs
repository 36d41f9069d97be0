use crate::{DefaultRng, FromRng, Noise, Rng};

/// The number of entries in the permutation table before duplication.
const PERM_SIZE: usize = 256;

/// A 2D gradient (Perlin) noise implementation.
///
/// The gradient lookup goes through a permutation of `[0, 255]` built with a seeded
/// Fisher-Yates shuffle. The table is stored twice in a row so that `perm[perm[x] + y + 1]`
/// never needs to wrap around.
#[derive(Clone)]
pub struct Perlin2 {
    perm: Box<[u8; PERM_SIZE * 2]>,
}

impl std::fmt::Debug for Perlin2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Perlin2")
            .field("perm", &&self.perm[..8])
            .finish_non_exhaustive()
    }
}

impl FromRng for Perlin2 {
    fn from_rng(rng: &mut impl Rng) -> Self {
        let mut base: [u8; PERM_SIZE] = std::array::from_fn(|i| i as u8);
        rng.shuffle(&mut base);

        let mut perm = Box::new([0u8; PERM_SIZE * 2]);
        perm[..PERM_SIZE].copy_from_slice(&base);
        perm[PERM_SIZE..].copy_from_slice(&base);

        Self { perm }
    }
}

impl Perlin2 {
    /// Creates a new [`Perlin2`] noise from the provided seed.
    pub fn new(seed: u64) -> Self {
        Self::from_rng(&mut DefaultRng::from_seed(seed))
    }

    /// Samples the noise and remaps the result to `[0.0, 1.0]`.
    #[inline]
    pub fn sample01(&self, coords: [f32; 2]) -> f32 {
        (self.sample(coords) + 1.0) * 0.5
    }

    /// Sums `octaves` layers of noise at doubling frequencies.
    ///
    /// Each octave's amplitude is the previous one multiplied by `persistence`. The result is
    /// divided by the total amplitude so that it stays in `[-1.0, 1.0]` regardless of the number
    /// of octaves.
    #[profiling::function]
    pub fn octaves(&self, [x, y]: [f32; 2], octaves: u32, persistence: f32) -> f32 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves {
            total += self.sample([x * frequency, y * frequency]) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }

        if max_amplitude > 0.0 {
            total / max_amplitude
        } else {
            0.0
        }
    }
}

impl Noise<[f32; 2]> for Perlin2 {
    type Output = f32;

    /// Samples the provided position in the noise field.
    ///
    /// # Returns
    ///
    /// This function returns the sampled value in the range `[-1.0, 1.0]`. The value is exactly
    /// zero on every integer lattice point.
    fn sample(&self, [x, y]: [f32; 2]) -> f32 {
        let xi = crate::utility::floor_i32(x);
        let yi = crate::utility::floor_i32(y);

        let xf = x - xi as f32;
        let yf = y - yi as f32;

        let px = (xi & 0xFF) as usize;
        let py = (yi & 0xFF) as usize;

        let p = &self.perm;
        let aa = p[p[px] as usize + py];
        let ab = p[p[px] as usize + py + 1];
        let ba = p[p[px + 1] as usize + py];
        let bb = p[p[px + 1] as usize + py + 1];

        let u = fade(xf);
        let v = fade(yf);

        let x1 = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let x2 = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);

        lerp(x1, x2, v).clamp(-1.0, 1.0)
    }
}

/// Fractal noise: a [`Perlin2`] field sampled over several octaves.
#[derive(Debug, Clone)]
pub struct Fbm2 {
    /// The underlying noise field.
    pub noise: Perlin2,
    /// The number of octaves to sum.
    pub octaves: u32,
    /// The amplitude falloff between two consecutive octaves.
    pub persistence: f32,
    /// The frequency of the first octave.
    pub frequency: f32,
}

impl Fbm2 {
    /// Creates a new [`Fbm2`] from the provided noise field and parameters.
    pub fn new(noise: Perlin2, octaves: u32, persistence: f32, frequency: f32) -> Self {
        Self {
            noise,
            octaves,
            persistence,
            frequency,
        }
    }
}

impl Noise<[f32; 2]> for Fbm2 {
    type Output = f32;

    #[inline]
    fn sample(&self, [x, y]: [f32; 2]) -> f32 {
        self.noise.octaves(
            [x * self.frequency, y * self.frequency],
            self.octaves,
            self.persistence,
        )
    }
}

/// The quintic fade curve `6t^5 - 15t^4 + 10t^3`.
#[inline(always)]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline(always)]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Picks one of eight gradient directions and returns its dot product with `(x, y)`.
#[inline(always)]
fn grad(hash: u8, x: f32, y: f32) -> f32 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_field() {
        let a = Perlin2::new(42);
        let b = Perlin2::new(42);
        for i in 0..100 {
            let p = [i as f32 * 0.37 - 10.0, i as f32 * 0.11 + 3.0];
            assert_eq!(a.sample(p).to_bits(), b.sample(p).to_bits());
        }
    }

    #[test]
    fn permutation_is_a_duplicated_permutation() {
        let noise = Perlin2::new(7);
        let mut seen = [false; 256];
        for &v in &noise.perm[..256] {
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(noise.perm[..256], noise.perm[256..]);
    }

    #[test]
    fn output_is_bounded() {
        let noise = Perlin2::new(3);
        for i in 0..2000 {
            let p = [i as f32 * 0.173, (i % 37) as f32 * -0.59];
            let v = noise.sample(p);
            assert!((-1.0..=1.0).contains(&v));
            assert!((0.0..=1.0).contains(&noise.sample01(p)));
            let o = noise.octaves(p, 5, 0.5);
            assert!((-1.0..=1.0).contains(&o));
        }
    }

    #[test]
    fn field_is_continuous() {
        let noise = Perlin2::new(11);
        let step = 0.001;
        for i in 0..1000 {
            let x = i as f32 * 0.013 - 5.0;
            let a = noise.sample([x, 1.3]);
            let b = noise.sample([x + step, 1.3]);
            assert!((a - b).abs() < 0.01, "jump between {a} and {b} at {x}");
        }
    }

    #[test]
    fn lattice_points_are_zero() {
        let noise = Perlin2::new(5);
        assert_eq!(noise.sample([3.0, -4.0]), 0.0);
    }

    #[test]
    fn zero_octaves_yield_zero() {
        let noise = Perlin2::new(5);
        assert_eq!(noise.octaves([0.3, 0.4], 0, 0.5), 0.0);
    }

    #[test]
    fn fbm_matches_scaled_octaves() {
        let fbm = Fbm2::new(Perlin2::new(8), 4, 0.5, 0.5);
        let direct = fbm.noise.octaves([1.5, 2.5], 4, 0.5);
        assert_eq!(fbm.sample([3.0, 5.0]), direct);
    }
}

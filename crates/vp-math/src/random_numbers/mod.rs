//! Random number generators.
//!
//! Wrappers around `rand_mt`'s 64-bit Mersenne Twister. Each Monte Carlo
//! chunk owns its own generator, seeded by [`derive_seed`] from the user
//! seed and the chunk index, so a run is reproducible regardless of how
//! chunks are scheduled across threads.

use rand_mt::Mt19937GenRand64;
use vp_core::Real;

/// Mix a base seed with a stream index into an independent 64-bit seed.
///
/// SplitMix64 finaliser over `seed + (stream + 1)·γ`. Distinct streams of
/// the same seed yield well separated Mersenne Twister states.
pub fn derive_seed(seed: u64, stream: u64) -> u64 {
    const GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut z = seed.wrapping_add(stream.wrapping_add(1).wrapping_mul(GAMMA));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A uniform pseudo-random number generator based on MT19937-64.
pub struct MersenneTwisterUniformRng {
    rng: Mt19937GenRand64,
}

impl MersenneTwisterUniformRng {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mt19937GenRand64::new(seed),
        }
    }

    /// Generate the next uniform deviate in the open interval `(0, 1)`.
    pub fn next_real(&mut self) -> Real {
        // top 53 bits, shifted half an ulp off zero
        let u = self.rng.next_u64() >> 11;
        (u as f64 + 0.5) / (1u64 << 53) as f64
    }
}

/// An inverse-cumulative normal random number generator.
///
/// Transforms Mersenne Twister uniforms through the inverse standard normal
/// CDF.
pub struct InverseCumulativeNormalRng {
    inner: MersenneTwisterUniformRng,
}

impl InverseCumulativeNormalRng {
    /// Create a new generator backed by a Mersenne Twister with the given
    /// seed.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: MersenneTwisterUniformRng::new(seed),
        }
    }

    /// Generate the next standard-normal deviate.
    pub fn next_real(&mut self) -> Real {
        crate::distributions::normal_cdf_inverse(self.inner.next_real())
    }
}

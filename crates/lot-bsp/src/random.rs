//! Deterministic random source compatible with `java.util.Random`.
//!
//! Subdivision decisions must be reproducible across independent
//! implementations, so the generator replicates the 48-bit linear
//! congruential generator of `java.util.Random` bit for bit: same seeding
//! scramble, same multiplier and increment, same bit extraction for every
//! draw.

use rand_core::{RngCore, SeedableRng};

/// Multiplier of the LCG; also the seed scramble constant.
pub const MULTIPLIER: u64 = 0x5_DEEC_E66D;

/// Increment of the LCG.
pub const INCREMENT: u64 = 0xB;

/// Mask keeping the low 48 bits of the state.
pub const MASK_48: u64 = (1 << 48) - 1;

const DOUBLE_UNIT: f64 = 1.0 / (1u64 << 53) as f64;
const FLOAT_UNIT: f32 = 1.0 / (1u32 << 24) as f32;

/// Java-compatible 48-bit linear congruential generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaRandom {
    state: u64,
}

impl JavaRandom {
    /// Creates a generator from a seed, scrambled like `new Random(seed)`.
    pub fn new(seed: i64) -> Self {
        Self {
            state: Self::scramble(seed),
        }
    }

    /// Resets the generator as if freshly created with `seed`.
    pub fn set_seed(&mut self, seed: i64) {
        self.state = Self::scramble(seed);
    }

    #[inline]
    fn scramble(seed: i64) -> u64 {
        (seed as u64 ^ MULTIPLIER) & MASK_48
    }

    /// Advances the state and returns its top `bits` bits (`1..=32`).
    ///
    /// For `bits == 32` the result wraps into the sign bit, as Java's `int`
    /// does.
    #[inline]
    pub fn advance(&mut self, bits: u32) -> i32 {
        debug_assert!((1..=32).contains(&bits), "bits must be in 1..=32");
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            & MASK_48;
        (self.state >> (48 - bits)) as u32 as i32
    }

    /// Uniform integer in `0..bound`.
    ///
    /// # Panics
    /// Panics if `bound` is not positive.
    pub fn next_int(&mut self, bound: i32) -> i32 {
        assert!(bound > 0, "bound must be positive");

        if bound & bound.wrapping_neg() == bound {
            return ((i64::from(bound) * i64::from(self.advance(31))) >> 31) as i32;
        }

        loop {
            let bits = self.advance(31);
            let val = bits % bound;
            // Rejects the biased tail; the check relies on i32 overflow.
            if bits.wrapping_sub(val).wrapping_add(bound - 1) >= 0 {
                return val;
            }
        }
    }

    /// Any 32-bit integer.
    #[inline]
    pub fn next_i32(&mut self) -> i32 {
        self.advance(32)
    }

    /// Any 64-bit integer, built from two 32-bit draws.
    #[inline]
    pub fn next_long(&mut self) -> i64 {
        let high = i64::from(self.advance(32));
        let low = i64::from(self.advance(32));
        (high << 32).wrapping_add(low)
    }

    /// Fair coin flip.
    #[inline]
    pub fn next_boolean(&mut self) -> bool {
        self.advance(1) != 0
    }

    /// Uniform `f32` in `[0, 1)` with 24 bits of precision.
    #[inline]
    pub fn next_float(&mut self) -> f32 {
        self.advance(24) as f32 * FLOAT_UNIT
    }

    /// Uniform `f64` in `[0, 1)` with 53 bits of precision.
    #[inline]
    pub fn next_double(&mut self) -> f64 {
        let high = i64::from(self.advance(26)) << 27;
        let low = i64::from(self.advance(27));
        (high + low) as f64 * DOUBLE_UNIT
    }
}

impl RngCore for JavaRandom {
    fn next_u32(&mut self) -> u32 {
        self.next_i32() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_long() as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        rand_core::impls::fill_bytes_via_next(self, dst)
    }
}

impl SeedableRng for JavaRandom {
    type Seed = [u8; 8];

    /// Interprets the bytes as a little-endian `i64` seed.
    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(i64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as i64)
    }
}

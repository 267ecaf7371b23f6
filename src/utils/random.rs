//! Seeded random number generation.
//!
//! [`Mt19937`] is the 32-bit Mersenne Twister with the classic `init_genrand`
//! seeding, exposed through the `rand` traits. [`SeededNormal`] draws normal
//! variates from it with the polar method, caching the second variate of each
//! pair, and converts two 32-bit outputs into one 53-bit uniform double. This is
//! the same stream NumPy's legacy `RandomState` produces, so a seed such as
//! `12345` yields the textbook reference samples bit for bit.

use rand::{Error, RngCore, SeedableRng};

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

/// 32-bit Mersenne Twister (MT19937).
#[derive(Clone)]
pub struct Mt19937 {
    state: [u32; N],
    index: usize,
}

impl std::fmt::Debug for Mt19937 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mt19937").field("index", &self.index).finish()
    }
}

impl Mt19937 {
    /// Create a generator seeded with `init_genrand(seed)`.
    pub fn new(seed: u32) -> Self {
        let mut state = [0u32; N];
        state[0] = seed;
        for i in 1..N {
            let prev = state[i - 1];
            state[i] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        Self { state, index: N }
    }

    fn twist(&mut self) {
        for kk in 0..N {
            let y = (self.state[kk] & UPPER_MASK) | (self.state[(kk + 1) % N] & LOWER_MASK);
            let mag = if y & 1 == 1 { MATRIX_A } else { 0 };
            self.state[kk] = self.state[(kk + M) % N] ^ (y >> 1) ^ mag;
        }
        self.index = 0;
    }

    /// Uniform double in [0, 1) with 53 bits of precision.
    pub fn next_double(&mut self) -> f64 {
        let a = (self.next_u32() >> 5) as f64;
        let b = (self.next_u32() >> 6) as f64;
        (a * 67_108_864.0 + b) / 9_007_199_254_740_992.0
    }
}

impl RngCore for Mt19937 {
    fn next_u32(&mut self) -> u32 {
        if self.index >= N {
            self.twist();
        }
        let mut y = self.state[self.index];
        self.index += 1;

        // Tempering
        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;
        y
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mt19937 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// Normal variates from a seeded Mersenne Twister using the polar method.
#[derive(Debug, Clone)]
pub struct SeededNormal {
    rng: Mt19937,
    cached: Option<f64>,
}

impl SeededNormal {
    /// Create a normal stream seeded with `seed`.
    pub fn new(seed: u32) -> Self {
        Self {
            rng: Mt19937::new(seed),
            cached: None,
        }
    }

    /// Draw one standard normal variate.
    pub fn standard_normal(&mut self) -> f64 {
        if let Some(z) = self.cached.take() {
            return z;
        }
        loop {
            let x1 = 2.0 * self.rng.next_double() - 1.0;
            let x2 = 2.0 * self.rng.next_double() - 1.0;
            let r2 = x1 * x1 + x2 * x2;
            if r2 < 1.0 && r2 != 0.0 {
                let f = (-2.0 * r2.ln() / r2).sqrt();
                self.cached = Some(f * x1);
                return f * x2;
            }
        }
    }

    /// Draw `n` standard normal variates.
    pub fn standard_normals(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.standard_normal()).collect()
    }

    /// Draw `n` variates from N(`loc`, `scale`^2).
    pub fn normals(&mut self, loc: f64, scale: f64, n: usize) -> Vec<f64> {
        (0..n).map(|_| loc + scale * self.standard_normal()).collect()
    }

    /// Uniform double in [0, 1).
    pub fn uniform(&mut self) -> f64 {
        self.rng.next_double()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::stats::{mean, std_dev};
    use rand::Rng;

    #[test]
    fn mt19937_reference_output() {
        // First outputs of init_genrand(5489), the reference default seed.
        let mut rng = Mt19937::new(5489);
        assert_eq!(rng.next_u32(), 3_499_211_612);
        assert_eq!(rng.next_u32(), 581_869_302);
        assert_eq!(rng.next_u32(), 3_890_346_734);
        assert_eq!(rng.next_u32(), 3_586_334_585);
    }

    #[test]
    fn mt19937_ten_thousandth_output() {
        let mut rng = Mt19937::new(5489);
        let mut last = 0;
        for _ in 0..10_000 {
            last = rng.next_u32();
        }
        assert_eq!(last, 4_123_659_995);
    }

    #[test]
    fn seedable_matches_new() {
        let mut a = Mt19937::from_seed(12345u32.to_le_bytes());
        let mut b = Mt19937::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn works_through_rand_traits() {
        let mut rng = Mt19937::new(42);
        let x: f64 = rng.gen();
        assert!((0.0..1.0).contains(&x));
        let k = rng.gen_range(0..10);
        assert!(k < 10);
    }

    #[test]
    fn doubles_are_in_unit_interval() {
        let mut rng = Mt19937::new(1);
        for _ in 0..1000 {
            let u = rng.next_double();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn normals_have_expected_moments() {
        let mut gen = SeededNormal::new(12345);
        let data = gen.normals(7.0, 3.0, 20_000);
        assert!((mean(&data) - 7.0).abs() < 0.1);
        assert!((std_dev(&data) - 3.0).abs() < 0.1);
    }

    #[test]
    fn same_seed_same_stream() {
        let a = SeededNormal::new(99).standard_normals(10);
        let b = SeededNormal::new(99).standard_normals(10);
        assert_eq!(a, b);
    }

    #[test]
    fn pairs_are_cached() {
        let mut gen = SeededNormal::new(7);
        let _ = gen.standard_normal();
        assert!(gen.cached.is_some());
        let _ = gen.standard_normal();
        assert!(gen.cached.is_none());
    }
}

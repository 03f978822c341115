// Minimal PRNG (no external crates).
//
// This is NOT cryptographically secure.
// Every environment instance owns one, so instances stay independent and
// rollouts are reproducible from a seed.

const ZERO_STATE_FALLBACK: u64 = 0x9E3779B97F4A7C15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        // xorshift has a fixed point at zero.
        let seed = if seed == 0 { ZERO_STATE_FALLBACK } else { seed };
        Self { state: seed }
    }

    /// Derive the generator for stream `index` of a base seed.
    ///
    /// Vectorized hosts seed instance `i` with `for_stream(seed, i)` so that
    /// neighbouring instances do not start from correlated states.
    pub fn for_stream(seed: u64, index: u64) -> Self {
        Self::new(splitmix64(seed ^ splitmix64(index.wrapping_add(1))))
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform draw from `0..n`. Returns 0 when `n == 0`.
    #[inline]
    pub fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        (self.next_u64() % n as u64) as usize
    }

    /// Uniform draw from the inclusive range `low..=high`.
    #[inline]
    pub fn range_inclusive(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        low + self.below(high - low + 1)
    }
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Prng::new(7);
        let mut b = Prng::new(7);
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn zero_seed_is_not_stuck() {
        let mut rng = Prng::new(0);
        let first = rng.next_u32();
        let second = rng.next_u32();
        assert!(first != 0 || second != 0);
    }

    #[test]
    fn range_inclusive_stays_in_bounds_and_hits_both_ends() {
        let mut rng = Prng::new(99);
        let mut seen = [false; 4];
        for _ in 0..1_000 {
            let v = rng.range_inclusive(3, 6);
            assert!((3..=6).contains(&v));
            seen[v - 3] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(rng.range_inclusive(5, 5), 5);
    }

    #[test]
    fn streams_diverge() {
        let mut a = Prng::for_stream(1, 0);
        let mut b = Prng::for_stream(1, 1);
        let va: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let vb: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(va, vb);
    }
}

//! Small seedable PRNG shared by the shuffler and the confetti generator

/// PCG-style generator; seeded from the platform entropy source by default
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleRng {
    pub fn new() -> Self {
        // Use getrandom for WASM-compatible random seeding
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: use a static counter if getrandom fails
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        Self::with_seed(u64::from_le_bytes(seed_bytes))
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Uniform integer in `[0, bound)`. `bound` must be non-zero.
    pub fn below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        let bound = bound as u64;
        let span = u64::from(u32::MAX) + 1;
        // Reject the tail so every residue is equally likely
        let zone = span - span % bound;
        loop {
            let value = u64::from(self.next_u32());
            if value < zone {
                return (value % bound) as usize;
            }
        }
    }

    /// Uniform float in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }

    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform integer in the inclusive range `[min, max]`
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        let width = (i64::from(max) - i64::from(min) + 1) as usize;
        min + self.below(width) as i32
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.below(i + 1);
            slice.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_sequence_is_reproducible() {
        let mut a = SimpleRng::with_seed(7);
        let mut b = SimpleRng::with_seed(7);
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_below_stays_in_bounds() {
        let mut rng = SimpleRng::with_seed(42);
        for bound in 1..40 {
            for _ in 0..50 {
                assert!(rng.below(bound) < bound);
            }
        }
    }

    #[test]
    fn test_ranges() {
        let mut rng = SimpleRng::with_seed(3);
        for _ in 0..500 {
            let f = rng.next_f64();
            assert!((0.0..1.0).contains(&f));

            let r = rng.range_f64(2.5, 5.0);
            assert!((2.5..5.0).contains(&r));

            let i = rng.range_i32(-100, 100);
            assert!((-100..=100).contains(&i));
        }
    }

    #[test]
    fn test_range_i32_reaches_both_ends() {
        let mut rng = SimpleRng::with_seed(11);
        let values: Vec<i32> = (0..400).map(|_| rng.range_i32(6, 12)).collect();
        assert!(values.contains(&6));
        assert!(values.contains(&12));
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = SimpleRng::with_seed(99);
        let mut items: Vec<usize> = (0..25).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..25).collect::<Vec<_>>());
    }
}

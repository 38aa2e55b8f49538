use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Global cap on the number of levels any node, including the head, may have.
pub const MAX_HEIGHT: usize = 33;

/// Chooses how many levels a freshly inserted element takes part in.
///
/// Implementations return a height in `1..=max_height()`. The list clamps the
/// returned value further, so that the structure only ever grows one level
/// at a time.
pub trait HeightControl<T> {
    fn max_height(&self) -> usize;
    fn get_height(&mut self, element: &T) -> usize;
}

fn check_max_height(max_height: usize) {
    assert!(max_height > 0, "a skip list needs at least one level");
    assert!(
        max_height <= MAX_HEIGHT,
        "max_height {} exceeds the level cap {}",
        max_height,
        MAX_HEIGHT
    );
}

pub struct GeometricalGenerator {
    upgrade_probability_: f64,
    max_height_: usize,
    rng_: StdRng,
}

impl GeometricalGenerator {
    pub fn new(max_height: usize, upgrade_probability: f64) -> GeometricalGenerator {
        Self::with_rng(max_height, upgrade_probability, StdRng::from_entropy())
    }

    /// Same as `new`, but the sequence of heights is fully determined by
    /// `seed`.
    pub fn seeded(max_height: usize, upgrade_probability: f64, seed: u64) -> GeometricalGenerator {
        Self::with_rng(max_height, upgrade_probability, StdRng::seed_from_u64(seed))
    }

    fn with_rng(max_height: usize, upgrade_probability: f64, rng: StdRng) -> GeometricalGenerator {
        check_max_height(max_height);
        assert!(upgrade_probability > 0.0);
        assert!(upgrade_probability < 1.0);

        GeometricalGenerator {
            upgrade_probability_: upgrade_probability,
            max_height_: max_height,
            rng_: rng,
        }
    }

    pub fn upgrade_probability(&self) -> f64 {
        self.upgrade_probability_
    }
}

impl Default for GeometricalGenerator {
    fn default() -> Self {
        GeometricalGenerator::new(MAX_HEIGHT, 0.5)
    }
}

impl<T> HeightControl<T> for GeometricalGenerator {
    #[inline(always)]
    fn max_height(&self) -> usize {
        self.max_height_
    }

    fn get_height(&mut self, _element: &T) -> usize {
        // Simulates a random variate with geometric distribution: one level
        // for free, plus the number of successful coin throws until the
        // first failure.
        let mut h = 1;

        while h < self.max_height_ {
            if !self.rng_.gen_bool(self.upgrade_probability_) {
                return h;
            }

            h += 1;
        }

        h
    }
}

// 'HashCoinGenerator' creates heights by counting the trailing zeros of the
// hashed element. This is akin to a Geometric(1/2) as long as the hash function
// distributes uniformly, and the height of a given element is the same every
// time it is inserted.
pub struct HashCoinGenerator<S = RandomState> {
    max_height_: usize,
    hasher_: S,
}

impl HashCoinGenerator<RandomState> {
    pub fn new(max_height: usize) -> HashCoinGenerator<RandomState> {
        Self::with_hasher(max_height, RandomState::new())
    }
}

impl<S: BuildHasher> HashCoinGenerator<S> {
    pub fn with_hasher(max_height: usize, hasher: S) -> HashCoinGenerator<S> {
        check_max_height(max_height);
        HashCoinGenerator {
            max_height_: max_height,
            hasher_: hasher,
        }
    }
}

impl<T: Hash, S: BuildHasher> HeightControl<T> for HashCoinGenerator<S> {
    #[inline(always)]
    fn max_height(&self) -> usize {
        self.max_height_
    }

    fn get_height(&mut self, element: &T) -> usize {
        // The probability of a run of exactly i trailing zeros is
        // (1/2)^(i + 1). Saturate rather than wrap so the cap is never
        // exceeded and tall towers stay rare.
        let zeros = self.hasher_.hash_one(element).trailing_zeros() as usize;
        std::cmp::min(zeros + 1, self.max_height_)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::{BuildHasherDefault, Hasher};

    #[test]
    fn geometrical_stays_in_bounds() {
        let mut generator = GeometricalGenerator::seeded(6, 0.9, 17);
        for _ in 0..10_000 {
            let h = HeightControl::<u32>::get_height(&mut generator, &0);
            assert!(h >= 1 && h <= 6);
        }
    }

    #[test]
    fn geometrical_is_reproducible() {
        let mut a = GeometricalGenerator::seeded(MAX_HEIGHT, 0.5, 99);
        let mut b = GeometricalGenerator::seeded(MAX_HEIGHT, 0.5, 99);
        for i in 0..500u32 {
            assert_eq!(a.get_height(&i), b.get_height(&i));
        }
    }

    #[test]
    fn geometrical_fair_coin_mostly_short() {
        let mut generator = GeometricalGenerator::seeded(MAX_HEIGHT, 0.5, 3);
        let samples = 20_000;
        let ones = (0..samples)
            .filter(|i| generator.get_height(i) == 1)
            .count();
        // Expected half of the samples; leave a wide margin.
        assert!(ones > samples * 4 / 10 && ones < samples * 6 / 10);
    }

    #[test]
    #[should_panic]
    fn geometrical_rejects_certain_upgrade() {
        GeometricalGenerator::new(4, 1.0);
    }

    #[test]
    #[should_panic]
    fn rejects_zero_height() {
        HashCoinGenerator::new(0);
    }

    #[test]
    #[should_panic]
    fn rejects_height_over_cap() {
        GeometricalGenerator::new(MAX_HEIGHT + 1, 0.5);
    }

    // Hashes everything to zero, which has the maximum number of trailing
    // zeros.
    #[derive(Default)]
    struct ZeroHasher;

    impl Hasher for ZeroHasher {
        fn finish(&self) -> u64 {
            0
        }

        fn write(&mut self, _bytes: &[u8]) {}
    }

    #[test]
    fn hash_coin_saturates_at_cap() {
        let mut generator =
            HashCoinGenerator::with_hasher(5, BuildHasherDefault::<ZeroHasher>::default());
        assert_eq!(generator.get_height(&1234u64), 5);
    }

    #[test]
    fn hash_coin_is_deterministic_per_element() {
        let mut generator = HashCoinGenerator::new(MAX_HEIGHT);
        for i in 0..100u64 {
            let first = generator.get_height(&i);
            assert_eq!(generator.get_height(&i), first);
            assert!(first >= 1 && first <= MAX_HEIGHT);
        }
    }
}

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeds from OS entropy. The chosen seed is kept so a session can be replayed.
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform sample of up to `amount` items without replacement, in random order.
    pub fn sample<T: Copy>(&mut self, items: &[T], amount: usize) -> Vec<T> {
        items
            .choose_multiple(&mut self.rng, amount)
            .copied()
            .collect()
    }

    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        items.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sample() {
        let items: Vec<u32> = (1..=36).collect();
        let mut a = RngState::from_seed(7);
        let mut b = RngState::from_seed(7);
        assert_eq!(a.sample(&items, 6), b.sample(&items, 6));
        assert_eq!(a.pick(&items), b.pick(&items));
    }

    #[test]
    fn sample_caps_at_available() {
        let mut rng = RngState::from_seed(1);
        assert_eq!(rng.sample(&[1, 2], 6).len(), 2);
        assert!(rng.pick::<u32>(&[]).is_none());
    }
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks one of several equally needy choosers
pub trait TieBreaker {
    /// Index into `tied`, which always holds at least two names
    fn pick(&mut self, tied: &[String]) -> usize;
}

/// Uniform random pick, reproducible when built from a seed
#[derive(Debug, Clone)]
pub struct RandomTieBreak<R: Rng = StdRng> {
    rng: R,
}

impl<R: Rng> RandomTieBreak<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomTieBreak<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Seeded when a seed is configured, otherwise from entropy
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl<R: Rng> TieBreaker for RandomTieBreak<R> {
    fn pick(&mut self, tied: &[String]) -> usize {
        self.rng.gen_range(0..tied.len())
    }
}

/// Always takes the earliest player in roster order
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTied;

impl TieBreaker for FirstTied {
    fn pick(&mut self, _tied: &[String]) -> usize {
        0
    }
}

impl<T: TieBreaker + ?Sized> TieBreaker for &mut T {
    fn pick(&mut self, tied: &[String]) -> usize {
        (**self).pick(tied)
    }
}

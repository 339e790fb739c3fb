//! Production randomness for battles.
use combat_core::RngSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// [`RngSource`] backed by the operating system's entropy.
pub struct EntropyRng {
    inner: StdRng,
}

impl EntropyRng {
    pub fn new() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }

    /// Reproducible stream, for replays and demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for EntropyRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngSource for EntropyRng {
    fn next_f64(&mut self) -> f64 {
        self.inner.r#gen::<f64>()
    }
}

/// Creates one independent random source per battle.
pub type RngFactory = std::sync::Arc<dyn Fn() -> Box<dyn RngSource + Send> + Send + Sync>;

pub(crate) fn entropy_factory() -> RngFactory {
    std::sync::Arc::new(|| Box::new(EntropyRng::new()))
}

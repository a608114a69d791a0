//! Estimated GDP policy.
//!
//! The estimate is `population × multiplier ÷ exchange_rate`, with the
//! multiplier drawn uniformly from `[1000, 2000)` for every country on every
//! refresh. The figure is synthetic and deliberately non-reproducible; the
//! multiplier source is injected so callers can pin it.

use std::{
  ops::Range,
  sync::{Mutex, PoisonError},
};

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Half-open range the multiplier is drawn from.
pub const MULTIPLIER_RANGE: Range<f64> = 1000.0..2000.0;

/// A source of GDP multipliers.
pub trait GdpMultiplier: Send + Sync {
  /// Draw the next multiplier. Implementations used in production must stay
  /// within [`MULTIPLIER_RANGE`].
  fn draw(&self) -> f64;
}

/// Draws from the thread-local RNG. The production default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngMultiplier;

impl GdpMultiplier for ThreadRngMultiplier {
  fn draw(&self) -> f64 { rand::thread_rng().gen_range(MULTIPLIER_RANGE) }
}

/// Draws from a seeded [`StdRng`]; the sequence is reproducible per seed.
#[derive(Debug)]
pub struct SeededMultiplier {
  rng: Mutex<StdRng>,
}

impl SeededMultiplier {
  pub fn new(seed: u64) -> Self {
    Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
  }
}

impl GdpMultiplier for SeededMultiplier {
  fn draw(&self) -> f64 {
    self
      .rng
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .gen_range(MULTIPLIER_RANGE)
  }
}

/// Always returns the same value.
#[derive(Debug, Clone, Copy)]
pub struct FixedMultiplier(pub f64);

impl GdpMultiplier for FixedMultiplier {
  fn draw(&self) -> f64 { self.0 }
}

/// Compute the estimate. Returns `None` when `rate` cannot be divided by
/// (zero, negative, NaN or infinite).
pub fn estimate(population: u64, multiplier: f64, rate: f64) -> Option<f64> {
  (rate.is_finite() && rate > 0.0).then(|| population as f64 * multiplier / rate)
}

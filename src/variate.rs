//! Random variates for request generation: uniform module indices and a wrapped normal
//! clustered around a preferred module.
//!
//! Each [`VariateGenerator`] owns its engine and its Box–Muller cache, so independent runs
//! never share draw state.

use rand::distributions::Open01;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

/// Seeded source of uniform and wrapped-normal integers.
#[derive(Clone, Debug)]
pub struct VariateGenerator<R = ChaCha8Rng> {
    rng: R,
    /// Cached `(U, V)` pair shared by the sine and cosine halves of one Box–Muller draw.
    pair: (f64, f64),
    /// `false`: next normal draw samples a fresh pair; `true`: reuse `pair`.
    odd_phase: bool,
}

impl VariateGenerator<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Generator for one run of a sweep: same seed, distinct ChaCha stream per run.
    pub fn for_run(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self::new(rng)
    }
}

impl<R: Rng> VariateGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            pair: (0.0, 0.0),
            odd_phase: false,
        }
    }

    /// Uniform integer in `[0, max)`.
    ///
    /// Panics if `max == 0`; callers validate module counts up front.
    pub fn uniform(&mut self, max: usize) -> usize {
        self.rng.gen_range(0..max)
    }

    /// Standard normal variate, two per sampled `(U, V)` pair.
    pub fn standard_normal(&mut self) -> f64 {
        let z = if self.odd_phase {
            let (u, v) = self.pair;
            (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
        } else {
            let u: f64 = self.rng.sample(Open01);
            let v: f64 = self.rng.sample(Open01);
            self.pair = (u, v);
            (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).sin()
        };
        self.odd_phase = !self.odd_phase;
        z
    }

    /// Integer near `Normal(mean, stdev)`, bias-rounded and wrapped into `[0, max)`.
    pub fn wrapped_normal(&mut self, mean: i64, stdev: f64, max: usize) -> usize {
        let raw = stdev * self.standard_normal() + mean as f64;
        wrap(bias_round(raw), max)
    }
}

/// Truncate toward zero, then bump even results up by one.
pub(crate) fn bias_round(raw: f64) -> i64 {
    let t = raw.trunc() as i64;
    if t % 2 == 0 {
        t + 1
    } else {
        t
    }
}

fn wrap(value: i64, max: usize) -> usize {
    value.rem_euclid(max as i64) as usize
}

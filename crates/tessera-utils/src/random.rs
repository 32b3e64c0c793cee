//! Process-global seeded random number generator.
//!
//! Code that needs reproducible randomness draws from [`with_rng`]; calling
//! [`set_seed`] resets the generator so the following draws repeat exactly.

use std::sync::{Mutex, MutexGuard, OnceLock};

use rand::prelude::*;
use tracing::debug;

static GLOBAL_RNG: OnceLock<Mutex<StdRng>> = OnceLock::new();

fn global_rng() -> MutexGuard<'static, StdRng> {
    GLOBAL_RNG
        .get_or_init(|| Mutex::new(StdRng::from_entropy()))
        .lock()
        // A panic while holding the lock cannot leave the generator invalid
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Reseed the global generator.
pub fn set_seed(seed: u64) {
    *global_rng() = StdRng::seed_from_u64(seed);
    debug!(seed, "global seed set");
}

/// Run `f` with exclusive access to the global generator.
pub fn with_rng<T>(f: impl FnOnce(&mut StdRng) -> T) -> T {
    f(&mut global_rng())
}

/// Draw a uniform sample from `[0, 1)`.
pub fn random_f64() -> f64 {
    with_rng(|rng| rng.gen_range(0.0..1.0))
}

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The simulation's random source. ChaCha keeps a seeded sequence stable
/// across platforms and crate releases.
pub type SimRng = ChaCha8Rng;

/// Stream used by world generation, kept apart from the tick stream.
pub const GENERATOR_STREAM: u64 = 1;

pub fn seeded(seed: u64) -> SimRng {
    SimRng::seed_from_u64(seed)
}

pub fn seeded_stream(seed: u64, stream: u64) -> SimRng {
    let mut rng = SimRng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// True with probability `numerator / denominator`, drawn as
/// `uniform[0, denominator) < numerator`.
#[inline(always)]
pub fn chance<R: Rng>(rng: &mut R, numerator: u32, denominator: u32) -> bool {
    rng.random_range(0..denominator) < numerator
}

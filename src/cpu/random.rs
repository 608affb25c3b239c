use rand::{rngs::StdRng, Rng, SeedableRng};

/// Supplies the random bytes consumed by Cxkk
pub trait RandomSource {
    fn next_byte(&mut self) -> u8;
}

/// [`RandomSource`] backed by any `rand` generator
pub struct RngSource<R: Rng>(R);

impl RngSource<StdRng> {
    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_byte(&mut self) -> u8 {
        self.0.random()
    }
}

/// Always returns the same byte
#[derive(Clone, Copy, Debug)]
pub struct FixedByte(pub u8);

impl RandomSource for FixedByte {
    fn next_byte(&mut self) -> u8 {
        self.0
    }
}

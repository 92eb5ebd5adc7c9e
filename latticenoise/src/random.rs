//! Random sources used to fill a lattice.
//!
//! A source is only borrowed for the duration of [`Lattice::with_source`];
//! the lattice records its seed and nothing else.
//!
//! [`Lattice::with_source`]: crate::Lattice::with_source

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generator of uniform values used to fill lattice cells.
pub trait RandomSource {
    /// Next value, expected in `[0, 1)`. The lattice clamps whatever comes back.
    fn next_value(&mut self) -> f32;

    /// Seed recorded on lattices built from this source.
    fn seed(&self) -> u64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_value(&mut self) -> f32 {
        (**self).next_value()
    }

    fn seed(&self) -> u64 {
        (**self).seed()
    }
}

/// Default source: a `StdRng` seeded from the wall clock unless a seed is given.
#[derive(Debug, Clone)]
pub struct DefaultSource {
    rng: StdRng,
    seed: u64,
}

impl DefaultSource {
    /// Spreads consecutive clock seconds apart.
    const CLOCK_SEED_MULTIPLIER: u64 = 241;

    /// Seed from the current time.
    pub fn new() -> Self {
        Self::from_seed(Self::clock_seed())
    }

    /// Deterministic source for a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    fn clock_seed() -> u64 {
        // A clock before the epoch still has to produce a usable seed.
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        secs.wrapping_mul(Self::CLOCK_SEED_MULTIPLIER)
    }
}

impl Default for DefaultSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for DefaultSource {
    fn next_value(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

/// Caller-supplied generator with its own opaque state.
///
/// The generator is called once per lattice cell with mutable access to the
/// state, so sequences, replayed data or foreign RNGs can all be plugged in.
///
/// ```
/// use latticenoise::{CustomSource, Lattice};
///
/// let mut counter = CustomSource::new(7, 0u32, |n: &mut u32| {
///     *n += 1;
///     (*n % 10) as f32 / 10.0
/// });
/// let lattice = Lattice::with_source(1, 16, &mut counter).unwrap();
/// assert_eq!(lattice.seed(), 7);
/// assert_eq!(*counter.state(), 16);
/// ```
pub struct CustomSource<S, F> {
    state: S,
    generator: F,
    seed: u64,
}

impl<S, F> CustomSource<S, F>
where
    F: FnMut(&mut S) -> f32,
{
    pub fn new(seed: u64, state: S, generator: F) -> Self {
        Self { state, generator, seed }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }
}

impl<S, F> RandomSource for CustomSource<S, F>
where
    F: FnMut(&mut S) -> f32,
{
    fn next_value(&mut self) -> f32 {
        (self.generator)(&mut self.state)
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

impl<S: fmt::Debug, F> fmt::Debug for CustomSource<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSource")
            .field("state", &self.state)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

//! Lattice noise for procedural textures
//!
//! Architecture:
//! 1. `random` - Pluggable sources that fill a lattice
//! 2. `lattice` - Owned hyper-cubic grid of samples in `[0, 1]`
//! 3. `resolve` - Wraparound mapping of real coordinates onto the grid
//! 4. `interpolate` - Linear, Catmull-Rom and Hermite kernels
//! 5. `sampler` - Continuous noise in any number of dimensions
//! 6. `fractal` - Multi-octave sums and their analytic maximum
//!
//! ```
//! use latticenoise::{DefaultSource, FractalSumOptions, Kernel, Lattice};
//!
//! let lattice = Lattice::with_source(2, 64, &mut DefaultSource::from_seed(42)).unwrap();
//! let sampler = lattice.sampler(Kernel::CatmullRom);
//!
//! let v = sampler.noise2d(12.5, -3.25).unwrap();
//! assert!((0.0..=1.0).contains(&v));
//!
//! let options = FractalSumOptions::default();
//! let fbm = sampler.fractal_sum2d(12.5, -3.25, &options).unwrap();
//! assert!(fbm <= options.max_value().unwrap());
//! ```

pub mod error;
pub mod fractal;
pub mod interpolate;
pub mod lattice;
pub mod random;
pub mod resolve;
pub mod sampler;

pub use error::{Error, ErrorKind, Result};
pub use fractal::{fractal_sum, FractalSumOptions};
pub use interpolate::{catmull_rom, hermite, lerp, Kernel, ParseKernelError};
pub use lattice::{linear_offset, total_size, Lattice, MAX_SIZE};
pub use random::{CustomSource, DefaultSource, RandomSource};
pub use resolve::{resolve, Resolved};
pub use sampler::Sampler;

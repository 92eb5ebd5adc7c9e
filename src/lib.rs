//! mknoise
//!
//! Renders lattice noise textures and benchmarks sampling. All noise math
//! lives in the `latticenoise` crate, re-exported here as [`noise`].

pub mod bench;
pub mod error;
pub mod render;
pub use latticenoise as noise;

pub use bench::{BenchConfig, BenchReport};
pub use error::{Error, Result};
pub use render::{render_lattice, render_noise, GrayBuffer, RenderConfig};
#[cfg(feature = "render")]
pub use render::save;

//! Timing harness for 2D noise sampling.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::noise::{DefaultSource, Kernel, Lattice};
use crate::render::{check_side, GrayBuffer};

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub width: u32,
    pub height: u32,
    pub dim_length: u32,
    pub seed: Option<u64>,
    /// Lattice cells per pixel.
    pub scale: f32,
    pub loops: u32,
    pub kernel: Kernel,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            width: 4096,
            height: 4096,
            dim_length: 128,
            seed: None,
            scale: 0.25,
            loops: 10,
            kernel: Kernel::CatmullRom,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BenchReport {
    pub loops: u32,
    pub samples_per_loop: u64,
    pub average: Duration,
    /// Largest value sampled over all loops.
    pub max_value: f32,
    /// The last loop's samples, rescaled by `max_value`.
    pub image: GrayBuffer,
}

/// Sample every pixel `loops` times and report the mean wall time per loop.
pub fn run(config: &BenchConfig) -> Result<BenchReport> {
    if config.loops == 0 {
        return Err(Error::InvalidConfig("loops must be at least 1".into()));
    }
    check_side(config.width, config.height)?;

    let lattice = match config.seed {
        Some(seed) => {
            Lattice::with_source(2, config.dim_length, &mut DefaultSource::from_seed(seed))?
        }
        None => Lattice::new(2, config.dim_length)?,
    };
    let sampler = lattice.sampler(config.kernel);
    let samples_per_loop = u64::from(config.width) * u64::from(config.height);

    let mut values = Vec::with_capacity(samples_per_loop as usize);
    let mut max_value = 0.0f32;
    let mut total = Duration::ZERO;

    for loop_index in 0..config.loops {
        values.clear();
        let start = Instant::now();
        for py in 0..config.height {
            let y = py as f32 * config.scale;
            for px in 0..config.width {
                let v = sampler.noise2d(px as f32 * config.scale, y)?;
                max_value = max_value.max(v);
                values.push(v);
            }
        }
        let elapsed = start.elapsed();
        total += elapsed;
        debug!(loop_index, ?elapsed, "bench loop done");
    }

    let average = total / config.loops;
    info!(loops = config.loops, ?average, max_value, "bench finished");

    let rescale = if max_value > 0.0 { 1.0 / max_value } else { 0.0 };
    let mut remaining = values.iter();
    let image = GrayBuffer::from_fn(config.width, config.height, |_, _| {
        Ok(remaining.next().copied().unwrap_or(0.0) * rescale)
    })?;

    Ok(BenchReport {
        loops: config.loops,
        samples_per_loop,
        average,
        max_value,
        image,
    })
}

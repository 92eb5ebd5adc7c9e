//! Continuous noise sampled from a lattice.
//!
//! Sampling nests one interpolation per axis: the highest axis picks its
//! neighbour slices, each slice is reduced along the next axis down, until
//! axis 0 blends raw samples. For 2D this is "blend each row along x, then
//! blend the row results along y".

use crate::error::Result;
use crate::lattice::Lattice;
use crate::resolve::resolve;

pub use crate::interpolate::Kernel;

/// A lattice paired with the kernel used to read it.
#[derive(Debug, Clone, Copy)]
pub struct Sampler<'a> {
    lattice: &'a Lattice,
    kernel: Kernel,
}

impl<'a> Sampler<'a> {
    pub fn new(lattice: &'a Lattice, kernel: Kernel) -> Self {
        Self { lattice, kernel }
    }

    pub fn lattice(&self) -> &'a Lattice {
        self.lattice
    }

    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// Noise in `[0, 1]` at `x` on a 1D lattice.
    pub fn noise1d(&self, x: f32) -> Result<f32> {
        self.noise(&[x])
    }

    /// Noise in `[0, 1]` at `(x, y)` on a 2D lattice.
    pub fn noise2d(&self, x: f32, y: f32) -> Result<f32> {
        self.noise(&[x, y])
    }

    pub fn noise3d(&self, x: f32, y: f32, z: f32) -> Result<f32> {
        self.noise(&[x, y, z])
    }

    pub fn noise4d(&self, x: f32, y: f32, z: f32, w: f32) -> Result<f32> {
        self.noise(&[x, y, z, w])
    }

    /// Noise in `[0, 1]` at `coords`; one coordinate per lattice axis.
    ///
    /// Coordinates wrap, so any finite input is valid. Cubic kernels can
    /// overshoot the sample range and are clamped back into `[0, 1]`.
    pub fn noise(&self, coords: &[f32]) -> Result<f32> {
        self.lattice.check_arity(coords.len())?;
        let top_stride = self.lattice.values().len() / self.lattice.dim_length() as usize;
        Ok(self.blend_axis(coords, top_stride, 0).clamp(0.0, 1.0))
    }

    /// Interpolate along the last axis of `coords`, whose cells are `stride`
    /// values apart, starting from the flat offset `base`.
    fn blend_axis(&self, coords: &[f32], stride: usize, base: usize) -> f32 {
        let Some((&x, inner)) = coords.split_last() else {
            return self.lattice.at(base);
        };

        let dim_length = self.lattice.side();
        let cell = resolve(x, dim_length);
        let taps = self.kernel.taps();
        let inner_stride = stride / dim_length.get() as usize;

        let mut samples = [0.0f32; 4];
        for (slot, &tap) in samples.iter_mut().zip(taps) {
            let index = cell.neighbor(tap, dim_length) as usize;
            *slot = self.blend_axis(inner, inner_stride, base + index * stride);
        }

        self.kernel.blend(&samples[..taps.len()], cell.ratio)
    }
}

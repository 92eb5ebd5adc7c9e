//! Lattice storage and construction.
//!
//! A lattice is a hyper-cubic grid of `dim_length^dimensions` samples kept in
//! one flat buffer. Axis 0 is contiguous; the value at `(c0, c1, .., ck)`
//! lives at `c0 + c1*L + c2*L^2 + ..`.

use std::fmt;
use std::num::NonZeroU32;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::random::{DefaultSource, RandomSource};
use crate::sampler::{Kernel, Sampler};

/// Largest number of values a lattice may hold.
pub const MAX_SIZE: u32 = u32::MAX;

/// Immutable grid of pseudorandom samples in `[0, 1]`.
///
/// The lattice owns its buffer; dropping it releases the memory.
pub struct Lattice {
    values: Box<[f32]>,
    dimensions: u32,
    dim_length: NonZeroU32,
    size: u32,
    seed: u64,
}

impl Lattice {
    /// Build a lattice filled from a clock-seeded [`DefaultSource`].
    pub fn new(dimensions: u32, dim_length: u32) -> Result<Self> {
        Self::with_source(dimensions, dim_length, &mut DefaultSource::new())
    }

    /// Build a lattice filled from `source`, one call per cell in offset order.
    ///
    /// Fails if `dimensions` or `dim_length` is zero, if the total size does
    /// not fit in [`MAX_SIZE`], or if the buffer cannot be allocated.
    pub fn with_source<R: RandomSource + ?Sized>(
        dimensions: u32,
        dim_length: u32,
        source: &mut R,
    ) -> Result<Self> {
        let size = total_size(dimensions, dim_length)
            .inspect_err(|err| warn!(%err, "rejecting lattice"))?;
        let len = usize::try_from(size).map_err(|_| Error::Allocation { size })?;
        let side = NonZeroU32::new(dim_length).ok_or(Error::InvalidLength { dim_length })?;

        let mut values = Vec::new();
        values
            .try_reserve_exact(len)
            .map_err(|_| Error::Allocation { size })?;
        values.extend((0..len).map(|_| clamp_unit(source.next_value())));

        let seed = source.seed();
        debug!(dimensions, dim_length, size, seed, "filled lattice");

        Ok(Self {
            values: values.into_boxed_slice(),
            dimensions,
            dim_length: side,
            size,
            seed,
        })
    }

    pub fn dimensions(&self) -> u32 {
        self.dimensions
    }

    pub fn dim_length(&self) -> u32 {
        self.dim_length.get()
    }

    /// Total number of samples, `dim_length^dimensions`.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Seed of the source that filled this lattice.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Raw sample at `coords`; the number of coordinates must equal the rank.
    pub fn value(&self, coords: &[u32]) -> Result<f32> {
        self.check_arity(coords.len())?;
        let offset = linear_offset(coords, self.dim_length.get())?;
        Ok(self.values[offset])
    }

    pub fn value1(&self, x: u32) -> Result<f32> {
        self.value(&[x])
    }

    pub fn value2(&self, x: u32, y: u32) -> Result<f32> {
        self.value(&[x, y])
    }

    pub fn value3(&self, x: u32, y: u32, z: u32) -> Result<f32> {
        self.value(&[x, y, z])
    }

    pub fn value4(&self, x: u32, y: u32, z: u32, w: u32) -> Result<f32> {
        self.value(&[x, y, z, w])
    }

    /// Sampler using the given interpolation kernel.
    pub fn sampler(&self, kernel: Kernel) -> Sampler<'_> {
        Sampler::new(self, kernel)
    }

    /// 1D noise with the default Catmull-Rom kernel.
    pub fn noise1d(&self, x: f32) -> Result<f32> {
        self.sampler(Kernel::default()).noise1d(x)
    }

    /// 2D noise with the default Catmull-Rom kernel.
    pub fn noise2d(&self, x: f32, y: f32) -> Result<f32> {
        self.sampler(Kernel::default()).noise2d(x, y)
    }

    pub(crate) fn check_arity(&self, requested: usize) -> Result<()> {
        if u32::try_from(requested).ok() != Some(self.dimensions) {
            return Err(Error::DimensionMismatch {
                lattice: self.dimensions,
                requested,
            });
        }
        Ok(())
    }

    pub(crate) fn side(&self) -> NonZeroU32 {
        self.dim_length
    }

    /// Sample at an offset produced by [`linear_offset`] for this lattice.
    #[inline]
    pub(crate) fn at(&self, offset: usize) -> f32 {
        self.values[offset]
    }
}

impl fmt::Debug for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lattice")
            .field("dimensions", &self.dimensions)
            .field("dim_length", &self.dim_length)
            .field("size", &self.size)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

/// `dim_length^dimensions`, or an error when either is zero or the product
/// exceeds [`MAX_SIZE`].
pub fn total_size(dimensions: u32, dim_length: u32) -> Result<u32> {
    if dimensions < 1 {
        return Err(Error::InvalidDimensions { dimensions });
    }
    if dim_length < 1 {
        return Err(Error::InvalidLength { dim_length });
    }
    if dim_length == 1 {
        return Ok(1);
    }

    // Both factors stay below 2^32, so the u64 product cannot wrap.
    let mut size: u64 = 1;
    for _ in 0..dimensions {
        size *= u64::from(dim_length);
        if size > u64::from(MAX_SIZE) {
            return Err(Error::SizeOverflow {
                dimensions,
                dim_length,
                max: MAX_SIZE,
            });
        }
    }
    Ok(size as u32)
}

/// Mixed-radix offset of `coords` in a lattice with sides of `dim_length`.
pub fn linear_offset(coords: &[u32], dim_length: u32) -> Result<usize> {
    let overflow = || Error::SizeOverflow {
        dimensions: u32::try_from(coords.len()).unwrap_or(u32::MAX),
        dim_length,
        max: MAX_SIZE,
    };

    let mut offset = 0usize;
    let mut stride = 1usize;
    for (axis, &coordinate) in coords.iter().enumerate() {
        if coordinate >= dim_length {
            return Err(Error::OutOfRange {
                axis,
                coordinate,
                dim_length,
            });
        }
        if axis > 0 {
            stride = stride.checked_mul(dim_length as usize).ok_or_else(overflow)?;
        }
        offset = (coordinate as usize)
            .checked_mul(stride)
            .and_then(|step| offset.checked_add(step))
            .ok_or_else(overflow)?;
    }
    Ok(offset)
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::random::CustomSource;

    fn counting(dimensions: u32, dim_length: u32) -> Lattice {
        let mut source = CustomSource::new(0, 0u32, |n: &mut u32| {
            let v = *n as f32 / 1000.0;
            *n += 1;
            v
        });
        Lattice::with_source(dimensions, dim_length, &mut source).unwrap()
    }

    #[test]
    fn test_total_size() {
        assert_eq!(total_size(1, 64).unwrap(), 64);
        assert_eq!(total_size(2, 128).unwrap(), 16384);
        assert_eq!(total_size(4, 256).unwrap_err().kind(), ErrorKind::Construction);
        assert_eq!(total_size(32, 2).unwrap_err().kind(), ErrorKind::Construction);
        assert_eq!(total_size(31, 2).unwrap(), 1 << 31);
        assert_eq!(total_size(u32::MAX, 1).unwrap(), 1);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(matches!(
            Lattice::new(0, 16),
            Err(Error::InvalidDimensions { dimensions: 0 })
        ));
        assert!(matches!(
            Lattice::new(2, 0),
            Err(Error::InvalidLength { dim_length: 0 })
        ));
        assert!(matches!(
            Lattice::new(3, 2048),
            Err(Error::SizeOverflow { dimensions: 3, dim_length: 2048, .. })
        ));
    }

    #[test]
    fn test_clamps_source_output() {
        let raw = [-0.5f32, 1.5, f32::NAN, 0.25, f32::INFINITY, f32::NEG_INFINITY];
        let mut source = CustomSource::new(11, 0usize, |i: &mut usize| {
            let v = raw[*i % raw.len()];
            *i += 1;
            v
        });
        let lattice = Lattice::with_source(1, 6, &mut source).unwrap();
        assert_eq!(lattice.values(), &[0.0, 1.0, 0.0, 0.25, 1.0, 0.0]);
        assert_eq!(lattice.seed(), 11);
    }

    #[test]
    fn test_default_source_in_range() {
        let lattice = Lattice::new(2, 32).unwrap();
        assert_eq!(lattice.size(), 1024);
        assert!(lattice.values().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_offsets() {
        assert_eq!(linear_offset(&[3], 10).unwrap(), 3);
        assert_eq!(linear_offset(&[3, 2], 10).unwrap(), 23);
        assert_eq!(linear_offset(&[3, 2, 1, 4], 10).unwrap(), 4123);
        assert!(matches!(
            linear_offset(&[3, 10], 10),
            Err(Error::OutOfRange { axis: 1, coordinate: 10, dim_length: 10 })
        ));
    }

    #[test]
    fn test_raw_access() {
        let lattice = counting(2, 8);
        assert_eq!(lattice.value2(0, 0).unwrap(), 0.0);
        assert_eq!(lattice.value2(5, 3).unwrap(), 29.0 / 1000.0);
        assert!(matches!(
            lattice.value2(8, 0),
            Err(Error::OutOfRange { axis: 0, .. })
        ));
        assert!(matches!(
            lattice.value1(0),
            Err(Error::DimensionMismatch { lattice: 2, requested: 1 })
        ));
    }

    #[test]
    fn test_higher_arity_accessors_check_own_rank() {
        let flat = counting(2, 4);
        let err = flat.value3(0, 0, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Access);
        assert!(flat.value4(0, 0, 0, 0).is_err());

        let cube = counting(3, 4);
        assert_eq!(cube.value3(1, 2, 3).unwrap(), (1 + 2 * 4 + 3 * 16) as f32 / 1000.0);
        assert!(cube.value2(0, 0).is_err());

        let tesseract = counting(4, 4);
        assert_eq!(
            tesseract.value4(3, 0, 1, 2).unwrap(),
            (3 + 16 + 2 * 64) as f32 / 1000.0
        );
        assert!(tesseract.value3(0, 0, 0).is_err());
    }

    #[test]
    fn test_debug_skips_values() {
        let lattice = counting(1, 4);
        let text = format!("{lattice:?}");
        assert!(text.contains("dim_length: 4"));
        assert!(!text.contains("values"));
    }
}

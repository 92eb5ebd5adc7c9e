//! Fractal sums (fbm / turbulence) over lattice noise.
//!
//! `offset + sum(amplitude_ratio^i * noise(frequency_ratio^i * p))` for
//! `i in 0..octaves`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampler::Sampler;

/// Octave layout of a fractal sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalSumOptions {
    /// Number of octaves, at least 1.
    pub octaves: u32,
    /// Amplitude multiplier from one octave to the next.
    pub amplitude_ratio: f32,
    /// Frequency multiplier from one octave to the next.
    pub frequency_ratio: f32,
    /// Constant added to the sum.
    pub offset: f32,
}

impl Default for FractalSumOptions {
    /// Classic fbm: 4 octaves, each at half the amplitude and twice the frequency.
    fn default() -> Self {
        Self {
            octaves: 4,
            amplitude_ratio: 0.5,
            frequency_ratio: 2.0,
            offset: 0.0,
        }
    }
}

impl FractalSumOptions {
    pub fn validate(&self) -> Result<()> {
        if self.octaves < 1 {
            return Err(Error::InvalidOctaves {
                octaves: self.octaves,
            });
        }
        Ok(())
    }

    /// Upper bound of the sum, taking every sample as 1.
    ///
    /// `offset + octaves` when `amplitude_ratio` is 1, otherwise
    /// `offset + (1 - a^(octaves + 1)) / (1 - a)`.
    ///
    /// Only the `a = 1` branch is exact. For any other ratio the series has
    /// one term too many, so the bound exceeds the true peak of an
    /// `octaves`-term sum by `a^octaves` (the default fbm peaks at 1.875 but
    /// reports 1.9375). That extra term tends to 1 as `a` approaches 1, so the
    /// bound jumps from about `octaves + 1` down to `octaves` at `a = 1`.
    /// Normalising by it never leaves `[0, 1]` but does not reach 1 either.
    pub fn max_value(&self) -> Result<f32> {
        self.validate()?;

        let n = f64::from(self.octaves);
        let a = f64::from(self.amplitude_ratio);
        let series = if a == 1.0 {
            n
        } else {
            (1.0 - a.powf(n + 1.0)) / (1.0 - a)
        };
        Ok((f64::from(self.offset) + series) as f32)
    }
}

/// Sum `options.octaves` octaves of `sample`.
///
/// `sample` is called with each octave's frequency (`frequency_ratio^i`)
/// and must scale its own coordinates by it.
pub fn fractal_sum<F>(options: &FractalSumOptions, mut sample: F) -> Result<f32>
where
    F: FnMut(f32) -> Result<f32>,
{
    options.validate()?;

    let mut sum = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut frequency = 1.0f32;
    for _ in 0..options.octaves {
        sum += amplitude * sample(frequency)?;
        amplitude *= options.amplitude_ratio;
        frequency *= options.frequency_ratio;
    }
    Ok(options.offset + sum)
}

impl Sampler<'_> {
    /// Fractal sum of 1D noise at `x`.
    pub fn fractal_sum1d(&self, x: f32, options: &FractalSumOptions) -> Result<f32> {
        self.lattice().check_arity(1)?;
        fractal_sum(options, |frequency| self.noise1d(x * frequency))
    }

    /// Fractal sum of 2D noise at `(x, y)`.
    pub fn fractal_sum2d(&self, x: f32, y: f32, options: &FractalSumOptions) -> Result<f32> {
        self.lattice().check_arity(2)?;
        fractal_sum(options, |frequency| {
            self.noise2d(x * frequency, y * frequency)
        })
    }

    /// Fractal sum at `coords`, one coordinate per lattice axis.
    pub fn fractal_sum(&self, coords: &[f32], options: &FractalSumOptions) -> Result<f32> {
        self.lattice().check_arity(coords.len())?;
        let mut scaled = coords.to_vec();
        fractal_sum(options, |frequency| {
            for (out, &c) in scaled.iter_mut().zip(coords) {
                *out = c * frequency;
            }
            self.noise(&scaled)
        })
    }

    /// [`fractal_sum2d`](Self::fractal_sum2d) divided by
    /// [`FractalSumOptions::max_value`] and clamped to `[0, 1]`.
    pub fn normalized_fractal_sum2d(
        &self,
        x: f32,
        y: f32,
        options: &FractalSumOptions,
    ) -> Result<f32> {
        let max = options.max_value()?;
        let sum = self.fractal_sum2d(x, y, options)?;
        if max == 0.0 {
            return Ok(0.0);
        }
        Ok((sum / max).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::lattice::Lattice;
    use crate::random::{CustomSource, DefaultSource};
    use crate::sampler::Kernel;

    fn constant(dimensions: u32, dim_length: u32, value: f32) -> Lattice {
        let mut source = CustomSource::new(0, (), move |_: &mut ()| value);
        Lattice::with_source(dimensions, dim_length, &mut source).unwrap()
    }

    #[test]
    fn test_defaults() {
        let options = FractalSumOptions::default();
        assert_eq!(options.octaves, 4);
        assert_eq!(options.amplitude_ratio, 0.5);
        assert_eq!(options.frequency_ratio, 2.0);
        assert_eq!(options.offset, 0.0);
    }

    #[test]
    fn test_max_value() {
        assert_eq!(FractalSumOptions::default().max_value().unwrap(), 1.9375);

        let flat = FractalSumOptions {
            octaves: 3,
            amplitude_ratio: 1.0,
            offset: 0.0,
            ..Default::default()
        };
        assert_eq!(flat.max_value().unwrap(), 3.0);

        let shifted = FractalSumOptions {
            offset: 0.5,
            ..flat
        };
        assert_eq!(shifted.max_value().unwrap(), 3.5);

        let none = FractalSumOptions {
            octaves: 0,
            ..Default::default()
        };
        assert_eq!(none.max_value().unwrap_err().kind(), ErrorKind::Composition);
    }

    #[test]
    fn test_max_value_overshoots_by_last_amplitude() {
        for &(octaves, ratio) in &[(4u32, 0.5f32), (3, 0.25), (6, 0.7), (2, 1.5)] {
            let options = FractalSumOptions {
                octaves,
                amplitude_ratio: ratio,
                ..Default::default()
            };
            let a = f64::from(ratio);
            let peak: f64 = (0..octaves).map(|i| a.powi(i as i32)).sum();
            let max = f64::from(options.max_value().unwrap());
            let excess = a.powi(octaves as i32);
            assert!(max > peak, "{options:?}");
            assert!((max - peak - excess).abs() < 1e-5, "{options:?}: {max} vs {peak}");
        }

        // Just below a flat ratio the bound sits near octaves + 1, at it exactly octaves.
        let near = FractalSumOptions {
            octaves: 3,
            amplitude_ratio: 0.999_999_9,
            ..Default::default()
        };
        let flat = FractalSumOptions {
            amplitude_ratio: 1.0,
            ..near
        };
        assert!(near.max_value().unwrap() > 3.9);
        assert_eq!(flat.max_value().unwrap(), 3.0);
    }

    #[test]
    fn test_max_value_bounds_constant_one() {
        let lattice = constant(2, 8, 1.0);
        let sampler = lattice.sampler(Kernel::CatmullRom);
        for &(octaves, ratio) in &[(1u32, 0.5f32), (4, 0.5), (6, 0.7), (3, 1.0), (3, 1.5)] {
            let options = FractalSumOptions {
                octaves,
                amplitude_ratio: ratio,
                ..Default::default()
            };
            let sum = sampler.fractal_sum2d(1.3, 2.9, &options).unwrap();
            assert!(sum <= options.max_value().unwrap() + 1e-5, "{options:?}: {sum}");
        }
    }

    #[test]
    fn test_sum_of_constant_lattice() {
        let lattice = constant(1, 16, 0.5);
        let sampler = lattice.sampler(Kernel::Linear);
        let options = FractalSumOptions {
            offset: 0.25,
            ..Default::default()
        };
        // 0.25 + 0.5 * (1 + 0.5 + 0.25 + 0.125)
        let sum = sampler.fractal_sum1d(3.7, &options).unwrap();
        assert!((sum - 1.1875).abs() < 1e-6, "{sum}");
    }

    #[test]
    fn test_octaves_scale_coordinates() {
        let lattice = Lattice::with_source(1, 32, &mut DefaultSource::from_seed(21)).unwrap();
        let sampler = lattice.sampler(Kernel::CatmullRom);
        let options = FractalSumOptions {
            octaves: 3,
            amplitude_ratio: 0.5,
            frequency_ratio: 2.0,
            offset: 0.0,
        };
        let x = 1.25;
        let expected = sampler.noise1d(x).unwrap()
            + 0.5 * sampler.noise1d(x * 2.0).unwrap()
            + 0.25 * sampler.noise1d(x * 4.0).unwrap();
        let sum = sampler.fractal_sum1d(x, &options).unwrap();
        assert!((sum - expected).abs() < 1e-6);
    }

    #[test]
    fn test_generic_matches_fixed_arity() {
        let lattice = Lattice::with_source(2, 16, &mut DefaultSource::from_seed(4)).unwrap();
        let sampler = lattice.sampler(Kernel::Hermite);
        let options = FractalSumOptions::default();
        assert_eq!(
            sampler.fractal_sum(&[3.5, -1.25], &options).unwrap(),
            sampler.fractal_sum2d(3.5, -1.25, &options).unwrap()
        );
    }

    #[test]
    fn test_rejects_bad_requests() {
        let lattice = Lattice::with_source(2, 8, &mut DefaultSource::from_seed(2)).unwrap();
        let sampler = lattice.sampler(Kernel::default());
        assert!(matches!(
            sampler.fractal_sum1d(0.5, &FractalSumOptions::default()),
            Err(Error::DimensionMismatch { lattice: 2, requested: 1 })
        ));
        let none = FractalSumOptions {
            octaves: 0,
            ..Default::default()
        };
        assert!(matches!(
            sampler.fractal_sum2d(0.5, 0.5, &none),
            Err(Error::InvalidOctaves { octaves: 0 })
        ));
    }

    #[test]
    fn test_octaves_checked_once_before_sampling() {
        let none = FractalSumOptions {
            octaves: 0,
            ..Default::default()
        };
        let mut calls = 0;
        let result = fractal_sum(&none, |_| {
            calls += 1;
            Ok(1.0)
        });
        assert!(matches!(result, Err(Error::InvalidOctaves { octaves: 0 })));
        assert_eq!(calls, 0);

        // Sampler methods check arity themselves and leave octaves to `fractal_sum`.
        let lattice = Lattice::with_source(2, 8, &mut DefaultSource::from_seed(5)).unwrap();
        let sampler = lattice.sampler(Kernel::Linear);
        assert!(matches!(
            sampler.fractal_sum1d(0.5, &none),
            Err(Error::DimensionMismatch { lattice: 2, requested: 1 })
        ));
        assert!(matches!(
            sampler.fractal_sum(&[0.5, 0.5], &none),
            Err(Error::InvalidOctaves { octaves: 0 })
        ));
    }

    #[test]
    fn test_normalized_in_unit_range() {
        let lattice = Lattice::with_source(2, 64, &mut DefaultSource::from_seed(77)).unwrap();
        let sampler = lattice.sampler(Kernel::CatmullRom);
        let options = FractalSumOptions::default();
        for i in 0..2000 {
            let x = (i as f32) * 0.731 - 500.0;
            let y = (i as f32) * -1.37 + 90.0;
            let v = sampler.normalized_fractal_sum2d(x, y, &options).unwrap();
            assert!((0.0..=1.0).contains(&v), "({x}, {y}) -> {v}");
        }
    }

    #[test]
    fn test_options_from_json() {
        let options: FractalSumOptions =
            serde_json::from_str(r#"{ "octaves": 6, "offset": 0.1 }"#).unwrap();
        assert_eq!(options.octaves, 6);
        assert_eq!(options.amplitude_ratio, 0.5);
        assert_eq!(options.offset, 0.1);
    }
}

//! Interpolation kernels.
//!
//! Each kernel blends neighbouring samples given a ratio `r` in `[0, 1)`.
//! The cubic kernels pass exactly through `p1` at `r = 0` and head for `p2`
//! as `r` approaches 1, but may overshoot the `[0, 1]` sample range in between.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// `a + r * (b - a)`
#[inline]
pub fn lerp(a: f32, b: f32, r: f32) -> f32 {
    a + r * (b - a)
}

/// Catmull-Rom spline segment between `p1` and `p2`.
///
/// Tangents are the centred differences `(p2 - p0) / 2` and `(p3 - p1) / 2`.
#[inline]
pub fn catmull_rom(p0: f32, p1: f32, p2: f32, p3: f32, r: f32) -> f32 {
    let t1 = (p2 - p0) / 2.0;
    let t2 = (p3 - p1) / 2.0;

    let a = 2.0 * p1 - 2.0 * p2 + t1 + t2;
    let b = -3.0 * p1 + 3.0 * p2 - 2.0 * t1 - t2;
    let c = t1;
    let d = p1;

    ((a * r + b) * r + c) * r + d
}

/// Cubic Hermite segment from `p1` to `p2` with explicit tangents.
#[inline]
pub fn hermite(p1: f32, p2: f32, t1: f32, t2: f32, r: f32) -> f32 {
    let r2 = r * r;
    let r3 = r2 * r;

    let h00 = 2.0 * r3 - 3.0 * r2 + 1.0;
    let h10 = r3 - 2.0 * r2 + r;
    let h01 = -2.0 * r3 + 3.0 * r2;
    let h11 = r3 - r2;

    h00 * p1 + h10 * t1 + h01 * p2 + h11 * t2
}

/// Interpolation strategy used by a [`Sampler`](crate::Sampler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Kernel {
    /// Two taps, straight blend. Continuous but creased at cell edges.
    Linear,
    /// Four taps, Catmull-Rom spline.
    #[default]
    CatmullRom,
    /// Four taps, Hermite spline with tangents of a third of the centred difference.
    Hermite,
}

impl Kernel {
    const LINEAR_TAPS: [i64; 2] = [0, 1];
    const CUBIC_TAPS: [i64; 4] = [-1, 0, 1, 2];

    /// Neighbour offsets this kernel reads, relative to the resolved cell.
    #[inline]
    pub fn taps(self) -> &'static [i64] {
        match self {
            Kernel::Linear => &Self::LINEAR_TAPS,
            Kernel::CatmullRom | Kernel::Hermite => &Self::CUBIC_TAPS,
        }
    }

    /// Blend `samples`, ordered as [`Kernel::taps`], at ratio `r`.
    #[inline]
    pub fn blend(self, samples: &[f32], r: f32) -> f32 {
        match self {
            Kernel::Linear => lerp(samples[0], samples[1], r),
            Kernel::CatmullRom => catmull_rom(samples[0], samples[1], samples[2], samples[3], r),
            Kernel::Hermite => {
                let t1 = (samples[2] - samples[0]) / 3.0;
                let t2 = (samples[3] - samples[1]) / 3.0;
                hermite(samples[1], samples[2], t1, t2, r)
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Kernel::Linear => "linear",
            Kernel::CatmullRom => "catmull-rom",
            Kernel::Hermite => "hermite",
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown kernel name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown kernel {0:?} (expected linear, catmull-rom or hermite)")]
pub struct ParseKernelError(String);

impl FromStr for Kernel {
    type Err = ParseKernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Kernel::Linear),
            "catmull-rom" | "catmullrom" | "catmull_rom" => Ok(Kernel::CatmullRom),
            "hermite" => Ok(Kernel::Hermite),
            _ => Err(ParseKernelError(s.to_string())),
        }
    }
}

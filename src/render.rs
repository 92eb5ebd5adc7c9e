//! Pixel-buffer assembly and image output.
//!
//! The lattice is sampled once per pixel at `(px * scale, py * scale)`, so
//! `scale` is the number of lattice cells a pixel spans. Values in `[0, 1]`
//! map to 8-bit gray.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::noise::{DefaultSource, FractalSumOptions, Kernel, Lattice};

/// Largest image side; TGA stores dimensions as 16-bit integers.
pub const MAX_SIDE: u32 = u16::MAX as u32;

/// Everything needed to turn a lattice into a texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Side length of the 2D lattice.
    pub dim_length: u32,
    /// Fixed lattice seed; the clock is used when absent.
    pub seed: Option<u64>,
    /// Lattice cells per pixel.
    pub scale: f32,
    pub kernel: Kernel,
    /// Fractal sum layout; plain noise when absent.
    pub fractal: Option<FractalSumOptions>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            dim_length: 128,
            seed: None,
            scale: 0.25,
            kernel: Kernel::CatmullRom,
            fractal: None,
        }
    }
}

impl RenderConfig {
    /// Load a config from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_side(self.width, self.height)?;
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        if let Some(options) = &self.fractal {
            options.validate()?;
        }
        Ok(())
    }

    /// Build the 2D lattice described by this config.
    pub fn build_lattice(&self) -> Result<Lattice> {
        let lattice = match self.seed {
            Some(seed) => {
                Lattice::with_source(2, self.dim_length, &mut DefaultSource::from_seed(seed))?
            }
            None => Lattice::new(2, self.dim_length)?,
        };
        Ok(lattice)
    }
}

/// Row-major 8-bit grayscale pixels, top-left first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl GrayBuffer {
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Result<f32>) -> Result<Self> {
        check_side(width, height)?;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for py in 0..height {
            for px in 0..width {
                pixels.push(to_gray(f(px, py)?));
            }
        }
        Ok(Self { width, height, pixels })
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }
}

/// Render noise (or its normalized fractal sum) from a 2D lattice.
pub fn render_noise(lattice: &Lattice, config: &RenderConfig) -> Result<GrayBuffer> {
    config.validate()?;
    let sampler = lattice.sampler(config.kernel);
    let scale = config.scale;

    let buffer = GrayBuffer::from_fn(config.width, config.height, |px, py| {
        let x = px as f32 * scale;
        let y = py as f32 * scale;
        let v = match &config.fractal {
            Some(options) => sampler.normalized_fractal_sum2d(x, y, options)?,
            None => sampler.noise2d(x, y)?,
        };
        Ok(v)
    })?;

    debug!(
        width = config.width,
        height = config.height,
        kernel = %config.kernel,
        fractal = config.fractal.is_some(),
        "rendered noise"
    );
    Ok(buffer)
}

/// One pixel per raw lattice sample, no interpolation.
pub fn render_lattice(lattice: &Lattice) -> Result<GrayBuffer> {
    let side = lattice.dim_length();
    GrayBuffer::from_fn(side, side, |x, y| Ok(lattice.value2(x, y)?))
}

/// Encode `buffer` as TGA or PNG, chosen by the file extension.
#[cfg(feature = "render")]
pub fn save(buffer: &GrayBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = output_format(path)?;
    let image = image::GrayImage::from_raw(buffer.width, buffer.height, buffer.pixels.clone())
        .ok_or_else(|| Error::InvalidConfig("pixel count does not match image size".into()))?;
    image.save_with_format(path, format)?;
    debug!(path = %path.display(), ?format, "wrote image");
    Ok(())
}

#[cfg(feature = "render")]
fn output_format(path: &Path) -> Result<image::ImageFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "tga" => Ok(image::ImageFormat::Tga),
        "png" => Ok(image::ImageFormat::Png),
        _ => Err(Error::UnsupportedFormat(path.display().to_string())),
    }
}

pub(crate) fn check_side(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidConfig(format!(
            "image size must be non-zero, got {width}x{height}"
        )));
    }
    if width > MAX_SIDE || height > MAX_SIDE {
        return Err(Error::ImageTooLarge {
            width,
            height,
            max: MAX_SIDE,
        });
    }
    Ok(())
}

/// `[0, 1]` to `0..=255`, spreading the top bucket like the rest.
fn to_gray(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.9) as u8
}

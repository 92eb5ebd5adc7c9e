#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("noise error: {0}")]
    Noise(#[from] latticenoise::Error),

    #[error("invalid render config: {0}")]
    InvalidConfig(String),

    #[error("image too large: {width}x{height} (max {max} per side)")]
    ImageTooLarge { width: u32, height: u32, max: u32 },

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[cfg(feature = "render")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

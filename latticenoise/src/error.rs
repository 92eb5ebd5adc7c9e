/// Broad class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The lattice could not be built.
    Construction,
    /// A raw or sampled lookup did not match the lattice.
    Access,
    /// Fractal sum options were unusable.
    Composition,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid dimension count: {dimensions} (must be >= 1)")]
    InvalidDimensions { dimensions: u32 },

    #[error("invalid dimension length: {dim_length} (must be >= 1)")]
    InvalidLength { dim_length: u32 },

    #[error("lattice too large: {dim_length}^{dimensions} exceeds {max} values")]
    SizeOverflow { dimensions: u32, dim_length: u32, max: u32 },

    #[error("could not allocate {size} lattice values")]
    Allocation { size: u32 },

    #[error("dimension mismatch: lattice has {lattice}, {requested} requested")]
    DimensionMismatch { lattice: u32, requested: usize },

    #[error("coordinate {coordinate} on axis {axis} out of range (dim_length {dim_length})")]
    OutOfRange { axis: usize, coordinate: u32, dim_length: u32 },

    #[error("invalid octave count: {octaves} (must be >= 1)")]
    InvalidOctaves { octaves: u32 },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidDimensions { .. }
            | Error::InvalidLength { .. }
            | Error::SizeOverflow { .. }
            | Error::Allocation { .. } => ErrorKind::Construction,
            Error::DimensionMismatch { .. } | Error::OutOfRange { .. } => ErrorKind::Access,
            Error::InvalidOctaves { .. } => ErrorKind::Composition,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

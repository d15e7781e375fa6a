use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read input file: {0}")]
    IoFailure(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Corrupt image data: {0}")]
    CorruptData(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),
}

pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors for pixel access against a raster.
///
/// Out-of-range coordinates are always surfaced, never clamped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    #[error("Pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("Region {w}x{h} at ({x0}, {y0}) extends outside the {width}x{height} image")]
    RegionOutOfBounds {
        x0: usize,
        y0: usize,
        w: usize,
        h: usize,
        width: usize,
        height: usize,
    },

    #[error("No image data has been loaded")]
    NotLoaded,
}

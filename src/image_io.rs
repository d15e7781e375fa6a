//! Image loading and pixel access module
//!
//! This module provides a structured approach to loading raster images into
//! grayscale pixel storage, with separate modules for format decoding, the
//! raster store, and load orchestration.

pub mod common;
pub mod decode;
pub mod loader;
pub mod raster;

pub use common::{AccessError, LoadError, Result};

pub use decode::{
    GrayscalePolicy, ImageDecoder, JpegDecoder, LoadConfig, LoadConfigBuilder, PnmDecoder,
    RawDecoder, TiffDecoder,
};

pub use loader::{ImageLoader, load};

pub use raster::Raster;

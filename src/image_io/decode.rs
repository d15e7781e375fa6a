//! Image format decoders
//!
//! Each decoder recognizes its format from the file content (magic bytes);
//! file names never participate in detection. Supported formats: PNM
//! (P1-P6), JPEG, TIFF, and camera RAW via the TIFF fallback or the RAF
//! signature.

mod decoder;
mod grayscale;
mod jpeg;
mod pnm;
mod raw;
mod tiff;
pub mod types;

pub use decoder::ImageDecoder;
pub use grayscale::GrayscalePolicy;
pub use jpeg::JpegDecoder;
pub use pnm::PnmDecoder;
pub use raw::RawDecoder;
pub use tiff::TiffDecoder;
pub use types::{LoadConfig, LoadConfigBuilder};

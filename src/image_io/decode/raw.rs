//! Camera RAW decoder backed by the rawloader library.
//!
//! Decodes any RAW format rawloader understands (Sony ARW, Fujifilm RAF,
//! Canon CR2, Nikon NEF, DNG, ...). Sensor data is exposed undemosaiced as a
//! single grayscale channel; the maxval is derived from the sensor's white
//! level metadata rather than assumed to be the full u16 range.

use std::io::Cursor;

use rawloader::RawImageData;
use tracing::debug;

use crate::image_io::common::error::{LoadError, Result};
use crate::image_io::decode::decoder::ImageDecoder;
use crate::image_io::decode::types::LoadConfig;
use crate::image_io::raster::Raster;

pub struct RawDecoder;

/// Default bit depth when no white level information is available.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

/// Fujifilm RAF container signature. The other supported RAW containers
/// reuse the TIFF magic and reach this decoder through the TIFF fallback.
const RAF_MAGIC: &[u8] = b"FUJIFILMCCD-RAW";

impl RawDecoder {
    /// Decodes RAW image bytes into a grayscale raster.
    ///
    /// The white level represents the maximum pixel value the sensor can
    /// produce, which tells us the actual bit depth of the sensor (e.g.,
    /// 12-bit, 14-bit, 16-bit); maxval becomes `(1 << bits) - 1` and hot
    /// pixels above the white level are clamped to it.
    pub(crate) fn decode_raw(&self, data: &[u8], config: &LoadConfig) -> Result<Raster> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| LoadError::CorruptData(e.to_string()))?;

        let width = decoded.width;
        let height = decoded.height;
        let cpp = decoded.cpp;

        debug!("Decoded RAW image: {}x{}, {} components per pixel", width, height, cpp);

        let max_white_level = decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX);
        let bits_per_sample = if max_white_level == 0 {
            DEFAULT_BITS_PER_SAMPLE
        } else {
            // Minimum bits needed to represent the max value, e.g.
            // 4095 (0xFFF) -> 12 bits, 16383 (0x3FFF) -> 14 bits.
            U16_BITS - max_white_level.leading_zeros()
        };
        let maxval = ((1u32 << bits_per_sample) - 1) as u16;

        debug!(
            "Calculated bits_per_sample: {} (max white level: {})",
            bits_per_sample, max_white_level
        );

        // Integer data is clamped to the white-level-derived maxval; float
        // data (normalized 0.0-1.0) is scaled to it.
        let samples: Vec<u16> = match decoded.data {
            RawImageData::Integer(values) => values.iter().map(|&v| v.min(maxval)).collect(),
            RawImageData::Float(values) => values
                .iter()
                .map(|&v| ((v * f32::from(maxval)) as u16).min(maxval))
                .collect(),
        };

        let pixels = match cpp {
            1 => samples,
            3 => samples
                .chunks_exact(3)
                .map(|px| config.grayscale.to_gray(px[0], px[1], px[2]))
                .collect(),
            other => {
                return Err(LoadError::UnsupportedFormat(format!(
                    "RAW images with {other} components per pixel are not supported"
                )));
            }
        };

        Raster::from_decoded(width, height, maxval, pixels)
    }
}

impl ImageDecoder for RawDecoder {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn can_decode(&self, data: &[u8]) -> bool {
        data.starts_with(RAF_MAGIC)
    }

    fn decode(&self, data: &[u8], config: &LoadConfig) -> Result<Raster> {
        self.decode_raw(data, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_detection() {
        let mut header = RAF_MAGIC.to_vec();
        header.extend(b"0201");
        assert!(RawDecoder.can_decode(&header));
        assert!(!RawDecoder.can_decode(b"II*\0"));
        assert!(!RawDecoder.can_decode(b""));
    }

    #[test]
    fn test_garbage_raf_body_is_corrupt() {
        let mut data = RAF_MAGIC.to_vec();
        data.extend([0u8; 64]);
        let result = RawDecoder.decode(&data, &LoadConfig::default());
        assert!(matches!(result.unwrap_err(), LoadError::CorruptData(_)));
    }
}

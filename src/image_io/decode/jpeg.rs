//! JPEG decoder backed by the jpeg-decoder library.
//!
//! Grayscale and RGB baseline/progressive images decode with a maxval of
//! 255; 16-bit lossless grayscale decodes with a maxval of 65535. CMYK is
//! not supported.

use jpeg_decoder::PixelFormat;
use tracing::debug;

use crate::image_io::common::error::{LoadError, Result};
use crate::image_io::decode::decoder::ImageDecoder;
use crate::image_io::decode::types::LoadConfig;
use crate::image_io::raster::Raster;

pub struct JpegDecoder;

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

fn map_jpeg_error(err: jpeg_decoder::Error) -> LoadError {
    match err {
        jpeg_decoder::Error::Unsupported(feature) => {
            LoadError::UnsupportedFormat(format!("JPEG feature not supported: {feature:?}"))
        }
        other => LoadError::CorruptData(other.to_string()),
    }
}

impl ImageDecoder for JpegDecoder {
    fn name(&self) -> &'static str {
        "jpeg"
    }

    fn can_decode(&self, data: &[u8]) -> bool {
        data.starts_with(&JPEG_MAGIC)
    }

    fn decode(&self, data: &[u8], config: &LoadConfig) -> Result<Raster> {
        let mut decoder = jpeg_decoder::Decoder::new(data);
        let bytes = decoder.decode().map_err(map_jpeg_error)?;
        let info = decoder
            .info()
            .ok_or_else(|| LoadError::CorruptData("JPEG stream has no image info".to_string()))?;

        let width = usize::from(info.width);
        let height = usize::from(info.height);

        debug!(
            "Decoded JPEG image: {}x{}, {:?}",
            width, height, info.pixel_format
        );

        let (maxval, pixels): (u16, Vec<u16>) = match info.pixel_format {
            PixelFormat::L8 => (255, bytes.into_iter().map(u16::from).collect()),
            PixelFormat::L16 => {
                // 16-bit luma samples are stored big-endian.
                let samples = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                (65535, samples)
            }
            PixelFormat::RGB24 => {
                let samples = bytes
                    .chunks_exact(3)
                    .map(|px| {
                        config.grayscale.to_gray(
                            u16::from(px[0]),
                            u16::from(px[1]),
                            u16::from(px[2]),
                        )
                    })
                    .collect();
                (255, samples)
            }
            PixelFormat::CMYK32 => {
                return Err(LoadError::UnsupportedFormat(
                    "CMYK JPEG images are not supported".to_string(),
                ));
            }
        };

        Raster::from_decoded(width, height, maxval, pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_detection() {
        assert!(JpegDecoder.can_decode(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]));
        assert!(!JpegDecoder.can_decode(&[0xFF, 0xD8, 0x00]));
        assert!(!JpegDecoder.can_decode(b"P5\n"));
    }

    #[test]
    fn test_garbage_jpeg_body_is_corrupt() {
        let mut data = JPEG_MAGIC.to_vec();
        data.extend([0u8; 64]);
        let result = JpegDecoder.decode(&data, &LoadConfig::default());
        assert!(matches!(result.unwrap_err(), LoadError::CorruptData(_)));
    }
}

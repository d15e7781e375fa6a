//! TIFF decoder backed by the tiff library.
//!
//! Supports grayscale, RGB and RGBA images at 8 or 16 bits per sample; the
//! alpha channel is ignored. Camera RAW containers (ARW, CR2, NEF, DNG)
//! reuse the TIFF magic, so a TIFF-magic buffer the standard path cannot
//! decode is handed to the RAW decoder before the TIFF error is surfaced.

use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::image_io::common::error::{LoadError, Result};
use crate::image_io::decode::decoder::ImageDecoder;
use crate::image_io::decode::raw::RawDecoder;
use crate::image_io::decode::types::LoadConfig;
use crate::image_io::raster::Raster;

pub struct TiffDecoder;

const TIFF_LE_MAGIC: [u8; 4] = [0x49, 0x49, 0x2A, 0x00];
const TIFF_BE_MAGIC: [u8; 4] = [0x4D, 0x4D, 0x00, 0x2A];

fn map_tiff_error(err: tiff::TiffError) -> LoadError {
    match err {
        tiff::TiffError::UnsupportedError(e) => LoadError::UnsupportedFormat(e.to_string()),
        other => LoadError::CorruptData(other.to_string()),
    }
}

impl TiffDecoder {
    fn decode_tiff(&self, data: &[u8], config: &LoadConfig) -> Result<Raster> {
        let mut decoder = Decoder::new(Cursor::new(data)).map_err(map_tiff_error)?;
        let (width, height) = decoder.dimensions().map_err(map_tiff_error)?;
        let colortype = decoder.colortype().map_err(map_tiff_error)?;
        let image = decoder.read_image().map_err(map_tiff_error)?;

        debug!("Decoded TIFF image: {}x{}, {:?}", width, height, colortype);

        let (width, height) = (width as usize, height as usize);
        let (channels, maxval) = match colortype {
            ColorType::Gray(8) => (1, 255u16),
            ColorType::Gray(16) => (1, 65535),
            ColorType::RGB(8) => (3, 255),
            ColorType::RGB(16) => (3, 65535),
            ColorType::RGBA(8) => (4, 255),
            ColorType::RGBA(16) => (4, 65535),
            other => {
                return Err(LoadError::UnsupportedFormat(format!(
                    "TIFF color type {other:?} is not supported; only 8- and 16-bit \
                     grayscale, RGB and RGBA images are"
                )));
            }
        };

        let samples: Vec<u16> = match image {
            DecodingResult::U8(buf) => buf.into_iter().map(u16::from).collect(),
            DecodingResult::U16(buf) => buf,
            _ => {
                return Err(LoadError::UnsupportedFormat(
                    "TIFF sample format is not 8- or 16-bit unsigned".to_string(),
                ));
            }
        };

        let pixel_count = width.checked_mul(height).ok_or_else(|| {
            LoadError::CorruptData(format!("image dimensions {width}x{height} overflow"))
        })?;
        if samples.len() != pixel_count * channels {
            return Err(LoadError::CorruptData(format!(
                "expected {} samples for a {width}x{height} image with {channels} channels, \
                 found {}",
                pixel_count * channels,
                samples.len()
            )));
        }

        let pixels = match channels {
            1 => samples,
            // Alpha (the fourth sample, when present) is dropped.
            n => samples
                .chunks_exact(n)
                .map(|px| config.grayscale.to_gray(px[0], px[1], px[2]))
                .collect(),
        };

        Raster::from_decoded(width, height, maxval, pixels)
    }
}

impl ImageDecoder for TiffDecoder {
    fn name(&self) -> &'static str {
        "tiff"
    }

    fn can_decode(&self, data: &[u8]) -> bool {
        data.starts_with(&TIFF_LE_MAGIC) || data.starts_with(&TIFF_BE_MAGIC)
    }

    fn decode(&self, data: &[u8], config: &LoadConfig) -> Result<Raster> {
        match self.decode_tiff(data, config) {
            Ok(raster) => Ok(raster),
            Err(err) => {
                debug!("Standard TIFF decode failed ({err}), trying the RAW fallback");
                RawDecoder.decode_raw(data, config).map_err(|_| err)
            }
        }
    }
}

//! PNM (portable anymap) decoder.
//!
//! Covers the six classic netpbm variants: ASCII and binary bitmaps (P1/P4),
//! graymaps (P2/P5) and pixmaps (P3/P6). The header carries the maxval
//! directly for graymaps and pixmaps; bitmaps have an implicit maxval of 1.
//! Binary samples above 255 are stored big-endian, two bytes each. Bitmap
//! polarity is inverted on load so that maxval always means white.

use tracing::debug;

use crate::image_io::common::error::{LoadError, Result};
use crate::image_io::decode::decoder::ImageDecoder;
use crate::image_io::decode::types::LoadConfig;
use crate::image_io::raster::Raster;

pub struct PnmDecoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PnmKind {
    AsciiBitmap,
    AsciiGray,
    AsciiPix,
    BinaryBitmap,
    BinaryGray,
    BinaryPix,
}

impl PnmKind {
    fn from_magic(data: &[u8]) -> Option<Self> {
        if data.len() < 2 || data[0] != b'P' {
            return None;
        }
        match data[1] {
            b'1' => Some(Self::AsciiBitmap),
            b'2' => Some(Self::AsciiGray),
            b'3' => Some(Self::AsciiPix),
            b'4' => Some(Self::BinaryBitmap),
            b'5' => Some(Self::BinaryGray),
            b'6' => Some(Self::BinaryPix),
            _ => None,
        }
    }

    fn is_bitmap(self) -> bool {
        matches!(self, Self::AsciiBitmap | Self::BinaryBitmap)
    }

    fn channels(self) -> usize {
        match self {
            Self::AsciiPix | Self::BinaryPix => 3,
            _ => 1,
        }
    }
}

/// Token reader over the PNM header and ASCII sample sections. Whitespace
/// separates tokens; `#` starts a comment running to the end of the line.
struct PnmReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PnmReader<'a> {
    fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.pos < self.data.len() && self.data[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos < self.data.len() && self.data[self.pos] == b'#' {
                while self.pos < self.data.len() && self.data[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else {
                return;
            }
        }
    }

    fn next_uint(&mut self, what: &str) -> Result<usize> {
        self.skip_whitespace_and_comments();
        if self.pos >= self.data.len() {
            return Err(LoadError::CorruptData(format!(
                "unexpected end of file while reading {what}"
            )));
        }
        if !self.data[self.pos].is_ascii_digit() {
            return Err(LoadError::CorruptData(format!(
                "expected {what} but found byte '{}'",
                self.data[self.pos] as char
            )));
        }
        let mut value: usize = 0;
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_digit() {
            let digit = usize::from(self.data[self.pos] - b'0');
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| LoadError::CorruptData(format!("{what} is out of range")))?;
            self.pos += 1;
        }
        Ok(value)
    }

    /// Consumes the single whitespace byte separating the header from a
    /// binary sample section.
    fn expect_single_whitespace(&mut self) -> Result<()> {
        if self.pos >= self.data.len() || !self.data[self.pos].is_ascii_whitespace() {
            return Err(LoadError::CorruptData(
                "missing whitespace between header and sample data".to_string(),
            ));
        }
        self.pos += 1;
        Ok(())
    }

    fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl PnmDecoder {
    fn decode_ascii_samples(
        reader: &mut PnmReader<'_>,
        count: usize,
        maxval: u16,
    ) -> Result<Vec<u16>> {
        let mut samples = Vec::new();
        for _ in 0..count {
            let value = reader.next_uint("sample value")?;
            if value > usize::from(maxval) {
                return Err(LoadError::CorruptData(format!(
                    "sample value {value} exceeds maxval {maxval}"
                )));
            }
            samples.push(value as u16);
        }
        Ok(samples)
    }

    fn decode_ascii_bits(reader: &mut PnmReader<'_>, count: usize) -> Result<Vec<u16>> {
        let mut samples = Vec::new();
        for _ in 0..count {
            reader.skip_whitespace_and_comments();
            match reader.rest().first() {
                // In PBM a set bit is black; invert so maxval means white.
                Some(b'0') => samples.push(1),
                Some(b'1') => samples.push(0),
                Some(&other) => {
                    return Err(LoadError::CorruptData(format!(
                        "expected bitmap digit but found byte '{}'",
                        other as char
                    )));
                }
                None => {
                    return Err(LoadError::CorruptData(
                        "unexpected end of file in bitmap data".to_string(),
                    ));
                }
            }
            reader.pos += 1;
        }
        Ok(samples)
    }

    fn decode_binary_samples(body: &[u8], count: usize, maxval: u16) -> Result<Vec<u16>> {
        let bytes_per_sample = if maxval > 255 { 2 } else { 1 };
        let needed = count.checked_mul(bytes_per_sample).ok_or_else(|| {
            LoadError::CorruptData("sample count is out of range".to_string())
        })?;
        if body.len() < needed {
            return Err(LoadError::CorruptData(format!(
                "expected {needed} bytes of sample data, found {}",
                body.len()
            )));
        }
        let mut samples = Vec::with_capacity(count);
        if bytes_per_sample == 1 {
            for &byte in &body[..needed] {
                let value = u16::from(byte);
                if value > maxval {
                    return Err(LoadError::CorruptData(format!(
                        "sample value {value} exceeds maxval {maxval}"
                    )));
                }
                samples.push(value);
            }
        } else {
            for pair in body[..needed].chunks_exact(2) {
                let value = u16::from_be_bytes([pair[0], pair[1]]);
                if value > maxval {
                    return Err(LoadError::CorruptData(format!(
                        "sample value {value} exceeds maxval {maxval}"
                    )));
                }
                samples.push(value);
            }
        }
        Ok(samples)
    }

    fn decode_binary_bits(body: &[u8], width: usize, height: usize) -> Result<Vec<u16>> {
        let row_bytes = width.div_ceil(8);
        let needed = row_bytes.checked_mul(height).ok_or_else(|| {
            LoadError::CorruptData("bitmap row count is out of range".to_string())
        })?;
        if body.len() < needed {
            return Err(LoadError::CorruptData(format!(
                "expected {needed} bytes of bitmap data, found {}",
                body.len()
            )));
        }
        let mut samples = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = &body[y * row_bytes..(y + 1) * row_bytes];
            for x in 0..width {
                let bit = (row[x / 8] >> (7 - x % 8)) & 1;
                // Set bit is black; invert so maxval means white.
                samples.push(u16::from(bit ^ 1));
            }
        }
        Ok(samples)
    }

    fn collapse_rgb(samples: Vec<u16>, config: &LoadConfig) -> Vec<u16> {
        samples
            .chunks_exact(3)
            .map(|px| config.grayscale.to_gray(px[0], px[1], px[2]))
            .collect()
    }
}

impl ImageDecoder for PnmDecoder {
    fn name(&self) -> &'static str {
        "pnm"
    }

    fn can_decode(&self, data: &[u8]) -> bool {
        PnmKind::from_magic(data).is_some()
            && data.len() >= 3
            && (data[2].is_ascii_whitespace() || data[2] == b'#')
    }

    fn decode(&self, data: &[u8], config: &LoadConfig) -> Result<Raster> {
        let kind = PnmKind::from_magic(data).ok_or_else(|| {
            LoadError::UnsupportedFormat("not a PNM header".to_string())
        })?;
        let mut reader = PnmReader::new(data, 2);

        let width = reader.next_uint("image width")?;
        let height = reader.next_uint("image height")?;
        let maxval = if kind.is_bitmap() {
            1
        } else {
            let value = reader.next_uint("maxval")?;
            if value == 0 || value > usize::from(u16::MAX) {
                return Err(LoadError::CorruptData(format!(
                    "maxval {value} is outside the supported range 1..=65535"
                )));
            }
            value as u16
        };
        debug!("Decoding {kind:?} PNM image: {width}x{height}, maxval {maxval}");

        let pixel_count = width.checked_mul(height).ok_or_else(|| {
            LoadError::CorruptData(format!("image dimensions {width}x{height} overflow"))
        })?;
        let sample_count = pixel_count.checked_mul(kind.channels()).ok_or_else(|| {
            LoadError::CorruptData("sample count is out of range".to_string())
        })?;

        let samples = match kind {
            PnmKind::AsciiBitmap => Self::decode_ascii_bits(&mut reader, sample_count)?,
            PnmKind::AsciiGray | PnmKind::AsciiPix => {
                Self::decode_ascii_samples(&mut reader, sample_count, maxval)?
            }
            PnmKind::BinaryBitmap => {
                reader.expect_single_whitespace()?;
                Self::decode_binary_bits(reader.rest(), width, height)?
            }
            PnmKind::BinaryGray | PnmKind::BinaryPix => {
                reader.expect_single_whitespace()?;
                Self::decode_binary_samples(reader.rest(), sample_count, maxval)?
            }
        };

        let pixels = if kind.channels() == 3 {
            Self::collapse_rgb(samples, config)
        } else {
            samples
        };
        Raster::from_decoded(width, height, maxval, pixels)
    }
}

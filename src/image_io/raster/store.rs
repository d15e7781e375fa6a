use crate::image_io::common::error::{AccessError, LoadError, Result};

/// Decoded in-memory grid of grayscale intensity samples.
///
/// A raster starts out unloaded (all dimensions zero, every access failing
/// with [`AccessError::NotLoaded`]) and is populated exactly once by a
/// successful load. After that it is immutable: there is no mutation API,
/// which is what makes lock-free concurrent reads valid.
#[derive(Debug, Clone, Default)]
pub struct Raster {
    /// Width of the image in pixels
    width: usize,
    /// Height of the image in pixels
    height: usize,
    /// Maximal sample value, interpreted as full white
    maxval: u16,
    /// Row-major intensity samples, one per (x, y)
    pixels: Vec<u16>,
}

impl Raster {
    /// An unloaded raster. Any pixel access fails until a loader has
    /// produced a populated one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a raster from decoder output, enforcing the structural
    /// invariants: positive dimensions, positive maxval, and exactly
    /// `width * height` samples.
    pub(crate) fn from_decoded(
        width: usize,
        height: usize,
        maxval: u16,
        pixels: Vec<u16>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LoadError::InvalidDimensions(width, height));
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            LoadError::CorruptData(format!("image dimensions {width}x{height} overflow"))
        })?;
        if maxval == 0 {
            return Err(LoadError::CorruptData("maxval must be positive".to_string()));
        }
        if pixels.len() != expected {
            return Err(LoadError::CorruptData(format!(
                "expected {expected} samples for a {width}x{height} image, found {}",
                pixels.len()
            )));
        }
        debug_assert!(pixels.iter().all(|&p| p <= maxval));
        Ok(Self {
            width,
            height,
            maxval,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample value representing full white. All samples lie in
    /// `[0, maxval]`.
    pub fn maxval(&self) -> u16 {
        self.maxval
    }

    pub fn is_loaded(&self) -> bool {
        self.width != 0
    }

    /// Returns the intensity at `(x, y)`. O(1), allocation-free.
    pub fn get_pixel(&self, x: usize, y: usize) -> std::result::Result<u16, AccessError> {
        if !self.is_loaded() {
            return Err(AccessError::NotLoaded);
        }
        if x >= self.width || y >= self.height {
            return Err(AccessError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.pixels[y * self.width + x])
    }

    /// Copies the `w`x`h` rectangle at `(x0, y0)` into `out`, row-major
    /// (`y` outer, `x` inner). `out` is cleared first; after a successful
    /// call it holds exactly `w * h` samples, element-for-element equal to
    /// the sequence of [`get_pixel`](Self::get_pixel) calls in the same
    /// order.
    ///
    /// A zero-area rectangle inside the image bounds yields an empty buffer.
    pub fn read_region_into(
        &self,
        x0: usize,
        y0: usize,
        w: usize,
        h: usize,
        out: &mut Vec<u16>,
    ) -> std::result::Result<(), AccessError> {
        if !self.is_loaded() {
            return Err(AccessError::NotLoaded);
        }
        let x_end = x0.checked_add(w).filter(|&end| end <= self.width);
        let y_end = y0.checked_add(h).filter(|&end| end <= self.height);
        let (Some(x_end), Some(y_end)) = (x_end, y_end) else {
            return Err(AccessError::RegionOutOfBounds {
                x0,
                y0,
                w,
                h,
                width: self.width,
                height: self.height,
            });
        };
        out.clear();
        out.reserve(w * h);
        for y in y0..y_end {
            let row = y * self.width;
            out.extend_from_slice(&self.pixels[row + x0..row + x_end]);
        }
        Ok(())
    }

    /// Allocating variant of [`read_region_into`](Self::read_region_into).
    pub fn get_region(
        &self,
        x0: usize,
        y0: usize,
        w: usize,
        h: usize,
    ) -> std::result::Result<Vec<u16>, AccessError> {
        let mut out = Vec::new();
        self.read_region_into(x0, y0, w, h, &mut out)?;
        Ok(out)
    }
}

//! Load raster image files and serve grayscale intensities at arbitrary
//! pixel coordinates.
//!
//! Formats are detected from file content, never from the file name.
//! Supported: PNM (P1-P6), JPEG, TIFF (8/16-bit grayscale, RGB, RGBA), and
//! camera RAW via rawloader. Multi-channel sources collapse to one channel
//! under a configurable, deterministic grayscale policy.
//!
//! # Example
//!
//! ```no_run
//! use grayscan::image_io;
//!
//! let raster = image_io::load("scan.pgm").unwrap();
//! let center = raster
//!     .get_pixel(raster.width() / 2, raster.height() / 2)
//!     .unwrap();
//! println!("center intensity: {center} of {}", raster.maxval());
//! ```

pub mod image_io;
pub mod logger;

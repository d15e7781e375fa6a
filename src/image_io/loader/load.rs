use std::path::Path;

use tracing::{info, instrument};

use crate::image_io::common::error::{LoadError, Result};
use crate::image_io::decode::{
    ImageDecoder, JpegDecoder, LoadConfig, PnmDecoder, RawDecoder, TiffDecoder,
};
use crate::image_io::raster::Raster;

/// Turns a file path into a populated [`Raster`].
///
/// The loader owns its decoder registry; there is no process-wide decoder
/// state, so independent loaders can be built and dropped freely (tests rely
/// on this). Nothing is cached between calls and no file handle survives
/// `load` returning, on any path.
pub struct ImageLoader {
    decoders: Vec<Box<dyn ImageDecoder>>,
    config: LoadConfig,
}

impl ImageLoader {
    /// A loader with the default decoder registry: PNM, JPEG, TIFF (with
    /// RAW fallback) and RAF.
    pub fn new(config: LoadConfig) -> Self {
        Self {
            decoders: vec![
                Box::new(PnmDecoder),
                Box::new(JpegDecoder),
                Box::new(TiffDecoder),
                Box::new(RawDecoder),
            ],
            config,
        }
    }

    /// A loader with a caller-supplied decoder registry.
    pub fn with_decoders(decoders: Vec<Box<dyn ImageDecoder>>, config: LoadConfig) -> Self {
        Self { decoders, config }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(LoadError::InvalidDimensions(width, height));
        }
        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                return Err(LoadError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    fn detect(&self, data: &[u8]) -> Result<&dyn ImageDecoder> {
        for decoder in &self.decoders {
            if decoder.can_decode(data) {
                return Ok(decoder.as_ref());
            }
        }
        Err(LoadError::UnsupportedFormat(format!(
            "no decoder recognizes the file header {:02x?}",
            &data[..data.len().min(8)]
        )))
    }

    /// Decodes an in-memory image file, sniffing the format from the
    /// leading bytes.
    #[instrument(skip(self, data), fields(input_size = data.len()))]
    pub fn load_bytes(&self, data: &[u8]) -> Result<Raster> {
        let decoder = self.detect(data)?;

        let raster = {
            let _span = tracing::info_span!("decode_image", decoder = decoder.name()).entered();
            decoder.decode(data, &self.config)?
        };

        {
            let _span = tracing::info_span!(
                "validate_dimensions",
                width = raster.width(),
                height = raster.height()
            )
            .entered();
            self.validate_dimensions(raster.width(), raster.height())?;
        }

        info!(
            width = raster.width(),
            height = raster.height(),
            maxval = raster.maxval(),
            decoder = decoder.name(),
            "Image loaded"
        );
        Ok(raster)
    }

    /// Reads and decodes an image file. All-or-nothing: on any error no
    /// raster is observable to the caller.
    #[instrument(skip(self, path))]
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Raster> {
        let path = path.as_ref();

        info!(input = %path.display(), "Loading image");

        let data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(path)
                .map_err(|e| LoadError::IoFailure(format!("{}: {}", path.display(), e)))?
        };

        self.load_bytes(&data)
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: LoadConfig) {
        self.config = config;
    }
}

/// Loads `path` with the default configuration.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Raster> {
    ImageLoader::new(LoadConfig::default()).load(path)
}

//! Image loading configuration types

use crate::image_io::decode::grayscale::GrayscalePolicy;

/// Configuration for loading an image into a raster
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Policy used to collapse multi-channel sources to one channel
    pub grayscale: GrayscalePolicy,
    /// Whether to validate image dimensions after decoding
    pub validate_dimensions: bool,
    /// Upper bound on either image dimension, if any
    pub max_dimension: Option<usize>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            grayscale: GrayscalePolicy::Luminance,
            validate_dimensions: true,
            max_dimension: None,
        }
    }
}

impl LoadConfig {
    pub fn builder() -> LoadConfigBuilder {
        LoadConfigBuilder::default()
    }
}

/// Builder for LoadConfig
#[derive(Default)]
pub struct LoadConfigBuilder {
    grayscale: Option<GrayscalePolicy>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl LoadConfigBuilder {
    pub fn grayscale(mut self, policy: GrayscalePolicy) -> Self {
        self.grayscale = Some(policy);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> LoadConfig {
        let default = LoadConfig::default();
        LoadConfig {
            grayscale: self.grayscale.unwrap_or(default.grayscale),
            validate_dimensions: self
                .validate_dimensions
                .unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}

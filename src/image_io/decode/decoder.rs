use crate::image_io::common::error::Result;
use crate::image_io::decode::types::LoadConfig;
use crate::image_io::raster::Raster;

/// A format decoder: sniffs a file signature and turns the raw bytes into a
/// populated raster.
///
/// Detection is by content only; file names never participate.
pub trait ImageDecoder {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Returns true if `data` starts with this format's signature.
    fn can_decode(&self, data: &[u8]) -> bool;

    /// Decodes the whole buffer into a raster, or fails without leaving any
    /// partially populated raster observable.
    fn decode(&self, data: &[u8], config: &LoadConfig) -> Result<Raster>;
}

use grayscan::image_io::{GrayscalePolicy, ImageLoader, LoadConfig};
use grayscan::logger;

use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting grayscan...");

    let config = LoadConfig::builder()
        .grayscale(GrayscalePolicy::Luminance)
        .build();
    let loader = ImageLoader::new(config);

    info!("Image loader initialized");
    info!("Grayscale policy: {:?}", loader.config().grayscale);

    match loader.load("input.tiff") {
        Ok(raster) => {
            let samples = raster.get_region(0, 0, raster.width(), raster.height())?;
            let sum: u64 = samples.iter().map(|&v| u64::from(v)).sum();
            info!(
                width = raster.width(),
                height = raster.height(),
                maxval = raster.maxval(),
                mean_intensity = sum / samples.len() as u64,
                "Load successful!"
            );
        }
        Err(e) => error!("Load failed: {}", e),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use crate::image_io::common::error::{AccessError, LoadError};
    use crate::image_io::raster::Raster;

    fn gradient_raster(width: usize, height: usize, maxval: u16) -> Raster {
        let pixels = (0..width * height)
            .map(|i| (i % (usize::from(maxval) + 1)) as u16)
            .collect();
        Raster::from_decoded(width, height, maxval, pixels).unwrap()
    }

    #[test]
    fn test_unloaded_raster_denies_access() {
        let raster = Raster::new();
        assert!(!raster.is_loaded());
        assert_eq!(raster.width(), 0);
        assert_eq!(raster.height(), 0);
        assert_eq!(raster.maxval(), 0);
        assert_eq!(raster.get_pixel(0, 0), Err(AccessError::NotLoaded));
        assert_eq!(raster.get_region(0, 0, 0, 0), Err(AccessError::NotLoaded));
    }

    #[test]
    fn test_get_pixel_is_deterministic() {
        let raster = gradient_raster(5, 3, 255);
        for y in 0..3 {
            for x in 0..5 {
                let expected = ((y * 5 + x) % 256) as u16;
                assert_eq!(raster.get_pixel(x, y), Ok(expected));
                assert_eq!(raster.get_pixel(x, y), Ok(expected));
            }
        }
    }

    #[test]
    fn test_get_pixel_out_of_bounds() {
        let raster = gradient_raster(4, 4, 255);
        assert_eq!(
            raster.get_pixel(4, 0),
            Err(AccessError::OutOfBounds {
                x: 4,
                y: 0,
                width: 4,
                height: 4
            })
        );
        assert!(raster.get_pixel(0, 4).is_err());
        assert!(raster.get_pixel(usize::MAX, usize::MAX).is_err());
    }

    #[test]
    fn test_full_region_matches_pixel_sequence() {
        let raster = gradient_raster(7, 5, 255);
        let region = raster.get_region(0, 0, 7, 5).unwrap();
        let mut sequence = Vec::new();
        for y in 0..5 {
            for x in 0..7 {
                sequence.push(raster.get_pixel(x, y).unwrap());
            }
        }
        assert_eq!(region, sequence);
    }

    #[test]
    fn test_sub_region_matches_pixel_sequence() {
        let raster = gradient_raster(6, 6, 255);
        let region = raster.get_region(2, 1, 3, 4).unwrap();
        let mut sequence = Vec::new();
        for y in 1..5 {
            for x in 2..5 {
                sequence.push(raster.get_pixel(x, y).unwrap());
            }
        }
        assert_eq!(region, sequence);
    }

    #[test]
    fn test_region_out_of_bounds() {
        let raster = gradient_raster(4, 4, 255);
        assert!(matches!(
            raster.get_region(2, 0, 3, 1).unwrap_err(),
            AccessError::RegionOutOfBounds { .. }
        ));
        assert!(matches!(
            raster.get_region(0, 3, 1, 2).unwrap_err(),
            AccessError::RegionOutOfBounds { .. }
        ));
        // Extent arithmetic must not wrap around.
        assert!(matches!(
            raster.get_region(usize::MAX, 0, 2, 1).unwrap_err(),
            AccessError::RegionOutOfBounds { .. }
        ));
    }

    #[test]
    fn test_zero_area_region_is_empty() {
        let raster = gradient_raster(4, 4, 255);
        assert_eq!(raster.get_region(2, 2, 0, 0).unwrap(), Vec::<u16>::new());
        assert_eq!(raster.get_region(4, 4, 0, 0).unwrap(), Vec::<u16>::new());
    }

    #[test]
    fn test_read_region_into_replaces_buffer_contents() {
        let raster = gradient_raster(4, 4, 255);
        let mut buffer = vec![9999u16; 3];
        raster.read_region_into(0, 0, 4, 2, &mut buffer).unwrap();
        assert_eq!(buffer.len(), 8);
        assert_eq!(buffer, raster.get_region(0, 0, 4, 2).unwrap());
    }

    #[test]
    fn test_from_decoded_rejects_mismatched_buffer() {
        let result = Raster::from_decoded(4, 4, 255, vec![0u16; 15]);
        assert!(matches!(result.unwrap_err(), LoadError::CorruptData(_)));
    }

    #[test]
    fn test_from_decoded_rejects_zero_dimensions() {
        let result = Raster::from_decoded(0, 4, 255, Vec::new());
        assert!(matches!(
            result.unwrap_err(),
            LoadError::InvalidDimensions(0, 4)
        ));
    }

    #[test]
    fn test_from_decoded_rejects_zero_maxval() {
        let result = Raster::from_decoded(2, 2, 0, vec![0u16; 4]);
        assert!(matches!(result.unwrap_err(), LoadError::CorruptData(_)));
    }

    #[test]
    fn test_concurrent_readers_agree() {
        let raster = Arc::new(gradient_raster(64, 64, 255));
        let baseline = raster.get_region(0, 0, 64, 64).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let raster = Arc::clone(&raster);
                let baseline = baseline.clone();
                thread::spawn(move || {
                    for y in 0..64 {
                        for x in 0..64 {
                            assert_eq!(raster.get_pixel(x, y).unwrap(), baseline[y * 64 + x]);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}

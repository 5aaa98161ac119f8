//! The 786,432-byte background record.
//!
//! An 800x480 RGB565 image for the gauge screens fills the first 768,000
//! bytes; a 96x96 RGB565 tile for the table screens follows. The tile region
//! stays zeroed when no tables image is supplied.

use alloc::boxed::Box;

use crate::error::{Error, Result};
use crate::raster::Raster;

/// Size of the background record in bytes.
pub const RECORD_LEN: usize = 786432;

pub const GAUGES_WIDTH: u32 = 800;
pub const GAUGES_HEIGHT: u32 = 480;
pub const TABLES_SIZE: u32 = 96;

const TABLES_BASE: usize = GAUGES_WIDTH as usize * GAUGES_HEIGHT as usize * 2;

/// Packs the background images into the record.
///
/// The gauges image is mandatory and must be exactly 800x480; the tables
/// image is optional and must be exactly 96x96 when present.
pub fn pack(gauges: Option<&Raster>, tables: Option<&Raster>) -> Result<Box<[u8; RECORD_LEN]>> {
    let Some(gauges) = gauges else {
        return Err(Error::MissingInput("gauges background image"));
    };
    if gauges.width() != GAUGES_WIDTH || gauges.height() != GAUGES_HEIGHT {
        return Err(Error::InvalidInput("gauges background must be 800x480"));
    }
    if let Some(tables) = tables {
        if tables.width() != TABLES_SIZE || tables.height() != TABLES_SIZE {
            return Err(Error::InvalidInput("tables background must be 96x96"));
        }
    }

    let mut record = Box::new([0u8; RECORD_LEN]);
    write_rgb565(gauges, &mut record[..TABLES_BASE]);
    if let Some(tables) = tables {
        write_rgb565(tables, &mut record[TABLES_BASE..]);
    }
    Ok(record)
}

fn write_rgb565(image: &Raster, out: &mut [u8]) {
    for index in 0..image.pixel_count() {
        let [r, g, b, _] = image.rgba(index);
        let value = (r as u16 >> 3) << 11 | (g as u16 >> 2) << 5 | b as u16 >> 3;
        out[index * 2..index * 2 + 2].copy_from_slice(&value.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Raster {
        let mut data = vec![0u8; width as usize * height as usize * 4];
        for pixel in data.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
        Raster::from_rgba8(width, height, data).unwrap()
    }

    #[test]
    fn gauges_image_is_mandatory() {
        assert_eq!(
            pack(None, None),
            Err(Error::MissingInput("gauges background image"))
        );
    }

    #[test]
    fn rejects_wrong_geometry() {
        let wrong = solid(800, 479, [0, 0, 0, 255]);
        assert_eq!(
            pack(Some(&wrong), None),
            Err(Error::InvalidInput("gauges background must be 800x480"))
        );

        let gauges = solid(800, 480, [0, 0, 0, 255]);
        let tile = solid(96, 95, [0, 0, 0, 255]);
        assert_eq!(
            pack(Some(&gauges), Some(&tile)),
            Err(Error::InvalidInput("tables background must be 96x96"))
        );
    }

    #[test]
    fn rgb565_channel_packing() {
        let red = pack(Some(&solid(800, 480, [255, 0, 0, 255])), None).unwrap();
        assert_eq!(&red[..2], &0xF800u16.to_le_bytes());

        let green = pack(Some(&solid(800, 480, [0, 255, 0, 255])), None).unwrap();
        assert_eq!(&green[..2], &0x07E0u16.to_le_bytes());

        let blue = pack(Some(&solid(800, 480, [0, 0, 255, 255])), None).unwrap();
        assert_eq!(&blue[..2], &0x001Fu16.to_le_bytes());

        // Low source bits are dropped, not rounded.
        let dark = pack(Some(&solid(800, 480, [7, 3, 7, 255])), None).unwrap();
        assert_eq!(&dark[..2], &0u16.to_le_bytes());
    }

    #[test]
    fn tables_tile_lands_after_the_gauges_region() {
        let gauges = solid(800, 480, [0, 0, 0, 255]);
        let tile = solid(96, 96, [255, 255, 255, 255]);
        let record = pack(Some(&gauges), Some(&tile)).unwrap();

        assert_eq!(&record[TABLES_BASE..TABLES_BASE + 2], &0xFFFFu16.to_le_bytes());
        let end = TABLES_BASE + 96 * 96 * 2;
        assert_eq!(&record[end - 2..end], &0xFFFFu16.to_le_bytes());
        assert_eq!(end, RECORD_LEN);
    }

    #[test]
    fn absent_tables_image_leaves_zero_fill() {
        let gauges = solid(800, 480, [255, 255, 255, 255]);
        let record = pack(Some(&gauges), None).unwrap();
        assert!(record[TABLES_BASE..].iter().all(|&b| b == 0));
    }
}

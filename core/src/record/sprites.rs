//! The 131,072-byte sprite record: needle images and digit glyphs.
//!
//! The first three 32,768-byte segments hold the needle sprites as BGRA,
//! up to 8,192 pixels each. Twelve 2,730-byte glyph slots follow (digits
//! 0 through 9, the decimal point, the minus sign), one inverted-alpha byte
//! per pixel. The record starts out filled with `0xFF`; the firmware treats
//! that as "nothing drawn here".

use alloc::boxed::Box;

use log::warn;

use crate::error::{Error, Result};
use crate::raster::Raster;

/// Size of the sprite record in bytes.
pub const RECORD_LEN: usize = 131072;

pub const NEEDLE_SLOTS: usize = 3;
pub const NEEDLE_SEGMENT_LEN: usize = 32768;
/// Pixels per needle segment (4 bytes each).
pub const NEEDLE_MAX_PIXELS: usize = NEEDLE_SEGMENT_LEN / 4;

pub const DIGIT_SLOTS: usize = 12;
/// Glyph slots start right after the needle segments.
pub const DIGIT_BASE: usize = NEEDLE_SLOTS * NEEDLE_SEGMENT_LEN;
pub const DIGIT_SEGMENT_LEN: usize = 2730;

/// Packs needle and glyph images into the sprite record.
///
/// `needles` must hold 3 slots, `digits` 12 (digits 0-9, decimal point,
/// minus sign, in that order). Empty slots stay at the `0xFF` fill. An image
/// with more pixels than its slot holds is skipped, not truncated; the
/// firmware would render garbage from a half-written sprite.
pub fn pack(needles: &[Option<Raster>], digits: &[Option<Raster>]) -> Result<Box<[u8; RECORD_LEN]>> {
    if needles.len() != NEEDLE_SLOTS {
        return Err(Error::InvalidInput("expected 3 needle slots"));
    }
    if digits.len() != DIGIT_SLOTS {
        return Err(Error::InvalidInput("expected 12 digit slots"));
    }

    let mut record = Box::new([0xFFu8; RECORD_LEN]);

    for (slot, needle) in needles.iter().enumerate() {
        let Some(image) = needle else { continue };
        if image.pixel_count() > NEEDLE_MAX_PIXELS {
            warn!(
                "needle {slot} has {} pixels, a slot holds {NEEDLE_MAX_PIXELS}; leaving it empty",
                image.pixel_count()
            );
            continue;
        }
        let base = slot * NEEDLE_SEGMENT_LEN;
        for index in 0..image.pixel_count() {
            let [r, g, b, a] = image.rgba(index);
            let at = base + index * 4;
            record[at] = b;
            record[at + 1] = g;
            record[at + 2] = r;
            record[at + 3] = a;
        }
    }

    for (slot, digit) in digits.iter().enumerate() {
        let Some(image) = digit else { continue };
        if image.pixel_count() > DIGIT_SEGMENT_LEN {
            warn!(
                "digit glyph {slot} has {} pixels, a slot holds {DIGIT_SEGMENT_LEN}; leaving it empty",
                image.pixel_count()
            );
            continue;
        }
        let base = DIGIT_BASE + slot * DIGIT_SEGMENT_LEN;
        for index in 0..image.pixel_count() {
            // Glyph sources are grayscale; only the red channel matters.
            // Inverting makes black ink opaque and white "not drawn".
            let [r, _, _, _] = image.rgba(index);
            record[base + index] = 255 - r;
        }
    }

    Ok(record)
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

    fn no_needles() -> [Option<Raster>; 3] {
        [None, None, None]
    }

    fn no_digits() -> [Option<Raster>; 12] {
        core::array::from_fn(|_| None)
    }

    #[test]
    fn empty_slots_leave_the_fill() {
        let record = pack(&no_needles(), &no_digits()).unwrap();
        assert!(record.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn needle_pixels_are_re_channeled_to_bgra() {
        let mut needles = no_needles();
        needles[1] = Some(solid(2, 1, [1, 2, 3, 4]));
        let record = pack(&needles, &no_digits()).unwrap();

        assert_eq!(&record[NEEDLE_SEGMENT_LEN..NEEDLE_SEGMENT_LEN + 8], &[3, 2, 1, 4, 3, 2, 1, 4]);
        // First segment untouched.
        assert!(record[..NEEDLE_SEGMENT_LEN].iter().all(|&b| b == 0xFF));
        // Rest of the second segment keeps the fill.
        assert!(record[NEEDLE_SEGMENT_LEN + 8..2 * NEEDLE_SEGMENT_LEN].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn oversized_needle_is_skipped_whole() {
        let mut needles = no_needles();
        // 9000 pixels, over the 8192 a slot holds.
        needles[0] = Some(solid(100, 90, [10, 20, 30, 40]));
        let record = pack(&needles, &no_digits()).unwrap();
        assert!(record[..NEEDLE_SEGMENT_LEN].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn needle_at_exactly_the_cap_is_written() {
        let mut needles = no_needles();
        needles[2] = Some(solid(128, 64, [0, 0, 0, 255]));
        let record = pack(&needles, &no_digits()).unwrap();
        let base = 2 * NEEDLE_SEGMENT_LEN;
        assert_eq!(&record[base..base + 4], &[0, 0, 0, 255]);
        assert_eq!(&record[base + NEEDLE_SEGMENT_LEN - 4..base + NEEDLE_SEGMENT_LEN], &[0, 0, 0, 255]);
    }

    #[test]
    fn digit_glyphs_are_inverted_red() {
        let mut digits = no_digits();
        // Black, opaque: ink.
        digits[0] = Some(solid(1, 1, [0, 0, 0, 255]));
        // Mid gray; only the red channel is sampled.
        digits[5] = Some(solid(1, 1, [100, 42, 42, 255]));
        // White: background, must become "not drawn".
        digits[11] = Some(solid(1, 1, [255, 255, 255, 255]));
        let record = pack(&no_needles(), &digits).unwrap();

        assert_eq!(record[DIGIT_BASE], 0xFF);
        assert_eq!(record[DIGIT_BASE + 5 * DIGIT_SEGMENT_LEN], 155);
        assert_eq!(record[DIGIT_BASE + 11 * DIGIT_SEGMENT_LEN], 0x00);
        // Beyond the glyph's single pixel the fill remains.
        assert_eq!(record[DIGIT_BASE + 11 * DIGIT_SEGMENT_LEN + 1], 0xFF);
    }

    #[test]
    fn oversized_glyph_is_skipped_whole() {
        let mut digits = no_digits();
        // 2731 pixels, one over the slot size.
        digits[3] = Some(solid(2731, 1, [0, 0, 0, 255]));
        let record = pack(&no_needles(), &digits).unwrap();
        let base = DIGIT_BASE + 3 * DIGIT_SEGMENT_LEN;
        assert!(record[base..base + DIGIT_SEGMENT_LEN].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn rejects_wrong_slot_counts() {
        assert_eq!(
            pack(&no_needles()[..2], &no_digits()),
            Err(Error::InvalidInput("expected 3 needle slots"))
        );
        assert_eq!(
            pack(&no_needles(), &no_digits()[..11]),
            Err(Error::InvalidInput("expected 12 digit slots"))
        );
    }

    #[test]
    fn regions_do_not_overlap() {
        assert_eq!(DIGIT_BASE, 98304);
        assert!(DIGIT_BASE + DIGIT_SLOTS * DIGIT_SEGMENT_LEN <= RECORD_LEN);
    }
}

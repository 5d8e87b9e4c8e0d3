//! Device-independent bitmap (DIB) decoding.
//!
//! DIB payloads embedded in raster records carry a BITMAPINFOHEADER, an
//! optional RGBQUAD palette, and bottom-up pixel rows padded to 32-bit
//! boundaries. 1-bit, 8-bit and 24-bit uncompressed formats are supported.
//! Any malformation yields `None` rather than an error: a broken embedded
//! bitmap should cost one image, not the whole playback.

use image::{Rgba, RgbaImage};

use crate::binary::{read_i32_le, read_u16_le, read_u32_le};

const INFO_HEADER_SIZE: usize = 40;
const BI_RGB: u32 = 0;

/// Decode a raw DIB byte array into a top-down RGBA raster.
pub fn decode_dib(data: &[u8]) -> Option<RgbaImage> {
    if data.len() < INFO_HEADER_SIZE {
        log::warn!("DIB payload shorter than its header ({} bytes)", data.len());
        return None;
    }

    let header_size = read_u32_le(data, 0)? as usize;
    let width = read_i32_le(data, 4)?;
    let height = read_i32_le(data, 8)?;
    let bit_count = read_u16_le(data, 14)?;
    let compression = read_u32_le(data, 16)?;
    let clr_used = read_u32_le(data, 32)? as usize;

    if header_size < INFO_HEADER_SIZE || header_size > data.len() {
        log::warn!("DIB header size {} inconsistent with payload", header_size);
        return None;
    }
    if compression != BI_RGB {
        log::warn!("unsupported DIB compression {}", compression);
        return None;
    }
    if width <= 0 || height == 0 {
        return None;
    }

    let width = width as usize;
    // Negative height marks a top-down DIB; the common case is bottom-up.
    let bottom_up = height > 0;
    let height = height.unsigned_abs() as usize;

    let palette_len = match bit_count {
        1 | 8 => {
            if clr_used != 0 {
                clr_used.min(1 << bit_count)
            } else {
                1 << bit_count
            }
        }
        24 => 0,
        other => {
            log::warn!("unsupported DIB bit depth {}", other);
            return None;
        }
    };

    let palette_off = header_size;
    let pixels_off = palette_off.checked_add(palette_len.checked_mul(4)?)?;
    let palette = data.get(palette_off..pixels_off)?;

    // Rows are padded to 32-bit boundaries.
    let row_bits = width.checked_mul(bit_count as usize)?;
    let stride = row_bits.div_ceil(32).checked_mul(4)?;
    let pixels_end = pixels_off.checked_add(stride.checked_mul(height)?)?;
    let pixels = data.get(pixels_off..pixels_end)?;

    let mut out = RgbaImage::new(width as u32, height as u32);
    for y in 0..height {
        let src_row = if bottom_up { height - 1 - y } else { y };
        let row = &pixels[src_row * stride..src_row * stride + stride];
        for x in 0..width {
            let rgba = match bit_count {
                1 => {
                    let bit = (row[x / 8] >> (7 - (x % 8))) & 1;
                    palette_entry(palette, bit as usize)?
                }
                8 => palette_entry(palette, row[x] as usize)?,
                _ => {
                    let px = &row[x * 3..x * 3 + 3];
                    Rgba([px[2], px[1], px[0], 255])
                }
            };
            out.put_pixel(x as u32, y as u32, rgba);
        }
    }
    Some(out)
}

/// RGBQUAD palette entry: stored blue, green, red, reserved.
fn palette_entry(palette: &[u8], idx: usize) -> Option<Rgba<u8>> {
    let q = palette.get(idx * 4..idx * 4 + 4)?;
    Some(Rgba([q[2], q[1], q[0], 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(width: i32, height: i32, bit_count: u16, clr_used: u32) -> Vec<u8> {
        let mut h = Vec::with_capacity(INFO_HEADER_SIZE);
        h.extend_from_slice(&40u32.to_le_bytes());
        h.extend_from_slice(&width.to_le_bytes());
        h.extend_from_slice(&height.to_le_bytes());
        h.extend_from_slice(&1u16.to_le_bytes()); // planes
        h.extend_from_slice(&bit_count.to_le_bytes());
        h.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
        h.extend_from_slice(&0u32.to_le_bytes()); // size image
        h.extend_from_slice(&0i32.to_le_bytes());
        h.extend_from_slice(&0i32.to_le_bytes());
        h.extend_from_slice(&clr_used.to_le_bytes());
        h.extend_from_slice(&0u32.to_le_bytes());
        h
    }

    #[test]
    fn eight_bit_indexed_bottom_up() {
        let mut dib = header(2, 2, 8, 2);
        dib.extend_from_slice(&[0, 0, 0, 0]); // palette 0: black
        dib.extend_from_slice(&[255, 255, 255, 0]); // palette 1: white
        dib.extend_from_slice(&[0, 1, 0, 0]); // bottom row, padded to 4
        dib.extend_from_slice(&[1, 0, 0, 0]); // top row (file order is bottom-up)
        let img = decode_dib(&dib).unwrap();
        let black = Rgba([0, 0, 0, 255]);
        let white = Rgba([255, 255, 255, 255]);
        assert_eq!(*img.get_pixel(0, 0), white);
        assert_eq!(*img.get_pixel(1, 0), black);
        assert_eq!(*img.get_pixel(0, 1), black);
        assert_eq!(*img.get_pixel(1, 1), white);
    }

    #[test]
    fn one_bit_msb_first() {
        let mut dib = header(8, 1, 1, 2);
        dib.extend_from_slice(&[0, 0, 0, 0]);
        dib.extend_from_slice(&[255, 255, 255, 0]);
        dib.extend_from_slice(&[0b1000_0001, 0, 0, 0]);
        let img = decode_dib(&dib).unwrap();
        assert_eq!(*img.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*img.get_pixel(1, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(7, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn twentyfour_bit_bgr() {
        let mut dib = header(1, 1, 24, 0);
        dib.extend_from_slice(&[0x10, 0x20, 0x30, 0]); // B G R + pad
        let img = decode_dib(&dib).unwrap();
        assert_eq!(*img.get_pixel(0, 0), Rgba([0x30, 0x20, 0x10, 255]));
    }

    #[test]
    fn short_pixel_data_is_absent_not_fatal() {
        let mut dib = header(4, 4, 24, 0);
        dib.extend_from_slice(&[0u8; 8]); // far fewer than 4 padded rows
        assert!(decode_dib(&dib).is_none());
    }

    #[test]
    fn unsupported_depth_is_absent() {
        let dib = header(1, 1, 16, 0);
        assert!(decode_dib(&dib).is_none());
    }
}

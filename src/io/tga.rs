//! Uncompressed 24-bit Truevision TGA export.
//!
//! Layout: an 18-byte header (no ID, no color map, image type 2, origin
//! (0, 0), little-endian width and height, 24 bits per pixel, descriptor 0)
//! followed by one `B, G, R` triple per pixel in buffer row order. Descriptor 0
//! places the origin at the bottom-left, which matches the framebuffer's
//! bottom-up rows.

use crate::core::framebuffer::FrameBuffer;
use crate::error::{RasterError, Result};
use log::info;
use std::fs;
use std::path::Path;

pub const TGA_HEADER_LEN: usize = 18;

const IMAGE_TYPE_UNCOMPRESSED_TRUE_COLOR: u8 = 2;
const BITS_PER_PIXEL: u8 = 24;

/// The 18-byte header for a `width` x `height` image.
pub fn tga_header(width: usize, height: usize) -> Result<[u8; TGA_HEADER_LEN]> {
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(RasterError::ImageTooLarge { width, height });
    };
    let [w_lo, w_hi] = w.to_le_bytes();
    let [h_lo, h_hi] = h.to_le_bytes();

    Ok([
        0, // ID length
        0, // no color map
        IMAGE_TYPE_UNCOMPRESSED_TRUE_COLOR,
        0, 0, 0, 0, 0, // color map spec
        0, 0, // x origin
        0, 0, // y origin
        w_lo, w_hi,
        h_lo, h_hi,
        BITS_PER_PIXEL,
        0, // descriptor
    ])
}

/// Encodes the color plane of `framebuffer` as a TGA file in memory.
pub fn encode_tga(framebuffer: &FrameBuffer) -> Result<Vec<u8>> {
    let header = tga_header(framebuffer.width, framebuffer.height)?;
    let mut bytes = Vec::with_capacity(TGA_HEADER_LEN + framebuffer.colors().len() * 3);
    bytes.extend_from_slice(&header);
    for color in framebuffer.colors() {
        bytes.extend_from_slice(&color.to_bgr());
    }
    Ok(bytes)
}

pub fn save_tga<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode_tga(framebuffer)?;
    fs::write(path, &bytes).map_err(|source| RasterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("TGA written: {:?} ({}x{})", path, framebuffer.width, framebuffer.height);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Color;

    #[test]
    fn test_header_bytes() {
        let header = tga_header(640, 300).unwrap();
        assert_eq!(
            header,
            [0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x80, 0x02, 0x2C, 0x01, 24, 0]
        );
    }

    #[test]
    fn test_encode_pixel_order_and_bgr() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel(0, 0, Color::new(1, 2, 3));
        fb.set_pixel(1, 0, Color::new(4, 5, 6));
        fb.set_pixel(0, 1, Color::new(7, 8, 9));
        fb.set_pixel(1, 1, Color::new(10, 11, 12));

        let bytes = encode_tga(&fb).unwrap();
        assert_eq!(bytes.len(), TGA_HEADER_LEN + 12);
        assert_eq!(&bytes[TGA_HEADER_LEN..], &[3, 2, 1, 6, 5, 4, 9, 8, 7, 12, 11, 10]);
    }

    #[test]
    fn test_oversized_image_is_rejected() {
        assert!(matches!(
            tga_header(70_000, 1),
            Err(RasterError::ImageTooLarge { width: 70_000, height: 1 })
        ));
        assert!(tga_header(65_535, 65_535).is_ok());
    }

    #[test]
    fn test_save_tga_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.tga");
        let mut fb = FrameBuffer::new(3, 1);
        fb.clear_color(Color::new(255, 128, 0));
        save_tga(&fb, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes, encode_tga(&fb).unwrap());
        assert_eq!(&bytes[TGA_HEADER_LEN..TGA_HEADER_LEN + 3], &[0, 128, 255]);
    }
}

use crate::core::framebuffer::FrameBuffer;
use crate::error::{RasterError, Result};
use crate::io::tga::save_tga;
use image::{ImageBuffer, Rgb, RgbImage};
use log::info;
use std::path::Path;

/// Writes the color plane to `path`. `.tga` goes through the TGA writer;
/// any other extension is encoded by the `image` crate.
pub fn save_framebuffer<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    let is_tga = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tga"));

    if is_tga {
        return save_tga(framebuffer, path);
    }

    to_rgb_image(framebuffer)
        .save(path)
        .map_err(|source| RasterError::ImageSave {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Image written: {:?} ({}x{})", path, framebuffer.width, framebuffer.height);
    Ok(())
}

/// Converts the framebuffer to a top-down RGB image (buffer rows are bottom-up).
pub fn to_rgb_image(framebuffer: &FrameBuffer) -> RgbImage {
    let height = framebuffer.height as u32;
    ImageBuffer::from_fn(framebuffer.width as u32, height, |x, y| {
        let color = framebuffer
            .get_pixel(x as usize, (height - 1 - y) as usize)
            .unwrap_or_default();
        Rgb([color.r, color.g, color.b])
    })
}

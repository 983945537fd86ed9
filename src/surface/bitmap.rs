//! Pixel buffers and the helpers every drawable is built from
//!
//! Images are plain RGBA buffers. An image either carries a color key
//! (pixels matching it are skipped when blitting) or relies on per-pixel
//! alpha, which is blended source-over.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::types::{Color, Pos, Rect, Size};
use crate::error::{Error, Result};

/// RGBA pixel buffer with optional color-key transparency
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pixels: RgbaImage,
    color_key: Option<Color>,
}

impl Image {
    /// Blank image filled with `fill`. With a color key the fill is made opaque.
    pub fn new(size: Size, fill: Color, color_key: Option<Color>) -> Self {
        let fill = if color_key.is_some() { fill.opaque() } else { fill };
        Self {
            pixels: RgbaImage::from_pixel(size.0, size.1, fill.to_rgba()),
            color_key,
        }
    }

    pub fn from_rgba(pixels: RgbaImage, color_key: Option<Color>) -> Self {
        Self { pixels, color_key }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Size {
        self.pixels.dimensions()
    }

    /// Bounds of the whole image, at the origin
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size((0, 0), self.size())
    }

    pub fn color_key(&self) -> Option<Color> {
        self.color_key
    }

    pub fn set_color_key(&mut self, color_key: Option<Color>) {
        self.color_key = color_key;
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return None;
        }
        Some((*self.pixels.get_pixel(x as u32, y as u32)).into())
    }

    pub fn fill(&mut self, color: Color) {
        self.fill_rect(self.rect(), color);
    }

    /// Overwrite a region (clipped to the image) with `color`, no blending
    pub fn fill_rect(&mut self, area: Rect, color: Color) {
        let Some(area) = area.intersect(&self.rect()) else {
            return;
        };
        let px = color.to_rgba();
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.pixels.put_pixel(x as u32, y as u32, px);
            }
        }
    }

    /// Draw `area` of `src` (all of it when `None`) with its top-left at `dest`.
    ///
    /// Clipped against both images. Returns the region of `self` that was
    /// touched, if any.
    pub fn blit(&mut self, src: &Image, dest: Pos, area: Option<Rect>) -> Option<Rect> {
        let (sx, sy, target) = self.clip(src, dest, area)?;
        let key = src.color_key;

        for row in 0..target.h {
            for col in 0..target.w {
                let px = *src.pixels.get_pixel((sx + col) as u32, (sy + row) as u32);
                if key.is_some_and(|k| k.same_rgb(&px)) {
                    continue;
                }
                let dst = self
                    .pixels
                    .get_pixel_mut((target.x + col) as u32, (target.y + row) as u32);
                blend(dst, px);
            }
        }

        Some(target)
    }

    /// Copy the same region of `src` over `self`, replacing pixels as-is
    pub fn copy_from(&mut self, src: &Image, area: Rect) {
        let Some((sx, sy, target)) = self.clip(src, area.pos(), Some(area)) else {
            return;
        };
        for row in 0..target.h {
            for col in 0..target.w {
                let px = *src.pixels.get_pixel((sx + col) as u32, (sy + row) as u32);
                self.pixels
                    .put_pixel((target.x + col) as u32, (target.y + row) as u32, px);
            }
        }
    }

    /// Nearest-neighbour resample to an exact size
    pub fn resized(&self, size: Size) -> Image {
        if size == self.size() {
            return self.clone();
        }
        let pixels = if size.0 == 0 || size.1 == 0 || self.width() == 0 || self.height() == 0 {
            RgbaImage::new(size.0, size.1)
        } else {
            imageops::resize(&self.pixels, size.0, size.1, FilterType::Nearest)
        };
        Image::from_rgba(pixels, self.color_key)
    }

    /// Resolve a blit into (source x, source y, destination rect), all clipped
    fn clip(&self, src: &Image, dest: Pos, area: Option<Rect>) -> Option<(i32, i32, Rect)> {
        let requested = area.unwrap_or_else(|| src.rect());
        let source = requested.intersect(&src.rect())?;
        // Shift the destination by whatever was clipped off the source's top-left
        let dest = (dest.0 + source.x - requested.x, dest.1 + source.y - requested.y);
        let target = source.at(dest).intersect(&self.rect())?;
        let sx = source.x + target.x - dest.0;
        let sy = source.y + target.y - dest.1;
        Some((sx, sy, target))
    }
}

/// Source-over blend of one pixel
fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src[3] as u32;
    if sa == 255 {
        *dst = src;
        return;
    }
    if sa == 0 {
        return;
    }

    let inv = 255 - sa;
    let dw = dst[3] as u32 * inv / 255;
    let out_a = sa + dw;
    for c in 0..3 {
        let num = src[c] as u32 * sa + dst[c] as u32 * dw;
        dst[c] = (num / out_a).min(255) as u8;
    }
    dst[3] = out_a.min(255) as u8;
}

pub(crate) fn check_scale(scale: f32) -> Result<f32> {
    if scale > 0.0 {
        Ok(scale)
    } else {
        Err(Error::InvalidScale(scale))
    }
}

/// Load an image file.
///
/// With `color_key` the image is made opaque and that color becomes
/// transparent; without it the file's own alpha channel is kept.
pub fn load_image<P: AsRef<Path>>(path: P, color_key: Option<Color>, scale: f32) -> Result<Image> {
    check_scale(scale)?;
    let path = path.as_ref();

    let decoded = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
            Error::NotFound(path.to_path_buf())
        }
        other => Error::Decode {
            path: path.to_path_buf(),
            source: other,
        },
    })?;

    let mut pixels = decoded.to_rgba8();
    if color_key.is_some() {
        for px in pixels.pixels_mut() {
            px[3] = 255;
        }
    }
    log::debug!("Loaded image {} ({}x{})", path.display(), pixels.width(), pixels.height());

    scale_image(&Image::from_rgba(pixels, color_key), scale)
}

/// New image of `size` filled with `background`, then scaled
pub fn create_image(
    size: Size,
    color_key: Option<Color>,
    background: Color,
    scale: f32,
) -> Result<Image> {
    check_scale(scale)?;
    scale_image(&Image::new(size, background, color_key), scale)
}

/// Resize by `scale`: the result is `floor(w * scale) x floor(h * scale)`
pub fn scale_image(image: &Image, scale: f32) -> Result<Image> {
    check_scale(scale)?;
    Ok(scaled(image, scale))
}

/// `scale_image` for a scale already known to be positive
pub(crate) fn scaled(image: &Image, scale: f32) -> Image {
    if scale == 1.0 {
        return image.clone();
    }
    let (w, h) = image.size();
    image.resized(((w as f32 * scale) as u32, (h as f32 * scale) as u32))
}

/// Position multiplied by `scale`, truncated
pub fn scale_pos(pos: Pos, scale: f32) -> Pos {
    ((pos.0 as f32 * scale) as i32, (pos.1 as f32 * scale) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(255, 0, 0);
    const BLUE: Color = Color::new(0, 0, 255);

    #[test]
    fn test_scale_image_size_is_floored() {
        let img = Image::new((7, 5), RED, None);
        for scale in [0.3, 0.5, 1.0, 1.5, 2.0, 3.25] {
            let scaled = scale_image(&img, scale).unwrap();
            let expected = ((7.0 * scale) as u32, (5.0 * scale) as u32);
            assert_eq!(scaled.size(), expected, "scale {}", scale);
        }
    }

    #[test]
    fn test_scale_image_rejects_non_positive() {
        let img = Image::new((4, 4), RED, None);
        assert!(matches!(scale_image(&img, 0.0), Err(Error::InvalidScale(_))));
        assert!(matches!(scale_image(&img, -2.0), Err(Error::InvalidScale(_))));
        assert!(matches!(scale_image(&img, f32::NAN), Err(Error::InvalidScale(_))));
    }

    #[test]
    fn test_scale_up_keeps_pixels_blocky() {
        let mut img = Image::new((2, 1), RED, None);
        img.fill_rect(Rect::new(1, 0, 1, 1), BLUE);
        let scaled = scale_image(&img, 2.0).unwrap();
        assert_eq!(scaled.get_pixel(0, 1), Some(RED));
        assert_eq!(scaled.get_pixel(1, 0), Some(RED));
        assert_eq!(scaled.get_pixel(2, 0), Some(BLUE));
        assert_eq!(scaled.get_pixel(3, 1), Some(BLUE));
    }

    #[test]
    fn test_create_image_with_color_key_is_opaque() {
        let img = create_image((3, 2), Some(Color::MAGENTA), Color::TRANSPARENT, 2.0).unwrap();
        assert_eq!(img.size(), (6, 4));
        assert_eq!(img.get_pixel(5, 3), Some(Color::BLACK));
        assert_eq!(img.color_key(), Some(Color::MAGENTA));
    }

    #[test]
    fn test_blit_skips_color_key() {
        let mut src = Image::new((2, 1), Color::MAGENTA, Some(Color::MAGENTA));
        src.fill_rect(Rect::new(1, 0, 1, 1), RED);
        let mut dst = Image::new((2, 1), BLUE, None);

        dst.blit(&src, (0, 0), None);
        assert_eq!(dst.get_pixel(0, 0), Some(BLUE));
        assert_eq!(dst.get_pixel(1, 0), Some(RED));
    }

    #[test]
    fn test_blit_blends_alpha() {
        let src = Image::new((1, 1), Color::with_alpha(255, 0, 0, 0), None);
        let mut dst = Image::new((1, 1), BLUE, None);
        dst.blit(&src, (0, 0), None);
        assert_eq!(dst.get_pixel(0, 0), Some(BLUE));

        let half = Image::new((1, 1), Color::with_alpha(255, 255, 255, 128), None);
        let mut dst = Image::new((1, 1), Color::BLACK, None);
        dst.blit(&half, (0, 0), None);
        let px = dst.get_pixel(0, 0).unwrap();
        assert_eq!(px.a, 255);
        assert!((127..=129).contains(&px.r));
    }

    #[test]
    fn test_blit_area_and_clipping() {
        let mut src = Image::new((4, 4), RED, None);
        src.fill_rect(Rect::new(2, 2, 2, 2), BLUE);
        let mut dst = Image::new((3, 3), Color::BLACK, None);

        // Only the blue quarter, placed partly off the left edge
        let touched = dst.blit(&src, (-1, 1), Some(Rect::new(2, 2, 2, 2)));
        assert_eq!(touched, Some(Rect::new(0, 1, 1, 2)));
        assert_eq!(dst.get_pixel(0, 1), Some(BLUE));
        assert_eq!(dst.get_pixel(0, 2), Some(BLUE));
        assert_eq!(dst.get_pixel(1, 1), Some(Color::BLACK));

        assert_eq!(dst.blit(&src, (10, 10), None), None);
    }

    #[test]
    fn test_copy_from_replaces_region() {
        let bg = Image::new((4, 4), Color::with_alpha(1, 2, 3, 0), None);
        let mut dst = Image::new((4, 4), RED, None);
        dst.copy_from(&bg, Rect::new(1, 1, 2, 2));
        assert_eq!(dst.get_pixel(1, 1), Some(Color::with_alpha(1, 2, 3, 0)));
        assert_eq!(dst.get_pixel(0, 0), Some(RED));
        assert_eq!(dst.get_pixel(3, 3), Some(RED));
    }

    #[test]
    fn test_load_image_missing_file() {
        let path = std::env::temp_dir().join("pixel_stage_missing_image.png");
        assert!(matches!(load_image(&path, None, 1.0), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_load_image_corrupt_file() {
        let path = std::env::temp_dir().join("pixel_stage_corrupt_image.png");
        std::fs::write(&path, b"not a png").unwrap();
        assert!(matches!(load_image(&path, None, 1.0), Err(Error::Decode { .. })));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_image_with_color_key_and_scale() {
        let path = std::env::temp_dir().join("pixel_stage_load_image.png");
        let mut pixels = RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 255, 10]));
        pixels.put_pixel(0, 0, image::Rgba([0, 255, 0, 40]));
        pixels.save(&path).unwrap();

        let img = load_image(&path, Some(Color::MAGENTA), 2.0).unwrap();
        assert_eq!(img.size(), (4, 4));
        assert_eq!(img.get_pixel(0, 0), Some(Color::new(0, 255, 0)));
        assert_eq!(img.color_key(), Some(Color::MAGENTA));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_scale_pos_truncates() {
        assert_eq!(scale_pos((3, 5), 1.5), (4, 7));
    }
}

//! Glyph compositing for bitmap text and scores

use std::collections::HashMap;

use crate::error::Result;
use crate::surface::{check_frame, scaled, Color, Image, NamedFrames, Rect, Size};

/// Character -> glyph rectangle in a source image
pub type GlyphMap = HashMap<char, Rect>;

/// How composed glyph images look
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphStyle {
    /// Width of the gap left for characters without a glyph
    pub space_width: u32,
    pub color_key: Option<Color>,
    pub background: Color,
    pub scale: f32,
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self {
            space_width: 8,
            color_key: None,
            background: Color::TRANSPARENT,
            scale: 1.0,
        }
    }
}

/// One slot of a composed line
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Glyph {
    Frame(Rect),
    Blank(u32),
}

impl Glyph {
    fn width(&self) -> u32 {
        match self {
            Glyph::Frame(rect) => rect.size().0,
            Glyph::Blank(w) => *w,
        }
    }

    fn height(&self) -> u32 {
        match self {
            Glyph::Frame(rect) => rect.size().1,
            Glyph::Blank(_) => 0,
        }
    }
}

/// Unscaled size of a composed line: summed widths, tallest glyph
pub(crate) fn line_size(glyphs: &[Glyph]) -> Size {
    let w = glyphs.iter().map(Glyph::width).sum();
    let h = glyphs.iter().map(Glyph::height).max().unwrap_or(0);
    (w, h)
}

/// Lay `glyphs` out left-to-right on a fresh image, then scale it
pub(crate) fn compose(source: &Image, glyphs: &[Glyph], style: &GlyphStyle) -> Image {
    let mut image = Image::new(line_size(glyphs), style.background, style.color_key);

    let mut x = 0;
    for glyph in glyphs {
        if let Glyph::Frame(rect) = glyph {
            image.blit(source, (x, 0), Some(*rect));
        }
        x += glyph.width() as i32;
    }

    scaled(&image, style.scale)
}

/// Fails on the first glyph outside `source`
pub(crate) fn check_glyphs<'a>(
    source: &Image,
    glyphs: impl IntoIterator<Item = &'a Rect>,
) -> Result<()> {
    let size = source.size();
    glyphs.into_iter().try_for_each(|rect| check_frame(rect, size))
}

/// Glyph map from a frame sheet whose keys are single characters.
///
/// Each key's first rect is the glyph; other keys are skipped.
pub fn glyphs_from_frames(frames: &NamedFrames) -> GlyphMap {
    let mut glyphs = GlyphMap::new();
    for (key, rects) in frames.iter() {
        let mut chars = key.chars();
        match (chars.next(), chars.next(), rects.first()) {
            (Some(c), None, Some(rect)) => {
                glyphs.insert(c, *rect);
            }
            _ => log::warn!("Skipping glyph entry {:?}: expected one character with a frame", key),
        }
    }
    glyphs
}

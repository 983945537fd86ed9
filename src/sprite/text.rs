//! Bitmap text

use std::any::Any;
use std::rc::Rc;

use super::glyphs::{check_glyphs, compose, Glyph, GlyphMap, GlyphStyle};
use crate::error::Result;
use crate::scene::Drawable;
use crate::surface::{check_scale, scale_pos, Image, Pos, Rect};

/// A line of text composed from glyphs of a source image.
///
/// The image is rebuilt only when the text actually changes.
pub struct Text {
    source: Rc<Image>,
    glyphs: GlyphMap,
    style: GlyphStyle,
    text: String,
    pos: Pos,
    image: Image,
    dirty: bool,
}

impl Text {
    pub fn new(
        source: Rc<Image>,
        glyphs: GlyphMap,
        pos: Pos,
        text: &str,
        style: GlyphStyle,
    ) -> Result<Self> {
        check_scale(style.scale)?;
        check_glyphs(&source, glyphs.values())?;

        let mut label = Self {
            source,
            glyphs,
            style,
            text: text.to_string(),
            pos,
            image: Image::new((0, 0), style.background, style.color_key),
            dirty: true,
        };
        label.render();
        Ok(label)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text; no-op when unchanged
    pub fn set_text(&mut self, text: &str) {
        if self.text == text {
            return;
        }
        self.text = text.to_string();
        self.render();
    }

    /// Unscaled position
    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn set_pos(&mut self, pos: Pos) {
        self.pos = pos;
        self.dirty = true;
    }

    pub fn style(&self) -> &GlyphStyle {
        &self.style
    }

    fn render(&mut self) {
        let line: Vec<Glyph> = self
            .text
            .chars()
            .map(|c| match self.glyphs.get(&c) {
                Some(rect) => Glyph::Frame(*rect),
                None => Glyph::Blank(self.style.space_width),
            })
            .collect();

        self.image = compose(&self.source, &line, &self.style);
        self.dirty = true;
    }
}

impl Drawable for Text {
    fn update(&mut self, _delta_ms: f32) {}

    fn image(&self) -> &Image {
        &self.image
    }

    fn rect(&self) -> Rect {
        Rect::from_pos_size(scale_pos(self.pos, self.style.scale), self.image.size())
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

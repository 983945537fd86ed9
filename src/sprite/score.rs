//! Numeric score display built from digit glyphs

use std::any::Any;
use std::rc::Rc;

use super::glyphs::{check_glyphs, compose, Glyph, GlyphStyle};
use crate::error::{Error, Result};
use crate::scene::Drawable;
use crate::surface::{check_scale, scale_pos, Image, Pos, Rect};

/// How a score value is turned into digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreFormat {
    /// Minimum number of digits shown when `leading_zeros` is set
    pub digits: usize,
    pub leading_zeros: bool,
}

impl Default for ScoreFormat {
    fn default() -> Self {
        Self { digits: 2, leading_zeros: true }
    }
}

impl ScoreFormat {
    pub fn format(&self, value: u64) -> String {
        if self.leading_zeros {
            format!("{:0width$}", value, width = self.digits)
        } else {
            value.to_string()
        }
    }
}

/// Non-negative number drawn with ten digit glyphs (index 0-9)
pub struct Score {
    source: Rc<Image>,
    digits: [Rect; 10],
    format: ScoreFormat,
    style: GlyphStyle,
    value: u64,
    pos: Pos,
    image: Image,
    dirty: bool,
}

impl Score {
    /// `digits[n]` is the glyph for digit `n`; at least ten are required
    pub fn new(
        source: Rc<Image>,
        digits: &[Rect],
        pos: Pos,
        value: u64,
        format: ScoreFormat,
        style: GlyphStyle,
    ) -> Result<Self> {
        check_scale(style.scale)?;
        let digits: [Rect; 10] = digits
            .get(..10)
            .and_then(|d| d.try_into().ok())
            .ok_or(Error::MissingDigits(digits.len()))?;
        check_glyphs(&source, digits.iter())?;

        let mut score = Self {
            source,
            digits,
            format,
            style,
            value,
            pos,
            image: Image::new((0, 0), style.background, style.color_key),
            dirty: true,
        };
        score.render();
        Ok(score)
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Show a new value. Returns false (and keeps the image) if it is unchanged.
    pub fn set_value(&mut self, value: u64) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.render();
        true
    }

    pub fn add(&mut self, delta: u64) -> bool {
        self.set_value(self.value.saturating_add(delta))
    }

    pub fn format(&self) -> ScoreFormat {
        self.format
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn set_pos(&mut self, pos: Pos) {
        self.pos = pos;
        self.dirty = true;
    }

    fn render(&mut self) {
        let line: Vec<Glyph> = self
            .format
            .format(self.value)
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| Glyph::Frame(self.digits[d as usize]))
            .collect();

        self.image = compose(&self.source, &line, &self.style);
        self.dirty = true;
    }
}

impl Drawable for Score {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Color;

    /// Digit `n` is `n + 1` pixels wide and `10 - n` tall, painted with red = n
    fn digit_sheet() -> (Rc<Image>, Vec<Rect>) {
        let mut source = Image::new((60, 10), Color::TRANSPARENT, None);
        let mut rects = Vec::new();
        let mut x = 0;
        for n in 0..10 {
            let rect = Rect::new(x, 0, n + 1, 10 - n);
            source.fill_rect(rect, Color::new(n as u8, 0, 0));
            rects.push(rect);
            x += n + 1;
        }
        (Rc::new(source), rects)
    }

    fn reds(score: &Score) -> Vec<u8> {
        // Sample the top-left pixel of each digit slot
        let mut out = Vec::new();
        let mut x = 0;
        for c in score.format().format(score.value()).chars() {
            let n = c.to_digit(10).unwrap() as i32;
            out.push(score.image().get_pixel(x, 0).unwrap().r);
            x += n + 1;
        }
        out
    }

    #[test]
    fn test_leading_zeros() {
        let (source, digits) = digit_sheet();
        let format = ScoreFormat { digits: 3, leading_zeros: true };
        let style = GlyphStyle::default();
        let mut score = Score::new(source, &digits, (0, 0), 7, format, style).unwrap();

        assert_eq!(reds(&score), [0, 0, 7]);
        assert_eq!(score.image().size(), (1 + 1 + 8, 10));

        score.set_value(142);
        assert_eq!(reds(&score), [1, 4, 2]);
        assert_eq!(score.image().size(), (2 + 5 + 3, 9));
    }

    #[test]
    fn test_without_leading_zeros() {
        let format = ScoreFormat { digits: 4, leading_zeros: false };
        assert_eq!(format.format(42), "42");
        assert_eq!(ScoreFormat { digits: 4, leading_zeros: true }.format(42), "0042");
        assert_eq!(ScoreFormat { digits: 2, leading_zeros: true }.format(12345), "12345");
    }

    #[test]
    fn test_same_value_skips_render() {
        let (source, digits) = digit_sheet();
        let (format, style) = (ScoreFormat::default(), GlyphStyle::default());
        let mut score = Score::new(source, &digits, (0, 0), 5, format, style).unwrap();
        score.mark_clean();
        let before = score.image().clone();

        assert!(!score.set_value(5));
        assert!(!score.is_dirty());
        assert_eq!(score.image(), &before);

        assert!(score.add(3));
        assert_eq!(score.value(), 8);
        assert!(score.is_dirty());
    }

    #[test]
    fn test_requires_ten_digits() {
        let (source, digits) = digit_sheet();
        let (format, style) = (ScoreFormat::default(), GlyphStyle::default());
        assert!(matches!(
            Score::new(source, &digits[..9], (0, 0), 0, format, style),
            Err(Error::MissingDigits(9))
        ));
    }

    #[test]
    fn test_scale_applies() {
        let (source, digits) = digit_sheet();
        let style = GlyphStyle { scale: 2.0, ..Default::default() };
        let format = ScoreFormat { digits: 1, leading_zeros: true };
        let score = Score::new(source, &digits, (5, 1), 0, format, style).unwrap();
        assert_eq!(score.rect(), Rect::new(10, 2, 2, 20));
    }
}

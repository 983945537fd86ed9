//! Core types for surfaces: colors, positions and rectangles

use serde::{Deserialize, Serialize};

/// Screen-space position, top-left origin
pub type Pos = (i32, i32);

/// Width and height in pixels
pub type Size = (u32, u32);

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const MAGENTA: Color = Color { r: 255, g: 0, b: 255, a: 255 };
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with the alpha channel forced to 255
    pub const fn opaque(self) -> Self {
        Self { a: 255, ..self }
    }

    /// True when the RGB channels match, alpha ignored (color-key test)
    pub fn same_rgb(self, px: &image::Rgba<u8>) -> bool {
        self.r == px[0] && self.g == px[1] && self.b == px[2]
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::new(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Color {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Color::with_alpha(r, g, b, a)
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(px: image::Rgba<u8>) -> Self {
        Color::with_alpha(px[0], px[1], px[2], px[3])
    }
}

/// Integer rectangle, used both as a screen placement and a sheet sub-region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Pos, size: Size) -> Self {
        Self::new(pos.0, pos.1, size.0 as i32, size.1 as i32)
    }

    pub fn pos(&self) -> Pos {
        (self.x, self.y)
    }

    pub fn size(&self) -> Size {
        (self.w.max(0) as u32, self.h.max(0) as u32)
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Same size, moved to `pos`
    pub fn at(&self, pos: Pos) -> Self {
        Self::new(pos.0, pos.1, self.w, self.h)
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Overlapping area, `None` when the rects don't touch
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 > x0 && y1 > y0 {
            Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
        } else {
            None
        }
    }

    /// Smallest rect covering both
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Every component multiplied by `scale`, truncated toward zero
    pub fn scaled(&self, scale: f32) -> Rect {
        Rect::new(
            (self.x as f32 * scale) as i32,
            (self.y as f32 * scale) as i32,
            (self.w as f32 * scale) as i32,
            (self.h as f32 * scale) as i32,
        )
    }
}

impl From<[i32; 4]> for Rect {
    fn from([x, y, w, h]: [i32; 4]) -> Self {
        Rect::new(x, y, w, h)
    }
}

impl From<(i32, i32, i32, i32)> for Rect {
    fn from((x, y, w, h): (i32, i32, i32, i32)) -> Self {
        Rect::new(x, y, w, h)
    }
}

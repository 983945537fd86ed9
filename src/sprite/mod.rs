//! Drawables: animated sprites, bitmap text and scores

mod animation;
mod glyphs;
mod score;
#[allow(clippy::module_inception)]
mod sprite;
mod text;

pub use animation::*;
pub use glyphs::{glyphs_from_frames, GlyphMap, GlyphStyle};
pub use score::*;
pub use sprite::*;
pub use text::*;

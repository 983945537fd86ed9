//! CPU-side surfaces
//!
//! Everything a scene draws is composed here first:
//! - RGBA images with color-key or alpha transparency
//! - Clipped blits and nearest-neighbour scaling
//! - Sprite-sheet loading (image + named frame rectangles)

mod bitmap;
mod sheet;
mod types;

pub use bitmap::*;
pub use sheet::*;
pub use types::*;

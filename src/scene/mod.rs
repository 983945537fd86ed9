//! Scenes and the machinery they run on
//!
//! - `drawable`: the trait every scene element implements
//! - `compositor`: dirty-rectangle repainting
//! - `clock`: frame pacing
//! - `input`: events handed to scene hooks

mod clock;
mod compositor;
mod drawable;
mod input;
#[allow(clippy::module_inception)]
mod scene;

pub use clock::FrameClock;
pub use compositor::Layer;
pub use drawable::{Drawable, Handle};
pub use input::*;
pub use scene::*;

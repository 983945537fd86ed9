use std::future::Future;

use crate::scene::{InputEvent, KeySet};
use crate::surface::{Image, Rect, Size};

/// Window, input and presentation backend a scene runs on
pub trait Platform {
    /// Logical screen size in pixels
    fn size(&self) -> Size;

    /// Events since the previous call, in arrival order
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Keys held down right now
    fn keys_held(&self) -> KeySet;

    /// Show `screen`; only `dirty` changed since the last call
    fn present(&mut self, screen: &Image, dirty: &[Rect]);

    /// Yield until the next frame may start
    fn next_frame(&mut self) -> impl Future<Output = ()>;
}

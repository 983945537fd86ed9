//! Positioned, optionally animated and moving sprites

use std::any::Any;
use std::rc::Rc;

use super::animation::{Animation, FrameSet, PlayState, Step};
use crate::error::Result;
use crate::scene::Drawable;
use crate::surface::{check_frame, Image, NamedFrames, Pos, Rect};

/// Frames per second used by `Sprite::new`
pub const DEFAULT_FPS: f32 = 12.0;

/// Called when an animation with a finite loop count runs out
pub type LoopStopHook = Box<dyn FnMut(&mut Sprite)>;

/// A sprite shows one region of a shared source image at a screen position.
///
/// The region is either fixed or driven by an `Animation`; a sprite with a
/// named frame set can switch between sequences at runtime.
pub struct Sprite {
    source: Rc<Image>,
    /// Sub-pixel position, so slow speeds still accumulate
    pos: (f32, f32),
    source_rect: Option<Rect>,
    animation: Animation,
    /// Pixels per millisecond
    speed: (f32, f32),
    visible: bool,
    dirty: bool,
    on_loop_stop: Option<LoopStopHook>,
}

impl Sprite {
    /// Still sprite showing the whole source image
    pub fn new(source: Rc<Image>, pos: Pos) -> Self {
        Self {
            source,
            pos: (pos.0 as f32, pos.1 as f32),
            source_rect: None,
            animation: Animation::new(FrameSet::Single(Vec::new()), DEFAULT_FPS),
            speed: (0.0, 0.0),
            visible: true,
            dirty: true,
            on_loop_stop: None,
        }
    }

    /// Sprite cycling through `frames` at `fps`
    pub fn animated(source: Rc<Image>, pos: Pos, frames: Vec<Rect>, fps: f32) -> Result<Self> {
        Self::from_frame_set(source, pos, FrameSet::Single(frames), fps)
    }

    /// Sprite with named sequences; the first key starts active
    pub fn with_animations(
        source: Rc<Image>,
        pos: Pos,
        frames: NamedFrames,
        fps: f32,
    ) -> Result<Self> {
        Self::from_frame_set(source, pos, FrameSet::named(frames)?, fps)
    }

    fn from_frame_set(source: Rc<Image>, pos: Pos, frames: FrameSet, fps: f32) -> Result<Self> {
        let size = source.size();
        frames.all_frames().try_for_each(|rect| check_frame(rect, size))?;

        let mut sprite = Self::new(source, pos);
        sprite.animation = Animation::new(frames, fps);
        sprite.source_rect = sprite.animation.current_frame();
        Ok(sprite)
    }

    /// Show a fixed region until the animation moves on
    pub fn with_source_rect(mut self, rect: Rect) -> Result<Self> {
        check_frame(&rect, self.source.size())?;
        self.source_rect = Some(rect);
        self.dirty = true;
        Ok(self)
    }

    pub fn source(&self) -> &Rc<Image> {
        &self.source
    }

    pub fn source_rect(&self) -> Option<Rect> {
        self.source_rect
    }

    pub fn pos(&self) -> Pos {
        (self.pos.0.floor() as i32, self.pos.1.floor() as i32)
    }

    pub fn set_pos(&mut self, pos: Pos) {
        self.pos = (pos.0 as f32, pos.1 as f32);
        self.dirty = true;
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.pos.0 += dx as f32;
        self.pos.1 += dy as f32;
        self.dirty = true;
    }

    pub fn size(&self) -> (u32, u32) {
        self.source_rect.map_or_else(|| self.source.size(), |r| r.size())
    }

    /// Pixels per millisecond on each axis
    pub fn speed(&self) -> (f32, f32) {
        self.speed
    }

    pub fn set_speed(&mut self, x: f32, y: f32) {
        self.speed = (x, y);
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.dirty = true;
        }
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn frame_index(&self) -> usize {
        self.animation.frame_index()
    }

    pub fn play_state(&self) -> PlayState {
        self.animation.state()
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_playing()
    }

    /// Active sequence of a named frame set
    pub fn animation_key(&self) -> Option<&str> {
        self.animation.frame_set().active_key()
    }

    pub fn on_animation_loop_stop<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Sprite) + 'static,
    {
        self.on_loop_stop = Some(Box::new(hook));
    }

    /// Start or resume; negative `loops` plays forever
    pub fn play_animation(&mut self, loops: i32) -> &mut Self {
        self.animation.play(loops);
        self
    }

    /// Switch to the sequence `key` (rewinding only if it differs) and play it
    pub fn play_named(&mut self, key: &str, loops: i32) -> Result<&mut Self> {
        if self.animation.select(key)? {
            self.sync_frame();
        }
        self.animation.play(loops);
        Ok(self)
    }

    pub fn pause_animation(&mut self) -> &mut Self {
        self.animation.pause();
        self
    }

    /// Stop and show the first frame again
    pub fn stop_animation(&mut self) -> &mut Self {
        self.animation.stop();
        self.sync_frame();
        self
    }

    pub fn set_frame(&mut self, index: usize) -> Result<()> {
        self.animation.set_frame(index)?;
        self.sync_frame();
        Ok(())
    }

    fn sync_frame(&mut self) {
        if let Some(frame) = self.animation.current_frame() {
            self.source_rect = Some(frame);
            self.dirty = true;
        }
    }

    fn fire_loop_stop(&mut self) {
        if let Some(mut hook) = self.on_loop_stop.take() {
            hook(self);
            // Keep it unless the hook registered a replacement
            if self.on_loop_stop.is_none() {
                self.on_loop_stop = Some(hook);
            }
        }
    }
}

impl Drawable for Sprite {
    fn update(&mut self, delta_ms: f32) {
        match self.animation.advance(delta_ms) {
            Step::Idle => {}
            Step::Advanced => self.sync_frame(),
            Step::Finished => {
                self.sync_frame();
                self.fire_loop_stop();
            }
        }

        if self.speed != (0.0, 0.0) {
            self.pos.0 += self.speed.0 * delta_ms;
            self.pos.1 += self.speed.1 * delta_ms;
            self.dirty = true;
        }
    }

    fn image(&self) -> &Image {
        &self.source
    }

    fn area(&self) -> Option<Rect> {
        self.source_rect
    }

    fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos(), self.size())
    }

    fn visible(&self) -> bool {
        self.visible
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

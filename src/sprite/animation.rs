//! Frame animation state shared by all sprites
//!
//! A sprite plays either a single frame sequence or one sequence out of a
//! named set. Both go through the same `Animation::advance` step.

use crate::error::{Error, Result};
use crate::surface::{NamedFrames, Rect};

/// The frames an animation can show
#[derive(Debug, Clone, PartialEq)]
pub enum FrameSet {
    /// One ordered sequence
    Single(Vec<Rect>),
    /// Several sequences, one of them active
    Named { sets: NamedFrames, active: String },
}

impl FrameSet {
    /// Named set starting on its first key.
    ///
    /// Fails when the set, or any sequence in it, is empty.
    pub fn named(sets: NamedFrames) -> Result<Self> {
        if sets.iter().any(|(_, frames)| frames.is_empty()) {
            return Err(Error::EmptyFrameTable);
        }
        let active = sets.first_key().ok_or(Error::EmptyFrameTable)?.to_string();
        Ok(FrameSet::Named { sets, active })
    }

    /// Frames of the active sequence
    pub fn frames(&self) -> &[Rect] {
        match self {
            FrameSet::Single(frames) => frames.as_slice(),
            FrameSet::Named { sets, active } => sets.get(active).unwrap_or(&[]),
        }
    }

    pub fn active_key(&self) -> Option<&str> {
        match self {
            FrameSet::Single(_) => None,
            FrameSet::Named { active, .. } => Some(active),
        }
    }

    /// Every rect across every sequence
    pub fn all_frames(&self) -> Box<dyn Iterator<Item = &Rect> + '_> {
        match self {
            FrameSet::Single(frames) => Box::new(frames.iter()),
            FrameSet::Named { sets, .. } => Box::new(sets.iter().flat_map(|(_, f)| f.iter())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
    Paused,
}

/// What one `advance` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Frame unchanged
    Idle,
    /// Moved to another frame
    Advanced,
    /// Moved to another frame and used up the last loop
    Finished,
}

/// Frame index, loop counter and timing for one sprite
#[derive(Debug, Clone)]
pub struct Animation {
    frames: FrameSet,
    frame: usize,
    /// Remaining loops, negative means forever
    loops: i32,
    /// Milliseconds per frame, 0 disables animation
    interval: f32,
    state: PlayState,
    elapsed: f32,
}

impl Animation {
    pub fn new(frames: FrameSet, fps: f32) -> Self {
        Self {
            frames,
            frame: 0,
            loops: -1,
            interval: if fps > 0.0 { 1000.0 / fps } else { 0.0 },
            state: PlayState::Stopped,
            elapsed: 0.0,
        }
    }

    pub fn frame_set(&self) -> &FrameSet {
        &self.frames
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    pub fn frame_count(&self) -> usize {
        self.frames.frames().len()
    }

    pub fn current_frame(&self) -> Option<Rect> {
        self.frames.frames().get(self.frame).copied()
    }

    pub fn loops_left(&self) -> i32 {
        self.loops
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Start or resume. Negative `loops` plays forever, 0 plays nothing.
    pub fn play(&mut self, loops: i32) {
        if loops == 0 {
            return;
        }
        self.loops = loops;
        self.state = PlayState::Playing;
    }

    /// Freeze on the current frame
    pub fn pause(&mut self) {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
        }
    }

    /// Stop and rewind to the first frame
    pub fn stop(&mut self) {
        self.state = PlayState::Stopped;
        self.frame = 0;
        self.elapsed = 0.0;
    }

    /// Jump to a frame of the active sequence
    pub fn set_frame(&mut self, index: usize) -> Result<()> {
        let len = self.frame_count();
        if index >= len {
            return Err(Error::FrameIndex { index, len });
        }
        self.frame = index;
        self.elapsed = 0.0;
        Ok(())
    }

    /// Make `key` the active sequence.
    ///
    /// Returns true when the sequence changed (frame index reset to 0).
    /// Selecting the active key is a no-op; unknown keys and single-sequence
    /// sets are errors that leave the state untouched.
    pub fn select(&mut self, key: &str) -> Result<bool> {
        match &mut self.frames {
            FrameSet::Named { sets, active } => {
                if !sets.contains_key(key) {
                    return Err(Error::UnknownAnimation(key.to_string()));
                }
                if active == key {
                    return Ok(false);
                }
                *active = key.to_string();
                self.frame = 0;
                self.elapsed = 0.0;
                Ok(true)
            }
            FrameSet::Single(_) => Err(Error::UnknownAnimation(key.to_string())),
        }
    }

    /// Accumulate `delta_ms` and move to the next frame once the interval is reached
    pub fn advance(&mut self, delta_ms: f32) -> Step {
        let len = self.frame_count();
        if self.state != PlayState::Playing || self.interval <= 0.0 || len == 0 {
            return Step::Idle;
        }

        self.elapsed += delta_ms;
        if self.elapsed < self.interval {
            return Step::Idle;
        }
        self.elapsed = 0.0;

        self.frame += 1;
        if self.frame >= len {
            self.frame = 0;
            if self.loops > 0 {
                self.loops -= 1;
                if self.loops == 0 {
                    self.state = PlayState::Stopped;
                    return Step::Finished;
                }
            }
        }

        Step::Advanced
    }
}

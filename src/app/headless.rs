use std::collections::VecDeque;
use std::future::{ready, Future};

use crate::scene::{InputEvent, KeyCode, KeySet};
use crate::surface::{Image, Rect, Size};

use super::Platform;

/// Windowless platform that replays scripted input.
///
/// Each `poll_events` call consumes one scripted frame. Once the script runs
/// out it reports `Quit`, so a scene always terminates.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    size: Size,
    script: VecDeque<Vec<InputEvent>>,
    held: KeySet,
    presented: Vec<Vec<Rect>>,
}

impl HeadlessPlatform {
    pub fn new(size: Size) -> Self {
        Self { size, ..Default::default() }
    }

    pub fn with_frames(mut self, frames: Vec<Vec<InputEvent>>) -> Self {
        self.script.extend(frames);
        self
    }

    pub fn push_frame(&mut self, events: Vec<InputEvent>) {
        self.script.push_back(events);
    }

    pub fn hold(&mut self, key: KeyCode) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    /// Dirty lists in presentation order, one per frame
    pub fn presented(&self) -> &[Vec<Rect>] {
        &self.presented
    }

    pub fn frames_presented(&self) -> usize {
        self.presented.len()
    }
}

impl Platform for HeadlessPlatform {
    fn size(&self) -> Size {
        self.size
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.script.pop_front().unwrap_or_else(|| vec![InputEvent::Quit])
    }

    fn keys_held(&self) -> KeySet {
        self.held.clone()
    }

    fn present(&mut self, _screen: &Image, dirty: &[Rect]) {
        self.presented.push(dirty.to_vec());
    }

    fn next_frame(&mut self) -> impl Future<Output = ()> {
        ready(())
    }
}

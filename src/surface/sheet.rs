//! Sprite sheets: an image plus a side-car file naming its frame rectangles
//!
//! The side-car `<name>.data` is a JSON object mapping a key to a list of
//! `[x, y, w, h]` quads inside `<name>.png`:
//!
//! ```json
//! { "walk": [[0, 0, 16, 16], [16, 0, 16, 16]], "jump": [[32, 0, 16, 24]] }
//! ```

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use super::bitmap::{check_scale, load_image, Image};
use super::types::{Rect, Size};
use crate::error::{Error, Result};

/// Frame sequences keyed by name, in the order they were inserted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedFrames {
    entries: Vec<(String, Vec<Rect>)>,
}

impl NamedFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a sequence. Replacing keeps the original position.
    pub fn insert<K: Into<String>>(&mut self, key: K, frames: Vec<Rect>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = frames,
            None => self.entries.push((key, frames)),
        }
    }

    pub fn with<K: Into<String>>(mut self, key: K, frames: Vec<Rect>) -> Self {
        self.insert(key, frames);
        self
    }

    pub fn get(&self, key: &str) -> Option<&[Rect]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, frames)| frames.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The first inserted key
    pub fn first_key(&self) -> Option<&str> {
        self.entries.first().map(|(k, _)| k.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rect])> {
        self.entries.iter().map(|(k, f)| (k.as_str(), f.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fails with `FrameOutOfBounds` on the first rect not inside `size`
    pub fn check_bounds(&self, size: Size) -> Result<()> {
        self.iter()
            .flat_map(|(_, frames)| frames.iter())
            .try_for_each(|rect| check_frame(rect, size))
    }
}

/// Fails unless `rect` is non-negative and lies inside an image of `size`
pub(crate) fn check_frame(rect: &Rect, size: Size) -> Result<()> {
    let bounds = Rect::from_pos_size((0, 0), size);
    if rect.w >= 0 && rect.h >= 0 && bounds.contains_rect(rect) {
        Ok(())
    } else {
        Err(Error::FrameOutOfBounds { rect: *rect, size })
    }
}

/// A loaded sheet image and its named frames
#[derive(Debug, Clone)]
pub struct FrameSheet {
    pub source: Image,
    pub frames: NamedFrames,
}

/// Parse side-car metadata, scaling every quad by `scale` (truncating)
pub fn parse_frame_table(text: &str, scale: f32) -> Result<NamedFrames> {
    check_scale(scale)?;
    let raw: Map<String, Value> = serde_json::from_str(text)?;

    let mut frames = NamedFrames::new();
    for (key, value) in raw {
        let quads: Vec<[i32; 4]> = serde_json::from_value(value)?;
        let rects = quads.into_iter().map(|quad| Rect::from(quad).scaled(scale)).collect();
        frames.insert(key, rects);
    }

    Ok(frames)
}

/// Load `<dir>/<base_name>.data` and `<dir>/<base_name>.png`
pub fn load_frame_sheet<P: AsRef<Path>>(dir: P, base_name: &str, scale: f32) -> Result<FrameSheet> {
    let dir = dir.as_ref();
    let data_path = dir.join(format!("{}.data", base_name));
    let image_path = dir.join(format!("{}.png", base_name));

    let text = fs::read_to_string(&data_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(data_path.clone())
        } else {
            Error::Io(e)
        }
    })?;

    let frames = parse_frame_table(&text, scale)?;
    let source = load_image(&image_path, None, scale)?;
    frames.check_bounds(source.size())?;

    log::debug!(
        "Loaded frame sheet {} ({} animations, {}x{})",
        base_name,
        frames.len(),
        source.width(),
        source.height()
    );

    Ok(FrameSheet { source, frames })
}

//! Error type shared by every loader and constructor

use std::path::PathBuf;
use thiserror::Error;

use crate::surface::{Rect, Size};

#[derive(Debug, Error)]
pub enum Error {
    /// A sprite sheet, image or config file does not exist
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but is not a decodable image
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Frame sheet metadata is not a key -> [[x, y, w, h], ...] object
    #[error("malformed frame table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("malformed config: {0}")]
    Config(#[from] ron::error::SpannedError),

    #[error("scale must be greater than 0, got {0}")]
    InvalidScale(f32),

    #[error("frame table is empty")]
    EmptyFrameTable,

    #[error("unknown animation: {0:?}")]
    UnknownAnimation(String),

    #[error("frame {rect:?} lies outside a {}x{} source image", size.0, size.1)]
    FrameOutOfBounds { rect: Rect, size: Size },

    #[error("frame index {index} out of range (animation has {len} frames)")]
    FrameIndex { index: usize, len: usize },

    #[error("score needs 10 digit glyphs, got {0}")]
    MissingDigits(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

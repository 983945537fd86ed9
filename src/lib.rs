//! pixel-stage: small 2D games on a CPU-composited screen
//!
//! - Images and sprite sheets (`surface`)
//! - Animated sprites, bitmap text and scores (`sprite`)
//! - Scenes with a dirty-rectangle frame loop and input hooks (`scene`)
//! - An app shell over macroquad or a headless backend (`app`)

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod scene;
pub mod sprite;
pub mod surface;

pub use app::{App, Display, HeadlessPlatform, MacroquadPlatform, Platform};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use logging::{init_logging, LoggingConfig};
pub use scene::{
    Background, Drawable, Handle, InputEvent, KeyCode, KeyEvent, KeySet, MouseButton, MouseEvent,
    Scene,
};
pub use sprite::{
    Animation, FrameSet, GlyphMap, GlyphStyle, PlayState, Score, ScoreFormat, Sprite, Text,
};
pub use surface::{Color, Image, NamedFrames, Pos, Rect, Size};

//! Application settings read from a RON file
//!
//! ```ron
//! (
//!     title: "Bouncer",
//!     width: 320,
//!     height: 180,
//!     pixel_scale: 3,
//!     fps: 30,
//!     log_filter: Some("pixel_stage=debug"),
//! )
//! ```
//!
//! Every field is optional.

use std::fs;
use std::path::Path;

use macroquad::window::Conf;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::surface::Size;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    /// Logical screen size, before `pixel_scale`
    pub width: u32,
    pub height: u32,
    /// Window pixels per screen pixel
    pub pixel_scale: u32,
    pub fps: u32,
    /// `env_logger` filter, overrides `RUST_LOG`
    pub log_filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: String::from("pixel-stage"),
            width: 600,
            height: 300,
            pixel_scale: 1,
            fps: 24,
            log_filter: None,
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        Self::from_str(&contents)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    /// Defaults when the file is missing; a broken file is still logged
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(Error::NotFound(_)) => Self::default(),
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.as_ref().display(), e);
                Self::default()
            }
        }
    }

    pub fn size(&self) -> Size {
        (self.width, self.height)
    }

    pub fn window_conf(&self) -> Conf {
        let scale = self.pixel_scale.max(1);
        Conf {
            window_title: self.title.clone(),
            window_width: (self.width * scale) as i32,
            window_height: (self.height * scale) as i32,
            window_resizable: true,
            high_dpi: true,
            ..Default::default()
        }
    }
}

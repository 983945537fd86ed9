use crate::surface::{Color, Image, Size};

use super::Platform;

/// The screen image scenes composite into, and the platform showing it
pub struct Display<P: Platform> {
    pub(crate) screen: Image,
    pub(crate) platform: P,
}

impl<P: Platform> Display<P> {
    pub fn new(platform: P) -> Self {
        let screen = Image::new(platform.size(), Color::BLACK, None);
        Self { screen, platform }
    }

    pub fn size(&self) -> Size {
        self.screen.size()
    }

    pub fn screen(&self) -> &Image {
        &self.screen
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

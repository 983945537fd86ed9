//! Application shell
//!
//! `App` owns the display and runs one scene at a time. The display is
//! backed by a `Platform`: macroquad for real windows, `HeadlessPlatform`
//! for scripted runs.

mod display;
mod headless;
mod platform;
mod window;

pub use display::Display;
pub use headless::HeadlessPlatform;
pub use platform::Platform;
pub use window::MacroquadPlatform;

use crate::scene::Scene;
use crate::surface::{Image, Size};

pub struct App<P: Platform> {
    display: Display<P>,
    scene: Option<Scene>,
}

impl<P: Platform> App<P> {
    pub fn new(platform: P) -> Self {
        Self {
            display: Display::new(platform),
            scene: None,
        }
    }

    pub fn size(&self) -> Size {
        self.display.size()
    }

    pub fn screen(&self) -> &Image {
        self.display.screen()
    }

    pub fn display(&self) -> &Display<P> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display<P> {
        &mut self.display
    }

    /// The active scene, or the last one that ran
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn clear_scene(&mut self) {
        if let Some(mut scene) = self.scene.take() {
            scene.stop();
        }
    }

    /// Replace the current scene and run the new one to completion.
    ///
    /// If the scene stops through `Scene::switch_to`, its successor starts
    /// right away, and so on down the chain.
    pub async fn set_scene(&mut self, scene: Scene) {
        self.clear_scene();

        let mut next = Some(scene);
        while let Some(scene) = next.take() {
            let scene = self.scene.insert(scene);
            scene.start(&mut self.display).await;
            next = scene.take_next();
            if next.is_some() {
                log::info!("Switching scene");
            }
        }
    }
}

//! macroquad backend
//!
//! The screen is composited on the CPU; this only uploads the regions that
//! changed into a nearest-filtered texture and stretches it over the window.

use std::future::Future;

use image::imageops;
use macroquad::color::{BLACK, WHITE};
use macroquad::input::{
    get_keys_down, get_keys_pressed, get_keys_released, is_key_down, is_mouse_button_pressed,
    is_mouse_button_released, is_quit_requested, mouse_position, prevent_quit, KeyCode, MouseButton,
};
use macroquad::math::Vec2;
use macroquad::texture::{
    draw_texture_ex, DrawTextureParams, FilterMode, Image as MqImage, Texture2D,
};
use macroquad::window::{clear_background, next_frame, screen_height, screen_width};

use crate::scene::{InputEvent, KeyEvent, KeySet, Modifiers, MouseEvent};
use crate::surface::{Image, Pos, Rect, Size};

use super::Platform;

const BUTTONS: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

pub struct MacroquadPlatform {
    size: Size,
    texture: Option<Texture2D>,
}

impl MacroquadPlatform {
    /// Must be created inside the macroquad main future.
    ///
    /// Window close requests are turned into `InputEvent::Quit` instead of
    /// closing the window directly.
    pub fn new(size: Size) -> Self {
        prevent_quit();
        Self { size, texture: None }
    }

    fn modifiers() -> Modifiers {
        Modifiers {
            ctrl: is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl),
            shift: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
            alt: is_key_down(KeyCode::LeftAlt) || is_key_down(KeyCode::RightAlt),
        }
    }

    /// Window coordinates to screen pixels
    fn mouse_pos(&self) -> Pos {
        let (mx, my) = mouse_position();
        let sx = self.size.0 as f32 / screen_width().max(1.0);
        let sy = self.size.1 as f32 / screen_height().max(1.0);
        ((mx * sx).floor() as i32, (my * sy).floor() as i32)
    }

    fn upload(&mut self, screen: &Image, dirty: &[Rect]) {
        let pixels = screen.pixels();
        let Some(texture) = &self.texture else {
            let (w, h) = screen.size();
            let texture = Texture2D::from_rgba8(w as u16, h as u16, pixels.as_raw());
            texture.set_filter(FilterMode::Nearest);
            self.texture = Some(texture);
            return;
        };

        for area in dirty {
            let (x, y) = (area.x as u32, area.y as u32);
            let part = imageops::crop_imm(pixels, x, y, area.w as u32, area.h as u32);
            let part = MqImage {
                bytes: part.to_image().into_raw(),
                width: area.w as u16,
                height: area.h as u16,
            };
            texture.update_part(&part, area.x, area.y, area.w, area.h);
        }
    }
}

impl Platform for MacroquadPlatform {
    fn size(&self) -> Size {
        self.size
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        if is_quit_requested() {
            return vec![InputEvent::Quit];
        }

        let mods = Self::modifiers();
        let mut events = Vec::new();
        for key in get_keys_pressed() {
            events.push(InputEvent::KeyDown(KeyEvent { key, mods }));
        }
        for key in get_keys_released() {
            events.push(InputEvent::KeyUp(KeyEvent { key, mods }));
        }

        let pos = self.mouse_pos();
        for button in BUTTONS {
            if is_mouse_button_pressed(button) {
                events.push(InputEvent::MouseDown(MouseEvent { button, pos }));
            }
            if is_mouse_button_released(button) {
                events.push(InputEvent::MouseUp(MouseEvent { button, pos }));
            }
        }
        events
    }

    fn keys_held(&self) -> KeySet {
        get_keys_down()
    }

    fn present(&mut self, screen: &Image, dirty: &[Rect]) {
        self.upload(screen, dirty);

        clear_background(BLACK);
        if let Some(texture) = &self.texture {
            draw_texture_ex(
                texture,
                0.0,
                0.0,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(Vec2::new(screen_width(), screen_height())),
                    ..Default::default()
                },
            );
        }
    }

    fn next_frame(&mut self) -> impl Future<Output = ()> {
        next_frame()
    }
}

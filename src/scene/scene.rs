//! Scenes: one runnable screen of a game
//!
//! A scene owns its drawables and input hooks and runs the frame loop:
//! tick the clock, update, repaint dirty regions, present, fire the update
//! hook, then dispatch the frame's input events.

use crate::app::{Display, Platform};
use crate::surface::{Color, Image, Size};

use super::clock::FrameClock;
use super::compositor::Layer;
use super::drawable::{Drawable, Handle};
use super::input::{InputEvent, KeyEvent, KeySet, MouseEvent};

/// Frame rate used by `Scene::default`
pub const DEFAULT_SCENE_FPS: u32 = 24;

/// What is painted behind every drawable
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Image(Image),
    /// Filled to the display size when the scene starts
    Color(Color),
}

impl Default for Background {
    fn default() -> Self {
        Background::Color(Color::BLACK)
    }
}

impl From<Color> for Background {
    fn from(color: Color) -> Self {
        Background::Color(color)
    }
}

impl From<Image> for Background {
    fn from(image: Image) -> Self {
        Background::Image(image)
    }
}

pub type SceneHook = Box<dyn FnMut(&mut Scene)>;
pub type UpdateHook = Box<dyn FnMut(&mut Scene, f32)>;
pub type KeysHook = Box<dyn FnMut(&mut Scene, &KeySet, f32)>;
pub type KeyHook = Box<dyn FnMut(&mut Scene, &KeyEvent)>;
pub type MouseHook = Box<dyn FnMut(&mut Scene, &MouseEvent)>;

/// At most one handler per event kind
#[derive(Default)]
struct Hooks {
    start: Option<SceneHook>,
    update: Option<UpdateHook>,
    stop: Option<SceneHook>,
    keys_pressed: Option<KeysHook>,
    key_down: Option<KeyHook>,
    key_up: Option<KeyHook>,
    mouse_down: Option<MouseHook>,
    mouse_up: Option<MouseHook>,
}

/// Run a hook with the scene borrowed mutably.
///
/// The handler is taken out while it runs and put back unless it registered
/// a replacement for itself.
macro_rules! fire {
    ($scene:expr, $slot:ident $(, $arg:expr)*) => {
        if let Some(mut hook) = $scene.hooks.$slot.take() {
            hook(&mut *$scene $(, $arg)*);
            if $scene.hooks.$slot.is_none() {
                $scene.hooks.$slot = Some(hook);
            }
        }
    };
}

pub struct Scene {
    fps: u32,
    background: Background,
    /// `Background::Color` filled to display size
    canvas: Option<Image>,
    layer: Layer,
    hooks: Hooks,
    running: bool,
    next_id: u64,
    next_scene: Option<Box<Scene>>,
}

impl Scene {
    pub fn new<B: Into<Background>>(background: B, fps: u32) -> Self {
        Self {
            fps,
            background: background.into(),
            canvas: None,
            layer: Layer::new(),
            hooks: Hooks::default(),
            running: false,
            next_id: 0,
            next_scene: None,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps;
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Add a drawable on top of the ones already present
    pub fn append<D: Drawable>(&mut self, drawable: D) -> Handle<D> {
        let id = self.next_id;
        self.next_id += 1;
        self.layer.push(id, Box::new(drawable));
        Handle::new(id)
    }

    pub fn get<D: Drawable>(&self, handle: Handle<D>) -> Option<&D> {
        self.layer.get(handle.id)?.as_any().downcast_ref()
    }

    pub fn get_mut<D: Drawable>(&mut self, handle: Handle<D>) -> Option<&mut D> {
        self.layer.get_mut(handle.id)?.as_any_mut().downcast_mut()
    }

    /// Drop a drawable; the area it covered is repainted next frame
    pub fn remove<D: Drawable>(&mut self, handle: Handle<D>) -> bool {
        self.layer.remove(handle.id)
    }

    pub fn len(&self) -> usize {
        self.layer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layer.is_empty()
    }

    pub fn on_start<F: FnMut(&mut Scene) + 'static>(&mut self, hook: F) {
        self.hooks.start = Some(Box::new(hook));
    }

    /// Called every frame after drawing, with the frame's delta in ms
    pub fn on_update<F: FnMut(&mut Scene, f32) + 'static>(&mut self, hook: F) {
        self.hooks.update = Some(Box::new(hook));
    }

    pub fn on_stop<F: FnMut(&mut Scene) + 'static>(&mut self, hook: F) {
        self.hooks.stop = Some(Box::new(hook));
    }

    /// Called once per frame with the keys held down
    pub fn on_keys_pressed<F: FnMut(&mut Scene, &KeySet, f32) + 'static>(&mut self, hook: F) {
        self.hooks.keys_pressed = Some(Box::new(hook));
    }

    pub fn on_key_down<F: FnMut(&mut Scene, &KeyEvent) + 'static>(&mut self, hook: F) {
        self.hooks.key_down = Some(Box::new(hook));
    }

    pub fn on_key_up<F: FnMut(&mut Scene, &KeyEvent) + 'static>(&mut self, hook: F) {
        self.hooks.key_up = Some(Box::new(hook));
    }

    pub fn on_mouse_down<F: FnMut(&mut Scene, &MouseEvent) + 'static>(&mut self, hook: F) {
        self.hooks.mouse_down = Some(Box::new(hook));
    }

    pub fn on_mouse_up<F: FnMut(&mut Scene, &MouseEvent) + 'static>(&mut self, hook: F) {
        self.hooks.mouse_up = Some(Box::new(hook));
    }

    /// Ask the loop to end after the current frame.
    ///
    /// Fires the stop hook once per run; calling it on a scene that isn't
    /// running does nothing.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        fire!(self, stop);
    }

    /// Stop this scene and have the app start `next` in its place
    pub fn switch_to(&mut self, next: Scene) {
        self.next_scene = Some(Box::new(next));
        self.stop();
    }

    pub(crate) fn take_next(&mut self) -> Option<Scene> {
        self.next_scene.take().map(|next| *next)
    }

    /// Run the frame loop on `display` until the scene is stopped
    pub async fn start<P: Platform>(&mut self, display: &mut Display<P>) {
        self.prepare(display.size());
        self.running = true;
        log::debug!("Scene started ({} drawables, {} fps)", self.len(), self.fps);
        fire!(self, start);

        let mut clock = FrameClock::new();
        while self.running {
            let delta = clock.tick(self.fps);
            self.frame(display, delta);
            display.platform.next_frame().await;
        }

        log::debug!("Scene stopped after {} frames", clock.frame_index());
    }

    /// Fill a color background to `size` and schedule a full repaint
    fn prepare(&mut self, size: Size) {
        if let Background::Color(color) = self.background {
            self.canvas = Some(Image::new(size, color.opaque(), None));
        }
        self.layer.repaint_all();
    }

    /// One loop iteration without the pacing
    pub fn frame<P: Platform>(&mut self, display: &mut Display<P>, delta: f32) {
        self.layer.update(delta);

        let background = match &self.background {
            Background::Image(image) => Some(image),
            Background::Color(_) => self.canvas.as_ref(),
        };
        let dirty = self.layer.draw(&mut display.screen, background);
        display.platform.present(&display.screen, &dirty);

        fire!(self, update, delta);

        let events = display.platform.poll_events();
        let held = display.platform.keys_held();
        self.dispatch(&events, &held, delta);
    }

    fn dispatch(&mut self, events: &[InputEvent], held: &KeySet, delta: f32) {
        fire!(self, keys_pressed, held, delta);

        for event in events {
            match event {
                InputEvent::Quit => {
                    self.stop();
                    return;
                }
                InputEvent::KeyDown(key) => {
                    if key.is_interrupt() {
                        self.stop();
                        continue;
                    }
                    fire!(self, key_down, key);
                }
                InputEvent::KeyUp(key) => fire!(self, key_up, key),
                InputEvent::MouseDown(mouse) => fire!(self, mouse_down, mouse),
                InputEvent::MouseUp(mouse) => fire!(self, mouse_up, mouse),
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new(Background::default(), DEFAULT_SCENE_FPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::HeadlessPlatform;
    use crate::scene::input::{KeyCode, MouseButton};
    use crate::sprite::Sprite;
    use crate::surface::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn display(frames: Vec<Vec<InputEvent>>) -> Display<HeadlessPlatform> {
        Display::new(HeadlessPlatform::new((16, 16)).with_frames(frames))
    }

    fn log() -> (Rc<RefCell<Vec<String>>>, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (log.clone(), log)
    }

    #[test]
    fn test_color_background_fills_display() {
        let mut scene = Scene::new(Color::new(10, 20, 30), 0);
        let mut display = display(vec![vec![InputEvent::Quit]]);
        pollster::block_on(scene.start(&mut display));

        assert_eq!(display.screen().get_pixel(15, 15), Some(Color::new(10, 20, 30)));
        assert_eq!(display.platform().presented()[0], [Rect::new(0, 0, 16, 16)]);
    }

    #[test]
    fn test_image_background_smaller_than_display() {
        const GRAY: Color = Color::new(9, 9, 9);
        let mut scene = Scene::new(Image::new((8, 8), GRAY, None), 0);
        let block = Rc::new(Image::new((2, 2), Color::WHITE, None));
        let sprite = scene.append(Sprite::new(block, (1, 1)));
        scene.on_key_down(move |scene, _| {
            if let Some(sprite) = scene.get_mut(sprite) {
                sprite.set_pos((12, 12));
            }
        });

        let frames = vec![vec![InputEvent::KeyDown(KeyEvent::new(KeyCode::Space))], vec![]];
        let mut display = display(frames);
        pollster::block_on(scene.start(&mut display));

        // The old sprite area is restored from the image, the rest of the screen is black
        assert_eq!(display.screen().get_pixel(1, 1), Some(GRAY));
        assert_eq!(display.screen().get_pixel(7, 7), Some(GRAY));
        assert_eq!(display.screen().get_pixel(8, 8), Some(Color::BLACK));
        assert_eq!(display.screen().get_pixel(15, 0), Some(Color::BLACK));
        assert_eq!(display.screen().get_pixel(12, 12), Some(Color::WHITE));
    }

    #[test]
    fn test_keys_hook_sees_held_keys() {
        let (log, seen) = log();
        let mut scene = Scene::new(Color::BLACK, 0);
        scene.on_keys_pressed(move |_, keys, _| {
            log.borrow_mut().push(format!("left held: {}", keys.contains(&KeyCode::Left)));
        });

        let mut display = display(vec![vec![]]);
        display.platform_mut().hold(KeyCode::Left);
        pollster::block_on(scene.start(&mut display));

        // Once per frame, including the frame that quits
        assert_eq!(*seen.borrow(), ["left held: true", "left held: true"]);
    }

    #[test]
    fn test_quit_stops_and_skips_rest_of_frame() {
        let (log, seen) = log();
        let mut scene = Scene::default();
        scene.set_fps(0);
        scene.on_key_down(move |_, key| log.borrow_mut().push(format!("{:?}", key.key)));

        let frames = vec![vec![
            InputEvent::KeyDown(KeyEvent::new(KeyCode::A)),
            InputEvent::Quit,
            InputEvent::KeyDown(KeyEvent::new(KeyCode::B)),
        ]];
        let mut display = display(frames);
        pollster::block_on(scene.start(&mut display));

        assert!(!scene.is_running());
        assert_eq!(*seen.borrow(), ["A"]);
        assert_eq!(display.platform().frames_presented(), 1);
    }

    #[test]
    fn test_ctrl_c_preempts_key_hook() {
        let (log, seen) = log();
        let mut scene = Scene::new(Color::BLACK, 0);
        scene.on_key_down(move |_, key| log.borrow_mut().push(format!("{:?}", key.key)));

        let frames = vec![
            vec![InputEvent::KeyDown(KeyEvent::new(KeyCode::C))],
            vec![InputEvent::KeyDown(KeyEvent::with_ctrl(KeyCode::C))],
            vec![InputEvent::KeyDown(KeyEvent::new(KeyCode::D))],
        ];
        let mut display = display(frames);
        pollster::block_on(scene.start(&mut display));

        assert_eq!(*seen.borrow(), ["C"]);
        assert_eq!(display.platform().frames_presented(), 2);
    }

    #[test]
    fn test_stop_in_update_finishes_iteration() {
        let (log, seen) = log();
        let mut scene = Scene::new(Color::BLACK, 0);

        let on_update = log.clone();
        scene.on_update(move |scene, _| {
            on_update.borrow_mut().push("update".into());
            scene.stop();
        });
        let on_stop = log.clone();
        scene.on_stop(move |_| on_stop.borrow_mut().push("stop".into()));
        let on_keys = log.clone();
        scene.on_keys_pressed(move |_, _, _| on_keys.borrow_mut().push("keys".into()));
        scene.on_mouse_down(move |_, mouse| {
            log.borrow_mut().push(format!("mouse {:?}", mouse.pos));
        });

        let click = MouseEvent { button: MouseButton::Left, pos: (3, 4) };
        let mut display = display(vec![vec![InputEvent::MouseDown(click)], vec![]]);
        pollster::block_on(scene.start(&mut display));

        assert_eq!(*seen.borrow(), ["update", "stop", "keys", "mouse (3, 4)"]);
        assert_eq!(display.platform().frames_presented(), 1);
    }

    #[test]
    fn test_hooks_see_lifecycle_in_order() {
        let (log, seen) = log();
        let mut scene = Scene::new(Color::BLACK, 0);
        let on_start = log.clone();
        scene.on_start(move |_| on_start.borrow_mut().push("start".into()));
        let on_up = log.clone();
        scene.on_key_up(move |_, key| on_up.borrow_mut().push(format!("up {:?}", key.key)));
        let on_release = log.clone();
        scene.on_mouse_up(move |_, mouse| {
            on_release.borrow_mut().push(format!("release {:?}", mouse.button));
        });
        scene.on_stop(move |_| log.borrow_mut().push("stop".into()));

        let frames = vec![
            vec![InputEvent::KeyUp(KeyEvent::new(KeyCode::Space))],
            vec![InputEvent::MouseUp(MouseEvent { button: MouseButton::Right, pos: (0, 0) })],
        ];
        let mut display = display(frames);
        pollster::block_on(scene.start(&mut display));

        // The script ran out on the third frame, which quits
        assert_eq!(*seen.borrow(), ["start", "up Space", "release Right", "stop"]);
        assert_eq!(display.platform().frames_presented(), 3);
    }

    #[test]
    fn test_later_registration_replaces_hook() {
        let (log, seen) = log();
        let mut scene = Scene::new(Color::BLACK, 0);
        let first = log.clone();
        scene.on_start(move |_| first.borrow_mut().push("first".into()));
        scene.on_start(move |scene| {
            log.borrow_mut().push("second".into());
            scene.stop();
        });

        let mut display = display(vec![]);
        pollster::block_on(scene.start(&mut display));
        assert_eq!(*seen.borrow(), ["second"]);
    }

    #[test]
    fn test_hook_can_replace_itself() {
        let (log, seen) = log();
        let mut scene = Scene::new(Color::BLACK, 0);
        scene.on_update(move |scene, _| {
            let log = log.clone();
            log.borrow_mut().push("old".into());
            scene.on_update(move |scene, _| {
                log.borrow_mut().push("new".into());
                scene.stop();
            });
        });

        let mut display = display(vec![vec![], vec![], vec![]]);
        pollster::block_on(scene.start(&mut display));
        assert_eq!(*seen.borrow(), ["old", "new"]);
    }

    #[test]
    fn test_drawables_update_and_repaint() {
        let mut scene = Scene::new(Color::BLACK, 0);
        let block = Rc::new(Image::new((2, 2), Color::WHITE, None));
        let mut sprite = Sprite::new(block, (0, 0));
        sprite.set_speed(0.0, 0.0);
        let handle = scene.append(sprite);

        scene.on_key_down(move |scene, _| {
            if let Some(sprite) = scene.get_mut(handle) {
                sprite.set_pos((10, 10));
            }
        });

        let frames = vec![vec![InputEvent::KeyDown(KeyEvent::new(KeyCode::Right))], vec![]];
        let mut display = display(frames);
        pollster::block_on(scene.start(&mut display));

        let presented = display.platform().presented();
        assert_eq!(presented[0], [Rect::new(0, 0, 16, 16)]);
        assert_eq!(presented[1].len(), 2);
        assert_eq!(display.screen().get_pixel(0, 0), Some(Color::BLACK));
        assert_eq!(display.screen().get_pixel(11, 11), Some(Color::WHITE));
        assert_eq!(scene.get(handle).map(|s| s.pos()), Some((10, 10)));
    }

    #[test]
    fn test_remove_and_handles() {
        let mut scene = Scene::default();
        let image = Rc::new(Image::new((1, 1), Color::WHITE, None));
        let a = scene.append(Sprite::new(image.clone(), (0, 0)));
        let b = scene.append(Sprite::new(image, (1, 1)));
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);

        assert!(scene.remove(a));
        assert!(scene.get(a).is_none());
        assert!(scene.get(b).is_some());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_stop_before_start_is_silent() {
        let (log, seen) = log();
        let mut scene = Scene::default();
        scene.on_stop(move |_| log.borrow_mut().push("stop".into()));
        scene.stop();
        assert!(seen.borrow().is_empty());
    }
}

//! pixel-stage demo
//!
//! A title screen with bitmap text; Space starts a bouncing ball whose score
//! goes up on every click. Escape or closing the window quits.
//! Settings come from `pixel_stage.ron` when present.

use std::rc::Rc;

use macroquad::window::Conf;
use pixel_stage::sprite::glyphs_from_frames;
use pixel_stage::{
    init_logging, App, AppConfig, Color, GlyphStyle, Image, KeyCode, LoggingConfig,
    MacroquadPlatform, NamedFrames, Rect, Result, Scene, Score, ScoreFormat, Size, Sprite, Text,
    VERSION,
};

const CONFIG_PATH: &str = "pixel_stage.ron";

/// 3x5 glyphs, one row of three bits per line
const FONT: [(char, [u8; 5]); 17] = [
    ('0', [0b111, 0b101, 0b101, 0b101, 0b111]),
    ('1', [0b010, 0b110, 0b010, 0b010, 0b111]),
    ('2', [0b111, 0b001, 0b111, 0b100, 0b111]),
    ('3', [0b111, 0b001, 0b111, 0b001, 0b111]),
    ('4', [0b101, 0b101, 0b111, 0b001, 0b001]),
    ('5', [0b111, 0b100, 0b111, 0b001, 0b111]),
    ('6', [0b111, 0b100, 0b111, 0b101, 0b111]),
    ('7', [0b111, 0b001, 0b001, 0b001, 0b001]),
    ('8', [0b111, 0b101, 0b111, 0b101, 0b111]),
    ('9', [0b111, 0b101, 0b111, 0b001, 0b111]),
    ('A', [0b010, 0b101, 0b111, 0b101, 0b101]),
    ('C', [0b111, 0b100, 0b100, 0b100, 0b111]),
    ('E', [0b111, 0b100, 0b111, 0b100, 0b111]),
    ('O', [0b111, 0b101, 0b101, 0b101, 0b111]),
    ('P', [0b111, 0b101, 0b111, 0b100, 0b100]),
    ('R', [0b110, 0b101, 0b110, 0b101, 0b101]),
    ('S', [0b111, 0b100, 0b111, 0b001, 0b111]),
];

/// Glyph cell, one column wider than the glyph for letter spacing
const CELL: (i32, i32) = (4, 5);
const BALL: i32 = 12;

/// Shared images, generated at startup
#[derive(Clone)]
struct Assets {
    font: Rc<Image>,
    font_frames: NamedFrames,
    ball: Rc<Image>,
    ball_frames: NamedFrames,
}

impl Assets {
    fn generate() -> Self {
        let font_size = ((FONT.len() as i32 * CELL.0) as u32, CELL.1 as u32);
        let mut font = Image::new(font_size, Color::TRANSPARENT, None);
        let mut font_frames = NamedFrames::new();
        for (i, (ch, rows)) in FONT.iter().enumerate() {
            let x0 = i as i32 * CELL.0;
            for (y, row) in rows.iter().enumerate() {
                for x in 0..3 {
                    if row & (0b100 >> x) != 0 {
                        font.fill_rect(Rect::new(x0 + x, y as i32, 1, 1), Color::WHITE);
                    }
                }
            }
            font_frames.insert(ch.to_string(), vec![Rect::new(x0, 0, CELL.0, CELL.1)]);
        }

        // Four spin frames then two flash frames, keyed out on magenta
        let ball_size = ((BALL * 6) as u32, BALL as u32);
        let mut ball = Image::new(ball_size, Color::MAGENTA, Some(Color::MAGENTA));
        let shades = [
            Color::new(230, 80, 60),
            Color::new(240, 140, 60),
            Color::new(250, 200, 70),
            Color::new(240, 140, 60),
            Color::WHITE,
            Color::new(120, 200, 255),
        ];
        for (i, shade) in shades.iter().enumerate() {
            let x0 = i as i32 * BALL;
            ball.fill_rect(Rect::new(x0 + 2, 0, BALL - 4, BALL), *shade);
            ball.fill_rect(Rect::new(x0, 2, BALL, BALL - 4), *shade);
        }
        let frame = |i: i32| Rect::new(i * BALL, 0, BALL, BALL);
        let ball_frames = NamedFrames::new()
            .with("spin", (0..4).map(frame).collect())
            .with("flash", (4..6).map(frame).collect());

        Self {
            font: Rc::new(font),
            font_frames,
            ball: Rc::new(ball),
            ball_frames,
        }
    }

    fn text(&self, pos: (i32, i32), text: &str, scale: f32) -> Result<Text> {
        let style = GlyphStyle {
            space_width: CELL.0 as u32,
            scale,
            ..Default::default()
        };
        Text::new(self.font.clone(), glyphs_from_frames(&self.font_frames), pos, text, style)
    }

    fn digits(&self) -> Vec<Rect> {
        ('0'..='9')
            .filter_map(|d| self.font_frames.get(&d.to_string()).and_then(|f| f.first().copied()))
            .collect()
    }
}

fn title_scene(config: &AppConfig, assets: Assets) -> Result<Scene> {
    let size = config.size();
    let mut scene = Scene::new(Color::new(20, 24, 40), config.fps);

    // Text positions are in unscaled pixels
    let scale = 3;
    let label = "PRESS SPACE";
    let cols = size.0 as i32 / scale;
    let rows = size.1 as i32 / scale;
    let pos = ((cols - label.len() as i32 * CELL.0) / 2, (rows - CELL.1) / 2);
    scene.append(assets.text(pos, label, scale as f32)?);

    let fps = config.fps;
    scene.on_key_down(move |scene, key| match key.key {
        KeyCode::Space => match game_scene(size, fps, &assets) {
            Ok(game) => scene.switch_to(game),
            Err(e) => {
                log::error!("Failed to build game scene: {}", e);
                scene.stop();
            }
        },
        KeyCode::Escape => scene.stop(),
        _ => {}
    });
    Ok(scene)
}

fn game_scene(size: Size, fps: u32, assets: &Assets) -> Result<Scene> {
    let (width, height) = (size.0 as i32, size.1 as i32);
    let mut scene = Scene::new(Color::new(16, 16, 16), fps);

    scene.append(assets.text((2, 2), "SCORE", 2.0)?);
    let score_style = GlyphStyle { scale: 2.0, ..Default::default() };
    let score_format = ScoreFormat { digits: 4, leading_zeros: true };
    let digits = assets.digits();
    let score = Score::new(assets.font.clone(), &digits, (24, 2), 0, score_format, score_style)?;
    let score = scene.append(score);

    let start = (width / 2, height / 2);
    let frames = assets.ball_frames.clone();
    let mut ball = Sprite::with_animations(assets.ball.clone(), start, frames, 10.0)?;
    ball.set_speed(0.12, 0.09);
    ball.play_animation(-1);
    ball.on_animation_loop_stop(|ball| {
        if let Err(e) = ball.play_named("spin", -1) {
            log::warn!("{}", e);
        }
    });
    let ball = scene.append(ball);

    scene.on_update(move |scene, _| {
        let Some(ball) = scene.get_mut(ball) else {
            return;
        };
        let (x, y) = ball.pos();
        let (w, h) = ball.size();
        let (mut vx, mut vy) = ball.speed();
        if (x <= 0 && vx < 0.0) || (x + w as i32 >= width && vx > 0.0) {
            vx = -vx;
        }
        if (y <= 0 && vy < 0.0) || (y + h as i32 >= height && vy > 0.0) {
            vy = -vy;
        }
        ball.set_speed(vx, vy);
    });

    scene.on_keys_pressed(move |scene, keys, delta| {
        let Some(ball) = scene.get_mut(ball) else {
            return;
        };
        let (mut vx, vy) = ball.speed();
        let nudge = 0.0005 * delta;
        if keys.contains(&KeyCode::Left) {
            vx -= nudge;
        }
        if keys.contains(&KeyCode::Right) {
            vx += nudge;
        }
        ball.set_speed(vx, vy);
    });

    scene.on_mouse_down(move |scene, _| {
        if let Some(score) = scene.get_mut(score) {
            score.add(1);
        }
        if let Some(ball) = scene.get_mut(ball) {
            if let Err(e) = ball.play_named("flash", 2) {
                log::warn!("{}", e);
            }
        }
    });

    scene.on_key_down(|scene, key| {
        if key.key == KeyCode::Escape {
            scene.stop();
        }
    });
    scene.on_stop(move |scene| {
        let points = scene.get(score).map_or(0, |s| s.value());
        log::info!("Game over with {} points", points);
    });

    Ok(scene)
}

fn window_conf() -> Conf {
    AppConfig::load_or_default(CONFIG_PATH).window_conf()
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = AppConfig::load_or_default(CONFIG_PATH);
    init_logging(LoggingConfig::with_filter(config.log_filter.clone()));
    log::info!("=== pixel-stage v{} ===", VERSION);

    let title = match title_scene(&config, Assets::generate()) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Failed to build title scene: {}", e);
            return;
        }
    };

    let mut app = App::new(MacroquadPlatform::new(config.size()));
    app.set_scene(title).await;
}

//! Dirty-rectangle compositing
//!
//! Only regions that changed since the last pass are repainted: the
//! background is restored there, then every drawable overlapping the region
//! is painted again in insertion order.

use crate::surface::{Color, Image, Rect};

use super::drawable::Drawable;

struct Entry {
    id: u64,
    drawable: Box<dyn Drawable>,
    /// Where it was last painted, to be cleared when it moves or goes away
    painted: Option<Rect>,
}

/// Paint-ordered drawables plus the regions waiting to be repainted
#[derive(Default)]
pub struct Layer {
    entries: Vec<Entry>,
    /// Areas freed by removed drawables
    pending: Vec<Rect>,
    full_repaint: bool,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: u64, drawable: Box<dyn Drawable>) {
        self.entries.push(Entry { id, drawable, painted: None });
    }

    pub fn get(&self, id: u64) -> Option<&dyn Drawable> {
        let entry = self.entries.iter().find(|e| e.id == id)?;
        Some(entry.drawable.as_ref())
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut dyn Drawable> {
        let entry = self.entries.iter_mut().find(|e| e.id == id)?;
        Some(entry.drawable.as_mut())
    }

    /// Drop a drawable; its last painted area is repainted on the next pass
    pub fn remove(&mut self, id: u64) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        let entry = self.entries.remove(index);
        self.pending.extend(entry.painted);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Repaint the whole screen on the next pass
    pub fn repaint_all(&mut self) {
        self.full_repaint = true;
    }

    pub fn update(&mut self, delta_ms: f32) {
        for entry in &mut self.entries {
            entry.drawable.update(delta_ms);
        }
    }

    /// Repaint changed regions of `screen` and return them.
    ///
    /// Without a background the regions are cleared to black.
    pub fn draw(&mut self, screen: &mut Image, background: Option<&Image>) -> Vec<Rect> {
        let bounds = screen.rect();
        let mut areas = std::mem::take(&mut self.pending);

        if std::mem::take(&mut self.full_repaint) {
            areas = vec![bounds];
        } else {
            for entry in &self.entries {
                if entry.drawable.is_dirty() {
                    areas.extend(entry.painted);
                    if entry.drawable.visible() {
                        areas.push(entry.drawable.rect());
                    }
                }
            }
        }

        let areas = merge(areas.iter().filter_map(|a| a.intersect(&bounds)));

        for area in &areas {
            match background {
                Some(bg) if bg.rect().contains_rect(area) => screen.copy_from(bg, *area),
                Some(bg) => {
                    screen.fill_rect(*area, Color::BLACK);
                    screen.copy_from(bg, *area);
                }
                None => screen.fill_rect(*area, Color::BLACK),
            }

            for entry in &self.entries {
                let drawable = &entry.drawable;
                if !drawable.visible() {
                    continue;
                }
                let rect = drawable.rect();
                let Some(clip) = rect.intersect(area) else {
                    continue;
                };
                let src = drawable.area().unwrap_or_else(|| drawable.image().rect());
                let part = Rect::new(
                    src.x + clip.x - rect.x,
                    src.y + clip.y - rect.y,
                    clip.w,
                    clip.h,
                );
                screen.blit(drawable.image(), clip.pos(), Some(part));
            }
        }

        for entry in &mut self.entries {
            entry.painted = entry.drawable.visible().then(|| entry.drawable.rect());
            entry.drawable.mark_clean();
        }

        areas
    }
}

/// Fold overlapping rects together so no pixel is composited twice
fn merge(areas: impl IntoIterator<Item = Rect>) -> Vec<Rect> {
    let mut merged: Vec<Rect> = Vec::new();
    for mut area in areas {
        while let Some(i) = merged.iter().position(|r| r.intersect(&area).is_some()) {
            area = area.union(&merged.swap_remove(i));
        }
        merged.push(area);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::Sprite;
    use std::rc::Rc;

    const RED: Color = Color::new(255, 0, 0);
    const GRAY: Color = Color::new(40, 40, 40);

    fn block(pos: (i32, i32)) -> Box<Sprite> {
        Box::new(Sprite::new(Rc::new(Image::new((2, 2), RED, None)), pos))
    }

    #[test]
    fn test_merge_overlapping() {
        let merged = merge([Rect::new(0, 0, 4, 4), Rect::new(10, 10, 2, 2), Rect::new(2, 2, 4, 4)]);
        assert_eq!(merged.len(), 2);
        assert!(merged.contains(&Rect::new(0, 0, 6, 6)));
        assert!(merged.contains(&Rect::new(10, 10, 2, 2)));
    }

    #[test]
    fn test_full_repaint_then_nothing() {
        let background = Image::new((8, 8), GRAY, None);
        let mut screen = Image::new((8, 8), Color::BLACK, None);
        let mut layer = Layer::new();
        layer.push(0, block((1, 1)));
        layer.repaint_all();

        assert_eq!(layer.draw(&mut screen, Some(&background)), [Rect::new(0, 0, 8, 8)]);
        assert_eq!(screen.get_pixel(0, 0), Some(GRAY));
        assert_eq!(screen.get_pixel(2, 2), Some(RED));

        // Nothing changed since
        assert!(layer.draw(&mut screen, Some(&background)).is_empty());
    }

    #[test]
    fn test_moving_sprite_repaints_old_and_new_area() {
        let background = Image::new((8, 8), GRAY, None);
        let mut screen = Image::new((8, 8), Color::BLACK, None);
        let mut layer = Layer::new();
        layer.push(7, block((0, 0)));
        layer.draw(&mut screen, Some(&background));

        let sprite = layer.get_mut(7).unwrap().as_any_mut().downcast_mut::<Sprite>().unwrap();
        sprite.set_pos((5, 5));
        let areas = layer.draw(&mut screen, Some(&background));

        assert_eq!(areas.len(), 2);
        assert!(areas.contains(&Rect::new(0, 0, 2, 2)));
        assert!(areas.contains(&Rect::new(5, 5, 2, 2)));
        assert_eq!(screen.get_pixel(0, 0), Some(GRAY));
        assert_eq!(screen.get_pixel(6, 6), Some(RED));
    }

    #[test]
    fn test_overlapping_sprites_keep_paint_order() {
        let background = Image::new((8, 8), GRAY, None);
        let mut screen = Image::new((8, 8), Color::BLACK, None);
        let mut layer = Layer::new();
        layer.push(0, block((0, 0)));
        let blue = Sprite::new(Rc::new(Image::new((2, 2), Color::new(0, 0, 255), None)), (1, 1));
        layer.push(1, Box::new(blue));
        layer.draw(&mut screen, Some(&background));

        // Only the bottom sprite changes, the top one must still win the overlap
        let red = layer.get_mut(0).unwrap().as_any_mut().downcast_mut::<Sprite>().unwrap();
        red.move_by(0, 0);
        layer.draw(&mut screen, Some(&background));

        assert_eq!(screen.get_pixel(0, 0), Some(RED));
        assert_eq!(screen.get_pixel(1, 1), Some(Color::new(0, 0, 255)));
    }

    #[test]
    fn test_remove_clears_area() {
        let background = Image::new((8, 8), GRAY, None);
        let mut screen = Image::new((8, 8), Color::BLACK, None);
        let mut layer = Layer::new();
        layer.push(3, block((4, 4)));
        layer.draw(&mut screen, Some(&background));
        assert_eq!(screen.get_pixel(4, 4), Some(RED));

        assert!(layer.remove(3));
        assert!(!layer.remove(3));
        assert_eq!(layer.draw(&mut screen, Some(&background)), [Rect::new(4, 4, 2, 2)]);
        assert_eq!(screen.get_pixel(4, 4), Some(GRAY));
    }

    #[test]
    fn test_offscreen_sprite_produces_no_area() {
        let mut screen = Image::new((4, 4), Color::BLACK, None);
        let mut layer = Layer::new();
        layer.push(0, block((20, 20)));
        assert!(layer.draw(&mut screen, None).is_empty());
    }
}

//! The contract between a scene and the things it paints

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::surface::{Image, Rect};

/// Anything a scene can own, update and paint
pub trait Drawable: Any {
    /// Advance by `delta_ms` milliseconds
    fn update(&mut self, delta_ms: f32);

    /// Pixels to draw from
    fn image(&self) -> &Image;

    /// Region of `image()` to show, the whole image when `None`
    fn area(&self) -> Option<Rect> {
        None
    }

    /// Screen placement
    fn rect(&self) -> Rect;

    fn visible(&self) -> bool {
        true
    }

    /// Changed since it was last painted
    fn is_dirty(&self) -> bool;

    fn mark_clean(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Typed reference to a drawable owned by a scene
pub struct Handle<D> {
    pub(crate) id: u64,
    _marker: PhantomData<fn() -> D>,
}

impl<D> Handle<D> {
    pub(crate) fn new(id: u64) -> Self {
        Self { id, _marker: PhantomData }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl<D> fmt::Debug for Handle<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.id).finish()
    }
}

impl<D> Clone for Handle<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Handle<D> {}

impl<D> PartialEq for Handle<D> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<D> Eq for Handle<D> {}

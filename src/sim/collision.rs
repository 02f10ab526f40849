//! Axis-aligned collision primitives
//!
//! Everything in this sim is an upright rectangle, so collision detection is
//! a single separating-axis test over AABBs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle. `pos` is the top-left corner; y grows downward,
/// so `top()` is the smallest y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Strict axis-aligned overlap test.
///
/// Pure and symmetric. Rectangles that merely touch (equal boundary values on
/// an axis) do not intersect; the overlap must be strictly positive on both
/// axes.
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    !(b.left() >= a.right()
        || b.right() <= a.left()
        || b.top() >= a.bottom()
        || b.bottom() <= a.top())
}

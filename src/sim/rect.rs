//! Integer pixel rectangles
//!
//! Every body in the arena (fighters, lasers, medkits, attack hitboxes) is an
//! axis-aligned box on the pixel grid. Centers use floor division of the size
//! so odd-sized boxes anchor the same way every time.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle: top-left origin plus size, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: IVec2,
    pub size: IVec2,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            origin: IVec2::new(x, y),
            size: IVec2::new(w, h),
        }
    }

    /// Rectangle whose bottom edge is centered on `(x, bottom)`
    pub fn from_midbottom(x: i32, bottom: i32, size: IVec2) -> Self {
        Self {
            origin: IVec2::new(x - size.x / 2, bottom - size.y),
            size,
        }
    }

    /// Rectangle whose top edge is centered on `(x, top)`
    pub fn from_midtop(x: i32, top: i32, size: IVec2) -> Self {
        Self {
            origin: IVec2::new(x - size.x / 2, top),
            size,
        }
    }

    /// Rectangle centered on `center`
    pub fn from_center(center: IVec2, size: IVec2) -> Self {
        Self {
            origin: center - size / 2,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.origin.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.origin.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.origin.y + self.size.y
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.size.y
    }

    #[inline]
    pub fn center_x(&self) -> i32 {
        self.origin.x + self.size.x / 2
    }

    #[inline]
    pub fn center_y(&self) -> i32 {
        self.origin.y + self.size.y / 2
    }

    /// Move the rectangle so its bottom edge sits at `bottom`
    pub fn set_bottom(&mut self, bottom: i32) {
        self.origin.y = bottom - self.size.y;
    }

    /// Move the rectangle so its bottom-center sits at `(x, bottom)`
    pub fn set_midbottom(&mut self, x: i32, bottom: i32) {
        *self = Self::from_midbottom(x, bottom, self.size);
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }

    /// Strict overlap test: shared edges don't count, empty boxes never hit
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

//! Lasers: straight-line projectiles with a damage payload
//!
//! A laser is passive data. It moves and ages on its own, but hit detection
//! against fighters happens in the collision pass.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::settings::Settings;

/// A laser bolt in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub rect: Rect,
    /// Horizontal speed in px/tick (sign is direction)
    pub vx: i32,
    pub spawn_ms: u64,
    pub lifetime_ms: u64,
    pub damage: i32,
}

impl Projectile {
    /// Spawn a laser centered on `center`, travelling in `dir` (+1 right, -1 left)
    pub fn laser(center: IVec2, dir: i32, now: u64, damage: i32, settings: &Settings) -> Self {
        Self {
            rect: Rect::from_center(center, settings.laser_size()),
            vx: settings.laser_speed * dir,
            spawn_ms: now,
            lifetime_ms: settings.laser_lifetime,
            damage,
        }
    }

    /// True once the laser has outlived its lifetime
    pub fn expired(&self, now: u64) -> bool {
        now.saturating_sub(self.spawn_ms) > self.lifetime_ms
    }

    /// True once the laser has fully left the arena horizontally
    pub fn off_screen(&self, arena_width: i32) -> bool {
        self.rect.right() < 0 || self.rect.left() > arena_width
    }

    /// Advance one tick. Returns false when the laser should be removed.
    pub fn update(&mut self, now: u64, arena_width: i32) -> bool {
        self.rect.origin.x += self.vx;
        !(self.expired(now) || self.off_screen(arena_width))
    }
}

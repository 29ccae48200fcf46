//! Medkits: falling heal pickups and their spawn timer

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::settings::Settings;

/// Delay before the first medkit of a match
pub const FIRST_SPAWN_DELAY_MS: RangeInclusive<u64> = 5000..=15000;

/// Delay between later medkits
pub const SPAWN_DELAY_MS: RangeInclusive<u64> = 8000..=15000;

/// Medkits never spawn closer than this to the side walls
pub const SPAWN_MARGIN: i32 = 40;

/// Top edge of a freshly spawned medkit (just above the arena)
pub const SPAWN_TOP: i32 = -10;

/// A falling medkit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub rect: Rect,
    pub vy: f32,
    pub heal: i32,
}

impl Pickup {
    pub fn medkit(x: i32, settings: &Settings) -> Self {
        Self {
            rect: Rect::from_midtop(x, SPAWN_TOP, settings.medkit_size()),
            vy: 0.0,
            heal: settings.medkit_heal,
        }
    }

    /// Fall one tick at reduced gravity. Returns false once below the arena.
    pub fn update(&mut self, settings: &Settings) -> bool {
        self.vy += settings.gravity * settings.medkit_fall_multiplier;
        self.rect.origin.y += self.vy as i32;
        self.rect.top() <= settings.arena_height
    }
}

/// Randomized medkit spawn schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub last_spawn_ms: u64,
    pub next_delay_ms: u64,
}

impl SpawnTimer {
    pub fn new<R: Rng + ?Sized>(now: u64, rng: &mut R) -> Self {
        Self {
            last_spawn_ms: now,
            next_delay_ms: rng.random_range(FIRST_SPAWN_DELAY_MS),
        }
    }

    /// Spawn a medkit if the timer has elapsed, re-arming it
    pub fn poll<R: Rng + ?Sized>(
        &mut self,
        now: u64,
        settings: &Settings,
        rng: &mut R,
    ) -> Option<Pickup> {
        if now.saturating_sub(self.last_spawn_ms) <= self.next_delay_ms {
            return None;
        }
        self.last_spawn_ms = now;
        self.next_delay_ms = rng.random_range(SPAWN_DELAY_MS);

        let max_x = settings.arena_width - SPAWN_MARGIN;
        let x = if max_x > SPAWN_MARGIN {
            rng.random_range(SPAWN_MARGIN..=max_x)
        } else {
            settings.arena_width / 2
        };
        log::debug!("Medkit dropped at x={x}");
        Some(Pickup::medkit(x, settings))
    }
}

//! Opponent decision policy
//!
//! Deliberately simple: walk toward the player until close, swing on a
//! randomized timer, and take occasional potshots when holding a gun. Every
//! draw comes from the caller's RNG so a seeded match replays identically.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::AttackKind;
use super::weapon::WeaponKind;
use crate::settings::Settings;

/// Delay before the first decision
pub const INITIAL_DECISION_DELAY_MS: RangeInclusive<u64> = 600..=1400;

/// Delay between later decisions, re-rolled after every decision
pub const DECISION_DELAY_MS: RangeInclusive<u64> = 700..=1600;

/// Weapons the opponent may spawn with; `None` appears twice on purpose
pub const WEAPON_POOL: [Option<WeaponKind>; 5] = [
    None,
    Some(WeaponKind::Gun),
    Some(WeaponKind::Katana),
    Some(WeaponKind::Flail),
    None,
];

const ATTACK_CHOICES: [AttackKind; 2] = [AttackKind::Punch, AttackKind::Kick];

/// Attack timer state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentBrain {
    pub last_decision_ms: u64,
    pub next_delay_ms: u64,
}

impl OpponentBrain {
    pub fn new<R: Rng + ?Sized>(now: u64, rng: &mut R) -> Self {
        Self {
            last_decision_ms: now,
            next_delay_ms: rng.random_range(INITIAL_DECISION_DELAY_MS),
        }
    }

    /// Tick the attack timer. Returns the attack to start, if any.
    pub fn decide<R: Rng + ?Sized>(
        &mut self,
        now: u64,
        attack_chance: f64,
        rng: &mut R,
    ) -> Option<AttackKind> {
        if now.saturating_sub(self.last_decision_ms) <= self.next_delay_ms {
            return None;
        }
        self.last_decision_ms = now;
        self.next_delay_ms = rng.random_range(DECISION_DELAY_MS);

        if rng.random::<f64>() < attack_chance {
            Some(ATTACK_CHOICES[rng.random_range(0..ATTACK_CHOICES.len())])
        } else {
            None
        }
    }
}

/// Horizontal velocity that closes in on `target_x`, or 0 once within `stop_distance`
pub fn approach_velocity(own_x: i32, target_x: i32, speed: i32, stop_distance: i32) -> i32 {
    if (own_x - target_x).abs() <= stop_distance {
        0
    } else if target_x > own_x {
        speed
    } else {
        -speed
    }
}

/// Per-tick Bernoulli trial for a ranged shot; only rolls when in range
pub fn wants_to_fire<R: Rng + ?Sized>(distance: i32, settings: &Settings, rng: &mut R) -> bool {
    distance < settings.ranged_range && rng.random::<f64>() < settings.fire_chance
}

/// Pick the opponent's starting weapon
pub fn roll_weapon<R: Rng + ?Sized>(rng: &mut R) -> Option<WeaponKind> {
    WEAPON_POOL[rng.random_range(0..WEAPON_POOL.len())]
}

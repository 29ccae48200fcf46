//! Weapon catalog
//!
//! Weapons are immutable catalog entries. Fighters hold a `WeaponKind` tag and
//! look the stats up here, so any number of fighters can share one definition.

use serde::{Deserialize, Serialize};

use super::actor::{AttackKind, Fighter};
use super::projectile::Projectile;
use crate::settings::Settings;

/// Duration of the Midnight Blade's special swing
pub const MIDNIGHT_DURATION_MS: u64 = 320;

/// Vertical offsets of the Gun's twin lasers from the shooter's center line
pub const GUN_BARREL_OFFSETS: [i32; 2] = [-6, 6];

/// Horizontal gap between the shooter's edge and a freshly spawned laser
pub const MUZZLE_GAP: i32 = 6;

/// Every weapon that can be equipped (fists are the absence of one)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Gun,
    Katana,
    Flail,
    MidnightBlade,
}

/// Static stats for one weapon
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponStats {
    pub name: &'static str,
    pub price: u32,
    /// Added to the base damage of every melee hit
    pub melee_bonus: i32,
    pub cooldown_ms: u64,
    pub ranged: bool,
    /// Melee hitbox width while equipped, in percent of the unarmed width
    pub width_percent: i32,
}

const GUN: WeaponStats = WeaponStats {
    name: "Gun",
    price: 100,
    melee_bonus: 0,
    cooldown_ms: 600,
    ranged: true,
    width_percent: 100,
};

const KATANA: WeaponStats = WeaponStats {
    name: "Katana",
    price: 120,
    melee_bonus: 18,
    cooldown_ms: 200,
    ranged: false,
    width_percent: 130,
};

const FLAIL: WeaponStats = WeaponStats {
    name: "Flail",
    price: 140,
    melee_bonus: 10,
    cooldown_ms: 400,
    ranged: false,
    width_percent: 150,
};

const MIDNIGHT_BLADE: WeaponStats = WeaponStats {
    name: "Midnight Blade",
    price: 300,
    melee_bonus: 45,
    cooldown_ms: 250,
    ranged: false,
    width_percent: 140,
};

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Gun,
        WeaponKind::Katana,
        WeaponKind::Flail,
        WeaponKind::MidnightBlade,
    ];

    pub fn stats(self) -> &'static WeaponStats {
        match self {
            WeaponKind::Gun => &GUN,
            WeaponKind::Katana => &KATANA,
            WeaponKind::Flail => &FLAIL,
            WeaponKind::MidnightBlade => &MIDNIGHT_BLADE,
        }
    }

    pub fn name(self) -> &'static str {
        self.stats().name
    }

    pub fn is_ranged(self) -> bool {
        self.stats().ranged
    }

    /// Whether the primary attack triggers this weapon instead of a punch
    pub fn has_activation(self) -> bool {
        match self {
            WeaponKind::Gun | WeaponKind::MidnightBlade => true,
            WeaponKind::Katana | WeaponKind::Flail => false,
        }
    }

    /// Melee damage of a hit whose unarmed base is `base`
    pub fn melee_damage(self, base: i32) -> i32 {
        base + self.stats().melee_bonus
    }

    /// Trigger the weapon's special behavior.
    ///
    /// Returns true when the activation went off. Spawned lasers are pushed
    /// onto `spawned`; the caller owns them from there.
    pub fn activate(
        self,
        user: &mut Fighter,
        now: u64,
        settings: &Settings,
        spawned: &mut Vec<Projectile>,
    ) -> bool {
        if !self.has_activation() || !user.weapon_ready(self.stats().cooldown_ms, now) {
            return false;
        }

        match self {
            WeaponKind::Gun => {
                let dir = user.facing.sign();
                for dy in GUN_BARREL_OFFSETS {
                    let muzzle = user.muzzle(dy);
                    spawned.push(Projectile::laser(muzzle, dir, now, settings.laser_damage, settings));
                }
            }
            WeaponKind::MidnightBlade => {
                user.start_attack(AttackKind::Midnight, now, MIDNIGHT_DURATION_MS);
            }
            WeaponKind::Katana | WeaponKind::Flail => return false,
        }

        user.last_weapon_ms = Some(now);
        log::debug!("{} activated at {now}ms", self.name());
        true
    }
}

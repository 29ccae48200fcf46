//! Game tuning and configuration
//!
//! A flat key/value record loaded once at startup. Every key has a hard-coded
//! default, and a bad value only costs that one key, never the whole file.
//! Values of the right type but outside their allowed range count as bad.

use std::fmt::Debug;
use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors surfaced while reading a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not a JSON object: {0}")]
    Parse(String),
}

/// Upper bound for every duration, cooldown and hit window
pub const MAX_DURATION_MS: u64 = 600_000;

/// Upper bound for health, damage and heal amounts
pub const MAX_HEALTH: i32 = 1_000_000;

/// Upper bound for arena dimensions and distances
pub const MAX_EXTENT: i32 = 100_000;

/// Upper bound for any single coin award
pub const MAX_COIN_AWARD: u64 = 1_000_000;

/// Simulation tuning (all timings in ms, all distances in px, speeds in px/tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: i32,
    pub arena_height: i32,
    /// Distance from the bottom of the arena to the floor line
    pub ground_offset: i32,

    // === Fighters ===
    pub actor_width: i32,
    pub actor_height: i32,
    pub max_health: i32,
    /// Spawn distance from the left (player) and right (opponent) walls
    pub spawn_inset: i32,
    /// Gravity added to vertical velocity every tick
    pub gravity: f32,
    pub player_speed: i32,
    pub opponent_speed: i32,
    pub jump_velocity: f32,

    // === Player attacks ===
    pub punch_cooldown: u64,
    pub punch_duration: u64,
    pub kick_cooldown: u64,
    pub kick_duration: u64,
    /// Time since the player's last attack start during which a hitbox still lands
    pub melee_hit_window: u64,
    pub skill_cooldown: u64,

    // === Opponent ===
    pub opponent_attack_duration: u64,
    /// Time after the opponent's swing starts during which it can land
    pub opponent_hit_window: u64,
    pub approach_distance: i32,
    pub attack_chance: f64,
    pub ranged_range: i32,
    pub fire_chance: f64,

    // === Lasers ===
    pub laser_damage: i32,
    pub laser_speed: i32,
    pub laser_lifetime: u64,
    pub laser_width: i32,
    pub laser_height: i32,

    // === Medkits ===
    pub medkit_heal: i32,
    pub medkit_fall_multiplier: f32,
    pub medkit_width: i32,
    pub medkit_height: i32,

    // === Economy ===
    pub coins_per_melee_hit: u64,
    pub coins_per_laser_hit: u64,
    pub coins_per_knockout: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: 800,
            arena_height: 600,
            ground_offset: 40,

            actor_width: 40,
            actor_height: 80,
            max_health: 1000,
            spawn_inset: 100,
            gravity: 0.6,
            player_speed: 4,
            opponent_speed: 2,
            jump_velocity: 12.0,

            punch_cooldown: 200,
            punch_duration: 160,
            kick_cooldown: 350,
            kick_duration: 220,
            melee_hit_window: 300,
            skill_cooldown: 5000,

            opponent_attack_duration: 220,
            opponent_hit_window: 80,
            approach_distance: 60,
            attack_chance: 0.6,
            ranged_range: 450,
            fire_chance: 0.02,

            laser_damage: 10,
            laser_speed: 12,
            laser_lifetime: 1200,
            laser_width: 6,
            laser_height: 4,

            medkit_heal: 80,
            medkit_fall_multiplier: 0.5,
            medkit_width: 24,
            medkit_height: 14,

            coins_per_melee_hit: 10,
            coins_per_laser_hit: 20,
            coins_per_knockout: 50,
        }
    }
}

impl Settings {
    /// Default settings file looked up by the native driver
    pub const FILE_NAME: &'static str = "street_duel.json";

    /// Y coordinate of the floor line
    pub fn ground_y(&self) -> i32 {
        self.arena_height - self.ground_offset
    }

    pub fn actor_size(&self) -> IVec2 {
        IVec2::new(self.actor_width, self.actor_height)
    }

    pub fn laser_size(&self) -> IVec2 {
        IVec2::new(self.laser_width, self.laser_height)
    }

    pub fn medkit_size(&self) -> IVec2 {
        IVec2::new(self.medkit_width, self.medkit_height)
    }

    /// Parse settings from JSON, keeping defaults for anything missing or malformed
    pub fn from_json_str(json: &str) -> Self {
        match Self::try_from_json_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e} - using default settings");
                Self::default()
            }
        }
    }

    fn try_from_json_str(json: &str) -> Result<Self, SettingsError> {
        let overrides = match serde_json::from_str::<Value>(json) {
            Ok(Value::Object(map)) => map,
            Ok(other) => return Err(SettingsError::Parse(format!("found {other}"))),
            Err(e) => return Err(SettingsError::Parse(e.to_string())),
        };

        let defaults = Self::default();
        let mut merged = match serde_json::to_value(&defaults) {
            Ok(Value::Object(map)) => map,
            _ => return Ok(defaults),
        };

        for (key, value) in overrides {
            if !merged.contains_key(&key) {
                log::warn!("Ignoring unknown setting '{key}'");
                continue;
            }
            if Self::accepts(&merged, &key, &value) {
                merged.insert(key, value);
            } else {
                log::warn!("Invalid value for setting '{key}': {value} - keeping default");
            }
        }

        let parsed = serde_json::from_value(Value::Object(merged)).unwrap_or(defaults);
        Ok(Self::sanitized(parsed))
    }

    /// Reset every out-of-range key to its default.
    ///
    /// Keys are checked in declaration order, so keys that depend on others
    /// (ground offset, sizes, spawn inset) are checked against already
    /// sanitized values.
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();
        let durations = 0..=MAX_DURATION_MS;
        let amounts = 0..=MAX_HEALTH;
        let awards = 0..=MAX_COIN_AWARD;
        let probability = |v: &f64| (0.0..=1.0).contains(v);

        // Arena
        reset_unless("arena_width", &mut self.arena_width, d.arena_width, |v| {
            (1..=MAX_EXTENT).contains(v)
        });
        reset_unless("arena_height", &mut self.arena_height, d.arena_height, |v| {
            (1..=MAX_EXTENT).contains(v)
        });
        let (width, height) = (self.arena_width, self.arena_height);
        reset_unless("ground_offset", &mut self.ground_offset, d.ground_offset, |v| {
            (0..height).contains(v)
        });

        // Fighters
        reset_unless("actor_width", &mut self.actor_width, d.actor_width, |v| {
            (1..=width).contains(v)
        });
        reset_unless("actor_height", &mut self.actor_height, d.actor_height, |v| {
            (1..=height).contains(v)
        });
        reset_unless("max_health", &mut self.max_health, d.max_health, |v| {
            (1..=MAX_HEALTH).contains(v)
        });
        reset_unless("spawn_inset", &mut self.spawn_inset, d.spawn_inset, |v| {
            (0..=width).contains(v)
        });
        reset_unless("gravity", &mut self.gravity, d.gravity, |v| {
            v.is_finite() && *v > 0.0 && *v <= 100.0
        });
        reset_unless("player_speed", &mut self.player_speed, d.player_speed, |v| {
            (1..=width).contains(v)
        });
        reset_unless("opponent_speed", &mut self.opponent_speed, d.opponent_speed, |v| {
            (1..=width).contains(v)
        });
        reset_unless("jump_velocity", &mut self.jump_velocity, d.jump_velocity, |v| {
            v.is_finite() && (0.0..=MAX_EXTENT as f32).contains(v)
        });

        // Timings
        for (key, value, default) in [
            ("punch_cooldown", &mut self.punch_cooldown, d.punch_cooldown),
            ("punch_duration", &mut self.punch_duration, d.punch_duration),
            ("kick_cooldown", &mut self.kick_cooldown, d.kick_cooldown),
            ("kick_duration", &mut self.kick_duration, d.kick_duration),
            ("melee_hit_window", &mut self.melee_hit_window, d.melee_hit_window),
            ("skill_cooldown", &mut self.skill_cooldown, d.skill_cooldown),
            (
                "opponent_attack_duration",
                &mut self.opponent_attack_duration,
                d.opponent_attack_duration,
            ),
            ("opponent_hit_window", &mut self.opponent_hit_window, d.opponent_hit_window),
            ("laser_lifetime", &mut self.laser_lifetime, d.laser_lifetime),
        ] {
            reset_unless(key, value, default, |v| durations.contains(v));
        }

        // Opponent
        reset_unless("approach_distance", &mut self.approach_distance, d.approach_distance, |v| {
            (0..=width).contains(v)
        });
        reset_unless("attack_chance", &mut self.attack_chance, d.attack_chance, probability);
        reset_unless("ranged_range", &mut self.ranged_range, d.ranged_range, |v| {
            (0..=MAX_EXTENT).contains(v)
        });
        reset_unless("fire_chance", &mut self.fire_chance, d.fire_chance, probability);

        // Lasers and medkits
        reset_unless("laser_damage", &mut self.laser_damage, d.laser_damage, |v| {
            amounts.contains(v)
        });
        reset_unless("laser_speed", &mut self.laser_speed, d.laser_speed, |v| {
            (1..=width).contains(v)
        });
        reset_unless("laser_width", &mut self.laser_width, d.laser_width, |v| {
            (1..=width).contains(v)
        });
        reset_unless("laser_height", &mut self.laser_height, d.laser_height, |v| {
            (1..=height).contains(v)
        });
        reset_unless("medkit_heal", &mut self.medkit_heal, d.medkit_heal, |v| {
            amounts.contains(v)
        });
        reset_unless(
            "medkit_fall_multiplier",
            &mut self.medkit_fall_multiplier,
            d.medkit_fall_multiplier,
            |v| v.is_finite() && *v > 0.0 && *v <= 10.0,
        );
        reset_unless("medkit_width", &mut self.medkit_width, d.medkit_width, |v| {
            (1..=width).contains(v)
        });
        reset_unless("medkit_height", &mut self.medkit_height, d.medkit_height, |v| {
            (1..=height).contains(v)
        });

        // Economy
        for (key, value, default) in [
            ("coins_per_melee_hit", &mut self.coins_per_melee_hit, d.coins_per_melee_hit),
            ("coins_per_laser_hit", &mut self.coins_per_laser_hit, d.coins_per_laser_hit),
            ("coins_per_knockout", &mut self.coins_per_knockout, d.coins_per_knockout),
        ] {
            reset_unless(key, value, default, |v| awards.contains(v));
        }

        self
    }

    /// Check a single override against an otherwise-valid key set
    fn accepts(base: &Map<String, Value>, key: &str, value: &Value) -> bool {
        let mut candidate = base.clone();
        candidate.insert(key.to_owned(), value.clone());
        serde_json::from_value::<Self>(Value::Object(candidate)).is_ok()
    }

    /// Read settings from a file
    pub fn try_load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::try_from_json_str(&json)
    }

    /// Load settings from a file, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {} - using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{e} - using default settings");
                Self::default()
            }
        }
    }
}

/// Put `default` back into `value` when `valid` rejects it
fn reset_unless<T: Copy + Debug>(
    key: &str,
    value: &mut T,
    default: T,
    valid: impl FnOnce(&T) -> bool,
) {
    if !valid(value) {
        log::warn!("Setting '{key}' out of range ({value:?}) - keeping default {default:?}");
        *value = default;
    }
}

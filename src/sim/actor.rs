//! Fighters: kinematics, attack timing and hitboxes
//!
//! `Fighter` carries everything both combatants share (body, health, attack
//! window, equipped weapon). `Player` layers held-key intents and the laser
//! skill on top; `Opponent` layers the AI policy.

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ai::{self, OpponentBrain};
use super::projectile::Projectile;
use super::rect::Rect;
use super::tick::HeldKeys;
use super::weapon::{MUZZLE_GAP, WeaponKind};
use crate::settings::Settings;

/// Hitbox sizes (width before multiplier, height)
pub const PUNCH_HITBOX: IVec2 = IVec2::new(24, 20);
pub const KICK_HITBOX: IVec2 = IVec2::new(40, 20);
pub const MIDNIGHT_HITBOX: IVec2 = IVec2::new(80, 36);

/// Unarmed base damage of the player's attacks
pub const PLAYER_PUNCH_DAMAGE: i32 = 10;
pub const PLAYER_KICK_DAMAGE: i32 = 12;

/// Unarmed damage of the opponent's attacks
pub const OPPONENT_KICK_DAMAGE: i32 = 10;
pub const OPPONENT_PUNCH_DAMAGE: i32 = 6;

/// Which way a fighter faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// +1 for right, -1 for left
    pub fn sign(self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    Punch,
    Kick,
    /// Midnight Blade special swing
    Midnight,
}

/// An attack in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub kind: AttackKind,
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl Attack {
    pub fn end_ms(&self) -> u64 {
        self.start_ms.saturating_add(self.duration_ms)
    }

    pub fn expired(&self, now: u64) -> bool {
        now.saturating_sub(self.start_ms) > self.duration_ms
    }

    /// Fraction of the swing completed, in [0, 1]
    pub fn progress(&self, now: u64) -> f32 {
        let elapsed = now.saturating_sub(self.start_ms) as f32;
        (elapsed / self.duration_ms.max(1) as f32).min(1.0)
    }
}

/// Coarse animation state, derived each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorPose {
    Idle,
    Moving,
    Airborne,
    Attacking,
}

/// `true` when `last` is unset or more than `cooldown` ms ago
#[inline]
pub fn cooldown_elapsed(last: Option<u64>, cooldown: u64, now: u64) -> bool {
    last.is_none_or(|t| now.saturating_sub(t) > cooldown)
}

/// State shared by both combatants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub rect: Rect,
    pub vel: Vec2,
    pub facing: Facing,
    pub grounded: bool,
    pub health: i32,
    pub max_health: i32,
    pub attack: Option<Attack>,
    pub last_attack_ms: Option<u64>,
    pub last_weapon_ms: Option<u64>,
    pub weapon: Option<WeaponKind>,
    /// Melee hitbox width scale from the equipped weapon, in percent
    pub width_percent: i32,
    /// Horizontal center of the spawn point
    pub spawn_x: i32,
    spawn_facing: Facing,
}

impl Fighter {
    pub fn new(spawn_x: i32, facing: Facing, settings: &Settings) -> Self {
        Self {
            rect: Rect::from_midbottom(spawn_x, settings.ground_y(), settings.actor_size()),
            vel: Vec2::ZERO,
            facing,
            grounded: true,
            health: settings.max_health,
            max_health: settings.max_health,
            attack: None,
            last_attack_ms: None,
            last_weapon_ms: None,
            weapon: None,
            width_percent: 100,
            spawn_x,
            spawn_facing: facing,
        }
    }

    /// Full health, back on the spawn point
    pub fn respawn(&mut self, settings: &Settings) {
        self.health = self.max_health;
        self.rect.set_midbottom(self.spawn_x, settings.ground_y());
    }

    /// Respawn and drop all motion and attack state
    pub fn reset(&mut self, settings: &Settings) {
        self.respawn(settings);
        self.vel = Vec2::ZERO;
        self.grounded = true;
        self.facing = self.spawn_facing;
        self.attack = None;
    }

    pub fn equip(&mut self, weapon: Option<WeaponKind>) {
        self.weapon = weapon;
        self.width_percent = weapon.map_or(100, |w| w.stats().width_percent);
    }

    pub fn is_attacking(&self) -> bool {
        self.attack.is_some()
    }

    pub fn attack_kind(&self) -> Option<AttackKind> {
        self.attack.map(|a| a.kind)
    }

    pub fn is_down(&self) -> bool {
        self.health <= 0
    }

    /// Apply damage, clamped at zero. Returns the damage actually dealt.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health - amount.max(0)).max(0);
        before - self.health
    }

    /// Heal, clamped at max. Returns the health actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health + amount.max(0)).min(self.max_health);
        self.health - before
    }

    pub fn start_attack(&mut self, kind: AttackKind, now: u64, duration_ms: u64) {
        self.attack = Some(Attack {
            kind,
            start_ms: now,
            duration_ms,
        });
        self.last_attack_ms = Some(now);
    }

    /// Clear the attack once its window has passed
    pub fn expire_attack(&mut self, now: u64) {
        if self.attack.is_some_and(|a| a.expired(now)) {
            self.attack = None;
        }
    }

    /// Whether a weapon with this cooldown may fire again
    pub fn weapon_ready(&self, cooldown_ms: u64, now: u64) -> bool {
        self.last_weapon_ms
            .is_none_or(|t| now.saturating_sub(t) >= cooldown_ms)
    }

    /// Advance one tick of motion: horizontal step, gravity, floor clamp
    pub fn integrate(&mut self, gravity: f32, ground_y: i32) {
        self.rect.origin.x += self.vel.x as i32;
        self.vel.y += gravity;
        self.rect.origin.y += self.vel.y as i32;

        if self.rect.bottom() >= ground_y {
            self.rect.set_bottom(ground_y);
            self.vel.y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    /// Box of the given size anchored to the leading edge, vertically centered
    pub fn leading_box(&self, size: IVec2) -> Rect {
        let x = match self.facing {
            Facing::Right => self.rect.right(),
            Facing::Left => self.rect.left() - size.x,
        };
        Rect::new(x, self.rect.center_y() - size.y / 2, size.x, size.y)
    }

    /// Where a laser leaves this fighter, offset `dy` from the center line
    pub fn muzzle(&self, dy: i32) -> IVec2 {
        IVec2::new(
            self.rect.center_x() + (self.rect.width() / 2 + MUZZLE_GAP) * self.facing.sign(),
            self.rect.center_y() + dy,
        )
    }

    pub fn pose(&self) -> ActorPose {
        if self.is_attacking() {
            ActorPose::Attacking
        } else if !self.grounded {
            ActorPose::Airborne
        } else if self.vel.x != 0.0 {
            ActorPose::Moving
        } else {
            ActorPose::Idle
        }
    }
}

/// The human-controlled fighter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub fighter: Fighter,
    pub last_skill_ms: Option<u64>,
    /// Unarmed hits deal double base damage. Nothing in a match grants the
    /// knife yet; it is the hook for a future shop and is cleared on restart.
    pub has_knife: bool,
}

impl Player {
    pub fn new(settings: &Settings) -> Self {
        Self {
            fighter: Fighter::new(settings.spawn_inset, Facing::Right, settings),
            last_skill_ms: None,
            has_knife: false,
        }
    }

    pub fn reset(&mut self, settings: &Settings) {
        self.fighter.reset(settings);
        self.fighter.equip(None);
        self.has_knife = false;
    }

    /// Apply one tick of held-key intents, then advance physics.
    ///
    /// Lasers fired by an equipped gun are pushed onto `spawned`.
    pub fn update(
        &mut self,
        held: &HeldKeys,
        now: u64,
        settings: &Settings,
        spawned: &mut Vec<Projectile>,
    ) {
        let f = &mut self.fighter;

        f.vel.x = 0.0;
        if held.left {
            f.vel.x = -(settings.player_speed as f32);
            f.facing = Facing::Left;
        } else if held.right {
            f.vel.x = settings.player_speed as f32;
            f.facing = Facing::Right;
        }

        if held.jump && f.grounded {
            f.vel.y = -settings.jump_velocity;
            f.grounded = false;
        }

        if held.attack && cooldown_elapsed(f.last_attack_ms, settings.punch_cooldown, now) {
            match f.weapon.filter(|w| w.has_activation()) {
                Some(weapon) => {
                    weapon.activate(f, now, settings, spawned);
                }
                None => f.start_attack(AttackKind::Punch, now, settings.punch_duration),
            }
        }

        if held.kick && cooldown_elapsed(f.last_attack_ms, settings.kick_cooldown, now) {
            f.start_attack(AttackKind::Kick, now, settings.kick_duration);
        }

        f.expire_attack(now);
        f.integrate(settings.gravity, settings.ground_y());
    }

    /// Melee hitbox of the current attack, if any
    pub fn attack_hitbox(&self) -> Option<Rect> {
        let f = &self.fighter;
        let base = match f.attack_kind()? {
            AttackKind::Punch => PUNCH_HITBOX,
            AttackKind::Kick => KICK_HITBOX,
            AttackKind::Midnight => MIDNIGHT_HITBOX,
        };
        let width = base.x * f.width_percent / 100;
        Some(f.leading_box(IVec2::new(width, base.y)))
    }

    /// Damage dealt by the current attack (weapon, then knife, then fists)
    pub fn melee_damage(&self) -> i32 {
        let base = match self.fighter.attack_kind() {
            Some(AttackKind::Punch) => PLAYER_PUNCH_DAMAGE,
            _ => PLAYER_KICK_DAMAGE,
        };
        match self.fighter.weapon {
            Some(weapon) => weapon.melee_damage(base),
            None if self.has_knife => base * 2,
            None => base,
        }
    }

    pub fn can_use_skill(&self, now: u64, settings: &Settings) -> bool {
        self.last_skill_ms
            .is_none_or(|t| now.saturating_sub(t) >= settings.skill_cooldown)
    }

    /// Remaining skill cooldown in ms (0 when ready)
    pub fn skill_cooldown_remaining(&self, now: u64, settings: &Settings) -> u64 {
        self.last_skill_ms.map_or(0, |t| {
            settings.skill_cooldown.saturating_sub(now.saturating_sub(t))
        })
    }

    /// Fire the laser skill if it is off cooldown
    pub fn use_skill(&mut self, now: u64, settings: &Settings) -> Option<Projectile> {
        if !self.can_use_skill(now, settings) {
            return None;
        }
        self.last_skill_ms = Some(now);
        let f = &self.fighter;
        Some(Projectile::laser(
            f.muzzle(0),
            f.facing.sign(),
            now,
            settings.laser_damage,
            settings,
        ))
    }
}

/// The AI-controlled fighter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opponent {
    pub fighter: Fighter,
    pub brain: OpponentBrain,
}

impl Opponent {
    /// Spawn on the right side with a randomly rolled weapon
    pub fn new<R: Rng + ?Sized>(now: u64, settings: &Settings, rng: &mut R) -> Self {
        let brain = OpponentBrain::new(now, rng);
        let mut fighter = Fighter::new(
            settings.arena_width - settings.spawn_inset,
            Facing::Left,
            settings,
        );
        fighter.equip(ai::roll_weapon(rng));
        Self { fighter, brain }
    }

    /// Back to spawn, keeping the rolled weapon
    pub fn reset(&mut self, settings: &Settings) {
        self.fighter.reset(settings);
    }

    /// End of the current swing, as recorded when it started
    pub fn attack_end_ms(&self) -> Option<u64> {
        self.fighter.attack.map(|a| a.end_ms())
    }

    /// Run the AI policy for one tick and advance physics
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        target: &Rect,
        now: u64,
        settings: &Settings,
        rng: &mut R,
        spawned: &mut Vec<Projectile>,
    ) {
        let f = &mut self.fighter;

        let vx = ai::approach_velocity(
            f.rect.center_x(),
            target.center_x(),
            settings.opponent_speed,
            settings.approach_distance,
        );
        f.vel.x = vx as f32;
        if vx != 0 {
            f.facing = if vx > 0 { Facing::Right } else { Facing::Left };
        }
        f.integrate(settings.gravity, settings.ground_y());

        if let Some(kind) = self.brain.decide(now, settings.attack_chance, rng) {
            f.start_attack(kind, now, settings.opponent_attack_duration);
            log::debug!("Opponent starts {kind:?} at {now}ms");
        }
        f.expire_attack(now);

        if let Some(weapon) = f.weapon.filter(|w| w.is_ranged()) {
            let distance = (f.rect.center_x() - target.center_x()).abs();
            if ai::wants_to_fire(distance, settings, rng) {
                weapon.activate(f, now, settings, spawned);
            }
        }
    }

    pub fn attack_hitbox(&self) -> Option<Rect> {
        let size = match self.fighter.attack_kind()? {
            AttackKind::Punch => PUNCH_HITBOX,
            AttackKind::Kick | AttackKind::Midnight => KICK_HITBOX,
        };
        Some(self.fighter.leading_box(size))
    }

    /// Damage of the current swing: kicks hit harder than anything else
    pub fn melee_damage(&self) -> i32 {
        match self.fighter.attack_kind() {
            Some(AttackKind::Kick) => OPPONENT_KICK_DAMAGE,
            _ => OPPONENT_PUNCH_DAMAGE,
        }
    }
}

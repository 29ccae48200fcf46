//! Hit resolution between fighters, lasers and medkits
//!
//! Each pass reads the positions produced by this tick's movement and applies
//! damage, healing and coins in place. Passes run in a fixed order from
//! `tick`, so their effects stack the same way every time.

use super::state::{GameEvent, GameState};

/// How far a landed player hit shoves the opponent along the player's facing
pub const HIT_NUDGE: i32 = 10;

/// Player's melee hitbox against the opponent.
///
/// Lands while the hitbox overlaps the opponent and the player's last swing
/// started less than `melee_hit_window` ago. Checked every tick, so a single
/// swing can land on several consecutive ticks.
pub fn resolve_player_melee(state: &mut GameState) -> bool {
    let now = state.now_ms;
    let Some(hitbox) = state.player.attack_hitbox() else {
        return false;
    };
    if !hitbox.intersects(&state.opponent.fighter.rect) {
        return false;
    }
    let fresh = state
        .player
        .fighter
        .last_attack_ms
        .is_some_and(|t| now.saturating_sub(t) < state.settings.melee_hit_window);
    if !fresh {
        return false;
    }

    let damage = state.player.melee_damage();
    let dealt = state.opponent.fighter.take_damage(damage);
    state.coins += state.settings.coins_per_melee_hit;
    state.opponent.fighter.rect.origin.x += HIT_NUDGE * state.player.fighter.facing.sign();
    state.events.push(GameEvent::OpponentHit { damage: dealt });
    log::debug!(
        "Player hit for {dealt}, opponent at {}",
        state.opponent.fighter.health
    );
    true
}

/// Opponent's melee hitbox against the player.
///
/// Only lands during the first `opponent_hit_window` ms of the swing, measured
/// back from the recorded swing end.
pub fn resolve_opponent_melee(state: &mut GameState) -> bool {
    let now = state.now_ms;
    let (Some(hitbox), Some(end)) = (state.opponent.attack_hitbox(), state.opponent.attack_end_ms())
    else {
        return false;
    };
    if !hitbox.intersects(&state.player.fighter.rect) {
        return false;
    }
    let swing_start = end.saturating_sub(state.settings.opponent_attack_duration);
    if now.saturating_sub(swing_start) >= state.settings.opponent_hit_window {
        return false;
    }

    let damage = state.opponent.melee_damage();
    let dealt = state.player.fighter.take_damage(damage);
    state.events.push(GameEvent::PlayerHit { damage: dealt });
    log::debug!(
        "Opponent hit for {dealt}, player at {}",
        state.player.fighter.health
    );
    true
}

/// Lasers against the opponent. Each laser hits at most once and is consumed.
pub fn resolve_projectiles(state: &mut GameState) -> usize {
    let target = state.opponent.fighter.rect;
    let mut hits = Vec::new();
    state.projectiles.retain(|laser| {
        if laser.rect.intersects(&target) {
            hits.push(laser.damage);
            false
        } else {
            true
        }
    });

    for &damage in &hits {
        let dealt = state.opponent.fighter.take_damage(damage);
        state.coins += state.settings.coins_per_laser_hit;
        state.events.push(GameEvent::LaserHit { damage: dealt });
    }
    hits.len()
}

/// Medkits touching the player heal them and disappear
pub fn collect_pickups(state: &mut GameState) -> i32 {
    let player_rect = state.player.fighter.rect;
    let mut heals = Vec::new();
    state.pickups.retain(|kit| {
        if kit.rect.intersects(&player_rect) {
            heals.push(kit.heal);
            false
        } else {
            true
        }
    });

    let mut total = 0;
    for heal in heals {
        let healed = state.player.fighter.heal(heal);
        state.events.push(GameEvent::MedkitCollected { healed });
        total += healed;
    }
    total
}

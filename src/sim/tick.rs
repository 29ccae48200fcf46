//! Per-frame simulation tick
//!
//! Core game loop that advances one duel by one frame. Movement speeds are
//! per tick; timers run on the millisecond clock advanced by `dt_ms`.

use serde::{Deserialize, Serialize};

use super::collision;
use super::state::{GameEvent, GameState, MatchPhase};
use super::weapon::WeaponKind;

/// Continuous actions, sampled fresh every tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Punch, or trigger the equipped weapon if it has an activation
    pub attack: bool,
    pub kick: bool,
}

/// One-shot actions from discrete key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Equip a weapon, or go back to fists with `None`
    Equip(Option<WeaponKind>),
    /// Fire the laser skill
    UseSkill,
    /// Start over after a game over
    Restart,
}

/// Input for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub held: HeldKeys,
    pub commands: Vec<Command>,
}

/// Advance the match by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: u64) {
    state.now_ms += dt_ms;
    state.events.clear();

    for &command in &input.commands {
        apply_command(state, command);
    }

    // Frozen until restart
    if state.phase != MatchPhase::Running {
        return;
    }

    let now = state.now_ms;

    // Fighters
    state
        .player
        .update(&input.held, now, &state.settings, &mut state.projectiles);
    let target = state.player.fighter.rect;
    state.opponent.update(
        &target,
        now,
        &state.settings,
        &mut state.rng,
        &mut state.projectiles,
    );

    // Lasers, then medkits
    let arena_width = state.settings.arena_width;
    state
        .projectiles
        .retain_mut(|laser| laser.update(now, arena_width));
    let settings = &state.settings;
    state.pickups.retain_mut(|kit| kit.update(settings));

    if let Some(kit) = state.medkit_timer.poll(now, &state.settings, &mut state.rng) {
        state.pickups.push(kit);
    }

    // Hits
    collision::resolve_player_melee(state);
    collision::resolve_opponent_melee(state);
    collision::resolve_projectiles(state);
    collision::collect_pickups(state);

    check_terminal(state);
}

fn apply_command(state: &mut GameState, command: Command) {
    match (state.phase, command) {
        (MatchPhase::GameOver, Command::Restart) => state.restart(),
        (MatchPhase::GameOver, _) | (MatchPhase::Running, Command::Restart) => {}
        (MatchPhase::Running, Command::Equip(weapon)) => {
            state.player.fighter.equip(weapon);
            log::info!("Player equipped {}", weapon.map_or("fists", |w| w.name()));
        }
        (MatchPhase::Running, Command::UseSkill) => {
            if let Some(laser) = state.player.use_skill(state.now_ms, &state.settings) {
                state.projectiles.push(laser);
                state.events.push(GameEvent::SkillFired);
            }
        }
    }
}

fn check_terminal(state: &mut GameState) {
    if state.player.fighter.is_down() {
        state.phase = MatchPhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!("Game over at {}ms with {} coins", state.now_ms, state.coins);
    }

    if state.opponent.fighter.is_down() {
        state.coins += state.settings.coins_per_knockout;
        state.knockouts += 1;
        state.opponent.fighter.respawn(&state.settings);
        state.events.push(GameEvent::OpponentKnockedOut);
        log::info!("Opponent knocked out (#{}), respawning", state.knockouts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::{AttackKind, Facing};
    use crate::sim::projectile::Projectile;
    use crate::consts::SIM_DT_MS;
    use crate::settings::Settings;
    use glam::IVec2;
    use proptest::prelude::*;

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn with_commands(commands: Vec<Command>) -> TickInput {
        TickInput {
            commands,
            ..Default::default()
        }
    }

    /// Unarmed opponent standing right in front of the player, AI timers parked
    fn duel_at_close_range(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.opponent.fighter.equip(None);
        state.opponent.brain.next_delay_ms = u64::MAX;
        state.medkit_timer.next_delay_ms = u64::MAX;
        let right = state.player.fighter.rect.right();
        state.opponent.fighter.rect.origin.x = right + 4;
        state
    }

    #[test]
    fn test_equip_is_instant() {
        let mut state = GameState::new(1);
        tick(
            &mut state,
            &with_commands(vec![Command::Equip(Some(WeaponKind::Flail))]),
            SIM_DT_MS,
        );
        assert_eq!(state.player.fighter.weapon, Some(WeaponKind::Flail));
        assert_eq!(state.player.fighter.width_percent, 150);

        tick(&mut state, &with_commands(vec![Command::Equip(None)]), SIM_DT_MS);
        assert_eq!(state.player.fighter.weapon, None);
        assert_eq!(state.player.fighter.width_percent, 100);
    }

    #[test]
    fn test_skill_spawns_single_laser_with_cooldown() {
        let mut state = duel_at_close_range(2);
        state.opponent.fighter.rect.origin.x = 600;
        let skill = with_commands(vec![Command::UseSkill]);

        tick(&mut state, &skill, SIM_DT_MS);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.events.contains(&GameEvent::SkillFired));

        tick(&mut state, &skill, SIM_DT_MS);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_gun_fire_travels_and_hits_opponent() {
        let mut state = duel_at_close_range(3);
        state.opponent.fighter.rect.origin.x = 400;
        state.player.fighter.equip(Some(WeaponKind::Gun));
        let fire = TickInput {
            held: HeldKeys {
                attack: true,
                ..Default::default()
            },
            ..Default::default()
        };

        tick(&mut state, &fire, SIM_DT_MS);
        assert_eq!(state.projectiles.len(), 2);

        for _ in 0..60 {
            tick(&mut state, &idle(), SIM_DT_MS);
            if state.projectiles.is_empty() {
                break;
            }
        }
        assert!(state.projectiles.is_empty());
        assert_eq!(state.opponent.fighter.health, 980);
        assert_eq!(state.coins, 40);
    }

    #[test]
    fn test_stationary_laser_expires_without_collision() {
        let mut state = duel_at_close_range(4);
        let s = state.settings.clone();
        let mut laser = Projectile::laser(IVec2::new(400, 100), 1, state.now_ms, 10, &s);
        laser.vx = 0;
        let spawned = state.now_ms;
        state.projectiles.push(laser);

        while state.now_ms + SIM_DT_MS <= spawned + 1200 {
            tick(&mut state, &idle(), SIM_DT_MS);
        }
        assert_eq!(state.projectiles.len(), 1);

        tick(&mut state, &idle(), SIM_DT_MS);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_game_over_freezes_until_restart() {
        let mut state = duel_at_close_range(5);
        state.coins = 70;
        state.player.fighter.health = 6;
        state
            .opponent
            .fighter
            .start_attack(AttackKind::Punch, state.now_ms + SIM_DT_MS, 220);
        state.opponent.fighter.facing = Facing::Left;

        tick(&mut state, &idle(), SIM_DT_MS);
        assert_eq!(state.player.fighter.health, 0);
        assert_eq!(state.phase, MatchPhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver));

        let frozen = state.opponent.fighter.rect;
        let moving = TickInput {
            held: HeldKeys {
                right: true,
                ..Default::default()
            },
            commands: vec![Command::Equip(Some(WeaponKind::Gun)), Command::UseSkill],
        };
        tick(&mut state, &moving, SIM_DT_MS);
        assert_eq!(state.opponent.fighter.rect, frozen);
        assert_eq!(state.player.fighter.weapon, None);
        assert!(state.projectiles.is_empty());

        tick(&mut state, &with_commands(vec![Command::Restart]), SIM_DT_MS);
        assert_eq!(state.phase, MatchPhase::Running);
        assert_eq!(state.player.fighter.health, 1000);
        assert_eq!(state.coins, 70);
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut state = GameState::new(6);
        state.player.fighter.health = 500;
        tick(&mut state, &with_commands(vec![Command::Restart]), SIM_DT_MS);
        assert!(state.player.fighter.health <= 500);
        assert!(!state.events.contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_melee_knockout_respawns_opponent_with_bonus() {
        let mut state = duel_at_close_range(7);
        let spawn_x = state.opponent.fighter.spawn_x;
        state.opponent.fighter.health = 10;

        let punch = TickInput {
            held: HeldKeys {
                attack: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &punch, SIM_DT_MS);

        assert_eq!(state.opponent.fighter.health, 1000);
        assert_eq!(state.opponent.fighter.rect.center_x(), spawn_x);
        assert_eq!(state.coins, 10 + 50);
        assert_eq!(state.knockouts, 1);
        assert!(state.events.contains(&GameEvent::OpponentKnockedOut));
    }

    #[test]
    fn test_fist_hits_add_up_to_knockout() {
        let mut state = duel_at_close_range(8);
        let spawn_x = state.opponent.fighter.spawn_x;
        let punch = TickInput {
            held: HeldKeys {
                attack: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut hits = 0;
        let mut ticks = 0;
        while state.knockouts == 0 && ticks < 10_000 {
            ticks += 1;
            // Keep the opponent pinned in reach
            let right = state.player.fighter.rect.right();
            state.opponent.fighter.rect.origin.x = right + 4;
            let before = state.opponent.fighter.health;
            let coins = state.coins;

            tick(&mut state, &punch, SIM_DT_MS);

            if state.events.contains(&GameEvent::OpponentHit { damage: 10 }) {
                hits += 1;
                if state.knockouts == 0 {
                    assert_eq!(state.opponent.fighter.health, before - 10);
                    assert_eq!(state.coins, coins + 10);
                }
            }
        }

        assert_eq!(hits, 100);
        assert_eq!(state.knockouts, 1);
        assert_eq!(state.opponent.fighter.health, 1000);
        assert_eq!(state.opponent.fighter.rect.center_x(), spawn_x);
        assert_eq!(state.coins, 100 * 10 + 50);
    }

    #[test]
    fn test_lasers_finish_off_opponent() {
        let mut state = duel_at_close_range(9);
        let spawn_x = state.opponent.fighter.spawn_x;
        // Worn down by earlier rounds
        state.opponent.fighter.take_damage(960);

        // One real punch lands on the first tick of the swing
        let punch = TickInput {
            held: HeldKeys {
                attack: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &punch, SIM_DT_MS);
        assert!(state.events.contains(&GameEvent::OpponentHit { damage: 10 }));
        assert_eq!(state.opponent.fighter.health, 30);
        assert_eq!(state.coins, 10);

        // Step out of reach; the lasers do the rest
        state.opponent.fighter.rect.origin.x = 500;
        let s = state.settings.clone();
        let target = state.opponent.fighter.rect;
        for dy in [-10, 0, 10] {
            let c = IVec2::new(target.center_x(), target.center_y() + dy);
            let mut laser = Projectile::laser(c, 1, state.now_ms, 10, &s);
            laser.vx = 0;
            state.projectiles.push(laser);
        }

        tick(&mut state, &idle(), SIM_DT_MS);

        assert_eq!(state.knockouts, 1);
        assert_eq!(state.opponent.fighter.health, 1000);
        assert_eq!(state.opponent.fighter.rect.center_x(), spawn_x);
        assert_eq!(state.coins, 10 + 3 * 20 + 50);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_negative_max_health_config_keeps_match_sane() {
        let settings = Settings::from_json_str(r#"{ "max_health": -5 }"#);
        let mut state = GameState::with_settings(13, settings);
        tick(&mut state, &idle(), SIM_DT_MS);

        let p = &state.player.fighter;
        assert!(p.health > 0 && p.health <= p.max_health);
        assert_eq!(state.phase, MatchPhase::Running);
        assert_eq!(state.coins, 0);
        assert_eq!(state.knockouts, 0);
    }

    #[test]
    fn test_endless_opponent_swing_does_not_overflow() {
        let settings = Settings {
            opponent_attack_duration: u64::MAX,
            attack_chance: 1.0,
            ..Settings::default()
        };
        let mut state = GameState::with_settings(14, settings);
        for _ in 0..400 {
            tick(&mut state, &idle(), SIM_DT_MS);
        }
        assert!(state.opponent.fighter.is_attacking());
        assert_eq!(state.opponent.attack_end_ms(), Some(u64::MAX));
    }

    #[test]
    fn test_medkit_drops_and_heals_player() {
        let mut state = duel_at_close_range(10);
        state.opponent.fighter.rect.origin.x = 600;
        state.player.fighter.health = 500;
        state.medkit_timer.next_delay_ms = 0;
        state.settings.arena_width = 200; // spawn x lands within 40..160

        let mut healed = false;
        for _ in 0..400 {
            // Walk under wherever the kit fell
            if let Some(kit) = state.pickups.first() {
                let x = kit.rect.center_x();
                state.player.fighter.rect.set_midbottom(x, 560);
            }
            tick(&mut state, &idle(), SIM_DT_MS);
            if state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::MedkitCollected { .. }))
            {
                healed = true;
                break;
            }
        }
        assert!(healed);
        assert_eq!(state.player.fighter.health, 580);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        let script = [
            TickInput {
                held: HeldKeys {
                    right: true,
                    ..Default::default()
                },
                ..Default::default()
            },
            TickInput {
                held: HeldKeys {
                    right: true,
                    attack: true,
                    ..Default::default()
                },
                commands: vec![Command::UseSkill],
            },
            TickInput {
                held: HeldKeys {
                    kick: true,
                    jump: true,
                    ..Default::default()
                },
                ..Default::default()
            },
        ];

        for i in 0..3000 {
            let input = &script[i % script.len()];
            tick(&mut a, input, SIM_DT_MS);
            tick(&mut b, input, SIM_DT_MS);
        }

        assert_eq!(a.player, b.player);
        assert_eq!(a.opponent, b.opponent);
        assert_eq!(a.projectiles, b.projectiles);
        assert_eq!(a.pickups, b.pickups);
        assert_eq!(a.coins, b.coins);
        assert_eq!(a.phase, b.phase);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        let held = (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>())
            .prop_map(|(left, right, jump, attack, kick)| HeldKeys {
                left,
                right,
                jump,
                attack,
                kick,
            });
        let command = prop_oneof![
            Just(Command::UseSkill),
            Just(Command::Restart),
            Just(Command::Equip(None)),
            proptest::sample::select(WeaponKind::ALL.to_vec()).prop_map(|w| Command::Equip(Some(w))),
        ];
        (held, proptest::collection::vec(command, 0..2))
            .prop_map(|(held, commands)| TickInput { held, commands })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_health_stays_in_bounds(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(arb_input(), 1..400),
            dt in 1u64..40,
        ) {
            let mut state = GameState::new(seed);
            for input in &inputs {
                tick(&mut state, input, dt);
                for f in [&state.player.fighter, &state.opponent.fighter] {
                    prop_assert!(f.health >= 0 && f.health <= f.max_health);
                }
                prop_assert!(state.opponent.fighter.health > 0);
            }
        }
    }
}

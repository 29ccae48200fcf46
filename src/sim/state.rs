//! Match state
//!
//! Everything one duel needs lives here: both fighters, the transient lasers
//! and medkits, the coin purse, the clock and the single RNG that drives every
//! random decision.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Opponent, Player};
use super::pickup::{Pickup, SpawnTimer};
use super::projectile::Projectile;
use crate::settings::Settings;

/// Whether the duel is live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Active gameplay
    Running,
    /// Player ran out of health; frozen until restart
    GameOver,
}

/// Things that happened during the last tick, for audio and effects layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    OpponentHit { damage: i32 },
    PlayerHit { damage: i32 },
    LaserHit { damage: i32 },
    MedkitCollected { healed: i32 },
    SkillFired,
    OpponentKnockedOut,
    GameOver,
    Restarted,
}

/// Complete state of one duel
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub settings: Settings,
    pub rng: Pcg32,
    /// Monotonic match clock in ms
    pub now_ms: u64,
    pub phase: MatchPhase,
    pub player: Player,
    pub opponent: Opponent,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub medkit_timer: SpawnTimer,
    /// Survives restarts
    pub coins: u64,
    pub knockouts: u32,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new match with default settings
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, Settings::default())
    }

    pub fn with_settings(seed: u64, settings: Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let player = Player::new(&settings);
        let opponent = Opponent::new(0, &settings, &mut rng);
        let medkit_timer = SpawnTimer::new(0, &mut rng);

        log::info!(
            "Match created (seed {seed}), opponent armed with {}",
            opponent.fighter.weapon.map_or("fists", |w| w.name())
        );

        Self {
            seed,
            settings,
            rng,
            now_ms: 0,
            phase: MatchPhase::Running,
            player,
            opponent,
            projectiles: Vec::new(),
            pickups: Vec::new(),
            medkit_timer,
            coins: 0,
            knockouts: 0,
            events: Vec::new(),
        }
    }

    /// Reset fighters and clear the arena. Coins are kept.
    pub fn restart(&mut self) {
        self.player.reset(&self.settings);
        self.opponent.reset(&self.settings);
        self.projectiles.clear();
        self.pickups.clear();
        self.phase = MatchPhase::Running;
        self.events.push(GameEvent::Restarted);
        log::info!("Match restarted ({} coins carried over)", self.coins);
    }

    pub fn is_running(&self) -> bool {
        self.phase == MatchPhase::Running
    }

    pub fn skill_cooldown_remaining(&self) -> u64 {
        self.player
            .skill_cooldown_remaining(self.now_ms, &self.settings)
    }
}

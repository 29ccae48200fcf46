//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform code:
//! - One synchronous tick per frame
//! - A single seeded RNG owned by the match
//! - Stable iteration order (plain `Vec`s swept with `retain`)

pub mod actor;
pub mod ai;
pub mod collision;
pub mod pickup;
pub mod projectile;
pub mod rect;
pub mod state;
pub mod tick;
pub mod weapon;

pub use actor::{ActorPose, Attack, AttackKind, Facing, Fighter, Opponent, Player};
pub use ai::OpponentBrain;
pub use pickup::{Pickup, SpawnTimer};
pub use projectile::Projectile;
pub use rect::Rect;
pub use state::{GameEvent, GameState, MatchPhase};
pub use tick::{Command, HeldKeys, TickInput, tick};
pub use weapon::{WeaponKind, WeaponStats};

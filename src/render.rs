//! Render boundary
//!
//! The simulation never draws. Each frame the driver captures a `Snapshot`
//! and hands it to a `FrameSink`. Sinks may fail; `present` keeps those
//! failures away from the simulation loop.

use serde::Serialize;
use thiserror::Error;

use crate::sim::{
    ActorPose, AttackKind, Facing, Fighter, GameEvent, GameState, MatchPhase, Rect,
};

/// Failures a drawing layer may report
#[derive(Debug, Error)]
pub enum RenderError {
    /// Decorative background effect failed; a plain backdrop can stand in
    #[error("backdrop effect failed: {0}")]
    Backdrop(String),
    /// The frame itself could not be drawn
    #[error("frame draw failed: {0}")]
    Frame(String),
}

/// What one fighter looks like this frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorView {
    pub rect: Rect,
    pub facing: Facing,
    pub pose: ActorPose,
    pub attack: Option<AttackKind>,
    /// 0..=1 through the current swing, 0 when idle
    pub attack_progress: f32,
    pub health: i32,
    pub max_health: i32,
    pub weapon: &'static str,
    /// Active melee hitbox, for debug overlays
    pub hitbox: Option<Rect>,
}

impl ActorView {
    fn capture(fighter: &Fighter, hitbox: Option<Rect>, now: u64) -> Self {
        Self {
            rect: fighter.rect,
            facing: fighter.facing,
            pose: fighter.pose(),
            attack: fighter.attack_kind(),
            attack_progress: fighter.attack.map_or(0.0, |a| a.progress(now)),
            health: fighter.health,
            max_health: fighter.max_health,
            weapon: fighter.weapon.map_or("Fist", |w| w.name()),
            hitbox,
        }
    }

    /// Health bar fill, 0..=1
    pub fn health_fraction(&self) -> f32 {
        self.health.max(0) as f32 / self.max_health.max(1) as f32
    }
}

/// Read-only view of a match for drawing, HUD and audio layers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub now_ms: u64,
    pub phase: MatchPhase,
    pub player: ActorView,
    pub opponent: ActorView,
    pub projectiles: Vec<Rect>,
    pub pickups: Vec<Rect>,
    pub coins: u64,
    pub knockouts: u32,
    /// Remaining laser skill cooldown (0 = ready)
    pub skill_cooldown_ms: u64,
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let now = state.now_ms;
        Self {
            now_ms: now,
            phase: state.phase,
            player: ActorView::capture(&state.player.fighter, state.player.attack_hitbox(), now),
            opponent: ActorView::capture(
                &state.opponent.fighter,
                state.opponent.attack_hitbox(),
                now,
            ),
            projectiles: state.projectiles.iter().map(|p| p.rect).collect(),
            pickups: state.pickups.iter().map(|p| p.rect).collect(),
            coins: state.coins,
            knockouts: state.knockouts,
            skill_cooldown_ms: state.skill_cooldown_remaining(),
            events: state.events.clone(),
        }
    }

    /// HUD text for the skill line
    pub fn skill_label(&self) -> String {
        if self.skill_cooldown_ms == 0 {
            "Ready".to_string()
        } else {
            format!(
                "{}.{}s",
                self.skill_cooldown_ms / 1000,
                (self.skill_cooldown_ms % 1000) / 100
            )
        }
    }
}

/// A drawing layer
pub trait FrameSink {
    /// Decorative background (particles, parallax). Allowed to fail.
    fn draw_backdrop(&mut self, frame: &Snapshot) -> Result<(), RenderError>;

    /// Plain stand-in used when the backdrop fails
    fn draw_fallback_backdrop(&mut self) {}

    /// Fighters, lasers, medkits and HUD
    fn draw_frame(&mut self, frame: &Snapshot) -> Result<(), RenderError>;
}

/// How a `present` call went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    Presented,
    /// Backdrop failed and was replaced by the fallback
    Degraded,
    /// Frame could not be drawn; the simulation carries on regardless
    Dropped,
}

/// Draw one frame, containing any failure inside the sink
pub fn present<S: FrameSink + ?Sized>(sink: &mut S, frame: &Snapshot) -> PresentOutcome {
    let mut outcome = PresentOutcome::Presented;

    if let Err(e) = sink.draw_backdrop(frame) {
        log::warn!("{e} - using plain backdrop");
        sink.draw_fallback_backdrop();
        outcome = PresentOutcome::Degraded;
    }

    if let Err(e) = sink.draw_frame(frame) {
        log::error!("{e}");
        return PresentOutcome::Dropped;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::WeaponKind;

    #[derive(Default)]
    struct FlakySink {
        fail_backdrop: bool,
        fail_frame: bool,
        fallbacks: u32,
        frames: u32,
    }

    impl FrameSink for FlakySink {
        fn draw_backdrop(&mut self, _frame: &Snapshot) -> Result<(), RenderError> {
            if self.fail_backdrop {
                Err(RenderError::Backdrop("starfield".into()))
            } else {
                Ok(())
            }
        }

        fn draw_fallback_backdrop(&mut self) {
            self.fallbacks += 1;
        }

        fn draw_frame(&mut self, _frame: &Snapshot) -> Result<(), RenderError> {
            if self.fail_frame {
                return Err(RenderError::Frame("surface lost".into()));
            }
            self.frames += 1;
            Ok(())
        }
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = GameState::new(3);
        state.player.fighter.equip(Some(WeaponKind::Katana));
        state.player.fighter.start_attack(AttackKind::Punch, 0, 160);
        state.now_ms = 80;
        state.coins = 42;

        let snap = Snapshot::capture(&state);
        assert_eq!(snap.player.weapon, "Katana");
        assert_eq!(snap.player.pose, ActorPose::Attacking);
        assert!((snap.player.attack_progress - 0.5).abs() < 1e-6);
        assert_eq!(snap.player.hitbox.map(|h| h.width()), Some(31));
        assert_eq!(snap.opponent.hitbox, None);
        assert_eq!(snap.coins, 42);
        assert_eq!(snap.phase, MatchPhase::Running);
        assert_eq!(snap.skill_label(), "Ready");
        assert!(serde_json::to_string(&snap).is_ok());
    }

    #[test]
    fn test_skill_label_formats_tenths() {
        let mut state = GameState::new(3);
        state.player.last_skill_ms = Some(0);
        state.now_ms = 1_750;
        assert_eq!(Snapshot::capture(&state).skill_label(), "3.2s");
    }

    #[test]
    fn test_backdrop_failure_falls_back() {
        let state = GameState::new(1);
        let snap = Snapshot::capture(&state);
        let mut sink = FlakySink {
            fail_backdrop: true,
            ..Default::default()
        };

        assert_eq!(present(&mut sink, &snap), PresentOutcome::Degraded);
        assert_eq!(sink.fallbacks, 1);
        assert_eq!(sink.frames, 1);
    }

    #[test]
    fn test_frame_failure_is_contained() {
        let mut state = GameState::new(1);
        let mut sink = FlakySink {
            fail_frame: true,
            ..Default::default()
        };

        for _ in 0..10 {
            crate::sim::tick(&mut state, &Default::default(), 16);
            let snap = Snapshot::capture(&state);
            assert_eq!(present(&mut sink, &snap), PresentOutcome::Dropped);
        }
        assert_eq!(state.now_ms, 160);
    }

    #[test]
    fn test_clean_present() {
        let state = GameState::new(1);
        let mut sink = FlakySink::default();
        assert_eq!(
            present(&mut sink, &Snapshot::capture(&state)),
            PresentOutcome::Presented
        );
        assert_eq!(sink.fallbacks, 0);
    }
}

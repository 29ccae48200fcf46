//! Street Duel entry point
//!
//! Headless native driver: loads settings, runs the fixed-timestep loop
//! against a scripted demo player and presents frames through a logging sink.
//! A windowed front end plugs in by swapping the `FrameSink` and feeding real
//! key state into `TickInput`.

use std::path::Path;

use street_duel::consts::*;
use street_duel::render::{FrameSink, RenderError, Snapshot, present};
use street_duel::settings::Settings;
use street_duel::sim::{Command, GameEvent, GameState, HeldKeys, MatchPhase, TickInput, WeaponKind, tick};

/// Simulated wall-clock length of the demo match
const DEMO_LENGTH_MS: u64 = 120_000;

/// How often the logging sink prints a status line
const STATUS_EVERY_MS: u64 = 5_000;

/// Frame sink that writes a status line to the log instead of drawing
#[derive(Default)]
struct LogSink {
    last_status_ms: u64,
}

impl FrameSink for LogSink {
    fn draw_backdrop(&mut self, _frame: &Snapshot) -> Result<(), RenderError> {
        Ok(())
    }

    fn draw_frame(&mut self, frame: &Snapshot) -> Result<(), RenderError> {
        for event in &frame.events {
            if matches!(event, GameEvent::OpponentKnockedOut | GameEvent::GameOver) {
                log::info!("[{}ms] {:?}", frame.now_ms, event);
            }
        }

        if frame.now_ms.saturating_sub(self.last_status_ms) >= STATUS_EVERY_MS {
            self.last_status_ms = frame.now_ms;
            log::info!(
                "[{}ms] player {}/{} ({}) | opponent {}/{} ({}) | coins {} | skill {}",
                frame.now_ms,
                frame.player.health,
                frame.player.max_health,
                frame.player.weapon,
                frame.opponent.health,
                frame.opponent.max_health,
                frame.opponent.weapon,
                frame.coins,
                frame.skill_label(),
            );
            let json = serde_json::to_string(frame).map_err(|e| RenderError::Frame(e.to_string()))?;
            log::debug!("{json}");
        }
        Ok(())
    }
}

/// Fixed-timestep loop state
struct Game {
    state: GameState,
    accumulator: u64,
    input: TickInput,
}

impl Game {
    fn new(seed: u64, settings: Settings) -> Self {
        Self {
            state: GameState::with_settings(seed, settings),
            accumulator: 0,
            input: TickInput::default(),
        }
    }

    /// Run simulation ticks for one rendered frame
    fn update(&mut self, frame_ms: u64) {
        self.accumulator += frame_ms.min(MAX_FRAME_MS);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT_MS);
            self.accumulator -= SIM_DT_MS;
            substeps += 1;

            // One-shot commands only apply to the first tick
            self.input.commands.clear();
        }
    }
}

/// Scripted stand-in for a keyboard: close in, swing, cycle weapons
fn demo_input(state: &GameState, frame: u64) -> TickInput {
    let mut input = TickInput::default();

    if state.phase == MatchPhase::GameOver {
        input.commands.push(Command::Restart);
        return input;
    }

    let me = &state.player.fighter;
    let foe = &state.opponent.fighter;
    let gap = foe.rect.center_x() - me.rect.center_x();

    let mut held = HeldKeys::default();
    if gap.abs() > 50 {
        held.right = gap > 0;
        held.left = gap < 0;
    } else if (frame / 30) % 3 == 2 {
        held.kick = true;
    } else {
        held.attack = true;
    }
    held.jump = frame % 240 == 120;
    input.held = held;

    // New weapon every ten seconds: fists, gun, katana, flail, midnight blade
    if frame % 600 == 0 {
        let slot = (frame / 600) as usize % (WeaponKind::ALL.len() + 1);
        let weapon = slot.checked_sub(1).map(|i| WeaponKind::ALL[i]);
        input.commands.push(Command::Equip(weapon));
    }

    if state.skill_cooldown_remaining() == 0 && gap.abs() > 150 {
        input.commands.push(Command::UseSkill);
    }

    input
}

fn main() {
    env_logger::init();
    log::info!("Street Duel (headless) starting...");

    let settings = Settings::load_from(Path::new(Settings::FILE_NAME));
    let seed = std::env::var("STREET_DUEL_SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(rand::random);
    log::info!("Game initialized with seed: {}", seed);

    let mut game = Game::new(seed, settings);
    let mut sink = LogSink::default();
    let mut frame: u64 = 0;
    let mut elapsed: u64 = 0;

    while elapsed < DEMO_LENGTH_MS {
        // 60 fps wall clock jitters between 16 and 17 ms
        let frame_ms = if frame % 3 == 0 { 17 } else { 16 };
        elapsed += frame_ms;

        let scripted = demo_input(&game.state, frame);
        game.input.held = scripted.held;
        game.input.commands.extend(scripted.commands);
        game.update(frame_ms);

        present(&mut sink, &Snapshot::capture(&game.state));
        frame += 1;
    }

    let state = &game.state;
    log::info!(
        "Demo finished after {}ms: {} coins, {} knockouts, player {}/{}",
        state.now_ms,
        state.coins,
        state.knockouts,
        state.player.fighter.health,
        state.player.fighter.max_health
    );
}

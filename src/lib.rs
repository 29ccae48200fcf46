//! Street Duel - a side-view stickman fighting game
//!
//! Core modules:
//! - `sim`: Simulation (fighters, weapons, lasers, medkits, match state)
//! - `render`: Read-only frame snapshots and failure-isolated presentation
//! - `settings`: Data-driven game tuning

pub mod render;
pub mod settings;
pub mod sim;

pub use render::{FrameSink, PresentOutcome, RenderError, Snapshot, present};
pub use settings::{Settings, SettingsError};

/// Game loop constants
pub mod consts {
    /// Simulation timestep in ms (~60 Hz)
    pub const SIM_DT_MS: u64 = 16;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the driver will try to catch up on
    pub const MAX_FRAME_MS: u64 = 100;
}

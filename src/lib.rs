//! Astro Run - a side-scrolling spacecraft adventure
//!
//! Core modules:
//! - `sim`: Deterministic level simulation (craft, obstacles, spawning, phases, collisions)
//! - `tuning`: Data-driven level balance and validation
//! - `draw`: Draw-call sink fed by the simulation
//! - `progress`: Level completion store
//! - `highscores`: Leaderboard for the endless level

pub mod draw;
pub mod error;
pub mod highscores;
pub mod progress;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, ProgressError};
pub use highscores::HighScores;
pub use progress::{Progress, ProgressStore};
pub use tuning::{LevelId, LevelTuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz; per-tick craft constants assume it)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Largest delta a single tick accepts
    pub const MAX_DT: f32 = 0.1;

    /// World dimensions (y grows upward)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 480.0;

    /// Craft defaults
    pub const CRAFT_X: f32 = 160.0;
    pub const CRAFT_RADIUS: f32 = 24.0;
    /// Upward velocity set by a thrust (units per tick)
    pub const FLY_IMPULSE: f32 = 8.0;
    /// Velocity lost per tick while diving
    pub const DIVE_PER_TICK: f32 = 0.5;
    pub const MAX_FALL_SPEED: f32 = 16.0;

    /// Scroll speed shared by the streamed entities (units per second)
    pub const SCROLL_SPEED: f32 = 180.0;

    /// Speed-bucket boundary between slow and fast descent
    pub const FAST_DESCENT: f32 = -10.0;

    /// Dialog auto-close countdown (seconds)
    pub const DIALOG_SECONDS: f32 = 3.0;
}

//! Error types
//!
//! The tick loop never fails. Everything that can go wrong is caught when a
//! level is configured or when progress is read from / written to disk.

use thiserror::Error;

/// A level configuration that would break the simulation's invariants
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },

    #[error("craft spawn y {y} lies outside the clamp range [{min}, {max}]")]
    SpawnOutOfBounds { y: f32, min: f32, max: f32 },

    /// An entity could scroll further than its gap in one tick and spawn twice
    #[error("{lane} spawn gap {gap} must exceed speed * max_dt ({step})")]
    GapTooSmall { lane: &'static str, gap: f32, step: f32 },

    #[error("asteroid floor range [{min}, {max}] does not fit the world")]
    FloorRange { min: f32, max: f32 },

    #[error("passage of {passage} is too narrow for a craft of radius {radius}")]
    PassageTooNarrow { passage: f32, radius: f32 },

    #[error("collectible kind weights are all zero")]
    NoCollectibleKinds,

    #[error("collectible spawn band [{min}, {max}] is empty or outside the world")]
    CollectibleBand { min: f32, max: f32 },

    #[error("anchored collectible chance {0} is outside [0, 1]")]
    AnchorChance(f64),

    #[error("script has {count} transitions, at most {max} are supported")]
    ScriptTooLong { count: usize, max: usize },

    #[error("transition {index} needs a {enemy} but the level has none")]
    MissingEnemy { index: usize, enemy: &'static str },

    #[error("dragon bob range [{min}, {max}] is empty or outside the world")]
    BobRange { min: f32, max: f32 },

    #[error("bot spin goal range {min}..={max} is invalid")]
    SpinGoal { min: u32, max: u32 },

    #[error("bot release frame {frame} is not below the frame count {frames}")]
    ReleaseFrame { frame: u32, frames: u32 },

    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure to read or write the progress file
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("progress file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("progress file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

//! The player's spacecraft
//!
//! Only the vertical axis moves. Velocity is measured in world units per tick,
//! so one `update` applies it to the position unscaled.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shapes::Circle;
use crate::consts::FAST_DESCENT;

/// How a level pulls the craft down
///
/// Levels differ here: some lose a flat amount of velocity every tick no
/// matter how long the tick was, others scale the loss by the delta. Both are
/// kept because changing either alters how the level plays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Dive {
    /// Flat velocity loss per tick (tick-rate coupled)
    PerTick(f32),
    /// Velocity loss per second, scaled by the tick delta
    PerSecond(f32),
}

impl Dive {
    /// Velocity lost during a tick of length `dt`
    #[inline]
    pub fn step(self, dt: f32) -> f32 {
        match self {
            Dive::PerTick(amount) => amount,
            Dive::PerSecond(rate) => rate * dt,
        }
    }
}

/// Vertical-speed range used to gate box breaking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedBucket {
    /// velocity > 0
    Ascending,
    /// -10 < velocity <= 0
    SlowDescending,
    /// velocity <= -10
    FastDescending,
}

impl SpeedBucket {
    pub fn from_velocity(velocity: f32) -> Self {
        if velocity > 0.0 {
            SpeedBucket::Ascending
        } else if velocity > FAST_DESCENT {
            SpeedBucket::SlowDescending
        } else {
            SpeedBucket::FastDescending
        }
    }
}

/// The player's craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Craft {
    pub pos: Vec2,
    /// Vertical velocity (units per tick, positive is up)
    pub velocity: f32,
    pub radius: f32,
    pub shielded: bool,
    /// Ticks left during which a spent shield still protects
    #[serde(default)]
    pub grace_ticks: u32,
    dive: Dive,
    fly_impulse: f32,
    max_fall_speed: f32,
    spawn: Vec2,
}

impl Craft {
    pub fn new(spawn: Vec2, radius: f32, dive: Dive, fly_impulse: f32, max_fall_speed: f32) -> Self {
        Self {
            pos: spawn,
            velocity: 0.0,
            radius,
            shielded: false,
            grace_ticks: 0,
            dive,
            fly_impulse,
            max_fall_speed,
            spawn,
        }
    }

    /// Apply the dive and move by the resulting velocity
    pub fn update(&mut self, dt: f32) {
        self.velocity = (self.velocity - self.dive.step(dt)).max(-self.max_fall_speed);
        self.pos.y += self.velocity;
    }

    /// Thrust: velocity becomes the fixed impulse, then one position step
    pub fn fly_up(&mut self) {
        self.velocity = self.fly_impulse;
        self.pos.y += self.velocity;
    }

    /// Evasive push away from something above the craft
    pub fn nudge_down(&mut self) {
        self.velocity = -self.fly_impulse;
        self.pos.y += self.velocity;
    }

    /// Keep the craft inside `[min_y, max_y]`
    pub fn clamp_to_world(&mut self, min_y: f32, max_y: f32) {
        self.pos.y = self.pos.y.clamp(min_y, max_y);
    }

    /// Collision circle at the current position
    #[inline]
    pub fn shape(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    #[inline]
    pub fn speed_bucket(&self) -> SpeedBucket {
        SpeedBucket::from_velocity(self.velocity)
    }

    pub fn grant_shield(&mut self) {
        self.shielded = true;
    }

    /// Drop the shield. Reacting to the hit is up to the caller.
    pub fn consume_shield(&mut self, grace_ticks: u32) {
        self.shielded = false;
        self.grace_ticks = grace_ticks;
    }

    /// True while a hit should be ignored
    #[inline]
    pub fn in_grace(&self) -> bool {
        self.grace_ticks > 0
    }

    pub fn tick_grace(&mut self) {
        self.grace_ticks = self.grace_ticks.saturating_sub(1);
    }

    /// Back to the spawn point, at rest and unshielded
    pub fn reset(&mut self) {
        self.pos = self.spawn;
        self.velocity = 0.0;
        self.shielded = false;
        self.grace_ticks = 0;
    }
}

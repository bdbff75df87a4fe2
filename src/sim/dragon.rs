//! Dragon enemy: a head that drifts, winds up, dives at the craft and returns
//!
//! Mode cycle: `Oscillate` -> `Prepare` -> `Attack` -> `Return` -> `Oscillate`.
//! Attacks only begin once a phase effect unlocks them. The trailing scales
//! are cosmetic and never collide.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shapes::{Circle, Rect, circle_rect_overlap};

/// How close to home x counts as having returned
const RETURN_SLACK: f32 = 5.0;

/// Dragon balance values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragonTuning {
    pub home_x: f32,
    pub home_y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal drift while oscillating (units/s) and its half-range
    pub drift_speed: f32,
    pub drift_range: f32,
    /// Vertical bob while oscillating (units/s) and the head-centre limits
    pub bob_speed: f32,
    pub bob_min: f32,
    pub bob_max: f32,
    pub prepare_seconds: f32,
    /// Half-height of the band recorded for the dive
    pub band_half: f32,
    pub attack_speed: f32,
    pub attack_bob_speed: f32,
    /// How far past the craft the dive carries
    pub overshoot: f32,
    pub return_speed: f32,
    /// Pause between dives once attacks are unlocked
    pub rest_seconds: f32,
    pub scale_speed: f32,
}

/// Dragon behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DragonMode {
    /// Bounded drift and bob near home
    Oscillate,
    /// Horizontal drift frozen, dive band recorded
    Prepare { timer: f32, band_min: f32, band_max: f32 },
    /// Diving left toward (and past) the craft
    Attack { band_min: f32, band_max: f32, target_x: f32 },
    /// Flying back to home x
    Return,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dragon {
    pub pos: Vec2,
    pub mode: DragonMode,
    pub attack_unlocked: bool,
    pub rest_timer: f32,
    /// Trailing particles, oldest first
    #[serde(skip)]
    pub scales: VecDeque<Vec2>,
    drift_dir: f32,
    bob_dir: f32,
    tuning: DragonTuning,
}

/// Move `y` toward the bound it is heading for, flipping at either bound
fn bob(y: f32, dir: f32, speed: f32, min: f32, max: f32, dt: f32) -> (f32, f32) {
    let y = y + dir * speed * dt;
    if y >= max {
        (max, -1.0)
    } else if y <= min {
        (min, 1.0)
    } else {
        (y, dir)
    }
}

impl Dragon {
    pub fn new(tuning: DragonTuning) -> Self {
        Self {
            pos: Vec2::new(tuning.home_x, tuning.home_y),
            mode: DragonMode::Oscillate,
            attack_unlocked: false,
            rest_timer: 0.0,
            scales: VecDeque::new(),
            drift_dir: -1.0,
            bob_dir: 1.0,
            tuning,
        }
    }

    /// Allow dives; the first one starts on the next advance
    pub fn unlock_attack(&mut self) {
        self.attack_unlocked = true;
        self.rest_timer = 0.0;
    }

    pub fn head(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::new(self.tuning.width, self.tuning.height))
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.tuning.width * 0.5
    }

    /// Head centre y when the head overlaps the craft
    pub fn hit_y(&self, craft: &Circle) -> Option<f32> {
        circle_rect_overlap(craft, &self.head()).then_some(self.pos.y)
    }

    pub fn advance(&mut self, dt: f32, craft_x: f32) {
        let t = &self.tuning;
        self.mode = match self.mode {
            DragonMode::Oscillate => {
                self.pos.x += self.drift_dir * t.drift_speed * dt;
                if self.pos.x >= t.home_x + t.drift_range {
                    self.pos.x = t.home_x + t.drift_range;
                    self.drift_dir = -1.0;
                } else if self.pos.x <= t.home_x - t.drift_range {
                    self.pos.x = t.home_x - t.drift_range;
                    self.drift_dir = 1.0;
                }
                (self.pos.y, self.bob_dir) =
                    bob(self.pos.y, self.bob_dir, t.bob_speed, t.bob_min, t.bob_max, dt);

                if self.attack_unlocked {
                    self.rest_timer -= dt;
                }
                if self.attack_unlocked && self.rest_timer <= 0.0 {
                    DragonMode::Prepare {
                        timer: t.prepare_seconds,
                        band_min: (self.pos.y - t.band_half).max(t.bob_min),
                        band_max: (self.pos.y + t.band_half).min(t.bob_max),
                    }
                } else {
                    DragonMode::Oscillate
                }
            }
            DragonMode::Prepare { timer, band_min, band_max } => {
                // Only the drift freezes; the head keeps bobbing inside the band
                (self.pos.y, self.bob_dir) =
                    bob(self.pos.y, self.bob_dir, t.bob_speed, band_min, band_max, dt);
                let timer = timer - dt;
                if timer <= 0.0 {
                    log::debug!("Dragon diving from x={:.1} toward x={:.1}", self.pos.x, craft_x);
                    DragonMode::Attack {
                        band_min,
                        band_max,
                        target_x: craft_x - t.overshoot,
                    }
                } else {
                    DragonMode::Prepare { timer, band_min, band_max }
                }
            }
            DragonMode::Attack { band_min, band_max, target_x } => {
                self.pos.x -= t.attack_speed * dt;
                (self.pos.y, self.bob_dir) =
                    bob(self.pos.y, self.bob_dir, t.attack_bob_speed, band_min, band_max, dt);
                if self.pos.x <= target_x {
                    DragonMode::Return
                } else {
                    DragonMode::Attack { band_min, band_max, target_x }
                }
            }
            DragonMode::Return => {
                self.pos.x += t.return_speed * dt;
                if self.pos.x >= t.home_x - RETURN_SLACK {
                    self.pos.x = self.pos.x.min(t.home_x);
                    self.drift_dir = -1.0;
                    self.rest_timer = t.rest_seconds;
                    DragonMode::Oscillate
                } else {
                    DragonMode::Return
                }
            }
        };

        // Scales drift left and fall away at the left edge
        let shift = self.tuning.scale_speed * dt;
        for scale in self.scales.iter_mut() {
            scale.x -= shift;
        }
        self.scales.retain(|s| s.x >= 0.0);
        self.scales.push_back(self.pos);
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.tuning.clone());
    }
}

//! Warehouse bot: spins, throws its two arms across the world, powers down
//!
//! The body never collides; only released arms do. Each power-on draws a
//! fresh spin goal, and after that many spin cycles the bot cools down
//! before powering on again.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::shapes::{Circle, Rect, circle_rect_overlap};

/// Warehouse bot balance values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotTuning {
    pub x: f32,
    pub y: f32,
    pub body_width: f32,
    pub body_height: f32,
    /// Frames in one spin cycle
    pub frames: u32,
    pub frame_seconds: f32,
    /// Frame on which docked arms are thrown
    pub release_frame: u32,
    pub arm_width: f32,
    pub arm_height: f32,
    /// Arms sit this far above and below the body centre
    pub arm_offset_y: f32,
    pub arm_speed: f32,
    /// Spin goal is drawn from `spin_min..=spin_max`
    pub spin_min: u32,
    pub spin_max: u32,
    pub cooldown_seconds: f32,
}

/// Power/animation state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BotMode {
    /// Idle until a phase effect powers it on
    Dormant,
    Spinning { frame: u32, frame_timer: f32 },
    /// Powered off, waiting to power on again
    Cooldown { timer: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BotArm {
    /// Centre of the arm rectangle
    pub pos: Vec2,
    pub released: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseBot {
    pub mode: BotMode,
    pub spins_done: u32,
    pub spin_goal: u32,
    pub arms: [BotArm; 2],
    tuning: BotTuning,
}

impl WarehouseBot {
    pub fn new(tuning: BotTuning) -> Self {
        let arms = Self::docked_arms(&tuning);
        Self {
            mode: BotMode::Dormant,
            spins_done: 0,
            spin_goal: 0,
            arms,
            tuning,
        }
    }

    fn docked_arms(t: &BotTuning) -> [BotArm; 2] {
        let dock_x = t.x - t.body_width * 0.5;
        [
            BotArm {
                pos: Vec2::new(dock_x, t.y + t.arm_offset_y),
                released: false,
            },
            BotArm {
                pos: Vec2::new(dock_x, t.y - t.arm_offset_y),
                released: false,
            },
        ]
    }

    pub fn body(&self) -> Rect {
        Rect::from_center(
            Vec2::new(self.tuning.x, self.tuning.y),
            Vec2::new(self.tuning.body_width, self.tuning.body_height),
        )
    }

    pub fn arm_rect(&self, arm: &BotArm) -> Rect {
        Rect::from_center(arm.pos, Vec2::new(self.tuning.arm_width, self.tuning.arm_height))
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.tuning.body_width * 0.5
    }

    /// Animation frame for drawing
    pub fn frame(&self) -> u32 {
        match self.mode {
            BotMode::Spinning { frame, .. } => frame,
            BotMode::Dormant | BotMode::Cooldown { .. } => 0,
        }
    }

    pub fn is_powered(&self) -> bool {
        matches!(self.mode, BotMode::Spinning { .. })
    }

    /// Power on from dormancy; no effect otherwise
    pub fn activate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.mode == BotMode::Dormant {
            self.power_on(rng);
        }
    }

    fn power_on<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.spins_done = 0;
        self.spin_goal = rng.random_range(self.tuning.spin_min..=self.tuning.spin_max);
        self.mode = BotMode::Spinning {
            frame: 0,
            frame_timer: 0.0,
        };
        log::debug!("Warehouse bot powered on, spin goal {}", self.spin_goal);
    }

    /// Leftmost released arm, if any are out
    pub fn leading_arm_x(&self) -> Option<f32> {
        self.arms
            .iter()
            .filter(|a| a.released)
            .map(|a| a.pos.x)
            .reduce(f32::min)
    }

    /// Centre y of the first released arm overlapping the craft
    pub fn hit_y(&self, craft: &Circle) -> Option<f32> {
        self.arms
            .iter()
            .filter(|a| a.released)
            .find(|a| circle_rect_overlap(craft, &self.arm_rect(a)))
            .map(|a| a.pos.y)
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        let docked = Self::docked_arms(&self.tuning);
        let half_arm = self.tuning.arm_width * 0.5;
        for (arm, dock) in self.arms.iter_mut().zip(docked) {
            if arm.released {
                arm.pos.x -= self.tuning.arm_speed * dt;
                if arm.pos.x + half_arm < 0.0 {
                    *arm = dock;
                }
            }
        }

        match self.mode {
            BotMode::Dormant => {}
            BotMode::Spinning {
                mut frame,
                mut frame_timer,
            } => {
                frame_timer += dt;
                let mut powered_off = false;
                while frame_timer >= self.tuning.frame_seconds {
                    frame_timer -= self.tuning.frame_seconds;
                    frame += 1;
                    if frame == self.tuning.release_frame && self.arms.iter().all(|a| !a.released) {
                        for arm in self.arms.iter_mut() {
                            arm.released = true;
                        }
                    }
                    if frame == self.tuning.frames {
                        frame = 0;
                        self.spins_done += 1;
                        if self.spins_done >= self.spin_goal {
                            powered_off = true;
                            break;
                        }
                    }
                }
                self.mode = if powered_off {
                    log::debug!("Warehouse bot powering off after {} spins", self.spins_done);
                    BotMode::Cooldown {
                        timer: self.tuning.cooldown_seconds,
                    }
                } else {
                    BotMode::Spinning { frame, frame_timer }
                };
            }
            BotMode::Cooldown { timer } => {
                let timer = timer - dt;
                if timer <= 0.0 {
                    self.power_on(rng);
                } else {
                    self.mode = BotMode::Cooldown { timer };
                }
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.tuning.clone());
    }
}

//! Collectible boxes and bombs

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::shapes::{Circle, circles_overlap};
use super::spawn::Scrolling;

/// What touching a collectible does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Breaks for a point
    Plain,
    /// Breaks for a shield
    ShieldBox,
    /// Fatal unless shielded
    Bomb,
}

/// When a taken collectible leaves its queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalPolicy {
    /// Dropped from the queue on contact
    Immediate,
    /// Flagged consumed and hidden, dropped when it scrolls off
    FlagUntilRetired,
}

/// Relative spawn odds per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindWeights {
    pub plain: u32,
    pub shield_box: u32,
    pub bomb: u32,
}

impl KindWeights {
    pub const PLAIN_ONLY: KindWeights = KindWeights {
        plain: 1,
        shield_box: 0,
        bomb: 0,
    };

    pub fn total(&self) -> u32 {
        self.plain + self.shield_box + self.bomb
    }

    /// Kind for a roll in `0..total()`
    pub fn kind_for(&self, roll: u32) -> CollectibleKind {
        if roll < self.plain {
            CollectibleKind::Plain
        } else if roll < self.plain + self.shield_box {
            CollectibleKind::ShieldBox
        } else {
            CollectibleKind::Bomb
        }
    }

    /// Draw a kind from the seeded RNG; `total()` must be non-zero
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> CollectibleKind {
        self.kind_for(rng.random_range(0..self.total()))
    }
}

/// Vertical sine bob around a base height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bob {
    pub base_y: f32,
    pub amplitude: f32,
    /// Radians per second
    pub rate: f32,
    pub phase: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: CollectibleKind,
    pub consumed: bool,
    /// Leftward speed (units/s)
    pub speed: f32,
    pub bob: Option<Bob>,
}

impl Collectible {
    pub fn spawn(id: u32, pos: Vec2, radius: f32, kind: CollectibleKind, speed: f32) -> Self {
        Self {
            id,
            pos,
            radius,
            kind,
            consumed: false,
            speed,
            bob: None,
        }
    }

    /// Bob around the current height
    pub fn with_bob(mut self, amplitude: f32, rate: f32) -> Self {
        self.bob = Some(Bob {
            base_y: self.pos.y,
            amplitude,
            rate,
            phase: 0.0,
        });
        self
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos.x -= self.speed * dt;
        if let Some(bob) = &mut self.bob {
            bob.phase += bob.rate * dt;
            self.pos.y = bob.base_y + bob.amplitude * bob.phase.sin();
        }
    }

    #[inline]
    pub fn shape(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    /// Consumed collectibles never collide
    pub fn collides_with(&self, craft: &Circle) -> bool {
        !self.consumed && circles_overlap(craft, &self.shape())
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }
}

impl Scrolling for Collectible {
    fn x(&self) -> f32 {
        self.pos.x
    }

    fn extent(&self) -> f32 {
        self.radius
    }
}

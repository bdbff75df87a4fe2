//! Obstacles: everything that kills an unshielded craft on contact
//!
//! Each variant owns its shapes and motion rule. Collision reports the centre
//! y of the piece that was hit so the resolver can pick a nudge direction.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bot::WarehouseBot;
use super::dragon::Dragon;
use super::shapes::{Circle, Rect, Shape};
use super::spawn::Scrolling;

/// Floor and ceiling columns with rounded caps and a passage between them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsteroidPair {
    pub id: u32,
    /// Column centre x
    pub x: f32,
    /// Top of the floor column (bottom of the passage)
    pub floor_top: f32,
    /// Height of the passage
    pub passage: f32,
    /// Column width; the caps have radius `width / 2`
    pub width: f32,
    pub world_height: f32,
    /// Leftward speed (units/s)
    pub speed: f32,
    /// Already counted as passed
    pub passed: bool,
}

impl AsteroidPair {
    #[inline]
    pub fn ceiling_bottom(&self) -> f32 {
        self.floor_top + self.passage
    }

    /// Middle of the passage
    #[inline]
    pub fn passage_center(&self) -> f32 {
        self.floor_top + self.passage * 0.5
    }

    /// Floor column, floor cap, ceiling column, ceiling cap
    pub fn shapes(&self) -> [Shape; 4] {
        let half = self.width * 0.5;
        let ceiling = self.ceiling_bottom();
        [
            Shape::Rect(Rect::from_corner(
                Vec2::new(self.x - half, 0.0),
                Vec2::new(self.width, self.floor_top),
            )),
            Shape::Circle(Circle::new(Vec2::new(self.x, self.floor_top), half)),
            Shape::Rect(Rect::from_corner(
                Vec2::new(self.x - half, ceiling),
                Vec2::new(self.width, self.world_height - ceiling),
            )),
            Shape::Circle(Circle::new(Vec2::new(self.x, ceiling), half)),
        ]
    }
}

/// Floor and ceiling strips spanning the whole world width
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorderPair {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub thickness: f32,
    pub world_height: f32,
    pub speed: f32,
}

impl BorderPair {
    pub fn floor(&self) -> Rect {
        Rect::from_corner(Vec2::new(self.x, 0.0), Vec2::new(self.width, self.thickness))
    }

    pub fn ceiling(&self) -> Rect {
        Rect::from_corner(
            Vec2::new(self.x, self.world_height - self.thickness),
            Vec2::new(self.width, self.thickness),
        )
    }
}

/// Every obstacle variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Obstacle {
    Asteroids(AsteroidPair),
    Borders(BorderPair),
    Dragon(Dragon),
    Bot(WarehouseBot),
}

impl Obstacle {
    /// Advance motion and any internal sub-state
    pub fn advance<R: Rng + ?Sized>(&mut self, dt: f32, craft_x: f32, rng: &mut R) {
        match self {
            Obstacle::Asteroids(a) => a.x -= a.speed * dt,
            Obstacle::Borders(b) => b.x -= b.speed * dt,
            Obstacle::Dragon(d) => d.advance(dt, craft_x),
            Obstacle::Bot(bot) => bot.advance(dt, rng),
        }
    }

    /// Centre y of the first piece overlapping the craft
    pub fn hit_y(&self, craft: &Circle) -> Option<f32> {
        let craft_shape = Shape::Circle(*craft);
        match self {
            Obstacle::Asteroids(a) => a
                .shapes()
                .iter()
                .find(|s| s.overlaps(&craft_shape))
                .map(Shape::center_y),
            Obstacle::Borders(b) => [b.floor(), b.ceiling()]
                .iter()
                .find(|r| Shape::Rect(**r).overlaps(&craft_shape))
                .map(|r| r.center().y),
            Obstacle::Dragon(d) => d.hit_y(craft),
            Obstacle::Bot(bot) => bot.hit_y(craft),
        }
    }

    pub fn collides_with(&self, craft: &Circle) -> bool {
        self.hit_y(craft).is_some()
    }

    /// x watched by position guards: the dragon's head or the leading bot arm
    pub fn tracked_x(&self) -> Option<f32> {
        match self {
            Obstacle::Dragon(d) => Some(d.pos.x),
            Obstacle::Bot(bot) => bot.leading_arm_x(),
            Obstacle::Asteroids(_) | Obstacle::Borders(_) => None,
        }
    }
}

impl Scrolling for Obstacle {
    fn x(&self) -> f32 {
        match self {
            Obstacle::Asteroids(a) => a.x,
            Obstacle::Borders(b) => b.x,
            Obstacle::Dragon(d) => d.pos.x,
            Obstacle::Bot(bot) => bot.body().center().x,
        }
    }

    /// Borders retire on their full width, everything else on its half-width
    fn extent(&self) -> f32 {
        match self {
            Obstacle::Asteroids(a) => a.width * 0.5,
            Obstacle::Borders(b) => b.width,
            Obstacle::Dragon(d) => d.half_width(),
            Obstacle::Bot(bot) => bot.half_width(),
        }
    }
}

//! Draw-call sink fed by the simulation
//!
//! The kernel never touches pixels. Each frame the host hands a sink to
//! [`draw`] and receives one call per visible shape: a sprite id, the
//! bottom-left corner in world units, and an optional size.

use glam::Vec2;

use crate::sim::collectible::CollectibleKind;
use crate::sim::dragon::DragonMode;
use crate::sim::obstacle::Obstacle;
use crate::sim::shapes::{Circle, Rect, Shape};
use crate::sim::state::LevelState;

/// Texture region the host should draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Craft,
    CraftShielded,
    AsteroidColumn,
    AsteroidCap,
    BorderFloor,
    BorderCeiling,
    DragonHead { attacking: bool },
    DragonScale,
    BotBody { frame: u32 },
    BotArm,
    Collectible(CollectibleKind),
}

/// Receiver for draw calls; `size` is `None` for the sprite's natural size
pub trait DrawSink {
    fn draw(&mut self, sprite: SpriteId, x: f32, y: f32, size: Option<Vec2>);
}

/// One recorded call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub sprite: SpriteId,
    pub x: f32,
    pub y: f32,
    pub size: Option<Vec2>,
}

impl DrawSink for Vec<DrawCall> {
    fn draw(&mut self, sprite: SpriteId, x: f32, y: f32, size: Option<Vec2>) {
        self.push(DrawCall { sprite, x, y, size });
    }
}

fn draw_rect(sink: &mut impl DrawSink, sprite: SpriteId, rect: &Rect) {
    sink.draw(sprite, rect.min.x, rect.min.y, Some(rect.size()));
}

fn draw_circle(sink: &mut impl DrawSink, sprite: SpriteId, circle: &Circle) {
    let corner = circle.center - Vec2::splat(circle.radius);
    sink.draw(sprite, corner.x, corner.y, Some(Vec2::splat(circle.radius * 2.0)));
}

fn draw_obstacle(sink: &mut impl DrawSink, obstacle: &Obstacle) {
    match obstacle {
        Obstacle::Asteroids(a) => {
            for shape in a.shapes() {
                match shape {
                    Shape::Rect(r) => draw_rect(sink, SpriteId::AsteroidColumn, &r),
                    Shape::Circle(c) => draw_circle(sink, SpriteId::AsteroidCap, &c),
                }
            }
        }
        Obstacle::Borders(b) => {
            draw_rect(sink, SpriteId::BorderFloor, &b.floor());
            draw_rect(sink, SpriteId::BorderCeiling, &b.ceiling());
        }
        Obstacle::Dragon(d) => {
            // Scales trail behind the head
            for scale in &d.scales {
                sink.draw(SpriteId::DragonScale, scale.x, scale.y, None);
            }
            let attacking = matches!(d.mode, DragonMode::Attack { .. });
            draw_rect(sink, SpriteId::DragonHead { attacking }, &d.head());
        }
        Obstacle::Bot(bot) => {
            draw_rect(sink, SpriteId::BotBody { frame: bot.frame() }, &bot.body());
            for arm in bot.arms.iter().filter(|a| a.released) {
                draw_rect(sink, SpriteId::BotArm, &bot.arm_rect(arm));
            }
        }
    }
}

/// Emit the whole level, back to front
pub fn draw(state: &LevelState, sink: &mut impl DrawSink) {
    for obstacle in state.borders.iter().chain(state.asteroids.iter()) {
        draw_obstacle(sink, obstacle);
    }
    for c in state.collectibles.iter().filter(|c| !c.consumed) {
        draw_circle(sink, SpriteId::Collectible(c.kind), &c.shape());
    }
    if let Some(enemy) = &state.enemy {
        draw_obstacle(sink, enemy);
    }

    let sprite = if state.craft.shielded {
        SpriteId::CraftShielded
    } else {
        SpriteId::Craft
    };
    draw_circle(sink, sprite, &state.craft.shape());
}

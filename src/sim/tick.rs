//! Fixed timestep simulation tick
//!
//! Core game loop that advances one level deterministically.

use glam::Vec2;
use rand::Rng;

use super::collectible::Collectible;
use super::obstacle::{AsteroidPair, BorderPair, Obstacle};
use super::phase::GuardInputs;
use super::resolve::resolve_collisions;
use super::spawn::Scrolling;
use super::state::{GameEvent, LevelState};
use crate::tuning::{CollectibleSpawn, PhaseOrder};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Thrust (tap/click/space)
    pub jump: bool,
}

/// Advance the level by one fixed timestep
///
/// Never fails: a negative or non-finite `dt` counts as zero and anything
/// above the tuning's `max_dt` is clamped to it. Once the terminal part is
/// reached the state is frozen.
pub fn tick(state: &mut LevelState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, state.tuning.max_dt)
    } else {
        0.0
    };

    if state.level_complete {
        return;
    }

    state.time_ticks += 1;

    if state.phase.tick_timers(dt) {
        state.events.push(GameEvent::DialogHidden);
    }

    let order = state.tuning.phase_order;
    if order == PhaseOrder::BeforeMovement {
        evaluate_phase(state);
        if state.level_complete {
            return;
        }
    }

    move_craft(state, input, dt);
    advance_entities(state, dt);
    maintain_lanes(state);
    count_passes(state);

    if let Some(cause) = resolve_collisions(state) {
        state.restart(cause);
        return;
    }

    if order == PhaseOrder::AfterMovement {
        evaluate_phase(state);
    }
}

/// Run the part script once and apply whatever it enters
fn evaluate_phase(state: &mut LevelState) {
    let inputs = GuardInputs {
        score: state.score,
        craft_x: state.craft.pos.x,
        enemy_x: state.enemy.as_ref().and_then(Obstacle::tracked_x),
    };
    let Some(entered) = state.phase.evaluate(&inputs) else {
        return;
    };

    log::info!(
        "{}: {:?} -> {:?} at score {}",
        state.tuning.level.as_str(),
        entered.from,
        entered.to,
        state.score
    );
    state.events.push(GameEvent::PartChanged {
        from: entered.from,
        to: entered.to,
    });
    if let Some(dialog) = entered.dialog {
        state.events.push(GameEvent::DialogShown(dialog));
    }
    if let Some(effect) = entered.effect {
        state.apply_effect(effect);
    }
    if entered.terminal {
        state.level_complete = true;
        state.events.push(GameEvent::LevelComplete { score: state.score });
        log::info!(
            "{} complete with score {} after {} restarts",
            state.tuning.level.as_str(),
            state.score,
            state.attempt
        );
    }
}

fn move_craft(state: &mut LevelState, input: &TickInput, dt: f32) {
    state.craft.tick_grace();
    // A thrust replaces the dive for this tick
    if input.jump {
        state.craft.fly_up();
    } else {
        state.craft.update(dt);
    }
    let (min_y, max_y) = state.tuning.craft_y_range();
    state.craft.clamp_to_world(min_y, max_y);
}

fn advance_entities(state: &mut LevelState, dt: f32) {
    let craft_x = state.craft.pos.x;
    for obstacle in state.asteroids.iter_mut() {
        obstacle.advance(dt, craft_x, &mut state.rng);
    }
    for obstacle in state.borders.iter_mut() {
        obstacle.advance(dt, craft_x, &mut state.rng);
    }
    for collectible in state.collectibles.iter_mut() {
        collectible.advance(dt);
    }
    if let Some(enemy) = state.enemy.as_mut() {
        enemy.advance(dt, craft_x, &mut state.rng);
    }
}

/// Spawn into and retire from every lane the level uses
fn maintain_lanes(state: &mut LevelState) {
    let width = state.tuning.world_width;
    let height = state.tuning.world_height;

    if let Some(field) = &state.tuning.asteroids {
        let rng = &mut state.rng;
        let ids = &mut state.ids;
        let report = state.asteroids.maintain(width, |_| {
            Obstacle::Asteroids(AsteroidPair {
                id: ids.next_id(),
                x: width + field.width * 0.5,
                floor_top: rng.random_range(field.floor_min..=field.floor_max),
                passage: field.passage,
                width: field.width,
                world_height: height,
                speed: field.speed,
                passed: false,
            })
        });
        if report.spawned > 0 {
            log::debug!("Asteroid spawned, {} live", state.asteroids.len());
        }

        // Legacy boxes ride in the passage of the asteroid just spawned
        if let Some(tuning) = &state.tuning.collectibles
            && let CollectibleSpawn::Anchored { chance } = tuning.spawn
            && report.spawned > 0
            && state.rng.random_bool(chance)
            && let Some(Obstacle::Asteroids(tail)) = state.asteroids.tail()
        {
            let pos = Vec2::new(tail.x, tail.passage_center());
            let kind = tuning.weights.pick(&mut state.rng);
            let id = state.ids.next_id();
            state
                .collectibles
                .push(Collectible::spawn(id, pos, tuning.radius, kind, tuning.speed));
        }
    }

    if let Some(borders) = &state.tuning.borders {
        let ids = &mut state.ids;
        // Each border starts where the previous one ends
        state.borders.maintain(width, |tail| {
            Obstacle::Borders(BorderPair {
                id: ids.next_id(),
                x: tail.map_or(0.0, |t| t.x() + width),
                width,
                thickness: borders.thickness,
                world_height: height,
                speed: borders.speed,
            })
        });
    }

    if let Some(tuning) = &state.tuning.collectibles {
        match tuning.spawn {
            CollectibleSpawn::Lane { y_min, y_max, .. } => {
                let rng = &mut state.rng;
                let ids = &mut state.ids;
                let report = state.collectibles.maintain(width, |_| {
                    let y = rng.random_range(y_min..=y_max);
                    let kind = tuning.weights.pick(rng);
                    let collectible = Collectible::spawn(
                        ids.next_id(),
                        Vec2::new(width + tuning.radius, y),
                        tuning.radius,
                        kind,
                        tuning.speed,
                    );
                    match tuning.bob {
                        Some(bob) => collectible.with_bob(bob.amplitude, bob.rate),
                        None => collectible,
                    }
                });
                if report.spawned > 0 {
                    log::debug!("Collectible spawned, {} live", state.collectibles.len());
                }
            }
            CollectibleSpawn::Anchored { .. } => {
                state.collectibles.retire_head();
            }
        }
    }
}

/// Mark asteroids the craft has fully cleared
fn count_passes(state: &mut LevelState) {
    let Some(field) = &state.tuning.asteroids else {
        return;
    };
    let score_on_pass = field.score_on_pass;
    let behind = state.craft.pos.x - state.craft.radius;

    for obstacle in state.asteroids.iter_mut() {
        let Obstacle::Asteroids(asteroid) = obstacle else {
            continue;
        };
        if asteroid.passed || asteroid.x + asteroid.width * 0.5 >= behind {
            continue;
        }
        asteroid.passed = true;
        state.entities_passed += 1;
        if score_on_pass {
            state.score += 1;
            state.events.push(GameEvent::Scored { score: state.score });
        }
    }
}

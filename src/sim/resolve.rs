//! Collision resolution policy
//!
//! Runs once per tick after everything has moved. Obstacles kill an
//! unshielded craft; a shield is spent instead and the craft is nudged away
//! from the piece it hit. Collectibles break, bounce, or kill depending on
//! their kind and on the craft's speed bucket at the moment of contact.

use super::collectible::{CollectibleKind, RemovalPolicy};
use super::craft::{Craft, SpeedBucket};
use super::state::{GameEvent, LevelState, RestartCause};

/// Push the craft away from a piece centred at `hit_y`
fn evade(craft: &mut Craft, hit_y: f32) {
    if craft.pos.y >= hit_y {
        craft.fly_up();
    } else {
        craft.nudge_down();
    }
}

/// Resolve obstacle hits; returns the cause if the attempt is over
fn resolve_obstacles(state: &mut LevelState) -> Option<RestartCause> {
    if state.craft.in_grace() {
        return None;
    }
    let shape = state.craft.shape();
    let hit_y = state
        .asteroids
        .iter()
        .chain(state.borders.iter())
        .chain(state.enemy.iter())
        .find_map(|o| o.hit_y(&shape))?;

    if !state.craft.shielded {
        return Some(RestartCause::Obstacle);
    }
    state.craft.consume_shield(state.tuning.shield_grace_ticks);
    evade(&mut state.craft, hit_y);
    state.events.push(GameEvent::ShieldLost);
    log::debug!("Shield absorbed an obstacle hit at y={:.1}", hit_y);
    None
}

/// Resolve collectible contacts; returns the cause if a bomb was fatal
fn resolve_collectibles(state: &mut LevelState) -> Option<RestartCause> {
    let tuning = state.tuning.collectibles.as_ref()?;
    let gated = tuning.bucket_gated;
    let removal = tuning.removal;

    // Bucket comes from the velocity at the moment of contact
    let bucket = state.craft.speed_bucket();
    let shape = state.craft.shape();
    let hits: Vec<usize> = state
        .collectibles
        .iter()
        .enumerate()
        .filter(|(_, c)| c.collides_with(&shape))
        .map(|(i, _)| i)
        .collect();

    let mut taken = Vec::new();
    for index in hits {
        let Some(c) = state.collectibles.get(index) else {
            continue;
        };
        let (kind, y) = (c.kind, c.pos.y);

        match kind {
            CollectibleKind::Bomb => {
                if state.craft.in_grace() {
                    continue;
                }
                if !state.craft.shielded {
                    return Some(RestartCause::Bomb);
                }
                state.craft.consume_shield(state.tuning.shield_grace_ticks);
                state.events.push(GameEvent::ShieldLost);
                state.events.push(GameEvent::CollectibleTaken { kind });
                taken.push(index);
            }
            CollectibleKind::Plain | CollectibleKind::ShieldBox => {
                if gated && bucket != SpeedBucket::FastDescending {
                    if state.craft.pos.y > y {
                        state.craft.fly_up();
                    } else {
                        state.craft.nudge_down();
                    }
                    state.events.push(GameEvent::Bounced);
                    continue;
                }
                if kind == CollectibleKind::Plain {
                    state.score += 1;
                    state.events.push(GameEvent::Scored { score: state.score });
                } else {
                    state.craft.grant_shield();
                    state.events.push(GameEvent::ShieldGained);
                }
                state.events.push(GameEvent::CollectibleTaken { kind });
                taken.push(index);
            }
        }
    }

    match removal {
        RemovalPolicy::Immediate => {
            for index in taken.into_iter().rev() {
                state.collectibles.remove(index);
            }
        }
        RemovalPolicy::FlagUntilRetired => {
            for index in taken {
                if let Some(c) = state.collectibles.get_mut(index) {
                    c.consume();
                }
            }
        }
    }
    None
}

/// Resolve every contact for this tick
///
/// Obstacles are handled first; a fatal obstacle hit skips the collectibles.
/// The craft is clamped back into the world afterwards since nudges can push
/// it past either edge.
pub fn resolve_collisions(state: &mut LevelState) -> Option<RestartCause> {
    let fatal = resolve_obstacles(state).or_else(|| resolve_collectibles(state));
    let (min_y, max_y) = state.tuning.craft_y_range();
    state.craft.clamp_to_world(min_y, max_y);
    fatal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collectible::Collectible;
    use crate::sim::obstacle::{AsteroidPair, Obstacle};
    use crate::tuning::{LevelId, LevelTuning};
    use glam::Vec2;

    fn level(id: LevelId) -> LevelState {
        LevelState::new(LevelTuning::preset(id), 42).expect("valid preset")
    }

    fn place(state: &mut LevelState, kind: CollectibleKind) {
        let id = state.ids.next_id();
        let pos = state.craft.pos + Vec2::new(10.0, 0.0);
        state
            .collectibles
            .push(Collectible::spawn(id, pos, 22.0, kind, 180.0));
    }

    fn asteroid_at_craft(state: &mut LevelState, floor_top: f32) {
        let id = state.ids.next_id();
        state.asteroids.push(Obstacle::Asteroids(AsteroidPair {
            id,
            x: state.craft.pos.x,
            floor_top,
            passage: 225.0,
            width: 70.0,
            world_height: 480.0,
            speed: 180.0,
            passed: false,
        }));
    }

    #[test]
    fn test_fast_descent_breaks_plain_box() {
        let mut state = level(LevelId::AdventureOne);
        state.craft.velocity = -12.0;
        place(&mut state, CollectibleKind::Plain);

        assert_eq!(resolve_collisions(&mut state), None);
        assert_eq!(state.score, 1);
        assert!(state.collectibles.is_empty());
        assert_eq!(state.craft.velocity, -12.0);
    }

    #[test]
    fn test_slow_descent_bounces_off_box() {
        let mut state = level(LevelId::AdventureOne);
        state.craft.velocity = -3.0;
        place(&mut state, CollectibleKind::ShieldBox);
        // Craft slightly above the box
        if let Some(c) = state.collectibles.get_mut(0) {
            c.pos.y -= 5.0;
        }

        assert_eq!(resolve_collisions(&mut state), None);
        assert_eq!(state.collectibles.len(), 1);
        assert!(!state.craft.shielded);
        assert_eq!(state.craft.velocity, 8.0);
        assert!(state.events.contains(&GameEvent::Bounced));
    }

    #[test]
    fn test_ascending_below_box_is_pushed_down() {
        let mut state = level(LevelId::AdventureOne);
        state.craft.velocity = 5.0;
        place(&mut state, CollectibleKind::Plain);
        if let Some(c) = state.collectibles.get_mut(0) {
            c.pos.y += 5.0;
        }

        resolve_collisions(&mut state);
        assert_eq!(state.craft.velocity, -8.0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_fast_descent_shield_box_grants_shield() {
        let mut state = level(LevelId::AdventureOne);
        state.craft.velocity = -10.0;
        place(&mut state, CollectibleKind::ShieldBox);

        resolve_collisions(&mut state);
        assert!(state.craft.shielded);
        assert_eq!(state.score, 0);
        assert!(state.events.contains(&GameEvent::ShieldGained));
    }

    #[test]
    fn test_bomb_is_fatal_unshielded() {
        let mut state = level(LevelId::AdventureTwo);
        place(&mut state, CollectibleKind::Bomb);
        assert_eq!(resolve_collisions(&mut state), Some(RestartCause::Bomb));
    }

    #[test]
    fn test_shield_absorbs_bomb() {
        let mut state = level(LevelId::AdventureTwo);
        state.craft.grant_shield();
        let velocity = state.craft.velocity;
        place(&mut state, CollectibleKind::Bomb);

        assert_eq!(resolve_collisions(&mut state), None);
        assert!(!state.craft.shielded);
        assert!(state.collectibles.is_empty());
        assert_eq!(state.craft.velocity, velocity);
    }

    #[test]
    fn test_legacy_flags_and_keeps_taken_collectible() {
        let mut state = level(LevelId::Legacy);
        // Not gated: any speed breaks the box
        state.craft.velocity = 4.0;
        place(&mut state, CollectibleKind::Plain);

        resolve_collisions(&mut state);
        assert_eq!(state.score, 1);
        assert_eq!(state.collectibles.len(), 1);
        assert!(state.collectibles.get(0).is_some_and(|c| c.consumed));

        // Consumed boxes stop colliding
        resolve_collisions(&mut state);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_obstacle_hit_is_fatal_unshielded() {
        let mut state = level(LevelId::AdventureOne);
        asteroid_at_craft(&mut state, 100.0);
        assert_eq!(resolve_collisions(&mut state), None);

        state.craft.pos.y = 90.0;
        assert_eq!(resolve_collisions(&mut state), Some(RestartCause::Obstacle));
    }

    #[test]
    fn test_shield_absorbs_obstacle_and_nudges_away() {
        let mut state = level(LevelId::AdventureOne);
        asteroid_at_craft(&mut state, 100.0);
        state.craft.grant_shield();
        // Touching the ceiling cap from below
        state.craft.pos.y = 300.0;

        assert_eq!(resolve_collisions(&mut state), None);
        assert!(!state.craft.shielded);
        assert_eq!(state.craft.velocity, -8.0);
        assert!(state.craft.in_grace());

        // Still overlapping, but protected during the grace window
        state.craft.pos.y = 300.0;
        assert_eq!(resolve_collisions(&mut state), None);
    }
}

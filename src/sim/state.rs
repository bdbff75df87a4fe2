//! Level state and core simulation types
//!
//! One `LevelState` owns everything a level mutates: the craft, every lane,
//! the enemy, the part script, counters, and the seeded RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bot::WarehouseBot;
use super::collectible::{Collectible, CollectibleKind};
use super::craft::Craft;
use super::dragon::Dragon;
use super::obstacle::Obstacle;
use super::phase::{DialogId, Part, PhaseEffect, PhaseMachine};
use super::spawn::SpawnQueue;
use crate::error::ConfigError;
use crate::tuning::{CollectibleSpawn, LevelTuning};

/// What ended an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartCause {
    Obstacle,
    Bomb,
}

/// Things the host may want to react to (dialogs, sounds, menus)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PartChanged { from: Part, to: Part },
    DialogShown(DialogId),
    DialogHidden,
    EffectApplied(PhaseEffect),
    Scored { score: u32 },
    CollectibleTaken { kind: CollectibleKind },
    ShieldGained,
    ShieldLost,
    Bounced,
    Restarted { cause: RestartCause, score: u32, attempt: u32 },
    LevelComplete { score: u32 },
}

/// Monotonic entity ids
#[derive(Debug, Clone)]
pub struct IdGen(u32);

impl IdGen {
    pub fn next_id(&mut self) -> u32 {
        let id = self.0;
        self.0 += 1;
        id
    }
}

/// Complete state of one running level
#[derive(Debug, Clone)]
pub struct LevelState {
    pub tuning: LevelTuning,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Restarts so far
    pub attempt: u32,
    pub rng: Pcg32,
    pub craft: Craft,
    pub asteroids: SpawnQueue<Obstacle>,
    pub borders: SpawnQueue<Obstacle>,
    pub collectibles: SpawnQueue<Collectible>,
    /// The level's dragon or warehouse bot
    pub enemy: Option<Obstacle>,
    pub phase: PhaseMachine,
    pub score: u32,
    pub entities_passed: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Terminal part reached; ticks are frozen
    pub level_complete: bool,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
    pub ids: IdGen,
}

impl LevelState {
    /// Validate the tuning and build a level at its starting point
    pub fn new(tuning: LevelTuning, seed: u64) -> Result<Self, ConfigError> {
        tuning.validate()?;

        let c = &tuning.craft;
        let craft = Craft::new(
            Vec2::new(c.x, c.spawn_y),
            c.radius,
            c.dive,
            c.fly_impulse,
            c.max_fall_speed,
        );
        let asteroid_gap = tuning.asteroids.as_ref().map_or(0.0, |a| a.spawn_gap);
        let collectible_gap = match tuning.collectibles.as_ref().map(|c| &c.spawn) {
            Some(CollectibleSpawn::Lane { gap, .. }) => *gap,
            _ => 0.0,
        };
        let enemy = match (&tuning.dragon, &tuning.bot) {
            (Some(dragon), _) => Some(Obstacle::Dragon(Dragon::new(dragon.clone()))),
            (None, Some(bot)) => Some(Obstacle::Bot(WarehouseBot::new(bot.clone()))),
            (None, None) => None,
        };
        let phase = PhaseMachine::new(tuning.script.clone(), tuning.dialog_seconds);
        let borders = SpawnQueue::with_min_live(tuning.world_width, 2);

        log::info!("Level {} starting with seed {}", tuning.level.as_str(), seed);

        Ok(Self {
            seed,
            attempt: 0,
            rng: Pcg32::seed_from_u64(seed),
            craft,
            asteroids: SpawnQueue::new(asteroid_gap),
            borders,
            collectibles: SpawnQueue::new(collectible_gap),
            enemy,
            phase,
            score: 0,
            entities_passed: 0,
            time_ticks: 0,
            level_complete: false,
            events: Vec::new(),
            ids: IdGen(1),
            tuning,
        })
    }

    /// Share of the level's script completed, for the progress bar
    pub fn progress(&self) -> f32 {
        self.phase.progress()
    }

    #[inline]
    pub fn part(&self) -> Part {
        self.phase.part
    }

    /// Hand the accumulated events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Dragon, when the level has one
    pub fn dragon(&self) -> Option<&Dragon> {
        match &self.enemy {
            Some(Obstacle::Dragon(d)) => Some(d),
            _ => None,
        }
    }

    /// Warehouse bot, when the level has one
    pub fn bot(&self) -> Option<&WarehouseBot> {
        match &self.enemy {
            Some(Obstacle::Bot(b)) => Some(b),
            _ => None,
        }
    }

    /// Apply a part's one-shot effect to the enemy
    pub fn apply_effect(&mut self, effect: PhaseEffect) {
        match (effect, &mut self.enemy) {
            (PhaseEffect::UnlockDragonAttack, Some(Obstacle::Dragon(d))) => d.unlock_attack(),
            (PhaseEffect::ActivateBot, Some(Obstacle::Bot(b))) => b.activate(&mut self.rng),
            _ => {}
        }
        self.events.push(GameEvent::EffectApplied(effect));
    }

    /// Full in-place reset after a fatal hit
    pub fn restart(&mut self, cause: RestartCause) {
        self.attempt += 1;
        log::info!(
            "Restart #{} on {} ({:?}) at {:?} with score {}",
            self.attempt,
            self.tuning.level.as_str(),
            cause,
            self.phase.part,
            self.score
        );
        self.events.push(GameEvent::Restarted {
            cause,
            score: self.score,
            attempt: self.attempt,
        });

        self.rng = Pcg32::seed_from_u64(self.seed.wrapping_add(u64::from(self.attempt)));
        self.craft.reset();
        self.asteroids.clear();
        self.borders.clear();
        self.collectibles.clear();
        match &mut self.enemy {
            Some(Obstacle::Dragon(d)) => d.reset(),
            Some(Obstacle::Bot(b)) => b.reset(),
            _ => {}
        }
        self.phase.reset();
        self.score = 0;
        self.entities_passed = 0;
        self.level_complete = false;
    }
}

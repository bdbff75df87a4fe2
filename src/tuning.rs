//! Data-driven level balance
//!
//! Every number a level needs lives in a [`LevelTuning`]. The four built-in
//! levels come from [`LevelTuning::preset`]; a JSON file with the same shape
//! can replace one. Tunings are validated once, before a level starts, so the
//! tick loop never has to check them.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::progress::ProgressStore;
use crate::sim::bot::BotTuning;
use crate::sim::collectible::{KindWeights, RemovalPolicy};
use crate::sim::craft::Dive;
use crate::sim::dragon::DragonTuning;
use crate::sim::phase::{Guard, PhaseEffect, Transition};

/// Most transitions a script may hold (five parts)
pub const MAX_TRANSITIONS: usize = 4;

/// The playable levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelId {
    /// Endless asteroid run
    Legacy,
    AdventureOne,
    AdventureTwo,
    AdventureThree,
}

impl LevelId {
    pub const ALL: [LevelId; 4] = [
        LevelId::Legacy,
        LevelId::AdventureOne,
        LevelId::AdventureTwo,
        LevelId::AdventureThree,
    ];

    /// Index used by the progress store
    pub fn index(self) -> u32 {
        match self {
            LevelId::Legacy => 0,
            LevelId::AdventureOne => 1,
            LevelId::AdventureTwo => 2,
            LevelId::AdventureThree => 3,
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.index() == index)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelId::Legacy => "legacy",
            LevelId::AdventureOne => "adventure-1",
            LevelId::AdventureTwo => "adventure-2",
            LevelId::AdventureThree => "adventure-3",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "legacy" | "0" => Some(LevelId::Legacy),
            "adventure-1" | "1" => Some(LevelId::AdventureOne),
            "adventure-2" | "2" => Some(LevelId::AdventureTwo),
            "adventure-3" | "3" => Some(LevelId::AdventureThree),
            _ => None,
        }
    }

    /// Adventure levels before this one
    fn predecessor(self) -> Option<LevelId> {
        match self {
            LevelId::Legacy | LevelId::AdventureOne => None,
            LevelId::AdventureTwo => Some(LevelId::AdventureOne),
            LevelId::AdventureThree => Some(LevelId::AdventureTwo),
        }
    }

    /// Playable once the previous adventure level is complete
    pub fn is_unlocked(self, store: &impl ProgressStore) -> bool {
        self.predecessor()
            .is_none_or(|prev| store.is_level_complete(prev.index()))
    }
}

/// Whether the part script runs before or after entities move in a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseOrder {
    BeforeMovement,
    AfterMovement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CraftTuning {
    pub x: f32,
    pub spawn_y: f32,
    pub radius: f32,
    /// Velocity set by a thrust (units per tick)
    pub fly_impulse: f32,
    pub dive: Dive,
    pub max_fall_speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsteroidTuning {
    pub speed: f32,
    pub spawn_gap: f32,
    pub passage: f32,
    pub width: f32,
    /// Range for the top of the floor column
    pub floor_min: f32,
    pub floor_max: f32,
    /// Passing an asteroid scores a point
    pub score_on_pass: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorderTuning {
    pub speed: f32,
    pub thickness: f32,
}

/// Where collectibles come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CollectibleSpawn {
    /// Their own lane with a spawn gap and a height band
    Lane { gap: f32, y_min: f32, y_max: f32 },
    /// Placed in the passage of newly spawned asteroids
    Anchored { chance: f64 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BobTuning {
    pub amplitude: f32,
    pub rate: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleTuning {
    pub speed: f32,
    pub radius: f32,
    pub spawn: CollectibleSpawn,
    pub weights: KindWeights,
    /// Boxes only break when hit in the fast-descending bucket
    pub bucket_gated: bool,
    pub removal: RemovalPolicy,
    #[serde(default)]
    pub bob: Option<BobTuning>,
}

/// Complete balance for one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelTuning {
    pub level: LevelId,
    pub world_width: f32,
    pub world_height: f32,
    /// Largest delta one tick accepts; larger deltas are clamped
    pub max_dt: f32,
    pub craft: CraftTuning,
    #[serde(default)]
    pub asteroids: Option<AsteroidTuning>,
    #[serde(default)]
    pub borders: Option<BorderTuning>,
    #[serde(default)]
    pub collectibles: Option<CollectibleTuning>,
    #[serde(default)]
    pub dragon: Option<DragonTuning>,
    #[serde(default)]
    pub bot: Option<BotTuning>,
    #[serde(default)]
    pub script: Vec<Transition>,
    pub phase_order: PhaseOrder,
    pub dialog_seconds: f32,
    /// Ticks of protection after a shield absorbs a hit
    pub shield_grace_ticks: u32,
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn gap_clears_step(lane: &'static str, gap: f32, speed: f32, max_dt: f32) -> Result<(), ConfigError> {
    let step = speed * max_dt;
    if gap > step {
        Ok(())
    } else {
        Err(ConfigError::GapTooSmall { lane, gap, step })
    }
}

impl LevelTuning {
    /// Built-in balance for a level
    pub fn preset(level: LevelId) -> Self {
        match level {
            LevelId::Legacy => Self::legacy(),
            LevelId::AdventureOne => Self::adventure_one(),
            LevelId::AdventureTwo => Self::adventure_two(),
            LevelId::AdventureThree => Self::adventure_three(),
        }
    }

    /// Parse and validate a tuning file
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: LevelTuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn base(level: LevelId, dive: Dive, phase_order: PhaseOrder) -> Self {
        Self {
            level,
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            max_dt: MAX_DT,
            craft: CraftTuning {
                x: CRAFT_X,
                spawn_y: WORLD_HEIGHT * 0.5,
                radius: CRAFT_RADIUS,
                fly_impulse: FLY_IMPULSE,
                dive,
                max_fall_speed: MAX_FALL_SPEED,
            },
            asteroids: None,
            borders: None,
            collectibles: None,
            dragon: None,
            bot: None,
            script: Vec::new(),
            phase_order,
            dialog_seconds: DIALOG_SECONDS,
            shield_grace_ticks: 30,
        }
    }

    fn asteroid_field(score_on_pass: bool) -> AsteroidTuning {
        AsteroidTuning {
            speed: SCROLL_SPEED,
            spawn_gap: 340.0,
            passage: 225.0,
            width: 70.0,
            floor_min: 60.0,
            floor_max: 195.0,
            score_on_pass,
        }
    }

    fn legacy() -> Self {
        let mut t = Self::base(LevelId::Legacy, Dive::PerTick(DIVE_PER_TICK), PhaseOrder::AfterMovement);
        t.asteroids = Some(Self::asteroid_field(true));
        t.collectibles = Some(CollectibleTuning {
            speed: SCROLL_SPEED,
            radius: 18.0,
            spawn: CollectibleSpawn::Anchored { chance: 0.5 },
            weights: KindWeights::PLAIN_ONLY,
            bucket_gated: false,
            removal: RemovalPolicy::FlagUntilRetired,
            bob: None,
        });
        t
    }

    fn adventure_one() -> Self {
        let mut t = Self::base(
            LevelId::AdventureOne,
            Dive::PerTick(DIVE_PER_TICK),
            PhaseOrder::AfterMovement,
        );
        t.asteroids = Some(Self::asteroid_field(false));
        t.collectibles = Some(CollectibleTuning {
            speed: SCROLL_SPEED,
            radius: 22.0,
            spawn: CollectibleSpawn::Lane {
                gap: 260.0,
                y_min: 90.0,
                y_max: 390.0,
            },
            weights: KindWeights {
                plain: 80,
                shield_box: 20,
                bomb: 0,
            },
            bucket_gated: true,
            removal: RemovalPolicy::Immediate,
            bob: None,
        });
        t.script = vec![
            Transition::new(Guard::Score(3)).with_dialog(1),
            Transition::new(Guard::Score(8)).with_dialog(2),
            Transition::new(Guard::Elapsed(20.0)).with_dialog(3),
            Transition::new(Guard::Score(15)).with_dialog(4),
        ];
        t
    }

    fn adventure_two() -> Self {
        let mut t = Self::base(
            LevelId::AdventureTwo,
            Dive::PerSecond(DIVE_PER_TICK / SIM_DT),
            PhaseOrder::BeforeMovement,
        );
        t.borders = Some(BorderTuning {
            speed: SCROLL_SPEED,
            thickness: 36.0,
        });
        t.collectibles = Some(CollectibleTuning {
            speed: 200.0,
            radius: 22.0,
            spawn: CollectibleSpawn::Lane {
                gap: 300.0,
                y_min: 110.0,
                y_max: 370.0,
            },
            weights: KindWeights {
                plain: 60,
                shield_box: 15,
                bomb: 25,
            },
            bucket_gated: true,
            removal: RemovalPolicy::Immediate,
            bob: Some(BobTuning {
                amplitude: 30.0,
                rate: 2.0,
            }),
        });
        t.dragon = Some(DragonTuning {
            home_x: 640.0,
            home_y: WORLD_HEIGHT * 0.5,
            width: 110.0,
            height: 70.0,
            drift_speed: 40.0,
            drift_range: 50.0,
            bob_speed: 90.0,
            bob_min: 130.0,
            bob_max: 350.0,
            prepare_seconds: 0.8,
            band_half: 50.0,
            attack_speed: 320.0,
            attack_bob_speed: 140.0,
            overshoot: 120.0,
            return_speed: 200.0,
            rest_seconds: 3.0,
            scale_speed: 260.0,
        });
        t.script = vec![
            Transition::new(Guard::Score(3)).with_dialog(1),
            Transition::new(Guard::Score(6))
                .with_effect(PhaseEffect::UnlockDragonAttack)
                .with_dialog(2),
            Transition::new(Guard::EnemyPassed { offset: 0.0 }).with_dialog(3),
            Transition::new(Guard::Elapsed(15.0)).with_dialog(4),
        ];
        t
    }

    fn adventure_three() -> Self {
        let mut t = Self::base(
            LevelId::AdventureThree,
            Dive::PerSecond(DIVE_PER_TICK / SIM_DT),
            PhaseOrder::BeforeMovement,
        );
        t.asteroids = Some(Self::asteroid_field(false));
        t.collectibles = Some(CollectibleTuning {
            speed: SCROLL_SPEED,
            radius: 22.0,
            spawn: CollectibleSpawn::Lane {
                gap: 280.0,
                y_min: 90.0,
                y_max: 390.0,
            },
            weights: KindWeights {
                plain: 70,
                shield_box: 10,
                bomb: 20,
            },
            bucket_gated: true,
            removal: RemovalPolicy::Immediate,
            bob: None,
        });
        t.bot = Some(BotTuning {
            x: 690.0,
            y: WORLD_HEIGHT * 0.5,
            body_width: 90.0,
            body_height: 120.0,
            frames: 8,
            frame_seconds: 0.07,
            release_frame: 5,
            arm_width: 100.0,
            arm_height: 22.0,
            arm_offset_y: 70.0,
            arm_speed: 300.0,
            spin_min: 3,
            spin_max: 6,
            cooldown_seconds: 2.5,
        });
        t.script = vec![
            Transition::new(Guard::Score(4))
                .with_effect(PhaseEffect::ActivateBot)
                .with_dialog(1),
            Transition::new(Guard::Elapsed(20.0)).with_dialog(2),
            Transition::new(Guard::Score(12)).with_dialog(3),
        ];
        t
    }

    /// Craft y range kept by the clamp
    pub fn craft_y_range(&self) -> (f32, f32) {
        (self.craft.radius, self.world_height - self.craft.radius)
    }

    /// Check every precondition the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("world_width", self.world_width)?;
        positive("world_height", self.world_height)?;
        positive("max_dt", self.max_dt)?;
        positive("craft.radius", self.craft.radius)?;
        positive("craft.fly_impulse", self.craft.fly_impulse)?;
        positive("craft.max_fall_speed", self.craft.max_fall_speed)?;
        positive("dialog_seconds", self.dialog_seconds)?;

        let (min_y, max_y) = self.craft_y_range();
        if !(min_y..=max_y).contains(&self.craft.spawn_y) {
            return Err(ConfigError::SpawnOutOfBounds {
                y: self.craft.spawn_y,
                min: min_y,
                max: max_y,
            });
        }

        if let Some(a) = &self.asteroids {
            positive("asteroids.speed", a.speed)?;
            positive("asteroids.width", a.width)?;
            gap_clears_step("asteroids", a.spawn_gap, a.speed, self.max_dt)?;
            if a.floor_min <= 0.0 || a.floor_min > a.floor_max || a.floor_max + a.passage >= self.world_height {
                return Err(ConfigError::FloorRange {
                    min: a.floor_min,
                    max: a.floor_max,
                });
            }
            // Both caps bulge half a width into the passage
            if a.passage - a.width <= self.craft.radius * 2.0 {
                return Err(ConfigError::PassageTooNarrow {
                    passage: a.passage,
                    radius: self.craft.radius,
                });
            }
        }

        if let Some(b) = &self.borders {
            positive("borders.speed", b.speed)?;
            positive("borders.thickness", b.thickness)?;
            gap_clears_step("borders", self.world_width, b.speed, self.max_dt)?;
        }

        if let Some(c) = &self.collectibles {
            positive("collectibles.speed", c.speed)?;
            positive("collectibles.radius", c.radius)?;
            if c.weights.total() == 0 {
                return Err(ConfigError::NoCollectibleKinds);
            }
            match c.spawn {
                CollectibleSpawn::Lane { gap, y_min, y_max } => {
                    gap_clears_step("collectibles", gap, c.speed, self.max_dt)?;
                    if y_min > y_max || y_min < 0.0 || y_max > self.world_height {
                        return Err(ConfigError::CollectibleBand { min: y_min, max: y_max });
                    }
                }
                CollectibleSpawn::Anchored { chance } => {
                    if !(0.0..=1.0).contains(&chance) {
                        return Err(ConfigError::AnchorChance(chance));
                    }
                }
            }
        }

        if let Some(d) = &self.dragon {
            positive("dragon.width", d.width)?;
            positive("dragon.height", d.height)?;
            positive("dragon.drift_speed", d.drift_speed)?;
            positive("dragon.bob_speed", d.bob_speed)?;
            positive("dragon.prepare_seconds", d.prepare_seconds)?;
            positive("dragon.band_half", d.band_half)?;
            positive("dragon.attack_speed", d.attack_speed)?;
            positive("dragon.attack_bob_speed", d.attack_bob_speed)?;
            positive("dragon.return_speed", d.return_speed)?;
            positive("dragon.rest_seconds", d.rest_seconds)?;
            positive("dragon.scale_speed", d.scale_speed)?;
            if d.bob_min >= d.bob_max || d.bob_min < 0.0 || d.bob_max > self.world_height {
                return Err(ConfigError::BobRange {
                    min: d.bob_min,
                    max: d.bob_max,
                });
            }
        }

        if let Some(bot) = &self.bot {
            positive("bot.body_width", bot.body_width)?;
            positive("bot.body_height", bot.body_height)?;
            positive("bot.frame_seconds", bot.frame_seconds)?;
            positive("bot.arm_width", bot.arm_width)?;
            positive("bot.arm_height", bot.arm_height)?;
            positive("bot.arm_speed", bot.arm_speed)?;
            positive("bot.cooldown_seconds", bot.cooldown_seconds)?;
            if bot.spin_min == 0 || bot.spin_min > bot.spin_max {
                return Err(ConfigError::SpinGoal {
                    min: bot.spin_min,
                    max: bot.spin_max,
                });
            }
            if bot.release_frame >= bot.frames {
                return Err(ConfigError::ReleaseFrame {
                    frame: bot.release_frame,
                    frames: bot.frames,
                });
            }
        }

        if self.script.len() > MAX_TRANSITIONS {
            return Err(ConfigError::ScriptTooLong {
                count: self.script.len(),
                max: MAX_TRANSITIONS,
            });
        }
        for (index, transition) in self.script.iter().enumerate() {
            let missing = match transition.effect {
                Some(PhaseEffect::UnlockDragonAttack) if self.dragon.is_none() => Some("dragon"),
                Some(PhaseEffect::ActivateBot) if self.bot.is_none() => Some("warehouse bot"),
                _ => None,
            };
            let missing = missing.or(match transition.guard {
                Guard::EnemyPassed { .. } if self.dragon.is_none() && self.bot.is_none() => {
                    Some("tracked enemy")
                }
                _ => None,
            });
            if let Some(enemy) = missing {
                return Err(ConfigError::MissingEnemy { index, enemy });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Progress;

    #[test]
    fn test_presets_validate() {
        for level in LevelId::ALL {
            let tuning = LevelTuning::preset(level);
            assert_eq!(tuning.level, level);
            tuning.validate().unwrap_or_else(|e| panic!("{:?}: {}", level, e));
        }
    }

    #[test]
    fn test_gap_must_clear_one_step() {
        let mut tuning = LevelTuning::preset(LevelId::AdventureOne);
        if let Some(a) = tuning.asteroids.as_mut() {
            a.spawn_gap = 10.0;
        }
        assert!(matches!(tuning.validate(), Err(ConfigError::GapTooSmall { lane: "asteroids", .. })));
    }

    #[test]
    fn test_spawn_outside_clamp_is_rejected() {
        let mut tuning = LevelTuning::preset(LevelId::Legacy);
        tuning.craft.spawn_y = 5.0;
        assert!(matches!(tuning.validate(), Err(ConfigError::SpawnOutOfBounds { .. })));
    }

    #[test]
    fn test_effect_without_enemy_is_rejected() {
        let mut tuning = LevelTuning::preset(LevelId::AdventureOne);
        tuning.script[0].effect = Some(PhaseEffect::UnlockDragonAttack);
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::MissingEnemy { index: 0, enemy: "dragon" })
        ));
    }

    #[test]
    fn test_negative_max_dt_is_rejected() {
        let mut tuning = LevelTuning::preset(LevelId::AdventureTwo);
        tuning.max_dt = -0.1;
        assert!(matches!(tuning.validate(), Err(ConfigError::NonPositive { name: "max_dt", .. })));
    }

    #[test]
    fn test_stalled_dragon_is_rejected() {
        for name in ["scale_speed", "return_speed", "attack_speed"] {
            let mut tuning = LevelTuning::preset(LevelId::AdventureTwo);
            if let Some(d) = tuning.dragon.as_mut() {
                match name {
                    "scale_speed" => d.scale_speed = 0.0,
                    "return_speed" => d.return_speed = 0.0,
                    _ => d.attack_speed = -5.0,
                }
            }
            let json = tuning.to_json().expect("serialize");
            assert!(
                matches!(
                    LevelTuning::from_json(&json),
                    Err(ConfigError::NonPositive { name: n, .. }) if n.ends_with(name)
                ),
                "{} accepted",
                name
            );
        }
    }

    #[test]
    fn test_inverted_dragon_bob_is_rejected() {
        let mut tuning = LevelTuning::preset(LevelId::AdventureTwo);
        if let Some(d) = tuning.dragon.as_mut() {
            d.bob_min = 350.0;
            d.bob_max = 130.0;
        }
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::BobRange { min, max }) if min > max
        ));
    }

    #[test]
    fn test_bot_sizes_and_cooldown_must_be_positive() {
        let cases: [(&str, fn(&mut BotTuning)); 4] = [
            ("bot.cooldown_seconds", |b| b.cooldown_seconds = 0.0),
            ("bot.arm_width", |b| b.arm_width = -1.0),
            ("bot.body_width", |b| b.body_width = 0.0),
            ("bot.body_height", |b| b.body_height = 0.0),
        ];
        for (expected, breakage) in cases {
            let mut tuning = LevelTuning::preset(LevelId::AdventureThree);
            if let Some(bot) = tuning.bot.as_mut() {
                breakage(bot);
            }
            assert!(
                matches!(tuning.validate(), Err(ConfigError::NonPositive { name, .. }) if name == expected),
                "{} accepted",
                expected
            );
        }
    }

    #[test]
    fn test_json_round_trip_and_errors() {
        let json = LevelTuning::preset(LevelId::AdventureThree)
            .to_json()
            .expect("serialize");
        let parsed = LevelTuning::from_json(&json).expect("parse");
        assert_eq!(parsed.level, LevelId::AdventureThree);
        assert_eq!(parsed.script.len(), 3);

        assert!(matches!(LevelTuning::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_level_names_and_unlocking() {
        assert_eq!(LevelId::from_name("adventure-2"), Some(LevelId::AdventureTwo));
        assert_eq!(LevelId::from_index(3), Some(LevelId::AdventureThree));
        assert_eq!(LevelId::from_name("nope"), None);

        let mut progress = Progress::default();
        assert!(LevelId::Legacy.is_unlocked(&progress));
        assert!(LevelId::AdventureOne.is_unlocked(&progress));
        assert!(!LevelId::AdventureTwo.is_unlocked(&progress));
        progress.set_level_complete(LevelId::AdventureOne.index());
        assert!(LevelId::AdventureTwo.is_unlocked(&progress));
        assert!(!LevelId::AdventureThree.is_unlocked(&progress));
    }
}

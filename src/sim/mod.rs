//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (lanes are ordered by spawn)
//! - No rendering or platform dependencies

pub mod bot;
pub mod collectible;
pub mod craft;
pub mod dragon;
pub mod obstacle;
pub mod phase;
pub mod resolve;
pub mod shapes;
pub mod spawn;
pub mod state;
pub mod tick;

pub use bot::{BotMode, WarehouseBot};
pub use collectible::{Collectible, CollectibleKind, RemovalPolicy};
pub use craft::{Craft, Dive, SpeedBucket};
pub use dragon::{Dragon, DragonMode};
pub use obstacle::{AsteroidPair, BorderPair, Obstacle};
pub use phase::{Guard, Part, PhaseEffect, PhaseMachine, Transition};
pub use resolve::resolve_collisions;
pub use shapes::{Circle, Rect, Shape};
pub use spawn::{Scrolling, SpawnQueue};
pub use state::{GameEvent, LevelState, RestartCause};
pub use tick::{TickInput, tick};

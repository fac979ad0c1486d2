//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by index, removals by retain)
//! - No rendering or platform dependencies

pub mod collision;
pub mod damage;
pub mod director;
pub mod enemy;
pub mod entities;
pub mod events;
pub mod map;
pub mod objective;
pub mod player;
pub mod skills;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Rect, circle_intersects_rect, path_clear};
pub use damage::{DamageRoll, resolve_damage};
pub use director::{Director, WavePhase};
pub use enemy::{Enemy, EnemyKind};
pub use entities::{Obstacle, Pickup, PickupKind, Projectile};
pub use events::{GameEvent, LootReward, RunSummary, SoundCue};
pub use objective::{AirdropZone, ObjectiveTask};
pub use player::{Player, Stats};
pub use skills::{SkillId, SkillKind};
pub use snapshot::Snapshot;
pub use state::{GamePhase, SkillChoice, World};
pub use tick::{TickInput, tick};

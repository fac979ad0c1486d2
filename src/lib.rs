//! Neon Survivor - simulation core for a top-down survival shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (agents, collisions, spawn director, world state)
//! - `persistence`: Meta-progression over a key/value store
//! - `settings`: Match configuration and presets
//! - `highscores`: Local run leaderboard
//! - `web`: Browser bindings (wasm32 only)

pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::HighScores;
pub use settings::{DifficultyPreset, Settings};

use glam::Vec2;

/// Game configuration constants
///
/// Speeds are pixels per tick, durations are ticks.
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Square world edge length
    pub const WORLD_SIZE: f32 = 4000.0;
    /// Margin the player is clamped to inside the world
    pub const WORLD_MARGIN: f32 = 20.0;
    /// Radius kept free of obstacles around the spawn point
    pub const SPAWN_CLEARING: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 15.0;
    pub const PLAYER_BASE_HP: f32 = 100.0;
    pub const PLAYER_BASE_SPEED: f32 = 5.0;
    pub const PLAYER_BASE_DAMAGE: f32 = 40.0;
    pub const PLAYER_FIRE_INTERVAL: u32 = 30;
    pub const PLAYER_MIN_FIRE_INTERVAL: u32 = 4;
    pub const PLAYER_BULLET_SPEED: f32 = 14.0;
    pub const PLAYER_BULLET_LIFE: u32 = 60;

    /// Enemy projectile defaults
    pub const ENEMY_BULLET_SPEED: f32 = 6.0;
    pub const ENEMY_BULLET_LIFE: u32 = 140;

    /// Ability timings
    pub const DASH_COOLDOWN: u32 = 150;
    pub const DASH_DURATION: u32 = 20;
    pub const DASH_INVULN: u32 = 36;
    pub const DASH_SPEED_MULT: f32 = 2.4;
    pub const EMP_COOLDOWN: u32 = 1200;
    pub const EMP_RADIUS: f32 = 320.0;

    /// Critical hit multiplier
    pub const CRIT_MULTIPLIER: f32 = 2.0;
    /// Speed factor while standing in a slow zone
    pub const SLOW_ZONE_FACTOR: f32 = 0.5;

    /// Cap on live XP gems (oldest are dropped past this)
    pub const MAX_GEMS: usize = 300;
    pub const GEM_CULL_BATCH: usize = 50;
}

/// Unit vector for an angle in radians
#[inline]
pub fn from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Angle (radians) of the direction from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Clamp a point into the square world with the given margin
#[inline]
pub fn clamp_to_world(pos: Vec2, margin: f32) -> Vec2 {
    pos.clamp(
        Vec2::splat(margin),
        Vec2::splat(consts::WORLD_SIZE - margin),
    )
}

//! Passive entity models and their per-tick motion rules
//!
//! Projectiles, hazards, pickups and the cosmetic particles/texts the
//! renderer draws. None of these own behaviour that touches other
//! collections; the tick loop does the cross-entity work.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, hits_any};
use crate::from_angle;

/// Packed 0xRRGGBB colour hint for the renderer
pub type Color = u32;

pub mod colors {
    use super::Color;

    pub const WHITE: Color = 0xffffff;
    pub const CYAN: Color = 0x00ffff;
    pub const RED: Color = 0xff0000;
    pub const GREEN: Color = 0x00ff00;
    pub const GOLD: Color = 0xffd700;
    pub const CRIT: Color = 0xffcc00;
    pub const MAGENTA: Color = 0xff00ff;
    pub const ORANGE: Color = 0xff5500;
    pub const ROOT: Color = 0xff0055;
}

/// Map region an obstacle belongs to (drives its colour scheme)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
    City,
    Industrial,
    Ruins,
    Wasteland,
    Border,
}

/// Static blocking rectangle
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
    pub zone: Zone,
}

impl Obstacle {
    pub fn new(rect: Rect, zone: Zone) -> Self {
        Self { rect, zone }
    }

    /// Plain border-style wall
    pub fn wall(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Rect::new(x, y, w, h), Zone::Border)
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// Radius used when testing projectiles against walls
const PROJECTILE_WALL_RADIUS: f32 = 4.0;

/// A bullet in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime in ticks
    pub life: u32,
    pub owner: Owner,
    pub damage: f32,
    pub is_crit: bool,
    pub radius: f32,
    /// Extra enemies this bullet may pass through
    pub pierce: u32,
    /// Wall bounces left
    pub ricochet: u32,
    /// Enemy ids already struck (pierce never double-hits)
    pub hit_ids: Vec<u32>,
}

impl Projectile {
    pub fn new(pos: Vec2, angle: f32, speed: f32, damage: f32, owner: Owner, life: u32) -> Self {
        Self {
            pos,
            vel: from_angle(angle) * speed,
            life,
            owner,
            damage,
            is_crit: false,
            radius: match owner {
                Owner::Player => 4.0,
                Owner::Enemy => 6.0,
            },
            pierce: 0,
            ricochet: 0,
            hit_ids: Vec::new(),
        }
    }

    /// Mark as a critical hit (bigger on screen)
    pub fn with_crit(mut self, is_crit: bool) -> Self {
        self.is_crit = is_crit;
        if is_crit {
            self.radius = 7.0;
        }
        self
    }

    pub fn with_charges(mut self, pierce: u32, ricochet: u32) -> Self {
        self.pierce = pierce;
        self.ricochet = ricochet;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Advance one tick. Returns true if the bullet struck a wall.
    ///
    /// With ricochet charges left the bullet bounces off the blocked axis
    /// (both axes on a corner hit); otherwise its lifetime ends.
    pub fn step(&mut self, obstacles: &[Obstacle]) -> bool {
        let prev = self.pos;
        self.pos += self.vel;
        self.life = self.life.saturating_sub(1);

        if !hits_any(self.pos, PROJECTILE_WALL_RADIUS, obstacles) {
            return false;
        }

        if self.ricochet > 0 {
            self.ricochet -= 1;
            let blocked_x = hits_any(
                Vec2::new(self.pos.x, prev.y),
                PROJECTILE_WALL_RADIUS,
                obstacles,
            );
            let blocked_y = hits_any(
                Vec2::new(prev.x, self.pos.y),
                PROJECTILE_WALL_RADIUS,
                obstacles,
            );
            match (blocked_x, blocked_y) {
                (true, false) => self.vel.x = -self.vel.x,
                (false, true) => self.vel.y = -self.vel.y,
                _ => self.vel = -self.vel,
            }
            self.pos = prev;
        } else {
            self.life = 0;
        }
        true
    }

    pub fn has_hit(&self, id: u32) -> bool {
        self.hit_ids.contains(&id)
    }

    /// Register a hit on an enemy. Returns true if the bullet survives.
    pub fn register_hit(&mut self, id: u32) -> bool {
        if self.pierce > 0 {
            self.pierce -= 1;
            self.hit_ids.push(id);
            true
        } else {
            self.life = 0;
            false
        }
    }
}

/// Mine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MineState {
    /// Counting down to armed
    Arming { ticks: u32 },
    Armed,
    Detonated,
}

/// Ticks before a freshly laid mine can trigger
pub const MINE_ARM_TICKS: u32 = 30;
pub const MINE_TRIGGER_RADIUS: f32 = 80.0;

/// Proximity mine laid by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mine {
    pub pos: Vec2,
    pub damage: f32,
    pub radius: f32,
    pub state: MineState,
    /// Ticks since laid (renderer blink)
    pub age: u32,
}

impl Mine {
    pub fn new(pos: Vec2, skill_level: u32, player_level: u32) -> Self {
        Self {
            pos,
            damage: 30.0 + skill_level as f32 * 15.0 + player_level as f32 * 2.0,
            radius: MINE_TRIGGER_RADIUS,
            state: MineState::Arming {
                ticks: MINE_ARM_TICKS,
            },
            age: 0,
        }
    }

    /// Advance the arm timer
    pub fn tick(&mut self) {
        self.age = self.age.wrapping_add(1);
        if let MineState::Arming { ticks } = &mut self.state {
            *ticks = ticks.saturating_sub(1);
            if *ticks == 0 {
                self.state = MineState::Armed;
            }
        }
    }

    pub fn is_armed(&self) -> bool {
        self.state == MineState::Armed
    }
}

pub const BARREL_RADIUS: f32 = 18.0;
pub const BARREL_HP: f32 = 60.0;
pub const BARREL_BLAST_RADIUS: f32 = 180.0;
pub const BARREL_BLAST_DAMAGE: f32 = 150.0;
pub const BARREL_PLAYER_DAMAGE: f32 = 30.0;

/// Explosive barrel, destroyed by player fire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barrel {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
}

impl Barrel {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: BARREL_RADIUS,
            hp: BARREL_HP,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp <= 0.0
    }
}

/// Rectangle that halves the player's speed
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlowZone {
    pub rect: Rect,
}

impl SlowZone {
    pub fn contains(&self, p: Vec2) -> bool {
        self.rect.contains(p)
    }
}

/// Collectable kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// XP gem dropped by enemies
    XpGem,
    /// Meta-currency chip
    Chip,
    /// Heal + XP crate
    SupplyCrate,
    /// Random skill unlock
    SkillCrate,
    /// Airdrop reward
    LootBox,
}

/// A collectable on the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    pub pos: Vec2,
    pub value: u32,
    /// Being drawn toward the player
    pub magnetized: bool,
}

impl Pickup {
    pub fn new(kind: PickupKind, pos: Vec2, value: u32) -> Self {
        Self {
            kind,
            pos,
            value,
            magnetized: false,
        }
    }

    /// Fraction of the gap closed per tick once magnetised
    pub fn ease_rate(&self) -> Option<f32> {
        match self.kind {
            PickupKind::XpGem => Some(0.12),
            PickupKind::Chip => Some(0.15),
            _ => None,
        }
    }

    /// Extra reach beyond the player radius for collection
    pub fn pickup_reach(&self) -> f32 {
        match self.kind {
            PickupKind::XpGem | PickupKind::Chip => 0.0,
            PickupKind::SupplyCrate | PickupKind::SkillCrate => 30.0,
            PickupKind::LootBox => 40.0,
        }
    }

    /// Magnet pass. Distance is measured before moving, as is collection.
    /// Returns true if the pickup is collected this tick.
    pub fn update(&mut self, player_pos: Vec2, player_radius: f32, magnet: f32) -> bool {
        let d = self.pos.distance(player_pos);
        if let Some(rate) = self.ease_rate() {
            if d < magnet {
                self.magnetized = true;
            }
            if self.magnetized {
                self.pos += (player_pos - self.pos) * rate;
            }
        }
        d < player_radius + self.pickup_reach()
    }
}

/// Spark particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub size: f32,
    /// 1.0 at spawn, removed at 0
    pub life: f32,
}

impl Particle {
    pub fn new<R: Rng + ?Sized>(pos: Vec2, color: Color, size: f32, rng: &mut R) -> Self {
        Self {
            pos,
            vel: Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 5.0,
            color,
            size,
            life: 1.0,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.life -= 0.05;
    }
}

pub const FLOAT_TEXT_LIFE: u32 = 60;

/// Floating combat text (damage numbers, notices)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatText {
    pub pos: Vec2,
    pub text: String,
    pub color: Color,
    pub font_size: f32,
    pub life: u32,
}

impl FloatText {
    pub fn new(pos: Vec2, text: impl Into<String>, color: Color, font_size: f32) -> Self {
        Self {
            pos,
            text: text.into(),
            color,
            font_size,
            life: FLOAT_TEXT_LIFE,
        }
    }

    pub fn update(&mut self) {
        self.pos.y -= 0.45;
        self.life = self.life.saturating_sub(1);
    }

    /// Opacity for fade-out
    pub fn alpha(&self) -> f32 {
        self.life as f32 / FLOAT_TEXT_LIFE as f32
    }
}

pub const LASER_BEAM_LIFE: u32 = 15;

/// Laser beam flash from player to a target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaserBeam {
    pub target: Vec2,
    pub life: u32,
    pub alpha: f32,
}

impl LaserBeam {
    pub fn new(target: Vec2) -> Self {
        Self {
            target,
            life: LASER_BEAM_LIFE,
            alpha: 1.0,
        }
    }

    pub fn update(&mut self) {
        self.life = self.life.saturating_sub(1);
        self.alpha = (self.alpha - 0.06).max(0.0);
    }
}

/// Check if a circle overlaps a barrel (bullets use this)
pub fn circle_hits_barrel(pos: Vec2, radius: f32, barrel: &Barrel) -> bool {
    pos.distance(barrel.pos) < barrel.radius + radius
}

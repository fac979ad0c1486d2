//! Spawn director
//!
//! Budget-based spawning: credits accrue with the player's power score and
//! the current wave phase, then buy packs of unlocked enemy kinds. Planning
//! (what to buy) is separate from placement (where it lands) so a fixed
//! seed and power score give the same order list.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::hits_any;
use super::enemy::EnemyKind;
use super::entities::Obstacle;
use crate::consts::TICK_RATE;
use crate::{clamp_to_world, from_angle};

pub const SPAWN_INTERVAL: u32 = 30;
pub const MAX_PACKS_PER_SPAWN: u32 = 3;
pub const MAX_FAILED_PICKS: u32 = 10;
pub const ENEMY_HARD_CAP: f32 = 250.0;
/// Margin spawn points are clamped to
pub const SPAWN_MARGIN: f32 = 50.0;
pub const ANCHOR_CLEARANCE: f32 = 40.0;
pub const MEMBER_CLEARANCE: f32 = 20.0;
pub const MEMBER_SCATTER: f32 = 30.0;
pub const ANCHOR_TRIES: u32 = 5;

/// Wave cycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    Calm,
    Build,
    Peak,
}

impl WavePhase {
    pub const CYCLE: [WavePhase; 3] = [WavePhase::Calm, WavePhase::Build, WavePhase::Peak];

    pub fn duration_secs(self) -> u64 {
        match self {
            WavePhase::Calm => 10,
            WavePhase::Build => 30,
            WavePhase::Peak => 20,
        }
    }

    pub fn budget_mult(self) -> f32 {
        match self {
            WavePhase::Calm => 0.5,
            WavePhase::Build => 1.0,
            WavePhase::Peak => 2.5,
        }
    }

    pub fn cap_mult(self) -> f32 {
        match self {
            WavePhase::Calm => 0.8,
            WavePhase::Build => 1.0,
            WavePhase::Peak => 1.5,
        }
    }

    /// Phase for a tick (the cycle repeats every 60 s)
    pub fn at_tick(tick: u64) -> Self {
        let total: u64 = Self::CYCLE
            .iter()
            .map(|p| p.duration_secs() * TICK_RATE as u64)
            .sum();
        let mut t = tick % total;
        for phase in Self::CYCLE {
            let len = phase.duration_secs() * TICK_RATE as u64;
            if t < len {
                return phase;
            }
            t -= len;
        }
        WavePhase::Peak
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WavePhase::Calm => "calm",
            WavePhase::Build => "build",
            WavePhase::Peak => "peak",
        }
    }
}

/// One pack the director bought
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackOrder {
    pub kind: EnemyKind,
    pub size: u32,
}

/// Player strength estimate driving budget and cap
pub fn power_score(level: u32, skill_total: u32, game_time: u32) -> f32 {
    10.0 * level as f32 + 5.0 * skill_total as f32 + 0.5 * game_time as f32
}

/// Live enemy cap for a power score and phase
pub fn enemy_cap(power: f32, phase: WavePhase) -> f32 {
    ((20.0 + power / 50.0) * phase.cap_mult()).min(ENEMY_HARD_CAP)
}

/// Kinds the director may buy at this game time
pub fn unlocked_kinds(game_time: u32) -> Vec<EnemyKind> {
    EnemyKind::ALL
        .into_iter()
        .filter(|k| {
            let stats = k.stats();
            stats.cost.is_some() && game_time >= stats.unlock_secs
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Director {
    pub credits: f32,
    pub next_spawn: u64,
    pub spawn_interval: u32,
    pub phase: WavePhase,
}

impl Default for Director {
    fn default() -> Self {
        Self {
            credits: 0.0,
            next_spawn: 0,
            spawn_interval: SPAWN_INTERVAL,
            phase: WavePhase::Calm,
        }
    }
}

impl Director {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-tick update. Returns the packs to place this tick (often none).
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        tick: u64,
        power: f32,
        live_enemies: usize,
        difficulty: f32,
        game_time: u32,
        rng: &mut R,
    ) -> Vec<PackOrder> {
        self.phase = WavePhase::at_tick(tick);
        if tick < self.next_spawn {
            return Vec::new();
        }
        self.next_spawn = tick + self.spawn_interval as u64;

        if live_enemies as f32 >= enemy_cap(power, self.phase) {
            return Vec::new();
        }

        self.credits += (2.0 + power / 30.0) * self.phase.budget_mult() * difficulty;
        self.credits = self.credits.min(100.0 + power / 5.0);

        self.plan(game_time, rng)
    }

    /// Spend credits on up to three packs
    pub fn plan<R: Rng + ?Sized>(&mut self, game_time: u32, rng: &mut R) -> Vec<PackOrder> {
        let available = unlocked_kinds(game_time);
        let mut orders: Vec<PackOrder> = Vec::new();
        let mut attempts = MAX_FAILED_PICKS;

        while self.credits > 0.0 && attempts > 0 && (orders.len() as u32) < MAX_PACKS_PER_SPAWN {
            let fresh: Vec<EnemyKind> = available
                .iter()
                .copied()
                .filter(|k| !orders.iter().any(|o| o.kind == *k))
                .collect();
            let candidates = if fresh.is_empty() { &available } else { &fresh };
            let kind = candidates[rng.random_range(0..candidates.len())];
            let stats = kind.stats();
            let Some(cost) = stats.cost else {
                attempts -= 1;
                continue;
            };
            let cost = cost as f32;

            if self.credits >= cost {
                let (lo, hi) = stats.pack;
                let affordable = (self.credits / cost).floor() as u32;
                let size = rng.random_range(lo..=hi).min(affordable);
                self.credits = (self.credits - cost * size as f32).max(0.0);
                log::debug!(
                    "Director bought {} x{} ({:.1} credits left)",
                    kind.as_str(),
                    size,
                    self.credits
                );
                orders.push(PackOrder { kind, size });
            } else {
                attempts -= 1;
            }

            if self.credits < 1.0 {
                break;
            }
        }
        orders
    }
}

/// Pick a point on a ring around `center` that clears obstacles.
///
/// Distance is drawn uniformly from `min_dist..=max_dist`; the point is
/// clamped to `margin` inside the world.
#[allow(clippy::too_many_arguments)]
pub fn ring_spot<R: Rng + ?Sized>(
    center: Vec2,
    min_dist: f32,
    max_dist: f32,
    margin: f32,
    clearance: f32,
    tries: u32,
    obstacles: &[Obstacle],
    rng: &mut R,
) -> Option<Vec2> {
    for _ in 0..tries {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let dist = min_dist + rng.random::<f32>() * (max_dist - min_dist);
        let p = clamp_to_world(center + from_angle(angle) * dist, margin);
        if !hits_any(p, clearance, obstacles) {
            return Some(p);
        }
    }
    None
}

/// Member positions for a pack just outside the viewport.
/// Returns None when no clear anchor was found; blocked members are skipped.
pub fn place_pack<R: Rng + ?Sized>(
    order: &PackOrder,
    player_pos: Vec2,
    viewport_max: f32,
    obstacles: &[Obstacle],
    rng: &mut R,
) -> Option<Vec<Vec2>> {
    let near = viewport_max / 2.0 + 100.0;
    let Some(anchor) = ring_spot(
        player_pos,
        near,
        near + 200.0,
        SPAWN_MARGIN,
        ANCHOR_CLEARANCE,
        ANCHOR_TRIES,
        obstacles,
        rng,
    ) else {
        log::debug!("No clear anchor for {} pack, abandoned", order.kind.as_str());
        return None;
    };

    let members = (0..order.size)
        .filter_map(|_| {
            let offset = Vec2::new(
                rng.random_range(-MEMBER_SCATTER..MEMBER_SCATTER),
                rng.random_range(-MEMBER_SCATTER..MEMBER_SCATTER),
            );
            let p = clamp_to_world(anchor + offset, SPAWN_MARGIN);
            (!hits_any(p, MEMBER_CLEARANCE, obstacles)).then_some(p)
        })
        .collect();
    Some(members)
}

//! Airdrop objectives
//!
//! A zone appears near the player with a task. Finishing it drops a loot
//! box at the zone centre.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const ZONE_RADIUS: f32 = 150.0;
pub const HOLD_TICKS: u32 = 300;
pub const MAX_KILL_TARGET: u32 = 15;
pub const LOOT_HEAL_CHANCE: f64 = 0.4;

/// What the player has to do inside the zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveTask {
    /// Kill enemies while standing in the zone
    Kills { target: u32 },
    /// Stay inside the zone
    Hold { ticks: u32 },
}

impl ObjectiveTask {
    pub fn target(&self) -> u32 {
        match *self {
            ObjectiveTask::Kills { target } => target,
            ObjectiveTask::Hold { ticks } => ticks,
        }
    }
}

/// Kill goal for a zone spawned at this game time
pub fn kill_target(game_time: u32) -> u32 {
    (5 + game_time / 60).min(MAX_KILL_TARGET)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirdropZone {
    pub pos: Vec2,
    pub radius: f32,
    pub task: ObjectiveTask,
    pub progress: u32,
    /// Set the first time the player enters
    pub activated: bool,
    pub completed: bool,
}

impl AirdropZone {
    pub fn new(pos: Vec2, task: ObjectiveTask) -> Self {
        Self {
            pos,
            radius: ZONE_RADIUS,
            task,
            progress: 0,
            activated: false,
            completed: false,
        }
    }

    /// Zone with a randomly chosen task
    pub fn roll<R: Rng + ?Sized>(pos: Vec2, game_time: u32, rng: &mut R) -> Self {
        let task = if rng.random_bool(0.5) {
            ObjectiveTask::Kills {
                target: kill_target(game_time),
            }
        } else {
            ObjectiveTask::Hold { ticks: HOLD_TICKS }
        };
        Self::new(pos, task)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.pos.distance(p) < self.radius
    }

    fn advance(&mut self) {
        if self.completed {
            return;
        }
        self.progress += 1;
        if self.progress >= self.task.target() {
            self.progress = self.task.target();
            self.completed = true;
        }
    }

    /// Per-tick activation and hold progress
    pub fn update(&mut self, player_pos: Vec2) {
        let inside = self.contains(player_pos);
        if inside && !self.activated {
            self.activated = true;
            log::info!("Airdrop zone activated ({:?})", self.task);
        }
        if inside && matches!(self.task, ObjectiveTask::Hold { .. }) {
            self.advance();
        }
    }

    /// Count a kill. Returns true if it counted toward the task.
    pub fn record_kill(&mut self, player_pos: Vec2) -> bool {
        let counts = matches!(self.task, ObjectiveTask::Kills { .. })
            && self.activated
            && !self.completed
            && self.contains(player_pos);
        if counts {
            self.advance();
        }
        counts
    }

    /// Progress in [0, 1] for the HUD
    pub fn progress_ratio(&self) -> f32 {
        let target = self.task.target().max(1);
        self.progress as f32 / target as f32
    }
}

/// What opening a loot box yields
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LootRoll {
    Heal(f32),
    Skill,
}

pub fn roll_loot<R: Rng + ?Sized>(rng: &mut R) -> LootRoll {
    if rng.random_bool(LOOT_HEAL_CHANCE) {
        LootRoll::Heal(rng.random_range(25..40) as f32)
    } else {
        LootRoll::Skill
    }
}

//! Signals raised by the simulation for the host (UI, audio, storage)
//!
//! The world pushes into an outbox; the host drains it between ticks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::skills::SkillId;

/// One-shot audio cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Shoot,
    Hit,
    Explosion,
    PowerUp,
    LevelUp,
    Dash,
    Emp,
    Pickup,
}

/// What a loot box gave
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LootReward {
    Heal(f32),
    /// A skill offer follows as [`GameEvent::SkillOffered`]
    Skill,
}

/// Final stats of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub survived_secs: u32,
    pub level: u32,
    pub kills: u32,
    /// Chips picked up this run
    pub chips: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player levelled up; the host must call `choose_skill` with one of `choices`
    LevelUp { level: u32, choices: Vec<SkillId> },
    /// Nothing left to learn: healed instead
    LimitBreak,
    /// A crate or loot box offers a single skill
    SkillOffered { skill: SkillId },
    LootBoxOpened { reward: LootReward },
    ObjectiveSpawned { pos: Vec2 },
    ObjectiveCompleted { pos: Vec2 },
    TitanSpawned { pos: Vec2 },
    /// War-cry telegraph
    TitanCharging { pos: Vec2 },
    ChipCollected { value: u32 },
    Explosion { pos: Vec2, radius: f32 },
    Sound(SoundCue),
    GameOver { summary: RunSummary },
}

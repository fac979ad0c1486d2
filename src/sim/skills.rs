//! Skill database and per-run skill levels

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Category shown on level-up cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillKind {
    Weapon,
    Active,
    Passive,
}

/// Every acquirable skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillId {
    /// +1 bullet per volley
    Multi,
    /// Rear-facing turret
    Rear,
    /// Electric aura pulse
    Aura,
    /// Orbiting defence drones
    Orbit,
    /// Retaliation nova when hit
    Thorns,
    /// Chain explosion on kill
    Boom,
    /// Mine layer
    Mines,
    /// Auto-targeting laser
    Laser,
    /// Slowing field
    Freeze,
    Dmg,
    Spd,
    Sniper,
    Crit,
    Hp,
    Regen,
    Shield,
    Armor,
    Dodge,
    Speed,
    Vamp,
    Mag,
    Exp,
    Pierce,
    Ricochet,
}

/// Static data for a skill
#[derive(Debug, Clone, Copy)]
pub struct SkillInfo {
    pub max_level: u32,
    pub kind: SkillKind,
    /// Level at which the skill "evolves" (bigger radius, faster charge...)
    pub evolve_at: Option<u32>,
}

impl SkillId {
    pub const ALL: [SkillId; 24] = [
        SkillId::Multi,
        SkillId::Rear,
        SkillId::Aura,
        SkillId::Orbit,
        SkillId::Thorns,
        SkillId::Boom,
        SkillId::Mines,
        SkillId::Laser,
        SkillId::Freeze,
        SkillId::Dmg,
        SkillId::Spd,
        SkillId::Sniper,
        SkillId::Crit,
        SkillId::Hp,
        SkillId::Regen,
        SkillId::Shield,
        SkillId::Armor,
        SkillId::Dodge,
        SkillId::Speed,
        SkillId::Vamp,
        SkillId::Mag,
        SkillId::Exp,
        SkillId::Pierce,
        SkillId::Ricochet,
    ];

    pub fn info(self) -> SkillInfo {
        use SkillKind::*;
        let (max_level, kind, evolve_at) = match self {
            SkillId::Multi | SkillId::Rear => (5, Weapon, Some(3)),
            SkillId::Aura
            | SkillId::Orbit
            | SkillId::Mines
            | SkillId::Laser
            | SkillId::Freeze => (5, Active, Some(3)),
            SkillId::Thorns
            | SkillId::Boom
            | SkillId::Crit
            | SkillId::Regen
            | SkillId::Shield => (5, Passive, Some(3)),
            SkillId::Dmg | SkillId::Spd | SkillId::Hp => (10, Passive, None),
            SkillId::Sniper
            | SkillId::Armor
            | SkillId::Dodge
            | SkillId::Speed
            | SkillId::Vamp
            | SkillId::Mag
            | SkillId::Exp => (5, Passive, None),
            SkillId::Pierce | SkillId::Ricochet => (3, Weapon, None),
        };
        SkillInfo {
            max_level,
            kind,
            evolve_at,
        }
    }

    /// Stable key used by UI and save data
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillId::Multi => "multi",
            SkillId::Rear => "rear",
            SkillId::Aura => "aura",
            SkillId::Orbit => "orbit",
            SkillId::Thorns => "thorns",
            SkillId::Boom => "boom",
            SkillId::Mines => "mines",
            SkillId::Laser => "laser",
            SkillId::Freeze => "freeze",
            SkillId::Dmg => "dmg",
            SkillId::Spd => "spd",
            SkillId::Sniper => "sniper",
            SkillId::Crit => "crit",
            SkillId::Hp => "hp",
            SkillId::Regen => "regen",
            SkillId::Shield => "shield",
            SkillId::Armor => "armor",
            SkillId::Dodge => "dodge",
            SkillId::Speed => "speed",
            SkillId::Vamp => "vamp",
            SkillId::Mag => "mag",
            SkillId::Exp => "exp",
            SkillId::Pierce => "pierce",
            SkillId::Ricochet => "ricochet",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }
}

/// Skill levels acquired this run (absent = level 0)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillLevels {
    levels: BTreeMap<SkillId, u32>,
}

impl SkillLevels {
    pub fn level(&self, id: SkillId) -> u32 {
        self.levels.get(&id).copied().unwrap_or(0)
    }

    pub fn is_maxed(&self, id: SkillId) -> bool {
        self.level(id) >= id.info().max_level
    }

    /// Raise a skill by one level (capped at its max). Returns the new level.
    pub fn increment(&mut self, id: SkillId) -> u32 {
        let max = id.info().max_level;
        let lvl = self.levels.entry(id).or_insert(0);
        *lvl = (*lvl + 1).min(max);
        *lvl
    }

    /// Sum of all skill levels (feeds the director's power score)
    pub fn total(&self) -> u32 {
        self.levels.values().sum()
    }

    /// Skills that can still be levelled, in stable order
    pub fn available(&self) -> Vec<SkillId> {
        SkillId::ALL
            .into_iter()
            .filter(|id| !self.is_maxed(*id))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillId, u32)> + '_ {
        self.levels.iter().map(|(id, lvl)| (*id, *lvl))
    }
}

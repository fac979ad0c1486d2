//! Meta-progression: chips earned across runs and permanent upgrades

use serde::{Deserialize, Serialize};

use super::KeyValueStore;

/// Store key for the meta save
pub const META_KEY: &str = "neon_survivor_save";

/// Permanent upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeId {
    StartHp,
    StartDmg,
    StartGreed,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 3] = [UpgradeId::StartHp, UpgradeId::StartDmg, UpgradeId::StartGreed];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeId::StartHp => "startHp",
            UpgradeId::StartDmg => "startDmg",
            UpgradeId::StartGreed => "startGreed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }

    pub fn info(self) -> &'static Upgrade {
        &UPGRADES[self as usize]
    }
}

/// Static upgrade row
#[derive(Debug)]
pub struct Upgrade {
    pub id: UpgradeId,
    pub base_cost: f64,
    pub cost_mult: f64,
    pub max_level: u32,
    value: fn(u32) -> f32,
}

impl Upgrade {
    /// Effect value at a level
    pub fn value(&self, level: u32) -> f32 {
        (self.value)(level)
    }

    /// Cost of the next level, `None` when maxed
    pub fn cost(&self, level: u32) -> Option<u64> {
        (level < self.max_level)
            .then(|| (self.base_cost * self.cost_mult.powi(level as i32)).floor() as u64)
    }
}

pub static UPGRADES: [Upgrade; 3] = [
    Upgrade {
        id: UpgradeId::StartHp,
        base_cost: 100.0,
        cost_mult: 1.5,
        max_level: 10,
        value: |lvl| lvl as f32 * 10.0,
    },
    Upgrade {
        id: UpgradeId::StartDmg,
        base_cost: 150.0,
        cost_mult: 1.6,
        max_level: 5,
        value: |lvl| 1.0 + lvl as f32 * 0.1,
    },
    Upgrade {
        id: UpgradeId::StartGreed,
        base_cost: 200.0,
        cost_mult: 1.8,
        max_level: 5,
        value: |lvl| lvl as f32 * 0.1,
    },
];

/// Bonuses the simulation reads once at match creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetaBonuses {
    pub start_hp: f32,
    pub start_dmg_mult: f32,
    /// Added to the base chip drop chance
    pub chip_drop_bonus: f32,
}

impl Default for MetaBonuses {
    fn default() -> Self {
        Self {
            start_hp: 0.0,
            start_dmg_mult: 1.0,
            chip_drop_bonus: 0.0,
        }
    }
}

/// Meta-currency and upgrade collaborator
pub trait MetaProgression {
    fn currency(&self) -> u64;
    fn add_currency(&mut self, amount: u64);
    fn upgrade_level(&self, id: UpgradeId) -> u32;
    /// Buy the next level if affordable. Returns true on success.
    fn try_purchase(&mut self, id: UpgradeId) -> bool;

    fn upgrade_value(&self, id: UpgradeId) -> f32 {
        id.info().value(self.upgrade_level(id))
    }

    fn bonuses(&self) -> MetaBonuses {
        MetaBonuses {
            start_hp: self.upgrade_value(UpgradeId::StartHp),
            start_dmg_mult: self.upgrade_value(UpgradeId::StartDmg),
            chip_drop_bonus: self.upgrade_value(UpgradeId::StartGreed),
        }
    }
}

/// Saved meta data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaData {
    pub currency: u64,
    pub upgrades: UpgradeLevels,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpgradeLevels {
    pub start_hp: u32,
    pub start_dmg: u32,
    pub start_greed: u32,
}

impl UpgradeLevels {
    fn get(&self, id: UpgradeId) -> u32 {
        match id {
            UpgradeId::StartHp => self.start_hp,
            UpgradeId::StartDmg => self.start_dmg,
            UpgradeId::StartGreed => self.start_greed,
        }
    }

    fn get_mut(&mut self, id: UpgradeId) -> &mut u32 {
        match id {
            UpgradeId::StartHp => &mut self.start_hp,
            UpgradeId::StartDmg => &mut self.start_dmg,
            UpgradeId::StartGreed => &mut self.start_greed,
        }
    }
}

/// Meta progression persisted through a [`KeyValueStore`]
pub struct MetaProgress<S: KeyValueStore> {
    store: S,
    data: MetaData,
}

impl<S: KeyValueStore> MetaProgress<S> {
    /// Load from the store, falling back to defaults on missing or bad data
    pub fn load(store: S) -> Self {
        let data = match store.get(META_KEY) {
            Some(json) => match serde_json::from_str::<MetaData>(&json) {
                Ok(data) => {
                    log::info!("Loaded meta progress ({} chips)", data.currency);
                    data
                }
                Err(e) => {
                    log::warn!("Malformed meta save, starting fresh: {}", e);
                    MetaData::default()
                }
            },
            None => {
                log::info!("No meta save found, starting fresh");
                MetaData::default()
            }
        };
        Self { store, data }
    }

    pub fn data(&self) -> &MetaData {
        &self.data
    }

    pub fn save(&mut self) {
        match serde_json::to_string(&self.data) {
            Ok(json) => {
                if !self.store.set(META_KEY, &json) {
                    log::warn!("Meta save write failed");
                }
            }
            Err(e) => log::warn!("Meta save serialization failed: {}", e),
        }
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: KeyValueStore> MetaProgression for MetaProgress<S> {
    fn currency(&self) -> u64 {
        self.data.currency
    }

    fn add_currency(&mut self, amount: u64) {
        self.data.currency = self.data.currency.saturating_add(amount);
        self.save();
    }

    fn upgrade_level(&self, id: UpgradeId) -> u32 {
        self.data.upgrades.get(id)
    }

    fn try_purchase(&mut self, id: UpgradeId) -> bool {
        let level = self.upgrade_level(id);
        let Some(cost) = id.info().cost(level) else {
            return false;
        };
        if self.data.currency < cost {
            return false;
        }
        self.data.currency -= cost;
        *self.data.upgrades.get_mut(id) += 1;
        log::info!("Purchased {} level {}", id.as_str(), level + 1);
        self.save();
        true
    }
}

//! Damage resolution
//!
//! Every player-sourced hit (bullets, auras, explosions, thorns) goes
//! through [`resolve_damage`] so crits and multipliers stay consistent.

use rand::Rng;

use super::player::Stats;
use crate::consts::CRIT_MULTIPLIER;

/// Final amount of a damage roll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub amount: f32,
    pub is_crit: bool,
}

/// Scale `base` by the attacker's stat block, rolling once for a crit
pub fn resolve_damage<R: Rng + ?Sized>(base: f32, stats: &Stats, rng: &mut R) -> DamageRoll {
    let is_crit = rng.random::<f32>() < stats.crit_chance;
    let mult = if is_crit { CRIT_MULTIPLIER } else { 1.0 };
    DamageRoll {
        amount: base * stats.dmg_mult * mult,
        is_crit,
    }
}

/// Cubic distance falloff used by novas: full at the centre, never below 10%
#[inline]
pub fn cubic_falloff(dist: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.1;
    }
    let t = (1.0 - dist / radius).clamp(0.0, 1.0);
    (t * t * t).max(0.1)
}

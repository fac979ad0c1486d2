//! The player agent
//!
//! `Player` owns its own timers and stat block. Anything that reaches
//! into other collections (novas, lasers, drones) is returned as a
//! trigger value and applied by the world, which owns the enemies.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::hits_any;
use super::damage::resolve_damage;
use super::entities::{Mine, Obstacle, Owner, Projectile, SlowZone};
use super::skills::{SkillId, SkillLevels};
use crate::consts::*;
use crate::persistence::MetaBonuses;
use crate::{clamp_to_world, from_angle};

/// Heal and max-HP bonus of one `hp` skill level
pub const HP_SKILL_BONUS: f32 = 20.0;
/// Gap between rear turret bullets
pub const REAR_SPREAD_STEP: f32 = 0.15;
/// Fan gap per multi-shot level
pub const SPREAD_PER_MULTI: f32 = 0.12;
pub const MINE_INTERVAL: u32 = 120;
pub const MINE_SCATTER: f32 = 30.0;
pub const ORBIT_SPIN: f32 = 0.04;
pub const ORBIT_HIT_INTERVAL: u32 = 20;
pub const ORBIT_DRONE_RADIUS: f32 = 12.0;

/// Pulse radius of the electric aura (evolves at level 3)
pub fn aura_radius(level: u32) -> f32 {
    if level >= 3 { 250.0 } else { 150.0 }
}

/// Derived stat block. Rebuilt by [`Player::recalc_stats`] only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub dmg_mult: f32,
    pub fire_rate_mult: f32,
    pub bullet_count: u32,
    /// Total fan angle across all forward bullets (radians)
    pub spread: f32,
    pub bullet_speed_mult: f32,
    pub crit_chance: f32,
    pub dodge: f32,
    pub thorns: f32,
    /// HP restored per second
    pub regen: f32,
    pub magnet: f32,
    pub xp_mult: f32,
    /// Chance to heal on kill
    pub lifesteal: f32,
    pub shield_charges: u32,
    pub pierce: u32,
    pub ricochet: u32,
    /// Flat reduction per hit
    pub armor: f32,
    pub move_speed: f32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            dmg_mult: 1.0,
            fire_rate_mult: 1.0,
            bullet_count: 1,
            spread: 0.0,
            bullet_speed_mult: 1.0,
            crit_chance: 0.0,
            dodge: 0.0,
            thorns: 0.0,
            regen: 0.0,
            magnet: 120.0,
            xp_mult: 1.0,
            lifesteal: 0.0,
            shield_charges: 0,
            pierce: 0,
            ricochet: 0,
            armor: 0.0,
            move_speed: PLAYER_BASE_SPEED,
        }
    }
}

/// Area burst centred on the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nova {
    /// Damage before `resolve_damage`
    pub base: f32,
    pub radius: f32,
}

/// Result of a dash request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashOutcome {
    Started,
    OnCooldown,
    Rooted,
}

/// EMP fired this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmpPulse {
    pub nova: Nova,
    /// Whether the pulse broke a root
    pub freed: bool,
}

/// What happened when the player was hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    /// Invulnerable or dashing
    Ignored,
    /// Shield absorbed it and bursts (cubic falloff, knockback)
    ShieldBurst(Nova),
    Dodged,
    Damaged {
        amount: f32,
        thorns: Option<Nova>,
        fatal: bool,
    },
}

/// Status changes from the timer step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatusReport {
    /// Root expired this tick
    pub freed: bool,
    /// Shield finished charging this tick
    pub shield_ready: bool,
    /// HP restored by regen this tick
    pub regen: f32,
}

/// Passive effects due this tick
#[derive(Debug, Default)]
pub struct PassiveTriggers {
    pub aura: Option<Nova>,
    pub mines: Vec<Mine>,
    /// Number of targets and base damage
    pub laser: Option<(u32, f32)>,
    pub freeze_radius: Option<f32>,
    /// Drone hit base damage
    pub orbit: Option<f32>,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub base_speed: f32,
    pub base_damage: f32,
    pub bullet_speed: f32,
    pub bullet_life: u32,
    pub skills: SkillLevels,
    pub stats: Stats,
    pub level: u32,
    pub xp: f32,
    pub xp_next: f32,
    pub fire_timer: u32,
    pub dash_cd: u32,
    pub emp_cd: u32,
    pub dash_active: u32,
    pub invuln: u32,
    pub root: u32,
    pub shield_timer: u32,
    pub shield_ready: bool,
    pub aura_timer: u32,
    pub mine_timer: u32,
    pub laser_timer: u32,
    pub orbit_timer: u32,
    pub orbit_angle: f32,
    bonuses: MetaBonuses,
}

impl Player {
    pub fn new(pos: Vec2, bonuses: &MetaBonuses) -> Self {
        let max_hp = PLAYER_BASE_HP + bonuses.start_hp;
        let mut player = Self {
            pos,
            radius: PLAYER_RADIUS,
            hp: max_hp,
            max_hp,
            base_speed: PLAYER_BASE_SPEED,
            base_damage: PLAYER_BASE_DAMAGE,
            bullet_speed: PLAYER_BULLET_SPEED,
            bullet_life: PLAYER_BULLET_LIFE,
            skills: SkillLevels::default(),
            stats: Stats::default(),
            level: 1,
            xp: 0.0,
            xp_next: 50.0,
            fire_timer: 0,
            dash_cd: 0,
            emp_cd: 0,
            dash_active: 0,
            invuln: 0,
            root: 0,
            shield_timer: 0,
            shield_ready: false,
            aura_timer: 0,
            mine_timer: 0,
            laser_timer: 0,
            orbit_timer: 0,
            orbit_angle: 0.0,
            bonuses: *bonuses,
        };
        player.recalc_stats(bonuses);
        player
    }

    pub fn skill(&self, id: SkillId) -> u32 {
        self.skills.level(id)
    }

    /// Rebuild the stat block from skill levels and meta bonuses
    pub fn recalc_stats(&mut self, meta: &MetaBonuses) {
        let lvl = |id| self.skills.level(id) as f32;
        self.stats = Stats {
            dmg_mult: meta.start_dmg_mult + 0.2 * lvl(SkillId::Dmg),
            fire_rate_mult: 0.85f32.powi(self.skills.level(SkillId::Spd) as i32),
            bullet_count: 1 + self.skills.level(SkillId::Multi),
            spread: SPREAD_PER_MULTI * lvl(SkillId::Multi),
            bullet_speed_mult: 1.0 + 0.25 * lvl(SkillId::Sniper),
            crit_chance: 0.1 * lvl(SkillId::Crit),
            dodge: 0.1 * lvl(SkillId::Dodge),
            thorns: 8.0 * lvl(SkillId::Thorns),
            regen: 2.0 * lvl(SkillId::Regen),
            magnet: 120.0 + 40.0 * lvl(SkillId::Mag),
            xp_mult: 1.0 + 0.2 * lvl(SkillId::Exp),
            lifesteal: 0.05 * lvl(SkillId::Vamp),
            shield_charges: self.skills.level(SkillId::Shield),
            pierce: self.skills.level(SkillId::Pierce),
            ricochet: self.skills.level(SkillId::Ricochet),
            armor: 2.0 * lvl(SkillId::Armor),
            move_speed: self.base_speed * (1.0 + 0.1 * lvl(SkillId::Speed)),
        };
    }

    /// Level a skill up. Returns the new level.
    pub fn add_skill(&mut self, id: SkillId) -> u32 {
        let before = self.skills.level(id);
        let level = self.skills.increment(id);
        if id == SkillId::Hp && level > before {
            self.max_hp += HP_SKILL_BONUS;
            self.heal(HP_SKILL_BONUS);
        }
        let meta = self.bonuses;
        self.recalc_stats(&meta);
        level
    }

    /// Restore HP up to max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.hp;
        self.hp = (self.hp + amount).min(self.max_hp);
        self.hp - before
    }

    pub fn is_dashing(&self) -> bool {
        self.dash_active > 0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invuln > 0 || self.dash_active > 0
    }

    pub fn is_rooted(&self) -> bool {
        self.root > 0
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    pub fn try_dash(&mut self) -> DashOutcome {
        if self.dash_cd > 0 {
            return DashOutcome::OnCooldown;
        }
        if self.is_rooted() {
            return DashOutcome::Rooted;
        }
        self.dash_cd = DASH_COOLDOWN;
        self.dash_active = DASH_DURATION;
        self.invuln = DASH_INVULN;
        DashOutcome::Started
    }

    pub fn try_emp(&mut self) -> Option<EmpPulse> {
        if self.emp_cd > 0 {
            return None;
        }
        self.emp_cd = EMP_COOLDOWN;
        let freed = self.root > 0;
        self.root = 0;
        Some(EmpPulse {
            nova: Nova {
                base: 60.0 + 20.0 * self.level as f32,
                radius: EMP_RADIUS,
            },
            freed,
        })
    }

    /// Root the player. Returns false if it had no effect.
    pub fn apply_root(&mut self, ticks: u32) -> bool {
        if self.is_invulnerable() || self.is_rooted() {
            return false;
        }
        self.root = ticks;
        true
    }

    /// Status timers, regen and shield charge
    pub fn tick_status(&mut self, tick: u64) -> StatusReport {
        let mut report = StatusReport::default();

        self.invuln = self.invuln.saturating_sub(1);
        if self.root > 0 {
            self.root -= 1;
            report.freed = self.root == 0;
        }
        self.dash_cd = self.dash_cd.saturating_sub(1);
        self.emp_cd = self.emp_cd.saturating_sub(1);

        if self.stats.regen > 0.0 && self.hp < self.max_hp && tick % TICK_RATE as u64 == 0 {
            report.regen = self.heal(self.stats.regen);
        }

        if self.stats.shield_charges > 0 && !self.shield_ready {
            self.shield_timer += 1;
            if self.shield_timer > self.shield_charge_ticks() {
                self.shield_ready = true;
                report.shield_ready = true;
            }
        }
        report
    }

    pub fn shield_charge_ticks(&self) -> u32 {
        360u32
            .saturating_sub(50 * self.skill(SkillId::Shield))
            .max(60)
    }

    /// Advance passive skill timers and report what fires this tick
    pub fn tick_passives<R: Rng + ?Sized>(&mut self, rng: &mut R) -> PassiveTriggers {
        let mut triggers = PassiveTriggers::default();
        let level = self.level as f32;

        let aura = self.skill(SkillId::Aura);
        if aura > 0 {
            self.aura_timer += 1;
            if self.aura_timer >= 60u32.saturating_sub(8 * aura).max(10) {
                self.aura_timer = 0;
                triggers.aura = Some(Nova {
                    base: 5.0 + 0.5 * level,
                    radius: aura_radius(aura),
                });
            }
        }

        let mines = self.skill(SkillId::Mines);
        if mines > 0 {
            self.mine_timer += 1;
            if self.mine_timer >= MINE_INTERVAL {
                self.mine_timer = 0;
                for _ in 0..mines {
                    let offset = Vec2::new(
                        rng.random_range(-MINE_SCATTER..MINE_SCATTER),
                        rng.random_range(-MINE_SCATTER..MINE_SCATTER),
                    );
                    triggers
                        .mines
                        .push(Mine::new(self.pos + offset, mines, self.level));
                }
            }
        }

        let laser = self.skill(SkillId::Laser);
        if laser > 0 {
            self.laser_timer += 1;
            if self.laser_timer >= 180u32.saturating_sub(5 * laser).max(40) {
                triggers.laser = Some((laser, 60.0 + 5.0 * level));
            }
        }

        let freeze = self.skill(SkillId::Freeze);
        if freeze > 0 {
            triggers.freeze_radius = Some(200.0 + 20.0 * freeze as f32);
        }

        self.orbit_angle = (self.orbit_angle + ORBIT_SPIN) % std::f32::consts::TAU;
        if self.skill(SkillId::Orbit) > 0 {
            self.orbit_timer += 1;
            if self.orbit_timer >= ORBIT_HIT_INTERVAL {
                self.orbit_timer = 0;
                triggers.orbit = Some(20.0 + 2.0 * level);
            }
        }

        triggers
    }

    /// The laser found targets and fired; restart its charge
    pub fn laser_fired(&mut self) {
        self.laser_timer = 0;
    }

    /// World positions of the orbiting drones
    pub fn orbit_positions(&self) -> Vec<Vec2> {
        let count = self.skill(SkillId::Orbit);
        if count == 0 {
            return Vec::new();
        }
        let dist = 100.0 + 12.0 * count as f32;
        let step = std::f32::consts::TAU / count as f32;
        (0..count)
            .map(|i| self.pos + from_angle(self.orbit_angle + i as f32 * step) * dist)
            .collect()
    }

    /// Move speed this tick given terrain and dash state
    pub fn current_speed(&self, slow_zones: &[SlowZone]) -> f32 {
        let mut speed = self.stats.move_speed;
        if self.is_dashing() {
            speed *= DASH_SPEED_MULT;
        } else if slow_zones.iter().any(|z| z.contains(self.pos)) {
            speed *= SLOW_ZONE_FACTOR;
        }
        speed
    }

    /// Move by the intent direction, X then Y, each axis blocked by walls
    pub fn move_step<R: Rng + ?Sized>(
        &mut self,
        intent: Vec2,
        obstacles: &[Obstacle],
        slow_zones: &[SlowZone],
        rng: &mut R,
    ) {
        let speed = self.current_speed(slow_zones);
        self.dash_active = self.dash_active.saturating_sub(1);

        let step = if self.is_rooted() {
            Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
        } else {
            intent.normalize_or_zero() * speed
        };

        if step != Vec2::ZERO {
            let next_x = Vec2::new(self.pos.x + step.x, self.pos.y);
            if !hits_any(next_x, self.radius, obstacles) {
                self.pos.x = next_x.x;
            }
            let next_y = Vec2::new(self.pos.x, self.pos.y + step.y);
            if !hits_any(next_y, self.radius, obstacles) {
                self.pos.y = next_y.y;
            }
        }
        self.pos = clamp_to_world(self.pos, WORLD_MARGIN);
    }

    /// Basic weapon. `aim` is None when there is nothing to shoot at.
    pub fn fire<R: Rng + ?Sized>(&mut self, aim: Option<f32>, rng: &mut R) -> Vec<Projectile> {
        if self.fire_timer > 0 {
            self.fire_timer -= 1;
            return Vec::new();
        }
        let Some(angle) = aim else {
            return Vec::new();
        };

        let speed = self.bullet_speed * self.stats.bullet_speed_mult;
        let count = self.stats.bullet_count.max(1);
        let step = if count > 1 {
            self.stats.spread / (count - 1) as f32
        } else {
            0.0
        };
        let start = angle - self.stats.spread / 2.0;
        let mut angles: Vec<f32> = (0..count).map(|i| start + step * i as f32).collect();

        let rear = self.skill(SkillId::Rear);
        let rear_start = angle + std::f32::consts::PI - (rear as f32 - 1.0) * REAR_SPREAD_STEP / 2.0;
        angles.extend((0..rear).map(|i| rear_start + REAR_SPREAD_STEP * i as f32));

        let bullets = angles
            .into_iter()
            .map(|a| {
                let roll = resolve_damage(self.base_damage, &self.stats, rng);
                Projectile::new(self.pos, a, speed, roll.amount, Owner::Player, self.bullet_life)
                    .with_crit(roll.is_crit)
                    .with_charges(self.stats.pierce, self.stats.ricochet)
            })
            .collect();

        self.fire_timer = ((PLAYER_FIRE_INTERVAL as f32 * self.stats.fire_rate_mult).floor() as u32)
            .max(PLAYER_MIN_FIRE_INTERVAL);
        bullets
    }

    /// Resolve an incoming hit against shield, dodge and armor
    pub fn take_hit<R: Rng + ?Sized>(&mut self, amount: f32, rng: &mut R) -> HitOutcome {
        if self.is_invulnerable() {
            return HitOutcome::Ignored;
        }

        if self.shield_ready {
            self.shield_ready = false;
            self.shield_timer = 0;
            let lvl = self.skill(SkillId::Shield) as f32;
            return HitOutcome::ShieldBurst(Nova {
                base: 80.0 + 30.0 * lvl,
                radius: 160.0 + 20.0 * lvl,
            });
        }

        if rng.random::<f32>() < self.stats.dodge {
            return HitOutcome::Dodged;
        }

        let dealt = (amount - self.stats.armor).max(1.0);
        self.hp = (self.hp - dealt).max(0.0);
        let thorns = (self.stats.thorns > 0.0).then(|| Nova {
            base: self.stats.thorns + 2.0 * self.level as f32,
            radius: if self.skill(SkillId::Thorns) >= 3 {
                250.0
            } else {
                150.0
            },
        });
        HitOutcome::Damaged {
            amount: dealt,
            thorns,
            fatal: self.hp <= 0.0,
        }
    }

    /// Add XP scaled by the XP multiplier
    pub fn gain_xp(&mut self, amount: f32) {
        self.xp += amount * self.stats.xp_mult;
    }

    pub fn level_up_ready(&self) -> bool {
        self.xp >= self.xp_next
    }

    /// Consume one level's worth of XP. Returns the new level.
    pub fn advance_level(&mut self) -> u32 {
        self.xp -= self.xp_next;
        self.level += 1;
        let l = self.level as f32;
        self.xp_next = (50.0 + 25.0 * l + l.powf(1.2) * 5.0).floor();
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Rect;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn player() -> Player {
        Player::new(Vec2::splat(2000.0), &MetaBonuses::default())
    }

    #[test]
    fn test_recalc_stats() {
        let bonuses = MetaBonuses {
            start_hp: 30.0,
            start_dmg_mult: 1.2,
            chip_drop_bonus: 0.0,
        };
        let mut p = Player::new(Vec2::ZERO, &bonuses);
        assert_eq!(p.max_hp, 130.0);
        p.add_skill(SkillId::Dmg);
        p.add_skill(SkillId::Multi);
        p.add_skill(SkillId::Multi);
        p.add_skill(SkillId::Speed);
        p.add_skill(SkillId::Pierce);
        assert!((p.stats.dmg_mult - 1.4).abs() < 1e-5);
        assert_eq!(p.stats.bullet_count, 3);
        assert!((p.stats.spread - 0.24).abs() < 1e-5);
        assert!((p.stats.move_speed - 5.5).abs() < 1e-5);
        assert_eq!(p.stats.pierce, 1);
    }

    #[test]
    fn test_hp_skill_heals() {
        let mut p = player();
        p.hp = 50.0;
        p.add_skill(SkillId::Hp);
        assert_eq!(p.max_hp, 120.0);
        assert_eq!(p.hp, 70.0);
    }

    #[test]
    fn test_hp_skill_bonus_stops_at_cap() {
        let mut p = player();
        let max = SkillId::Hp.info().max_level;
        for _ in 0..max + 2 {
            p.add_skill(SkillId::Hp);
        }
        assert_eq!(p.skill(SkillId::Hp), max);
        assert_eq!(p.max_hp, PLAYER_BASE_HP + HP_SKILL_BONUS * max as f32);
        assert_eq!(p.hp, p.max_hp);
    }

    #[test]
    fn test_dash_double_trigger() {
        let mut p = player();
        assert_eq!(p.try_dash(), DashOutcome::Started);
        let snapshot = (p.dash_cd, p.dash_active, p.invuln);
        assert_eq!(p.try_dash(), DashOutcome::OnCooldown);
        assert_eq!((p.dash_cd, p.dash_active, p.invuln), snapshot);
    }

    #[test]
    fn test_dash_cooldown_spacing() {
        let mut p = player();
        assert_eq!(p.try_dash(), DashOutcome::Started);
        for tick in 1..=DASH_COOLDOWN as u64 {
            if tick > 1 {
                assert_eq!(p.try_dash(), DashOutcome::OnCooldown);
            }
            p.tick_status(tick);
        }
        // Next press lands exactly DASH_COOLDOWN ticks after the first
        assert_eq!(p.dash_cd, 0);
        assert_eq!(p.try_dash(), DashOutcome::Started);
    }

    #[test]
    fn test_dash_invulnerability_window() {
        let mut p = player();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut vulnerable_at = None;
        for tick in 1..=60u64 {
            if tick == 1 {
                p.try_dash();
            }
            p.tick_status(tick);
            p.move_step(Vec2::ZERO, &[], &[], &mut rng);
            if !p.is_invulnerable() && vulnerable_at.is_none() {
                vulnerable_at = Some(tick);
            }
        }
        assert_eq!(vulnerable_at, Some(DASH_INVULN as u64));
    }

    #[test]
    fn test_dash_rejected_while_rooted() {
        let mut p = player();
        assert!(p.apply_root(90));
        assert_eq!(p.try_dash(), DashOutcome::Rooted);
        assert_eq!(p.dash_cd, 0);
        // EMP breaks the root
        let pulse = p.try_emp().unwrap();
        assert!(pulse.freed);
        assert!(!p.is_rooted());
    }

    #[test]
    fn test_root_ignored_while_invulnerable() {
        let mut p = player();
        p.try_dash();
        assert!(!p.apply_root(90));
        assert!(!p.is_rooted());
    }

    #[test]
    fn test_root_expiry_reports_freed() {
        let mut p = player();
        p.apply_root(2);
        assert!(!p.tick_status(1).freed);
        assert!(p.tick_status(2).freed);
    }

    #[test]
    fn test_shield_absorbs_hit() {
        let mut p = player();
        let mut rng = Pcg32::seed_from_u64(2);
        p.add_skill(SkillId::Shield);
        let charge = p.shield_charge_ticks() as u64;
        for t in 1..=charge {
            assert!(!p.tick_status(t).shield_ready);
        }
        assert!(!p.shield_ready);
        assert!(p.tick_status(charge + 1).shield_ready);
        assert!(p.shield_ready);
        let outcome = p.take_hit(50.0, &mut rng);
        assert_eq!(
            outcome,
            HitOutcome::ShieldBurst(Nova {
                base: 110.0,
                radius: 180.0
            })
        );
        assert_eq!(p.hp, p.max_hp);
        assert!(!p.shield_ready);
    }

    #[test]
    fn test_armor_minimum_one() {
        let mut p = player();
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..5 {
            p.add_skill(SkillId::Armor);
        }
        match p.take_hit(4.0, &mut rng) {
            HitOutcome::Damaged { amount, fatal, .. } => {
                assert_eq!(amount, 1.0);
                assert!(!fatal);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_fatal_hit() {
        let mut p = player();
        let mut rng = Pcg32::seed_from_u64(4);
        p.add_skill(SkillId::Thorns);
        match p.take_hit(500.0, &mut rng) {
            HitOutcome::Damaged { thorns, fatal, .. } => {
                assert!(fatal);
                assert_eq!(
                    thorns,
                    Some(Nova {
                        base: 10.0,
                        radius: 150.0
                    })
                );
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(p.hp, 0.0);
        assert!(p.is_dead());
    }

    #[test]
    fn test_slow_zone_halves_speed() {
        let mut p = player();
        let mut rng = Pcg32::seed_from_u64(5);
        p.add_skill(SkillId::Speed);
        let zones = [SlowZone {
            rect: Rect::new(1900.0, 1900.0, 400.0, 400.0),
        }];
        let start = p.pos;
        p.move_step(Vec2::X, &[], &zones, &mut rng);
        assert!((p.pos.x - start.x - 2.75).abs() < 1e-4);

        // Dashing ignores the zone
        p.try_dash();
        let start = p.pos;
        p.move_step(Vec2::X, &[], &zones, &mut rng);
        assert!((p.pos.x - start.x - 5.5 * DASH_SPEED_MULT).abs() < 1e-3);
    }

    #[test]
    fn test_wall_blocks_axis() {
        let mut p = player();
        let mut rng = Pcg32::seed_from_u64(6);
        let walls = [Obstacle::wall(2020.0, 1900.0, 50.0, 200.0)];
        let start = p.pos;
        p.move_step(Vec2::new(1.0, 1.0), &[], &[], &mut rng);
        assert!(p.pos.x > start.x && p.pos.y > start.y);
        let start = p.pos;
        p.move_step(Vec2::X, &walls, &[], &mut rng);
        assert_eq!(p.pos, start);
    }

    #[test]
    fn test_fire_fan_and_rear() {
        let mut p = player();
        let mut rng = Pcg32::seed_from_u64(7);
        p.add_skill(SkillId::Multi);
        p.add_skill(SkillId::Multi);
        p.add_skill(SkillId::Rear);
        let bullets = p.fire(Some(0.0), &mut rng);
        assert_eq!(bullets.len(), 4);
        let angles: Vec<f32> = bullets.iter().map(|b| b.vel.y.atan2(b.vel.x)).collect();
        assert!((angles[0] + 0.12).abs() < 1e-4);
        assert!(angles[1].abs() < 1e-4);
        assert!((angles[2] - 0.12).abs() < 1e-4);
        assert!((angles[3].abs() - std::f32::consts::PI).abs() < 1e-4);
        assert_eq!(p.fire_timer, PLAYER_FIRE_INTERVAL);

        // Cooling down: nothing fires
        assert!(p.fire(Some(0.0), &mut rng).is_empty());
    }

    #[test]
    fn test_no_target_keeps_timer_zero() {
        let mut p = player();
        let mut rng = Pcg32::seed_from_u64(8);
        assert!(p.fire(None, &mut rng).is_empty());
        assert_eq!(p.fire_timer, 0);
    }

    #[test]
    fn test_fire_interval_floor() {
        let mut p = player();
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..10 {
            p.add_skill(SkillId::Spd);
        }
        p.fire(Some(0.0), &mut rng);
        assert_eq!(p.fire_timer, 5);
    }

    #[test]
    fn test_level_curve() {
        let mut p = player();
        p.gain_xp(60.0);
        assert!(p.level_up_ready());
        assert_eq!(p.advance_level(), 2);
        assert!((p.xp - 10.0).abs() < 1e-5);
        // 50 + 50 + 2^1.2 * 5 = 111.48
        assert_eq!(p.xp_next, 111.0);
        assert!(!p.level_up_ready());
    }

    #[test]
    fn test_passive_timers() {
        let mut p = player();
        let mut rng = Pcg32::seed_from_u64(10);
        p.add_skill(SkillId::Aura);
        p.add_skill(SkillId::Mines);
        p.add_skill(SkillId::Orbit);
        let mut auras = 0;
        let mut mines = 0;
        let mut orbit_hits = 0;
        for _ in 0..120 {
            let t = p.tick_passives(&mut rng);
            auras += t.aura.is_some() as u32;
            mines += t.mines.len();
            orbit_hits += t.orbit.is_some() as u32;
        }
        // Aura every 52 ticks, one mine at tick 120, drones every 20
        assert_eq!(auras, 2);
        assert_eq!(mines, 1);
        assert_eq!(orbit_hits, 6);
        assert_eq!(p.orbit_positions().len(), 1);
        assert!((p.orbit_positions()[0].distance(p.pos) - 112.0).abs() < 1e-3);
    }
}

//! Match state and the damage paths that cross entity boundaries
//!
//! `World` is the one mutable aggregate. Anything that kills, heals or
//! rewards goes through a method here so score, drops and signals stay in
//! one place.

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::damage::{cubic_falloff, resolve_damage};
use super::director::{Director, ring_spot};
use super::enemy::{Enemy, EnemyKind};
use super::entities::{
    Barrel, Color, FloatText, LaserBeam, Mine, Obstacle, Particle, Pickup, PickupKind, Projectile,
    SlowZone, colors,
};
use super::events::{GameEvent, LootReward, RunSummary, SoundCue};
use super::map::{self, random_clear_point, world_center};
use super::objective::{AirdropZone, LootRoll, roll_loot};
use super::player::{HitOutcome, Nova, Player};
use super::skills::SkillId;
use crate::consts::*;
use crate::persistence::MetaBonuses;
use crate::settings::Settings;

/// Base chip drop chance before the greed bonus
pub const CHIP_DROP_CHANCE: f32 = 0.05;
pub const SKILL_CRATE_DROP_CHANCE: f32 = 0.005;
pub const LIFESTEAL_HEAL: f32 = 5.0;
pub const SUPPLY_HEAL: f32 = 50.0;
pub const SUPPLY_XP: f32 = 150.0;
/// Fallback when a skill offer finds nothing left to learn
pub const LIMIT_BREAK_HEAL: f32 = 100.0;
pub const LIMIT_BREAK_XP: f32 = 500.0;
pub const LEVEL_UP_CHOICES: usize = 3;
/// Knockback factor of shockwaves, applied to the offset from the centre
pub const SHOCKWAVE_PUSH: f32 = 0.2;
pub const CHAIN_RADIUS: f32 = 120.0;
pub const CHAIN_RADIUS_EVOLVED: f32 = 200.0;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
    /// Waiting on `World::choose_skill` or `World::decline_choice`
    ChoosingSkill,
    GameOver,
}

/// A skill decision the host has to make
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkillChoice {
    /// Pick one of up to three
    LevelUp(Vec<SkillId>),
    /// Take it or leave it (crates and loot boxes)
    Offer(SkillId),
}

impl SkillChoice {
    pub fn allows(&self, id: SkillId) -> bool {
        match self {
            SkillChoice::LevelUp(choices) => choices.contains(&id),
            SkillChoice::Offer(skill) => *skill == id,
        }
    }
}

/// One enemy death, consumed by the objective at end of tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillRecord {
    pub enemy_id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    /// Player position at the moment of the kill
    pub player_pos: Vec2,
    /// An activated airdrop zone held the player when this kill landed
    pub in_zone: bool,
}

/// Area damage around a point
#[derive(Debug, Clone, Copy)]
pub struct Blast {
    pub origin: Vec2,
    pub nova: Nova,
    /// Scale damage by cubic distance falloff
    pub falloff: bool,
    /// Push enemies away from the origin
    pub knockback: bool,
    /// Always report hits as crits
    pub flagged_crit: bool,
    /// Enemy index that is never hit (the source of a chain explosion)
    pub skip: Option<usize>,
}

impl Blast {
    pub fn new(origin: Vec2, nova: Nova) -> Self {
        Self {
            origin,
            nova,
            falloff: false,
            knockback: false,
            flagged_crit: false,
            skip: None,
        }
    }

    pub fn with_falloff(mut self) -> Self {
        self.falloff = true;
        self
    }

    pub fn with_knockback(mut self) -> Self {
        self.knockback = true;
        self
    }

    pub fn flagged_crit(mut self) -> Self {
        self.flagged_crit = true;
        self
    }

    pub fn sparing(mut self, idx: usize) -> Self {
        self.skip = Some(idx);
        self
    }
}

/// The match context
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: Settings,
    pub bonuses: MetaBonuses,
    pub tick: u64,
    /// Whole seconds elapsed
    pub game_time: u32,
    /// Global difficulty scalar (+0.01 per second)
    pub difficulty: f32,
    /// Top-left corner of the viewport in world space
    pub camera: Vec2,
    pub score: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub director: Director,
    pub obstacles: Vec<Obstacle>,
    pub mines: Vec<Mine>,
    pub barrels: Vec<Barrel>,
    pub slow_zones: Vec<SlowZone>,
    pub bullets: Vec<Projectile>,
    pub enemy_bullets: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub pickups: Vec<Pickup>,
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatText>,
    pub lasers: Vec<LaserBeam>,
    pub airdrop: Option<AirdropZone>,
    pub kill_log: Vec<KillRecord>,
    pub pending: Option<SkillChoice>,
    pub kills: u32,
    /// Chips collected this run
    pub chips: u32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    /// Generate the map and place the player at the centre
    pub fn new(seed: u64, settings: Settings, bonuses: MetaBonuses) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let layout = map::generate(&mut rng);
        let player = Player::new(world_center(), &bonuses);

        let mut world = Self {
            seed,
            rng,
            difficulty: settings.difficulty.start_difficulty(),
            settings,
            bonuses,
            tick: 0,
            game_time: 0,
            camera: Vec2::ZERO,
            score: 0,
            phase: GamePhase::Playing,
            player,
            director: Director::new(),
            obstacles: layout.obstacles,
            mines: Vec::new(),
            barrels: layout.barrels,
            slow_zones: layout.slow_zones,
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            pickups: Vec::new(),
            particles: Vec::new(),
            texts: Vec::new(),
            lasers: Vec::new(),
            airdrop: None,
            kill_log: Vec::new(),
            pending: None,
            kills: 0,
            chips: 0,
            events: Vec::new(),
            next_id: 1,
        };
        world.update_camera();
        world.spawn_airdrop();

        log::info!(
            "Match started (seed {}, {}, difficulty {:.2})",
            seed,
            world.settings.difficulty.as_str(),
            world.difficulty
        );
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all signals raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.score,
            survived_secs: self.game_time,
            level: self.player.level,
            kills: self.kills,
            chips: self.chips,
        }
    }

    pub fn live_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    /// Centre the viewport on the player, clamped to the world
    pub fn update_camera(&mut self) {
        let view = Vec2::new(self.settings.viewport_w, self.settings.viewport_h);
        let max = (Vec2::splat(WORLD_SIZE) - view).max(Vec2::ZERO);
        self.camera = (self.player.pos - view / 2.0).clamp(Vec2::ZERO, max);
    }

    pub fn push_particles(&mut self, pos: Vec2, color: Color, count: usize, size: f32) {
        let room = self
            .settings
            .max_particles()
            .saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let p = Particle::new(pos, color, size, &mut self.rng);
            self.particles.push(p);
        }
    }

    pub fn push_text(&mut self, pos: Vec2, text: impl Into<String>, color: Color, font_size: f32) {
        self.texts.push(FloatText::new(pos, text, color, font_size));
    }

    /// Text above the player
    pub fn notice(&mut self, rise: f32, text: &str, color: Color) {
        let pos = self.player.pos - Vec2::new(0.0, rise);
        self.push_text(pos, text, color, 16.0);
    }

    pub fn heal_player(&mut self, amount: f32) {
        let healed = self.player.heal(amount);
        if healed > 0.0 {
            let pos = self.player.pos - Vec2::new(0.0, 20.0);
            self.push_text(pos, format!("+{}", healed.round() as u32), colors::GREEN, 16.0);
        }
    }

    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let enemy = Enemy::new(id, kind, pos, self.difficulty, self.game_time, &mut self.rng);
        self.enemies.push(enemy);
        id
    }

    /// Damage the enemy at `idx`. Returns true if this call killed it.
    ///
    /// On a kill: score, XP gem, lifesteal, chip and crate drops, kill log,
    /// and the chain explosion when the player owns it.
    pub fn damage_enemy(&mut self, idx: usize, amount: f32, is_crit: bool) -> bool {
        let Some(enemy) = self.enemies.get_mut(idx) else {
            return false;
        };
        if enemy.dead {
            return false;
        }
        let killed = enemy.take_damage(amount, is_crit, &mut self.rng);
        let (id, kind, pos, xp, color) = (enemy.id, enemy.kind, enemy.pos, enemy.xp, enemy.color);

        if self.settings.damage_numbers {
            let label = amount.floor() as i64;
            if is_crit {
                self.push_text(pos - Vec2::new(0.0, 35.0), format!("{label}!"), colors::CRIT, 24.0);
            } else {
                self.push_text(pos - Vec2::new(0.0, 20.0), label.to_string(), colors::WHITE, 14.0);
            }
        }
        if !killed {
            return false;
        }

        self.score += xp as u64;
        self.kills += 1;
        let player_pos = self.player.pos;
        let in_zone = self
            .airdrop
            .as_ref()
            .is_some_and(|z| z.activated && z.contains(player_pos));
        self.kill_log.push(KillRecord {
            enemy_id: id,
            kind,
            pos,
            player_pos,
            in_zone,
        });

        if self.rng.random::<f32>() < self.player.stats.lifesteal {
            self.heal_player(LIFESTEAL_HEAL);
        }
        let size = 2.0 + self.rng.random::<f32>() * 2.0;
        self.push_particles(pos, color, 6, size);
        self.emit(GameEvent::Sound(SoundCue::Hit));

        self.pickups.push(Pickup::new(PickupKind::XpGem, pos, xp));
        if self.rng.random::<f32>() < CHIP_DROP_CHANCE + self.bonuses.chip_drop_bonus {
            self.pickups
                .push(Pickup::new(PickupKind::Chip, pos, xp.div_ceil(15)));
        }
        if self.rng.random::<f32>() < SKILL_CRATE_DROP_CHANCE {
            self.pickups.push(Pickup::new(PickupKind::SkillCrate, pos, 1));
            self.push_text(pos - Vec2::new(0.0, 50.0), "MODULE!", colors::CYAN, 16.0);
        }

        let boom = self.player.skill(SkillId::Boom);
        if boom > 0 {
            let radius = if boom >= 3 {
                CHAIN_RADIUS_EVOLVED
            } else {
                CHAIN_RADIUS
            };
            let base = self.player.level as f32 * 5.0 + boom as f32 * 20.0;
            self.push_particles(pos, colors::RED, 10, 3.0);
            self.apply_blast(
                Blast::new(pos, Nova { base, radius })
                    .with_falloff()
                    .sparing(idx),
            );
        }
        true
    }

    /// Damage every live enemy inside the blast. Returns the number killed.
    pub fn apply_blast(&mut self, blast: Blast) -> u32 {
        let mut killed = 0;
        for i in 0..self.enemies.len() {
            if blast.skip == Some(i) {
                continue;
            }
            let enemy = &self.enemies[i];
            if enemy.dead {
                continue;
            }
            let offset = enemy.pos - blast.origin;
            let dist = offset.length();
            if dist >= blast.nova.radius {
                continue;
            }
            let base = if blast.falloff {
                blast.nova.base * cubic_falloff(dist, blast.nova.radius)
            } else {
                blast.nova.base
            };
            let roll = resolve_damage(base, &self.player.stats, &mut self.rng);
            if self.damage_enemy(i, roll.amount, roll.is_crit || blast.flagged_crit) {
                killed += 1;
            }
            // Replaces the random hit jitter
            if blast.knockback {
                self.enemies[i].knockback = offset * SHOCKWAVE_PUSH;
            }
        }
        killed
    }

    /// Route a hit on the player through shield, dodge and armor
    pub fn damage_player(&mut self, amount: f32) {
        if self.is_over() {
            return;
        }
        let origin = self.player.pos;
        match self.player.take_hit(amount, &mut self.rng) {
            HitOutcome::Ignored => {}
            HitOutcome::ShieldBurst(nova) => {
                self.apply_blast(
                    Blast::new(origin, nova)
                        .with_falloff()
                        .with_knockback()
                        .flagged_crit(),
                );
                self.notice(50.0, "SHIELD BLAST!", colors::CYAN);
                self.push_particles(origin, colors::CYAN, 20, 3.0);
                self.emit(GameEvent::Sound(SoundCue::Hit));
            }
            HitOutcome::Dodged => self.notice(40.0, "DODGE!", colors::WHITE),
            HitOutcome::Damaged {
                amount,
                thorns,
                fatal,
            } => {
                self.notice(30.0, &format!("-{}", amount.floor() as u32), colors::RED);
                self.emit(GameEvent::Sound(SoundCue::Hit));
                if let Some(nova) = thorns {
                    self.apply_blast(Blast::new(origin, nova));
                }
                if fatal {
                    self.game_over();
                }
            }
        }
    }

    fn game_over(&mut self) {
        if self.is_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.pending = None;
        let summary = self.summary();
        log::info!(
            "Game over: score {}, survived {}s, level {}, {} kills",
            summary.score,
            summary.survived_secs,
            summary.level,
            summary.kills
        );
        self.emit(GameEvent::GameOver { summary });
    }

    /// Start a level-up choice, or heal fully when every skill is maxed
    pub fn begin_level_up(&mut self) {
        let level = self.player.advance_level();
        self.emit(GameEvent::Sound(SoundCue::LevelUp));

        let pool = self.player.skills.available();
        let choices: Vec<SkillId> = pool
            .choose_multiple(&mut self.rng, LEVEL_UP_CHOICES)
            .copied()
            .collect();

        if choices.is_empty() {
            log::info!("Level {}: nothing left to learn, full heal", level);
            let max = self.player.max_hp;
            self.heal_player(max);
            self.emit(GameEvent::LimitBreak);
            return;
        }

        log::info!("Level {}: offering {:?}", level, choices);
        self.pending = Some(SkillChoice::LevelUp(choices.clone()));
        self.phase = GamePhase::ChoosingSkill;
        self.emit(GameEvent::LevelUp { level, choices });
    }

    /// Offer one random skill (crates, loot boxes)
    pub fn offer_random_skill(&mut self) {
        let pool = self.player.skills.available();
        match pool.choose(&mut self.rng).copied() {
            Some(skill) => {
                self.pending = Some(SkillChoice::Offer(skill));
                self.phase = GamePhase::ChoosingSkill;
                self.emit(GameEvent::SkillOffered { skill });
            }
            None => {
                self.heal_player(LIMIT_BREAK_HEAL);
                self.player.gain_xp(LIMIT_BREAK_XP);
                self.notice(60.0, "LIMIT BREAK!", colors::GOLD);
                self.emit(GameEvent::LimitBreak);
            }
        }
    }

    /// Apply the host's skill pick and resume. Returns false if `id` was
    /// not on offer.
    pub fn choose_skill(&mut self, id: SkillId) -> bool {
        let allowed = self.pending.as_ref().is_some_and(|c| c.allows(id));
        if !allowed {
            log::debug!("Rejected skill choice {}", id.as_str());
            return false;
        }
        let level = self.player.add_skill(id);
        log::info!("Skill {} -> level {}", id.as_str(), level);
        self.pending = None;
        self.phase = GamePhase::Playing;
        self.emit(GameEvent::Sound(SoundCue::PowerUp));
        true
    }

    /// Skip the pending choice and resume
    pub fn decline_choice(&mut self) {
        if self.phase == GamePhase::ChoosingSkill {
            self.pending = None;
            self.phase = GamePhase::Playing;
        }
    }

    /// Try to open an airdrop zone near the player
    pub fn spawn_airdrop(&mut self) {
        let spot = ring_spot(
            self.player.pos,
            300.0,
            700.0,
            200.0,
            150.0,
            10,
            &self.obstacles,
            &mut self.rng,
        );
        match spot {
            Some(pos) => {
                let zone = AirdropZone::roll(pos, self.game_time, &mut self.rng);
                log::info!("Airdrop zone at ({:.0}, {:.0}): {:?}", pos.x, pos.y, zone.task);
                self.airdrop = Some(zone);
                self.emit(GameEvent::ObjectiveSpawned { pos });
            }
            None => log::debug!("No clear spot for an airdrop zone"),
        }
    }

    pub fn has_loot_box(&self) -> bool {
        self.pickups.iter().any(|p| p.kind == PickupKind::LootBox)
    }

    /// Swap a completed zone for a loot box
    pub fn complete_airdrop(&mut self) {
        let Some(zone) = self.airdrop.take() else {
            return;
        };
        log::info!("Airdrop objective completed");
        self.pickups
            .push(Pickup::new(PickupKind::LootBox, zone.pos, 1));
        self.push_particles(zone.pos, colors::GOLD, 30, 6.0);
        self.notice(80.0, "CARGO DELIVERED!", colors::GOLD);
        self.emit(GameEvent::Sound(SoundCue::PowerUp));
        self.emit(GameEvent::ObjectiveCompleted { pos: zone.pos });
    }

    pub fn open_loot_box(&mut self) {
        match roll_loot(&mut self.rng) {
            LootRoll::Heal(amount) => {
                self.heal_player(amount);
                self.emit(GameEvent::LootBoxOpened {
                    reward: LootReward::Heal(amount),
                });
            }
            LootRoll::Skill => {
                self.emit(GameEvent::LootBoxOpened {
                    reward: LootReward::Skill,
                });
                self.offer_random_skill();
            }
        }
        self.emit(GameEvent::Sound(SoundCue::Pickup));
    }

    /// Forced titan spawn 500 px from the player
    pub fn spawn_titan(&mut self) {
        let spot = ring_spot(
            self.player.pos,
            500.0,
            500.0,
            50.0,
            60.0,
            10,
            &self.obstacles,
            &mut self.rng,
        );
        let Some(pos) = spot else {
            log::debug!("No clear spot for a titan");
            return;
        };
        self.spawn_enemy(EnemyKind::Titan, pos);
        log::info!("Titan spawned at {}s", self.game_time);
        self.notice(100.0, "TITAN INCOMING!", colors::RED);
        self.emit(GameEvent::TitanSpawned { pos });
    }

    pub fn spawn_supply_crate(&mut self) {
        if let Some(pos) = random_clear_point(80.0, 20.0, 10, &self.obstacles, &mut self.rng) {
            self.pickups
                .push(Pickup::new(PickupKind::SupplyCrate, pos, 1));
        }
    }

    pub fn spawn_skill_crate(&mut self) {
        if let Some(pos) = random_clear_point(100.0, 20.0, 10, &self.obstacles, &mut self.rng) {
            self.pickups
                .push(Pickup::new(PickupKind::SkillCrate, pos, 1));
        }
    }

    /// Effects of picking something up (loot boxes open separately)
    pub fn collect(&mut self, pickup: &Pickup) {
        match pickup.kind {
            PickupKind::XpGem => self.player.gain_xp(pickup.value as f32),
            PickupKind::Chip => {
                self.chips += pickup.value;
                self.notice(20.0, &format!("+${}", pickup.value), colors::GOLD);
                self.emit(GameEvent::ChipCollected {
                    value: pickup.value,
                });
                self.emit(GameEvent::Sound(SoundCue::PowerUp));
            }
            PickupKind::SupplyCrate => {
                self.heal_player(SUPPLY_HEAL);
                self.player.gain_xp(SUPPLY_XP);
                self.notice(40.0, "SUPPLIES!", colors::GREEN);
                self.emit(GameEvent::Sound(SoundCue::Pickup));
            }
            PickupKind::SkillCrate => {
                self.emit(GameEvent::Sound(SoundCue::Pickup));
                self.offer_random_skill();
            }
            PickupKind::LootBox => self.open_loot_box(),
        }
    }
}

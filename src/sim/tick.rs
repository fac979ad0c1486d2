//! Fixed timestep simulation tick
//!
//! Advances the world one step in a fixed order. Every stage reads the
//! results of the stages before it within the same tick.

use glam::Vec2;

use super::damage::resolve_damage;
use super::director::{place_pack, power_score};
use super::enemy::{EnemyAction, EnemyContext, Neighbour};
use super::entities::{
    BARREL_BLAST_DAMAGE, BARREL_BLAST_RADIUS, BARREL_PLAYER_DAMAGE, LaserBeam, MineState, Owner,
    PickupKind, Projectile, circle_hits_barrel, colors,
};
use super::events::{GameEvent, SoundCue};
use super::player::{DashOutcome, Nova, ORBIT_DRONE_RADIUS, PassiveTriggers};
use super::state::{Blast, GamePhase, SkillChoice, World};
use crate::angle_to;
use crate::consts::*;

pub const SUPPLY_CRATE_SECS: u32 = 20;
pub const SKILL_CRATE_SECS: u32 = 60;
pub const TITAN_INTERVAL_SECS: u32 = 300;
pub const AIRDROP_INTERVAL_TICKS: u64 = 300;
pub const DIFFICULTY_PER_SECOND: f32 = 0.01;
/// Enemy speed factor inside the freeze field
pub const FREEZE_SLOW: f32 = 0.5;

/// Autopilot: enemies closer than this push the player away
const AUTOPILOT_DANGER: f32 = 250.0;
const AUTOPILOT_DASH_RANGE: f32 = 60.0;
const AUTOPILOT_EMP_CROWD: usize = 8;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent (keyboard); normalised by the player
    pub move_dir: Vec2,
    /// Pointer in world space. None aims at the nearest enemy.
    pub aim: Option<Vec2>,
    pub dash: bool,
    pub emp: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode: the simulation steers and picks skills itself
    pub autopilot: bool,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match world.phase {
            GamePhase::Playing => {
                world.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => world.phase = GamePhase::Playing,
            _ => {}
        }
    }

    if input.autopilot && world.phase == GamePhase::ChoosingSkill {
        autopilot_choose(world);
    }

    if world.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot_steer(world, &mut input);
    }

    advance_clock(world);
    airdrop_timer(world);
    run_director(world);
    update_player(world, &input);
    update_objective(world);
    update_hazards(world);
    update_bullets(world);
    update_enemy_bullets(world);
    update_enemies(world);
    update_pickups(world);
    finish_tick(world);
}

/// Tick counter, game clock and the once-per-second spawns
fn advance_clock(world: &mut World) {
    world.tick += 1;
    if world.tick % TICK_RATE as u64 != 0 {
        return;
    }
    world.game_time += 1;
    world.difficulty += DIFFICULTY_PER_SECOND;

    let t = world.game_time;
    if t % SUPPLY_CRATE_SECS == 0 {
        world.spawn_supply_crate();
    }
    if t % SKILL_CRATE_SECS == 0 {
        world.spawn_skill_crate();
    }
    if t % TITAN_INTERVAL_SECS == 0 {
        world.spawn_titan();
    }
}

fn airdrop_timer(world: &mut World) {
    if world.tick % AIRDROP_INTERVAL_TICKS == 0 && world.airdrop.is_none() && !world.has_loot_box()
    {
        world.spawn_airdrop();
    }
}

fn run_director(world: &mut World) {
    let power = power_score(
        world.player.level,
        world.player.skills.total(),
        world.game_time,
    );
    let live = world.live_enemies();
    let orders = world.director.update(
        world.tick,
        power,
        live,
        world.difficulty,
        world.game_time,
        &mut world.rng,
    );

    let viewport = world.settings.viewport_max();
    for order in orders {
        let Some(spots) = place_pack(
            &order,
            world.player.pos,
            viewport,
            &world.obstacles,
            &mut world.rng,
        ) else {
            continue;
        };
        for pos in spots {
            world.spawn_enemy(order.kind, pos);
        }
    }
}

/// Indices of up to `count` live enemies nearest to `origin`
pub fn nearest_enemies(world: &World, origin: Vec2, count: usize) -> Vec<usize> {
    let mut live: Vec<(usize, f32)> = world
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_alive())
        .map(|(i, e)| (i, e.pos.distance_squared(origin)))
        .collect();
    live.sort_by(|a, b| a.1.total_cmp(&b.1));
    live.into_iter().take(count).map(|(i, _)| i).collect()
}

/// Abilities, status, passives, movement, weapon, camera
fn update_player(world: &mut World, input: &TickInput) {
    if input.dash {
        match world.player.try_dash() {
            DashOutcome::Started => {
                world.notice(40.0, "DASH!", colors::CYAN);
                world.emit(GameEvent::Sound(SoundCue::Dash));
            }
            DashOutcome::Rooted => world.notice(40.0, "CAN'T!", colors::RED),
            DashOutcome::OnCooldown => {}
        }
    }

    if input.emp {
        if let Some(pulse) = world.player.try_emp() {
            let pos = world.player.pos;
            if pulse.freed {
                world.notice(80.0, "FREE!", colors::GREEN);
            }
            world.push_particles(pos, colors::CYAN, 24, 3.0);
            world.apply_blast(Blast::new(pos, pulse.nova));
            world.notice(60.0, "EMP!", colors::CYAN);
            world.emit(GameEvent::Sound(SoundCue::Emp));
        }
    }

    let status = world.player.tick_status(world.tick);
    if status.freed {
        world.notice(40.0, "FREE!", colors::GREEN);
    }
    if status.shield_ready {
        let pos = world.player.pos;
        world.notice(40.0, "SHIELD READY", colors::CYAN);
        world.push_particles(pos, colors::CYAN, 8, 3.0);
    }
    if status.regen > 0.0 {
        let pos = world.player.pos - Vec2::new(0.0, 20.0);
        world.push_text(pos, format!("+{}", status.regen.round() as u32), colors::GREEN, 14.0);
    }

    let triggers = world.player.tick_passives(&mut world.rng);
    apply_passives(world, triggers);

    world.player.move_step(
        input.move_dir,
        &world.obstacles,
        &world.slow_zones,
        &mut world.rng,
    );
    if world.player.is_dashing() && world.tick % 3 == 0 {
        let pos = world.player.pos;
        world.push_particles(pos, colors::CYAN, 1, 3.0);
    }

    let pos = world.player.pos;
    let aim = match input.aim {
        Some(target) => Some(angle_to(pos, target)),
        None => nearest_enemies(world, pos, 1)
            .first()
            .map(|&i| angle_to(pos, world.enemies[i].pos)),
    };
    let shots = world.player.fire(aim, &mut world.rng);
    if !shots.is_empty() {
        world.emit(GameEvent::Sound(SoundCue::Shoot));
        world.bullets.extend(shots);
    }

    world.update_camera();
}

fn apply_passives(world: &mut World, triggers: PassiveTriggers) {
    let pos = world.player.pos;

    if let Some(nova) = triggers.aura {
        world.apply_blast(Blast::new(pos, nova));
    }

    world.mines.extend(triggers.mines);

    if let Some((count, base)) = triggers.laser {
        let targets = nearest_enemies(world, pos, count as usize);
        if !targets.is_empty() {
            for i in targets {
                let target = world.enemies[i].pos;
                let roll = resolve_damage(base, &world.player.stats, &mut world.rng);
                world.damage_enemy(i, roll.amount, roll.is_crit);
                world.push_particles(target, colors::MAGENTA, 12, 3.0);
                world.lasers.push(LaserBeam::new(target));
            }
            world.player.laser_fired();
        }
    }

    if let Some(radius) = triggers.freeze_radius {
        for enemy in world.enemies.iter_mut() {
            if enemy.is_alive() && enemy.pos.distance(pos) < radius {
                enemy.slow_mult = FREEZE_SLOW;
            }
        }
    }

    if let Some(base) = triggers.orbit {
        let drones = world.player.orbit_positions();
        for i in 0..world.enemies.len() {
            let enemy = &world.enemies[i];
            let touching = enemy.is_alive()
                && drones
                    .iter()
                    .any(|d| d.distance(enemy.pos) < enemy.size + ORBIT_DRONE_RADIUS);
            if touching {
                let roll = resolve_damage(base, &world.player.stats, &mut world.rng);
                world.damage_enemy(i, roll.amount, roll.is_crit);
            }
        }
    }
}

/// Zone progress, completion and loot box pickup
fn update_objective(world: &mut World) {
    let player_pos = world.player.pos;
    let completed = match world.airdrop.as_mut() {
        Some(zone) => {
            zone.update(player_pos);
            zone.completed
        }
        None => false,
    };
    if completed {
        world.complete_airdrop();
    }

    let reach = world.player.radius;
    let loot = world.pickups.iter().position(|p| {
        p.kind == PickupKind::LootBox && p.pos.distance(player_pos) < reach + p.pickup_reach()
    });
    if let Some(idx) = loot {
        let loot = world.pickups.remove(idx);
        world.collect(&loot);
    }
}

/// Barrels then mines
fn update_hazards(world: &mut World) {
    let mut blasts = Vec::new();
    world.barrels.retain(|b| {
        if b.is_destroyed() {
            blasts.push(b.pos);
            false
        } else {
            true
        }
    });
    for pos in blasts {
        explode_barrel(world, pos);
    }

    let mut mines = std::mem::take(&mut world.mines);
    for mine in mines.iter_mut() {
        mine.tick();
        if !mine.is_armed() {
            continue;
        }
        let triggered = world
            .enemies
            .iter()
            .any(|e| e.is_alive() && e.pos.distance(mine.pos) < mine.radius);
        if triggered {
            world.apply_blast(Blast::new(
                mine.pos,
                Nova {
                    base: mine.damage,
                    radius: mine.radius,
                },
            ));
            mine.state = MineState::Detonated;
            world.push_particles(mine.pos, colors::RED, 10, 3.0);
            world.emit(GameEvent::Sound(SoundCue::Explosion));
        }
    }
    mines.retain(|m| m.state != MineState::Detonated);
    mines.append(&mut world.mines);
    world.mines = mines;
}

fn explode_barrel(world: &mut World, pos: Vec2) {
    world.push_particles(pos, colors::ORANGE, 15, 6.0);
    world.emit(GameEvent::Explosion {
        pos,
        radius: BARREL_BLAST_RADIUS,
    });
    world.emit(GameEvent::Sound(SoundCue::Explosion));

    world.apply_blast(
        Blast::new(
            pos,
            Nova {
                base: BARREL_BLAST_DAMAGE,
                radius: BARREL_BLAST_RADIUS,
            },
        )
        .with_knockback()
        .flagged_crit(),
    );

    if world.player.pos.distance(pos) < BARREL_BLAST_RADIUS {
        world.damage_player(BARREL_PLAYER_DAMAGE);
        world.notice(40.0, "BOOM!", colors::RED);
    }
}

/// Player bullets: move, barrels, enemies (pierce never hits an id twice)
fn update_bullets(world: &mut World) {
    let mut bullets = std::mem::take(&mut world.bullets);
    for bullet in bullets.iter_mut() {
        bullet.step(&world.obstacles);
        if !bullet.is_alive() {
            continue;
        }

        if let Some(barrel) = world
            .barrels
            .iter_mut()
            .find(|b| circle_hits_barrel(bullet.pos, bullet.radius, b))
        {
            barrel.hp -= bullet.damage;
            bullet.life = 0;
            world.push_particles(bullet.pos, colors::ORANGE, 3, 2.0);
            continue;
        }

        for i in 0..world.enemies.len() {
            let enemy = &world.enemies[i];
            if enemy.dead || bullet.has_hit(enemy.id) {
                continue;
            }
            if enemy.pos.distance(bullet.pos) < enemy.size + bullet.radius {
                let id = enemy.id;
                world.damage_enemy(i, bullet.damage, bullet.is_crit);
                if !bullet.register_hit(id) {
                    break;
                }
            }
        }
    }
    bullets.retain(Projectile::is_alive);
    bullets.append(&mut world.bullets);
    world.bullets = bullets;
}

fn update_enemy_bullets(world: &mut World) {
    let mut shots = std::mem::take(&mut world.enemy_bullets);
    for shot in shots.iter_mut() {
        shot.step(&world.obstacles);
        if !shot.is_alive() {
            continue;
        }
        if shot.pos.distance(world.player.pos) < world.player.radius + shot.radius {
            shot.life = 0;
            world.damage_player(shot.damage);
        }
    }
    shots.retain(Projectile::is_alive);
    shots.append(&mut world.enemy_bullets);
    world.enemy_bullets = shots;
}

/// Enemy AI against a neighbour snapshot, then their requested actions
fn update_enemies(world: &mut World) {
    let neighbours: Vec<Neighbour> = world
        .enemies
        .iter()
        .map(|e| Neighbour {
            id: e.id,
            pos: e.pos,
            size: e.size,
            alive: e.is_alive(),
        })
        .collect();

    let mut actions = Vec::new();
    for i in 0..world.enemies.len() {
        let ctx = EnemyContext {
            player_pos: world.player.pos,
            player_radius: world.player.radius,
            obstacles: &world.obstacles,
            neighbours: &neighbours,
        };
        world.enemies[i].update(&ctx, &mut world.rng, &mut actions);
        for action in actions.drain(..) {
            apply_enemy_action(world, i, action);
        }
    }
}

fn apply_enemy_action(world: &mut World, idx: usize, action: EnemyAction) {
    match action {
        EnemyAction::Contact { damage } => world.damage_player(damage),
        EnemyAction::Fire { pos, angle, damage } => {
            world.enemy_bullets.push(Projectile::new(
                pos,
                angle,
                ENEMY_BULLET_SPEED,
                damage,
                Owner::Enemy,
                ENEMY_BULLET_LIFE,
            ));
        }
        EnemyAction::Root { ticks } => {
            if world.player.apply_root(ticks) {
                let pos = world.player.pos;
                world.notice(50.0, "ROOTED!", colors::ROOT);
                world.push_particles(pos, colors::ROOT, 10, 3.0);
            }
        }
        EnemyAction::BuffPulse { pos, radius, ticks } => {
            for enemy in world.enemies.iter_mut() {
                if enemy.is_alive() && enemy.pos.distance(pos) < radius {
                    enemy.buff_ticks = ticks;
                }
            }
            world.push_particles(pos, colors::ORANGE, 20, 4.0);
        }
        EnemyAction::SelfDestruct => {
            let enemy = &world.enemies[idx];
            let (pos, hp) = (enemy.pos, enemy.hp);
            world.damage_enemy(idx, hp, false);
            world.push_particles(pos, colors::ORANGE, 12, 4.0);
            world.emit(GameEvent::Sound(SoundCue::Explosion));
        }
        EnemyAction::TitanCharging { pos } => world.emit(GameEvent::TitanCharging { pos }),
    }
}

/// Gem cap, magnet and collection
fn update_pickups(world: &mut World) {
    let gems = world
        .pickups
        .iter()
        .filter(|p| p.kind == PickupKind::XpGem)
        .count();
    if gems > MAX_GEMS {
        let mut cull = GEM_CULL_BATCH;
        world.pickups.retain(|p| {
            if p.kind == PickupKind::XpGem && cull > 0 {
                cull -= 1;
                false
            } else {
                true
            }
        });
    }

    let player_pos = world.player.pos;
    let radius = world.player.radius;
    let magnet = world.player.stats.magnet;
    // One skill offer at a time
    let mut offer_open = world.phase != GamePhase::Playing;
    let mut collected = Vec::new();

    let mut pickups = std::mem::take(&mut world.pickups);
    pickups.retain_mut(|p| {
        match p.kind {
            PickupKind::LootBox => return true,
            PickupKind::SkillCrate if offer_open => return true,
            _ => {}
        }
        if !p.update(player_pos, radius, magnet) {
            return true;
        }
        if p.kind == PickupKind::SkillCrate {
            offer_open = true;
        }
        collected.push(p.clone());
        false
    });
    pickups.append(&mut world.pickups);
    world.pickups = pickups;

    for pickup in &collected {
        world.collect(pickup);
    }
}

/// Cosmetics, dead enemies, objective kills, level-up
fn finish_tick(world: &mut World) {
    for p in world.particles.iter_mut() {
        p.update();
    }
    world.particles.retain(|p| p.life > 0.0);
    for t in world.texts.iter_mut() {
        t.update();
    }
    world.texts.retain(|t| t.life > 0);
    for l in world.lasers.iter_mut() {
        l.update();
    }
    world.lasers.retain(|l| l.life > 0);

    world.enemies.retain(|e| e.is_alive());

    let kills = std::mem::take(&mut world.kill_log);
    if let Some(zone) = world.airdrop.as_mut() {
        // Only kills made inside an already active zone count
        for kill in kills.iter().filter(|k| k.in_zone) {
            zone.record_kill(kill.player_pos);
        }
    }

    if world.phase == GamePhase::Playing && world.player.level_up_ready() {
        world.begin_level_up();
    }
}

/// Demo-mode movement: kite away from close enemies, otherwise head for
/// the objective or the nearest pickup
fn autopilot_steer(world: &World, input: &mut TickInput) {
    let pos = world.player.pos;
    let mut flee = Vec2::ZERO;
    let mut closest = f32::MAX;
    let mut crowd = 0;
    for enemy in world.enemies.iter().filter(|e| e.is_alive()) {
        let away = pos - enemy.pos;
        let dist = away.length().max(1.0);
        closest = closest.min(dist);
        if dist < AUTOPILOT_DANGER {
            flee += away / (dist * dist);
        }
        if dist < EMP_RADIUS {
            crowd += 1;
        }
    }

    let goal = world.airdrop.as_ref().map(|z| z.pos).or_else(|| {
        world
            .pickups
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance_squared(pos)
                    .total_cmp(&b.pos.distance_squared(pos))
            })
            .map(|p| p.pos)
    });
    let seek = goal.map_or(Vec2::ZERO, |g| (g - pos).normalize_or_zero());

    input.move_dir = (flee.normalize_or_zero() * 2.0 + seek).normalize_or_zero();
    input.dash |= closest < AUTOPILOT_DASH_RANGE;
    input.emp |= crowd >= AUTOPILOT_EMP_CROWD;
}

/// Demo-mode skill pick: first offered
fn autopilot_choose(world: &mut World) {
    let pick = match &world.pending {
        Some(SkillChoice::LevelUp(choices)) => choices.first().copied(),
        Some(SkillChoice::Offer(skill)) => Some(*skill),
        None => None,
    };
    match pick {
        Some(id) => {
            world.choose_skill(id);
        }
        None => world.decline_choice(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MetaBonuses;
    use crate::settings::Settings;
    use crate::sim::collision::Rect;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::entities::{MINE_ARM_TICKS, Mine, Obstacle, SlowZone};
    use crate::sim::objective::{AirdropZone, ObjectiveTask};
    use crate::sim::skills::SkillId;

    /// Open arena: no map, no hazards, no director
    fn arena(seed: u64) -> World {
        let mut world = World::new(seed, Settings::default(), MetaBonuses::default());
        world.obstacles = vec![Obstacle::wall(-100.0, -100.0, 50.0, 50.0)];
        world.barrels.clear();
        world.slow_zones.clear();
        world.airdrop = None;
        world.director.next_spawn = u64::MAX;
        world.drain_events();
        world
    }

    #[test]
    fn test_tick_pause() {
        let mut world = arena(1);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut world, &pause);
        assert_eq!(world.phase, GamePhase::Paused);
        assert_eq!(world.tick, 0);

        tick(&mut world, &TickInput::default());
        assert_eq!(world.tick, 0);

        tick(&mut world, &pause);
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.tick, 1);
    }

    #[test]
    fn test_game_clock() {
        let mut world = arena(2);
        for _ in 0..120 {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.game_time, 2);
        assert!((world.difficulty - 1.02).abs() < 1e-5);
    }

    #[test]
    fn test_bullets_kill_basic() {
        let mut world = arena(3);
        let spot = world.player.pos + Vec2::new(200.0, 0.0);
        world.spawn_enemy(EnemyKind::Basic, spot);

        for _ in 0..60 {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.kills, 1);
        assert_eq!(world.score, 15);
        assert!(world.enemies.is_empty());
        // Two 40-damage bullets, no contact hit
        assert_eq!(world.player.hp, world.player.max_hp);
    }

    #[test]
    fn test_slow_zone_halves_speed() {
        let mut world = arena(4);
        let start = world.player.pos;
        world.slow_zones.push(SlowZone {
            rect: Rect::new(start.x - 100.0, start.y - 100.0, 200.0, 200.0),
        });
        let right = TickInput {
            move_dir: Vec2::X,
            ..Default::default()
        };
        tick(&mut world, &right);
        assert!((world.player.pos.x - start.x - 2.5).abs() < 1e-4);

        world.slow_zones.clear();
        let before = world.player.pos.x;
        tick(&mut world, &right);
        assert!((world.player.pos.x - before - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_kamikaze_contact_ends_dead() {
        let mut world = arena(5);
        world.player.fire_timer = 1000;
        let spot = world.player.pos + Vec2::new(20.0, 0.0);
        world.spawn_enemy(EnemyKind::Kamikaze, spot);

        tick(&mut world, &TickInput::default());
        assert!(world.enemies.is_empty());
        assert_eq!(world.kills, 1);
        assert!((world.player.hp - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_kills_objective_completes_on_fifth() {
        let mut world = arena(6);
        let center = world.player.pos;
        world.airdrop = Some(AirdropZone::new(center, ObjectiveTask::Kills { target: 5 }));
        tick(&mut world, &TickInput::default());
        assert!(world.airdrop.as_ref().is_some_and(|z| z.activated));

        for kill in 1..=5 {
            let far = center + Vec2::new(1500.0, 0.0);
            world.spawn_enemy(EnemyKind::Basic, far);
            let idx = world.enemies.len() - 1;
            assert!(world.damage_enemy(idx, 1000.0, false));
            tick(&mut world, &TickInput::default());

            let zone = world.airdrop.as_ref().expect("zone still open");
            assert_eq!(zone.progress, kill);
            assert_eq!(zone.completed, kill == 5);
        }

        // Step out of loot box reach
        world.player.pos += Vec2::new(100.0, 0.0);
        tick(&mut world, &TickInput::default());
        assert!(world.airdrop.is_none());
        assert!(world.has_loot_box());
        assert!(
            world
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::ObjectiveCompleted { .. }))
        );
    }

    #[test]
    fn test_barrel_explodes_on_enemies() {
        let mut world = arena(7);
        world.player.fire_timer = 1000;
        let spot = world.player.pos + Vec2::new(600.0, 0.0);
        world.barrels.push(crate::sim::entities::Barrel::new(spot));
        world.barrels[0].hp = 0.0;
        world.spawn_enemy(EnemyKind::Basic, spot + Vec2::new(50.0, 0.0));

        tick(&mut world, &TickInput::default());
        assert!(world.barrels.is_empty());
        assert_eq!(world.kills, 1);
        // Player is far outside the blast
        assert_eq!(world.player.hp, world.player.max_hp);
    }

    #[test]
    fn test_gem_cap_drops_oldest() {
        use crate::sim::entities::Pickup;
        let mut world = arena(8);
        let far = Vec2::new(300.0, 300.0);
        for i in 0..(MAX_GEMS as u32 + 1) {
            world.pickups.push(Pickup::new(PickupKind::XpGem, far, i));
        }
        tick(&mut world, &TickInput::default());
        assert_eq!(world.pickups.len(), MAX_GEMS + 1 - GEM_CULL_BATCH);
        assert_eq!(world.pickups[0].value, GEM_CULL_BATCH as u32);
    }

    #[test]
    fn test_level_up_pauses_for_choice() {
        let mut world = arena(9);
        world.player.gain_xp(100.0);
        tick(&mut world, &TickInput::default());
        assert_eq!(world.phase, GamePhase::ChoosingSkill);

        let ticks = world.tick;
        tick(&mut world, &TickInput::default());
        assert_eq!(world.tick, ticks);

        let auto = TickInput {
            autopilot: true,
            ..Default::default()
        };
        tick(&mut world, &auto);
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.player.skills.total(), 1);
    }

    #[test]
    fn test_determinism() {
        let mut a = World::new(99999, Settings::default(), MetaBonuses::default());
        let mut b = World::new(99999, Settings::default(), MetaBonuses::default());
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..900 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.tick, b.tick);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.score, b.score);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.drain_events(), b.drain_events());
    }

    #[test]
    fn test_kill_before_zone_activation_not_counted() {
        let mut world = arena(10);
        world.player.fire_timer = 1000;
        let center = world.player.pos;
        world.airdrop = Some(AirdropZone::new(center, ObjectiveTask::Kills { target: 5 }));
        world.player.add_skill(SkillId::Aura);

        // Aura fires in step 4, the zone only activates in step 5
        world.player.aura_timer = 51;
        world.spawn_enemy(EnemyKind::Basic, center + Vec2::new(100.0, 0.0));
        world.enemies[0].hp = 1.0;
        tick(&mut world, &TickInput::default());

        assert_eq!(world.kills, 1);
        let zone = world.airdrop.as_ref().expect("zone open");
        assert!(zone.activated);
        assert_eq!(zone.progress, 0);

        world.player.aura_timer = 51;
        world.spawn_enemy(EnemyKind::Basic, center + Vec2::new(-100.0, 0.0));
        let idx = world.enemies.len() - 1;
        world.enemies[idx].hp = 1.0;
        tick(&mut world, &TickInput::default());

        assert_eq!(world.kills, 2);
        assert_eq!(world.airdrop.as_ref().map(|z| z.progress), Some(1));
    }

    #[test]
    fn test_laser_hits_nearest_and_waits_for_targets() {
        let mut world = arena(11);
        world.player.fire_timer = 1000;
        world.player.add_skill(SkillId::Laser);
        world.player.laser_timer = 200;

        tick(&mut world, &TickInput::default());
        assert!(world.lasers.is_empty());
        assert!(world.player.laser_timer > 200);

        let near = world.player.pos + Vec2::new(100.0, 0.0);
        let far = world.player.pos + Vec2::new(300.0, 0.0);
        world.spawn_enemy(EnemyKind::Tank, near);
        world.spawn_enemy(EnemyKind::Tank, far);
        tick(&mut world, &TickInput::default());

        // 60 + 5 per player level
        let lost = |e: &crate::sim::enemy::Enemy| e.max_hp() - e.hp;
        assert!((lost(&world.enemies[0]) - 65.0).abs() < 1e-3);
        assert_eq!(lost(&world.enemies[1]), 0.0);
        assert_eq!(world.lasers.len(), 1);
        assert_eq!(world.player.laser_timer, 0);
    }

    #[test]
    fn test_freeze_halves_enemy_speed() {
        let moved = |freeze: bool| {
            let mut world = arena(12);
            world.player.fire_timer = 1000;
            if freeze {
                world.player.add_skill(SkillId::Freeze);
            }
            let start = world.player.pos + Vec2::new(150.0, 0.0);
            world.spawn_enemy(EnemyKind::Basic, start);
            tick(&mut world, &TickInput::default());
            world.enemies[0].pos.distance(start)
        };
        let plain = moved(false);
        let frozen = moved(true);
        assert!((plain - 3.5).abs() < 1e-3);
        assert!((frozen - plain * FREEZE_SLOW).abs() < 1e-3);
    }

    #[test]
    fn test_emp_frees_root_and_damages_in_radius() {
        let mut world = arena(13);
        world.player.fire_timer = 1000;
        assert!(world.player.apply_root(90));
        let near = world.player.pos + Vec2::new(200.0, 0.0);
        let far = world.player.pos + Vec2::new(-400.0, 0.0);
        world.spawn_enemy(EnemyKind::Tank, near);
        world.spawn_enemy(EnemyKind::Tank, far);

        let emp = TickInput {
            emp: true,
            ..Default::default()
        };
        tick(&mut world, &emp);

        assert!(!world.player.is_rooted());
        assert!(world.player.emp_cd > 0);
        // 60 + 20 per player level, no falloff
        let lost = |e: &crate::sim::enemy::Enemy| e.max_hp() - e.hp;
        assert!((lost(&world.enemies[0]) - 80.0).abs() < 1e-3);
        assert_eq!(lost(&world.enemies[1]), 0.0);

        // Second press is on cooldown
        let hp = world.enemies[0].hp;
        tick(&mut world, &emp);
        assert_eq!(world.enemies[0].hp, hp);
    }

    #[test]
    fn test_mine_arms_then_detonates() {
        let mut world = arena(14);
        world.player.fire_timer = 1000;
        let spot = world.player.pos + Vec2::new(500.0, 0.0);
        world.mines.push(Mine::new(spot, 1, 1));
        world.spawn_enemy(EnemyKind::Tank, spot + Vec2::new(30.0, 0.0));
        let full = world.enemies[0].hp;

        for _ in 1..MINE_ARM_TICKS {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.mines.len(), 1);
        assert_eq!(world.enemies[0].hp, full);

        tick(&mut world, &TickInput::default());
        assert!(world.mines.is_empty());
        // 30 + 15 per skill level + 2 per player level
        assert!((full - world.enemies[0].hp - 47.0).abs() < 1e-3);
    }

    #[test]
    fn test_ricochet_bounces_off_wall() {
        let mut world = arena(15);
        world.player.fire_timer = 1000;
        let start = world.player.pos + Vec2::new(0.0, 300.0);
        world
            .obstacles
            .push(Obstacle::wall(start.x + 10.0, start.y - 100.0, 40.0, 200.0));
        let shot = |pos: Vec2| Projectile::new(pos, 0.0, 10.0, 40.0, Owner::Player, 60);
        world.bullets.push(shot(start).with_charges(0, 1));
        world.bullets.push(shot(start + Vec2::new(0.0, 50.0)));

        tick(&mut world, &TickInput::default());
        assert_eq!(world.bullets.len(), 1);
        let bullet = &world.bullets[0];
        assert_eq!(bullet.ricochet, 0);
        assert!((bullet.vel.x + 10.0).abs() < 1e-4);
        assert_eq!(bullet.pos, start);

        tick(&mut world, &TickInput::default());
        assert!(world.bullets[0].pos.x < start.x);
    }

    #[test]
    fn test_pierce_hits_each_enemy_once() {
        let mut world = arena(16);
        world.player.fire_timer = 1000;
        let start = world.player.pos + Vec2::new(0.0, 300.0);
        for dy in [0.0, 10.0, -10.0] {
            world.spawn_enemy(EnemyKind::Tank, start + Vec2::new(14.0, dy));
        }
        world
            .bullets
            .push(Projectile::new(start, 0.0, 14.0, 40.0, Owner::Player, 60).with_charges(2, 0));

        tick(&mut world, &TickInput::default());
        for enemy in &world.enemies {
            assert!((enemy.max_hp() - enemy.hp - 40.0).abs() < 1e-3);
        }
        assert!(world.bullets.is_empty());
    }

    #[test]
    fn test_titan_roots_player_and_buffs_allies() {
        let mut world = arena(17);
        world.player.fire_timer = 1000;
        let origin = world.player.pos;
        // Allies update before the titan so the fresh buff is not decayed
        world.spawn_enemy(EnemyKind::Basic, origin + Vec2::new(300.0, 100.0));
        world.spawn_enemy(EnemyKind::Basic, origin + Vec2::new(-700.0, 0.0));
        world.spawn_enemy(EnemyKind::Titan, origin + Vec2::new(200.0, 0.0));
        world.enemies[2].root_cd = 1;
        world.enemies[2].warcry_windup = 1;

        tick(&mut world, &TickInput::default());

        assert!(world.player.is_rooted());
        assert_eq!(world.player.root, crate::sim::enemy::TITAN_ROOT_TICKS);
        assert_eq!(world.enemies[0].buff_ticks, crate::sim::enemy::TITAN_WARCRY_TICKS);
        assert_eq!(world.enemies[1].buff_ticks, 0);

        // Rooted players only jitter and cannot dash
        let pos = world.player.pos;
        let input = TickInput {
            move_dir: Vec2::X,
            dash: true,
            ..Default::default()
        };
        tick(&mut world, &input);
        assert!(world.player.pos.distance(pos) < 1.5);
        assert!(!world.player.is_dashing());
    }
}

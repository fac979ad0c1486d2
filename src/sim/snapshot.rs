//! Read-only render view of a world
//!
//! The renderer and HUD only ever see a `Snapshot`. Entities outside the
//! camera (plus a margin) are culled so the JSON stays small.

use glam::Vec2;
use serde::Serialize;

use super::collision::Rect;
use super::enemy::EnemyKind;
use super::entities::{Color, FloatText, Obstacle, Particle, PickupKind, Projectile, Zone};
use super::objective::ObjectiveTask;
use super::player::aura_radius;
use super::skills::SkillId;
use super::state::{GamePhase, SkillChoice, World};
use crate::consts::{DASH_COOLDOWN, EMP_COOLDOWN};

/// Extra space around the viewport that still gets drawn
pub const CULL_MARGIN: f32 = 100.0;
/// Invulnerability blink period in ticks
pub const BLINK_PERIOD: u64 = 8;

#[derive(Debug, Clone, Serialize)]
pub struct Hud {
    pub hp: f32,
    pub max_hp: f32,
    pub level: u32,
    pub xp: f32,
    pub xp_next: f32,
    pub score: u64,
    pub game_time: u32,
    pub kills: u32,
    pub chips: u32,
    /// 0 when ready, 1 right after use
    pub dash_cooldown: f32,
    pub emp_cooldown: f32,
    pub wave: &'static str,
    pub enemy_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub radius: f32,
    /// False on the off-beat of the invulnerability blink
    pub visible: bool,
    pub dashing: bool,
    pub rooted: bool,
    pub shield_ready: bool,
    /// Aura radius when the skill is learned
    pub aura: Option<f32>,
    pub orbit: Vec<Vec2>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: f32,
    pub color: Color,
    pub health: f32,
    pub buffed: bool,
    /// Titan is winding up a war cry
    pub charging: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShotView {
    pub pos: Vec2,
    pub radius: f32,
    pub crit: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MineView {
    pub pos: Vec2,
    pub armed: bool,
    pub age: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BarrelView {
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PickupView {
    pub kind: PickupKind,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LaserView {
    pub from: Vec2,
    pub to: Vec2,
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AirdropView {
    pub pos: Vec2,
    pub radius: f32,
    pub task: ObjectiveTask,
    pub progress: f32,
    pub activated: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ObstacleView {
    pub rect: Rect,
    pub zone: Zone,
}

impl From<&Obstacle> for ObstacleView {
    fn from(o: &Obstacle) -> Self {
        Self {
            rect: o.rect,
            zone: o.zone,
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub camera: Vec2,
    pub view: Vec2,
    pub hud: Hud,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<ShotView>,
    pub enemy_bullets: Vec<ShotView>,
    pub mines: Vec<MineView>,
    pub barrels: Vec<BarrelView>,
    pub slow_zones: Vec<Rect>,
    pub obstacles: Vec<ObstacleView>,
    pub pickups: Vec<PickupView>,
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatText>,
    pub lasers: Vec<LaserView>,
    /// Airdrop zones are shown even off screen (HUD arrow)
    pub airdrop: Option<AirdropView>,
    pub choice: Option<SkillChoice>,
}

fn cooldown_ratio(remaining: u32, total: u32) -> f32 {
    remaining as f32 / total.max(1) as f32
}

impl Snapshot {
    pub fn capture(world: &World) -> Self {
        let camera = world.camera;
        let view = Vec2::new(world.settings.viewport_w, world.settings.viewport_h);
        let screen = Rect::new(camera.x, camera.y, view.x, view.y).inflate(CULL_MARGIN);
        let seen = |p: Vec2| screen.contains(p);
        let player = &world.player;

        let hud = Hud {
            hp: player.hp,
            max_hp: player.max_hp,
            level: player.level,
            xp: player.xp,
            xp_next: player.xp_next,
            score: world.score,
            game_time: world.game_time,
            kills: world.kills,
            chips: world.chips,
            dash_cooldown: cooldown_ratio(player.dash_cd, DASH_COOLDOWN),
            emp_cooldown: cooldown_ratio(player.emp_cd, EMP_COOLDOWN),
            wave: world.director.phase.as_str(),
            enemy_count: world.live_enemies(),
        };

        let aura_level = player.skill(SkillId::Aura);
        let player_view = PlayerView {
            pos: player.pos,
            radius: player.radius,
            visible: !player.is_invulnerable() || (world.tick / (BLINK_PERIOD / 2)) % 2 == 0,
            dashing: player.is_dashing(),
            rooted: player.is_rooted(),
            shield_ready: player.shield_ready,
            aura: (aura_level > 0).then(|| aura_radius(aura_level)),
            orbit: player.orbit_positions(),
        };

        let shot = |p: &Projectile| ShotView {
            pos: p.pos,
            radius: p.radius,
            crit: p.is_crit,
        };

        Self {
            tick: world.tick,
            phase: world.phase,
            camera,
            view,
            hud,
            player: player_view,
            enemies: world
                .enemies
                .iter()
                .filter(|e| e.is_alive() && seen(e.pos))
                .map(|e| EnemyView {
                    id: e.id,
                    kind: e.kind,
                    pos: e.pos,
                    size: e.size,
                    color: e.color,
                    health: e.health_ratio(),
                    buffed: e.buff_ticks > 0,
                    charging: e.warcry_windup > 0,
                })
                .collect(),
            bullets: world.bullets.iter().filter(|b| seen(b.pos)).map(shot).collect(),
            enemy_bullets: world
                .enemy_bullets
                .iter()
                .filter(|b| seen(b.pos))
                .map(shot)
                .collect(),
            mines: world
                .mines
                .iter()
                .filter(|m| seen(m.pos))
                .map(|m| MineView {
                    pos: m.pos,
                    armed: m.is_armed(),
                    age: m.age,
                })
                .collect(),
            barrels: world
                .barrels
                .iter()
                .filter(|b| seen(b.pos))
                .map(|b| BarrelView {
                    pos: b.pos,
                    radius: b.radius,
                })
                .collect(),
            slow_zones: world
                .slow_zones
                .iter()
                .map(|z| z.rect)
                .filter(|r| overlaps(r, &screen))
                .collect(),
            obstacles: world
                .obstacles
                .iter()
                .filter(|o| overlaps(&o.rect, &screen))
                .map(ObstacleView::from)
                .collect(),
            pickups: world
                .pickups
                .iter()
                .filter(|p| seen(p.pos))
                .map(|p| PickupView {
                    kind: p.kind,
                    pos: p.pos,
                })
                .collect(),
            particles: world
                .particles
                .iter()
                .filter(|p| seen(p.pos))
                .cloned()
                .collect(),
            texts: world.texts.iter().filter(|t| seen(t.pos)).cloned().collect(),
            lasers: world
                .lasers
                .iter()
                .map(|l| LaserView {
                    from: player.pos,
                    to: l.target,
                    alpha: l.alpha,
                })
                .collect(),
            airdrop: world.airdrop.as_ref().map(|z| AirdropView {
                pos: z.pos,
                radius: z.radius,
                task: z.task,
                progress: z.progress_ratio(),
                activated: z.activated,
                completed: z.completed,
            }),
            choice: world.pending.clone(),
        }
    }
}

fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MetaBonuses;
    use crate::settings::Settings;

    fn world() -> World {
        World::new(4, Settings::default(), MetaBonuses::default())
    }

    #[test]
    fn test_capture_player_and_hud() {
        let world = world();
        let snap = Snapshot::capture(&world);
        assert_eq!(snap.player.pos, world.player.pos);
        assert!(snap.player.visible);
        assert_eq!(snap.hud.level, 1);
        assert_eq!(snap.hud.hp, snap.hud.max_hp);
        assert_eq!(snap.hud.dash_cooldown, 0.0);
        assert_eq!(snap.phase, GamePhase::Playing);
    }

    #[test]
    fn test_offscreen_enemies_culled() {
        let mut world = world();
        let near = world.player.pos + Vec2::new(50.0, 0.0);
        let far = world.player.pos + Vec2::new(1500.0, 0.0);
        let near_id = world.spawn_enemy(EnemyKind::Basic, near);
        world.spawn_enemy(EnemyKind::Basic, far);

        let snap = Snapshot::capture(&world);
        assert_eq!(snap.enemies.len(), 1);
        assert_eq!(snap.enemies[0].id, near_id);
        assert_eq!(snap.enemies[0].health, 1.0);
        assert_eq!(snap.hud.enemy_count, 2);
    }

    #[test]
    fn test_invulnerable_player_blinks() {
        let mut world = world();
        world.player.invuln = 30;
        let mut shown = 0;
        for t in 0..BLINK_PERIOD {
            world.tick = t;
            if Snapshot::capture(&world).player.visible {
                shown += 1;
            }
        }
        assert_eq!(shown, BLINK_PERIOD / 2);
    }

    #[test]
    fn test_snapshot_serializes() {
        let world = world();
        let json = serde_json::to_string(&Snapshot::capture(&world)).unwrap();
        assert!(json.contains("\"hud\""));
        assert!(json.contains("\"Playing\""));
    }
}

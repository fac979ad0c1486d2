//! Procedural map generation
//!
//! The square world is split into four quadrants, each with its own
//! obstacle style. A clearing around the centre keeps the spawn point open.

use glam::Vec2;
use rand::Rng;

use super::collision::{Rect, circle_intersects_rect, hits_any};
use super::entities::{Barrel, Obstacle, SlowZone, Zone};
use crate::consts::{SPAWN_CLEARING, WORLD_SIZE};

pub const BORDER_THICKNESS: f32 = 100.0;
pub const CITY_STREET: f32 = 300.0;
pub const CITY_GAP: f32 = 80.0;
pub const CITY_FILL: f64 = 0.8;
pub const INDUSTRIAL_COUNT: usize = 60;
pub const RUINS_COUNT: usize = 200;
pub const WASTELAND_COUNT: usize = 20;
pub const BARREL_COUNT: usize = 12;
pub const SLOW_ZONE_COUNT: usize = 6;

/// Everything static on the map
#[derive(Debug, Clone, Default)]
pub struct MapLayout {
    pub obstacles: Vec<Obstacle>,
    pub barrels: Vec<Barrel>,
    pub slow_zones: Vec<SlowZone>,
}

/// World centre (player spawn)
pub fn world_center() -> Vec2 {
    Vec2::splat(WORLD_SIZE / 2.0)
}

fn in_clearing(rect: &Rect) -> bool {
    circle_intersects_rect(world_center(), SPAWN_CLEARING, rect)
}

fn push(obs: &mut Vec<Obstacle>, rect: Rect, zone: Zone) {
    if !in_clearing(&rect) {
        obs.push(Obstacle::new(rect, zone));
    }
}

fn city<R: Rng + ?Sized>(obs: &mut Vec<Obstacle>, origin: Vec2, size: f32, rng: &mut R) {
    let block = CITY_STREET - CITY_GAP;
    let mut x = origin.x + 100.0;
    while x < origin.x + size - 100.0 {
        let mut y = origin.y + 100.0;
        while y < origin.y + size - 100.0 {
            if rng.random_bool(CITY_FILL) {
                push(obs, Rect::new(x, y, block, block), Zone::City);
            }
            y += CITY_STREET;
        }
        x += CITY_STREET;
    }
}

/// Random rectangles of size `w`x`h` ranges, kept inside the quadrant
fn scatter<R: Rng + ?Sized>(
    obs: &mut Vec<Obstacle>,
    origin: Vec2,
    size: f32,
    count: usize,
    w: (f32, f32),
    h: Option<(f32, f32)>,
    zone: Zone,
    rng: &mut R,
) {
    for _ in 0..count {
        let bw = rng.random_range(w.0..w.1);
        // Square when no separate height range is given
        let bh = match h {
            Some((lo, hi)) => rng.random_range(lo..hi),
            None => bw,
        };
        let bx = origin.x + rng.random::<f32>() * (size - bw);
        let by = origin.y + rng.random::<f32>() * (size - bh);
        push(obs, Rect::new(bx, by, bw, bh), zone);
    }
}

fn borders(obs: &mut Vec<Obstacle>) {
    let t = BORDER_THICKNESS;
    let s = WORLD_SIZE;
    obs.push(Obstacle::wall(-t, -t, s + 2.0 * t, t));
    obs.push(Obstacle::wall(-t, s, s + 2.0 * t, t));
    obs.push(Obstacle::wall(-t, 0.0, t, s));
    obs.push(Obstacle::wall(s, 0.0, t, s));
}

/// Uniform point inside `[margin, WORLD - margin]` that clears obstacles
pub fn random_clear_point<R: Rng + ?Sized>(
    margin: f32,
    clearance: f32,
    tries: u32,
    obstacles: &[Obstacle],
    rng: &mut R,
) -> Option<Vec2> {
    (0..tries)
        .map(|_| {
            Vec2::new(
                rng.random_range(margin..WORLD_SIZE - margin),
                rng.random_range(margin..WORLD_SIZE - margin),
            )
        })
        .find(|p| !hits_any(*p, clearance, obstacles))
}

/// Build the full map for a match
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> MapLayout {
    let half = WORLD_SIZE / 2.0;
    let mut obstacles = Vec::new();

    city(&mut obstacles, Vec2::ZERO, half, rng);
    scatter(
        &mut obstacles,
        Vec2::new(half, 0.0),
        half,
        INDUSTRIAL_COUNT,
        (200.0, 600.0),
        Some((100.0, 300.0)),
        Zone::Industrial,
        rng,
    );
    scatter(
        &mut obstacles,
        Vec2::new(0.0, half),
        half,
        RUINS_COUNT,
        (40.0, 100.0),
        None,
        Zone::Ruins,
        rng,
    );
    scatter(
        &mut obstacles,
        Vec2::new(half, half),
        half,
        WASTELAND_COUNT,
        (100.0, 400.0),
        Some((100.0, 400.0)),
        Zone::Wasteland,
        rng,
    );
    borders(&mut obstacles);

    let barrels: Vec<Barrel> = (0..BARREL_COUNT)
        .filter_map(|_| random_clear_point(100.0, 30.0, 10, &obstacles, rng))
        .map(Barrel::new)
        .collect();

    let slow_zones: Vec<SlowZone> = (0..SLOW_ZONE_COUNT)
        .filter_map(|_| {
            let w: f32 = rng.random_range(200.0..400.0);
            let h: f32 = rng.random_range(200.0..400.0);
            random_clear_point(100.0 + w.max(h), 20.0, 10, &obstacles, rng).map(|c| SlowZone {
                rect: Rect::new(c.x - w / 2.0, c.y - h / 2.0, w, h),
            })
        })
        .collect();

    log::info!(
        "Generated map: {} obstacles, {} barrels, {} slow zones",
        obstacles.len(),
        barrels.len(),
        slow_zones.len()
    );

    MapLayout {
        obstacles,
        barrels,
        slow_zones,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_clearing_is_open() {
        for seed in 0..5 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let map = generate(&mut rng);
            assert!(!hits_any(world_center(), SPAWN_CLEARING, &map.obstacles));
        }
    }

    #[test]
    fn test_zone_counts() {
        let mut rng = Pcg32::seed_from_u64(9);
        let map = generate(&mut rng);
        let count = |z: Zone| map.obstacles.iter().filter(|o| o.zone == z).count();
        assert_eq!(count(Zone::Border), 4);
        assert!(count(Zone::Ruins) <= RUINS_COUNT);
        assert!(count(Zone::Industrial) <= INDUSTRIAL_COUNT);
        assert!(count(Zone::City) > 0);
        assert!(map.barrels.len() <= BARREL_COUNT);
        for barrel in &map.barrels {
            assert!(!hits_any(barrel.pos, 30.0, &map.obstacles));
        }
    }

    #[test]
    fn test_obstacles_stay_in_quadrants() {
        let mut rng = Pcg32::seed_from_u64(3);
        let map = generate(&mut rng);
        let half = WORLD_SIZE / 2.0;
        for o in map.obstacles.iter().filter(|o| o.zone == Zone::Ruins) {
            assert!(o.rect.x >= 0.0 && o.rect.x + o.rect.w <= half + 1e-3);
            assert!(o.rect.y >= half && o.rect.y + o.rect.h <= WORLD_SIZE + 1e-3);
        }
    }

    #[test]
    fn test_same_seed_same_map() {
        let a = generate(&mut Pcg32::seed_from_u64(77));
        let b = generate(&mut Pcg32::seed_from_u64(77));
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (x, y) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(x.rect, y.rect);
        }
    }
}

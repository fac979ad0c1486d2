//! Neon Survivor - native headless runner
//!
//! Plays one autopilot match and prints the run summary. The browser build
//! is driven through `web::GameHandle` instead.
//!
//! Usage: `neon-survivor [seed] [max_seconds] [easy|normal|hard]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_survivor::consts::TICK_RATE;
    use neon_survivor::highscores::{HighScores, format_survival};
    use neon_survivor::persistence::{MemoryStore, MetaProgress, MetaProgression};
    use neon_survivor::settings::{DifficultyPreset, Settings};
    use neon_survivor::sim::{GameEvent, TickInput, World, tick};

    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args.first().and_then(|s| s.parse().ok()).unwrap_or(42u64);
    let max_secs = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(600u32);
    let preset = args
        .get(2)
        .and_then(|s| DifficultyPreset::from_str(s))
        .unwrap_or_default();

    log::info!(
        "Neon Survivor (native) starting: seed {}, up to {}s, {}",
        seed,
        max_secs,
        preset.as_str()
    );

    let mut meta = MetaProgress::load(MemoryStore::new());
    let mut highscores = HighScores::new();
    let mut world = World::new(seed, Settings::from_preset(preset), meta.bonuses());
    let input = TickInput {
        autopilot: true,
        ..TickInput::default()
    };

    let max_ticks = max_secs as u64 * TICK_RATE as u64;
    let mut summary = None;
    while world.tick < max_ticks && summary.is_none() {
        tick(&mut world, &input);
        for event in world.drain_events() {
            match event {
                GameEvent::LevelUp { level, choices } => {
                    log::info!("Level {} (choices: {:?})", level, choices)
                }
                GameEvent::ObjectiveCompleted { pos } => {
                    log::info!("Airdrop objective done at ({:.0}, {:.0})", pos.x, pos.y)
                }
                GameEvent::ChipCollected { value } => meta.add_currency(value as u64),
                GameEvent::GameOver { summary: s } => summary = Some(s),
                GameEvent::Sound(_) | GameEvent::Explosion { .. } => {}
                other => log::debug!("{:?}", other),
            }
        }
    }

    let summary = summary.unwrap_or_else(|| world.summary());
    let outcome = if world.is_over() { "died" } else { "survived" };

    println!("\nRun {} after {}", outcome, format_survival(summary.survived_secs));
    println!("  score:  {}", summary.score);
    println!("  level:  {}", summary.level);
    println!("  kills:  {}", summary.kills);
    println!("  chips:  {} (bank {})", summary.chips, meta.currency());
    println!("  skills: {}", world.player.skills.total());
    if let Some(rank) = highscores.add_run(&summary, 0.0) {
        println!("  rank:   #{}", rank);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}

//! Browser bindings
//!
//! JS owns the render loop and input events. Each frame it calls `update`
//! with the elapsed time, then reads `snapshot_json` and `drain_events_json`.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScores;
use crate::persistence::{LocalStore, MetaProgress, MetaProgression, UpgradeId};
use crate::settings::{DifficultyPreset, Settings};
use crate::sim::{GameEvent, GamePhase, SkillId, Snapshot, TickInput, World, tick};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Neon Survivor core loaded");
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("Serialization failed: {}", e);
        String::from("null")
    })
}

/// One match plus the persistent state around it
#[wasm_bindgen]
pub struct GameHandle {
    world: World,
    input: TickInput,
    accumulator: f32,
    meta: MetaProgress<LocalStore>,
    highscores: HighScores,
    settings: Settings,
}

#[wasm_bindgen]
impl GameHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> GameHandle {
        let settings = Settings::load();
        let meta = MetaProgress::load(LocalStore);
        let world = World::new(seed as u64, settings.clone(), meta.bonuses());
        GameHandle {
            world,
            input: TickInput::default(),
            accumulator: 0.0,
            meta,
            highscores: HighScores::load(),
            settings,
        }
    }

    /// Start a fresh match with the current settings and upgrades
    pub fn restart(&mut self, seed: u32) {
        self.world = World::new(seed as u64, self.settings.clone(), self.meta.bonuses());
        self.input = TickInput {
            autopilot: self.input.autopilot,
            ..TickInput::default()
        };
        self.accumulator = 0.0;
    }

    /// Run as many fixed steps as `dt` seconds cover. Returns the count.
    pub fn update(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.world, &self.input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shot inputs
            self.input.dash = false;
            self.input.emp = false;
            self.input.pause = false;
        }
        // Drop the backlog instead of spiralling
        if substeps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
        substeps
    }

    pub fn set_move(&mut self, x: f32, y: f32) {
        self.input.move_dir = Vec2::new(x, y);
    }

    /// Pointer in canvas pixels; converted to world space through the camera
    pub fn set_aim(&mut self, x: f32, y: f32) {
        self.input.aim = Some(self.world.camera + Vec2::new(x, y));
    }

    pub fn clear_aim(&mut self) {
        self.input.aim = None;
    }

    pub fn dash(&mut self) {
        self.input.dash = true;
    }

    pub fn emp(&mut self) {
        self.input.emp = true;
    }

    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.world.phase)
    }

    pub fn snapshot_json(&self) -> String {
        to_json(&Snapshot::capture(&self.world))
    }

    /// Signals since the last call. Chips and finished runs are persisted here.
    pub fn drain_events_json(&mut self) -> String {
        let events = self.world.drain_events();
        for event in &events {
            match event {
                GameEvent::ChipCollected { value } => self.meta.add_currency(*value as u64),
                GameEvent::GameOver { summary } => {
                    if let Some(rank) = self.highscores.add_run(summary, js_sys::Date::now()) {
                        log::info!("New high score, rank {}", rank);
                        self.highscores.save();
                    }
                }
                _ => {}
            }
        }
        to_json(&events)
    }

    /// Take a skill by name from the pending choice
    pub fn choose_skill(&mut self, name: &str) -> bool {
        match SkillId::from_str(name) {
            Some(id) => self.world.choose_skill(id),
            None => {
                log::warn!("Unknown skill {}", name);
                false
            }
        }
    }

    pub fn decline_skill(&mut self) {
        if self.world.phase == GamePhase::ChoosingSkill {
            self.world.decline_choice();
        }
    }

    pub fn chips(&self) -> f64 {
        self.meta.currency() as f64
    }

    pub fn buy_upgrade(&mut self, name: &str) -> bool {
        UpgradeId::from_str(name).is_some_and(|id| self.meta.try_purchase(id))
    }

    pub fn meta_json(&self) -> String {
        to_json(self.meta.data())
    }

    pub fn highscores_json(&self) -> String {
        to_json(&self.highscores)
    }

    /// Applies to the next match
    pub fn set_difficulty(&mut self, name: &str) -> bool {
        let Some(preset) = DifficultyPreset::from_str(name) else {
            return false;
        };
        self.settings.difficulty = preset;
        self.settings.save();
        true
    }

    pub fn set_viewport(&mut self, w: f32, h: f32) {
        self.settings.viewport_w = w;
        self.settings.viewport_h = h;
        self.world.settings.viewport_w = w;
        self.world.settings.viewport_h = h;
        self.world.update_camera();
    }
}

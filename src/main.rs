//! Astro Run entry point
//!
//! Headless host: runs one level at a simulated 60 fps with a simple
//! autopilot, logs what happens, and records progress when the level ends.
//!
//! Usage: `astro-run [level] [seed] [seconds]`. Set `ASTRO_RUN_TUNING` to a
//! JSON file to replace the level's built-in balance.

use std::path::Path;
use std::process::ExitCode;

use astro_run::consts::*;
use astro_run::draw::{DrawCall, draw};
use astro_run::sim::{GameEvent, LevelState, Obstacle, TickInput, tick};
use astro_run::{LevelId, LevelTuning, Progress};

const PROGRESS_FILE: &str = "progress.json";
const TUNING_ENV: &str = "ASTRO_RUN_TUNING";
/// Simulated display refresh
const FRAME_DT: f32 = 1.0 / 60.0;

/// Host instance holding all state
struct Host {
    state: LevelState,
    progress: Progress,
    accumulator: f32,
    input: TickInput,
    /// Reused every frame
    draw_calls: Vec<DrawCall>,
    finished: bool,
}

impl Host {
    fn new(state: LevelState, progress: Progress) -> Self {
        Self {
            state,
            progress,
            accumulator: 0.0,
            input: TickInput::default(),
            draw_calls: Vec::new(),
            finished: false,
        }
    }

    /// Run simulation ticks for one displayed frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.input = autopilot(&self.state);
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        self.handle_events();
    }

    fn render(&mut self) {
        self.draw_calls.clear();
        draw(&self.state, &mut self.draw_calls);
    }

    fn handle_events(&mut self) {
        let level = self.state.tuning.level;
        for event in self.state.drain_events() {
            match event {
                GameEvent::Restarted {
                    cause,
                    score,
                    attempt,
                } => {
                    log::info!("Attempt {} ended by {:?} at score {}", attempt, cause, score);
                    self.progress.record_attempt(level, score, attempt);
                }
                GameEvent::DialogShown(dialog) => log::info!("Dialog {} shown", dialog),
                GameEvent::LevelComplete { score } => {
                    log::info!("Level complete with score {}", score);
                    self.progress.record_level_end(&self.state);
                    self.finished = true;
                }
                other => log::debug!("{:?}", other),
            }
        }
    }
}

/// Aim for the next passage (or mid-screen) and thrust when below it
fn autopilot(state: &LevelState) -> TickInput {
    let craft = &state.craft;
    let behind = craft.pos.x - craft.radius;
    let target = state
        .asteroids
        .iter()
        .find_map(|o| match o {
            Obstacle::Asteroids(a) if a.x + a.width * 0.5 >= behind => Some(a.passage_center()),
            _ => None,
        })
        .unwrap_or(state.tuning.world_height * 0.5);

    TickInput {
        jump: craft.pos.y < target - 10.0 && craft.velocity <= 0.0,
    }
}

fn load_tuning(level: LevelId) -> Result<LevelTuning, String> {
    let Ok(path) = std::env::var(TUNING_ENV) else {
        return Ok(LevelTuning::preset(level));
    };
    let json = std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path, e))?;
    let tuning = LevelTuning::from_json(&json).map_err(|e| format!("{}: {}", path, e))?;
    log::info!("Loaded tuning for {} from {}", tuning.level.as_str(), path);
    Ok(tuning)
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let level_arg = args.next().unwrap_or_else(|| "adventure-1".to_string());
    let Some(level) = LevelId::from_name(&level_arg) else {
        log::error!("Unknown level '{}'", level_arg);
        return ExitCode::from(2);
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42u64);
    let seconds = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0f32);

    let progress_path = Path::new(PROGRESS_FILE);
    let progress = Progress::load_or_default(progress_path);
    if !level.is_unlocked(&progress) {
        log::error!("Level {} is locked; finish the previous level first", level.as_str());
        return ExitCode::from(2);
    }

    let tuning = match load_tuning(level) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::error!("Bad tuning file {}", e);
            return ExitCode::FAILURE;
        }
    };
    let state = match LevelState::new(tuning, seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid level tuning: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!("Astro Run (headless) starting {} for {}s", level.as_str(), seconds);
    let mut host = Host::new(state, progress);
    let frames = (seconds / FRAME_DT).ceil() as u64;
    for _ in 0..frames {
        host.update(FRAME_DT);
        host.render();
        if host.finished {
            break;
        }
    }

    let state = &host.state;
    log::info!(
        "Stopped after {} ticks: {:?}, score {}, {} restarts, progress {:.0}%, {} draw calls",
        state.time_ticks,
        state.part(),
        state.score,
        state.attempt,
        state.progress() * 100.0,
        host.draw_calls.len()
    );
    if let Some(top) = host.progress.high_scores.top_score() {
        log::info!("Legacy high score: {}", top);
    }

    match host.progress.save_to(progress_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::warn!("Could not save progress: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autopilot_climbs_toward_mid_screen() {
        let mut state = LevelState::new(LevelTuning::preset(LevelId::AdventureTwo), 1).expect("valid");
        state.craft.pos.y = 100.0;
        assert!(autopilot(&state).jump);

        state.craft.pos.y = 300.0;
        assert!(!autopilot(&state).jump);
    }

    #[test]
    fn test_host_runs_frames_and_draws() {
        let state = LevelState::new(LevelTuning::preset(LevelId::AdventureOne), 1).expect("valid");
        let mut host = Host::new(state, Progress::default());
        for _ in 0..120 {
            host.update(FRAME_DT);
            host.render();
        }
        assert!(host.state.time_ticks > 0);
        assert!(!host.draw_calls.is_empty());
    }
}

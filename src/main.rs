//! Pursuit Sim headless runner
//!
//! Plays rounds on the configured board and logs how each one ends.
//! Usage: `pursuit-sim [settings.json]` (defaults when no file is given).

use std::process::ExitCode;

use pursuit_sim::Settings;
use pursuit_sim::sim::{Outcome, SimState, StrategyKind};

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Pursuit Sim (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("Could not load settings from {}: {}", path, err);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };

    for kind in settings.strategies() {
        match play_round(&settings, kind) {
            Ok((outcome, ticks)) => {
                println!("{:<14} {:?} after {} ticks", kind.name(), outcome, ticks);
            }
            Err(err) => {
                log::error!("{} round aborted: {}", kind.name(), err);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn play_round(settings: &Settings, kind: StrategyKind) -> Result<(Outcome, u64), pursuit_sim::sim::SimError> {
    let mut state = SimState::new(settings.scenario.clone(), settings.seed, kind);
    let dt = settings.sim_dt();

    while state.time_ticks < settings.max_ticks {
        let result = state.advance(dt)?;
        if result.outcome.is_decided() {
            return Ok((result.outcome, result.tick));
        }
    }

    log::info!("{}: no winner after {} ticks", kind.name(), settings.max_ticks);
    Ok((Outcome::Undecided, state.time_ticks))
}

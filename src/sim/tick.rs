//! Fixed timestep simulation tick
//!
//! One tick runs four phases over every agent:
//! 1. choose waypoints from a single pre-move snapshot
//! 2. move every agent toward its own waypoint
//! 3. separate overlapping teammates
//! 4. check for a winner on the post-move positions

use glam::Vec2;

use super::collision::{check_victory, resolve_overlaps};
use super::error::Result;
use super::motion::{intercept_point, move_to_waypoint};
use super::state::{Agent, Outcome, Role, SimState, Target};

/// Host commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pause toggle
    pub pause: bool,
}

/// State of the board after a tick
#[derive(Debug, Clone)]
pub struct TickResult {
    pub outcome: Outcome,
    /// Ticks simulated so far (paused and frozen ticks don't count)
    pub tick: u64,
    pub agents: Vec<Agent>,
}

impl TickResult {
    fn capture(state: &SimState) -> Self {
        Self {
            outcome: state.outcome,
            tick: state.time_ticks,
            agents: state.agents.clone(),
        }
    }
}

/// Advance the simulation by one fixed timestep
///
/// A decided outcome is frozen: the board is left untouched until the host
/// calls `SimState::reset`. Preconditions are checked before any mutation.
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32) -> Result<TickResult> {
    // A decided round ignores the toggle; `reset` resumes it
    if input.pause && !state.outcome.is_decided() {
        state.paused = !state.paused;
        log::info!("{}", if state.paused { "Paused" } else { "Resumed" });
    }

    if state.outcome.is_decided() || state.paused {
        return Ok(TickResult::capture(state));
    }

    if let Err(err) = state.validate(dt) {
        log::warn!("Tick rejected: {}", err);
        return Err(err);
    }

    state.time_ticks += 1;

    // Phase 1: every decision sees the same pre-move world
    let snapshot = state.snapshot();
    let mut waypoints: Vec<Vec2> = Vec::with_capacity(snapshot.len());
    for index in 0..snapshot.len() {
        let seeker = snapshot[index];
        let (id, role, holding) = {
            let agent = &state.agents[index];
            (agent.id, agent.role, agent.target == Target::Hold)
        };

        let waypoint = if holding {
            seeker.pos
        } else {
            let target = state.target_view(index, &snapshot);
            match role {
                Role::Hunter => {
                    let obstacles = state.obstacles_for(index, &snapshot);
                    let (strategy, noise) = state.strategy_and_noise(id);
                    strategy.choose_waypoint(&seeker, &target, &obstacles, noise)
                }
                Role::Guard => intercept_point(&target),
                Role::Quarry => target.pos,
            }
        };
        waypoints.push(waypoint);
    }

    // Phase 2: move
    for (agent, waypoint) in state.agents.iter_mut().zip(&waypoints) {
        move_to_waypoint(agent, *waypoint, dt);
    }

    // Phase 3: separate teammates
    let separated = resolve_overlaps(&mut state.agents);

    // Phase 4: victory
    let outcome = check_victory(&state.agents);
    if outcome.is_decided() {
        state.outcome = outcome;
        log::info!("Round decided at tick {}: {:?}", state.time_ticks, outcome);
    }

    log::debug!(
        "Tick {}: {} agents moved, {} overlaps separated",
        state.time_ticks,
        waypoints.len(),
        separated
    );

    Ok(TickResult::capture(state))
}

impl SimState {
    /// Advance one tick with no host input
    pub fn advance(&mut self, dt: f32) -> Result<TickResult> {
        tick(self, &TickInput::default(), dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::scenario::Scenario;
    use crate::sim::error::SimError;
    use crate::sim::state::{AgentId, Noise};
    use crate::sim::strategy::StrategyKind;

    /// Hunter, quarry and (optionally) guards placed by hand
    fn board(strategy: StrategyKind, hunter: Vec2, quarry: Vec2, guards: &[Vec2]) -> SimState {
        let mut state = SimState::empty(1, strategy);
        state.set_noise(Noise::silent());
        let id = state.next_agent_id().unwrap();
        state.agents.push(Agent::new(id, Role::Hunter, hunter));
        let id = state.next_agent_id().unwrap();
        state.agents.push(Agent::new(id, Role::Quarry, quarry));
        for &pos in guards {
            let id = state.next_agent_id().unwrap();
            state.agents.push(Agent::new(id, Role::Guard, pos));
        }
        state.resolve_default_relations();
        state
    }

    #[test]
    fn test_direct_single_step() {
        let mut state = board(StrategyKind::Direct, Vec2::ZERO, Vec2::new(10.0, 0.0), &[]);
        let result = state.advance(1.0).unwrap();

        let hunter = &result.agents[0];
        assert!((hunter.pos - Vec2::new(1.0, 0.0)).length() < 1e-5);
        assert!((hunter.vel - Vec2::new(1.0, 0.0)).length() < 1e-5);
        assert!(hunter.facing.abs() < 1e-4);
        assert_eq!(result.outcome, Outcome::Undecided);
        assert_eq!(result.tick, 1);
    }

    #[test]
    fn test_quarry_holds_by_default_and_seeks_point() {
        let mut state = board(StrategyKind::Direct, Vec2::ZERO, Vec2::new(10.0, 0.0), &[]);
        state.advance(1.0).unwrap();
        assert_eq!(state.agents[1].pos, Vec2::new(10.0, 0.0));

        state
            .set_target(AgentId(2), Target::Point(Vec2::new(10.0, 5.0)))
            .unwrap();
        state.advance(1.0).unwrap();
        assert!((state.agents[1].pos - Vec2::new(10.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_waypoints_use_pre_move_snapshot() {
        // Guard chases the hunter; it must aim at where the hunter was
        let mut state = board(
            StrategyKind::Direct,
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            &[Vec2::new(0.0, -5.0)],
        );
        state.advance(1.0).unwrap();
        let guard = &state.agents[2];
        // Hunter was at the origin with zero velocity: straight up
        assert!((guard.pos - Vec2::new(0.0, -4.0)).length() < 1e-5);
    }

    #[test]
    fn test_capture_ends_round() {
        let mut state = board(StrategyKind::Direct, Vec2::ZERO, Vec2::new(1.5, 0.0), &[]);
        let result = state.advance(1.0).unwrap();
        assert_eq!(result.outcome, Outcome::HunterWins);
    }

    #[test]
    fn test_rescue_beats_capture_in_same_tick() {
        // After the hunter's step it touches both the quarry and a guard
        let mut state = board(
            StrategyKind::Direct,
            Vec2::ZERO,
            Vec2::new(1.5, 0.0),
            &[Vec2::new(1.0, 0.9)],
        );
        state.agents[2].max_speed = 0.0001;
        let result = state.advance(1.0).unwrap();
        assert_eq!(result.outcome, Outcome::QuarryWins);
    }

    #[test]
    fn test_decided_outcome_is_frozen() {
        let mut state = board(StrategyKind::Direct, Vec2::ZERO, Vec2::new(1.5, 0.0), &[]);
        state.advance(1.0).unwrap();
        let frozen: Vec<Vec2> = state.agents.iter().map(|a| a.pos).collect();

        // Even an invalid dt is ignored once the round is over
        let result = state.advance(-1.0).unwrap();
        assert_eq!(result.outcome, Outcome::HunterWins);
        assert_eq!(result.tick, 1);
        let after: Vec<Vec2> = state.agents.iter().map(|a| a.pos).collect();
        assert_eq!(frozen, after);
    }

    #[test]
    fn test_invalid_input_rejected_without_mutation() {
        let mut state = board(StrategyKind::Direct, Vec2::ZERO, Vec2::new(10.0, 0.0), &[]);
        assert_eq!(state.advance(0.0).unwrap_err(), SimError::InvalidDeltaTime { dt: 0.0 });

        state.agents[1].radius = -1.0;
        assert!(matches!(
            state.advance(SIM_DT),
            Err(SimError::InvalidAgent { field: "radius", .. })
        ));
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.agents[0].pos, Vec2::ZERO);
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = board(StrategyKind::Direct, Vec2::ZERO, Vec2::new(10.0, 0.0), &[]);
        let pause = TickInput { pause: true };

        tick(&mut state, &pause, 1.0).unwrap();
        assert!(state.paused);
        assert_eq!(state.agents[0].pos, Vec2::ZERO);
        state.advance(1.0).unwrap();
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &pause, 1.0).unwrap();
        assert!(!state.paused);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_pause_ignored_once_decided() {
        let mut state = board(StrategyKind::Direct, Vec2::ZERO, Vec2::new(1.5, 0.0), &[]);
        state.advance(1.0).unwrap();
        assert!(state.outcome.is_decided());

        let result = tick(&mut state, &TickInput { pause: true }, 1.0).unwrap();
        assert!(!state.paused);
        assert_eq!(result.outcome, Outcome::HunterWins);
    }

    #[test]
    fn test_reset_resumes_paused_round() {
        let mut state = SimState::new(Scenario::default(), 2, StrategyKind::Direct);
        tick(&mut state, &TickInput { pause: true }, SIM_DT).unwrap();
        assert!(state.paused);

        state.reset();
        assert!(!state.paused);
        state.advance(SIM_DT).unwrap();
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_teammates_separated_after_motion() {
        let mut state = board(
            StrategyKind::Direct,
            Vec2::new(-20.0, 0.0),
            Vec2::new(20.0, 0.0),
            &[Vec2::new(20.4, 0.0)],
        );
        // Guard with no target stays put; the quarry overlaps it
        state.agents[2].target = Target::Hold;
        state.advance(SIM_DT).unwrap();
        let gap = (state.agents[1].pos - state.agents[2].pos).length();
        assert!(gap >= 1.0 - 1e-4);
    }

    #[test]
    fn test_zigzag_counter_restarts_on_reset() {
        let mut state = SimState::new(Scenario::default(), 3, StrategyKind::ZigZag);
        state.set_noise(Noise::silent());
        for _ in 0..200 {
            state.advance(SIM_DT).unwrap();
        }

        state.reset();
        let start = state.agents[0].pos;
        state.advance(SIM_DT).unwrap();
        // Back in the first (eastward) leg
        let step = state.agents[0].pos - start;
        assert!(step.x > 0.0 && step.y.abs() < 1e-5);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut state = SimState::new(Scenario::default(), 99, StrategyKind::MultiBlob);
            for _ in 0..300 {
                state.advance(SIM_DT).unwrap();
            }
            state
        };
        let a = run();
        let b = run();
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.outcome, b.outcome);
        for (x, y) in a.agents.iter().zip(&b.agents) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.facing, y.facing);
        }
    }

    #[test]
    fn test_every_strategy_runs_default_board() {
        for kind in StrategyKind::ALL {
            let mut state = SimState::new(Scenario::default(), 11, kind);
            for _ in 0..500 {
                let result = state.advance(SIM_DT).unwrap();
                for agent in &result.agents {
                    assert!(agent.pos.is_finite(), "{} produced {:?}", kind.name(), agent.pos);
                }
            }
        }
    }
}

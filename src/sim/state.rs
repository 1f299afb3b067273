//! Simulation state and core agent types
//!
//! `SimState` is the single context object the host owns: agents, strategy
//! instances, the tie-break noise source and the decided outcome all live
//! here so a reset can rebuild every piece of cross-tick state at once.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::error::{Result, SimError};
use super::strategy::{Strategy, StrategyKind};
use crate::scenario::Scenario;

/// Stable agent identifier assigned by `SimState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side an agent plays for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Team {
    Hunter,
    Quarry,
}

/// What an agent does on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Chases its quarry using the selected steering strategy
    Hunter,
    /// The agent hunters try to catch
    Quarry,
    /// Protects the quarry; touching a hunter ends the round
    Guard,
}

impl Role {
    pub fn team(self) -> Team {
        match self {
            Role::Hunter => Team::Hunter,
            Role::Quarry | Role::Guard => Team::Quarry,
        }
    }
}

/// What an agent is heading for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Target {
    /// Stay in place
    #[default]
    Hold,
    /// Follow another agent
    Agent(AgentId),
    /// Head for a fixed point (e.g. the host's pointer)
    Point(Vec2),
}

/// Result of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Outcome {
    #[default]
    Undecided,
    HunterWins,
    QuarryWins,
}

impl Outcome {
    pub fn is_decided(self) -> bool {
        self != Outcome::Undecided
    }
}

/// A simulated character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub role: Role,
    pub pos: Vec2,
    /// Derived each tick from the displacement; never integrated
    pub vel: Vec2,
    /// Degrees, +X is 0°
    pub facing: f32,
    pub radius: f32,
    /// Units per second
    pub max_speed: f32,
    /// Degrees per second
    pub turn_rate: f32,
    pub target: Target,
}

impl Agent {
    pub fn new(id: AgentId, role: Role, pos: Vec2) -> Self {
        Self {
            id,
            role,
            pos,
            vel: Vec2::ZERO,
            facing: 0.0,
            radius: 0.5,
            max_speed: 1.0,
            turn_rate: 360.0,
            target: Target::Hold,
        }
    }

    #[inline]
    pub fn team(&self) -> Team {
        self.role.team()
    }

    /// Read-only view handed to steering
    pub fn view(&self) -> AgentView {
        AgentView {
            role: self.role,
            pos: self.pos,
            vel: self.vel,
            facing: self.facing,
            radius: self.radius,
            max_speed: self.max_speed,
        }
    }

    /// Check the host-supplied limits before they reach any normalization
    pub fn validate(&self) -> Result<()> {
        let positive = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SimError::InvalidAgent {
                    id: self.id,
                    field,
                    value,
                })
            }
        };
        positive("radius", self.radius)?;
        positive("max_speed", self.max_speed)?;
        if !self.turn_rate.is_finite() || self.turn_rate < 0.0 {
            return Err(SimError::InvalidAgent {
                id: self.id,
                field: "turn_rate",
                value: self.turn_rate,
            });
        }
        Ok(())
    }
}

/// Pre-move snapshot of an agent as seen by steering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentView {
    pub role: Role,
    pub pos: Vec2,
    pub vel: Vec2,
    pub facing: f32,
    pub radius: f32,
    pub max_speed: f32,
}

impl AgentView {
    /// A motionless zero-size stand-in for a point target
    pub fn at_point(pos: Vec2) -> Self {
        Self {
            role: Role::Quarry,
            pos,
            vel: Vec2::ZERO,
            facing: 0.0,
            radius: 0.0,
            max_speed: 0.0,
        }
    }

    #[inline]
    pub fn team(&self) -> Team {
        self.role.team()
    }
}

/// Source of tie-break noise in [-1, 1]
pub trait NoiseSource {
    fn sample(&mut self) -> f32;
}

impl<F> NoiseSource for F
where
    F: FnMut() -> f32,
{
    fn sample(&mut self) -> f32 {
        self()
    }
}

/// RNG state wrapper for reproducible runs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    /// Stream for steering tie-break noise
    pub const NOISE_STREAM: u64 = 0;
    /// Stream for board spawning
    pub const SPAWN_STREAM: u64 = 1;

    pub fn new(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}

/// Built-in noise sources
#[derive(Debug, Clone)]
pub enum Noise {
    /// Uniform samples from a seeded PCG stream
    Seeded(Pcg32),
    /// Always the same value (clamped to [-1, 1])
    Fixed(f32),
}

impl Noise {
    pub fn seeded(seed: u64) -> Self {
        Noise::Seeded(RngState::new(seed, RngState::NOISE_STREAM).to_rng())
    }

    /// Noise that never perturbs anything
    pub fn silent() -> Self {
        Noise::Fixed(0.0)
    }
}

impl NoiseSource for Noise {
    fn sample(&mut self) -> f32 {
        match self {
            Noise::Seeded(rng) => rng.random_range(-1.0f32..=1.0),
            Noise::Fixed(value) => value.clamp(-1.0, 1.0),
        }
    }
}

/// Where tie-break noise comes from
enum NoiseSlot {
    /// Owned by the simulation and re-seeded from `SimState::seed` on reset
    Seeded(Noise),
    /// Supplied by the host and kept across resets
    Injected(Box<dyn NoiseSource>),
}

impl NoiseSlot {
    fn source(&mut self) -> &mut dyn NoiseSource {
        match self {
            NoiseSlot::Seeded(noise) => noise,
            NoiseSlot::Injected(source) => source.as_mut(),
        }
    }
}

impl fmt::Debug for NoiseSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseSlot::Seeded(noise) => f.debug_tuple("Seeded").field(noise).finish(),
            NoiseSlot::Injected(_) => f.write_str("Injected"),
        }
    }
}

/// Complete simulation context
#[derive(Debug)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Board layout used by `reset`
    pub scenario: Scenario,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Frozen once decided, until `reset`
    pub outcome: Outcome,
    /// Paused ticks leave everything untouched
    pub paused: bool,
    /// Active agents (sorted by id for determinism)
    pub agents: Vec<Agent>,
    /// Strategy kind every hunter uses
    selected: StrategyKind,
    /// One live strategy instance per hunter
    strategies: BTreeMap<AgentId, Strategy>,
    noise: NoiseSlot,
    /// Wide enough to hold one past `u32::MAX`
    next_id: u64,
}

impl SimState {
    /// Create a simulation and spawn the scenario's board
    pub fn new(scenario: Scenario, seed: u64, strategy: StrategyKind) -> Self {
        let mut state = Self::empty(seed, strategy);
        state.scenario = scenario;
        state.reset();
        state
    }

    /// A simulation with no agents; the host adds them explicitly
    pub fn empty(seed: u64, strategy: StrategyKind) -> Self {
        Self {
            seed,
            scenario: Scenario::default(),
            time_ticks: 0,
            outcome: Outcome::Undecided,
            paused: false,
            agents: Vec::new(),
            selected: strategy,
            strategies: BTreeMap::new(),
            noise: NoiseSlot::Seeded(Noise::seeded(seed)),
            next_id: 1,
        }
    }

    /// Discard every piece of cross-tick state and respawn the board
    ///
    /// The round also resumes. Seeded noise restarts from `seed`; a source
    /// injected with `set_noise` is kept as is.
    pub fn reset(&mut self) {
        self.agents.clear();
        self.strategies.clear();
        self.next_id = 1;
        self.time_ticks = 0;
        self.outcome = Outcome::Undecided;
        self.paused = false;
        if let NoiseSlot::Seeded(noise) = &mut self.noise {
            *noise = Noise::seeded(self.seed);
        }

        let mut rng = RngState::new(self.seed, RngState::SPAWN_STREAM).to_rng();
        let scenario = self.scenario.clone();
        for (role, pos) in scenario.spawn_points(&mut rng) {
            let Ok(id) = self.next_agent_id() else {
                log::warn!("Agent id space exhausted, board truncated");
                break;
            };
            self.agents.push(scenario.agent(id, role, pos));
        }
        self.resolve_default_relations();

        log::info!(
            "Simulation reset: seed={}, agents={}, strategy={}",
            self.seed,
            self.agents.len(),
            self.selected.name()
        );
    }

    /// Allocate a new agent ID
    pub fn next_agent_id(&mut self) -> Result<AgentId> {
        let id = u32::try_from(self.next_id).map_err(|_| SimError::IdSpaceExhausted)?;
        self.next_id += 1;
        Ok(AgentId(id))
    }

    /// Insert a host-built agent
    pub fn add_agent(&mut self, agent: Agent) -> Result<AgentId> {
        if self.agent(agent.id).is_some() {
            return Err(SimError::DuplicateAgent(agent.id));
        }
        let id = agent.id;
        self.next_id = self.next_id.max(u64::from(id.0) + 1);
        self.agents.push(agent);
        self.normalize_order();
        Ok(id)
    }

    /// Spawn a guard at `pos` with the scenario's guard stats
    ///
    /// Only the new guard gets a default target; existing agents keep theirs.
    pub fn spawn_guard(&mut self, pos: Vec2) -> Result<AgentId> {
        let id = self.next_agent_id()?;
        let mut guard = self.scenario.agent(id, Role::Guard, pos);
        if let Some(target) = self.default_target(Role::Guard) {
            guard.target = target;
        }
        self.agents.push(guard);
        log::debug!("Guard {} spawned at {}", id, pos);
        Ok(id)
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    /// Override where an agent is heading
    pub fn set_target(&mut self, id: AgentId, target: Target) -> Result<()> {
        let agent = self.agent_mut(id).ok_or(SimError::UnknownAgent(id))?;
        agent.target = target;
        Ok(())
    }

    /// Default target for a freshly spawned agent of `role`
    ///
    /// Hunters chase the first quarry and guards the first hunter.
    fn default_target(&self, role: Role) -> Option<Target> {
        let prey = match role {
            Role::Hunter => Role::Quarry,
            Role::Guard => Role::Hunter,
            Role::Quarry => return None,
        };
        self.agents
            .iter()
            .find(|a| a.role == prey)
            .map(|a| Target::Agent(a.id))
    }

    /// Point every hunter and guard still at `Hold` at its default target
    ///
    /// `reset` runs this once on the fresh board. Hosts that build a board
    /// by hand call it once after adding agents; a `Hold` set afterwards
    /// is never touched again by the simulation.
    pub fn resolve_default_relations(&mut self) {
        let resolved: Vec<Option<Target>> = self
            .agents
            .iter()
            .map(|a| match a.target {
                Target::Hold => self.default_target(a.role),
                _ => None,
            })
            .collect();
        for (agent, target) in self.agents.iter_mut().zip(resolved) {
            if let Some(target) = target {
                agent.target = target;
            }
        }
    }

    pub fn selected_strategy(&self) -> StrategyKind {
        self.selected
    }

    /// Switch every hunter to `kind`, starting from a fresh instance
    pub fn select_strategy(&mut self, kind: StrategyKind) {
        if kind != self.selected {
            log::info!("Strategy selected: {}", kind.name());
        }
        self.selected = kind;
        self.strategies.clear();
    }

    /// Replace the tie-break noise source
    ///
    /// Any `NoiseSource` works, including a `FnMut() -> f32` closure. The
    /// source survives `reset` until `use_seeded_noise` is called.
    pub fn set_noise(&mut self, noise: impl NoiseSource + 'static) {
        self.noise = NoiseSlot::Injected(Box::new(noise));
    }

    /// Go back to noise seeded from `seed`
    pub fn use_seeded_noise(&mut self) {
        self.noise = NoiseSlot::Seeded(Noise::seeded(self.seed));
    }

    /// Live strategy instance for a hunter, created on first use
    pub(crate) fn strategy_and_noise(
        &mut self,
        hunter: AgentId,
    ) -> (&mut Strategy, &mut dyn NoiseSource) {
        let kind = self.selected;
        let strategy = self
            .strategies
            .entry(hunter)
            .or_insert_with(|| Strategy::new(kind));
        (strategy, self.noise.source())
    }

    /// Fail fast on anything that would poison the geometry
    pub fn validate(&self, dt: f32) -> Result<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::InvalidDeltaTime { dt });
        }
        for agent in &self.agents {
            agent.validate()?;
            if let Target::Agent(target) = agent.target {
                if self.agent(target).is_none() {
                    return Err(SimError::UnknownTarget {
                        id: agent.id,
                        target,
                    });
                }
            }
        }
        Ok(())
    }

    /// Pre-move views of every agent, in agent order
    pub fn snapshot(&self) -> Vec<AgentView> {
        self.agents.iter().map(Agent::view).collect()
    }

    /// Resolve an agent's target against a snapshot
    ///
    /// `Hold` resolves to the agent itself, so steering heads nowhere.
    pub fn target_view(&self, index: usize, snapshot: &[AgentView]) -> AgentView {
        let agent = &self.agents[index];
        match agent.target {
            Target::Hold => snapshot[index],
            Target::Point(p) => AgentView::at_point(p),
            Target::Agent(id) => self
                .agents
                .iter()
                .position(|a| a.id == id)
                .map(|i| snapshot[i])
                .unwrap_or(snapshot[index]),
        }
    }

    /// Obstacles for the agent at `index`: guards on the other team
    pub fn obstacles_for(&self, index: usize, snapshot: &[AgentView]) -> Vec<AgentView> {
        let team = self.agents[index].team();
        snapshot
            .iter()
            .filter(|v| v.team() != team && v.role == Role::Guard)
            .copied()
            .collect()
    }

    /// Ensure agents are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.agents.sort_by_key(|a| a.id);
    }
}

use crate::{ActionPool, HeuristicType, ScoreWeights, SolverError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SolverAlgorithm {
    Oneshot,
    OneshotForked,
    Stepwise,
    StepwiseForked,
    #[default]
    StepwiseFurcated,
}

/// How rollouts resolve success rolls and condition changes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SimulationMode {
    /// Only certain actions succeed and the condition stays Normal.
    #[default]
    Deterministic,
    /// Rolls come from each run's own seeded stream.
    Stochastic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    pub algorithm: SolverAlgorithm,
    /// Total engine iterations per round, split across forks.
    pub iterations: u32,
    /// Hard cap on one engine run that keeps searching because nothing has
    /// scored yet.
    pub max_iterations: u32,
    pub score_storage_threshold: f32,
    pub max_score_weighting_constant: f32,
    pub exploration_constant: f32,
    pub max_step_count: u32,
    pub max_rollout_step_count: u32,
    pub fork_count: u32,
    pub furcated_action_count: u32,
    /// Worker threads for forked runs. `None` uses rayon's global pool.
    pub max_thread_count: Option<usize>,
    pub heuristic: HeuristicType,
    pub simulation_mode: SimulationMode,
    pub action_pool: ActionPool,
    pub seed: u64,
    pub weights: ScoreWeights,
}

fn cpu_count() -> u32 {
    std::thread::available_parallelism()
        .map(|count| count.get() as u32)
        .unwrap_or(1)
}

impl Default for SolverConfig {
    fn default() -> Self {
        let fork_count = cpu_count().max(32);
        Self {
            algorithm: SolverAlgorithm::StepwiseFurcated,
            iterations: 100_000,
            max_iterations: 300_000,
            score_storage_threshold: 1.0,
            max_score_weighting_constant: 0.1,
            exploration_constant: 4.0,
            max_step_count: 30,
            max_rollout_step_count: 99,
            fork_count,
            furcated_action_count: fork_count / 2,
            max_thread_count: None,
            heuristic: HeuristicType::Strict,
            simulation_mode: SimulationMode::Deterministic,
            action_pool: ActionPool::default(),
            seed: 0xC0FFEE,
            weights: ScoreWeights::default(),
        }
    }
}

impl SolverConfig {
    pub fn simulator_default() -> Self {
        Self::default()
    }

    /// Leaves one core for the host.
    pub fn synth_helper_default() -> Self {
        let cpus = cpu_count();
        Self {
            iterations: 300_000,
            max_iterations: 900_000,
            fork_count: cpus.saturating_sub(1).max(1),
            furcated_action_count: (cpus / 2).max(1),
            algorithm: SolverAlgorithm::StepwiseForked,
            ..Self::default()
        }
    }

    pub fn expert_default() -> Self {
        Self {
            heuristic: HeuristicType::ExpertHydra,
            simulation_mode: SimulationMode::Stochastic,
            action_pool: ActionPool::expert(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        if self.iterations == 0 {
            return Err(SolverError::ZeroIterations);
        }
        if self.max_step_count == 0 {
            return Err(SolverError::ZeroMaxStepCount);
        }
        let forked = matches!(
            self.algorithm,
            SolverAlgorithm::OneshotForked
                | SolverAlgorithm::StepwiseForked
                | SolverAlgorithm::StepwiseFurcated
        );
        if forked && self.fork_count == 0 {
            return Err(SolverError::ZeroForkCount);
        }
        if self.algorithm == SolverAlgorithm::StepwiseFurcated {
            if self.furcated_action_count == 0 {
                return Err(SolverError::ZeroFurcatedActionCount);
            }
            if self.furcated_action_count > self.fork_count {
                return Err(SolverError::FurcationExceedsForks {
                    furcated: self.furcated_action_count,
                    forks: self.fork_count,
                });
            }
        }
        if self.action_pool.is_empty() {
            return Err(SolverError::EmptyActionPool);
        }
        for (name, value) in [
            ("score_storage_threshold", self.score_storage_threshold),
            ("max_score_weighting_constant", self.max_score_weighting_constant),
            ("exploration_constant", self.exploration_constant),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SolverError::InvalidConstant(name));
            }
        }
        for (name, value) in self.weights.fields() {
            if !value.is_finite() || value < 0.0 {
                return Err(SolverError::InvalidWeight(name));
            }
        }
        Ok(())
    }

    /// Iterations each fork of a round gets.
    pub(crate) fn iterations_per_fork(&self) -> u32 {
        (self.iterations / self.fork_count.max(1)).max(1)
    }
}

use crate::{
    score_state, ActionPool, ActionSet, CancelToken, HeuristicType, SimulationMode, SolverConfig,
    SolverSolution,
};
use craftplan_core::{
    ActionType, CompletionState, Roller, SimulationInput, SimulationState, Simulator,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Instant;
use tracing::debug;

/// Fruitless iterations tolerated before checking whether the tree is exhausted.
const STALE_PROGRESS_THRESHOLD: u32 = 1 << 12;

/// Seed of the `index`-th sibling stream. Index 0 keeps the parent seed.
pub fn derive_seed(seed: u64, index: u64) -> u64 {
    let mut z = index.wrapping_mul(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    seed ^ z ^ (z >> 31)
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<usize>,
    action: Option<ActionType>,
    state: SimulationState,
    completion: CompletionState,
    unexpanded: ActionSet,
    children: Vec<usize>,
    visits: u32,
    score_sum: f32,
    max_score: f32,
}

impl Node {
    fn new(
        parent: Option<usize>,
        action: Option<ActionType>,
        state: SimulationState,
        completion: CompletionState,
        unexpanded: ActionSet,
    ) -> Self {
        Self {
            parent,
            action,
            state,
            completion,
            unexpanded,
            children: Vec::new(),
            visits: 0,
            score_sum: 0.0,
            max_score: 0.0,
        }
    }

    fn is_complete(&self) -> bool {
        completion_with_actions(self.completion, &self.unexpanded) != CompletionState::Incomplete
    }
}

/// One rollout step as it was simulated, so a stored path keeps the exact
/// states that produced its score.
struct Step {
    action: ActionType,
    state: SimulationState,
    completion: CompletionState,
    actions: ActionSet,
}

fn completion_with_actions(completion: CompletionState, actions: &ActionSet) -> CompletionState {
    if completion == CompletionState::Incomplete && actions.is_empty() {
        CompletionState::NoMoreActions
    } else {
        completion
    }
}

/// One Monte Carlo tree search over rotations from a fixed start state.
/// Nodes live in an arena and refer to each other by index.
pub struct Engine<'a> {
    config: &'a SolverConfig,
    pool: ActionPool,
    heuristic: HeuristicType,
    sim: Simulator<'a>,
    rng: StdRng,
    nodes: Vec<Node>,
    iterations: u64,
}

impl<'a> Engine<'a> {
    pub fn new(
        config: &'a SolverConfig,
        input: &'a SimulationInput,
        state: SimulationState,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let roller = match config.simulation_mode {
            SimulationMode::Deterministic => Roller::Deterministic,
            SimulationMode::Stochastic => Roller::seeded(rng.gen()),
        };
        let mut sim =
            Simulator::with_roller(input, roller).with_max_step_count(config.max_step_count);
        sim.set_state(state);
        let pool = config.action_pool;
        let heuristic = config.heuristic;
        let root = Node::new(
            None,
            None,
            state,
            sim.completion_state(),
            heuristic.available_actions(&sim, &pool),
        );
        Self {
            config,
            pool,
            heuristic,
            sim,
            rng,
            nodes: vec![root],
            iterations: 0,
        }
    }

    pub fn max_score(&self) -> f32 {
        self.nodes[0].max_score
    }

    /// Iterations run so far, over all calls to [`Engine::search`].
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Runs at least `iterations` iterations, and keeps going while nothing
    /// has scored yet and the tree still has unexplored actions, up to the
    /// configured `max_iterations`. Returns early when `cancel` is set.
    pub fn search(&mut self, iterations: u32, cancel: &CancelToken) {
        let started_at = Instant::now();
        let cap = self.config.max_iterations.max(iterations) as u64;
        let mut stale = 0u32;
        let mut done = 0u64;
        while done < iterations as u64 || (self.max_score() == 0.0 && done < cap) {
            if cancel.is_cancelled() {
                break;
            }
            let selected = self.select();
            let (end, score) = self.expand_and_rollout(selected);
            if self.max_score() == 0.0 {
                if end == selected {
                    stale += 1;
                    if stale >= STALE_PROGRESS_THRESHOLD {
                        stale = 0;
                        if self.all_nodes_complete() {
                            break;
                        }
                    }
                } else {
                    stale = 0;
                }
            }
            self.backpropagate(end, score);
            done += 1;
        }
        self.iterations += done;
        if self.max_score() == 0.0 && done >= cap {
            debug!(iterations = done, "iteration cap reached without a finished rollout");
        }
        debug!(
            iterations = done,
            nodes = self.nodes.len(),
            max_score = self.max_score(),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "search finished"
        );
    }

    /// Follows the best-scoring child from the root down to a leaf.
    pub fn solution(&self) -> SolverSolution {
        let mut actions = Vec::new();
        let mut idx = 0usize;
        while !self.nodes[idx].children.is_empty() {
            let mut best = self.nodes[idx].children[0];
            for &child in &self.nodes[idx].children {
                if self.nodes[child].max_score >= self.nodes[best].max_score {
                    best = child;
                }
            }
            idx = best;
            if let Some(action) = self.nodes[idx].action {
                actions.push(action);
            }
        }
        SolverSolution::new(actions, self.nodes[idx].state)
    }

    fn execute(
        &mut self,
        state: &SimulationState,
        action: ActionType,
    ) -> (SimulationState, CompletionState, ActionSet) {
        let (_, next) = self.sim.execute(state, action);
        let completion = self.sim.completion_state();
        let actions = self.heuristic.available_actions(&self.sim, &self.pool);
        (next, completion, actions)
    }

    fn add_child(&mut self, parent: usize, action: ActionType) -> usize {
        let state = self.nodes[parent].state;
        let (next, completion, actions) = self.execute(&state, action);
        self.push_child(parent, action, next, completion, actions)
    }

    fn push_child(
        &mut self,
        parent: usize,
        action: ActionType,
        state: SimulationState,
        completion: CompletionState,
        actions: ActionSet,
    ) -> usize {
        let idx = self.nodes.len();
        self.nodes
            .push(Node::new(Some(parent), Some(action), state, completion, actions));
        self.nodes[parent].children.push(idx);
        idx
    }

    fn select(&self) -> usize {
        let w = self.config.max_score_weighting_constant;
        let c = self.config.exploration_constant;
        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            if !node.unexpanded.is_empty() || node.children.is_empty() {
                return idx;
            }
            let exploration = (c * (node.visits.max(1) as f32).ln()).sqrt();
            let mut best = node.children[0];
            let mut best_eval = 0.0f32;
            for &child_idx in &node.children {
                let child = &self.nodes[child_idx];
                let visits = child.visits.max(1) as f32;
                let eval = (1.0 - w) * (child.score_sum / visits)
                    + w * child.max_score
                    + exploration / visits.sqrt();
                if eval >= best_eval {
                    best_eval = eval;
                    best = child_idx;
                }
            }
            idx = best;
        }
    }

    fn score(&self, state: &SimulationState, completion: CompletionState) -> f32 {
        score_state(
            self.sim.input(),
            state,
            completion,
            &self.config.weights,
            self.config.max_step_count,
        )
    }

    fn expand_and_rollout(&mut self, idx: usize) -> (usize, f32) {
        if self.nodes[idx].is_complete() {
            let node = &self.nodes[idx];
            return (idx, self.score(&node.state, node.completion));
        }
        let pool = self.pool;
        let Some(action) = self.nodes[idx].unexpanded.pop_random(&pool, &mut self.rng) else {
            return (idx, 0.0);
        };
        let expanded = self.add_child(idx, action);

        let node = &self.nodes[expanded];
        let mut state = node.state;
        let mut completion = node.completion;
        let mut actions = node.unexpanded;
        let budget = self
            .config
            .max_step_count
            .saturating_sub(state.action_count)
            .min(self.config.max_rollout_step_count) as usize;
        let mut path = Vec::with_capacity(budget);
        while completion_with_actions(completion, &actions) == CompletionState::Incomplete
            && path.len() < budget
        {
            let Some(next) = actions.select_random(&pool, &mut self.rng) else {
                break;
            };
            let (after, done, available) = self.execute(&state, next);
            path.push(Step {
                action: next,
                state: after,
                completion: done,
                actions: available,
            });
            state = after;
            completion = done;
            actions = available;
        }

        let score = self.score(&state, completion);
        if completion == CompletionState::ProgressComplete
            && score >= self.config.score_storage_threshold
            && score >= self.max_score()
        {
            return (self.store_path(expanded, path), score);
        }
        (expanded, score)
    }

    /// Adds a rolled-out path under `start` so its score stays reachable.
    /// Nodes keep the rollout's states instead of re-simulating them.
    fn store_path(&mut self, start: usize, path: Vec<Step>) -> usize {
        let pool = self.pool;
        let mut idx = start;
        for step in path {
            if self.nodes[idx].is_complete()
                || !self.nodes[idx].unexpanded.remove(&pool, step.action)
            {
                break;
            }
            idx = self.push_child(idx, step.action, step.state, step.completion, step.actions);
        }
        idx
    }

    fn backpropagate(&mut self, start: usize, score: f32) {
        let mut walk = Some(start);
        while let Some(idx) = walk {
            let node = &mut self.nodes[idx];
            node.visits = node.visits.saturating_add(1);
            node.score_sum += score;
            node.max_score = node.max_score.max(score);
            walk = node.parent;
        }
    }

    fn all_nodes_complete(&self) -> bool {
        self.nodes.iter().all(|node| node.unexpanded.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_derived_seed_is_the_parent() {
        assert_eq!(derive_seed(0xC0FFEE, 0), 0xC0FFEE);
        assert_ne!(derive_seed(0xC0FFEE, 1), 0xC0FFEE);
        assert_ne!(derive_seed(0xC0FFEE, 1), derive_seed(0xC0FFEE, 2));
    }
}

use crate::{
    derive_seed, CancelToken, Engine, SimulationMode, SolverAlgorithm, SolverConfig, SolverError,
    SolverSolution,
};
use craftplan_core::{
    ActionResponse, ActionType, Roller, SimulationInput, SimulationState, Simulator,
};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Plans a rotation from `state`. `on_action` receives every action of the
/// returned rotation once, in order, as soon as the strategy commits to it.
pub fn search<F>(
    config: &SolverConfig,
    input: &SimulationInput,
    state: SimulationState,
    mut on_action: F,
    cancel: &CancelToken,
) -> Result<SolverSolution, SolverError>
where
    F: FnMut(ActionType),
{
    config.validate()?;
    let mut reporter = Reporter {
        callback: &mut on_action,
        reported: 0,
    };
    let workers = Workers::new(config);
    let planner = Search {
        config,
        input,
        cancel,
        workers: &workers,
    };
    let solution = match config.algorithm {
        SolverAlgorithm::Oneshot => planner.oneshot(state, &mut reporter),
        SolverAlgorithm::OneshotForked => planner.oneshot_forked(state, &mut reporter),
        SolverAlgorithm::Stepwise => planner.stepwise(state, false, &mut reporter),
        SolverAlgorithm::StepwiseForked => planner.stepwise(state, true, &mut reporter),
        SolverAlgorithm::StepwiseFurcated => planner.stepwise_furcated(state, &mut reporter),
    };
    info!(
        algorithm = ?config.algorithm,
        actions = solution.actions().len(),
        progress = solution.state().progress,
        quality = solution.state().quality,
        cancelled = cancel.is_cancelled(),
        "solve finished"
    );
    Ok(solution)
}

/// [`search`] from the opening state of `input`.
pub fn search_input<F>(
    config: &SolverConfig,
    input: &SimulationInput,
    on_action: F,
    cancel: &CancelToken,
) -> Result<SolverSolution, SolverError>
where
    F: FnMut(ActionType),
{
    search(config, input, SimulationState::new(input), on_action, cancel)
}

struct Reporter<'f> {
    callback: &'f mut dyn FnMut(ActionType),
    reported: usize,
}

impl Reporter<'_> {
    /// Reports the part of `committed` not reported yet.
    fn sync(&mut self, committed: &[ActionType]) {
        for &action in committed.iter().skip(self.reported) {
            (self.callback)(action);
        }
        self.reported = self.reported.max(committed.len());
    }
}

enum Workers {
    Global,
    Dedicated(ThreadPool),
    Sequential,
}

impl Workers {
    fn new(config: &SolverConfig) -> Self {
        let Some(threads) = config.max_thread_count else {
            return Workers::Global;
        };
        match ThreadPoolBuilder::new().num_threads(threads.max(1)).build() {
            Ok(pool) => Workers::Dedicated(pool),
            Err(err) => {
                warn!(%err, threads, "worker pool unavailable, running forks sequentially");
                Workers::Sequential
            }
        }
    }

    fn map<T, R, F>(&self, jobs: Vec<T>, run: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync + Send,
    {
        match self {
            Workers::Global => jobs.into_par_iter().map(run).collect(),
            Workers::Dedicated(pool) => pool.install(|| jobs.into_par_iter().map(run).collect()),
            Workers::Sequential => jobs.into_iter().map(run).collect(),
        }
    }
}

struct Run {
    score: f32,
    solution: SolverSolution,
    /// Beam branch the run started from.
    branch: usize,
}

#[derive(Debug, Clone)]
struct Branch {
    actions: Vec<ActionType>,
    state: SimulationState,
}

struct Search<'a> {
    config: &'a SolverConfig,
    input: &'a SimulationInput,
    cancel: &'a CancelToken,
    workers: &'a Workers,
}

impl Search<'_> {
    fn run(&self, state: SimulationState, seed: u64, iterations: u32, branch: usize) -> Run {
        let mut engine = Engine::new(self.config, self.input, state, seed);
        engine.search(iterations, self.cancel);
        Run {
            score: engine.max_score(),
            solution: engine.solution(),
            branch,
        }
    }

    /// Runs one engine per job in parallel. Results keep job order.
    fn run_forks(&self, jobs: Vec<(SimulationState, u64, usize)>) -> Vec<Run> {
        let iterations = self.config.iterations_per_fork();
        self.workers.map(jobs, |(state, seed, branch)| {
            self.run(state, seed, iterations, branch)
        })
    }

    fn forks_from(&self, state: SimulationState, seed: u64) -> Vec<Run> {
        let jobs = (0..self.config.fork_count as u64)
            .map(|fork| (state, derive_seed(seed, fork), 0))
            .collect();
        self.run_forks(jobs)
    }

    /// Applies committed actions. Stochastic searches roll them from a
    /// stream no fork uses.
    fn simulator(&self) -> Simulator<'_> {
        let roller = match self.config.simulation_mode {
            SimulationMode::Deterministic => Roller::Deterministic,
            SimulationMode::Stochastic => Roller::seeded(derive_seed(self.config.seed, u64::MAX)),
        };
        Simulator::with_roller(self.input, roller).with_max_step_count(self.config.max_step_count)
    }

    fn oneshot(&self, state: SimulationState, reporter: &mut Reporter<'_>) -> SolverSolution {
        let run = self.run(state, self.config.seed, self.config.iterations, 0);
        reporter.sync(run.solution.actions());
        run.solution
    }

    fn oneshot_forked(
        &self,
        state: SimulationState,
        reporter: &mut Reporter<'_>,
    ) -> SolverSolution {
        let started_at = Instant::now();
        let runs = self.forks_from(state, self.config.seed);
        self.log_round(0, 1, started_at);
        let solution = match best_run(runs) {
            Some(run) => run.solution,
            None => SolverSolution::new(Vec::new(), state),
        };
        reporter.sync(solution.actions());
        solution
    }

    /// Commits one action per round until the craft ends or a run clears
    /// the storage threshold.
    fn stepwise(
        &self,
        start: SimulationState,
        forked: bool,
        reporter: &mut Reporter<'_>,
    ) -> SolverSolution {
        let mut sim = self.simulator();
        sim.set_state(start);
        let mut actions = Vec::new();
        let mut state = start;
        let mut round = 0u64;
        loop {
            if self.cancel.is_cancelled() {
                warn!(round, committed = actions.len(), "search cancelled");
                break;
            }
            if sim.is_complete() {
                break;
            }

            let started_at = Instant::now();
            let seed = derive_seed(self.config.seed, round);
            let best = if forked {
                best_run(self.forks_from(state, seed))
            } else {
                Some(self.run(state, seed, self.config.iterations, 0))
            };
            self.log_round(round, 1, started_at);
            if self.cancel.is_cancelled() {
                warn!(round, committed = actions.len(), "search cancelled");
                break;
            }
            let Some(best) = best else {
                break;
            };

            if best.score >= self.config.score_storage_threshold {
                let (rest, end) = best.solution.into_parts();
                actions.extend(rest);
                reporter.sync(&actions);
                return SolverSolution::new(actions, end);
            }

            let Some(&chosen) = best.solution.actions().first() else {
                break;
            };
            let Some(next) = commit(&mut sim, &state, chosen) else {
                break;
            };
            state = next;
            actions.push(chosen);
            reporter.sync(&actions);
            round += 1;
        }
        SolverSolution::new(actions, state)
    }

    /// Keeps a beam of the most promising partial rotations and advances
    /// each by one action per round.
    fn stepwise_furcated(
        &self,
        start: SimulationState,
        reporter: &mut Reporter<'_>,
    ) -> SolverSolution {
        let config = self.config;
        let mut sim = self.simulator();
        let mut beam = vec![Branch {
            actions: Vec::new(),
            state: start,
        }];
        let mut fallback = beam[0].clone();
        let mut finished: Vec<(f32, Branch)> = Vec::new();
        let mut round = 0u64;

        while !beam.is_empty() {
            if self.cancel.is_cancelled() {
                warn!(round, beam = beam.len(), "search cancelled");
                break;
            }

            let started_at = Instant::now();
            let round_seed = derive_seed(config.seed, round);
            let forks = config.fork_count as usize;
            let jobs = (0..forks)
                .map(|fork| {
                    let branch = fork * beam.len() / forks;
                    (beam[branch].state, derive_seed(round_seed, fork as u64), branch)
                })
                .collect();
            let mut runs = self.run_forks(jobs);
            self.log_round(round, beam.len(), started_at);
            if self.cancel.is_cancelled() {
                warn!(round, beam = beam.len(), "search cancelled");
                break;
            }

            // stable, so ties keep the lower fork index first
            runs.sort_by(|a, b| b.score.total_cmp(&a.score));
            runs.truncate(config.furcated_action_count as usize);

            if let Some(best) = runs.first() {
                if best.score >= config.score_storage_threshold {
                    let mut actions = beam[best.branch].actions.clone();
                    actions.extend_from_slice(best.solution.actions());
                    reporter.sync(&actions);
                    return SolverSolution::new(actions, *best.solution.state());
                }
            }

            let mut next_beam = Vec::with_capacity(runs.len());
            for run in &runs {
                let Some(&chosen) = run.solution.actions().first() else {
                    continue;
                };
                let branch = &beam[run.branch];
                let Some(state) = commit(&mut sim, &branch.state, chosen) else {
                    continue;
                };
                let mut actions = branch.actions.clone();
                actions.push(chosen);
                let advanced = Branch { actions, state };
                if sim.is_complete() {
                    finished.push((run.score, advanced));
                } else {
                    next_beam.push(advanced);
                }
            }

            if finished.is_empty() {
                if let Some(first) = next_beam.first() {
                    let agreed = common_prefix_len(&next_beam);
                    reporter.sync(&first.actions[..agreed]);
                    fallback = first.clone();
                }
            }
            beam = next_beam;
            round += 1;
        }

        let mut result = fallback;
        let mut best_score = f32::NEG_INFINITY;
        for (score, branch) in finished {
            if score > best_score {
                best_score = score;
                result = branch;
            }
        }
        reporter.sync(&result.actions);
        SolverSolution::new(result.actions, result.state)
    }

    fn log_round(&self, round: u64, beam: usize, started_at: Instant) {
        let elapsed = started_at.elapsed();
        let per_run = match self.config.algorithm {
            SolverAlgorithm::Oneshot | SolverAlgorithm::Stepwise => self.config.iterations,
            _ => self.config.iterations_per_fork(),
        };
        let kips = per_run as f64 / elapsed.as_secs_f64().max(f64::EPSILON) / 1000.0;
        debug!(
            round,
            beam,
            elapsed_ms = elapsed.as_millis() as u64,
            kips,
            "round finished"
        );
    }
}

/// Applies `action` to the committed state. `None` if the action was
/// rejected.
fn commit(
    sim: &mut Simulator<'_>,
    state: &SimulationState,
    action: ActionType,
) -> Option<SimulationState> {
    let (response, next) = sim.execute(state, action);
    match response {
        ActionResponse::UsedAction
        | ActionResponse::ProgressComplete
        | ActionResponse::NoMoreDurability => Some(next),
        _ => None,
    }
}

/// Highest score wins, the lowest index on ties.
fn best_run(runs: Vec<Run>) -> Option<Run> {
    let mut best: Option<Run> = None;
    for run in runs {
        if best.as_ref().map_or(true, |current| run.score > current.score) {
            best = Some(run);
        }
    }
    best
}

fn common_prefix_len(branches: &[Branch]) -> usize {
    let Some((first, rest)) = branches.split_first() else {
        return 0;
    };
    rest.iter().fold(first.actions.len(), |len, branch| {
        first.actions[..len]
            .iter()
            .zip(&branch.actions)
            .take_while(|(a, b)| a == b)
            .count()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftplan_core::{CharacterStats, ConditionMask, RecipeInfo};
    use ActionType::*;

    fn branch(actions: &[ActionType], input: &SimulationInput) -> Branch {
        Branch {
            actions: actions.to_vec(),
            state: SimulationState::new(input),
        }
    }

    #[test]
    fn common_prefix_stops_at_first_disagreement() {
        let input = SimulationInput::new(
            CharacterStats {
                craftsmanship: 100,
                control: 100,
                cp: 100,
                level: 10,
                clvl: 1,
                is_specialist: false,
                has_splendorous_buff: false,
                can_use_manipulation: true,
            },
            RecipeInfo {
                is_expert: false,
                class_job_level: 10,
                rlvl: 1,
                conditions: ConditionMask::NORMAL,
                max_durability: 40,
                max_quality: 100,
                max_progress: 100,
                quality_modifier: 100,
                quality_divider: 50,
                progress_modifier: 100,
                progress_divider: 50,
            },
        )
        .unwrap();
        let branches = [
            branch(&[Reflect, BasicTouch, BasicSynthesis], &input),
            branch(&[Reflect, BasicTouch, Veneration], &input),
            branch(&[Reflect, BasicTouch], &input),
        ];
        assert_eq!(common_prefix_len(&branches), 2);
        assert_eq!(common_prefix_len(&branches[..1]), 3);
        assert_eq!(common_prefix_len(&[]), 0);
    }

    #[test]
    fn reporter_never_repeats_an_action() {
        let mut seen = Vec::new();
        let mut callback = |action: ActionType| seen.push(action);
        let mut reporter = Reporter {
            callback: &mut callback,
            reported: 0,
        };
        reporter.sync(&[Reflect]);
        reporter.sync(&[Reflect]);
        reporter.sync(&[Reflect, BasicTouch]);
        drop(reporter);
        assert_eq!(seen, vec![Reflect, BasicTouch]);
    }
}

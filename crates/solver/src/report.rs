use crate::{score_state, SolverAlgorithm, SolverConfig, SolverError, SolverSolution};
use craftplan_core::{ActionType, CompletionState, SimulationInput, Simulator};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalState {
    pub progress: u32,
    pub max_progress: u32,
    pub quality: u32,
    pub max_quality: u32,
    pub durability: u32,
    pub max_durability: u32,
    pub cp: u32,
    pub max_cp: u32,
    pub hq_percent: u8,
    pub completion: CompletionState,
}

/// Summary of one solve, for logs and hosts that persist results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolveReport {
    pub algorithm: SolverAlgorithm,
    pub actions: Vec<ActionType>,
    pub final_state: FinalState,
    pub score: f32,
    pub elapsed_ms: u64,
}

impl SolveReport {
    pub fn new(
        config: &SolverConfig,
        input: &SimulationInput,
        solution: &SolverSolution,
        elapsed_ms: u64,
    ) -> Self {
        let state = solution.state();
        let mut sim = Simulator::new(input).with_max_step_count(config.max_step_count);
        sim.set_state(*state);
        let completion = sim.completion_state();
        Self {
            algorithm: config.algorithm,
            actions: solution.actions().to_vec(),
            final_state: FinalState {
                progress: state.progress,
                max_progress: input.max_progress(),
                quality: state.quality,
                max_quality: input.max_quality(),
                durability: state.durability,
                max_durability: input.max_durability(),
                cp: state.cp,
                max_cp: input.stats.cp,
                hq_percent: state.hq_percent(input),
                completion,
            },
            score: score_state(
                input,
                state,
                completion,
                &config.weights,
                config.max_step_count,
            ),
            elapsed_ms,
        }
    }

    pub fn to_json(&self) -> Result<String, SolverError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_text_report(&self) -> String {
        let state = &self.final_state;
        let mut lines = vec![
            format!("algorithm: {:?}", self.algorithm),
            format!("completion: {:?}", state.completion),
            format!(
                "final: progress={}/{} quality={}/{} ({}% HQ) durability={}/{} cp={}/{}",
                state.progress,
                state.max_progress,
                state.quality,
                state.max_quality,
                state.hq_percent,
                state.durability,
                state.max_durability,
                state.cp,
                state.max_cp
            ),
            format!(
                "summary: actions={} score={:.4} wall_ms={}",
                self.actions.len(),
                self.score,
                self.elapsed_ms
            ),
            String::new(),
            "rotation:".to_string(),
        ];
        if self.actions.is_empty() {
            lines.push("  (none)".to_string());
        }
        for (idx, action) in self.actions.iter().enumerate() {
            lines.push(format!("  {:>3}. {}", idx + 1, action.name()));
        }
        lines.join("\n")
    }

    /// In-game macro lines, one per action.
    pub fn to_macro(&self) -> String {
        self.actions
            .iter()
            .map(|action| {
                format!(
                    "/ac \"{}\" <wait.{}>",
                    action.name(),
                    action.base().macro_wait_time
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

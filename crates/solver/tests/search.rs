use craftplan_core::{
    ActionResponse, ActionType, CharacterStats, CompletionState, Condition, ConditionMask,
    RecipeInfo, SimulationInput, SimulationState, Simulator,
};
use craftplan_solver::{
    score_state, search, search_input, ActionPool, CancelToken, Engine, SolveReport,
    SolverAlgorithm, SolverConfig, SolverError, SolverSolution,
};

/// A short craft that a few thousand iterations always finish.
fn easy_input() -> SimulationInput {
    SimulationInput::new(
        CharacterStats {
            craftsmanship: 3304,
            control: 3374,
            cp: 575,
            level: 90,
            clvl: 1,
            is_specialist: false,
            has_splendorous_buff: false,
            can_use_manipulation: true,
        },
        RecipeInfo {
            is_expert: false,
            class_job_level: 80,
            rlvl: 1,
            conditions: ConditionMask::NORMAL,
            max_durability: 80,
            max_quality: 1000,
            max_progress: 500,
            quality_modifier: 80,
            quality_divider: 115,
            progress_modifier: 90,
            progress_divider: 130,
        },
    )
    .unwrap()
}

/// No rotation reaches this much progress before the item breaks.
fn unreachable_input() -> SimulationInput {
    let mut recipe = easy_input().recipe;
    recipe.max_progress = 1_000_000;
    SimulationInput::new(easy_input().stats, recipe).unwrap()
}

/// Level 100 specialist on an expert recipe with every condition in play.
fn expert_input() -> SimulationInput {
    SimulationInput::new(
        CharacterStats {
            craftsmanship: 3304,
            control: 3374,
            cp: 600,
            level: 100,
            clvl: 1,
            is_specialist: true,
            has_splendorous_buff: false,
            can_use_manipulation: true,
        },
        RecipeInfo {
            is_expert: true,
            class_job_level: 100,
            rlvl: 1,
            conditions: ConditionMask::from_conditions(&Condition::ALL),
            max_durability: 80,
            max_quality: 1000,
            max_progress: 2000,
            quality_modifier: 80,
            quality_divider: 115,
            progress_modifier: 90,
            progress_divider: 130,
        },
    )
    .unwrap()
}

/// Any finished rollout clears the threshold, so every strategy returns a
/// complete rotation.
fn config(algorithm: SolverAlgorithm) -> SolverConfig {
    SolverConfig {
        algorithm,
        iterations: 2_000,
        score_storage_threshold: 0.05,
        fork_count: 4,
        furcated_action_count: 2,
        max_thread_count: Some(2),
        ..SolverConfig::default()
    }
}

fn solve(config: &SolverConfig, input: &SimulationInput) -> (SolverSolution, Vec<ActionType>) {
    let mut seen = Vec::new();
    let cancel = CancelToken::new();
    let solution = search_input(config, input, |action| seen.push(action), &cancel).unwrap();
    (solution, seen)
}

fn replay(
    config: &SolverConfig,
    input: &SimulationInput,
    actions: &[ActionType],
) -> (ActionResponse, SimulationState) {
    let mut sim = Simulator::new(input).with_max_step_count(config.max_step_count);
    let (response, state, _) = sim.execute_multiple(&SimulationState::new(input), actions);
    (response, state)
}

const ALGORITHMS: [SolverAlgorithm; 5] = [
    SolverAlgorithm::Oneshot,
    SolverAlgorithm::OneshotForked,
    SolverAlgorithm::Stepwise,
    SolverAlgorithm::StepwiseForked,
    SolverAlgorithm::StepwiseFurcated,
];

#[test]
fn every_algorithm_finishes_an_easy_craft() {
    let input = easy_input();
    for algorithm in ALGORITHMS {
        let config = config(algorithm);
        let (solution, _) = solve(&config, &input);
        assert!(!solution.actions().is_empty(), "{algorithm:?}");
        let (response, state) = replay(&config, &input, solution.actions());
        assert_eq!(response, ActionResponse::ProgressComplete, "{algorithm:?}");
        assert_eq!(&state, solution.state(), "{algorithm:?}");
    }
}

#[test]
fn callback_sees_the_rotation_once_in_order() {
    let input = easy_input();
    for algorithm in ALGORITHMS {
        let config = config(algorithm);
        let (solution, seen) = solve(&config, &input);
        assert_eq!(seen, solution.actions(), "{algorithm:?}");
    }
}

#[test]
fn stepwise_strategies_commit_round_by_round() {
    let input = easy_input();
    for algorithm in [
        SolverAlgorithm::Stepwise,
        SolverAlgorithm::StepwiseForked,
        SolverAlgorithm::StepwiseFurcated,
    ] {
        // unreachable threshold: every action comes from its own round
        let config = SolverConfig {
            score_storage_threshold: 1.0,
            ..config(algorithm)
        };
        let (solution, seen) = solve(&config, &input);
        assert_eq!(seen, solution.actions(), "{algorithm:?}");
        let (response, state) = replay(&config, &input, solution.actions());
        assert_eq!(response, ActionResponse::ProgressComplete, "{algorithm:?}");
        assert_eq!(&state, solution.state(), "{algorithm:?}");
    }
}

#[test]
fn solutions_never_contain_combos() {
    let input = easy_input();
    let config = config(SolverAlgorithm::Oneshot);
    let (solution, _) = solve(&config, &input);
    assert!(solution.actions().iter().all(|action| !action.is_combo()));
}

#[test]
fn same_seed_same_rotation() {
    let input = easy_input();
    let config = config(SolverAlgorithm::Oneshot);
    let (first, _) = solve(&config, &input);
    let (second, _) = solve(&config, &input);
    assert_eq!(first, second);
}

#[test]
fn single_fork_matches_oneshot() {
    let input = easy_input();
    let oneshot = config(SolverAlgorithm::Oneshot);
    let forked = SolverConfig {
        fork_count: 1,
        ..config(SolverAlgorithm::OneshotForked)
    };
    assert_eq!(solve(&oneshot, &input).0, solve(&forked, &input).0);
}

#[test]
fn cancelled_search_returns_the_start() {
    let input = easy_input();
    let cancel = CancelToken::new();
    cancel.cancel();
    for algorithm in ALGORITHMS {
        let config = config(algorithm);
        let mut seen = Vec::new();
        let solution =
            search_input(&config, &input, |action| seen.push(action), &cancel).unwrap();
        assert!(solution.actions().is_empty(), "{algorithm:?}");
        assert_eq!(solution.state(), &SimulationState::new(&input));
        assert!(seen.is_empty());
    }
}

#[test]
fn search_continues_from_a_mid_craft_state() {
    let input = easy_input();
    let config = config(SolverAlgorithm::Oneshot);
    let mut sim = Simulator::new(&input);
    let (_, start) = sim.execute(&SimulationState::new(&input), ActionType::BasicSynthesis);
    let solution = search(&config, &input, start, |_| {}, &CancelToken::new()).unwrap();

    let mut actions = vec![ActionType::BasicSynthesis];
    actions.extend_from_slice(solution.actions());
    let (response, state) = replay(&config, &input, &actions);
    assert_eq!(response, ActionResponse::ProgressComplete);
    assert_eq!(&state, solution.state());
}

#[test]
fn invalid_configs_are_rejected_before_searching() {
    let input = easy_input();
    let cases = [
        (
            SolverConfig {
                iterations: 0,
                ..SolverConfig::default()
            },
            SolverError::ZeroIterations,
        ),
        (
            SolverConfig {
                max_step_count: 0,
                ..SolverConfig::default()
            },
            SolverError::ZeroMaxStepCount,
        ),
        (
            SolverConfig {
                algorithm: SolverAlgorithm::OneshotForked,
                fork_count: 0,
                ..SolverConfig::default()
            },
            SolverError::ZeroForkCount,
        ),
        (
            SolverConfig {
                furcated_action_count: 0,
                ..SolverConfig::default()
            },
            SolverError::ZeroFurcatedActionCount,
        ),
        (
            SolverConfig {
                fork_count: 4,
                furcated_action_count: 5,
                ..SolverConfig::default()
            },
            SolverError::FurcationExceedsForks {
                furcated: 5,
                forks: 4,
            },
        ),
        (
            SolverConfig {
                action_pool: ActionPool::new(&[]),
                ..SolverConfig::default()
            },
            SolverError::EmptyActionPool,
        ),
        (
            SolverConfig {
                exploration_constant: f32::NAN,
                ..SolverConfig::default()
            },
            SolverError::InvalidConstant("exploration_constant"),
        ),
        (
            SolverConfig {
                exploration_constant: -1.0,
                ..SolverConfig::default()
            },
            SolverError::InvalidConstant("exploration_constant"),
        ),
    ];
    for (config, expected) in cases {
        assert_eq!(config.validate(), Err(expected));
        let mut calls = 0;
        let result = search_input(&config, &input, |_| calls += 1, &CancelToken::new());
        assert_eq!(result.map(|_| ()), config.validate());
        assert_eq!(calls, 0);
    }

    let mut config = SolverConfig::default();
    config.weights.quality = -1.0;
    assert_eq!(config.validate(), Err(SolverError::InvalidWeight("quality")));
}

#[test]
fn unfinishable_craft_stops_at_the_iteration_cap() {
    let input = unreachable_input();
    let config = SolverConfig {
        iterations: 10,
        max_iterations: 200,
        ..config(SolverAlgorithm::Oneshot)
    };
    let mut engine = Engine::new(&config, &input, SimulationState::new(&input), config.seed);
    engine.search(config.iterations, &CancelToken::new());
    assert_eq!(engine.iterations(), 200);
    assert_eq!(engine.max_score(), 0.0);

    for algorithm in ALGORITHMS {
        let config = SolverConfig {
            algorithm,
            ..config.clone()
        };
        let (solution, seen) = solve(&config, &input);
        assert_eq!(seen, solution.actions(), "{algorithm:?}");
        assert!(solution.state().progress < input.max_progress(), "{algorithm:?}");
    }
}

#[test]
fn expert_preset_finishes_a_stochastic_craft() {
    let input = expert_input();
    for algorithm in [SolverAlgorithm::Oneshot, SolverAlgorithm::StepwiseFurcated] {
        let config = SolverConfig {
            algorithm,
            iterations: 3_000,
            max_iterations: 20_000,
            score_storage_threshold: 0.05,
            fork_count: 4,
            furcated_action_count: 2,
            max_thread_count: Some(2),
            ..SolverConfig::expert_default()
        };
        let (solution, seen) = solve(&config, &input);
        assert_eq!(seen, solution.actions(), "{algorithm:?}");
        assert!(!solution.actions().is_empty(), "{algorithm:?}");
        assert!(
            solution.state().progress >= input.max_progress(),
            "{algorithm:?} stopped at {:?}",
            solution.state()
        );
        for action in solution.actions() {
            assert!(config.action_pool.contains(*action), "{action:?}");
        }
    }
}

#[test]
fn stochastic_best_leaf_scores_what_its_rollout_scored() {
    let input = expert_input();
    let config = SolverConfig {
        iterations: 3_000,
        max_iterations: 20_000,
        score_storage_threshold: 0.05,
        ..SolverConfig::expert_default()
    };
    let mut engine = Engine::new(&config, &input, SimulationState::new(&input), config.seed);
    engine.search(config.iterations, &CancelToken::new());
    assert!(engine.max_score() > 0.0);

    let solution = engine.solution();
    let score = score_state(
        &input,
        solution.state(),
        CompletionState::ProgressComplete,
        &config.weights,
        config.max_step_count,
    );
    assert_eq!(score, engine.max_score());
}

#[test]
fn stochastic_stepwise_commits_until_the_craft_ends() {
    let input = expert_input();
    let config = SolverConfig {
        algorithm: SolverAlgorithm::StepwiseForked,
        iterations: 800,
        max_iterations: 2_000,
        score_storage_threshold: 1.0,
        fork_count: 2,
        max_thread_count: Some(2),
        ..SolverConfig::expert_default()
    };
    let (solution, seen) = solve(&config, &input);
    assert_eq!(seen, solution.actions());
    let mut sim = Simulator::new(&input).with_max_step_count(config.max_step_count);
    sim.set_state(*solution.state());
    assert!(sim.is_complete(), "{:?}", solution.state());
    assert_eq!(solution.state().action_count as usize, solution.actions().len());
}

#[test]
fn unforked_algorithms_ignore_fork_counts() {
    let config = SolverConfig {
        algorithm: SolverAlgorithm::Stepwise,
        fork_count: 0,
        furcated_action_count: 0,
        ..SolverConfig::default()
    };
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn presets_validate() {
    for config in [
        SolverConfig::simulator_default(),
        SolverConfig::synth_helper_default(),
        SolverConfig::expert_default(),
    ] {
        assert_eq!(config.validate(), Ok(()));
    }
    assert!(SolverConfig::expert_default()
        .action_pool
        .contains(ActionType::RapidSynthesis));
}

#[test]
fn config_reads_partial_json() {
    let config: SolverConfig =
        serde_json::from_str(r#"{"algorithm":"Stepwise","iterations":500}"#).unwrap();
    assert_eq!(config.algorithm, SolverAlgorithm::Stepwise);
    assert_eq!(config.iterations, 500);
    assert_eq!(config.seed, SolverConfig::default().seed);
    assert_eq!(config.action_pool, ActionPool::default());
}

#[test]
fn report_describes_the_solution() {
    let input = easy_input();
    let config = config(SolverAlgorithm::Oneshot);
    let (solution, _) = solve(&config, &input);
    let report = SolveReport::new(&config, &input, &solution, 12);

    assert_eq!(report.final_state.completion, CompletionState::ProgressComplete);
    assert!(report.final_state.progress >= input.max_progress());
    assert!(report.score > 0.0);

    let json = report.to_json().unwrap();
    let parsed: SolveReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.actions, report.actions);

    let text = report.to_text_report();
    assert!(text.contains("completion: ProgressComplete"));
    assert!(text.contains(solution.actions()[0].name()));

    let macro_text = report.to_macro();
    let lines: Vec<&str> = macro_text.lines().collect();
    assert_eq!(lines.len(), solution.actions().len());
    assert!(lines[0].starts_with("/ac \""));
}

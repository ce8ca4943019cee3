//! End-to-end tests for the trial runner and its observers

mod common;

use std::sync::{Arc, Mutex};

use common::{FixedPlanner, ScriptedEnvironment};
use smartcab::{
    Error, Result,
    adapters::{GridWorld, RoutePlanner},
    app::{AgentConfig, WorldConfig},
    pipeline::{
        JsonlObserver, SharedMetricsObserver, TrainingConfig, TrainingPipeline, TrainingResult,
    },
    ports::TrialObserver,
    q_learning::{CounterMode, LearningAgent, StepRecord, TrialOutcome, TrialPhase, TrialSummary},
    types::{Action, Location},
};
use tempfile::tempdir;

fn pipeline(num_trials: usize, seed: u64) -> TrainingPipeline {
    TrainingPipeline::new(TrainingConfig {
        num_trials,
        seed: Some(seed),
    })
}

fn scripted_agent(mode: CounterMode) -> LearningAgent<FixedPlanner> {
    LearningAgent::new(
        FixedPlanner::new(Some(Action::Forward)),
        &AgentConfig::default().with_counter_mode(mode),
    )
    .unwrap()
}

/// Records every callback in order
#[derive(Clone, Default)]
struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl TrialObserver for EventLog {
    fn on_training_start(&mut self, total_trials: usize) -> Result<()> {
        self.push(format!("start {total_trials}"));
        Ok(())
    }

    fn on_trial_start(&mut self, trial: usize, _deadline: i32) -> Result<()> {
        self.push(format!("trial {trial}"));
        Ok(())
    }

    fn on_step(&mut self, trial: usize, _record: &StepRecord) -> Result<()> {
        self.push(format!("step {trial}"));
        Ok(())
    }

    fn on_trial_end(&mut self, summary: &TrialSummary) -> Result<()> {
        self.push(format!("end {}", summary.trial));
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.push("done".to_string());
        Ok(())
    }
}

#[test]
fn test_cumulative_histories_hold_running_totals() {
    let mut agent = scripted_agent(CounterMode::Cumulative);
    let mut env = ScriptedEnvironment::new(-1.0);
    env.trial_length = 3;

    let result = pipeline(4, 7).run(&mut agent, &mut env).unwrap();

    assert_eq!(result.penalties, vec![3, 6, 9, 12]);
    assert_eq!(result.deadlines, vec![0, 0, 0, 0]);
    assert_eq!(result.counter_mode, CounterMode::Cumulative);
    assert_eq!(agent.penalty(), 12);
}

#[test]
fn test_per_trial_histories_reset_each_trip() {
    let mut agent = scripted_agent(CounterMode::PerTrial);
    let mut env = ScriptedEnvironment::new(-1.0);
    env.trial_length = 3;
    env.deadline = 0;

    let result = pipeline(4, 7).run(&mut agent, &mut env).unwrap();

    assert_eq!(result.penalties, vec![3, 3, 3, 3]);
    assert_eq!(result.deadlines, vec![3, 3, 3, 3]);
    assert_eq!(agent.penalty(), 0);
    assert_eq!(agent.time_over(), 0);
}

#[test]
fn test_history_lengths_track_boundaries() {
    for trials in [1, 2, 9] {
        let mut agent = scripted_agent(CounterMode::Cumulative);
        let mut env = ScriptedEnvironment::new(0.0);

        let result = pipeline(trials, 1).run(&mut agent, &mut env).unwrap();

        assert_eq!(result.total_trials, trials);
        assert_eq!(result.penalties.len(), trials);
        assert_eq!(result.deadlines.len(), trials);
        assert_eq!(result.outcomes.len(), trials);
        assert_eq!(env.resets(), trials);
    }
}

#[test]
fn test_planner_receives_each_destination() {
    let mut agent = scripted_agent(CounterMode::Cumulative);
    let mut env = ScriptedEnvironment::new(0.0);

    pipeline(3, 2).run(&mut agent, &mut env).unwrap();

    assert_eq!(
        agent.planner().destinations,
        vec![Location::new(1, 1), Location::new(2, 1), Location::new(3, 1)]
    );
    assert_eq!(agent.phase(), TrialPhase::Finished);
}

#[test]
fn test_outcomes_reported_by_world() {
    let mut agent = scripted_agent(CounterMode::Cumulative);
    let mut env = ScriptedEnvironment::new(0.0);
    env.outcome = TrialOutcome::TimedOut;

    let result = pipeline(3, 2).run(&mut agent, &mut env).unwrap();

    assert_eq!(result.successes, 0);
    assert_eq!(result.timeouts, 3);
    assert_eq!(result.success_rate, 0.0);
}

#[test]
fn test_same_seed_same_q_values() {
    let run = |seed| {
        let mut world = GridWorld::new(WorldConfig::default().with_seed(seed)).unwrap();
        let mut agent = LearningAgent::new(RoutePlanner::new(), &AgentConfig::default()).unwrap();
        let result = pipeline(10, seed).run(&mut agent, &mut world).unwrap();
        let mut entries: Vec<_> = agent
            .q_table()
            .entries()
            .map(|((state, action), value)| (state.to_string(), *action, value.to_bits()))
            .collect();
        entries.sort_by_key(|(state, action, _)| (state.clone(), action.index()));
        (result, entries)
    };

    let (first, first_entries) = run(11);
    let (second, second_entries) = run(11);
    assert_eq!(first, second);
    assert_eq!(first_entries, second_entries);
}

#[test]
fn test_observer_callback_order() {
    let log = EventLog::default();
    let mut agent = scripted_agent(CounterMode::Cumulative);
    let mut env = ScriptedEnvironment::new(0.0);
    env.trial_length = 2;

    pipeline(2, 4)
        .with_observer(Box::new(log.clone()))
        .run(&mut agent, &mut env)
        .unwrap();

    assert_eq!(
        log.events(),
        vec![
            "start 2", "trial 0", "step 0", "step 0", "end 0", "trial 1", "step 1", "step 1",
            "end 1", "done",
        ]
    );
}

#[test]
fn test_metrics_observer_sees_every_step() {
    let metrics = SharedMetricsObserver::new(2);
    let mut agent = scripted_agent(CounterMode::Cumulative);
    let mut env = ScriptedEnvironment::new(0.0).with_rewards(&[-1.0, 2.0, 2.0, -0.5]);
    env.trial_length = 2;

    pipeline(2, 4)
        .with_observer(Box::new(metrics.clone()))
        .run(&mut agent, &mut env)
        .unwrap();

    let summary = metrics.summary();
    assert_eq!(summary.total_trials, 2);
    assert_eq!(summary.successes, 2);
    assert!((summary.avg_steps - 2.0).abs() < 1e-12);
    assert!((summary.avg_net_reward - 1.25).abs() < 1e-12);
    assert!((summary.penalty_rate - 0.5).abs() < 1e-12);
}

#[test]
fn test_jsonl_observer_writes_one_line_per_trial() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("observations.jsonl");
    let mut agent = scripted_agent(CounterMode::Cumulative);
    let mut env = ScriptedEnvironment::new(-1.0);
    env.trial_length = 3;

    pipeline(2, 5)
        .with_observer(Box::new(JsonlObserver::new(&path).unwrap()))
        .run(&mut agent, &mut env)
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["trial"], 0);
    assert_eq!(first["outcome"], "completed");
    assert_eq!(first["deadline"], 10);
    assert_eq!(first["steps"].as_array().unwrap().len(), 3);
    assert_eq!(first["steps"][0]["reward"], -1.0);
    assert_eq!(first["steps"][0]["state"]["form"], "decision");
}

#[test]
fn test_result_json_and_csv_exports() {
    let dir = tempdir().unwrap();
    let mut agent = scripted_agent(CounterMode::PerTrial);
    let mut env = ScriptedEnvironment::new(-1.0);
    env.trial_length = 2;

    let result = pipeline(3, 6).run(&mut agent, &mut env).unwrap();

    let json = dir.path().join("summary.json");
    result.save(&json).unwrap();
    assert_eq!(TrainingResult::load(&json).unwrap(), result);

    let csv_path = dir.path().join("history.csv");
    result.save_history_csv(&csv_path).unwrap();
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["trial", "penalties", "deadline_overruns", "outcome"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[2][0], "2");
    assert_eq!(&rows[2][1], "2");
    assert_eq!(&rows[2][3], "completed");
}

#[test]
fn test_grid_world_training_run() {
    let mut world = GridWorld::new(WorldConfig::default().with_seed(42)).unwrap();
    let mut agent = LearningAgent::new(RoutePlanner::new(), &AgentConfig::default()).unwrap();

    let result = pipeline(20, 42).run(&mut agent, &mut world).unwrap();

    assert_eq!(result.total_trials, 20);
    assert_eq!(result.successes + result.timeouts, 20);
    // Running totals never decrease
    assert!(result.penalties.windows(2).all(|w| w[0] <= w[1]));
    assert!(result.deadlines.windows(2).all(|w| w[0] <= w[1]));
    assert!(result.q_table_size > 0);
}

#[test]
fn test_invalid_agent_config_never_reaches_training() {
    let config = AgentConfig::default().with_learning_rate(f64::NAN);
    assert!(matches!(
        LearningAgent::new(FixedPlanner::new(Some(Action::Forward)), &config),
        Err(Error::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_finished_agent_rejects_new_run() {
    let mut agent = scripted_agent(CounterMode::Cumulative);
    let mut env = ScriptedEnvironment::new(0.0);
    pipeline(1, 1).run(&mut agent, &mut env).unwrap();

    assert!(matches!(
        pipeline(1, 1).run(&mut agent, &mut env),
        Err(Error::InvalidTransition {
            phase: TrialPhase::Finished,
            ..
        })
    ));
}

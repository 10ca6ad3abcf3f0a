//! End-to-end planning tests: task file in, normalized plan out.

use std::io::Write;
use std::time::Duration;

use day_planner::{
    PlanReport, PlannerConfig, Scheduler, SteppingClock, TaskSet, TaskSetGenerator,
    TaskSetGeneratorConfig,
};
use reward_kernel::{Category, ConfigurationError, GridConfig, SampleMode};

const FUN_ONLY: &str = r#"
[today]
curr_time = 22
strictness = 0.5

[sleeping]
duration_min = 5
duration_max = 9
bedtime_min = 23
bedtime_max = 2
enjoyment = 6
productivity = 2

[fun]
type = "fun"
enjoyment = 8
productivity = 3
"#;

fn write_temp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn seeded(seed: u64) -> PlannerConfig {
    PlannerConfig {
        seed: Some(seed),
        ..Default::default()
    }
}

#[test]
fn test_fun_only_day() {
    let file = write_temp(FUN_ONLY, ".toml");
    let task_set = TaskSet::load(file.path()).unwrap();

    for seed in 0..20 {
        let outcome = Scheduler::new(task_set.clone(), seeded(seed))
            .unwrap()
            .run()
            .unwrap();
        let plan = &outcome.plan;
        plan.check_tiling().unwrap();

        // sleep of 5-9 hours starting between 23:00 and 02:00
        let sleep = &outcome.sleep;
        assert!((23.0..=26.0).contains(&sleep.bedtime), "bedtime {}", sleep.bedtime);
        let slept: usize = plan
            .blocks()
            .iter()
            .filter(|b| b.category == Some(Category::Sleeping))
            .map(|b| b.len())
            .sum();
        assert!((5..=9).contains(&slept));
        assert_eq!(slept as f64, sleep.duration);

        // every other slot is fun at 0.5 * 3 + 0.5 * 8
        for block in plan.blocks() {
            if block.category == Some(Category::Sleeping) {
                continue;
            }
            assert_eq!(block.name, "fun");
            assert!(block.rwd.iter().all(|r| (*r - 5.5).abs() < 1e-12));
        }
        assert_eq!(outcome.stats.starved_slots, 0);
        assert_eq!(outcome.stats.slots, 24 - slept);
    }
}

#[test]
fn test_wake_is_followed_by_fun() {
    let task_set = TaskSet::from_toml_str(FUN_ONLY).unwrap();
    let outcome = Scheduler::new(task_set, seeded(7)).unwrap().run().unwrap();
    let plan = &outcome.plan;

    let wake = outcome.sleep.chunks.last().unwrap().end;
    assert_eq!(plan.owner(wake).unwrap().name, "fun");
}

#[test]
fn test_generated_sets_tile_the_day() {
    for config in [
        TaskSetGeneratorConfig::easy(),
        TaskSetGeneratorConfig::medium(),
        TaskSetGeneratorConfig::hard(),
    ] {
        for seed in 0..10 {
            let task_set = TaskSetGenerator::new(config.clone(), seed).generate();
            let outcome = Scheduler::new(task_set, seeded(seed))
                .unwrap()
                .with_clock(SteppingClock::new(Duration::from_millis(250)))
                .run()
                .unwrap();
            outcome.plan.check_tiling().unwrap();
            assert!(outcome.plan.total_reward() >= 0.0);
        }
    }
}

#[test]
fn test_quarter_hour_grid_tiles_the_day() {
    let task_set = TaskSetGenerator::new(TaskSetGeneratorConfig::medium(), 3).generate();
    let config = PlannerConfig {
        grid: GridConfig::new(0.25, SampleMode::Coarse),
        seed: Some(3),
        ..Default::default()
    };
    let outcome = Scheduler::new(task_set, config)
        .unwrap()
        .with_clock(SteppingClock::new(Duration::from_millis(250)))
        .run()
        .unwrap();
    assert_eq!(outcome.plan.slots_per_day(), 96);
    outcome.plan.check_tiling().unwrap();
}

#[test]
fn test_normalized_plan_is_stable() {
    let task_set = TaskSetGenerator::new(TaskSetGeneratorConfig::hard(), 8).generate();
    let outcome = Scheduler::new(task_set, seeded(8))
        .unwrap()
        .with_clock(SteppingClock::new(Duration::from_millis(250)))
        .run()
        .unwrap();
    let again = outcome.plan.clone().normalize();
    assert_eq!(again, outcome.plan);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let task_set = TaskSetGenerator::new(TaskSetGeneratorConfig::medium(), 21).generate();
    let run = |seed| {
        Scheduler::new(task_set.clone(), seeded(seed))
            .unwrap()
            .with_clock(SteppingClock::new(Duration::from_millis(250)))
            .run()
            .unwrap()
    };
    let first = run(99);
    let second = run(99);
    assert_eq!(first.plan, second.plan);
    assert_eq!(first.sleep, second.sleep);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_starvation_accepts_last_draw() {
    // a lecture is the only candidate; outside 09:00-11:00 it earns nothing
    let toml = FUN_ONLY.replace(
        "[fun]\ntype = \"fun\"",
        "[lecture]\ntype = \"fixed_time\"\nstart = 9\nduration = 2",
    );
    let task_set = TaskSet::from_toml_str(&toml).unwrap();
    let outcome = Scheduler::new(task_set, seeded(4))
        .unwrap()
        .with_clock(SteppingClock::new(Duration::from_secs(1)))
        .run()
        .unwrap();

    assert!(outcome.stats.starved_slots > 0);
    assert!(outcome.stats.rejections >= outcome.stats.starved_slots);
    outcome.plan.check_tiling().unwrap();
    // the starved slots still belong to the lecture
    let lecture_slots: usize = outcome
        .plan
        .blocks()
        .iter()
        .filter(|b| b.name == "lecture")
        .map(|b| b.len())
        .sum();
    assert_eq!(lecture_slots, outcome.stats.slots);
}

#[test]
fn test_degenerate_set_lists_every_offender() {
    let json = r#"{
        "today": {"curr_time": 30, "strictness": 0.5},
        "sleeping": {"duration_min": 5, "duration_max": 9, "bedtime_min": 23, "bedtime_max": 2,
                     "enjoyment": 6, "productivity": 2},
        "lab": {"type": "as_soon_as_possible", "approx_time": 2, "enjoyment": 0, "productivity": 0},
        "essay": {"type": "fixed_ddl", "approx_time": 0, "deadline": 10, "enjoyment": 3, "productivity": 9},
        "lunch": {"type": "meal", "time": [14, 11], "enjoyment": 7, "productivity": 2},
        "games": {"type": "fun", "enjoyment": 8, "productivity": 3}
    }"#;
    let file = write_temp(json, ".json");
    let task_set = TaskSet::load(file.path()).unwrap();

    let err: ConfigurationError = Scheduler::new(task_set, PlannerConfig::default())
        .err()
        .unwrap();
    assert_eq!(err.subjects(), vec!["today", "essay", "lab", "lunch"]);
}

#[test]
fn test_missing_field_names_the_file() {
    let broken = FUN_ONLY.replace("bedtime_max = 2\n", "");
    let file = write_temp(&broken, ".toml");
    let err = TaskSet::load(file.path()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains(&file.path().display().to_string()));
    assert!(message.contains("bedtime_max"));
}

#[test]
fn test_report_json_shape() {
    let task_set = TaskSet::from_toml_str(FUN_ONLY).unwrap();
    let config = seeded(1);
    let outcome = Scheduler::new(task_set, config.clone()).unwrap().run().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    PlanReport::new(outcome, config, None).save(&path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["seed"], 1);
    assert!(value["generated_at"].is_string());
    let plan = value["plan"].as_object().unwrap();
    assert!(plan.contains_key("sleeping"));
    assert_eq!(plan["fun"]["name"], "fun");
    let hours: usize = plan
        .values()
        .map(|block| {
            let time = block["time"].as_array().unwrap();
            (time[1].as_f64().unwrap() - time[0].as_f64().unwrap()) as usize
        })
        .sum();
    assert_eq!(hours, 24);
}

#[test]
fn test_demo_files_plan_cleanly() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
    let task_set = TaskSet::load(root.join("today.toml")).unwrap();
    let mut config = PlannerConfig::load(root.join("planner.toml")).unwrap();
    config.seed = Some(7);

    let outcome = Scheduler::new(task_set, config)
        .unwrap()
        .with_clock(SteppingClock::new(Duration::from_millis(250)))
        .run()
        .unwrap();
    assert_eq!(outcome.plan.slots_per_day(), 48);
    outcome.plan.check_tiling().unwrap();
}

//! Day Planner CLI.
//!
//! Build a day plan from a task file, generate random task sets, sample
//! reward curves for charting, or compare plans across seeds.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use day_planner::report::sample_curves;
use day_planner::{
    PlanReport, PlannerConfig, Scheduler, TaskSet, TaskSetGenerator, TaskSetGeneratorConfig,
    TrialResults,
};

#[derive(Parser)]
#[command(name = "day-planner")]
#[command(about = "Build a 24-hour activity plan from per-task reward curves")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Planner config file (TOML)
    #[arg(long, short, global = true, env = "DAY_PLANNER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a plan for one task set.
    Plan {
        /// Task set file (TOML, or JSON by extension)
        #[arg(short, long)]
        tasks: PathBuf,
        /// Random seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,
        /// Output file for the run report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate and display a random task set.
    Generate {
        /// Difficulty: easy, medium, hard
        #[arg(short, long, default_value = "easy")]
        difficulty: String,
        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Output file for the task set (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sample reward curves for an external chart renderer.
    Curve {
        /// Task set file (TOML, or JSON by extension)
        #[arg(short, long)]
        tasks: PathBuf,
        /// Only this task (or "sleeping")
        #[arg(long)]
        task: Option<String>,
        /// Sampling step in hours
        #[arg(long, default_value = "0.25")]
        step: f64,
        /// Output file for the samples (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Plan one task set under many seeds and summarize the rewards.
    Trials {
        /// Task set file (TOML, or JSON by extension)
        #[arg(short, long)]
        tasks: PathBuf,
        /// Number of seeds
        #[arg(short = 'n', long, default_value = "30")]
        count: usize,
        /// First seed
        #[arg(short, long, default_value = "0")]
        seed: u64,
        /// Output file for results (JSON)
        #[arg(short, long, default_value = "results/trials.json")]
        output: PathBuf,
    },
}

fn parse_difficulty(s: &str) -> TaskSetGeneratorConfig {
    match s.to_lowercase().as_str() {
        "easy" => TaskSetGeneratorConfig::easy(),
        "medium" => TaskSetGeneratorConfig::medium(),
        "hard" => TaskSetGeneratorConfig::hard(),
        _ => {
            eprintln!("Unknown difficulty: {}. Using 'easy'.", s);
            TaskSetGeneratorConfig::easy()
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::load(path),
        None => Ok(PlannerConfig::default()),
    }
}

fn write_output(output: &Path, json: &str) -> Result<()> {
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, json)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("\nResults written to: {}", output.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Plan {
            tasks,
            seed,
            output,
        } => {
            let task_set = TaskSet::load(&tasks)?;
            if seed.is_some() {
                config.seed = seed;
            }

            let scheduler = Scheduler::new(task_set, config.clone())?;
            info!(tasks = %tasks.display(), seed = scheduler.seed(), "Planning day");
            let outcome = scheduler.run()?;

            println!("{}", outcome.plan);
            println!(
                "\nSleep: bedtime {:.2}h for {:.2}h (reward {:.2})",
                outcome.sleep.bedtime.rem_euclid(24.0),
                outcome.sleep.duration,
                outcome.sleep.reward
            );
            println!(
                "Draws: {} ({} rejected), starved slots: {}, seed: {}",
                outcome.stats.draws,
                outcome.stats.rejections,
                outcome.stats.starved_slots,
                outcome.seed
            );

            if let Some(output) = output {
                let report = PlanReport::new(outcome, config, Some(tasks.display().to_string()));
                report.save(&output)?;
                println!("\nResults written to: {}", output.display());
            }
        }

        Commands::Generate {
            difficulty,
            seed,
            output,
        } => {
            let generator_config = parse_difficulty(&difficulty);
            let mut generator = TaskSetGenerator::new(generator_config, seed);
            let task_set = generator.generate();
            task_set.validate(&config)?;

            let json = task_set.to_json()?;
            match output {
                Some(output) => write_output(&output, &json)?,
                None => println!("{}", json),
            }
        }

        Commands::Curve {
            tasks,
            task,
            step,
            output,
        } => {
            let task_set = TaskSet::load(&tasks)?;
            task_set.validate(&config)?;
            let curves = sample_curves(&task_set, &config, step, task.as_deref())?;

            let json = serde_json::to_string_pretty(&curves)?;
            match output {
                Some(output) => write_output(&output, &json)?,
                None => println!("{}", json),
            }
        }

        Commands::Trials {
            tasks,
            count,
            seed,
            output,
        } => {
            let task_set = TaskSet::load(&tasks)?;
            info!(tasks = %tasks.display(), count, first_seed = seed, "Starting trials");

            let results = TrialResults::collect(&task_set, &config, seed, count)?;

            println!("\n=== Trial Results Summary ===");
            for result in &results.results {
                println!(
                    "seed={}: reward={:.2} blocks={} starved={}",
                    result.seed, result.total_reward, result.blocks, result.stats.starved_slots
                );
            }
            if let Some(summary) = &results.summary {
                println!(
                    "{} trials: mean reward {:.2} ± {:.2} (95% CI {:.2}..{:.2}), range {:.2}..{:.2}, {:.1}% starved",
                    summary.trials,
                    summary.mean_reward,
                    summary.reward_se,
                    summary.reward_ci.0,
                    summary.reward_ci.1,
                    summary.min_reward,
                    summary.max_reward,
                    summary.starvation_rate * 100.0
                );
            }

            results.save(&output)?;
            println!("\nResults written to: {}", output.display());
        }
    }

    Ok(())
}

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use taxi_rl::envs::taxi::{decode, N_ACTIONS, N_STATES};
use taxi_rl::{evaluate, Action, Config, Continous, QLearner, TaxiEnv, TaxiError, TransitionModel};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taxi-rl")]
#[command(about = "Tabular Q-learning for the Taxi grid world")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with a `Config`. Flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    seed: Option<u64>,

    #[arg(long, global = true)]
    episodes: Option<usize>,

    #[arg(long, global = true)]
    learning_rate: Option<Continous>,

    #[arg(long, global = true)]
    discount_factor: Option<Continous>,

    #[arg(long, global = true)]
    exploration_rate: Option<Continous>,

    #[arg(long, global = true)]
    trips: Option<usize>,

    #[arg(long, global = true)]
    max_steps_per_trip: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-table, then evaluate its greedy policy.
    Train,
    /// Decode a state index and list the outcome of every action.
    Inspect { state: usize },
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(p) => {
            let content =
                fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            serde_json::from_str::<Config>(&content)
                .with_context(|| format!("parsing {}", p.display()))?
        }
        None => Config::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(episodes) = cli.episodes {
        config.training.episodes = episodes;
    }
    if let Some(alpha) = cli.learning_rate {
        config.training.learning_rate = alpha;
    }
    if let Some(gamma) = cli.discount_factor {
        config.training.discount_factor = gamma;
    }
    if let Some(epsilon) = cli.exploration_rate {
        config.training.exploration_rate = epsilon;
    }
    if let Some(trips) = cli.trips {
        config.evaluation.trips = trips;
    }
    if let Some(max_steps) = cli.max_steps_per_trip {
        config.evaluation.max_steps_per_trip = max_steps;
    }

    config.validate()?;
    Ok(config)
}

fn train(config: Config) -> anyhow::Result<()> {
    let env = &mut TaxiEnv::seeded(config.seed);
    let mut learner = QLearner::seeded(
        config.training.clone(),
        N_STATES,
        N_ACTIONS,
        config.seed.wrapping_add(1),
    )?;

    let history = learner.train(env, config.training.episodes)?;
    let q = learner.into_q_table();
    let report = evaluate(
        env,
        &q,
        config.evaluation.trips,
        config.evaluation.max_steps_per_trip,
    )?;

    let out = json!({
        "config": config,
        "training": {
            "episodes": history.len(),
            "truncated": history.iter().filter(|h| !h.terminated).count(),
            "total_steps": history.iter().map(|h| h.steps).sum::<usize>(),
        },
        "evaluation": report,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);

    Ok(())
}

fn inspect(state: usize) -> anyhow::Result<()> {
    let snapshot = decode(state)?;
    let model = TransitionModel;
    let outcomes = Action::ALL
        .iter()
        .map(|&a| {
            Ok::<_, TaxiError>(json!({ "action": a, "outcome": model.step(state, a)? }))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let out = json!({
        "state": state,
        "decoded": snapshot,
        "action_mask": model.action_mask(state)?,
        "outcomes": outcomes,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Train => train(config),
        Commands::Inspect { state } => inspect(state),
    }
}

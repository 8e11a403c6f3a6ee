use std::path::PathBuf;

use clap::Parser;
use lane_runner::error::ConfigError;
use lane_runner::{GameApp, RunnerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lane-runner", about = "Headless endless lane runner")]
struct Args {
    /// JSON config file; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// RNG seed, overriding the config file
    #[arg(long)]
    seed: Option<u64>,
    /// Fixed steps to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,
    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<(), ConfigError> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::default(),
    };
    if args.seed.is_some() {
        config.rng_seed = args.seed;
    }

    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut app = GameApp::new(config)?;
    info!(ticks = args.ticks, "simulating");
    app.run(args.ticks);
    println!("{}", app.summary());
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

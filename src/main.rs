use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use forcectl::config::Scenario;
use forcectl::script::{Outcome, ScriptRunner};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "forcectl")]
#[command(about = "Run a force control scenario against an in-process simulation")]
struct Cli {
    /// Path to a scenario .ron file
    scenario: PathBuf,

    /// Benchmark every enabled force this many times after the scenario ran
    #[arg(long)]
    benchmark: Option<u32>,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let scenario = Scenario::load(&cli.scenario)
        .with_context(|| format!("failed to load scenario {}", cli.scenario.display()))?;

    let mut runner = ScriptRunner::from_scenario(&scenario).context("failed to set up simulation")?;
    for (step, command) in scenario.commands.iter().enumerate() {
        let outcome = runner
            .execute(command)
            .with_context(|| format!("command {step} ({command:?}) failed"))?;
        report(&outcome);
    }

    if let Some(n) = cli.benchmark {
        let enabled: Vec<_> = runner
            .context()
            .live_handles()
            .filter(|h| h.enabled)
            .collect();
        for handle in enabled {
            match runner.context_mut().benchmark(handle.id, n) {
                Ok(ms) => info!(handle = %handle.name, n, ms, "benchmark"),
                Err(err) => info!(handle = %handle.name, %err, "skipped benchmark"),
            }
        }
    }

    let diagnostics = runner.context().diagnostics();
    info!(issues = diagnostics.len(), errors = diagnostics.has_errors(), "scenario finished");
    Ok(())
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Done => {}
        Outcome::Created { label, id } => info!(%label, %id, "created"),
        Outcome::Benchmark { label, ms } => info!(%label, ms, "benchmark"),
        Outcome::Evaluated {
            timestep,
            energy,
            net_force,
        } => info!(timestep, energy, %net_force, "evaluated"),
    }
}

fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
}

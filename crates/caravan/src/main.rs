use std::path::PathBuf;

use anyhow::Context;
use caravan::scenario::RunnerConfig;
use caravan::{AppConfig, ScenarioDefinition, ScenarioRunner};
use caravan_items::WeightTable;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (RON)
    scenario: Option<PathBuf>,

    /// Breeding seed, overriding the scenario's
    #[arg(long)]
    seed: Option<u64>,

    /// Write a JSON report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Config file (default: caravan.ron in the working directory, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// List item carry weights and exit
    #[arg(long)]
    list_items: bool,

    /// Log every scenario step
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if args.list_items {
        list_items();
        return Ok(());
    }

    let Some(scenario_path) = args.scenario.as_ref() else {
        eprintln!("Error: no scenario given");
        eprintln!("Usage: caravan <scenario.ron> [--seed N] [--report PATH]");
        std::process::exit(2);
    };

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    let scenario = ScenarioDefinition::from_file(scenario_path)?;
    log::info!("Loaded scenario '{}' from {}", scenario.name, scenario_path.display());

    let report_path = args.report.clone().or_else(|| {
        config.report.always_save.then(|| {
            PathBuf::from(&config.report.output_dir).join(format!(
                "{}.json",
                scenario.name.to_lowercase().replace(' ', "_")
            ))
        })
    });

    let mut runner = ScenarioRunner::with_config(
        config,
        RunnerConfig {
            seed_override: args.seed,
            verbose: args.verbose,
        },
    );
    let report = runner
        .run(&scenario)
        .with_context(|| format!("Scenario '{}' aborted", scenario.name))?;

    for failure in &report.verification_failures {
        eprintln!("  ✗ {}", failure.message);
    }
    println!("{}", report.summary());

    if let Some(path) = report_path {
        report.save_json(&path)?;
        log::info!("Report written to {}", path.display());
    }

    if !report.success() {
        std::process::exit(1);
    }

    Ok(())
}

fn list_items() {
    let weights = WeightTable::standard();
    println!("Item carry weights (others weigh 1 each):");
    for (item, weight) in weights.iter() {
        println!("  {:<16} {:>5}", item.name(), weight);
    }
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use sigbench::{
    config::{BenchConfig, ConfigLoader},
    driver::{Driver, Mode},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "safe observer micro-benchmark runner")]
struct Cli {
    /// Path to a YAML benchmark config (defaults used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override test sizes, comma-separated
    #[arg(long, value_delimiter = ',')]
    sizes: Vec<usize>,

    /// Override time budget per measurement, in milliseconds
    #[arg(long)]
    budget_ms: Option<u64>,

    /// Override the RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Modes to run, comma-separated (default: all five)
    #[arg(long, value_delimiter = ',')]
    modes: Vec<Mode>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ConfigLoader::new(".").load(path)?,
        None => BenchConfig::default(),
    };
    if !cli.sizes.is_empty() {
        config.sizes = cli.sizes.clone();
    }
    if let Some(budget_ms) = cli.budget_ms {
        config.budget_ms = budget_ms;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    let modes: Vec<Mode> = if cli.modes.is_empty() {
        Mode::ALL.to_vec()
    } else {
        cli.modes.clone()
    };

    let mut driver = Driver::new(config.seed, config.budget());
    let budget = config.budget();

    println!(
        "sigbench: seed {}, budget {} per measurement",
        config.seed,
        format_budget(budget)
    );
    println!("{:<14} {:>10} {:>16}", "mode", "size", "ops/sec");
    for mode in &modes {
        for &size in &config.sizes {
            let metric = driver.run(*mode, size);
            println!("{:<14} {:>10} {:>16.0}", mode, size, metric);
        }
    }
    Ok(())
}

fn format_budget(budget: Duration) -> String {
    format!("{} ms", budget.as_millis())
}

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use parkgrid::{config::ConfigLoader, pipeline};

#[derive(Debug, Parser)]
#[command(author, version, about = "Seed tile statuses from donor attributions")]
struct Cli {
    /// Path to the pipeline config YAML file
    #[arg(long, default_value = "park.yaml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ConfigLoader::new(".");
    let config = loader.load(&cli.config)?;

    println!("Seeding tile statuses from donor attributions...");
    let report = pipeline::run_seed_job(&config)?;
    println!("{}", report.summary());
    println!("Saved to {}", config.seed_output.display());
    Ok(())
}

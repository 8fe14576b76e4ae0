use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use parkgrid::{config::ConfigLoader, pipeline};

#[derive(Debug, Parser)]
#[command(author, version, about = "Generate the park tile grid artifact")]
struct Cli {
    /// Path to the pipeline config YAML file
    #[arg(long, default_value = "park.yaml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ConfigLoader::new(".");
    let config = loader.load(&cli.config)?;

    println!("Generating {} grid...", config.name);
    let report = pipeline::run_grid_job(&config)?;
    for warning in &report.water_warnings {
        eprintln!("warning: {warning}");
    }
    println!("{}", report.summary());
    println!("Saved to {}", config.grid_output.display());
    Ok(())
}

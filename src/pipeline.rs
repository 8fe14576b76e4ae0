//! Job drivers shared by the two binaries and the end-to-end tests.

use std::collections::HashSet;
use std::fmt::Write as _;

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::artifact;
use crate::config::PipelineConfig;
use crate::donors;
use crate::error::PipelineError;
use crate::grid::generate_grid;
use crate::seeder::{seed_tiles, DonorTally};
use crate::water::{self, WaterMask};

#[derive(Debug)]
pub struct GridReport {
    pub region: String,
    pub raw_count: usize,
    pub written: usize,
    pub excluded_count: usize,
    pub collision_count: usize,
    pub water_warnings: Vec<String>,
}

impl GridReport {
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Generated {} tiles for {}", self.written, self.region);
        let _ = writeln!(out, "  raw cells: {}", self.raw_count);
        let _ = writeln!(out, "  water-excluded: {}", self.excluded_count);
        let _ = writeln!(out, "  id collisions: {}", self.collision_count);
        let _ = write!(
            out,
            "  malformed water features skipped: {}",
            self.water_warnings.len()
        );
        out
    }
}

/// Generate the grid and persist it. Fails on invalid configuration, an
/// unreadable water file, or a verification mismatch after the write.
pub fn run_grid_job(config: &PipelineConfig) -> Result<GridReport, PipelineError> {
    config.validate()?;

    let features = water::load_water_features(&config.water_file)?;
    let (mask, water_warnings) = WaterMask::compile(features, config.boundary_policy);

    let outcome = generate_grid(&config.bbox, config.cell_size_km, &config.tile_prefix, &mask)?;

    // Disambiguation guarantees uniqueness; re-check the final output so
    // a corrupt grid can never reach downstream stages.
    let distinct: HashSet<&str> = outcome.cells.iter().map(|c| c.id.as_str()).collect();
    if distinct.len() != outcome.cells.len() {
        return Err(PipelineError::Integrity(format!(
            "duplicate tile ids survived disambiguation ({} cells, {} distinct ids)",
            outcome.cells.len(),
            distinct.len()
        )));
    }

    let written = artifact::write_grid_artifact(&config.grid_output, &outcome.cells)?;

    Ok(GridReport {
        region: config.name.clone(),
        raw_count: outcome.raw_count,
        written,
        excluded_count: outcome.excluded_count,
        collision_count: outcome.collision_count,
        water_warnings,
    })
}

#[derive(Debug)]
pub struct SeedReport {
    pub region: String,
    pub total_tiles: usize,
    pub donor_tile_count: usize,
    pub skipped_count: usize,
    pub reserved_count: usize,
    pub seeded_total: usize,
    pub per_donor: Vec<DonorTally>,
}

impl SeedReport {
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Seeded tile statuses for {}", self.region);
        let _ = writeln!(out, "  total tiles in grid: {}", self.total_tiles);
        let _ = writeln!(out, "  donor-attributed tiles: {}", self.donor_tile_count);
        let _ = writeln!(out, "  skipped cluster tiles: {}", self.skipped_count);
        let _ = writeln!(out, "  random reserved tiles: {}", self.reserved_count);
        let _ = write!(out, "  total seeded tiles: {}", self.seeded_total);
        for tally in &self.per_donor {
            let _ = write!(
                out,
                "\n  {}: {} tiles ({})",
                tally.donor, tally.placed, tally.pattern
            );
        }
        out
    }
}

/// Seed statuses onto the generated grid and persist the overlay. The
/// grid artifact must exist; the seeding job never regenerates it.
pub fn run_seed_job(config: &PipelineConfig) -> Result<SeedReport, PipelineError> {
    config.validate()?;

    let grid_ids = artifact::read_grid_ids(&config.grid_output)?;
    let clusters = donors::load_donor_clusters(&config.donor_file)?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let outcome = seed_tiles(
        &grid_ids,
        &clusters,
        config.reserved_count,
        Utc::now(),
        &mut rng,
    );

    let seeded_total = artifact::write_seed_artifact(&config.seed_output, &outcome.records)?;

    Ok(SeedReport {
        region: config.name.clone(),
        total_tiles: grid_ids.len(),
        donor_tile_count: outcome.donor_tile_count,
        skipped_count: outcome.skipped_count,
        reserved_count: outcome.reserved_count,
        seeded_total,
        per_donor: outcome.per_donor,
    })
}

//! Demo status overlay for generated tiles.
//!
//! Donor clusters mark their tiles sold; a random sample of the rest is
//! marked reserved. Randomness comes in through the caller's RNG so a
//! fixed seed reproduces the exact same overlay.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::donors::{DonorCluster, Visibility};
use crate::grid::TileStatus;

/// Synthetic reservations are backdated up to this far.
const RESERVATION_WINDOW_SECS: i64 = 30 * 24 * 60 * 60;

/// Status overlay for one tile. Field names follow the artifact contract
/// of the map consumer (`reservedAt`, `soldAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedRecord {
    pub status: TileStatus,
    #[serde(rename = "reservedAt", default, skip_serializing_if = "Option::is_none")]
    pub reserved_at: Option<DateTime<Utc>>,
    #[serde(rename = "soldAt", default, skip_serializing_if = "Option::is_none")]
    pub sold_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

impl SeedRecord {
    fn sold(cluster: &DonorCluster) -> Self {
        Self {
            status: TileStatus::Sold,
            reserved_at: None,
            sold_at: Some(cluster.donated_at),
            donor: Some(cluster.donor.clone()),
            pattern: Some(cluster.pattern.clone()),
            price: Some(cluster.price_per_tile),
            message: cluster.message.clone(),
            visibility: Some(cluster.visibility),
        }
    }

    fn reserved(reserved_at: DateTime<Utc>) -> Self {
        Self {
            status: TileStatus::Reserved,
            reserved_at: Some(reserved_at),
            sold_at: None,
            donor: None,
            pattern: None,
            price: None,
            message: None,
            visibility: None,
        }
    }
}

/// Per-cluster placement count, for the run report.
#[derive(Debug, Clone, PartialEq)]
pub struct DonorTally {
    pub donor: String,
    pub pattern: String,
    pub placed: usize,
}

#[derive(Debug)]
pub struct SeedOutcome {
    /// BTreeMap so the artifact serializes in stable key order.
    pub records: BTreeMap<String, SeedRecord>,
    pub donor_tile_count: usize,
    /// Cluster tile ids absent from the grid (or already claimed).
    pub skipped_count: usize,
    pub reserved_count: usize,
    pub per_donor: Vec<DonorTally>,
}

/// Build the status overlay. Output keys are always a subset of
/// `grid_ids`; cluster tiles the grid does not contain are counted as
/// skipped, never an error. Tiles untouched here stay `available` when
/// the consumer merges the overlay onto the grid.
pub fn seed_tiles(
    grid_ids: &HashSet<String>,
    clusters: &[DonorCluster],
    reserved_count: usize,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> SeedOutcome {
    let mut records: BTreeMap<String, SeedRecord> = BTreeMap::new();
    let mut donor_tile_count = 0usize;
    let mut skipped_count = 0usize;
    let mut per_donor = Vec::with_capacity(clusters.len());

    for cluster in clusters {
        let mut placed = 0usize;
        for tile_id in &cluster.tiles {
            if !grid_ids.contains(tile_id) || records.contains_key(tile_id) {
                skipped_count += 1;
                continue;
            }
            records.insert(tile_id.clone(), SeedRecord::sold(cluster));
            donor_tile_count += 1;
            placed += 1;
        }
        per_donor.push(DonorTally {
            donor: cluster.donor.clone(),
            pattern: cluster.pattern.clone(),
            placed,
        });
    }

    // Sorted candidate list: iteration over a HashSet would tie the
    // draw to hash order and break reproducibility.
    let mut candidates: Vec<&str> = grid_ids
        .iter()
        .filter(|id| !records.contains_key(*id))
        .map(String::as_str)
        .collect();
    candidates.sort_unstable();

    let draw = reserved_count.min(candidates.len());
    let (chosen, _) = candidates.partial_shuffle(rng, draw);
    for tile_id in chosen.iter() {
        let backdate_secs = rng.gen_range(0..RESERVATION_WINDOW_SECS);
        let reserved_at = now - Duration::seconds(backdate_secs);
        records.insert(tile_id.to_string(), SeedRecord::reserved(reserved_at));
    }

    SeedOutcome {
        records,
        donor_tile_count,
        skipped_count,
        reserved_count: draw,
        per_donor,
    }
}

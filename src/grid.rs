//! Square-grid construction over a bounding box.
//!
//! The lattice is stepped in degrees, but step sizes and row/column
//! indices all come from great-circle distances so cells are a uniform
//! `cell_size_km` on a side regardless of latitude. Column width is
//! fixed at the box's mean latitude; recomputing it per row would make
//! column boundaries ragged.

use std::collections::HashSet;

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::config::BoundingBox;
use crate::error::PipelineError;
use crate::geometry::{haversine_km, km_per_degree_lat, km_per_degree_lng};
use crate::water::WaterMask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileStatus {
    Available,
    Reserved,
    Sold,
}

/// Centroid of a cell, rounded to 6 decimal places in the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One square parcel of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub id: String,
    /// Closed exterior ring, 5 lng/lat positions, counter-clockwise.
    pub ring: Vec<[f64; 2]>,
    pub center: Coordinates,
    pub status: TileStatus,
}

#[derive(Debug)]
pub struct GridOutcome {
    pub cells: Vec<GridCell>,
    pub raw_count: usize,
    pub excluded_count: usize,
    /// Ids that needed a disambiguation suffix. Anything above zero
    /// points at a lattice-math bug and is surfaced by the driver.
    pub collision_count: usize,
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Tile the bounding box into `cell_size_km` squares, assign each cell a
/// stable id from its geodesic row/column offset, and drop cells whose
/// centroid the water mask covers.
///
/// Pure: all accumulator state (the used-id set, the counters) is local.
pub fn generate_grid(
    bbox: &BoundingBox,
    cell_size_km: f64,
    tile_prefix: &str,
    mask: &WaterMask,
) -> Result<GridOutcome, PipelineError> {
    bbox.validate()?;
    if !cell_size_km.is_finite() || cell_size_km <= 0.0 {
        return Err(PipelineError::Config(format!(
            "cell size must be positive, got {cell_size_km}"
        )));
    }

    let lat_step = cell_size_km / km_per_degree_lat();
    let lng_step = cell_size_km / km_per_degree_lng(bbox.mean_lat());

    let mut used_ids: HashSet<String> = HashSet::new();
    let mut cells = Vec::new();
    let mut raw_count = 0usize;
    let mut excluded_count = 0usize;
    let mut collision_count = 0usize;

    let mut lat = bbox.min_lat;
    while lat < bbox.max_lat {
        let mut lng = bbox.min_lng;
        while lng < bbox.max_lng {
            raw_count += 1;
            let center = Coordinates {
                lat: round6(lat + lat_step / 2.0),
                lng: round6(lng + lng_step / 2.0),
            };

            if mask.covers(Point::new(center.lng, center.lat)) {
                excluded_count += 1;
                lng += lng_step;
                continue;
            }

            let id = assign_id(
                tile_prefix,
                bbox,
                cell_size_km,
                center,
                &mut used_ids,
                &mut collision_count,
            );

            cells.push(GridCell {
                id,
                ring: vec![
                    [lng, lat],
                    [lng + lng_step, lat],
                    [lng + lng_step, lat + lat_step],
                    [lng, lat + lat_step],
                    [lng, lat],
                ],
                center,
                status: TileStatus::Available,
            });

            lng += lng_step;
        }
        lat += lat_step;
    }

    Ok(GridOutcome {
        cells,
        raw_count,
        excluded_count,
        collision_count,
    })
}

/// Row is the geodesic distance north of the southwest corner; column is
/// the geodesic distance east of it measured along the mean-latitude
/// parallel, both in whole cells. Collisions get an incrementing suffix
/// as a safety net.
fn assign_id(
    prefix: &str,
    bbox: &BoundingBox,
    cell_size_km: f64,
    center: Coordinates,
    used_ids: &mut HashSet<String>,
    collision_count: &mut usize,
) -> String {
    let sw = Point::new(bbox.min_lng, bbox.min_lat);
    let north_km = haversine_km(sw, Point::new(bbox.min_lng, center.lat));
    let east_km = haversine_km(
        Point::new(bbox.min_lng, bbox.mean_lat()),
        Point::new(center.lng, bbox.mean_lat()),
    );
    let row = (north_km / cell_size_km).floor() as u32;
    let col = (east_km / cell_size_km).floor() as u32;

    let base = format!("{prefix}-{row:03}-{col:03}");
    let mut id = base.clone();
    let mut suffix = 2u32;
    while used_ids.contains(&id) {
        id = format!("{base}-{suffix}");
        suffix += 1;
    }
    if id != base {
        *collision_count += 1;
    }
    used_ids.insert(id.clone());
    id
}

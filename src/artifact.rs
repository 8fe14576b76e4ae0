//! Artifact persistence with post-write verification.
//!
//! A write only counts as successful once the file has been re-read,
//! re-parsed, and its record count matches what was written. Downstream
//! stages must never see a partially written artifact.

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::Path,
};

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};

use crate::error::PipelineError;
use crate::grid::GridCell;
use crate::seeder::SeedRecord;

fn ensure_parent_dir(path: &Path) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn cell_to_feature(cell: &GridCell) -> Result<Feature, PipelineError> {
    let ring: Vec<Vec<f64>> = cell.ring.iter().map(|p| vec![p[0], p[1]]).collect();
    let geometry = Geometry::new(Value::Polygon(vec![ring]));

    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), serde_json::Value::from(cell.id.clone()));
    properties.insert("coordinates".to_string(), serde_json::to_value(cell.center)?);
    properties.insert("status".to_string(), serde_json::to_value(cell.status)?);

    Ok(Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Write the grid as a GeoJSON `FeatureCollection<Polygon>`, then read
/// it back and check the feature count. Returns the verified count.
pub fn write_grid_artifact(path: &Path, cells: &[GridCell]) -> Result<usize, PipelineError> {
    let features = cells
        .iter()
        .map(cell_to_feature)
        .collect::<Result<Vec<_>, _>>()?;
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    let json = serde_json::to_string_pretty(&GeoJson::FeatureCollection(collection))?;

    ensure_parent_dir(path)?;
    fs::write(path, &json)?;

    let written = fs::read_to_string(path)?;
    let parsed: GeoJson = written.parse().map_err(|err: geojson::Error| {
        PipelineError::Integrity(format!(
            "grid artifact {} failed to re-parse after write: {err}",
            path.display()
        ))
    })?;
    let count = match parsed {
        GeoJson::FeatureCollection(fc) => fc.features.len(),
        other => {
            return Err(PipelineError::Integrity(format!(
                "grid artifact {} re-read as {:?}, expected a FeatureCollection",
                path.display(),
                other
            )))
        }
    };
    if count != cells.len() {
        return Err(PipelineError::Integrity(format!(
            "grid artifact {} verification failed: wrote {} features, read back {count}",
            path.display(),
            cells.len()
        )));
    }
    Ok(count)
}

/// Load the tile id set back out of a grid artifact, for the seeding job.
pub fn read_grid_ids(path: &Path) -> Result<HashSet<String>, PipelineError> {
    let text = fs::read_to_string(path).map_err(|err| {
        PipelineError::InputData(format!(
            "failed to read grid artifact {}: {err} (run generate-grid first)",
            path.display()
        ))
    })?;
    let parsed: GeoJson = text.parse().map_err(|err: geojson::Error| {
        PipelineError::InputData(format!(
            "failed to parse grid artifact {}: {err}",
            path.display()
        ))
    })?;
    let collection = match parsed {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(PipelineError::InputData(format!(
                "grid artifact {} is not a FeatureCollection",
                path.display()
            )))
        }
    };

    let feature_count = collection.features.len();
    let mut ids = HashSet::with_capacity(feature_count);
    for feature in &collection.features {
        let id = feature
            .property("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                PipelineError::InputData(format!(
                    "grid artifact {} contains a feature without an id property",
                    path.display()
                ))
            })?;
        ids.insert(id.to_string());
    }
    if ids.len() != feature_count {
        return Err(PipelineError::Integrity(format!(
            "grid artifact {} contains duplicate tile ids ({} features, {} distinct ids)",
            path.display(),
            feature_count,
            ids.len()
        )));
    }
    Ok(ids)
}

/// Write the seed overlay keyed by tile id, with the same
/// write-then-verify contract as the grid artifact.
pub fn write_seed_artifact(
    path: &Path,
    records: &BTreeMap<String, SeedRecord>,
) -> Result<usize, PipelineError> {
    let json = serde_json::to_string_pretty(records)?;

    ensure_parent_dir(path)?;
    fs::write(path, &json)?;

    let written = fs::read_to_string(path)?;
    let parsed: BTreeMap<String, SeedRecord> =
        serde_json::from_str(&written).map_err(|err| {
            PipelineError::Integrity(format!(
                "seed artifact {} failed to re-parse after write: {err}",
                path.display()
            ))
        })?;
    if parsed.len() != records.len() {
        return Err(PipelineError::Integrity(format!(
            "seed artifact {} verification failed: wrote {} records, read back {}",
            path.display(),
            records.len(),
            parsed.len()
        )));
    }
    Ok(parsed.len())
}

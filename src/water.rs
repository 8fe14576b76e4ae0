//! Water feature definitions and the exclusion mask.
//!
//! Lakes are closed polygon rings; rivers are polylines with a buffer
//! radius in kilometers. A grid cell is dropped when its centroid is
//! covered by any feature.

use std::{fs, path::Path};

use geo::{Contains, Intersects, LineString, Point, Polygon};
use serde::Deserialize;

use crate::error::PipelineError;
use crate::geometry::point_polyline_distance_km;

/// What happens to a centroid sitting exactly on a water boundary.
/// `Exclude` (the default) treats boundary contact as water.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    #[default]
    Exclude,
    Include,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WaterFeature {
    Lake {
        name: String,
        /// Closed ring of lng/lat positions.
        ring: Vec<[f64; 2]>,
    },
    River {
        name: String,
        /// Polyline of lng/lat positions.
        line: Vec<[f64; 2]>,
        buffer_km: f64,
    },
}

impl WaterFeature {
    pub fn name(&self) -> &str {
        match self {
            WaterFeature::Lake { name, .. } => name,
            WaterFeature::River { name, .. } => name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaterFile {
    features: Vec<WaterFeature>,
}

/// Read the water definition file. A file that fails to parse is fatal;
/// individual malformed features are filtered later by [`WaterMask::compile`].
pub fn load_water_features(path: impl AsRef<Path>) -> Result<Vec<WaterFeature>, PipelineError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| {
        PipelineError::InputData(format!(
            "failed to read water features {}: {err}",
            path.display()
        ))
    })?;
    let file: WaterFile = serde_json::from_str(&text).map_err(|err| {
        PipelineError::InputData(format!(
            "failed to parse water features {}: {err}",
            path.display()
        ))
    })?;
    Ok(file.features)
}

/// Compiled exclusion predicate over a set of water features.
pub struct WaterMask {
    lakes: Vec<Polygon<f64>>,
    rivers: Vec<(LineString<f64>, f64)>,
    policy: BoundaryPolicy,
}

impl WaterMask {
    /// Compile features into geometry, skipping malformed ones. Returns
    /// the mask plus a warning line per skipped feature.
    pub fn compile(features: Vec<WaterFeature>, policy: BoundaryPolicy) -> (Self, Vec<String>) {
        let mut lakes = Vec::new();
        let mut rivers = Vec::new();
        let mut warnings = Vec::new();

        for feature in features {
            match feature {
                WaterFeature::Lake { name, mut ring } => {
                    if ring.len() < 3 {
                        warnings.push(format!(
                            "skipping lake '{name}': ring has {} positions, need at least 3",
                            ring.len()
                        ));
                        continue;
                    }
                    // Close an unclosed ring rather than rejecting it.
                    if ring.first() != ring.last() {
                        let first = ring[0];
                        ring.push(first);
                    }
                    let exterior =
                        LineString::from(ring.iter().map(|p| (p[0], p[1])).collect::<Vec<_>>());
                    lakes.push(Polygon::new(exterior, Vec::new()));
                }
                WaterFeature::River {
                    name,
                    line,
                    buffer_km,
                } => {
                    if line.len() < 2 {
                        warnings.push(format!(
                            "skipping river '{name}': line has {} positions, need at least 2",
                            line.len()
                        ));
                        continue;
                    }
                    if !buffer_km.is_finite() || buffer_km <= 0.0 {
                        warnings.push(format!(
                            "skipping river '{name}': buffer_km must be positive, got {buffer_km}"
                        ));
                        continue;
                    }
                    let path =
                        LineString::from(line.iter().map(|p| (p[0], p[1])).collect::<Vec<_>>());
                    rivers.push((path, buffer_km));
                }
            }
        }

        (
            Self {
                lakes,
                rivers,
                policy,
            },
            warnings,
        )
    }

    /// An empty mask that covers nothing.
    pub fn empty() -> Self {
        Self {
            lakes: Vec::new(),
            rivers: Vec::new(),
            policy: BoundaryPolicy::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lakes.is_empty() && self.rivers.is_empty()
    }

    /// True when the point falls in any lake or within any river buffer.
    /// Boundary contact counts as covered under [`BoundaryPolicy::Exclude`].
    pub fn covers(&self, point: Point<f64>) -> bool {
        for lake in &self.lakes {
            let hit = match self.policy {
                BoundaryPolicy::Exclude => lake.intersects(&point),
                BoundaryPolicy::Include => lake.contains(&point),
            };
            if hit {
                return true;
            }
        }
        for (line, buffer_km) in &self.rivers {
            if point_polyline_distance_km(point, line) <= *buffer_km {
                return true;
            }
        }
        false
    }
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::water::BoundaryPolicy;

fn default_cell_size_km() -> f64 {
    1.0
}

fn default_tile_prefix() -> String {
    "YS".to_string()
}

fn default_seed() -> u64 {
    42
}

fn default_reserved_count() -> usize {
    50
}

fn default_water_file() -> PathBuf {
    PathBuf::from("data/water-features.json")
}

fn default_donor_file() -> PathBuf {
    PathBuf::from("data/donor-attributions.json")
}

fn default_grid_output() -> PathBuf {
    PathBuf::from("public/data/yellowstone-grid.json")
}

fn default_seed_output() -> PathBuf {
    PathBuf::from("public/data/seed-tiles.json")
}

/// Region to tile, in degrees. Southwest corner must sit below and left
/// of the northeast corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        for v in [self.min_lng, self.min_lat, self.max_lng, self.max_lat] {
            if !v.is_finite() {
                return Err(PipelineError::Config(
                    "bounding box contains a non-finite coordinate".to_string(),
                ));
            }
        }
        if self.min_lng >= self.max_lng {
            return Err(PipelineError::Config(format!(
                "bounding box min_lng {} must be less than max_lng {}",
                self.min_lng, self.max_lng
            )));
        }
        if self.min_lat >= self.max_lat {
            return Err(PipelineError::Config(format!(
                "bounding box min_lat {} must be less than max_lat {}",
                self.min_lat, self.max_lat
            )));
        }
        Ok(())
    }

    pub fn mean_lat(&self) -> f64 {
        (self.min_lat + self.max_lat) / 2.0
    }
}

/// Settings for one pipeline run, loaded from YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub bbox: BoundingBox,
    #[serde(default = "default_cell_size_km")]
    pub cell_size_km: f64,
    #[serde(default = "default_tile_prefix")]
    pub tile_prefix: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_reserved_count")]
    pub reserved_count: usize,
    #[serde(default)]
    pub boundary_policy: BoundaryPolicy,
    #[serde(default = "default_water_file")]
    pub water_file: PathBuf,
    #[serde(default = "default_donor_file")]
    pub donor_file: PathBuf,
    #[serde(default = "default_grid_output")]
    pub grid_output: PathBuf,
    #[serde(default = "default_seed_output")]
    pub seed_output: PathBuf,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.name.trim().is_empty() {
            return Err(PipelineError::Config(
                "config must define a region name".to_string(),
            ));
        }
        self.bbox.validate()?;
        if !self.cell_size_km.is_finite() || self.cell_size_km <= 0.0 {
            return Err(PipelineError::Config(format!(
                "cell_size_km must be positive, got {}",
                self.cell_size_km
            )));
        }
        if self.tile_prefix.trim().is_empty() {
            return Err(PipelineError::Config(
                "tile_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<PipelineConfig, PipelineError> {
        let path = self.base_dir.join(file);
        let text = fs::read_to_string(&path).map_err(|err| {
            PipelineError::Config(format!(
                "failed to read config file {}: {err}",
                path.display()
            ))
        })?;
        let config: PipelineConfig = serde_yaml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_yaml() -> &'static str {
        "name: yellowstone\nbbox:\n  min_lng: -111.1\n  min_lat: 44.1\n  max_lng: -109.8\n  max_lat: 45.1\n"
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let config: PipelineConfig = serde_yaml::from_str(minimal_yaml()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.cell_size_km, 1.0);
        assert_eq!(config.tile_prefix, "YS");
        assert_eq!(config.seed, 42);
        assert_eq!(config.reserved_count, 50);
        assert_eq!(config.boundary_policy, BoundaryPolicy::Exclude);
    }

    #[test]
    fn inverted_bbox_is_rejected() {
        let bbox = BoundingBox::new(-109.8, 44.1, -111.1, 45.1);
        let err = bbox.validate().unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn zero_cell_size_is_rejected() {
        let mut config: PipelineConfig = serde_yaml::from_str(minimal_yaml()).unwrap();
        config.cell_size_km = 0.0;
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }
}

use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Anonymous,
}

/// A named group of tiles attributed to one sponsor.
#[derive(Debug, Clone, Deserialize)]
pub struct DonorCluster {
    pub donor: String,
    pub tiles: Vec<String>,
    pub pattern: String,
    pub donated_at: DateTime<Utc>,
    pub price_per_tile: u32,
    #[serde(default)]
    pub message: Option<String>,
    pub visibility: Visibility,
}

#[derive(Debug, Deserialize)]
struct DonorFile {
    clusters: Vec<DonorCluster>,
}

/// Read the donor attribution file. Parse failure of the whole file is
/// fatal; clusters referencing unknown tiles are handled at seed time.
pub fn load_donor_clusters(path: impl AsRef<Path>) -> Result<Vec<DonorCluster>, PipelineError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| {
        PipelineError::InputData(format!(
            "failed to read donor attributions {}: {err}",
            path.display()
        ))
    })?;
    let file: DonorFile = serde_json::from_str(&text).map_err(|err| {
        PipelineError::InputData(format!(
            "failed to parse donor attributions {}: {err}",
            path.display()
        ))
    })?;
    Ok(file.clusters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_parses_with_optional_message_absent() {
        let json = r#"{
            "clusters": [
                {
                    "donor": "Test Donor",
                    "tiles": ["YS-010-010", "YS-010-011"],
                    "pattern": "heart",
                    "donated_at": "2026-06-15T00:00:00Z",
                    "price_per_tile": 5000,
                    "visibility": "public"
                }
            ]
        }"#;
        let file: DonorFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.clusters.len(), 1);
        let cluster = &file.clusters[0];
        assert_eq!(cluster.tiles.len(), 2);
        assert_eq!(cluster.message, None);
        assert_eq!(cluster.visibility, Visibility::Public);
    }
}

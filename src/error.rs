use thiserror::Error;

/// Errors raised by the grid and seeding jobs.
///
/// Soft conditions (a donor cluster referencing a tile the grid does not
/// contain, a malformed water feature) are never errors; they are skipped
/// and counted in the job reports.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("input data error: {0}")]
    InputData(String),

    #[error("integrity error: {0}")]
    Integrity(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

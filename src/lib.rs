pub mod artifact;
pub mod config;
pub mod donors;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod pipeline;
pub mod seeder;
pub mod water;

pub use config::{BoundingBox, ConfigLoader, PipelineConfig};
pub use error::PipelineError;
pub use grid::{generate_grid, GridOutcome, TileStatus};
pub use seeder::{seed_tiles, SeedOutcome, SeedRecord};

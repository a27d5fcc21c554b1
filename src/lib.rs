pub mod config;
pub mod core;
pub mod diagrams;
pub mod domain;
pub mod render;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};
pub use core::{
    engine::RenderEngine, partition_sectors, pipeline::InfographicPipeline, PartitionOptions,
};
pub use domain::model::{Category, Direction, Sector};
pub use utils::error::{InfographicError, Result};

pub mod engine;
pub mod partition;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{Category, Direction, RenderOutput, Sector};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
pub use partition::{partition_sectors, partition_with, PartitionOptions};

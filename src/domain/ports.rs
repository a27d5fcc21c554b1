use crate::core::partition::PartitionOptions;
use crate::domain::model::{Category, RenderOutput};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Where a relative path ends up, for logs and external tools.
    fn resolve(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn partition_options(&self) -> PartitionOptions;
    fn categories(&self) -> Vec<Category>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Category>>;
    async fn transform(&self, categories: Vec<Category>) -> Result<RenderOutput>;
    async fn load(&self, output: RenderOutput) -> Result<String>;
}

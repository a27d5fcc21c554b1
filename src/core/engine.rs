use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct RenderEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> RenderEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting render process...");
        self.monitor.log_stats("start");

        // Extract
        tracing::info!("📥 Loading categories...");
        let categories = self.pipeline.extract().await?;
        tracing::info!("Loaded {} categories", categories.len());
        self.monitor.log_stats("extract");

        // Transform
        tracing::info!("🔄 Partitioning and rendering...");
        let output = self.pipeline.transform(categories).await?;
        for sector in &output.sectors {
            tracing::debug!(
                "{}: {:.2}° -> {:.2}° (span {:.2}°)",
                sector.name(),
                sector.start_angle,
                sector.end_angle,
                sector.span()
            );
        }
        tracing::info!(
            "Computed {} sectors, produced {} artifacts",
            output.sectors.len(),
            output.artifacts.len()
        );
        self.monitor.log_stats("transform");

        // Load
        tracing::info!("💾 Writing artifacts...");
        let output_path = self.pipeline.load(output).await?;
        self.monitor.log_stats("load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Artifact, Category, RenderOutput};
    use crate::utils::error::InfographicError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPipeline {
        loads: AtomicUsize,
        categories: Vec<Category>,
    }

    #[async_trait::async_trait]
    impl Pipeline for CountingPipeline {
        async fn extract(&self) -> Result<Vec<Category>> {
            Ok(self.categories.clone())
        }

        async fn transform(&self, categories: Vec<Category>) -> Result<RenderOutput> {
            let sectors = crate::core::partition::partition_with(&categories, Default::default())?;
            Ok(RenderOutput {
                sectors,
                artifacts: vec![Artifact::new("a.txt", b"a".to_vec())],
            })
        }

        async fn load(&self, output: RenderOutput) -> Result<String> {
            self.loads.fetch_add(output.artifacts.len(), Ordering::SeqCst);
            Ok("done".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_passes_through_all_phases() {
        let engine = RenderEngine::new(CountingPipeline {
            loads: AtomicUsize::new(0),
            categories: vec![Category::new("A", 1.0), Category::new("B", 3.0)],
        });

        let result = engine.run().await.unwrap();
        assert_eq!(result, "done");
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_transform_error() {
        let engine = RenderEngine::new_with_monitoring(
            CountingPipeline {
                loads: AtomicUsize::new(0),
                categories: Vec::new(),
            },
            true,
        );

        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, InfographicError::InvalidInput { .. }));
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 0);
    }
}

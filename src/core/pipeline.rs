use crate::config::toml_config::TomlConfig;
use crate::core::partition::partition_with;
use crate::core::report;
use crate::diagrams::cards::build_cards_scene;
use crate::diagrams::circular::{build_circular_scene, CircularSlice};
use crate::diagrams::flowchart::ExternalRender;
use crate::diagrams::grid::build_grid_scene;
use crate::diagrams::DiagramKind;
use crate::domain::model::{Artifact, Category, RenderOutput};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::render::{self, scene::Scene, ImageFormat};
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

const FLOWCHART_WIDTH: u32 = 800;
const FLOWCHART_HEIGHT: u32 = 1000;

pub struct InfographicPipeline<S: Storage> {
    storage: S,
    config: TomlConfig,
}

impl<S: Storage> InfographicPipeline<S> {
    pub fn new(storage: S, config: TomlConfig) -> Self {
        Self { storage, config }
    }

    fn encode_all(
        &self,
        scene: &Scene,
        stem: &str,
        formats: &[ImageFormat],
        artifacts: &mut Vec<Artifact>,
    ) -> Result<()> {
        for format in formats {
            let bytes = render::encode(scene, *format, self.config.scale())?;
            let file_name = format!("{}.{}", stem, format.extension());
            tracing::debug!("Encoded {} ({} bytes)", file_name, bytes.len());
            artifacts.push(Artifact::new(file_name, bytes));
        }
        Ok(())
    }

    fn bundle(&self, artifacts: &[Artifact]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        for artifact in artifacts {
            zip.start_file(artifact.file_name.as_str(), SimpleFileOptions::default())?;
            zip.write_all(&artifact.bytes)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    /// Hand the `.mmd` source to the configured Mermaid renderer. Failures
    /// are logged; the source file stays on disk either way.
    async fn render_flowchart_externally(&self) {
        let Some(flowchart) = &self.config.flowchart else {
            return;
        };
        let Some(tool) = &flowchart.renderer else {
            return;
        };

        let stem = self.config.flowchart_file_name();
        let render = ExternalRender {
            tool: tool.clone(),
            input: self.storage.resolve(&format!("{}.mmd", stem)),
            output: self.storage.resolve(&format!("{}.png", stem)),
            background: flowchart
                .background
                .clone()
                .unwrap_or_else(|| "white".to_string()),
            width: flowchart.width.unwrap_or(FLOWCHART_WIDTH),
            height: flowchart.height.unwrap_or(FLOWCHART_HEIGHT),
        };

        if let Err(e) = render.run().await {
            tracing::warn!("⚠️ {}", e);
            tracing::warn!("💡 Suggestion: {}", e.recovery_suggestion());
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for InfographicPipeline<S> {
    async fn extract(&self) -> Result<Vec<Category>> {
        let categories = self.config.categories();
        tracing::debug!(
            "Loaded {} categories from project '{}'",
            categories.len(),
            self.config.project.name
        );
        Ok(categories)
    }

    async fn transform(&self, categories: Vec<Category>) -> Result<RenderOutput> {
        let needs_partition = self.config.is_enabled(DiagramKind::Circular)
            || !self.config.output.reports.is_empty();

        let sectors = if needs_partition || !categories.is_empty() {
            partition_with(&categories, self.config.partition_options())?
        } else {
            Vec::new()
        };

        let formats = self.config.image_formats()?;
        let mut artifacts = Vec::new();

        if self.config.is_enabled(DiagramKind::Circular) {
            tracing::debug!("Building circular diagram");
            let slices: Vec<CircularSlice> = sectors
                .iter()
                .zip(&self.config.categories)
                .map(|(sector, category)| CircularSlice {
                    sector: sector.clone(),
                    label: category.display_label().to_string(),
                    color: category.fill_color(),
                })
                .collect();
            let scene = build_circular_scene(&slices, &self.config.circular_style());
            self.encode_all(&scene, self.config.circular_file_name(), &formats, &mut artifacts)?;
        }

        if self.config.is_enabled(DiagramKind::Cards) {
            tracing::debug!("Building cards diagram");
            let scene = build_cards_scene(&self.config.cards(), &self.config.cards_style());
            self.encode_all(&scene, self.config.cards_file_name(), &formats, &mut artifacts)?;
        }

        if self.config.is_enabled(DiagramKind::Grid) {
            tracing::debug!("Building grid diagram");
            let scene = build_grid_scene(&self.config.panels(), &self.config.grid_style());
            self.encode_all(&scene, self.config.grid_file_name(), &formats, &mut artifacts)?;
        }

        if let Some(flowchart) = &self.config.flowchart {
            if self.config.is_enabled(DiagramKind::Flowchart) {
                tracing::debug!("Writing flowchart source");
                let file_name = format!("{}.mmd", self.config.flowchart_file_name());
                artifacts.push(Artifact::new(file_name, flowchart.chart.to_mermaid().into_bytes()));
            }
        }

        let report_name = self.config.report_name();
        for format in &self.config.output.reports {
            let content = match format.as_str() {
                "json" => report::sectors_to_json(&sectors)?,
                _ => report::sectors_to_csv(&sectors)?,
            };
            artifacts.push(Artifact::new(
                format!("{}.{}", report_name, format),
                content.into_bytes(),
            ));
        }

        Ok(RenderOutput { sectors, artifacts })
    }

    async fn load(&self, output: RenderOutput) -> Result<String> {
        if let Some(bundle_name) = self.config.bundle_filename() {
            let file_name = format!("{}.zip", bundle_name);
            tracing::debug!("Creating ZIP file with {} files", output.artifacts.len());

            let zip_data = self.bundle(&output.artifacts)?;
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(&file_name, &zip_data).await?;

            return Ok(self.storage.resolve(&file_name));
        }

        for artifact in &output.artifacts {
            self.storage.write_file(&artifact.file_name, &artifact.bytes).await?;
            tracing::info!("✅ Generated {}", self.storage.resolve(&artifact.file_name));
        }

        if self.config.is_enabled(DiagramKind::Flowchart) {
            self.render_flowchart_externally().await;
        }

        Ok(self.config.output_path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::InfographicError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                InfographicError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        fn resolve(&self, path: &str) -> String {
            format!("mock://{}", path)
        }
    }

    const CONFIG: &str = r##"
[project]
name = "pipeline-test"

[[categories]]
name = "General"
color = "#4A90E2"
fields = ["A", "B", "C", "D", "E", "F"]

[[categories]]
name = "Dates"
color = "#7ED321"
weight = 5

[[categories]]
name = "Lines"
color = "#F5A623"
weight = 4

[[categories]]
name = "Transactions"
color = "#BD10E0"
weight = 2

[circular]
title = "Critical Fields"
size = 300

[cards]
title = "17 CRITICAL FIELDS"
width = 400

[flowchart]

[[flowchart.nodes]]
id = "Input"
lines = ["Document"]

[[flowchart.nodes]]
id = "Output"
lines = ["Fields"]

[[flowchart.edges]]
from = "Input"
to = "Output"

[output]
output_path = "./out"
formats = ["png", "svg"]
reports = ["json", "csv"]
"##;

    fn pipeline(content: &str) -> (InfographicPipeline<MockStorage>, MockStorage) {
        let config = TomlConfig::from_toml_str(content).unwrap();
        let storage = MockStorage::new();
        (InfographicPipeline::new(storage.clone(), config), storage)
    }

    #[tokio::test]
    async fn test_extract_uses_configured_weights() {
        let (pipeline, _) = pipeline(CONFIG);
        let categories = pipeline.extract().await.unwrap();

        let weights: Vec<f64> = categories.iter().map(|c| c.weight).collect();
        assert_eq!(weights, vec![6.0, 5.0, 4.0, 2.0]);
    }

    #[tokio::test]
    async fn test_transform_produces_every_artifact() {
        let (pipeline, _) = pipeline(CONFIG);
        let categories = pipeline.extract().await.unwrap();
        let output = pipeline.transform(categories).await.unwrap();

        assert_eq!(output.sectors.len(), 4);
        for name in [
            "circular.png",
            "circular.svg",
            "cards.png",
            "cards.svg",
            "flowchart.mmd",
            "sector_layout.json",
            "sector_layout.csv",
        ] {
            assert!(output.artifact(name).is_some(), "missing {}", name);
        }

        let png = &output.artifact("circular.png").unwrap().bytes;
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[tokio::test]
    async fn test_transform_renders_grid_when_configured() {
        let content = CONFIG.replace(
            "[output]",
            "[grid]\ntitle = \"The 17 Critical Fields\"\nwidth = 800\n\n[output]",
        );
        let (pipeline, _) = pipeline(&content);
        let output = pipeline.transform(pipeline.extract().await.unwrap()).await.unwrap();

        let svg = String::from_utf8(output.artifact("grid.svg").unwrap().bytes.clone()).unwrap();
        assert!(svg.contains("The 17 Critical Fields"));
        assert!(svg.contains("(6 fields)"));
        assert!(output.artifact("grid.png").is_some());
    }

    #[tokio::test]
    async fn test_transform_rejects_zero_weight() {
        let (pipeline, _) = pipeline(CONFIG);
        let mut categories = pipeline.extract().await.unwrap();
        categories[1].weight = 0.0;

        let err = pipeline.transform(categories).await.unwrap_err();
        assert!(matches!(err, InfographicError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_load_writes_each_artifact() {
        let (pipeline, storage) = pipeline(CONFIG);
        let output = pipeline.transform(pipeline.extract().await.unwrap()).await.unwrap();

        let location = pipeline.load(output).await.unwrap();

        assert_eq!(location, "./out");
        let mermaid = storage.get_file("flowchart.mmd").await.unwrap();
        assert!(String::from_utf8(mermaid).unwrap().starts_with("flowchart TD"));
        assert!(storage.get_file("cards.svg").await.is_some());
    }

    #[tokio::test]
    async fn test_load_bundles_into_zip() {
        let content = format!(
            "{}\n[output.bundle]\nenabled = true\nfilename = \"infographics\"\n",
            CONFIG
        );
        let (pipeline, storage) = pipeline(&content);
        let output = pipeline.transform(pipeline.extract().await.unwrap()).await.unwrap();

        let location = pipeline.load(output).await.unwrap();
        assert_eq!(location, "mock://infographics.zip");
        assert!(storage.get_file("circular.png").await.is_none());

        let zip_data = storage.get_file("infographics.zip").await.unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert_eq!(archive.len(), 7);
        assert!(names.contains(&"flowchart.mmd"));
        assert!(names.contains(&"sector_layout.csv"));
    }
}

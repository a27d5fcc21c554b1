//! Mermaid flowchart source generation.
//!
//! Rasterizing the flowchart is left to the Mermaid CLI; this module only
//! writes its input and knows how to invoke it.

use crate::utils::error::{InfographicError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DIRECTIONS: [&str; 5] = ["TD", "TB", "BT", "LR", "RL"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    pub lines: Vec<String>,
    pub class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowClass {
    pub name: String,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<u32>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Flowchart {
    #[serde(default = "default_direction")]
    pub direction: String,
    #[serde(default)]
    pub nodes: Vec<FlowNode>,
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
    #[serde(default)]
    pub classes: Vec<FlowClass>,
}

fn default_direction() -> String {
    "TD".to_string()
}

fn is_identifier(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn needs_quotes(text: &str) -> bool {
    text.chars().any(|c| "[](){}|\"".contains(c))
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "#quot;"))
}

fn node_text(lines: &[String]) -> String {
    let joined = lines.join("<br/>");
    if needs_quotes(&joined) {
        format!("[{}]", quoted(&joined))
    } else {
        format!("[{}]", joined)
    }
}

fn edge_label(label: &str) -> String {
    if needs_quotes(label) {
        format!("|{}|", quoted(label))
    } else {
        format!("|{}|", label)
    }
}

impl Flowchart {
    pub fn validate(&self) -> Result<()> {
        if !DIRECTIONS.contains(&self.direction.as_str()) {
            return Err(InfographicError::InvalidConfigValueError {
                field: "flowchart.direction".to_string(),
                value: self.direction.clone(),
                reason: format!("Valid directions: {}", DIRECTIONS.join(", ")),
            });
        }

        let mut ids = HashSet::new();
        for node in &self.nodes {
            if !is_identifier(&node.id) {
                return Err(InfographicError::InvalidConfigValueError {
                    field: "flowchart.nodes.id".to_string(),
                    value: node.id.clone(),
                    reason: "Node ids may only contain letters, digits and '_'".to_string(),
                });
            }
            if !ids.insert(node.id.as_str()) {
                return Err(InfographicError::ConfigValidationError {
                    field: "flowchart.nodes".to_string(),
                    message: format!("duplicate node id '{}'", node.id),
                });
            }
        }

        for edge in &self.edges {
            for end in [&edge.from, &edge.to] {
                if !ids.contains(end.as_str()) {
                    return Err(InfographicError::ConfigValidationError {
                        field: "flowchart.edges".to_string(),
                        message: format!(
                            "edge {} -> {} references unknown node '{}'",
                            edge.from, edge.to, end
                        ),
                    });
                }
            }
        }

        let class_names: HashSet<&str> = self.classes.iter().map(|c| c.name.as_str()).collect();
        for node in &self.nodes {
            if let Some(class) = &node.class {
                if !class_names.contains(class.as_str()) {
                    return Err(InfographicError::ConfigValidationError {
                        field: "flowchart.nodes.class".to_string(),
                        message: format!("node '{}' uses undeclared class '{}'", node.id, class),
                    });
                }
            }
        }

        Ok(())
    }

    /// Mermaid source: nodes, then edges, then class definitions and
    /// assignments.
    pub fn to_mermaid(&self) -> String {
        let mut out = vec![format!("flowchart {}", self.direction)];

        for node in &self.nodes {
            out.push(format!("    {}{}", node.id, node_text(&node.lines)));
        }

        if !self.edges.is_empty() {
            out.push(String::new());
        }
        for edge in &self.edges {
            match &edge.label {
                Some(label) => out.push(format!(
                    "    {} -->{} {}",
                    edge.from,
                    edge_label(label),
                    edge.to
                )),
                None => out.push(format!("    {} --> {}", edge.from, edge.to)),
            }
        }

        if !self.classes.is_empty() {
            out.push(String::new());
        }
        for class in &self.classes {
            let mut style = Vec::new();
            if let Some(fill) = &class.fill {
                style.push(format!("fill:{}", fill));
            }
            if let Some(stroke) = &class.stroke {
                style.push(format!("stroke:{}", stroke));
            }
            if let Some(width) = class.stroke_width {
                style.push(format!("stroke-width:{}px", width));
            }
            if let Some(color) = &class.color {
                style.push(format!("color:{}", color));
            }
            out.push(format!("    classDef {} {}", class.name, style.join(",")));
        }

        for class in &self.classes {
            let members: Vec<&str> = self
                .nodes
                .iter()
                .filter(|n| n.class.as_deref() == Some(class.name.as_str()))
                .map(|n| n.id.as_str())
                .collect();
            if !members.is_empty() {
                out.push(format!("    class {} {}", members.join(","), class.name));
            }
        }

        out.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalRender {
    pub tool: String,
    pub input: String,
    pub output: String,
    pub background: String,
    pub width: u32,
    pub height: u32,
}

impl ExternalRender {
    pub fn args(&self) -> Vec<String> {
        vec![
            "-i".to_string(),
            self.input.clone(),
            "-o".to_string(),
            self.output.clone(),
            "-b".to_string(),
            self.background.clone(),
            "-w".to_string(),
            self.width.to_string(),
            "-H".to_string(),
            self.height.to_string(),
        ]
    }

    pub async fn run(&self) -> Result<()> {
        tracing::info!("🖼️ Rendering {} with {}", self.input, self.tool);

        let output = tokio::process::Command::new(&self.tool)
            .args(self.args())
            .output()
            .await
            .map_err(|e| InfographicError::ExternalToolError {
                tool: self.tool.clone(),
                message: if e.kind() == std::io::ErrorKind::NotFound {
                    "executable not found on PATH".to_string()
                } else {
                    e.to_string()
                },
            })?;

        if !output.status.success() {
            return Err(InfographicError::ExternalToolError {
                tool: self.tool.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tracing::info!("✅ Generated {}", self.output);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, lines: &[&str], class: Option<&str>) -> FlowNode {
        FlowNode {
            id: id.to_string(),
            lines: lines.iter().map(|s| s.to_string()).collect(),
            class: class.map(str::to_string),
        }
    }

    fn edge(from: &str, to: &str) -> FlowEdge {
        FlowEdge {
            from: from.to_string(),
            to: to.to_string(),
            label: None,
        }
    }

    fn sample() -> Flowchart {
        Flowchart {
            direction: "TD".to_string(),
            nodes: vec![
                node("Input", &["WRE Document Image", "Raw pixel data"], Some("inputOutput")),
                node(
                    "VisionEncoder",
                    &["Vision Encoder", "InternViT or Llama"],
                    Some("processBox"),
                ),
                node("Output", &["Structured Extraction", "TOTAL: $137.50"], Some("inputOutput")),
            ],
            edges: vec![edge("Input", "VisionEncoder"), edge("VisionEncoder", "Output")],
            classes: vec![
                FlowClass {
                    name: "processBox".to_string(),
                    fill: Some("#ffcccc".to_string()),
                    stroke: Some("#333".to_string()),
                    stroke_width: Some(2),
                    color: None,
                },
                FlowClass {
                    name: "inputOutput".to_string(),
                    fill: Some("#ccffcc".to_string()),
                    stroke: Some("#333".to_string()),
                    stroke_width: Some(2),
                    color: None,
                },
            ],
        }
    }

    #[test]
    fn test_to_mermaid_structure() {
        let source = sample().to_mermaid();
        let lines: Vec<&str> = source.lines().collect();

        assert_eq!(lines[0], "flowchart TD");
        assert!(source.contains("    Input[WRE Document Image<br/>Raw pixel data]"));
        assert!(source.contains("    Input --> VisionEncoder"));
        assert!(source
            .contains("    classDef processBox fill:#ffcccc,stroke:#333,stroke-width:2px"));
        assert!(source.contains("    class Input,Output inputOutput"));
        assert!(source.contains("    class VisionEncoder processBox"));
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_edge_target() {
        let mut chart = sample();
        chart.edges.push(edge("Output", "Nowhere"));
        assert!(chart.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_direction() {
        let mut chart = sample();
        chart.direction = "UP".to_string();
        assert!(chart.validate().is_err());
    }

    #[test]
    fn test_special_characters_are_quoted() {
        let text = node_text(&["Projector (MLP)".to_string()]);
        assert_eq!(text, "[\"Projector (MLP)\"]");
    }

    #[test]
    fn test_edge_labels_with_pipes_are_quoted() {
        let mut chart = sample();
        chart.edges[0].label = Some("raw | \"pixels\"".to_string());
        chart.edges[1].label = Some("tokens".to_string());

        let source = chart.to_mermaid();
        assert!(source.contains("    Input -->|\"raw | #quot;pixels#quot;\"| VisionEncoder"));
        assert!(source.contains("    VisionEncoder -->|tokens| Output"));
    }

    #[test]
    fn test_external_render_args() {
        let render = ExternalRender {
            tool: "mmdc".to_string(),
            input: "out/vlm.mmd".to_string(),
            output: "out/vlm.png".to_string(),
            background: "transparent".to_string(),
            width: 800,
            height: 1000,
        };
        assert_eq!(
            render.args(),
            vec![
                "-i",
                "out/vlm.mmd",
                "-o",
                "out/vlm.png",
                "-b",
                "transparent",
                "-w",
                "800",
                "-H",
                "1000"
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_tool_is_external_tool_error() {
        let render = ExternalRender {
            tool: "definitely-not-a-real-mermaid-binary".to_string(),
            input: "in.mmd".to_string(),
            output: "out.png".to_string(),
            background: "white".to_string(),
            width: 10,
            height: 10,
        };
        let err = render.run().await.unwrap_err();
        assert!(matches!(err, InfographicError::ExternalToolError { .. }));
    }
}

pub mod cli;
pub mod toml_config;

use crate::diagrams::DiagramKind;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "field-infographics")]
#[command(about = "Render field-category infographics from a TOML configuration")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "infographic.toml")]
    pub config: String,

    /// Override output.output_path from the config
    #[arg(long)]
    pub output_path: Option<String>,

    /// Only render these diagrams (repeatable)
    #[arg(long, value_enum)]
    pub only: Vec<DiagramKind>,

    /// Override monitoring setting from config
    #[arg(long)]
    pub monitor: Option<bool>,

    /// Dry run - show the computed layout without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

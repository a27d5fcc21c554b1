use clap::Parser;
use field_infographics::core::partition::partition_with;
use field_infographics::diagrams::format_weight;
use field_infographics::domain::ports::ConfigProvider;
use field_infographics::utils::error::ErrorSeverity;
use field_infographics::utils::{logger, validation::Validate};
use field_infographics::{CliConfig, InfographicPipeline, LocalStorage, RenderEngine, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting field-infographics");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(output_path) = &args.output_path {
        config.output.output_path = output_path.clone();
        tracing::info!("🔧 Output path overridden to: {}", output_path);
    }
    if !args.only.is_empty() {
        config.restrict_to(&args.only);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = InfographicPipeline::new(storage, config);
    let engine = RenderEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Render completed successfully!");
            println!("✅ Render completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Render failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &CliConfig) {
    println!("📋 Configuration Summary:");
    println!(
        "  Project: {} v{}",
        config.project.name,
        config.project.version.as_deref().unwrap_or("0.0.0")
    );
    println!("  Categories: {}", config.categories.len());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output.formats.join(", "));

    let diagrams: Vec<String> = config.enabled_diagrams().iter().map(|d| d.to_string()).collect();
    println!("  Diagrams: {}", diagrams.join(", "));

    if !config.output.reports.is_empty() {
        println!("  Reports: {}", config.output.reports.join(", "));
    }
    if let Some(bundle) = config.bundle_filename() {
        println!("  Bundle: {}.zip", bundle);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");
    println!();

    let options = config.partition_options();
    println!("🧭 Partition:");
    println!("  Start angle: {}°", options.start_angle);
    println!("  Direction: {:?}", options.direction);

    let categories = config.categories();
    if !categories.is_empty() {
        let sectors = partition_with(&categories, options)?;
        println!();
        println!("🥧 Sectors:");
        for sector in &sectors {
            println!(
                "  {:<28} {:>5}  {:>9.2}° -> {:>9.2}°  ({:.2}°)",
                sector.name(),
                format_weight(sector.category.weight),
                sector.start_angle,
                sector.end_angle,
                sector.span()
            );
        }
    }

    if let Some(flowchart) = &config.flowchart {
        println!();
        println!("🔀 Flowchart:");
        println!(
            "  {} nodes, {} edges, direction {}",
            flowchart.chart.nodes.len(),
            flowchart.chart.edges.len(),
            flowchart.chart.direction
        );
        match &flowchart.renderer {
            Some(tool) => println!("  Renderer: {}", tool),
            None => println!("  Renderer: none (.mmd source only)"),
        }
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}

use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use field_infographics::core::report::{sectors_to_csv, sectors_to_json};
use field_infographics::diagrams::format_weight;
use field_infographics::utils::logger;
use field_infographics::{partition_sectors, Category, Direction};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "sector-table")]
#[command(about = "Print the proportional sector partition for weighted categories")]
struct Args {
    /// Categories as NAME:WEIGHT, in drawing order
    #[arg(required = true)]
    categories: Vec<String>,

    /// Starting angle in degrees (90 = straight up)
    #[arg(long, default_value_t = 90.0, allow_negative_numbers = true)]
    start_angle: f64,

    /// cw or ccw
    #[arg(long, default_value = "clockwise")]
    direction: Direction,

    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_category(arg: &str) -> anyhow::Result<Category> {
    let (name, weight) = arg
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("expected NAME:WEIGHT, got '{}'", arg))?;
    let weight: f64 = weight
        .trim()
        .parse()
        .with_context(|| format!("invalid weight in '{}'", arg))?;
    Ok(Category::new(name.trim(), weight))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let categories = args
        .categories
        .iter()
        .map(|arg| parse_category(arg))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let sectors = partition_sectors(&categories, args.start_angle, args.direction)?;

    match args.format {
        OutputFormat::Json => println!("{}", sectors_to_json(&sectors)?),
        OutputFormat::Csv => print!("{}", sectors_to_csv(&sectors)?),
        OutputFormat::Table => {
            println!(
                "{:<24} {:>8} {:>10} {:>10} {:>9}",
                "name", "weight", "start", "end", "span"
            );
            for sector in &sectors {
                println!(
                    "{:<24} {:>8} {:>10.2} {:>10.2} {:>9.2}",
                    sector.name(),
                    format_weight(sector.category.weight),
                    sector.start_angle,
                    sector.end_angle,
                    sector.span()
                );
            }
        }
    }

    Ok(())
}

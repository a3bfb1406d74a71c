//! mastgraph - observation metadata charts for MAST telescope missions

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mastgraph_common::mast::{MastClient, MastConfig};
use mastgraph_common::{Telescope, TimeRange};
use mastgraph_config::{ConfigLoader, GraphSettings};
use mastgraph_graphs::{GraphConfig, GraphRenderer, TelescopeData};

/// Which chart to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ChartKind {
    /// Pie chart of observations per instrument
    Instruments,
    /// Pie chart of observations per data product type
    DataProducts,
    /// Histogram of exposure lengths
    Exposure,
    /// Scatter of two numeric archive columns
    Scatter,
}

impl ChartKind {
    fn slug(&self) -> &'static str {
        match self {
            ChartKind::Instruments => "instruments",
            ChartKind::DataProducts => "data-products",
            ChartKind::Exposure => "exposure",
            ChartKind::Scatter => "scatter",
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch MAST observation metadata and chart it", long_about = None)]
struct Args {
    /// Telescope mission to query (jwst, hst, or tess)
    telescope: String,

    /// Start of the observation window (ISO date, ISO date-time, or "now")
    #[arg(long)]
    start: Option<String>,

    /// End of the observation window (ISO date, ISO date-time, or "now")
    #[arg(long)]
    end: Option<String>,

    /// Maximum number of records to request from the archive
    #[arg(long)]
    limit: Option<usize>,

    /// Chart to render
    #[arg(long, value_enum, default_value_t = ChartKind::Instruments)]
    chart: ChartKind,

    /// Numeric archive column for the scatter x axis
    #[arg(long)]
    x_field: Option<String>,

    /// Numeric archive column for the scatter y axis
    #[arg(long)]
    y_field: Option<String>,

    /// Output image path (defaults to <telescope>-<chart>.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the fetched records to this CSV file
    #[arg(long)]
    export_csv: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Use a logarithmic count axis for the exposure histogram
    #[arg(long)]
    log_scale: bool,
}

fn default_output(telescope: Telescope, chart: ChartKind) -> PathBuf {
    PathBuf::from(format!(
        "{}-{}.png",
        telescope.collection().to_lowercase(),
        chart.slug()
    ))
}

/// Overlay the configured rendering settings onto a chart's config
fn apply_style(config: &mut GraphConfig, settings: &GraphSettings) {
    config.width = settings.width;
    config.height = settings.height;
    config.style.background_color = Some(settings.background_color.clone());
    config.style.title_font.family = settings.font_family.clone();
    config.style.title_font.size = settings.font_size;
    config.style.label_font.family = settings.font_family.clone();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    info!("Starting mastgraph");

    // Load configuration
    let config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    info!("Configuration loaded");

    let telescope: Telescope = args.telescope.parse()?;
    let range = TimeRange::parse(args.start.as_deref(), args.end.as_deref())?;

    // Build the archive client
    let mut mast_config = MastConfig::new(&config.archive.base_url)
        .with_timeout(config.archive.timeout_seconds)
        .with_rate_limit(config.archive.rate_limit_per_sec)
        .with_max_retries(config.archive.max_retries as usize);
    if let Some(token) = &config.archive.auth_token {
        mast_config = mast_config.with_token(token);
    }
    if let Some(cap) = config.archive.max_records {
        mast_config = mast_config.with_max_records(cap as usize);
    }
    let client = MastClient::new(mast_config)?;

    let data = TelescopeData::fetch(&client, telescope, range, args.limit).await?;
    info!("Fetched {} observations for {}", data.len(), telescope);

    if let Some(path) = &args.export_csv {
        data.export_csv(path)?;
        info!("Observations exported to {}", path.display());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(telescope, args.chart));

    match args.chart {
        ChartKind::Instruments => {
            let (graph, mut chart_config) = data.instrument_usage_graph()?;
            apply_style(&mut chart_config, &config.graph);
            graph.render_to_file(&chart_config, &output).await?;
        }
        ChartKind::DataProducts => {
            let (graph, mut chart_config) = data.data_product_graph()?;
            apply_style(&mut chart_config, &config.graph);
            graph.render_to_file(&chart_config, &output).await?;
        }
        ChartKind::Exposure => {
            let (graph, mut chart_config) = data.exposure_length_graph(args.log_scale);
            apply_style(&mut chart_config, &config.graph);
            graph.render_to_file(&chart_config, &output).await?;
        }
        ChartKind::Scatter => {
            let (x_field, y_field) = match (&args.x_field, &args.y_field) {
                (Some(x), Some(y)) => (x.as_str(), y.as_str()),
                _ => anyhow::bail!("the scatter chart requires --x-field and --y-field"),
            };
            let (graph, mut chart_config) = data.field_scatter_graph(x_field, y_field)?;
            apply_style(&mut chart_config, &config.graph);
            graph.render_to_file(&chart_config, &output).await?;
        }
    }

    info!("Chart written to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::try_parse_from([
            "mastgraph",
            "jwst",
            "--start",
            "2025-01-01",
            "--end",
            "2025-01-02",
            "--chart",
            "instruments",
            "--limit",
            "500",
        ])
        .unwrap();

        assert_eq!(args.telescope, "jwst");
        assert_eq!(args.start.as_deref(), Some("2025-01-01"));
        assert_eq!(args.chart, ChartKind::Instruments);
        assert_eq!(args.limit, Some(500));
        assert!(!args.log_scale);
    }

    #[test]
    fn test_args_require_telescope() {
        assert!(Args::try_parse_from(["mastgraph"]).is_err());
    }

    #[test]
    fn test_default_output_names() {
        assert_eq!(
            default_output(Telescope::Jwst, ChartKind::Instruments),
            PathBuf::from("jwst-instruments.png")
        );
        assert_eq!(
            default_output(Telescope::Tess, ChartKind::Exposure),
            PathBuf::from("tess-exposure.png")
        );
    }

    #[test]
    fn test_apply_style_overrides_dimensions_and_fonts() {
        let mut chart_config = GraphConfig::default();
        let settings = GraphSettings {
            width: 1024,
            height: 768,
            background_color: "#EEEEEE".to_string(),
            font_family: "DejaVu Sans".to_string(),
            font_size: 20,
        };

        apply_style(&mut chart_config, &settings);

        assert_eq!(chart_config.width, 1024);
        assert_eq!(chart_config.height, 768);
        assert_eq!(
            chart_config.style.background_color.as_deref(),
            Some("#EEEEEE")
        );
        assert_eq!(chart_config.style.title_font.family, "DejaVu Sans");
        assert_eq!(chart_config.style.title_font.size, 20);
    }
}

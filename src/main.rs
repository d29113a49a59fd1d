//! Diagram Metrics - CLI Tool
//!
//! Computes graph topology and centrality metrics for a diagram document and
//! prints them as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use diagram_metrics::graph::{
    find_bridge_nodes, find_hub_nodes_with, find_peripheral_nodes_with, load_diagram,
    parse_diagram, DiagramFormat, MetricsEngine,
};
use diagram_metrics::{Diagram, MetricsConfig};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "diagram-metrics")]
#[command(about = "Graph topology and centrality metrics for diagrams")]
struct Cli {
    /// Path to a YAML config file (default: ./diagram-metrics.yaml)
    #[arg(long, global = true, env = "DIAGRAM_METRICS_CONFIG")]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full metrics report
    Analyze {
        /// Diagram file (.json, .yaml, .yml) or "-" for JSON on stdin
        file: PathBuf,
    },

    /// List hub vertices (degree >= threshold)
    Hubs {
        /// Diagram file (.json, .yaml, .yml) or "-" for JSON on stdin
        file: PathBuf,

        /// Minimum degree (default: multiplier × average degree)
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// List bridge vertices (betweenness >= threshold)
    Bridges {
        /// Diagram file (.json, .yaml, .yml) or "-" for JSON on stdin
        file: PathBuf,

        /// Minimum betweenness (default: 0)
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// List peripheral vertices (closeness <= threshold)
    Peripheral {
        /// Diagram file (.json, .yaml, .yml) or "-" for JSON on stdin
        file: PathBuf,

        /// Maximum closeness (default: multiplier × mean closeness)
        #[arg(short, long)]
        threshold: Option<f64>,
    },
}

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing (stderr, so stdout stays pure JSON)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,diagram_metrics=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = MetricsConfig::from_yaml_and_env(cli.config.as_deref())?;
    let engine = MetricsEngine::new(config.engine.clone());

    match cli.command {
        Commands::Analyze { file } => {
            let report = engine.analyze(&read_diagram(&file)?);
            print_json(&report, cli.pretty)
        }
        Commands::Hubs { file, threshold } => {
            let report = engine.analyze(&read_diagram(&file)?);
            let hubs = find_hub_nodes_with(&report.metrics, threshold, &config.queries);
            tracing::info!("{} hub vertices", hubs.len());
            print_json(&hubs, cli.pretty)
        }
        Commands::Bridges { file, threshold } => {
            let report = engine.analyze(&read_diagram(&file)?);
            let bridges = find_bridge_nodes(&report.metrics, threshold);
            tracing::info!("{} bridge vertices", bridges.len());
            print_json(&bridges, cli.pretty)
        }
        Commands::Peripheral { file, threshold } => {
            let report = engine.analyze(&read_diagram(&file)?);
            let peripheral = find_peripheral_nodes_with(&report.metrics, threshold, &config.queries);
            tracing::info!("{} peripheral vertices", peripheral.len());
            print_json(&peripheral, cli.pretty)
        }
    }
}

fn read_diagram(path: &Path) -> Result<Diagram> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read diagram from stdin")?;
        return Ok(parse_diagram(&text, DiagramFormat::Json)?);
    }
    Ok(load_diagram(path)?)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use route_planner::{
    Algorithm, Node, PlannerConfig, RouteMode, RouteOptimizer, RouteRequest, build_graph,
    sample_nodes,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Route optimization over geolocated nodes")]
struct Cli {
    /// JSON file with an array of {id, name, lat, lng}; defaults to the sample nodes.
    #[arg(long, global = true)]
    nodes: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Optimize a route through the given stops.
    Route {
        /// Comma-separated stop ids, in visiting order.
        #[arg(long, value_delimiter = ',', required = true)]
        stops: Vec<String>,
        /// Segment algorithm: dijkstra or qaoa.
        #[arg(long, default_value = "dijkstra")]
        algorithm: String,
        /// Composition mode: sequential or tour.
        #[arg(long, default_value = "sequential")]
        mode: String,
        /// Seed for the sampler; random when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// JSON planner configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the tour admission cap.
        #[arg(long)]
        max_tour_stops: Option<usize>,
    },
    /// Print the node/edge lists of the complete graph.
    Visualize,
    /// Print the built-in sample nodes.
    Sample,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Route {
            stops,
            algorithm,
            mode,
            seed,
            config,
            max_tour_stops,
        } => {
            let nodes = load_nodes(cli.nodes.as_deref())?;
            let mut config = load_config(config.as_deref())?;
            if let Some(max) = max_tour_stops {
                config.max_tour_stops = max;
            }
            config.validate()?;
            let request = RouteRequest::new(
                stops,
                algorithm.parse::<Algorithm>()?,
                mode.parse::<RouteMode>()?,
            );
            handle_route(&nodes, &request, config, seed)
        }
        Command::Visualize => {
            let nodes = load_nodes(cli.nodes.as_deref())?;
            print_json(&build_graph(&nodes).visualization())
        }
        Command::Sample => print_json(&sample_nodes()),
    }
}

fn handle_route(
    nodes: &[Node],
    request: &RouteRequest,
    config: PlannerConfig,
    seed: Option<u64>,
) -> Result<()> {
    let optimizer = RouteOptimizer::new(config);
    let seed = seed.unwrap_or_else(rand::random);
    let result = optimizer
        .optimize_seeded(nodes, request, seed)
        .context("route optimization failed")?;
    print_json(&result)
}

fn load_nodes(path: Option<&Path>) -> Result<Vec<Node>> {
    let Some(path) = path else {
        return Ok(sample_nodes());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read nodes from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse nodes from {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    let Some(path) = path else {
        return Ok(PlannerConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config from {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

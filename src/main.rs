//! Network configuration analysis CLI.
//!
//! Builds the topology from a device inventory, optionally injects link
//! faults, and runs validation, load analysis or the discovery simulation.

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use netlab::config::Config;
use netlab::config_loader::{self, SimulationCliOverrides};
use netlab::fault::{self, FaultError};
use netlab::load::{capacity_analysis, compute_link_loads, ProfileTable, RateMode};
use netlab::model::{Devices, Endpoint};
use netlab::report::{self, AnalysisReport, LoadReport, TopologyReport};
use netlab::simulation::run_simulation;
use netlab::topology::{self, Topology};
use netlab::utils::parse_duration;
use netlab::validation::{check_data_integrity, config_issues_report};

/// Network configuration analyzer and discovery simulator
#[derive(Parser, Debug)]
#[command(name = "netlab", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the device inventory (YAML, or JSON with a .json extension)
    #[arg(short, long)]
    inventory: PathBuf,

    /// Path to the run configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for reports
    #[arg(short, long, default_value = "netlab_output")]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Bring a link down before analysis, e.g. R1-Gi0/0-R2-Gi0/0 (repeatable)
    #[arg(long = "inject-fault", value_name = "SPEC")]
    faults: Vec<String>,

    /// Number of parallel workers for validation (0 = auto-detect)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the topology and report links and cycles
    Topology,

    /// Run the configuration checks
    Validate,

    /// Aggregate application load and compare it against link capacity
    Load {
        /// Use regular instead of peak rates
        #[arg(long)]
        regular: bool,
    },

    /// Run the hello/ack discovery simulation
    Simulate {
        /// How long to run (e.g. 5s, 500ms)
        #[arg(long, value_parser = parse_duration)]
        window: Option<Duration>,

        /// Period between hello rounds
        #[arg(long, value_parser = parse_duration)]
        hello_interval: Option<Duration>,

        /// Reference packet size checked against link MTUs
        #[arg(long)]
        packet_size: Option<u32>,
    },

    /// Run every analysis
    Full,

    /// Write the topology as a GraphViz DOT file
    Dot,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Read the config quietly first so its log level can seed the logger
    let file_config = cli.config.as_deref().map(config_loader::read_config).transpose()?;
    let log_level = resolve_log_level(cli.log_level.as_deref(), file_config.as_ref());
    env_logger::Builder::from_env(Env::default().default_filter_or(&log_level)).init();

    if let Some(path) = &cli.config {
        info!("Loaded configuration from: {:?}", path);
    }
    let mut config = file_config.unwrap_or_default();
    config.validate()?;

    // Set thread pool size
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .wrap_err("Failed to configure thread pool")?;
    }

    info!("Inventory: {:?}", cli.inventory);
    info!("Output directory: {:?}", cli.output);

    let inventory = config_loader::load_inventory(&cli.inventory)?;
    let (devices, endpoints) = inventory
        .into_devices()
        .wrap_err_with(|| format!("Invalid inventory {:?}", cli.inventory))?;

    let topo = topology::build_with_endpoints(&devices, &endpoints);
    let faults = apply_faults(&topo, &cli.faults);

    fs::create_dir_all(&cli.output)
        .wrap_err_with(|| format!("Failed to create output directory: {}", cli.output.display()))?;

    let mut report = AnalysisReport::new(&cli.inventory, &topo, &faults);

    let name = match cli.command {
        Commands::Topology => {
            let summary_path = cli.output.join("topology.json");
            let summary = serde_json::to_string_pretty(&topology::summarize(&topo))
                .wrap_err("Failed to serialize topology")?;
            fs::write(&summary_path, summary)
                .wrap_err_with(|| format!("Failed to write {}", summary_path.display()))?;
            info!("Topology written to {}", summary_path.display());

            report.topology = Some(TopologyReport::from_topology(&topo));
            "topology"
        }
        Commands::Validate => {
            run_validation(&mut report, &devices, &endpoints, &topo);
            "validation"
        }
        Commands::Load { regular } => {
            let mode = if regular {
                RateMode::Regular
            } else {
                config.load.rate_mode()
            };
            run_load(&mut report, &config, &topo, mode);
            "load"
        }
        Commands::Simulate {
            window,
            hello_interval,
            packet_size,
        } => {
            let overrides = SimulationCliOverrides {
                window,
                hello_interval,
                packet_size,
            };
            config_loader::apply_simulation_overrides(&mut config, &overrides)?;
            report.simulation = Some(run_simulation(&devices, Arc::new(topo), &config.simulation));
            "simulation"
        }
        Commands::Full => {
            report.topology = Some(TopologyReport::from_topology(&topo));
            run_validation(&mut report, &devices, &endpoints, &topo);
            run_load(&mut report, &config, &topo, config.load.rate_mode());
            report.simulation = Some(run_simulation(&devices, Arc::new(topo), &config.simulation));
            "full"
        }
        Commands::Dot => {
            write_dot(&topo, &cli.output)?;
            return Ok(());
        }
    };

    report::generate_json_report(&report, &cli.output.join(format!("{}_report.json", name)))?;
    report::generate_text_report(&report, &cli.output.join(format!("{}_report.txt", name)))?;
    report::print_summary(&report);

    info!("Analysis completed successfully");
    Ok(())
}

/// CLI level first, then the config file, then `info`
fn resolve_log_level(cli_level: Option<&str>, config: Option<&Config>) -> String {
    cli_level
        .map(str::to_string)
        .or_else(|| config.and_then(|c| c.general.log_level.clone()))
        .unwrap_or_else(|| "info".to_string())
}

/// Bring down each requested link. A spec that cannot be applied is logged
/// and recorded with its outcome; the run continues without it.
fn apply_faults(topo: &Topology, specs: &[String]) -> Vec<String> {
    specs
        .iter()
        .map(|spec| match fault::inject_link_fault(topo, spec) {
            Ok(()) => spec.clone(),
            Err(err) => {
                warn!("Fault {} not applied: {}", spec, err);
                match err {
                    FaultError::LinkNotFound(_) => format!("{}: NOT FOUND", spec),
                    FaultError::MalformedSpec(_) => format!("{}: MALFORMED", spec),
                }
            }
        })
        .collect()
}

fn run_validation(report: &mut AnalysisReport, devices: &Devices, endpoints: &[Endpoint], topo: &Topology) {
    report.integrity = check_data_integrity(devices, endpoints);
    if !report.integrity.is_empty() {
        warn!("{} data integrity errors found", report.integrity.len());
    }
    report.validation = Some(config_issues_report(devices, topo));
}

fn run_load(report: &mut AnalysisReport, config: &Config, topo: &Topology, mode: RateMode) {
    let profiles = ProfileTable::with_overrides(&config.load.profiles);
    let loads = compute_link_loads(topo, topo.endpoints(), &profiles, mode);
    let capacity = capacity_analysis(topo, &loads);
    report.load = Some(LoadReport::new(mode, loads, capacity));
}

fn write_dot(topo: &Topology, output: &Path) -> Result<()> {
    let path = output.join("topology.dot");
    let dot = topology::to_dot(topo);
    fs::write(&path, &dot).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    info!("DOT graph written to {}", path.display());
    println!("{}", dot);
    Ok(())
}

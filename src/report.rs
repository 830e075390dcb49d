//! Report generation for network analysis runs.
//!
//! Generates both JSON and human-readable text reports.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use color_eyre::eyre::{Context, Result};
use serde::Serialize;

use crate::load::{load_per_sink, CapacityFinding, LoadMap, RateMode};
use crate::model::EdgeKey;
use crate::simulation::{NodeStats, SimulationStats};
use crate::topology::{cycle_basis, Topology};
use crate::topology::cycles::cycle_labels;
use crate::validation::{IntegrityError, ValidationReport};

/// Everything produced by one run; sections that were not run are omitted
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topology: Option<TopologyReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub integrity: Vec<IntegrityError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<SimulationStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub inventory: String,
    pub total_devices: usize,
    pub total_links: usize,
    pub total_endpoints: usize,
    /// Requested link faults; specs that could not be applied carry their
    /// outcome, e.g. `R1-Gi0/0-R9-Gi0/0: NOT FOUND`
    pub faults: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopologyReport {
    pub down_links: Vec<EdgeKey>,
    pub cycles: Vec<Vec<String>>,
}

impl TopologyReport {
    pub fn from_topology(topo: &Topology) -> Self {
        Self {
            down_links: topo
                .links()
                .filter(|(_, link)| !link.is_up())
                .map(|(key, _)| key.clone())
                .collect(),
            cycles: cycle_basis(topo).iter().map(cycle_labels).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub mode: RateMode,
    pub loads: LoadMap,
    /// Aggregate per sink interface, keyed `dev:if`
    pub per_sink: BTreeMap<String, u64>,
    pub capacity: Vec<CapacityFinding>,
}

impl LoadReport {
    pub fn new(mode: RateMode, loads: LoadMap, capacity: Vec<CapacityFinding>) -> Self {
        let per_sink = load_per_sink(&loads)
            .into_iter()
            .map(|(sink, total)| (sink.to_string(), total))
            .collect();
        Self {
            mode,
            loads,
            per_sink,
            capacity,
        }
    }
}

impl AnalysisReport {
    /// Empty report carrying run metadata for `topo`
    pub fn new(inventory: &Path, topo: &Topology, faults: &[String]) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                inventory: inventory.display().to_string(),
                total_devices: topo.node_count(),
                total_links: topo.link_count(),
                total_endpoints: topo.endpoints().len(),
                faults: faults.to_vec(),
            },
            topology: None,
            integrity: Vec::new(),
            validation: None,
            load: None,
            simulation: None,
        }
    }
}

/// Generate JSON report
pub fn generate_json_report(report: &AnalysisReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push("=".repeat(80));
    lines.push(format!("{:^80}", title));
    lines.push("=".repeat(80));
    lines.push(String::new());
}

/// Render the human-readable text report
pub fn render_text_report(report: &AnalysisReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    section(&mut lines, "NETWORK CONFIGURATION ANALYSIS");

    let meta = &report.metadata;
    lines.push(format!("Analysis Date: {}", meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC")));
    lines.push(format!("Inventory: {}", meta.inventory));
    lines.push(format!("Devices: {}", meta.total_devices));
    lines.push(format!("Links: {}", meta.total_links));
    lines.push(format!("Endpoints: {}", meta.total_endpoints));
    if !meta.faults.is_empty() {
        lines.push(format!("Injected faults: {}", meta.faults.join(", ")));
    }
    lines.push(String::new());

    if !report.integrity.is_empty() {
        section(&mut lines, "DATA INTEGRITY");
        for err in &report.integrity {
            lines.push(format!("  - {}", err));
        }
        lines.push(String::new());
    }

    if let Some(ref topo) = report.topology {
        section(&mut lines, "TOPOLOGY");
        if topo.down_links.is_empty() {
            lines.push("All links up".to_string());
        } else {
            lines.push("Down links:".to_string());
            for key in &topo.down_links {
                lines.push(format!("  - {}", key));
            }
        }
        lines.push(format!("Independent cycles: {}", topo.cycles.len()));
        for cycle in &topo.cycles {
            lines.push(format!("  - {}", cycle.join(" -> ")));
        }
        lines.push(String::new());
    }

    if let Some(ref validation) = report.validation {
        section(&mut lines, "VALIDATION");
        for (check, messages) in validation.messages() {
            if messages.is_empty() {
                lines.push(format!("{}: OK", check));
                continue;
            }
            lines.push(format!("{}: {} finding(s)", check, messages.len()));
            for message in messages {
                lines.push(format!("  - {}", message));
            }
        }
        lines.push(String::new());
    }

    if let Some(ref load) = report.load {
        section(&mut lines, "LOAD & CAPACITY");
        lines.push(format!("Rate mode: {:?}", load.mode));
        lines.push("Load per edge:".to_string());
        for (edge, kbps) in &load.loads {
            lines.push(format!("  {:<50} {:>10} kbps", edge.to_string(), kbps));
        }
        lines.push("Load per sink:".to_string());
        for (sink, kbps) in &load.per_sink {
            lines.push(format!("  {:<50} {:>10} kbps", sink, kbps));
        }
        lines.push(String::new());

        if load.capacity.is_empty() {
            lines.push("No link exceeds its capacity.".to_string());
        } else {
            lines.push("Overloaded links:".to_string());
            for finding in &load.capacity {
                lines.push(format!("  - {}", finding));
            }
        }
        lines.push(String::new());
    }

    if let Some(ref stats) = report.simulation {
        section(&mut lines, "SIMULATION");
        lines.push(format!("{:<20} {:>10} {:>10} {:>10}", "Device", "Sent", "Received", "Dropped"));
        let mut totals = NodeStats::default();
        for (host, s) in stats {
            lines.push(format!("{:<20} {:>10} {:>10} {:>10}", host, s.sent, s.received, s.dropped));
            totals.sent += s.sent;
            totals.received += s.received;
            totals.dropped += s.dropped;
        }
        lines.push(format!(
            "{:<20} {:>10} {:>10} {:>10}",
            "TOTAL", totals.sent, totals.received, totals.dropped
        ));
        lines.push(String::new());
    }

    // Footer
    lines.push("=".repeat(80));
    lines.join("\n")
}

/// Generate human-readable text report
pub fn generate_text_report(report: &AnalysisReport, output_path: &Path) -> Result<()> {
    fs::write(output_path, render_text_report(report))
        .with_context(|| format!("Failed to write text report to {}", output_path.display()))?;

    log::info!("Text report written to {}", output_path.display());
    Ok(())
}

/// Print a summary to stdout
pub fn print_summary(report: &AnalysisReport) {
    println!("\n=== NETWORK ANALYSIS SUMMARY ===\n");
    println!("Devices: {}", report.metadata.total_devices);
    println!("Links: {}", report.metadata.total_links);
    println!("Endpoints: {}", report.metadata.total_endpoints);

    if !report.integrity.is_empty() {
        println!("\nIntegrity errors: {}", report.integrity.len());
    }

    if let Some(ref topo) = report.topology {
        println!("\nTopology:");
        println!("  Down links: {}", topo.down_links.len());
        println!("  Cycles: {}", topo.cycles.len());
    }

    if let Some(ref validation) = report.validation {
        println!("\nValidation:");
        for (check, messages) in validation.messages() {
            println!("  {}: {}", check, messages.len());
        }
    }

    if let Some(ref load) = report.load {
        println!("\nLoad ({:?}):", load.mode);
        println!("  Edges carrying load: {}", load.loads.len());
        println!("  Overloaded links: {}", load.capacity.len());
    }

    if let Some(ref stats) = report.simulation {
        println!("\nSimulation:");
        for (host, s) in stats {
            println!("  {}: sent {}, received {}, dropped {}", host, s.sent, s.received, s.dropped);
        }
    }

    println!();
}

//! # Netlab - Network configuration analysis and discovery simulation
//!
//! This library takes a structured inventory of routers, switches and hosts
//! and answers questions about the network it describes: how the devices are
//! wired, which configuration mistakes are present, where traffic piles up,
//! and whether neighbors can actually discover each other over their links.
//!
//! ## Key Features
//!
//! - **Topology Graph**: Links resolved from `LINK:` tags in interface descriptions
//! - **Fault Injection**: Take individual links down (and back up) by name
//! - **Validation**: Duplicate IPs, VLAN labels, gateways, MTU mismatches, L2 loops
//! - **Load Analysis**: Per-application traffic rates aggregated onto SVIs
//! - **Simulation**: One thread per device exchanging HELLO/HELLO-ACK messages
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `model`: Device, interface, endpoint and link records
//! - `topology`: Graph construction, cycle basis and DOT export
//! - `fault`: Link fault injection
//! - `validation`: Configuration checks and data integrity
//! - `load`: Application profiles, load aggregation and capacity findings
//! - `simulation`: Broker, node actors and the simulation driver
//! - `config` / `config_loader`: Run configuration and inventory loading
//! - `report`: JSON and text report generation
//! - `utils`: Address and duration parsing helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use netlab::{config_loader, fault, simulation, topology, validation};
//!
//! let inventory = config_loader::load_inventory(Path::new("inventory.yaml"))?;
//! let (devices, endpoints) = inventory.into_devices()?;
//!
//! let topo = topology::build_with_endpoints(&devices, &endpoints);
//! fault::inject_link_fault(&topo, "R1-Gi0/0-R2-Gi0/0")?;
//!
//! let report = validation::config_issues_report(&devices, &topo);
//! println!("{} findings", report.total_findings());
//!
//! let stats = simulation::run_simulation(
//!     &devices,
//!     Arc::new(topo),
//!     &simulation::SimulationConfig::default(),
//! );
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Inventory Format
//!
//! ```yaml
//! devices:
//!   - hostname: R1
//!     type: router
//!     interfaces:
//!       Gi0/0:
//!         ip: 10.0.12.1/30
//!         mtu: 1500
//!         bandwidth_kbps: 100000
//!         description: "LINK:R1:Gi0/0-R2:Gi0/0"
//!   - hostname: SW1
//!     type: switch
//!     interfaces:
//!       Vlan10: { ip: 10.0.10.1/24 }
//!       Gi0/1: { vlan: 10 }
//!     vlans:
//!       10: { name: USERS }
//!     default_gateways:
//!       10: 10.0.10.254
//! endpoints:
//!   - { name: pc1, vlan: 10, ip: 10.0.10.10, gw: 10.0.10.1, app_profile: HTTP }
//! ```
//!
//! ## Error Handling
//!
//! Analyses never fail: they return best-effort results and log what they
//! skipped. Loading functions return `color_eyre::Result` with context, and
//! each concern that can reject its input has its own `thiserror` enum.

pub mod config;
pub mod config_loader;
pub mod fault;
pub mod load;
pub mod model;
pub mod report;
pub mod simulation;
pub mod topology;
pub mod utils;
pub mod validation;

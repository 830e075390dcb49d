//! Configuration validation over devices and topology.
//!
//! Five independent, read-only checks are aggregated into one
//! [`ValidationReport`]. Every check is always present in the report; a
//! clean check is an empty list. Hard data-integrity errors are reported
//! separately by [`check_data_integrity`].

pub mod addressing;
pub mod integrity;
pub mod loops;
pub mod mtu;
pub mod vlan;

use log::info;
use serde::Serialize;

use crate::model::Devices;
use crate::topology::Topology;

pub use addressing::{check_wrong_gateways, find_duplicate_ips, DuplicateIp, GatewayIssue};
pub use integrity::{check_data_integrity, IntegrityError};
pub use loops::detect_layer2_loops;
pub use mtu::{check_mtu_mismatches, MtuMismatch};
pub use vlan::{check_vlan_labels, VlanLabelIssue};

/// Findings of all checks, keyed by check name when serialized
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub duplicate_ips: Vec<DuplicateIp>,
    pub vlan_label_issues: Vec<VlanLabelIssue>,
    pub gateway_issues: Vec<GatewayIssue>,
    pub mtu_mismatches: Vec<MtuMismatch>,
    pub l2_loops: Vec<Vec<String>>,
}

impl ValidationReport {
    /// Names of the checks, in report order
    pub const CHECKS: [&'static str; 5] = [
        "duplicate_ips",
        "vlan_label_issues",
        "gateway_issues",
        "mtu_mismatches",
        "l2_loops",
    ];

    pub fn total_findings(&self) -> usize {
        self.duplicate_ips.len()
            + self.vlan_label_issues.len()
            + self.gateway_issues.len()
            + self.mtu_mismatches.len()
            + self.l2_loops.len()
    }

    pub fn is_clean(&self) -> bool {
        self.total_findings() == 0
    }

    /// Findings rendered as messages, grouped by check name
    pub fn messages(&self) -> Vec<(&'static str, Vec<String>)> {
        fn render<T: ToString>(items: &[T]) -> Vec<String> {
            items.iter().map(ToString::to_string).collect()
        }

        vec![
            (Self::CHECKS[0], render(&self.duplicate_ips)),
            (Self::CHECKS[1], render(&self.vlan_label_issues)),
            (Self::CHECKS[2], render(&self.gateway_issues)),
            (Self::CHECKS[3], render(&self.mtu_mismatches)),
            (
                Self::CHECKS[4],
                self.l2_loops.iter().map(|cycle| cycle.join(" -> ")).collect(),
            ),
        ]
    }
}

/// Aggregate all checks into a structured report.
///
/// The checks share nothing and only read their inputs, so they run
/// concurrently on the rayon pool.
pub fn config_issues_report(devices: &Devices, topo: &Topology) -> ValidationReport {
    let ((duplicate_ips, vlan_label_issues), (gateway_issues, (mtu_mismatches, l2_loops))) = rayon::join(
        || rayon::join(|| find_duplicate_ips(devices), || check_vlan_labels(devices)),
        || {
            rayon::join(
                || check_wrong_gateways(devices),
                || rayon::join(|| check_mtu_mismatches(topo), || detect_layer2_loops(topo)),
            )
        },
    );

    let report = ValidationReport {
        duplicate_ips,
        vlan_label_issues,
        gateway_issues,
        mtu_mismatches,
        l2_loops,
    };
    info!("Validation finished with {} findings", report.total_findings());
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Device, Interface};
    use crate::topology::build_from_devices;

    #[test]
    fn test_clean_report_keeps_every_key() {
        let devices = Devices::new();
        let report = config_issues_report(&devices, &Topology::new());
        assert!(report.is_clean());

        let json = serde_json::to_value(&report).unwrap();
        let obj = json.as_object().unwrap();
        for check in ValidationReport::CHECKS {
            assert_eq!(obj[check], serde_json::json!([]), "missing key {}", check);
        }
    }

    #[test]
    fn test_report_aggregates_checks() {
        let sw = Device::switch("SW1")
            .with_interface(Interface::new("Vlan5").with_ip("10.0.5.1/24"))
            .with_interface(Interface::new("Gi0/1").with_vlan(99))
            .with_gateway(5, "10.0.9.1");
        let r1 = Device::router("R1").with_interface(Interface::new("Gi0/0").with_ip("10.0.5.1/24"));
        let devices: Devices = [sw, r1].into_iter().map(|d| (d.hostname.clone(), d)).collect();
        let topo = build_from_devices(&devices);

        let report = config_issues_report(&devices, &topo);
        assert_eq!(report.duplicate_ips.len(), 1);
        assert_eq!(report.vlan_label_issues.len(), 1);
        assert_eq!(report.gateway_issues.len(), 1);
        assert!(report.mtu_mismatches.is_empty());
        assert!(report.l2_loops.is_empty());
        assert_eq!(report.total_findings(), 3);

        let messages = report.messages();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[2].1, vec!["SW1 gateway 10.0.9.1 not in VLAN5 subnet 10.0.5.0/24"]);
    }
}

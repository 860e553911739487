//! Per-command rule sets.
//!
//! One module per show command; each exposes a unit parser implementing
//! [`CommandParser`] and its required-field manifest.

pub mod bsr_candidate_rp;
pub mod bsr_election;
pub mod bsr_router;
pub mod interface;
pub mod interface_detail;
pub mod ipv6_interface;
pub mod rp_mapping;

use pim_show_core::{CommandKind, Record, Requirement};

use crate::engine::{self, CommandParser, IndexedLine};
use crate::report::ScanReport;

/// Dispatches a scan to the parser of `kind`.
pub(crate) fn scan(
    kind: CommandKind,
    lines: &[IndexedLine],
    vrf: &str,
    report: &mut ScanReport,
) -> Record {
    match kind {
        CommandKind::Ipv6Interface => {
            engine::scan(&ipv6_interface::Ipv6InterfaceParser, lines, vrf, report)
        }
        CommandKind::Interface => engine::scan(&interface::InterfaceParser, lines, vrf, report),
        CommandKind::InterfaceDetail => {
            engine::scan(&interface_detail::InterfaceDetailParser, lines, vrf, report)
        }
        CommandKind::Ipv6BsrElection => {
            engine::scan(&bsr_election::BsrElectionParser, lines, vrf, report)
        }
        CommandKind::Ipv6BsrCandidateRp => {
            engine::scan(&bsr_candidate_rp::CandidateRpParser, lines, vrf, report)
        }
        CommandKind::BsrRouter => engine::scan(&bsr_router::BsrRouterParser, lines, vrf, report),
        CommandKind::RpMapping => engine::scan(&rp_mapping::RpMappingParser, lines, vrf, report),
    }
}

/// Required-field manifest of `kind`.
pub fn requirements(kind: CommandKind) -> &'static [Requirement] {
    match kind {
        CommandKind::Ipv6Interface => ipv6_interface::Ipv6InterfaceParser.requirements(),
        CommandKind::Interface => interface::InterfaceParser.requirements(),
        CommandKind::InterfaceDetail => interface_detail::InterfaceDetailParser.requirements(),
        CommandKind::Ipv6BsrElection => bsr_election::BsrElectionParser.requirements(),
        CommandKind::Ipv6BsrCandidateRp => bsr_candidate_rp::CandidateRpParser.requirements(),
        CommandKind::BsrRouter => bsr_router::BsrRouterParser.requirements(),
        CommandKind::RpMapping => rp_mapping::RpMappingParser.requirements(),
    }
}

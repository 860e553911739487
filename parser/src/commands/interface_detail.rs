//! `show ip pim [vrf <vrf>] interface detail`
//!
//! Block output: an `<intf> is <status>, line protocol is <status>` header
//! opens an interface; every indented line below it is a `label: value`
//! attribute of that interface.

use std::sync::LazyLock;

use pim_show_core::{ANY, CommandKind, RecordBuilder, Requirement};
use regex::Captures;
use tracing::{debug, warn};

use crate::engine::rules::cap;
use crate::engine::{CommandParser, Context, RuleTable, parse_flag, write_int, write_str};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Header,
    Address,
    MulticastSetting,
    MulticastPackets,
    TtlThreshold,
    PimStatus,
    VersionMode,
    Dr,
    NeighborCount,
    HelloInterval,
    HelloPackets,
    JpInterval,
    PimSetting,
    PimFlag,
}

static RULES: LazyLock<RuleTable<Rule>> = LazyLock::new(|| {
    RuleTable::new(&[
        (
            Rule::Header,
            r"^(?P<interface>\S+) is (?P<oper>.+?), line protocol is \S+$",
        ),
        (Rule::Address, r"^Internet address is (?P<address>\S+)$"),
        (
            Rule::MulticastSetting,
            r"^Multicast (?P<name>switching|Tagswitching):\s*(?P<value>\S+)$",
        ),
        (
            Rule::MulticastPackets,
            r"^Multicast packets in/out:\s*(?P<in>\d+)/(?P<out>\d+)$",
        ),
        (Rule::TtlThreshold, r"^Multicast TTL threshold:\s*(?P<ttl>\d+)$"),
        (Rule::PimStatus, r"^PIM:\s*(?P<status>\S+)$"),
        (
            Rule::VersionMode,
            r"^PIM version:\s*(?P<version>\d+),\s*mode:\s*(?P<mode>\S+)$",
        ),
        (Rule::Dr, r"^PIM DR:\s*(?P<dr>\S+)(?:\s+\(this system\))?$"),
        (Rule::NeighborCount, r"^PIM neighbor count:\s*(?P<count>\d+)$"),
        (
            Rule::HelloInterval,
            r"^PIM Hello/Query interval:\s*(?P<seconds>\d+) seconds$",
        ),
        (
            Rule::HelloPackets,
            r"^PIM Hello packets in/out:\s*(?P<in>\d+)/(?P<out>\d+)$",
        ),
        (Rule::JpInterval, r"^PIM J/P interval:\s*(?P<seconds>\d+) seconds$"),
        (
            Rule::PimSetting,
            r"^PIM (?P<name>State-Refresh processing|State-Refresh origination|NBMA mode|ATM multipoint signalling|domain border):\s*(?P<value>\S+)$",
        ),
        (
            Rule::PimFlag,
            r"^PIM (?P<name>neighbors rpf proxy capable|BFD|Non-DR-Join):\s*(?P<value>\S+)$",
        ),
    ])
});

const REQUIREMENTS: &[Requirement] = &[
    Requirement::required(&["vrf", ANY], &["interfaces"]),
    Requirement::required(
        &["vrf", ANY, "interfaces", ANY, "address_family", "ipv4"],
        &["oper_status", "pim_status"],
    ),
];

/// Record key of a `PIM <label>: <value>` setting kept as a string.
fn setting_key(label: &str) -> Option<&'static str> {
    Some(match label {
        "State-Refresh processing" => "state_refresh_processing",
        "State-Refresh origination" => "state_refresh_origination",
        "NBMA mode" => "nbma_mode",
        "ATM multipoint signalling" => "atm_multipoint_signalling",
        "domain border" => "bsr_border",
        "switching" => "switching",
        "Tagswitching" => "tag_switching",
        _ => return None,
    })
}

/// Mode sub-mappings a PIM mode announces.
fn mode_sections(mode: &str) -> &'static [&'static str] {
    match mode {
        "sparse" => &["sm"],
        "dense" => &["dm"],
        "sparse-dense" => &["sm", "dm"],
        _ => &[],
    }
}

pub struct InterfaceDetailParser;

impl CommandParser for InterfaceDetailParser {
    type Rule = Rule;

    fn kind(&self) -> CommandKind {
        CommandKind::InterfaceDetail
    }

    fn rules(&self) -> &RuleTable<Rule> {
        &RULES
    }

    fn requirements(&self) -> &'static [Requirement] {
        REQUIREMENTS
    }

    fn apply(&self, rule: Rule, caps: &Captures<'_>, ctx: &mut Context, out: &mut RecordBuilder) {
        if let Rule::Header = rule {
            ctx.interface = cap(caps, "interface").map(str::to_string);
        }
        let Some(interface) = ctx.interface.as_deref() else {
            debug!(?rule, "Attribute line before any interface header");
            return;
        };
        let path = [
            "vrf",
            ctx.vrf(),
            "interfaces",
            interface,
            "address_family",
            "ipv4",
        ];
        let multicast = [&path[..], &["multicast"][..]].concat();

        match rule {
            Rule::Header => write_str(out, &path, "oper_status", cap(caps, "oper")),
            Rule::Address => {
                if let Some(address) = cap(caps, "address") {
                    out.push(&path, "address", address);
                }
            }
            Rule::MulticastSetting => {
                if let Some(key) = cap(caps, "name").and_then(setting_key) {
                    write_str(out, &multicast, key, cap(caps, "value"));
                }
            }
            Rule::MulticastPackets => {
                write_int(out, &multicast, "packets_in", cap(caps, "in"));
                write_int(out, &multicast, "packets_out", cap(caps, "out"));
            }
            Rule::TtlThreshold => write_int(out, &multicast, "ttl_threshold", cap(caps, "ttl")),
            Rule::PimStatus => write_str(out, &path, "pim_status", cap(caps, "status")),
            Rule::VersionMode => {
                write_int(out, &path, "version", cap(caps, "version"));
                if let Some(mode) = cap(caps, "mode") {
                    out.set(&path, "mode", mode);
                    for section in mode_sections(mode) {
                        out.ensure(&[&path[..], &[*section][..]].concat());
                    }
                }
            }
            Rule::Dr => write_str(out, &path, "dr_address", cap(caps, "dr")),
            Rule::NeighborCount => write_int(out, &path, "neighbor_count", cap(caps, "count")),
            Rule::HelloInterval => write_int(out, &path, "hello_interval", cap(caps, "seconds")),
            Rule::HelloPackets => {
                write_int(out, &path, "hello_packets_in", cap(caps, "in"));
                write_int(out, &path, "hello_packets_out", cap(caps, "out"));
            }
            Rule::JpInterval => write_int(out, &path, "jp_interval", cap(caps, "seconds")),
            Rule::PimSetting => {
                if let Some(key) = cap(caps, "name").and_then(setting_key) {
                    write_str(out, &path, key, cap(caps, "value"));
                }
            }
            Rule::PimFlag => {
                let (Some(name), Some(value)) = (cap(caps, "name"), cap(caps, "value")) else {
                    return;
                };
                let Some(flag) = parse_flag(value) else {
                    warn!(name, value, "Unrecognized PIM flag value");
                    return;
                };
                match name {
                    "BFD" => out.set(&[&path[..], &["bfd"][..]].concat(), "enable", flag),
                    "Non-DR-Join" => out.set(&path, "none_dr_join", flag),
                    _ => out.set(&path, "neighbors_rpf_proxy_capable", flag),
                }
            }
        }
    }
}

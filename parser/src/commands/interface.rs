//! `show ip pim [vrf <vrf>] interface`
//!
//! ```text
//! Address          Interface                Ver/   Nbr    Query  DR         DR
//!                                           Mode   Count  Intvl  Prior
//! 10.1.2.1         GigabitEthernet1         v2/S   1      30     1          10.1.2.2
//! ```

use std::sync::LazyLock;

use pim_show_core::{ANY, CommandKind, RecordBuilder, Requirement};
use regex::Captures;

use crate::engine::rules::cap;
use crate::engine::{CommandParser, Context, RuleTable, write_int, write_str};

/// DR column value when no DR is elected.
const NO_DR: &str = "0.0.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Row,
}

static RULES: LazyLock<RuleTable<Rule>> = LazyLock::new(|| {
    RuleTable::new(&[(
        Rule::Row,
        r"^(?P<address>\d{1,3}(?:\.\d{1,3}){3})\s+(?P<interface>\S+)\s+v(?P<version>\d+)/(?P<mode>[A-Z]+)(?:\s+(?P<nbr_count>\d+)\s+(?P<query_intvl>\d+)\s+(?P<dr_prior>\d+)(?:\s+(?P<dr>\d{1,3}(?:\.\d{1,3}){3}))?)?$",
    )])
});

const REQUIREMENTS: &[Requirement] = &[
    Requirement::required(&["vrf", ANY], &["interfaces"]),
    Requirement::required(
        &["vrf", ANY, "interfaces", ANY, "address_family", "ipv4"],
        &[
            "address",
            "version",
            "mode",
            "neighbor_count",
            "hello_interval",
            "dr_priority",
        ],
    ),
];

/// Expands the one- or two-letter mode column.
fn mode_name(code: &str) -> String {
    match code {
        "S" => "sparse-mode".to_string(),
        "D" => "dense-mode".to_string(),
        "SD" => "sparse-dense-mode".to_string(),
        other => other.to_ascii_lowercase(),
    }
}

pub struct InterfaceParser;

impl CommandParser for InterfaceParser {
    type Rule = Rule;

    fn kind(&self) -> CommandKind {
        CommandKind::Interface
    }

    fn rules(&self) -> &RuleTable<Rule> {
        &RULES
    }

    fn requirements(&self) -> &'static [Requirement] {
        REQUIREMENTS
    }

    fn apply(&self, rule: Rule, caps: &Captures<'_>, ctx: &mut Context, out: &mut RecordBuilder) {
        match rule {
            Rule::Row => {
                ctx.interface = cap(caps, "interface").map(str::to_string);
                let Some(interface) = ctx.interface.as_deref() else {
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
                if let Some(address) = cap(caps, "address") {
                    out.push(&path, "address", address);
                }
                write_int(out, &path, "version", cap(caps, "version"));
                if let Some(mode) = cap(caps, "mode") {
                    out.set(&path, "mode", mode_name(mode));
                }
                write_int(out, &path, "neighbor_count", cap(caps, "nbr_count"));
                write_int(out, &path, "hello_interval", cap(caps, "query_intvl"));
                write_int(out, &path, "dr_priority", cap(caps, "dr_prior"));
                write_str(out, &path, "dr_address", cap(caps, "dr").filter(|dr| *dr != NO_DR));
            }
        }
    }
}

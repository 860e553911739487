//! `show ipv6 pim [vrf <vrf>] interface`
//!
//! Tabular output: one row per interface followed by optional indented
//! `Address:` and `DR :` continuation lines that belong to the row above.
//!
//! ```text
//! Interface          PIM   Nbr   Hello  DR
//!                          Count Intvl  Prior
//!
//! GigabitEthernet1   on    1     30     1
//!     Address: FE80::5054:FF:FE2C:6CDF
//!     DR     : FE80::5054:FF:FEAC:64B3
//! ```

use std::sync::LazyLock;

use pim_show_core::{ANY, CommandKind, RecordBuilder, Requirement};
use regex::Captures;
use tracing::debug;

use crate::engine::rules::cap;
use crate::engine::{CommandParser, Context, RuleTable, parse_flag, write_int, write_str};

/// Unspecified address printed for interfaces without a link-local address.
const UNSPECIFIED: &str = "::";
/// DR sentinel meaning this router is the DR.
const DR_SELF: &str = "this system";
/// DR sentinel meaning no DR has been elected yet.
const DR_NONE: &str = "not elected";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Row,
    Address,
    Dr,
}

static RULES: LazyLock<RuleTable<Rule>> = LazyLock::new(|| {
    RuleTable::new(&[
        (
            Rule::Row,
            r"^(?P<interface>[A-Za-z][\w./:-]*)\s+(?P<pim>on|off)(?:\s+(?P<nbr_count>\d+)\s+(?P<hello_intvl>\d+)\s+(?P<dr_prior>\d+))?$",
        ),
        (Rule::Address, r"^Address\s*:\s*(?P<address>\S+)$"),
        (Rule::Dr, r"^DR\s*:\s*(?P<dr>.+?)$"),
    ])
});

const REQUIREMENTS: &[Requirement] = &[
    Requirement::required(&["vrf", ANY], &["interface"]),
    Requirement::required(
        &["vrf", ANY, "interface", ANY],
        &["pim_enabled", "neighbor_count", "hello_interval", "dr_priority"],
    ),
];

pub struct Ipv6InterfaceParser;

impl CommandParser for Ipv6InterfaceParser {
    type Rule = Rule;

    fn kind(&self) -> CommandKind {
        CommandKind::Ipv6Interface
    }

    fn rules(&self) -> &RuleTable<Rule> {
        &RULES
    }

    fn requirements(&self) -> &'static [Requirement] {
        REQUIREMENTS
    }

    fn apply(&self, rule: Rule, caps: &Captures<'_>, ctx: &mut Context, out: &mut RecordBuilder) {
        if let Rule::Row = rule {
            ctx.interface = cap(caps, "interface").map(str::to_string);
        }
        let Some(interface) = ctx.interface.as_deref() else {
            debug!(?rule, "Continuation line before any interface row");
            return;
        };
        let path = ["vrf", ctx.vrf(), "interface", interface];

        match rule {
            Rule::Row => {
                if let Some(enabled) = cap(caps, "pim").and_then(parse_flag) {
                    out.set(&path, "pim_enabled", enabled);
                }
                write_int(out, &path, "neighbor_count", cap(caps, "nbr_count"));
                write_int(out, &path, "hello_interval", cap(caps, "hello_intvl"));
                write_int(out, &path, "dr_priority", cap(caps, "dr_prior"));
            }
            Rule::Address => {
                if let Some(address) = cap(caps, "address").filter(|a| *a != UNSPECIFIED) {
                    out.push(&path, "address", address);
                }
            }
            Rule::Dr => {
                let dr = cap(caps, "dr").filter(|dr| !matches!(*dr, DR_SELF | DR_NONE));
                write_str(out, &path, "dr_address", dr);
            }
        }
    }
}

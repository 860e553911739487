//! `show ip pim [vrf <vrf>] bsr-router`
//!
//! The BSR view is always printed. A candidate-RP block keyed by its
//! interface, a candidate-BSR block and the next bootstrap timer follow
//! only when this router plays those roles.
//!
//! ```text
//! PIMv2 Bootstrap information
//!   BSR address: 10.1.5.5 (?)
//!   Uptime:      00:00:26, BSR Priority: 0, Hash mask length: 0
//!   Expires:     00:01:45
//!   Candidate RP: 10.1.5.1(GigabitEthernet3)
//!     Holdtime 150 seconds
//!     Advertisement interval 60 seconds
//!     Next advertisement in 00:00:27
//!     Candidate RP priority : 5
//! ```

use std::sync::LazyLock;

use pim_show_core::{ANY, CommandKind, RecordBuilder, Requirement};
use regex::Captures;
use tracing::debug;

use crate::engine::rules::cap;
use crate::engine::{CommandParser, Context, RuleTable, Section, write_int, write_str};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    BsrAddress,
    Uptime,
    Expires,
    NextBootstrap,
    CandidateBsrHeader,
    CandidateBsr,
    CandidateRp,
    Holdtime,
    Interval,
    NextAdvertisement,
    CandidateRpPriority,
}

static RULES: LazyLock<RuleTable<Rule>> = LazyLock::new(|| {
    RuleTable::new(&[
        (
            Rule::BsrAddress,
            r"^BSR address:\s*(?P<address>[^\s(]+)(?:\s*\((?P<host>[^)]*)\))?$",
        ),
        (
            Rule::Uptime,
            r"^Uptime:\s*(?P<up_time>[^,\s]+),\s*BSR Priority:\s*(?P<priority>\d+),\s*Hash mask length:\s*(?P<hash>\d+)$",
        ),
        (Rule::Expires, r"^Expires:\s*(?P<expires>\S+)$"),
        (
            Rule::NextBootstrap,
            r"^Next bootstrap message in\s+(?P<next>\S+)$",
        ),
        (Rule::CandidateBsrHeader, r"^This system is a candidate BSR$"),
        (
            Rule::CandidateBsr,
            r"^Candidate BSR address:\s*(?P<address>[^,\s]+),\s*priority:\s*(?P<priority>\d+),\s*hash mask length:\s*(?P<hash>\d+)$",
        ),
        (
            Rule::CandidateRp,
            r"^Candidate RP:\s*(?P<address>[^\s(]+)\s*\((?P<interface>[^)]+)\)$",
        ),
        (Rule::Holdtime, r"^Holdtime\s+(?P<holdtime>\d+) seconds$"),
        (
            Rule::Interval,
            r"^Advertisement interval\s+(?P<interval>\d+) seconds$",
        ),
        (Rule::NextAdvertisement, r"^Next advertisement in\s+(?P<next>\S+)$"),
        (
            Rule::CandidateRpPriority,
            r"^Candidate RP priority\s*:\s*(?P<priority>\d+)$",
        ),
    ])
});

const REQUIREMENTS: &[Requirement] = &[
    Requirement::required(&["vrf", ANY, "address_family", "ipv4", "rp", "bsr"], &["bsr"]),
    Requirement::required(
        &["vrf", ANY, "address_family", "ipv4", "rp", "bsr", "bsr"],
        &["address", "priority", "hash_mask_length"],
    ),
    Requirement::optional(
        &["vrf", ANY, "address_family", "ipv4", "rp", "bsr", "bsr_candidate"],
        &["address", "priority", "hash_mask_length"],
    ),
    Requirement::required(
        &["vrf", ANY, "address_family", "ipv4", "rp", "bsr", ANY],
        &["interface", "address", "holdtime", "interval", "priority"],
    )
    .except(&["bsr", "bsr_candidate"]),
];

pub struct BsrRouterParser;

impl CommandParser for BsrRouterParser {
    type Rule = Rule;

    fn kind(&self) -> CommandKind {
        CommandKind::BsrRouter
    }

    fn rules(&self) -> &RuleTable<Rule> {
        &RULES
    }

    fn requirements(&self) -> &'static [Requirement] {
        REQUIREMENTS
    }

    fn apply(&self, rule: Rule, caps: &Captures<'_>, ctx: &mut Context, out: &mut RecordBuilder) {
        match rule {
            Rule::BsrAddress => ctx.section = Some(Section::Election),
            Rule::CandidateBsrHeader => {
                ctx.section = Some(Section::CandidateBsr);
                return;
            }
            Rule::CandidateRp => {
                ctx.section = Some(Section::CandidateRp);
                ctx.interface = cap(caps, "interface").map(str::to_string);
            }
            _ => {}
        }

        let base = ["vrf", ctx.vrf(), "address_family", "ipv4", "rp", "bsr"];
        let view = [&base[..], &["bsr"][..]].concat();
        let candidate_bsr = [&base[..], &["bsr_candidate"][..]].concat();

        match rule {
            Rule::BsrAddress => {
                write_str(out, &view, "address", cap(caps, "address"));
                write_str(out, &view, "address_host", cap(caps, "host"));
            }
            Rule::Uptime => {
                write_str(out, &view, "up_time", cap(caps, "up_time"));
                write_int(out, &view, "priority", cap(caps, "priority"));
                write_int(out, &view, "hash_mask_length", cap(caps, "hash"));
            }
            Rule::Expires => write_str(out, &view, "expires", cap(caps, "expires")),
            Rule::NextBootstrap => write_str(out, &base, "bsr_next_bootstrap", cap(caps, "next")),
            Rule::CandidateBsrHeader => {}
            Rule::CandidateBsr => {
                write_str(out, &candidate_bsr, "address", cap(caps, "address"));
                write_int(out, &candidate_bsr, "priority", cap(caps, "priority"));
                write_int(out, &candidate_bsr, "hash_mask_length", cap(caps, "hash"));
            }
            Rule::CandidateRp
            | Rule::Holdtime
            | Rule::Interval
            | Rule::NextAdvertisement
            | Rule::CandidateRpPriority => {
                let interface = match (ctx.section, ctx.interface.as_deref()) {
                    (Some(Section::CandidateRp), Some(interface)) => interface,
                    _ => {
                        debug!(?rule, "Candidate RP attribute outside a candidate RP block");
                        return;
                    }
                };
                let entry = [&base[..], &[interface][..]].concat();
                match rule {
                    Rule::CandidateRp => {
                        out.set(&entry, "interface", interface);
                        write_str(out, &entry, "address", cap(caps, "address"));
                    }
                    Rule::Holdtime => write_int(out, &entry, "holdtime", cap(caps, "holdtime")),
                    Rule::Interval => write_int(out, &entry, "interval", cap(caps, "interval")),
                    Rule::NextAdvertisement => {
                        write_str(out, &entry, "next_advertisment", cap(caps, "next"))
                    }
                    _ => write_int(out, &entry, "priority", cap(caps, "priority")),
                }
            }
        }
    }
}

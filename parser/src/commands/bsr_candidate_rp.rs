//! `show ipv6 pim [vrf <vrf>] bsr candidate-rp`
//!
//! ```text
//! PIMv2 C-RP information
//!   Candidate RP: 2001:3:3:3::3 SM
//!     Priority 5, Holdtime 150
//!     Advertisement interval 60 seconds
//!     Next advertisement in 00:00:48
//! ```

use std::sync::LazyLock;

use pim_show_core::{ANY, CommandKind, RecordBuilder, Requirement};
use regex::Captures;
use tracing::debug;

use crate::engine::rules::cap;
use crate::engine::{CommandParser, Context, RuleTable, Section, write_int, write_str};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Candidate,
    PriorityHoldtime,
    Interval,
    NextAdvertisement,
}

static RULES: LazyLock<RuleTable<Rule>> = LazyLock::new(|| {
    RuleTable::new(&[
        (
            Rule::Candidate,
            r"^Candidate RP:\s*(?P<address>\S+)\s+(?P<mode>[A-Za-z]+)$",
        ),
        (
            Rule::PriorityHoldtime,
            r"^Priority\s+(?P<priority>\d+),\s*Holdtime\s+(?P<holdtime>\d+)$",
        ),
        (
            Rule::Interval,
            r"^Advertisement interval\s+(?P<interval>\d+) seconds$",
        ),
        (Rule::NextAdvertisement, r"^Next advertisement in\s+(?P<next>\S+)$"),
    ])
});

const REQUIREMENTS: &[Requirement] = &[
    Requirement::required(&["vrf", ANY, "address_family", "ipv6", "rp"], &["bsr"]),
    Requirement::required(
        &["vrf", ANY, "address_family", "ipv6", "rp", "bsr", ANY],
        &["address", "priority", "mode", "holdtime", "interval"],
    ),
];

pub struct CandidateRpParser;

impl CommandParser for CandidateRpParser {
    type Rule = Rule;

    fn kind(&self) -> CommandKind {
        CommandKind::Ipv6BsrCandidateRp
    }

    fn rules(&self) -> &RuleTable<Rule> {
        &RULES
    }

    fn requirements(&self) -> &'static [Requirement] {
        REQUIREMENTS
    }

    fn apply(&self, rule: Rule, caps: &Captures<'_>, ctx: &mut Context, out: &mut RecordBuilder) {
        if let Rule::Candidate = rule {
            ctx.rp = cap(caps, "address").map(str::to_string);
            ctx.section = Some(Section::CandidateRp);
        }
        let Some(rp) = ctx.rp.as_deref() else {
            debug!(?rule, "Candidate RP attribute before any candidate header");
            return;
        };
        let bsr = ["vrf", ctx.vrf(), "address_family", "ipv6", "rp", "bsr"];
        let entry = [&bsr[..], &[rp][..]].concat();

        match rule {
            Rule::Candidate => {
                out.set(&entry, "address", rp);
                write_str(out, &entry, "mode", cap(caps, "mode"));
            }
            Rule::PriorityHoldtime => {
                write_int(out, &entry, "priority", cap(caps, "priority"));
                write_int(out, &entry, "holdtime", cap(caps, "holdtime"));
            }
            Rule::Interval => write_int(out, &entry, "interval", cap(caps, "interval")),
            Rule::NextAdvertisement => write_str(
                out,
                &bsr,
                "rp_candidate_next_advertisement",
                cap(caps, "next"),
            ),
        }
    }
}

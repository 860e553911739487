//! `show ipv6 pim [vrf <vrf>] bsr election`
//!
//! Two independent sections: the elected BSR view (`bsr`) and this
//! system's candidacy (`bsr_candidate`). Either may be absent.
//!
//! ```text
//! BSR Election Information
//!   Scope Range List: ff00::/8
//!   This system is the Bootstrap Router (BSR)
//!      BSR Address: 2001:1:1:1::1
//!      Uptime: 00:00:07, BSR Priority: 0, Hash mask length: 126
//!      RPF: FE80::21E:F6FF:FE2D:3600,Loopback0
//!      BS Timer: 00:00:52
//!   This system is candidate BSR
//!       Candidate BSR address: 2001:1:1:1::1, priority: 0, hash mask length: 126
//! ```

use std::sync::LazyLock;

use pim_show_core::{ANY, CommandKind, RecordBuilder, Requirement};
use regex::Captures;
use tracing::debug;

use crate::engine::rules::cap;
use crate::engine::{CommandParser, Context, RuleTable, Section, write_int, write_str};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    ScopeRange,
    ElectedHeader,
    CandidateHeader,
    BsrAddress,
    Uptime,
    Rpf,
    BsTimer,
    CandidateBsr,
}

static RULES: LazyLock<RuleTable<Rule>> = LazyLock::new(|| {
    RuleTable::new(&[
        (Rule::ScopeRange, r"^Scope Range List:\s*(?P<range>\S+)$"),
        (
            Rule::ElectedHeader,
            r"^This system is the Bootstrap Router(?: \(BSR\))?$",
        ),
        (Rule::CandidateHeader, r"^This system is (?:a )?candidate BSR$"),
        (Rule::BsrAddress, r"^BSR Address:\s*(?P<address>\S+)$"),
        (
            Rule::Uptime,
            r"^Uptime:\s*(?P<up_time>[^,\s]+),\s*BSR Priority:\s*(?P<priority>\d+),\s*Hash mask length:\s*(?P<hash>\d+)$",
        ),
        (
            Rule::Rpf,
            r"^RPF:\s*(?P<address>[^,\s]+),\s*(?P<interface>\S+)$",
        ),
        (Rule::BsTimer, r"^BS Timer:\s*(?P<expires>\S+)$"),
        (
            Rule::CandidateBsr,
            r"^Candidate BSR address:\s*(?P<address>[^,\s]+),\s*priority:\s*(?P<priority>\d+),\s*hash mask length:\s*(?P<hash>\d+)$",
        ),
    ])
});

const SECTION_KEYS: &[&str] = &["address", "priority", "hash_mask_length"];

const REQUIREMENTS: &[Requirement] = &[
    Requirement::required(&["vrf", ANY, "address_family", "ipv6", "rp"], &["bsr"]),
    Requirement::optional(
        &["vrf", ANY, "address_family", "ipv6", "rp", "bsr", "bsr"],
        SECTION_KEYS,
    ),
    Requirement::optional(
        &["vrf", ANY, "address_family", "ipv6", "rp", "bsr", "bsr_candidate"],
        SECTION_KEYS,
    ),
];

pub struct BsrElectionParser;

impl CommandParser for BsrElectionParser {
    type Rule = Rule;

    fn kind(&self) -> CommandKind {
        CommandKind::Ipv6BsrElection
    }

    fn rules(&self) -> &RuleTable<Rule> {
        &RULES
    }

    fn requirements(&self) -> &'static [Requirement] {
        REQUIREMENTS
    }

    fn apply(&self, rule: Rule, caps: &Captures<'_>, ctx: &mut Context, out: &mut RecordBuilder) {
        match rule {
            Rule::ScopeRange => {
                ctx.scope_range = cap(caps, "range").map(str::to_string);
                return;
            }
            Rule::ElectedHeader => ctx.section = Some(Section::Election),
            Rule::CandidateHeader => {
                ctx.section = Some(Section::CandidateBsr);
                return;
            }
            // Elected-view lines never belong to the candidacy block.
            Rule::BsrAddress | Rule::Uptime | Rule::Rpf | Rule::BsTimer
                if ctx.section == Some(Section::CandidateBsr) =>
            {
                debug!(?rule, "BSR view line inside the candidate BSR section");
                return;
            }
            _ => {}
        }

        // The scope range only belongs to an elected view that is printed.
        let scope_range = match rule {
            Rule::CandidateBsr => None,
            _ => ctx.scope_range.take(),
        };
        let elected = ["vrf", ctx.vrf(), "address_family", "ipv6", "rp", "bsr", "bsr"];
        let candidate = [
            "vrf",
            ctx.vrf(),
            "address_family",
            "ipv6",
            "rp",
            "bsr",
            "bsr_candidate",
        ];
        if let Some(range) = scope_range {
            out.set(&elected, "scope_range_list", range);
        }
        match rule {
            Rule::BsrAddress => write_str(out, &elected, "address", cap(caps, "address")),
            Rule::Uptime => {
                write_str(out, &elected, "up_time", cap(caps, "up_time"));
                write_int(out, &elected, "priority", cap(caps, "priority"));
                write_int(out, &elected, "hash_mask_length", cap(caps, "hash"));
            }
            Rule::Rpf => {
                write_str(out, &elected, "rpf_address", cap(caps, "address"));
                write_str(out, &elected, "rpf_interface", cap(caps, "interface"));
            }
            Rule::BsTimer => write_str(out, &elected, "expires", cap(caps, "expires")),
            Rule::CandidateBsr => {
                write_str(out, &candidate, "address", cap(caps, "address"));
                write_int(out, &candidate, "priority", cap(caps, "priority"));
                write_int(out, &candidate, "hash_mask_length", cap(caps, "hash"));
            }
            Rule::ScopeRange | Rule::ElectedHeader | Rule::CandidateHeader => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use pim_show_core::CommandKind;
    use serde_json::json;

    use crate::ShowParser;

    #[test]
    fn test_candidate_section_alone() {
        let raw = "\
PIMv2 BSR information

BSR Election Information
  This system is candidate BSR
      Candidate BSR address: 2001:1:1:1::1, priority: 10, hash mask length: 126
";
        let record = ShowParser::new()
            .parse_text(CommandKind::Ipv6BsrElection, None, raw)
            .unwrap();
        assert_eq!(
            record.into_value(),
            json!({"vrf": {"default": {"address_family": {"ipv6": {"rp": {"bsr": {
                "bsr_candidate": {
                    "address": "2001:1:1:1::1",
                    "priority": 10,
                    "hash_mask_length": 126,
                },
            }}}}}}})
        );
    }

    #[test]
    fn test_elected_section_alone() {
        let raw = "\
  Scope Range List: ff00::/8
     BSR Address: 2001:DB8::9
     Uptime: 01:02:03, BSR Priority: 64, Hash mask length: 126
     RPF: FE80::1,GigabitEthernet2
     BS Timer: 00:01:10
";
        let record = ShowParser::new()
            .parse_text(CommandKind::Ipv6BsrElection, Some("red"), raw)
            .unwrap();
        let rp = record
            .get(&["vrf", "red", "address_family", "ipv6", "rp", "bsr"])
            .unwrap();
        assert!(rp.get("bsr_candidate").is_none());
        assert_eq!(rp["bsr"]["scope_range_list"], "ff00::/8");
        assert_eq!(rp["bsr"]["priority"], 64);
        assert_eq!(rp["bsr"]["rpf_interface"], "GigabitEthernet2");
    }

    #[test]
    fn test_bsr_view_line_in_candidate_section_is_ignored() {
        let raw = "\
  This system is candidate BSR
     BSR Address: 2001:DB8::9
";
        let err = ShowParser::new()
            .parse_text(CommandKind::Ipv6BsrElection, None, raw)
            .unwrap_err();
        assert!(err.is_empty(), "{err}");
    }

    #[test]
    fn test_scope_range_with_candidate_only() {
        let raw = "\
BSR Election Information
  Scope Range List: ff00::/8
  This system is candidate BSR
      Candidate BSR address: 2001:1:1:1::1, priority: 0, hash mask length: 126
";
        let record = ShowParser::new()
            .parse_text(CommandKind::Ipv6BsrElection, None, raw)
            .unwrap();
        assert_eq!(
            record.into_value(),
            json!({"vrf": {"default": {"address_family": {"ipv6": {"rp": {"bsr": {
                "bsr_candidate": {
                    "address": "2001:1:1:1::1",
                    "priority": 0,
                    "hash_mask_length": 126,
                },
            }}}}}}})
        );
    }

    #[test]
    fn test_scope_range_alone_is_empty() {
        let err = ShowParser::new()
            .parse_text(CommandKind::Ipv6BsrElection, None, "Scope Range List: ff00::/8\n")
            .unwrap_err();
        assert!(err.is_empty(), "{err}");
    }

    #[test]
    fn test_partial_elected_view_is_missing_key() {
        let raw = "\
  Scope Range List: ff00::/8
  This system is the Bootstrap Router (BSR)
     BSR Address: 2001:DB8::9
";
        let err = ShowParser::new()
            .parse_text(CommandKind::Ipv6BsrElection, None, raw)
            .unwrap_err();
        assert!(err.is_missing_key(), "{err}");
        assert!(err.to_string().contains("bsr.bsr.priority"), "{err}");
    }
}

//! `show ip pim [vrf <vrf>] rp mapping`
//!
//! The same group and RP may be learned through several protocols, so
//! entries are keyed by the composite `(group, rp, protocol)` identity in
//! `rp_mappings` and by `(rp, protocol)` in `rp_list`.
//!
//! ```text
//! Group(s) 224.0.0.0/4
//!   RP 3.3.3.3 (?), v2
//!     Info source: 4.4.4.4 (?), via bootstrap, priority 5, holdtime 150
//!      Uptime: 00:00:19, expires: 00:02:19
//! Group(s): 224.0.0.0/4, Static
//!     RP: 3.3.3.3 (?)
//! ```

use std::sync::LazyLock;

use pim_show_core::{ANY, CommandKind, RecordBuilder, Requirement};
use regex::Captures;
use tracing::debug;

use crate::engine::rules::cap;
use crate::engine::{CommandParser, Context, EntryKey, RuleTable, write_int, write_str};

const STATIC: &str = "static";
const BOOTSTRAP: &str = "bootstrap";
const AUTORP: &str = "autorp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Group,
    StaticRp,
    DynamicRp,
    InfoSource,
    Uptime,
}

static RULES: LazyLock<RuleTable<Rule>> = LazyLock::new(|| {
    RuleTable::new(&[
        (
            Rule::Group,
            r"^Group\(s\):?\s*(?P<group>[^,\s]+)(?P<static>,\s*Static)?$",
        ),
        (
            Rule::StaticRp,
            r"^RP:\s*(?P<rp>[^\s(]+)(?:\s*\((?P<host>[^)]*)\))?$",
        ),
        (
            Rule::DynamicRp,
            r"^RP\s+(?P<rp>[^\s,(]+)(?:\s*\((?P<host>[^)]*)\))?(?:,\s*(?P<version>\S+))?$",
        ),
        (
            Rule::InfoSource,
            r"^Info source:\s*(?P<source>[^\s,(]+)(?:\s*\([^)]*\))?,\s*(?:elected\s+)?via\s+(?P<protocol>bootstrap|Auto-RP)(?:,\s*priority\s+(?P<priority>\d+),\s*holdtime\s+(?P<holdtime>\d+))?$",
        ),
        (
            Rule::Uptime,
            r"^Uptime:\s*(?P<up_time>[^,\s]+),\s*expires:\s*(?P<expires>\S+)$",
        ),
    ])
});

const REQUIREMENTS: &[Requirement] = &[
    Requirement::required(
        &["vrf", ANY, "address_family", "ipv4", "rp"],
        &["rp_mappings", "rp_list"],
    ),
    Requirement::required(
        &["vrf", ANY, "address_family", "ipv4", "rp", "rp_mappings", ANY],
        &["group", "rp_address", "protocol"],
    ),
    Requirement::required(
        &["vrf", ANY, "address_family", "ipv4", "rp", "rp_list", ANY],
        &["address", "info_source_type"],
    ),
];

/// Record paths of the `rp_mappings` and `rp_list` entries of one key.
fn entry_paths<'a>(
    vrf: &'a str,
    mapping_key: &'a str,
    list_key: &'a str,
) -> ([&'a str; 7], [&'a str; 7]) {
    (
        ["vrf", vrf, "address_family", "ipv4", "rp", "rp_mappings", mapping_key],
        ["vrf", vrf, "address_family", "ipv4", "rp", "rp_list", list_key],
    )
}

/// Writes the identity fields of both entries of `key`.
fn open_entry(out: &mut RecordBuilder, vrf: &str, key: &EntryKey, host: Option<&str>) {
    let (mapping_key, list_key) = (key.mapping_key(), key.rp_list_key());
    let (mapping, list) = entry_paths(vrf, &mapping_key, &list_key);

    out.set(&mapping, "group", key.group.as_str());
    out.set(&mapping, "rp_address", key.rp.as_str());
    write_str(out, &mapping, "rp_address_host", host);
    out.set(&mapping, "protocol", key.protocol);

    out.set(&list, "address", key.rp.as_str());
    out.set(&list, "info_source_type", key.protocol);
}

pub struct RpMappingParser;

impl CommandParser for RpMappingParser {
    type Rule = Rule;

    fn kind(&self) -> CommandKind {
        CommandKind::RpMapping
    }

    fn rules(&self) -> &RuleTable<Rule> {
        &RULES
    }

    fn requirements(&self) -> &'static [Requirement] {
        REQUIREMENTS
    }

    fn apply(&self, rule: Rule, caps: &Captures<'_>, ctx: &mut Context, out: &mut RecordBuilder) {
        match rule {
            Rule::Group => {
                if let Some(group) = cap(caps, "group") {
                    let protocol = cap(caps, "static").map(|_| STATIC);
                    ctx.open_group(group, protocol);
                }
            }
            Rule::StaticRp => {
                let (Some(group), Some(rp)) = (ctx.group.clone(), cap(caps, "rp")) else {
                    debug!("Static RP outside a group block");
                    return;
                };
                let key = EntryKey {
                    group,
                    rp: rp.to_string(),
                    protocol: ctx.protocol.unwrap_or(STATIC),
                };
                open_entry(out, ctx.vrf(), &key, cap(caps, "host"));
                ctx.entry = Some(key);
            }
            Rule::DynamicRp => {
                if ctx.group.is_none() {
                    debug!("RP line outside a group block");
                    return;
                }
                ctx.rp = cap(caps, "rp").map(str::to_string);
                ctx.rp_host = cap(caps, "host").map(str::to_string);
                ctx.rp_version = cap(caps, "version").map(str::to_string);
                ctx.entry = None;
            }
            Rule::InfoSource => {
                let (Some(group), Some(rp)) = (ctx.group.clone(), ctx.rp.clone()) else {
                    debug!("Info source before any RP line");
                    return;
                };
                let protocol = match cap(caps, "protocol") {
                    Some("bootstrap") => BOOTSTRAP,
                    _ => AUTORP,
                };
                let key = EntryKey {
                    group,
                    rp,
                    protocol,
                };
                open_entry(out, ctx.vrf(), &key, ctx.rp_host.as_deref());

                let (mapping_key, list_key) = (key.mapping_key(), key.rp_list_key());
                let (mapping, list) = entry_paths(ctx.vrf(), &mapping_key, &list_key);
                write_int(out, &mapping, "priority", cap(caps, "priority"));
                write_int(out, &mapping, "hold_time", cap(caps, "holdtime"));
                write_str(out, &list, "bsr_version", ctx.rp_version.as_deref());
                write_str(out, &list, "info_source_address", cap(caps, "source"));

                ctx.entry = Some(key);
            }
            Rule::Uptime => {
                let Some(key) = ctx.entry.as_ref() else {
                    debug!("Uptime line before any mapping entry");
                    return;
                };
                let (mapping_key, list_key) = (key.mapping_key(), key.rp_list_key());
                let (mapping, list) = entry_paths(ctx.vrf(), &mapping_key, &list_key);
                for path in [&mapping, &list] {
                    write_str(out, path, "up_time", cap(caps, "up_time"));
                    write_str(out, path, "expiration", cap(caps, "expires"));
                }
            }
        }
    }
}

//! Line-oriented scan engine shared by every command parser.
//!
//! # Architecture
//!
//! Each command kind implements [`CommandParser`]: an ordered [`RuleTable`]
//! of anchored recognizers, an `apply` action per rule tag, and a
//! required-field manifest. [`scan`] walks the normalized lines once, top to
//! bottom, hands each non-blank line to the first matching rule and lets
//! the action write into a [`RecordBuilder`] at the path addressed by the
//! [`Context`]. Unmatched lines are skipped and only counted.
//!
//! [`ShowParser`] wraps the scan with the empty-input checks before it and
//! the manifest validation after it.

pub mod context;
pub mod normalize;
pub mod rules;

use std::fmt;

use pim_show_core::{
    CommandKind, DEFAULT_VRF, Record, RecordBuilder, Requirement, validate_record,
};
use regex::Captures;
use tracing::{debug, trace, warn};

use crate::banner::BannerMatcher;
use crate::commands;
use crate::config::{ConfigError, EngineConfig};
use crate::error::{EmptyReason, ParseError};
use crate::report::{ParseRun, ScanReport};
use crate::source::OutputSource;

pub use context::{Context, EntryKey, Section};
pub use normalize::IndexedLine;
pub use rules::RuleTable;

/// Per-command rule set.
pub trait CommandParser {
    /// Rule tag; the `Debug` name is used in scan reports.
    type Rule: Copy + fmt::Debug;

    fn kind(&self) -> CommandKind;
    fn rules(&self) -> &RuleTable<Self::Rule>;
    fn requirements(&self) -> &'static [Requirement];
    fn apply(&self, rule: Self::Rule, caps: &Captures<'_>, ctx: &mut Context, out: &mut RecordBuilder);
}

/// Scans `lines` with `parser`, starting from a fresh context rooted at `vrf`.
pub fn scan<P: CommandParser>(
    parser: &P,
    lines: &[IndexedLine],
    vrf: &str,
    report: &mut ScanReport,
) -> Record {
    let mut ctx = Context::new(vrf);
    let mut out = RecordBuilder::new();
    report.total_lines = lines.len();

    for line in lines {
        let text = line.trimmed();
        if text.is_empty() {
            continue;
        }
        report.relevant_lines += 1;
        match parser.rules().first_match(text) {
            Some((rule, caps)) => {
                trace!(kind = %parser.kind(), line = line.index, ?rule, "Matched rule");
                report.record_hit(format!("{rule:?}"));
                parser.apply(rule, &caps, &mut ctx, &mut out);
            }
            None => {
                trace!(kind = %parser.kind(), line = line.index, text, "Skipped line");
                report.skipped_lines.push(text.to_string());
            }
        }
    }

    out.finish()
}

/// Writes an integer capture, logging instead of failing when it does not
/// fit. A dropped field surfaces later as a missing required key.
pub fn write_int(out: &mut RecordBuilder, path: &[&str], key: &str, raw: Option<&str>) {
    let Some(raw) = raw else {
        return;
    };
    if let Err(err) = out.set_int(path, key, raw) {
        warn!(error = %err, "Dropping non-integer field");
    }
}

/// Writes a string capture when it participated in the match.
pub fn write_str(out: &mut RecordBuilder, path: &[&str], key: &str, raw: Option<&str>) {
    if let Some(raw) = raw {
        out.set(path, key, raw);
    }
}

/// Normalizes the device's boolean vocabulary: `TRUE`/`FALSE` and
/// `enabled`/`disabled` in interface detail, `on`/`off` in the IPv6 table.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "enabled" | "on" => Some(true),
        "false" | "disabled" | "off" => Some(false),
        _ => None,
    }
}

/// Parses PIM show-command output into validated records.
///
/// A `ShowParser` holds only immutable configuration; every call builds its
/// own context and record, so one instance can serve many threads.
///
/// # Examples
///
/// ```
/// use pim_show_core::CommandKind;
/// use pim_show_parser::ShowParser;
///
/// let raw = "\
/// Interface          PIM   Nbr   Hello  DR
///                          Count Intvl  Prior
/// GigabitEthernet3   on    0     30     1
///     Address: FE80::5054:FF:FE84:F097
///     DR     : this system
/// ";
///
/// let record = ShowParser::new()
///     .parse_text(CommandKind::Ipv6Interface, Some("VRF1"), raw)
///     .unwrap();
/// let gi3 = record.get(&["vrf", "VRF1", "interface", "GigabitEthernet3"]).unwrap();
/// assert_eq!(gi3["pim_enabled"], true);
/// assert!(gi3.get("dr_address").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShowParser {
    banners: BannerMatcher,
}

impl ShowParser {
    /// Creates a parser with the default error banners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser honoring the configured extra error banners.
    pub fn with_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        let banners =
            BannerMatcher::with_extra(&config.error_banners).map_err(ConfigError::Banner)?;
        Ok(Self { banners })
    }

    /// Fetches the command output from `source` and parses it.
    ///
    /// Without a VRF the unscoped command is issued and the record is rooted
    /// at [`DEFAULT_VRF`]; with one, the VRF is embedded in the command and
    /// roots the record.
    pub fn parse(
        &self,
        kind: CommandKind,
        source: &dyn OutputSource,
        vrf: Option<&str>,
    ) -> Result<Record, ParseError> {
        self.parse_with_report(kind, source, vrf).result
    }

    /// Like [`parse`](Self::parse), also returning the scan report.
    pub fn parse_with_report(
        &self,
        kind: CommandKind,
        source: &dyn OutputSource,
        vrf: Option<&str>,
    ) -> ParseRun {
        let command = kind.command(vrf);
        debug!(%command, "Fetching command output");
        match source.fetch(&command) {
            Ok(raw) => self.parse_text_with_report(kind, vrf, &raw),
            Err(source) => {
                let mut report = ScanReport::new(kind, &command, vrf.unwrap_or(DEFAULT_VRF));
                let result = Err(ParseError::Source { command, source });
                report.settle(&result);
                ParseRun { result, report }
            }
        }
    }

    /// Parses pre-captured output of `kind`.
    pub fn parse_text(
        &self,
        kind: CommandKind,
        vrf: Option<&str>,
        raw: &str,
    ) -> Result<Record, ParseError> {
        self.parse_text_with_report(kind, vrf, raw).result
    }

    /// Parses pre-captured output of `kind` with line diagnostics.
    pub fn parse_text_with_report(&self, kind: CommandKind, vrf: Option<&str>, raw: &str) -> ParseRun {
        let command = kind.command(vrf);
        let vrf = vrf.unwrap_or(DEFAULT_VRF);
        let mut report = ScanReport::new(kind, &command, vrf);
        let result = self.run(kind, &command, vrf, raw, &mut report);
        report.settle(&result);
        debug!(
            %command,
            outcome = %report.outcome,
            relevant = report.relevant_lines,
            recognized = report.recognized_lines,
            "Parsed command output"
        );
        ParseRun { result, report }
    }

    fn run(
        &self,
        kind: CommandKind,
        command: &str,
        vrf: &str,
        raw: &str,
        report: &mut ScanReport,
    ) -> Result<Record, ParseError> {
        let empty = |reason| ParseError::Empty {
            command: command.to_string(),
            reason,
        };

        if raw.trim().is_empty() {
            return Err(empty(EmptyReason::NoOutput));
        }
        if let Some(banner) = self.banners.find(raw) {
            debug!(%command, banner, "Device returned an error banner");
            return Err(empty(EmptyReason::ErrorBanner(banner.to_string())));
        }

        let lines = normalize::to_indexed_lines(&normalize::normalize_output(raw));
        let record = commands::scan(kind, &lines, vrf, report);
        if record.is_empty() {
            return Err(empty(EmptyReason::NothingRecognized));
        }

        match validate_record(&record, commands::requirements(kind))
            .into_iter()
            .next()
        {
            Some(err) => Err(ParseError::from_schema(command, err)),
            None => Ok(record),
        }
    }
}

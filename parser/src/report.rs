//! Structured scan reporting.

use std::collections::BTreeMap;

use pim_show_core::{CommandKind, Record};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Final state of one parse invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// A validated record was produced.
    Parsed,
    /// Empty output, error banner, or nothing recognized.
    Empty,
    /// Lines were recognized but a required field is absent.
    MissingKey,
    /// The output source failed before parsing began.
    SourceFailed,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parsed => write!(f, "parsed"),
            Self::Empty => write!(f, "empty"),
            Self::MissingKey => write!(f, "missing_key"),
            Self::SourceFailed => write!(f, "source_failed"),
        }
    }
}

/// Line-level diagnostics for one parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub command_kind: CommandKind,
    pub command: String,
    pub vrf: String,
    pub outcome: Outcome,
    pub failure_detail: Option<String>,
    /// All lines in the output, blank ones included.
    pub total_lines: usize,
    /// Non-blank lines.
    pub relevant_lines: usize,
    /// Lines consumed by some rule.
    pub recognized_lines: usize,
    /// Hit count per rule tag.
    pub rule_hits: BTreeMap<String, usize>,
    /// Non-blank lines no rule matched (headers, banners, prompts).
    pub skipped_lines: Vec<String>,
}

impl ScanReport {
    pub fn new(kind: CommandKind, command: &str, vrf: &str) -> Self {
        Self {
            command_kind: kind,
            command: command.to_string(),
            vrf: vrf.to_string(),
            outcome: Outcome::Empty,
            failure_detail: None,
            total_lines: 0,
            relevant_lines: 0,
            recognized_lines: 0,
            rule_hits: BTreeMap::new(),
            skipped_lines: Vec::new(),
        }
    }

    /// Share of non-blank lines recognized by some rule.
    pub fn coverage(&self) -> f64 {
        if self.relevant_lines == 0 {
            return 0.0;
        }
        self.recognized_lines as f64 / self.relevant_lines as f64
    }

    pub(crate) fn record_hit(&mut self, rule: String) {
        self.recognized_lines += 1;
        *self.rule_hits.entry(rule).or_default() += 1;
    }

    pub(crate) fn settle(&mut self, result: &Result<Record, ParseError>) {
        match result {
            Ok(_) => {
                self.outcome = Outcome::Parsed;
                self.failure_detail = None;
            }
            Err(err) => {
                self.outcome = match err {
                    ParseError::Empty { .. } => Outcome::Empty,
                    ParseError::MissingKey { .. } => Outcome::MissingKey,
                    ParseError::Source { .. } => Outcome::SourceFailed,
                };
                self.failure_detail = Some(err.to_string());
            }
        }
    }
}

/// A parse result paired with its report.
#[derive(Debug)]
pub struct ParseRun {
    pub result: Result<Record, ParseError>,
    pub report: ScanReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_of_empty_report_is_zero() {
        let report = ScanReport::new(CommandKind::RpMapping, "show ip pim rp mapping", "default");
        assert_eq!(report.coverage(), 0.0);
    }

    #[test]
    fn test_record_hit_counts_per_rule() {
        let mut report = ScanReport::new(CommandKind::Interface, "show ip pim interface", "default");
        report.relevant_lines = 4;
        report.record_hit("Row".to_string());
        report.record_hit("Row".to_string());
        report.record_hit("Address".to_string());

        assert_eq!(report.recognized_lines, 3);
        assert_eq!(report.rule_hits.get("Row"), Some(&2));
        assert_eq!(report.coverage(), 0.75);
    }

    #[test]
    fn test_outcome_serializes_snake_case() {
        let json = serde_json::to_string(&Outcome::MissingKey).unwrap();
        assert_eq!(json, "\"missing_key\"");
        assert_eq!(Outcome::SourceFailed.to_string(), "source_failed");
    }
}

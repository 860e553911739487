//! PIM show-command output parsing.
//!
//! This crate turns the free-form text a router prints for PIM show
//! commands into validated hierarchical [`Record`]s. One line-oriented scan
//! engine drives a small rule table per command; a required-field manifest
//! is checked once the scan completes.
//!
//! # Main entry points
//!
//! - [`parse_output`]: parse pre-captured text with the default settings.
//! - [`ShowParser::parse`]: fetch the output through an [`OutputSource`]
//!   and parse it.
//! - [`ShowParser::parse_text_with_report`]: same as `parse_text`, with
//!   line-level diagnostics.
//! - [`parse_batch`]: parse many captured files in parallel.
//!
//! # Example
//!
//! ```
//! use pim_show_core::CommandKind;
//! use pim_show_parser::{MapSource, ShowParser};
//!
//! let source = MapSource::new().with(
//!     "show ip pim vrf VRF1 rp mapping",
//!     "PIM Group-to-RP Mappings\n\nGroup(s): 224.0.0.0/4, Static\n    RP: 10.1.5.5 (?)\n",
//! );
//!
//! let record = ShowParser::new()
//!     .parse(CommandKind::RpMapping, &source, Some("VRF1"))
//!     .unwrap();
//! let entry = record
//!     .get(&["vrf", "VRF1", "address_family", "ipv4", "rp", "rp_mappings"])
//!     .and_then(|mappings| mappings.get("224.0.0.0/4 10.1.5.5 static"))
//!     .unwrap();
//! assert_eq!(entry["protocol"], "static");
//! ```
//!
//! Empty output and error banners are reported as [`ParseError::Empty`],
//! incomplete output as [`ParseError::MissingKey`]:
//!
//! ```
//! use pim_show_core::CommandKind;
//! use pim_show_parser::parse_output;
//!
//! let err = parse_output(CommandKind::BsrRouter, None, "").unwrap_err();
//! assert!(err.is_empty());
//! ```
//!
//! [`Record`]: pim_show_core::Record

mod banner;
mod batch;
pub mod commands;
mod config;
pub mod engine;
mod error;
mod output;
mod report;
mod source;

use pim_show_core::{CommandKind, Record};

pub use banner::{BannerMatcher, DEFAULT_BANNERS};
pub use batch::{BatchError, BatchJob, BatchManifest, BatchOutcome, parse_batch};
pub use config::{ConfigError, EngineConfig};
pub use engine::ShowParser;
pub use error::{EmptyReason, ParseError};
pub use output::{OutputFormat, format_record, format_report};
pub use report::{Outcome, ParseRun, ScanReport};
pub use source::{
    DEFAULT_TIMEOUT_MS, MapSource, OutputSource, ProcessSource, ProcessSourceConfig, SourceError,
    StaticSource,
};

/// Parses pre-captured output of `kind` with the default banner set.
///
/// Without a VRF the record is rooted at `"default"`.
pub fn parse_output(kind: CommandKind, vrf: Option<&str>, raw: &str) -> Result<Record, ParseError> {
    ShowParser::new().parse_text(kind, vrf, raw)
}

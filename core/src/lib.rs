//! Core record model for PIM show-command parsing.
//!
//! This crate defines the pieces shared by every command parser:
//!
//! - [`CommandKind`]: the supported show commands and their literal
//!   command text, with or without a VRF scope.
//! - [`Record`]: the finished, insertion-ordered hierarchical result rooted
//!   at `{"vrf": {<vrf>: {...}}}`.
//! - [`RecordBuilder`]: ensure-and-get writer used by parsers to assemble a
//!   record one leaf at a time.
//! - [`Requirement`] / [`validate_record`]: per-command required-field
//!   manifests and their checker.
//!
//! # Example
//!
//! ```
//! use pim_show_core::*;
//!
//! let path = ["vrf", DEFAULT_VRF, "interface", "GigabitEthernet1"];
//! let mut builder = RecordBuilder::new();
//! builder.set(&path, "pim_enabled", true);
//! builder.set_int(&path, "neighbor_count", "1").unwrap();
//!
//! let manifest = [Requirement::required(
//!     &["vrf", ANY, "interface", ANY],
//!     &["pim_enabled", "neighbor_count"],
//! )];
//! let record = builder.finish();
//! assert!(validate_record(&record, &manifest).is_empty());
//! assert_eq!(CommandKind::Ipv6Interface.command(None), "show ipv6 pim interface");
//! ```

mod record;
mod types;
mod validate;

pub use record::{Record, RecordBuilder, RecordError};
pub use types::*;
pub use validate::{ANY, Requirement, SchemaError, validate_record};

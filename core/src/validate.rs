//! Required-field validation for parsed records.
//!
//! Each command publishes a manifest of [`Requirement`]s. A requirement
//! names a scope (a key path where `*` stands for every child mapping) and
//! the keys that must exist in each mapping the scope resolves to.
//!
//! # Examples
//!
//! ```
//! use pim_show_core::*;
//!
//! const MANIFEST: &[Requirement] = &[Requirement::required(
//!     &["vrf", "*", "interface", "*"],
//!     &["pim_enabled", "dr_priority"],
//! )];
//!
//! let mut builder = RecordBuilder::new();
//! builder.set(&["vrf", "default", "interface", "Gi1"], "pim_enabled", true);
//! let errors = validate_record(&builder.finish(), MANIFEST);
//! assert_eq!(
//!     errors,
//!     vec![SchemaError::MissingKey("vrf.default.interface.Gi1.dr_priority".to_string())]
//! );
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

use crate::Record;

/// Segment that matches every child mapping of the current level.
pub const ANY: &str = "*";

/// Record validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A required key is absent. Holds the dotted path of the missing key.
    #[error("missing required key: {0}")]
    MissingKey(String),
    /// A key on a required path holds a scalar where a mapping is expected.
    #[error("expected a mapping at: {0}")]
    NotAMapping(String),
}

/// One required-field rule of a command manifest.
#[derive(Debug, Clone, Copy)]
pub struct Requirement {
    scope: &'static [&'static str],
    keys: &'static [&'static str],
    optional_scope: bool,
    except: &'static [&'static str],
}

impl Requirement {
    /// Requires `scope` to exist and every mapping it resolves to to hold
    /// all of `keys`.
    pub const fn required(scope: &'static [&'static str], keys: &'static [&'static str]) -> Self {
        Self {
            scope,
            keys,
            optional_scope: false,
            except: &[],
        }
    }

    /// Like [`required`](Self::required), but a missing scope is not an
    /// error. Used for independently optional sections.
    pub const fn optional(scope: &'static [&'static str], keys: &'static [&'static str]) -> Self {
        Self {
            scope,
            keys,
            optional_scope: true,
            except: &[],
        }
    }

    /// Excludes the named children from every `*` segment of the scope.
    pub const fn except(mut self, names: &'static [&'static str]) -> Self {
        self.except = names;
        self
    }
}

/// Validates a record against a command manifest.
///
/// Stops at the first violation; the returned list holds at most one error.
pub fn validate_record(record: &Record, manifest: &[Requirement]) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    for requirement in manifest {
        let mut path = Vec::new();
        if let Err(err) = check_scope(record.as_map(), requirement.scope, requirement, &mut path)
        {
            errors.push(err);
            return errors;
        }
    }
    errors
}

fn check_scope<'a>(
    node: &'a Map<String, Value>,
    scope: &[&str],
    requirement: &Requirement,
    path: &mut Vec<&'a str>,
) -> Result<(), SchemaError> {
    let Some((segment, rest)) = scope.split_first() else {
        for key in requirement.keys {
            if !node.contains_key(*key) {
                return Err(SchemaError::MissingKey(dotted(path, Some(*key))));
            }
        }
        return Ok(());
    };

    if *segment == ANY {
        for (name, child) in node {
            if requirement.except.contains(&name.as_str()) {
                continue;
            }
            let Some(child) = child.as_object() else {
                continue;
            };
            path.push(name);
            check_scope(child, rest, requirement, path)?;
            path.pop();
        }
        return Ok(());
    }

    let Some((name, child)) = node.get_key_value(*segment) else {
        if requirement.optional_scope {
            return Ok(());
        }
        return Err(SchemaError::MissingKey(dotted(path, Some(*segment))));
    };
    let Some(child) = child.as_object() else {
        return Err(SchemaError::NotAMapping(dotted(path, Some(*segment))));
    };
    path.push(name);
    check_scope(child, rest, requirement, path)?;
    path.pop();
    Ok(())
}

fn dotted(path: &[&str], leaf: Option<&str>) -> String {
    path.iter()
        .copied()
        .chain(leaf)
        .collect::<Vec<_>>()
        .join(".")
}

//! Failure signals surfaced by a parse invocation.
//!
//! [`ParseError::Empty`] means "nothing to report": the device printed
//! nothing, printed an error banner, or printed nothing any rule recognizes.
//! [`ParseError::MissingKey`] means "something is wrong with this output":
//! lines were recognized but the finished record lacks a required field.
//! Callers match on the variant to tell the two apart.

use pim_show_core::SchemaError;
use thiserror::Error;

use crate::source::SourceError;

/// Why a parse produced no record at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmptyReason {
    /// The raw text was empty or whitespace-only.
    #[error("no output")]
    NoOutput,
    /// The device answered with an error banner instead of data.
    #[error("device error banner: {0}")]
    ErrorBanner(String),
    /// Every line was skipped; no rule produced any field.
    #[error("no line matched a known field")]
    NothingRecognized,
}

/// Errors returned by a single parse invocation.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Empty or unparseable output.
    #[error("empty result for '{command}': {reason}")]
    Empty { command: String, reason: EmptyReason },

    /// The output parsed, but a required field is absent.
    #[error("missing required key for '{command}': {path}")]
    MissingKey { command: String, path: String },

    /// The raw output could not be obtained.
    #[error("failed to fetch output of '{command}': {source}")]
    Source {
        command: String,
        #[source]
        source: SourceError,
    },
}

impl ParseError {
    /// Returns `true` for the empty-input signal.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    /// Returns `true` for the missing-required-field signal.
    pub fn is_missing_key(&self) -> bool {
        matches!(self, Self::MissingKey { .. })
    }

    pub(crate) fn from_schema(command: &str, err: SchemaError) -> Self {
        let path = match err {
            SchemaError::MissingKey(path) | SchemaError::NotAMapping(path) => path,
        };
        Self::MissingKey {
            command: command.to_string(),
            path,
        }
    }
}

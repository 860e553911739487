//! Ordered pattern tables.
//!
//! A [`RuleTable`] pairs a rule tag with an anchored regex. Tables are built
//! once per command kind into a `LazyLock` and shared read-only by every
//! parse.

use regex::{Captures, Regex};

/// Ordered list of `(tag, recognizer)` pairs; the first match wins.
pub struct RuleTable<R> {
    rules: Vec<(R, Regex)>,
}

impl<R: Copy> RuleTable<R> {
    /// Compiles a table from `(tag, pattern)` pairs, keeping their order.
    ///
    /// Patterns are compile-time constants; a pattern that fails to compile
    /// is a programmer error.
    pub fn new(specs: &[(R, &str)]) -> Self {
        let rules = specs
            .iter()
            .map(|(tag, pattern)| {
                (
                    *tag,
                    Regex::new(pattern).expect("static regex must compile"),
                )
            })
            .collect();
        Self { rules }
    }

    /// Returns the first rule whose recognizer matches `line`, with its
    /// captures.
    pub fn first_match<'t>(&self, line: &'t str) -> Option<(R, Captures<'t>)> {
        self.rules
            .iter()
            .find_map(|(tag, regex)| regex.captures(line).map(|caps| (*tag, caps)))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Returns the text of a named capture, if it participated in the match.
pub fn cap<'t>(caps: &Captures<'t>, name: &str) -> Option<&'t str> {
    caps.name(name).map(|m| m.as_str())
}

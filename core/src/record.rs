//! Hierarchical parse records and the in-place builder that assembles them.
//!
//! A [`Record`] is an insertion-ordered JSON-style mapping rooted at
//! `{"vrf": {<vrf>: {...}}}`. Parsers never construct nested maps by hand;
//! they name a path and a leaf and let [`RecordBuilder`] create intermediate
//! levels on demand.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A finished, parsed command record.
///
/// Serializes transparently to the nested mapping, so JSON/YAML output uses
/// exactly the keys the parsers wrote.
///
/// # Examples
///
/// ```
/// use pim_show_core::RecordBuilder;
///
/// let mut builder = RecordBuilder::new();
/// builder.set(&["vrf", "default", "interface", "Gi1"], "pim_enabled", true);
/// let record = builder.finish();
///
/// assert_eq!(record.vrfs().collect::<Vec<_>>(), vec!["default"]);
/// assert_eq!(
///     record.get(&["vrf", "default", "interface", "Gi1", "pim_enabled"]),
///     Some(&serde_json::Value::Bool(true))
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Returns the root mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up a value by key path.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.0.get(*first)?;
        for segment in rest {
            current = current.as_object()?.get(*segment)?;
        }
        Some(current)
    }

    /// VRF names present at the root, in encounter order.
    pub fn vrfs(&self) -> impl Iterator<Item = &str> {
        self.0
            .get("vrf")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|vrfs| vrfs.keys().map(String::as_str))
    }

    /// Converts the record into a plain [`Value`].
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}

/// Errors raised while writing into a [`RecordBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A capture expected to be numeric could not be coerced to an integer.
    #[error("field '{key}' is not an integer: {raw}")]
    NotAnInteger { key: String, raw: String },
}

/// Builds a [`Record`] in place.
///
/// Every write names a path of mapping keys plus a leaf key; missing
/// intermediate mappings are created on demand and existing ones are reused,
/// so writes from different lines merge into the same sub-mapping.
///
/// # Examples
///
/// ```
/// use pim_show_core::RecordBuilder;
///
/// let path = ["vrf", "default", "interface", "Null0"];
/// let mut builder = RecordBuilder::new();
/// builder.set_int(&path, "hello_interval", "30").unwrap();
/// builder.push(&path, "address", "FE80::1");
/// builder.push(&path, "address", "2001:DB8::1");
///
/// let record = builder.finish();
/// assert_eq!(
///     record.get(&["vrf", "default", "interface", "Null0", "address"]).unwrap(),
///     &serde_json::json!(["FE80::1", "2001:DB8::1"])
/// );
/// ```
#[derive(Debug, Default)]
pub struct RecordBuilder {
    root: Map<String, Value>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mapping at `path`, creating every missing level.
    ///
    /// A non-mapping value sitting on the path is replaced by an empty
    /// mapping.
    pub fn ensure(&mut self, path: &[&str]) -> &mut Map<String, Value> {
        let mut node = &mut self.root;
        for segment in path {
            node = descend(node, segment);
        }
        node
    }

    /// Writes `value` under `key` at `path`, replacing any previous value.
    pub fn set(&mut self, path: &[&str], key: &str, value: impl Into<Value>) {
        self.ensure(path).insert(key.to_string(), value.into());
    }

    /// Writes an integer parsed from `raw` under `key` at `path`.
    ///
    /// Nothing is written when `raw` is not an integer.
    pub fn set_int(&mut self, path: &[&str], key: &str, raw: &str) -> Result<(), RecordError> {
        let number = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| RecordError::NotAnInteger {
                key: key.to_string(),
                raw: raw.to_string(),
            })?;
        self.set(path, key, number);
        Ok(())
    }

    /// Appends `value` to the list stored under `key` at `path`.
    pub fn push(&mut self, path: &[&str], key: &str, value: impl Into<Value>) {
        let slot = self
            .ensure(path)
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(items) => items.push(value.into()),
            other => {
                let previous = other.take();
                *other = Value::Array(vec![previous, value.into()]);
            }
        }
    }

    /// Returns `true` when no write has happened yet.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Finishes building and returns the record.
    pub fn finish(self) -> Record {
        Record(self.root)
    }
}

fn descend<'a>(node: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let slot = node
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot holds a mapping after normalization"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_writes_merge_into_shared_parent() {
        let mut builder = RecordBuilder::new();
        builder.set(&["vrf", "VRF1", "interface", "Gi3"], "pim_enabled", true);
        builder
            .set_int(&["vrf", "VRF1", "interface", "Gi3"], "dr_priority", "1")
            .unwrap();
        builder.set(&["vrf", "VRF1", "interface", "Lo1"], "pim_enabled", false);

        assert_eq!(
            builder.finish().into_value(),
            json!({"vrf": {"VRF1": {"interface": {
                "Gi3": {"pim_enabled": true, "dr_priority": 1},
                "Lo1": {"pim_enabled": false},
            }}}})
        );
    }

    #[test]
    fn test_set_int_rejects_non_numeric_without_writing() {
        let mut builder = RecordBuilder::new();
        let err = builder
            .set_int(&["vrf", "default"], "holdtime", "150s")
            .unwrap_err();
        assert_eq!(
            err,
            RecordError::NotAnInteger {
                key: "holdtime".to_string(),
                raw: "150s".to_string()
            }
        );
        assert!(builder.is_empty());
    }

    #[test]
    fn test_push_preserves_encounter_order() {
        let mut builder = RecordBuilder::new();
        builder.push(&["a"], "address", "FE80::1");
        builder.push(&["a"], "address", "2001:DB8::1");
        builder.push(&["a"], "address", "2001:DB8::2");
        assert_eq!(
            builder.finish().get(&["a", "address"]),
            Some(&json!(["FE80::1", "2001:DB8::1", "2001:DB8::2"]))
        );
    }

    #[test]
    fn test_ensure_creates_empty_mapping() {
        let mut builder = RecordBuilder::new();
        builder.ensure(&["vrf", "default", "sm"]);
        assert_eq!(builder.finish().into_value(), json!({"vrf": {"default": {"sm": {}}}}));
    }

    #[test]
    fn test_record_keeps_insertion_order() {
        let mut builder = RecordBuilder::new();
        builder.set(&["vrf", "default", "interface"], "Tunnel4", 1);
        builder.set(&["vrf", "default", "interface"], "Null0", 2);
        builder.set(&["vrf", "default", "interface"], "Loopback0", 3);
        let record = builder.finish();
        let keys: Vec<&str> = record
            .get(&["vrf", "default", "interface"])
            .and_then(Value::as_object)
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["Tunnel4", "Null0", "Loopback0"]);
    }

    #[test]
    fn test_get_on_missing_path_is_none() {
        let record = RecordBuilder::new().finish();
        assert!(record.get(&["vrf"]).is_none());
        assert!(record.get(&[]).is_none());
        assert_eq!(record.vrfs().count(), 0);
    }
}

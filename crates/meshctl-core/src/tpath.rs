//! Dotted-path access into YAML configuration trees
//!
//! Paths are dot separated (`components.pilot.namespace`). A segment of the
//! form `[key:value]` selects the element of a sequence whose mapping has
//! `key == value`, e.g. `components.ingressGateways.[name:istio-ingressgateway].enabled`.
//!
//! Mapping keys are matched exactly first and then with the first character
//! lower-cased, so struct-style paths (`Components.Pilot.Namespace`) resolve
//! against YAML keys (`components.pilot.namespace`).

use crate::error::{Error, Result};
use crate::types::lower_first;
use serde_yaml_ng::{Mapping, Value};

/// Split a dotted path into segments, keeping `[k:v]` selectors intact
pub fn split_path(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    for (i, c) in path.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                if i > start {
                    segments.push(&path[start..i]);
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < path.len() {
        segments.push(&path[start..]);
    }
    segments
}

/// Parse a `[key:value]` selector segment
fn parse_selector(segment: &str) -> Option<(&str, &str)> {
    segment
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .and_then(|s| s.split_once(':'))
}

fn mapping_get<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(key).or_else(|| map.get(lower_first(key).as_str()))
}

fn find_selected<'a>(seq: &'a [Value], key: &str, want: &str) -> Option<&'a Value> {
    seq.iter()
        .find(|item| item.get(key).and_then(Value::as_str) == Some(want))
}

/// Look up the node at `path`.
///
/// Returns `None` when any segment is absent or traverses a scalar.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut node = root;
    for segment in split_path(path) {
        node = match (node, parse_selector(segment)) {
            (Value::Sequence(seq), Some((key, want))) => find_selected(seq, key, want)?,
            (Value::Mapping(map), None) => mapping_get(map, segment)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Set the node at `path` to `value`, creating intermediate mappings and
/// selected sequence elements as needed
pub fn set(root: &mut Value, path: &str, value: Value) -> Result<()> {
    let segments = split_path(path);
    if segments.is_empty() {
        return Err(Error::invalid_override(path, "empty path"));
    }
    set_segments(root, path, &segments, value)
}

fn set_segments(node: &mut Value, path: &str, segments: &[&str], value: Value) -> Result<()> {
    let (segment, rest) = match segments.split_first() {
        Some(split) => split,
        None => {
            *node = value;
            return Ok(());
        }
    };

    if node.is_null() {
        *node = if parse_selector(segment).is_some() {
            Value::Sequence(Vec::new())
        } else {
            Value::Mapping(Mapping::new())
        };
    }

    match (node, parse_selector(segment)) {
        (Value::Sequence(seq), Some((key, want))) => {
            let idx = match seq
                .iter()
                .position(|item| item.get(key).and_then(Value::as_str) == Some(want))
            {
                Some(idx) => idx,
                None => {
                    let mut entry = Mapping::new();
                    entry.insert(Value::from(key), Value::from(want));
                    seq.push(Value::Mapping(entry));
                    seq.len() - 1
                }
            };
            set_segments(&mut seq[idx], path, rest, value)
        }
        (Value::Mapping(map), None) => {
            let key = if map.contains_key(*segment) {
                segment.to_string()
            } else if map.contains_key(lower_first(segment).as_str()) {
                lower_first(segment)
            } else {
                segment.to_string()
            };
            let child = map.entry(Value::from(key)).or_insert(Value::Null);
            set_segments(child, path, rest, value)
        }
        (other, _) => Err(Error::invalid_override(
            path,
            format!("segment '{}' traverses a {}", segment, kind_name(other)),
        )),
    }
}

/// Interpret an override value the way YAML would (`true`, `5`, `a`)
pub fn parse_scalar(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    match serde_yaml_ng::from_str::<Value>(raw) {
        Ok(v @ (Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Null)) => v,
        _ => Value::String(raw.to_string()),
    }
}

/// Short type name of a YAML node, for diagnostics
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}

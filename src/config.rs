//! Configuration flattening - hierarchical params to dotted key-value pairs
//!
//! Training configuration arrives as an arbitrarily nested tree (mappings,
//! sequences, leaf scalars). The tracking backend stores flat parameter
//! records, so the tree is walked depth-first and every leaf is emitted as
//! one `(dotted.path, value)` pair.

use serde_json::Value;

/// Flatten a configuration tree into `(path, value)` pairs.
///
/// `serde_json::Value` is the crate's configuration node type: a leaf
/// scalar, a mapping of nodes, or a sequence of nodes. The walk descends
/// mappings with `parent.key` and sequences with `parent.index`, and emits
/// exactly one pair per leaf. A flat mapping is just the depth-1 case.
///
/// Leaf rendering: strings are taken verbatim (no surrounding quotes),
/// every other scalar uses its JSON rendering (`0.1`, `true`, `null`).
///
/// ## Example
///
/// ```rust
/// use bitacora::config::flatten_params;
///
/// let params = serde_json::json!({"opt": {"lr": 0.1, "layers": [64, 32]}});
/// let flat = flatten_params(&params);
///
/// assert_eq!(flat.len(), 3);
/// assert!(flat.contains(&("opt.lr".to_string(), "0.1".to_string())));
/// assert!(flat.contains(&("opt.layers.0".to_string(), "64".to_string())));
/// assert!(flat.contains(&("opt.layers.1".to_string(), "32".to_string())));
/// ```
#[must_use]
pub fn flatten_params(params: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    match params {
        Value::Object(map) => {
            for (key, value) in map {
                walk(key.clone(), value, &mut out);
            }
        }
        Value::Array(seq) => {
            for (idx, value) in seq.iter().enumerate() {
                walk(idx.to_string(), value, &mut out);
            }
        }
        // A bare scalar has no path to join; nothing to log.
        _ => {}
    }
    out
}

fn walk(path: String, node: &Value, out: &mut Vec<(String, String)>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                walk(format!("{path}.{key}"), value, out);
            }
        }
        Value::Array(seq) => {
            for (idx, value) in seq.iter().enumerate() {
                walk(format!("{path}.{idx}"), value, out);
            }
        }
        Value::String(s) => out.push((path, s.clone())),
        leaf => out.push((path, leaf.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_mapping_passes_through() {
        let flat = flatten_params(&json!({"lr": 0.1, "epochs": 10}));
        assert!(flat.contains(&("lr".to_string(), "0.1".to_string())));
        assert!(flat.contains(&("epochs".to_string(), "10".to_string())));
        assert_eq!(flat.len(), 2);
    }

    #[test]
    fn test_nested_mapping_and_sequence() {
        let flat = flatten_params(&json!({"opt": {"lr": 0.1, "layers": [64, 32]}}));
        assert_eq!(flat.len(), 3);
        assert!(flat.contains(&("opt.lr".to_string(), "0.1".to_string())));
        assert!(flat.contains(&("opt.layers.0".to_string(), "64".to_string())));
        assert!(flat.contains(&("opt.layers.1".to_string(), "32".to_string())));
    }

    #[test]
    fn test_three_levels_deep() {
        let flat = flatten_params(&json!({
            "model": {"encoder": {"dims": [8, 16], "act": "relu"}}
        }));
        assert!(flat.contains(&("model.encoder.dims.0".to_string(), "8".to_string())));
        assert!(flat.contains(&("model.encoder.dims.1".to_string(), "16".to_string())));
        assert!(flat.contains(&("model.encoder.act".to_string(), "relu".to_string())));
    }

    #[test]
    fn test_strings_render_unquoted() {
        let flat = flatten_params(&json!({"optim": "adam"}));
        assert_eq!(flat, vec![("optim".to_string(), "adam".to_string())]);
    }

    #[test]
    fn test_scalar_root_emits_nothing() {
        assert!(flatten_params(&json!(42)).is_empty());
        assert!(flatten_params(&json!("adam")).is_empty());
    }

    #[test]
    fn test_null_and_bool_leaves() {
        let flat = flatten_params(&json!({"resume": null, "shuffle": true}));
        assert!(flat.contains(&("resume".to_string(), "null".to_string())));
        assert!(flat.contains(&("shuffle".to_string(), "true".to_string())));
    }

    #[test]
    fn test_top_level_sequence() {
        let flat = flatten_params(&json!([1, {"a": 2}]));
        assert!(flat.contains(&("0".to_string(), "1".to_string())));
        assert!(flat.contains(&("1.a".to_string(), "2".to_string())));
    }
}

//! Deep merge for layered YAML documents.
//!
//! Higher-priority documents override lower-priority ones key by key.
//! Mappings merge recursively; sequences, scalars and nulls replace.

use serde_json::{Map, Value};

/// Deep merge two values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Arrays, strings, numbers, booleans and nulls in overlay replace base entirely
///
/// # Example
/// ```
/// use serde_json::json;
/// use cleanconfig::config::deep_merge;
///
/// let base = json!({
///     "server": { "port": 8080, "host": "localhost" },
///     "features": ["a", "b"]
/// });
/// let overlay = json!({
///     "server": { "port": 9000 },
///     "features": ["c"]
/// });
/// let result = deep_merge(base, overlay);
/// assert_eq!(result["server"]["host"], "localhost");
/// assert_eq!(result["server"]["port"], 9000);
/// assert_eq!(result["features"], json!(["c"]));
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Value::Object(merge_maps(base_map, overlay_map))
        }
        (_, overlay) => overlay,
    }
}

/// Merge two mappings, `overlay` winning on conflicts.
pub fn merge_maps(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, overlay_value) in overlay {
        let merged_value = match base.remove(&key) {
            Some(base_value) => deep_merge(base_value, overlay_value),
            None => overlay_value,
        };
        base.insert(key, merged_value);
    }
    base
}

/// Merge mappings in order, with later mappings taking precedence.
pub fn deep_merge_all(maps: impl IntoIterator<Item = Map<String, Value>>) -> Map<String, Value> {
    maps.into_iter().fold(Map::new(), merge_maps)
}

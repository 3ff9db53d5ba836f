//! Dot-separated path access into nested JSON objects.

use serde_json::{Map, Value};

/// Split `"a.b.c"` into its segments. An empty path has no segments.
pub fn split_path(path: &str) -> Vec<&str> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split('.').collect()
}

/// Walk `keys` through nested objects. `None` if any segment is missing or
/// lands on something that is not an object, or if `keys` is empty.
pub fn get_path<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let (first, rest) = keys.split_first()?;
    let found = value.as_object()?.get(*first)?;
    if rest.is_empty() {
        Some(found)
    } else {
        get_path(found, rest)
    }
}

pub fn get_object_value(value: &Value, path: &str, default: Value) -> Value {
    get_path(value, &split_path(path))
        .cloned()
        .unwrap_or(default)
}

/// Assign `new_value` at `keys`, returning whether it was written.
///
/// Missing intermediates are created only when `create_missing` is set. An
/// existing intermediate that is not an object gets replaced by one.
pub fn set_path(map: &mut Map<String, Value>, keys: &[&str], new_value: Value, create_missing: bool) -> bool {
    let Some((first, rest)) = keys.split_first() else {
        return false;
    };

    if rest.is_empty() {
        if !map.contains_key(*first) && !create_missing {
            return false;
        }
        map.insert(first.to_string(), new_value);
        return true;
    }

    if !map.contains_key(*first) {
        if !create_missing {
            return false;
        }
        map.insert(first.to_string(), Value::Object(Map::new()));
    }
    let Some(child) = map.get_mut(*first) else {
        return false;
    };
    if !child.is_object() {
        *child = Value::Object(Map::new());
    }
    match child.as_object_mut() {
        Some(child) => set_path(child, rest, new_value, create_missing),
        None => false,
    }
}

/// [`set_path`] on a dotted path. Fails when `target` is not an object.
pub fn set_object_value(target: &mut Value, path: &str, new_value: Value, create_missing: bool) -> bool {
    match target.as_object_mut() {
        Some(map) => set_path(map, &split_path(path), new_value, create_missing),
        None => false,
    }
}

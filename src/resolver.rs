use serde_json::Value;

/// Priority-ordered field resolution over raw persisted records
///
/// Stored property records arrive with keys from any of three naming
/// conventions (current camelCase, legacy PascalCase Mongo, snake_case
/// Supabase). Every logical field declares its candidate keys explicitly
/// as data and the resolver walks them in order; no reflection, no key
/// guessing.

/// Returns the first candidate key whose value is present and not JSON
/// null.
///
/// `0`, `false`, and `""` are deliberately NOT treated as absent; callers
/// needing "meaningful value" semantics must check explicitly.
pub fn resolve<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let obj = record.as_object()?;
    for key in keys {
        if let Some(value) = obj.get(*key) {
            if !value.is_null() {
                return Some(value);
            }
        }
    }
    None
}

/// Resolves a field to an owned string, coercing scalar JSON values.
///
/// Numbers and booleans become their display form; missing or
/// non-scalar values become an empty string.
pub fn resolve_string(record: &Value, keys: &[&str]) -> String {
    resolve(record, keys).map(scalar_to_string).unwrap_or_default()
}

/// Resolves a field to a boolean using the source's loose truthiness:
/// JSON `true`, non-zero numbers, and the strings "true"/"yes" (any
/// case) all count.
pub fn resolve_bool(record: &Value, keys: &[&str]) -> bool {
    resolve(record, keys).map(value_truthy).unwrap_or(false)
}

/// Loose truthiness for a single JSON value.
pub fn value_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Value::String(s) => {
            let lower = s.trim().to_ascii_lowercase();
            lower == "true" || lower == "yes"
        }
        _ => false,
    }
}

/// Resolves a field to an array reference, if any candidate holds one.
pub fn resolve_array<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    resolve(record, keys)?.as_array()
}

/// Coerces a scalar JSON value to its string form.
pub fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Sentinel strings that mean "no value" when rendering read-only views.
const INVALID_DISPLAY_VALUES: &[&str] = &["", "n/a", "-", "--", "---", "null", "undefined"];

/// Returns true if the string carries a real value worth displaying.
///
/// Used only by the read-only comparison view; the editing normalizer
/// keeps sentinel strings as-is so users can see what was stored.
pub fn is_valid_display_value(raw: &str) -> bool {
    let normalized = raw.trim().to_ascii_lowercase();
    !INVALID_DISPLAY_VALUES.contains(&normalized.as_str())
}

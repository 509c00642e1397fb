//! Lenient typed lookups into a `serde_json::Value` parameter object.
//!
//! Every helper takes a JSON value, a key and a default. A missing key or a
//! value of the wrong type yields the default, so configuration loading from
//! user JSON never fails here; range checks happen later in `validate()`.

use serde_json::Value;

static NULL: Value = Value::Null;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// JSON integers are accepted and widened to f64.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing or wrong type.
///
/// Only non-negative integers are accepted; floats fall back to `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Returns the nested object at `params[name]`, or `Value::Null` when absent.
///
/// `Null` is a valid input to every other helper (all lookups miss), so a
/// missing section simply means "all defaults".
pub fn param_section<'a>(params: &'a Value, name: &str) -> &'a Value {
    params.get(name).unwrap_or(&NULL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- param_f64 --

    #[test]
    fn param_f64_extracts_existing_float() {
        let params = json!({"keep_out_radius": 42.5});
        assert!((param_f64(&params, "keep_out_radius", 1.0) - 42.5).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_extracts_integer_as_float() {
        let params = json!({"grid_spacing": 40});
        assert!((param_f64(&params, "grid_spacing", 0.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_key_missing() {
        let params = json!({"other": 1.0});
        assert!((param_f64(&params, "spawn_rate", 3.0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_wrong_type() {
        let params = json!({"spawn_rate": "lots"});
        assert!((param_f64(&params, "spawn_rate", 3.0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_null_params() {
        assert!((param_f64(&Value::Null, "spawn_rate", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    // -- param_usize --

    #[test]
    fn param_usize_extracts_existing_integer() {
        let params = json!({"max_particles": 500});
        assert_eq!(param_usize(&params, "max_particles", 0), 500);
    }

    #[test]
    fn param_usize_returns_default_for_float_value() {
        let params = json!({"max_particles": 2.5});
        assert_eq!(param_usize(&params, "max_particles", 200), 200);
    }

    #[test]
    fn param_usize_returns_default_for_negative_integer() {
        let params = json!({"max_particles": -1});
        assert_eq!(param_usize(&params, "max_particles", 200), 200);
    }

    // -- param_section --

    #[test]
    fn param_section_returns_nested_object() {
        let params = json!({"field": {"grid_spacing": 20}});
        let field = param_section(&params, "field");
        assert_eq!(param_usize(field, "grid_spacing", 0), 20);
    }

    #[test]
    fn param_section_missing_yields_null_and_defaults() {
        let params = json!({});
        let field = param_section(&params, "field");
        assert!(field.is_null());
        assert!((param_f64(field, "grid_spacing", 35.0) - 35.0).abs() < f64::EPSILON);
    }
}

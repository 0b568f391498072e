//! Shape inspection for raw JSON question records.

use serde_json::Value;

/// Human-readable kind of a JSON value, used in finding messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Returns the value as an integer when it is a JSON integer.
///
/// Floats such as `1.0` and booleans are not integers.
pub fn integer_value(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        _ => None,
    }
}

/// Whether a field is missing or carries no content.
///
/// `null`, blank strings, empty arrays and empty objects count as blank.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

/// Returns the value as a count when it is a non-negative JSON integer.
pub fn count_value(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|n| usize::try_from(n).ok())
}

/// Whether a value is a strictly positive number.
pub fn is_positive_number(value: &Value) -> bool {
    value.as_f64().is_some_and(|n| n > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(true)), "boolean");
        assert_eq!(json_type_name(&json!(3)), "integer");
        assert_eq!(json_type_name(&json!(-3)), "integer");
        assert_eq!(json_type_name(&json!(1.5)), "float");
        assert_eq!(json_type_name(&json!("1")), "string");
        assert_eq!(json_type_name(&json!([1])), "array");
        assert_eq!(json_type_name(&json!({"a": 1})), "object");
    }

    #[test]
    fn test_integer_value() {
        assert_eq!(integer_value(&json!(2)), Some(2));
        assert_eq!(integer_value(&json!(-1)), Some(-1));
        assert_eq!(integer_value(&json!(u64::MAX)), Some(u64::MAX as i128));
        assert_eq!(integer_value(&json!(1.0)), None);
        assert_eq!(integer_value(&json!(true)), None);
        assert_eq!(integer_value(&json!("1")), None);
    }

    #[test]
    fn test_count_value() {
        assert_eq!(count_value(&json!(12)), Some(12));
        assert_eq!(count_value(&json!(0)), Some(0));
        assert_eq!(count_value(&json!(-1)), None);
        assert_eq!(count_value(&json!(12.0)), None);
        assert_eq!(count_value(&json!("12")), None);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&json!(null))));
        assert!(is_blank(Some(&json!("   "))));
        assert!(is_blank(Some(&json!([]))));
        assert!(is_blank(Some(&json!({}))));
        assert!(!is_blank(Some(&json!("1.2"))));
        assert!(!is_blank(Some(&json!(["tag"]))));
        assert!(!is_blank(Some(&json!(0))));
    }

    #[test]
    fn test_is_positive_number() {
        assert!(is_positive_number(&json!(45)));
        assert!(is_positive_number(&json!(0.5)));
        assert!(!is_positive_number(&json!(0)));
        assert!(!is_positive_number(&json!(-2)));
        assert!(!is_positive_number(&json!("60")));
    }
}

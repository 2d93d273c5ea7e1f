use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Whitespace, currency symbol and thousands separators.
static SALARY_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s$,]").expect("salary noise regex should compile"));

/// 1) Render a cell the way it would print: strings as-is, `null` as empty.
pub fn cell_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 2) `"$ 1,000,000"` → `1000000.0`. `None` unless the result is finite and non-negative.
pub fn parse_salary(raw: &str) -> Option<f64> {
    SALARY_NOISE
        .replace_all(raw, "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        // `-0` becomes `0`
        .map(|v| v + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_salary_strips_noise() {
        assert_eq!(parse_salary("$1,000,000"), Some(1_000_000.0));
        assert_eq!(parse_salary(" $ 507,500 "), Some(507_500.0));
        assert_eq!(parse_salary("$1,000.50"), Some(1000.5));
        assert_eq!(parse_salary("12\u{a0}000"), Some(12_000.0));
    }

    #[test]
    fn test_parse_salary_rejects_garbage() {
        assert_eq!(parse_salary("no salary data"), None);
        assert_eq!(parse_salary(""), None);
        assert_eq!(parse_salary("nan"), None);
        assert_eq!(parse_salary("inf"), None);
        assert_eq!(parse_salary("-$5,000"), None);
    }

    #[test]
    fn test_negative_zero_salary_is_plain_zero() {
        for raw in ["-0", "$-0", "-0.00"] {
            let v = parse_salary(raw).unwrap();
            assert_eq!(v, 0.0);
            assert!(v.is_sign_positive(), "{} kept its sign", raw);
        }
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&json!("$5")), "$5");
        assert_eq!(cell_to_string(&json!(5)), "5");
        assert_eq!(cell_to_string(&json!(5.5)), "5.5");
        assert_eq!(cell_to_string(&Value::Null), "");
    }
}

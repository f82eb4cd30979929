//! Built-in field rules
//!
//! Each variant carries its own options. A rule inspects exactly one value
//! and, on failure, adds one error with a stable code to the result.
//!
//! Value semantics follow loosely typed record data: a value is "set" when
//! present and not null, numeric checks accept numeric strings, and
//! comparisons between incomparable values never fail.

use std::cmp::Ordering;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::Value;

use super::messages as msg;
use super::result::ValidationResult;
use super::validator::{FieldContext, FieldValidator};
use crate::fields::Pattern;

/// A built-in validation rule
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    String,
    StringEmpty,
    RegEx(Pattern),
    Number,
    Integer,
    Boolean,
    MinStringLength(usize),
    MaxStringLength(usize),
    MinValue(Value),
    MaxValue(Value),
    Selection(Vec<String>),
    MultiSelection(Vec<String>),
    ListEmpty,
    Date,
    Time,
    DateTime,
}

impl Rule {
    /// The primary error code of this rule
    pub fn code(&self) -> &'static str {
        match self {
            Rule::Required => msg::REQUIRED,
            Rule::String => msg::NOT_A_STRING,
            Rule::StringEmpty => msg::STRING_EMPTY,
            Rule::RegEx(_) => msg::NO_REGEX_MATCH,
            Rule::Number => msg::NOT_A_NUMBER,
            Rule::Integer => msg::NOT_AN_INTEGER,
            Rule::Boolean => msg::NOT_A_BOOLEAN,
            Rule::MinStringLength(_) => msg::MIN_STRING_LENGTH,
            Rule::MaxStringLength(_) => msg::MAX_STRING_LENGTH,
            Rule::MinValue(_) => msg::MIN_VALUE,
            Rule::MaxValue(_) => msg::MAX_VALUE,
            Rule::Selection(_) | Rule::MultiSelection(_) => msg::NO_SELECTION_MATCH,
            Rule::ListEmpty => msg::LIST_EMPTY,
            Rule::Date => msg::NOT_A_DATE,
            Rule::Time => msg::NOT_A_TIME,
            Rule::DateTime => msg::NOT_A_DATETIME,
        }
    }

    /// Checks a value. `value` is the raw model value (`None` when absent).
    /// Returns the failing code, or `None` when the value passes.
    pub fn check(&self, value: Option<&Value>) -> Option<&'static str> {
        let set = value.filter(|v| !v.is_null());

        let failed = match self {
            Rule::Required => set.is_none(),
            Rule::String => set.is_some_and(|v| !v.is_string()),
            Rule::StringEmpty => set.and_then(Value::as_str).is_some_and(str::is_empty),
            Rule::RegEx(pattern) => set
                .and_then(Value::as_str)
                .is_some_and(|s| !pattern.is_match(s)),
            Rule::Number => set.is_some_and(|v| js_to_number(v).is_nan() || v.as_str() == Some("")),
            Rule::Integer => set.is_some_and(|v| !integer_regex().is_match(&js_to_string(v))),
            Rule::Boolean => set.is_some_and(|v| !v.is_boolean()),
            Rule::MinStringLength(n) => set
                .and_then(Value::as_str)
                .is_some_and(|s| s.chars().count() < *n),
            Rule::MaxStringLength(n) => set
                .and_then(Value::as_str)
                .is_some_and(|s| s.chars().count() > *n),
            Rule::MinValue(min) => {
                set.is_some_and(|v| js_compare(v, min) == Some(Ordering::Less))
            }
            Rule::MaxValue(max) => {
                set.is_some_and(|v| js_compare(v, max) == Some(Ordering::Greater))
            }
            Rule::Selection(keys) => set.is_some_and(|v| !is_selection_key(v, keys)),
            Rule::MultiSelection(keys) => match set {
                None => false,
                Some(Value::Array(items)) => !items.iter().all(|v| is_selection_key(v, keys)),
                Some(_) => return Some(msg::NOT_A_LIST),
            },
            Rule::ListEmpty => set
                .and_then(Value::as_array)
                .is_some_and(|items| items.is_empty()),
            Rule::Date => set.is_some_and(|v| !parses(v, |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok())),
            Rule::Time => set.is_some_and(|v| !parses(v, |s| NaiveTime::parse_from_str(s, "%H:%M:%S").is_ok())),
            Rule::DateTime => set.is_some_and(|v| {
                !parses(v, |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok())
            }),
        };

        failed.then(|| self.code())
    }

    /// Message for a failure of this rule
    pub fn message(&self, code: &str, label: &str) -> String {
        match (self, code) {
            (_, msg::NOT_A_LIST) => msg::not_a_list(label),
            (Rule::Required, _) => msg::required(label),
            (Rule::String, _) => msg::not_a_string(label),
            (Rule::StringEmpty, _) => msg::string_empty(label),
            (Rule::RegEx(_), _) => msg::no_regex_match(label),
            (Rule::Number, _) => msg::not_a_number(label),
            (Rule::Integer, _) => msg::not_an_integer(label),
            (Rule::Boolean, _) => msg::not_a_boolean(label),
            (Rule::MinStringLength(n), _) => msg::min_string_length(label, *n),
            (Rule::MaxStringLength(n), _) => msg::max_string_length(label, *n),
            (Rule::MinValue(v), _) => msg::min_value(label, v),
            (Rule::MaxValue(v), _) => msg::max_value(label, v),
            (Rule::Selection(_) | Rule::MultiSelection(_), _) => msg::no_selection_match(label),
            (Rule::ListEmpty, _) => msg::list_empty(label),
            (Rule::Date, _) => msg::not_a_date(label),
            (Rule::Time, _) => msg::not_a_time(label),
            (Rule::DateTime, _) => msg::not_a_datetime(label),
        }
    }
}

impl FieldValidator for Rule {
    fn validate(&self, ctx: &FieldContext<'_>, result: &mut ValidationResult) {
        if let Some(code) = self.check(ctx.raw_value()) {
            result.add_field_error(
                &ctx.field.name,
                self.message(code, ctx.field.display_name()),
                code,
            );
        }
    }
}

fn integer_regex() -> &'static Regex {
    static INTEGER: OnceLock<Regex> = OnceLock::new();
    INTEGER.get_or_init(|| Regex::new(r"^(-?[1-9][0-9]*|0)$").expect("integer pattern compiles"))
}

fn parses(value: &Value, parse: impl Fn(&str) -> bool) -> bool {
    value.as_str().is_some_and(parse)
}

fn is_selection_key(value: &Value, keys: &[String]) -> bool {
    match value {
        Value::String(s) => keys.iter().any(|k| k == s),
        Value::Number(_) | Value::Bool(_) => {
            let s = js_to_string(value);
            keys.iter().any(|k| *k == s)
        }
        _ => false,
    }
}

/// Numeric coercion; `NaN` for values with no numeric reading
pub(crate) fn js_to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => string_to_number(s),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] if !single.is_array() && !single.is_object() => {
                string_to_number(&js_to_string(single))
            }
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

fn string_to_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return f64::NAN;
        }
        return hex
            .chars()
            .filter_map(|c| c.to_digit(16))
            .fold(0.0, |acc, d| acc * 16.0 + f64::from(d));
    }
    // Rust also accepts "inf" and "nan"; only plain decimal notation counts here
    let decimal = t
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if decimal {
        t.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// String form of a value as a loosely typed language would print it
pub(crate) fn js_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                format_float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::Array(items) => items
            .iter()
            .map(|v| if v.is_null() { String::new() } else { js_to_string(v) })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{:.0}", f)
    } else if f.abs() >= 1e21 {
        format!("{:e}", f)
    } else {
        f.to_string()
    }
}

/// Relational comparison: strings compare lexically, everything else
/// numerically. `None` when either side has no numeric reading.
pub(crate) fn js_compare(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Value::String(x), Value::String(y)) = (a, b) {
        return Some(x.cmp(y));
    }
    if a.is_object() || b.is_object() {
        return None;
    }
    js_to_number(a).partial_cmp(&js_to_number(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fails(rule: &Rule, value: Value) -> bool {
        rule.check(Some(&value)).is_some()
    }

    #[test]
    fn test_required() {
        assert_eq!(Rule::Required.check(None), Some("required"));
        assert!(fails(&Rule::Required, Value::Null));
        assert!(!fails(&Rule::Required, json!("")));
        assert!(!fails(&Rule::Required, json!(0)));
        assert!(!fails(&Rule::Required, json!(false)));
    }

    #[test]
    fn test_string() {
        assert!(fails(&Rule::String, json!(1)));
        assert!(!fails(&Rule::String, json!("a")));
        assert!(!fails(&Rule::String, Value::Null));
        assert!(Rule::String.check(None).is_none());
    }

    #[test]
    fn test_string_empty() {
        assert!(fails(&Rule::StringEmpty, json!("")));
        assert!(!fails(&Rule::StringEmpty, json!(" ")));
        assert!(!fails(&Rule::StringEmpty, json!(0)));
    }

    #[test]
    fn test_regex_only_checks_strings() {
        let rule = Rule::RegEx(Pattern::new("^[0-9]{3}$").unwrap());
        assert!(!fails(&rule, json!("123")));
        assert!(fails(&rule, json!("12a")));
        assert!(!fails(&rule, json!(12)));
    }

    #[test]
    fn test_number() {
        assert!(!fails(&Rule::Number, json!(3.5)));
        assert!(!fails(&Rule::Number, json!("42")));
        assert!(!fails(&Rule::Number, json!("  7 ")));
        assert!(!fails(&Rule::Number, json!(true)));
        assert!(fails(&Rule::Number, json!("")));
        assert!(fails(&Rule::Number, json!("abc")));
        assert!(fails(&Rule::Number, json!("inf")));
        assert!(fails(&Rule::Number, json!({"a": 1})));
        assert!(fails(&Rule::Number, json!([1, 2])));
        assert!(!fails(&Rule::Number, Value::Null));
    }

    #[test]
    fn test_number_hex_strings() {
        assert!(!fails(&Rule::Number, json!("0x1F")));
        assert!(!fails(&Rule::Number, json!("0X10000000000000000")));
        assert!(fails(&Rule::Number, json!("0x-1")));
        assert!(fails(&Rule::Number, json!("0x+1")));
        assert!(fails(&Rule::Number, json!("0x")));
        assert!(fails(&Rule::Number, json!("0xfg")));

        assert_eq!(js_to_number(&json!("0x1F")), 31.0);
        assert_eq!(js_to_number(&json!("0x10000000000000000")), 18446744073709551616.0);
    }

    #[test]
    fn test_integer_accepts() {
        for v in [json!("0"), json!("-5"), json!("42"), json!(42), json!(-7), json!(5.0)] {
            assert!(!fails(&Rule::Integer, v.clone()), "{} should be an integer", v);
        }
    }

    #[test]
    fn test_integer_rejects() {
        for v in [json!("007"), json!("3.14"), json!("abc"), json!(3.14), json!("-0"), json!(true)] {
            assert!(fails(&Rule::Integer, v.clone()), "{} should not be an integer", v);
        }
    }

    #[test]
    fn test_boolean() {
        assert!(!fails(&Rule::Boolean, json!(false)));
        assert!(fails(&Rule::Boolean, json!("true")));
        assert!(fails(&Rule::Boolean, json!(1)));
    }

    #[test]
    fn test_length_rules_ignore_non_strings() {
        let min = Rule::MinStringLength(3);
        let max = Rule::MaxStringLength(3);
        assert!(fails(&min, json!("ab")));
        assert!(!fails(&min, json!("abc")));
        assert!(fails(&max, json!("abcd")));
        assert!(!fails(&max, json!("abc")));

        for v in [json!(1), json!(12345), json!([1, 2, 3, 4]), json!(true)] {
            assert!(!fails(&min, v.clone()));
            assert!(!fails(&max, v));
        }
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(!fails(&Rule::MaxStringLength(3), json!("héé")));
    }

    #[test]
    fn test_value_bounds() {
        let min = Rule::MinValue(json!(10));
        let max = Rule::MaxValue(json!(20));
        assert!(fails(&min, json!(9)));
        assert!(!fails(&min, json!(10)));
        assert!(fails(&min, json!("9")));
        assert!(fails(&max, json!(20.5)));
        assert!(!fails(&max, json!(20)));
        // Incomparable values never fail
        assert!(!fails(&min, json!("abc")));
        assert!(!fails(&max, json!({"x": 1})));
    }

    #[test]
    fn test_string_bounds_compare_lexically() {
        let min = Rule::MinValue(json!("2020-01-01"));
        assert!(fails(&min, json!("2019-12-31")));
        assert!(!fails(&min, json!("2020-06-01")));
    }

    #[test]
    fn test_selection() {
        let rule = Rule::Selection(vec!["S".into(), "1".into()]);
        assert!(!fails(&rule, json!("S")));
        assert!(!fails(&rule, json!(1)));
        assert!(fails(&rule, json!("XL")));
        assert!(fails(&rule, json!(["S"])));
    }

    #[test]
    fn test_multi_selection() {
        let rule = Rule::MultiSelection(vec!["a".into(), "b".into()]);
        assert_eq!(rule.check(Some(&json!(["a", "b"]))), None);
        assert_eq!(rule.check(Some(&json!(["a", "z"]))), Some("no_selection_match"));
        assert_eq!(rule.check(Some(&json!("a"))), Some("not_a_list"));
        assert!(fails(&Rule::ListEmpty, json!([])));
    }

    #[test]
    fn test_date_and_time_formats() {
        assert!(!fails(&Rule::Date, json!("2024-02-29")));
        assert!(fails(&Rule::Date, json!("2023-02-29")));
        assert!(fails(&Rule::Date, json!(20240101)));
        assert!(!fails(&Rule::Time, json!("23:59:59")));
        assert!(fails(&Rule::Time, json!("24:00:00")));
        assert!(!fails(&Rule::DateTime, json!("2024-01-01T10:00:00")));
        assert!(fails(&Rule::DateTime, json!("2024-01-01 10:00")));
    }

    #[test]
    fn test_js_string_forms() {
        assert_eq!(js_to_string(&json!(5.0)), "5");
        assert_eq!(js_to_string(&json!(3.25)), "3.25");
        assert_eq!(js_to_string(&json!([1, "a"])), "1,a");
    }
}

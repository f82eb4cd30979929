//! Validation error codes and message templates
//!
//! Codes are stable and meant for lookup (e.g. translation tables in a UI
//! layer). Messages are English defaults built from the field label.

use serde_json::Value;

pub const REQUIRED: &str = "required";
pub const NOT_A_STRING: &str = "not_a_string";
pub const STRING_EMPTY: &str = "string_empty";
pub const NO_REGEX_MATCH: &str = "no_regex_match";
pub const NOT_A_NUMBER: &str = "not_a_number";
pub const NOT_AN_INTEGER: &str = "not_an_integer";
pub const NOT_A_BOOLEAN: &str = "not_a_boolean";
pub const MIN_STRING_LENGTH: &str = "min_string_length";
pub const MAX_STRING_LENGTH: &str = "max_string_length";
pub const MIN_VALUE: &str = "min_value";
pub const MAX_VALUE: &str = "max_value";
pub const NO_SELECTION_MATCH: &str = "no_selection_match";
pub const NOT_A_LIST: &str = "not_a_list";
pub const LIST_EMPTY: &str = "list_empty";
pub const NOT_A_DATE: &str = "not_a_date";
pub const NOT_A_TIME: &str = "not_a_time";
pub const NOT_A_DATETIME: &str = "not_a_datetime";
pub const EXTRA_FIELD: &str = "extra_field";
pub const VALIDATION_ERROR: &str = "validation_error";

pub fn required(label: &str) -> String {
    format!("{} is a required field", label)
}

pub fn not_a_string(label: &str) -> String {
    format!("{} should be a string", label)
}

pub fn string_empty(label: &str) -> String {
    format!("{} must not be empty", label)
}

pub fn no_regex_match(label: &str) -> String {
    format!("{} is not in the correct format", label)
}

pub fn not_a_number(label: &str) -> String {
    format!("{} should be a number", label)
}

pub fn not_an_integer(label: &str) -> String {
    format!("{} should be a whole number", label)
}

pub fn not_a_boolean(label: &str) -> String {
    format!("{} should be either true or false", label)
}

pub fn min_string_length(label: &str, length: usize) -> String {
    format!("{} must be at least {} characters", label, length)
}

pub fn max_string_length(label: &str, length: usize) -> String {
    format!("{} must be at most {} characters", label, length)
}

pub fn min_value(label: &str, value: &Value) -> String {
    format!("{} must be at least {}", label, display_value(value))
}

pub fn max_value(label: &str, value: &Value) -> String {
    format!("{} must be at most {}", label, display_value(value))
}

pub fn no_selection_match(label: &str) -> String {
    format!("{} contains an invalid selection", label)
}

pub fn not_a_list(label: &str) -> String {
    format!("{} should be a list of selections", label)
}

pub fn list_empty(label: &str) -> String {
    format!("{} must have at least one selection", label)
}

pub fn not_a_date(label: &str) -> String {
    format!("{} should be a date (YYYY-MM-DD)", label)
}

pub fn not_a_time(label: &str) -> String {
    format!("{} should be a time (HH:MM:SS)", label)
}

pub fn not_a_datetime(label: &str) -> String {
    format!("{} should be a date and time (YYYY-MM-DDTHH:MM:SS)", label)
}

pub fn extra_field(name: &str) -> String {
    format!("Field '{}' does not exist in model metadata", name)
}

pub fn validation_error() -> String {
    "The model failed validation".to_string()
}

/// Strings render without quotes
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

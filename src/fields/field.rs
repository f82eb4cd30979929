//! Field definitions
//!
//! A field is a named, typed attribute of a model. Its kind and options
//! determine the built-in rules it is validated with; custom validators can
//! be attached in code.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{FieldKind, FieldOptions, Pattern};
use crate::error::{ModelError, ModelResult};
use crate::validation::{
    AsyncFieldValidator, FieldContext, FieldValidator, FnFieldValidator, Rule, ValidationResult,
};

const EMAIL_PATTERN: &str =
    r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$";
const URL_PATTERN: &str = r"^(?:https?|ftp)://[^\s/$.?#][^\s]*$";

static EMAIL_REGEX: OnceLock<Pattern> = OnceLock::new();
static URL_REGEX: OnceLock<Pattern> = OnceLock::new();

fn builtin_pattern(cell: &'static OnceLock<Pattern>, source: &str) -> Pattern {
    cell.get_or_init(|| {
        Pattern::from(regex::Regex::new(source).expect("built-in pattern compiles"))
    })
    .clone()
}

/// Field definition
#[derive(Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name, unique within a model
    pub name: String,

    /// Display label used in validation messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub kind: FieldKind,

    #[serde(flatten)]
    pub options: FieldOptions,

    #[serde(skip)]
    validators: Vec<Arc<dyn FieldValidator>>,

    #[serde(skip)]
    async_validators: Vec<Arc<dyn AsyncFieldValidator>>,

    /// Rules kept once the definition is registered
    #[serde(skip)]
    frozen_rules: OnceLock<Vec<Rule>>,
}

impl FieldDef {
    /// Create a field of the given kind with default options
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let mut options = FieldOptions::default();
        if kind == FieldKind::AutoNumber {
            options.required = false;
        }
        Self {
            name: name.into(),
            label: None,
            kind,
            options,
            validators: Vec::new(),
            async_validators: Vec::new(),
            frozen_rules: OnceLock::new(),
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Email)
    }

    pub fn url(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Url)
    }

    pub fn password(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Password)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn auto_number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::AutoNumber)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn time(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Time)
    }

    pub fn date_time(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::DateTime)
    }

    /// Create a single-choice field over `[key, label]` pairs
    pub fn selection(name: impl Into<String>, options: &[(&str, &str)]) -> Self {
        Self::new(name, FieldKind::Selection).with_selection(options)
    }

    /// Create a multiple-choice field over `[key, label]` pairs
    pub fn multi_selection(name: impl Into<String>, options: &[(&str, &str)]) -> Self {
        Self::new(name, FieldKind::MultiSelection).with_selection(options)
    }

    fn with_selection(mut self, options: &[(&str, &str)]) -> Self {
        self.options.selection = Some(
            options
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.options.required = required;
        self
    }

    /// Shorthand for `required(false)`
    pub fn optional(self) -> Self {
        self.required(false)
    }

    pub fn allow_empty(mut self) -> Self {
        self.options.allow_empty = true;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.options.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.options.max_length = Some(length);
        self
    }

    pub fn min_value(mut self, value: impl Into<Value>) -> Self {
        self.options.min_value = Some(value.into());
        self
    }

    pub fn max_value(mut self, value: impl Into<Value>) -> Self {
        self.options.max_value = Some(value.into());
        self
    }

    pub fn regex(mut self, pattern: Pattern) -> Self {
        self.options.regex = Some(pattern);
        self
    }

    /// Attach a custom synchronous validator; runs after the built-in rules
    pub fn with_validator(mut self, validator: impl FieldValidator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Attach a closure as a synchronous validator
    pub fn with_validator_fn<F>(self, f: F) -> Self
    where
        F: Fn(&FieldContext<'_>, &mut ValidationResult) + Send + Sync + 'static,
    {
        self.with_validator(FnFieldValidator::new(f))
    }

    /// Attach an asynchronous validator
    pub fn with_async_validator(mut self, validator: impl AsyncFieldValidator + 'static) -> Self {
        self.async_validators.push(Arc::new(validator));
        self
    }

    /// Label if set, otherwise the field name
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Whether a value must be set
    pub fn is_required(&self) -> bool {
        self.options.required && self.kind != FieldKind::AutoNumber
    }

    /// Built-in rules for this field, in evaluation order.
    ///
    /// Borrowed once the definition has been registered, derived from the
    /// options otherwise.
    pub fn rules(&self) -> Cow<'_, [Rule]> {
        match self.frozen_rules.get() {
            Some(rules) => Cow::Borrowed(rules),
            None => Cow::Owned(self.derive_rules()),
        }
    }

    /// Derive the rules once and keep them. Only called on definitions that
    /// can no longer change.
    pub(crate) fn freeze_rules(&self) {
        self.frozen_rules.get_or_init(|| self.derive_rules());
    }

    fn derive_rules(&self) -> Vec<Rule> {
        let mut rules = Vec::new();
        let opts = &self.options;

        if self.is_required() {
            rules.push(Rule::Required);
        }

        match self.kind {
            FieldKind::Text | FieldKind::Email | FieldKind::Url | FieldKind::Password => {
                rules.push(Rule::String);
                if self.is_required() && !opts.allow_empty {
                    rules.push(Rule::StringEmpty);
                }
                if let Some(n) = opts.min_length {
                    rules.push(Rule::MinStringLength(n));
                }
                if let Some(n) = opts.max_length {
                    rules.push(Rule::MaxStringLength(n));
                }
                self.push_value_rules(&mut rules);
                let pattern = match (&opts.regex, self.kind) {
                    (Some(p), _) => Some(p.clone()),
                    (None, FieldKind::Email) => Some(builtin_pattern(&EMAIL_REGEX, EMAIL_PATTERN)),
                    (None, FieldKind::Url) => Some(builtin_pattern(&URL_REGEX, URL_PATTERN)),
                    (None, _) => None,
                };
                if let Some(p) = pattern {
                    rules.push(Rule::RegEx(p));
                }
            }
            FieldKind::Number => {
                rules.push(Rule::Number);
                self.push_value_rules(&mut rules);
            }
            FieldKind::Integer => {
                rules.push(Rule::Number);
                rules.push(Rule::Integer);
                self.push_value_rules(&mut rules);
            }
            FieldKind::AutoNumber => {}
            FieldKind::Boolean => rules.push(Rule::Boolean),
            FieldKind::Selection => rules.push(Rule::Selection(opts.selection_keys())),
            FieldKind::MultiSelection => {
                rules.push(Rule::MultiSelection(opts.selection_keys()));
                if self.is_required() {
                    rules.push(Rule::ListEmpty);
                }
            }
            FieldKind::Date => {
                rules.push(Rule::Date);
                self.push_value_rules(&mut rules);
            }
            FieldKind::Time => {
                rules.push(Rule::Time);
                self.push_value_rules(&mut rules);
            }
            FieldKind::DateTime => {
                rules.push(Rule::DateTime);
                self.push_value_rules(&mut rules);
            }
        }

        rules
    }

    fn push_value_rules(&self, rules: &mut Vec<Rule>) {
        if let Some(v) = &self.options.min_value {
            rules.push(Rule::MinValue(v.clone()));
        }
        if let Some(v) = &self.options.max_value {
            rules.push(Rule::MaxValue(v.clone()));
        }
    }

    /// Custom synchronous validators, in attachment order
    pub fn validators(&self) -> &[Arc<dyn FieldValidator>] {
        &self.validators
    }

    pub fn async_validators(&self) -> &[Arc<dyn AsyncFieldValidator>] {
        &self.async_validators
    }

    /// Checks the definition itself (not a value)
    pub fn check(&self) -> ModelResult<()> {
        let invalid = |reason: String| ModelError::InvalidField {
            field: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("field name must not be empty".into()));
        }

        if let (Some(min), Some(max)) = (self.options.min_length, self.options.max_length) {
            if min > max {
                return Err(invalid(format!(
                    "min_length {} is greater than max_length {}",
                    min, max
                )));
            }
        }

        if self.kind.needs_selection() {
            let keys = self.options.selection_keys();
            if keys.is_empty() {
                return Err(invalid(format!(
                    "{} fields need a non-empty selection list",
                    self.kind
                )));
            }
            let unique: HashSet<&String> = keys.iter().collect();
            if unique.len() != keys.len() {
                return Err(invalid("selection keys must be unique".into()));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("validators", &self.validators.len())
            .field("async_validators", &self.async_validators.len())
            .finish()
    }
}

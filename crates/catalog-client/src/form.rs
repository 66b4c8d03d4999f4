//! Declarative form state with per-field validation rules.
//!
//! A form is keyed by a small `Copy + Ord` enum implementing [`FieldKey`].
//! Fields are declared once through [`FormBuilder`]; afterwards values only
//! change through [`Form::set_value`], [`Form::set_values`] and [`Form::reset`].
//!
//! ```
//! use catalog_client::form::{Field, FieldKey, Form};
//! use catalog_client::rules::{min, numeric, required};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
//! enum Signup { Age }
//!
//! impl FieldKey for Signup {
//!     fn name(self) -> &'static str { "age" }
//! }
//!
//! let mut form = Form::builder()
//!     .field(Signup::Age, Field::new("").rule(required()).rule(numeric()).rule(min(18.0)))
//!     .build();
//! form.set_value(Signup::Age, "17");
//! assert!(!form.validate());
//! assert_eq!(form.error(Signup::Age), "Must be at least 18");
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Identifies a field. `name` is the wire name used by [`Form::values_as`]
/// and in the fallback error message.
pub trait FieldKey: Copy + Ord + Debug + Send + Sync + 'static {
    fn name(self) -> &'static str;
}

/// Dynamically typed field value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Null, the empty string and the empty list are empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        }
    }

    /// A number, or text that parses as one (surrounding whitespace allowed).
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        (!n.is_nan()).then_some(n)
    }

    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s),
            FieldValue::Null => Cow::Borrowed(""),
            FieldValue::Bool(b) => Cow::Owned(b.to_string()),
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
            FieldValue::List(items) => Cow::Owned(
                items
                    .iter()
                    .map(|v| v.to_text().into_owned())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::List(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(f64::from(n))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Snapshot of every field value.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues<K: FieldKey>(BTreeMap<K, FieldValue>);

impl<K: FieldKey> FormValues<K> {
    pub fn get(&self, key: K) -> Option<&FieldValue> {
        self.0.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &FieldValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    /// JSON object keyed by [`FieldKey::name`].
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.name().to_owned(), v.to_json()))
                .collect(),
        )
    }

    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }
}

pub type RuleResult = Result<(), String>;

type RuleFn<K> = dyn Fn(&FieldValue, &FormValues<K>) -> RuleResult + Send + Sync;

/// A validation rule. `Err(message)` fails the field; an empty message is
/// replaced by `Invalid <name>`.
pub struct Rule<K: FieldKey> {
    check: Arc<RuleFn<K>>,
}

impl<K: FieldKey> Clone for Rule<K> {
    fn clone(&self) -> Self {
        Self {
            check: Arc::clone(&self.check),
        }
    }
}

impl<K: FieldKey> Rule<K> {
    pub fn new(check: impl Fn(&FieldValue) -> RuleResult + Send + Sync + 'static) -> Self {
        Self {
            check: Arc::new(move |value, _| check(value)),
        }
    }

    /// A rule that may read sibling fields.
    pub fn with_values(
        check: impl Fn(&FieldValue, &FormValues<K>) -> RuleResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            check: Arc::new(check),
        }
    }

    /// Replace the failure message.
    pub fn message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        let inner = self.check;
        Self {
            check: Arc::new(move |value, values| {
                inner(value, values).map_err(|_| message.clone())
            }),
        }
    }

    pub fn check(&self, value: &FieldValue, values: &FormValues<K>) -> RuleResult {
        (self.check)(value, values)
    }
}

/// Field declaration: initial value, optional reset default, ordered rules.
pub struct Field<K: FieldKey> {
    value: FieldValue,
    default: Option<FieldValue>,
    rules: Vec<Rule<K>>,
}

impl<K: FieldKey> Field<K> {
    pub fn new(value: impl Into<FieldValue>) -> Self {
        Self {
            value: value.into(),
            default: None,
            rules: Vec::new(),
        }
    }

    /// Value restored by [`Form::reset`]. Without one, reset keeps the current value.
    pub fn with_default(mut self, default: impl Into<FieldValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn rule(mut self, rule: Rule<K>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule<K>>) -> Self {
        self.rules.extend(rules);
        self
    }
}

pub struct FormBuilder<K: FieldKey> {
    fields: BTreeMap<K, Field<K>>,
}

impl<K: FieldKey> Default for FormBuilder<K> {
    fn default() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }
}

impl<K: FieldKey> FormBuilder<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `key`. Declaring the same key twice keeps the last declaration.
    pub fn field(mut self, key: K, field: Field<K>) -> Self {
        self.fields.insert(key, field);
        self
    }

    pub fn build(self) -> Form<K> {
        let mut values = BTreeMap::new();
        let mut slots = BTreeMap::new();
        for (key, field) in self.fields {
            values.insert(key, field.value);
            slots.insert(
                key,
                Slot {
                    default: field.default,
                    rules: field.rules,
                    error: String::new(),
                },
            );
        }
        Form {
            slots,
            values: FormValues(values),
            loading: false,
            dirty: false,
        }
    }
}

struct Slot<K: FieldKey> {
    default: Option<FieldValue>,
    rules: Vec<Rule<K>>,
    error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOptions {
    pub reset_on_success: bool,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            reset_on_success: true,
        }
    }
}

/// Errors that carry per-field messages, e.g. server-side validation.
///
/// Implement with an empty body for error types without field detail.
pub trait FieldErrors<K: FieldKey> {
    fn field_errors(&self) -> Vec<(K, String)> {
        Vec::new()
    }
}

pub struct Form<K: FieldKey> {
    slots: BTreeMap<K, Slot<K>>,
    values: FormValues<K>,
    loading: bool,
    dirty: bool,
}

impl<K: FieldKey> Form<K> {
    pub fn builder() -> FormBuilder<K> {
        FormBuilder::new()
    }

    pub fn value(&self, key: K) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn values(&self) -> &FormValues<K> {
        &self.values
    }

    /// Typed view of the current values.
    pub fn values_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        self.values.deserialize()
    }

    /// Current error for `key`; empty when valid or undeclared.
    pub fn error(&self, key: K) -> &str {
        self.slots.get(&key).map_or("", |slot| slot.error.as_str())
    }

    /// Error message per declared field, empty string when valid.
    pub fn errors(&self) -> BTreeMap<K, String> {
        self.slots
            .iter()
            .map(|(k, slot)| (*k, slot.error.clone()))
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        self.slots.values().any(|slot| !slot.error.is_empty())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Ignored for undeclared keys.
    pub fn set_value(&mut self, key: K, value: impl Into<FieldValue>) {
        if let Some(slot) = self.values.0.get_mut(&key) {
            *slot = value.into();
            self.dirty = true;
        }
    }

    /// Set several values at once. Undeclared keys are skipped.
    pub fn set_values<V: Into<FieldValue>>(&mut self, values: impl IntoIterator<Item = (K, V)>) {
        for (key, value) in values {
            if let Some(slot) = self.values.0.get_mut(&key) {
                *slot = value.into();
            }
        }
        self.dirty = true;
    }

    /// Restore defaults and clear every error.
    pub fn reset(&mut self) {
        self.reset_with(std::iter::empty::<(K, FieldValue)>());
    }

    /// Like [`Form::reset`], but `overrides` win over defaults.
    pub fn reset_with<V: Into<FieldValue>>(&mut self, overrides: impl IntoIterator<Item = (K, V)>) {
        let mut overrides: BTreeMap<K, FieldValue> = overrides
            .into_iter()
            .map(|(k, v)| (k, v.into()))
            .collect();
        for (key, slot) in self.slots.iter_mut() {
            let next = overrides.remove(key).or_else(|| slot.default.clone());
            if let (Some(next), Some(value)) = (next, self.values.0.get_mut(key)) {
                *value = next;
            }
            slot.error.clear();
        }
        self.dirty = false;
    }

    /// Run `key`'s rules in order, stopping at the first failure.
    ///
    /// Undeclared keys and fields without rules are valid.
    pub fn validate_field(&mut self, key: K) -> bool {
        let Some(slot) = self.slots.get(&key) else {
            return true;
        };
        let value = self.values.get(key).cloned().unwrap_or_default();
        let failure = slot
            .rules
            .iter()
            .find_map(|rule| rule.check(&value, &self.values).err())
            .map(|message| {
                if message.is_empty() {
                    format!("Invalid {}", key.name())
                } else {
                    message
                }
            });

        if let Some(slot) = self.slots.get_mut(&key) {
            match failure {
                Some(message) => {
                    slot.error = message;
                    return false;
                }
                None => slot.error.clear(),
            }
        }
        true
    }

    /// Validate every field, even after a failure, so all messages are populated.
    pub fn validate(&mut self) -> bool {
        let keys: Vec<K> = self.slots.keys().copied().collect();
        keys.into_iter()
            .fold(true, |all_valid, key| self.validate_field(key) && all_valid)
    }

    /// Validate, then hand the values to `submit`.
    ///
    /// Returns `Ok(None)` without calling `submit` when validation fails. On a
    /// submit error, field messages exposed through [`FieldErrors`] are merged
    /// into the form before the error is returned.
    pub async fn handle_submit<R, E, F, Fut>(
        &mut self,
        submit: F,
        options: SubmitOptions,
    ) -> Result<Option<R>, E>
    where
        F: FnOnce(FormValues<K>) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: FieldErrors<K>,
    {
        if !self.validate() {
            return Ok(None);
        }

        self.loading = true;
        let result = submit(self.values.clone()).await;
        self.loading = false;

        match result {
            Ok(value) => {
                if options.reset_on_success {
                    self.reset();
                }
                Ok(Some(value))
            }
            Err(e) => {
                for (key, message) in e.field_errors() {
                    if let Some(slot) = self.slots.get_mut(&key) {
                        slot.error = message;
                    }
                }
                Err(e)
            }
        }
    }
}

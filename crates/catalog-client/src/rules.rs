//! Stock validation rules.
//!
//! Every rule except [`required`] passes on an empty value, so optional
//! fields can still carry format rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::form::{FieldKey, FieldValue, Rule};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("valid email regex")
});

fn fail(message: impl Into<String>) -> Result<(), String> {
    Err(message.into())
}

pub fn required<K: FieldKey>() -> Rule<K> {
    Rule::new(|value| {
        if value.is_empty() {
            fail("This field is required")
        } else {
            Ok(())
        }
    })
}

pub fn email<K: FieldKey>() -> Rule<K> {
    Rule::new(|value| {
        if value.is_empty() {
            return Ok(());
        }
        if EMAIL_RE.is_match(&value.to_text()) {
            Ok(())
        } else {
            fail("Please enter a valid email address")
        }
    })
}

/// At least `n` characters (or list items).
pub fn min_length<K: FieldKey>(n: usize) -> Rule<K> {
    Rule::new(move |value| {
        if value.is_empty() || length(value) >= n {
            Ok(())
        } else {
            fail(format!("Must be at least {n} characters"))
        }
    })
}

/// At most `n` characters (or list items).
pub fn max_length<K: FieldKey>(n: usize) -> Rule<K> {
    Rule::new(move |value| {
        if value.is_empty() || length(value) <= n {
            Ok(())
        } else {
            fail(format!("Must be less than {n} characters"))
        }
    })
}

pub fn numeric<K: FieldKey>() -> Rule<K> {
    Rule::new(|value| {
        if value.is_empty() || value.as_number().is_some() {
            Ok(())
        } else {
            fail("Please enter a valid number")
        }
    })
}

/// Numeric value `>= n`. Non-numeric input fails.
pub fn min<K: FieldKey>(n: f64) -> Rule<K> {
    Rule::new(move |value| {
        if value.is_empty() {
            return Ok(());
        }
        match value.as_number() {
            Some(v) if v >= n => Ok(()),
            _ => fail(format!("Must be at least {n}")),
        }
    })
}

/// Numeric value `<= n`. Non-numeric input fails.
pub fn max<K: FieldKey>(n: f64) -> Rule<K> {
    Rule::new(move |value| {
        if value.is_empty() {
            return Ok(());
        }
        match value.as_number() {
            Some(v) if v <= n => Ok(()),
            _ => fail(format!("Must be less than {n}")),
        }
    })
}

pub fn pattern<K: FieldKey>(re: Regex) -> Rule<K> {
    Rule::new(move |value| {
        if value.is_empty() || re.is_match(&value.to_text()) {
            Ok(())
        } else {
            fail("Invalid format")
        }
    })
}

/// Equal to the value of `other`, e.g. a password confirmation.
pub fn confirmed<K: FieldKey>(other: K) -> Rule<K> {
    Rule::with_values(move |value, values| {
        if value.is_empty() || values.get(other) == Some(value) {
            Ok(())
        } else {
            fail("Values do not match")
        }
    })
}

fn length(value: &FieldValue) -> usize {
    match value {
        FieldValue::List(items) => items.len(),
        other => other.to_text().chars().count(),
    }
}

//! Submitted forms and their validation.
//!
//! Every form validates into a [`Validated`] value: either the cleaned,
//! typed submission or the per-field messages to show next to the inputs.

use std::collections::BTreeMap;

pub mod todo_list_dto;
pub mod user_dto;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<&'static str, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug)]
pub enum Validated<T> {
    Valid(T),
    Invalid(FormErrors),
}

impl<T> Validated<T> {
    fn check(errors: FormErrors, value: impl FnOnce() -> T) -> Self {
        if errors.is_empty() {
            Validated::Valid(value())
        } else {
            Validated::Invalid(errors)
        }
    }
}

/// Returns false (and records an error) when the value is blank, so callers
/// can skip the remaining checks for that field.
pub(crate) fn required(errors: &mut FormErrors, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, "This field is required.");
        return false;
    }
    true
}

pub(crate) fn length(errors: &mut FormErrors, field: &'static str, value: &str, min: usize, max: usize) {
    let len = value.chars().count();
    if len < min || len > max {
        errors.add(field, format!("Field must be between {} and {} characters long.", min, max));
    }
}

pub(crate) fn max_length(errors: &mut FormErrors, field: &'static str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("Field cannot be longer than {} characters.", max));
    }
}

pub(crate) fn email(errors: &mut FormErrors, field: &'static str, value: &str) {
    if !is_valid_email(value) {
        errors.add(field, "Invalid email address.");
    }
}

fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@@x.com"));
        assert!(!is_valid_email("a@x..com"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email("ax.com"));
    }

    #[test]
    fn blank_values_are_required() {
        let mut errors = FormErrors::default();

        assert!(!required(&mut errors, "title", "   "));
        assert!(required(&mut errors, "content", "milk"));
        assert_eq!(errors.field("title"), ["This field is required."]);
        assert!(errors.field("content").is_empty());
    }

    #[test]
    fn length_counts_characters() {
        let mut errors = FormErrors::default();

        length(&mut errors, "username", "é", 2, 20);
        length(&mut errors, "username", "éé", 2, 20);

        assert_eq!(errors.field("username").len(), 1);
    }
}

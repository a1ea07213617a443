//! Field validation for user writes.
//!
//! Every rule is checked and all failures are reported together, one entry
//! per field, before any store call is made.

use std::fmt;

use crate::model::{Gender, UserFields};

/// A single failed rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All failed rules for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check a field set against the user constraints
pub fn validate_user(fields: &UserFields) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    validate_required(&mut errors, "first_name", &fields.first_name);
    validate_required(&mut errors, "last_name", &fields.last_name);

    if fields.age < 0 {
        errors.push("age", "must be no less than 0");
    }

    if fields.gender.parse::<Gender>().is_err() {
        let allowed: Vec<&str> = Gender::ALL.iter().map(|g| g.as_str()).collect();
        errors.push("gender", format!("must be one of {}", allowed.join(", ")));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_required(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, "cannot be blank");
    }
}

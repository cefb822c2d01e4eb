use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors};

pub fn validate<T: Validate>(val: &T) -> Result<(), validator::ValidationErrors> {
    val.validate()
}

/// Runs derived validation and hands back the (possibly empty) error set so
/// callers can keep adding structural checks before deciding.
pub fn collect<T: Validate>(val: &T) -> ValidationErrors {
    match validate(val) {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    }
}

pub fn field_error(code: &'static str, message: impl Into<String>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message.into()));
    error
}

pub fn finish(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

//! Field-level checks shared by the post and comment forms.

use crate::error::ValidationErrors;

/// Upper bound for short text columns (titles, comment author names).
pub const MAX_SHORT_TEXT_CHARS: usize = 200;

pub(crate) const REQUIRED_MESSAGE: &str = "This field is required.";

/// Trim `value` and require it to be non-empty.
pub(crate) fn required(errors: &mut ValidationErrors, field: &'static str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED_MESSAGE);
    }
    value.to_string()
}

/// Like [`required`], additionally bounding the length in characters.
pub(crate) fn required_bounded(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> String {
    let value = required(errors, field, value);
    let count = value.chars().count();
    if count > max_chars {
        errors.add(
            field,
            format!("Ensure this value has at most {max_chars} characters (it has {count})."),
        );
    }
    value
}
